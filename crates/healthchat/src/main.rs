//! The `healthchat` terminal front end.

#[macro_use]
extern crate tracing;

use std::io::Write as _;
use std::time::Duration;

use healthchat::SessionBuilder;
use healthchat::config::Config;
use healthchat::render::{self, PlanTab};
use healthchat_core::recommendation::Recommendation;
use healthchat_core::store::StoreEvent;
use healthchat_core::voice::{VoiceError, VoiceInput, VoiceUpdate};
use healthchat_core::{Message, Role, SubmitError};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;

enum ChatEvent {
    Idle,
    Message(Message),
}

enum Action {
    Continue,
    Submit(String),
    Quit,
}

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    debug!(?config, "loaded configuration");

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let builder = match SessionBuilder::from_config(&config) {
        Ok(builder) => builder,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    let session = builder
        .on_event({
            let event_tx = event_tx.clone();
            move |event: &StoreEvent| {
                // User messages are already on screen.
                if let StoreEvent::MessageAdded(message) = event {
                    if message.role() != Role::User {
                        event_tx.send(ChatEvent::Message(message.clone())).ok();
                    }
                }
            }
        })
        .on_idle({
            let event_tx = event_tx.clone();
            move || {
                event_tx.send(ChatEvent::Idle).ok();
            }
        })
        .build();

    let mut input = io::BufReader::new(io::stdin()).lines();

    println!("{}\n", render::PRIVACY_NOTICE.bold());
    print!("Press Enter if you understand. ");
    std::io::stdout().flush().ok();
    if read_line(&mut input).await.is_none() {
        return;
    }
    println!();

    if let Ok(snapshot) = session.snapshot().await {
        snapshot.messages.iter().for_each(print_message);
    }
    println!("{}", "Type /help to see what else you can do.".dimmed());

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .map(|style| style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"))
        .unwrap_or_else(|_| ProgressStyle::default_spinner());

    let mut voice = VoiceInput::unsupported();
    let mut duration: Option<String> = None;

    'outer: loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line(&mut input).await else {
            break;
        };
        let line = line.trim();

        let input = if let Some(command) = line.strip_prefix('/') {
            let action =
                run_command(&session, command, &mut duration, &mut voice).await;
            // Surface notes added by the command, e.g. a consult request.
            while let Ok(event) = event_rx.try_recv() {
                if let ChatEvent::Message(message) = event {
                    print_message(&message);
                }
            }
            match action {
                Action::Continue => continue,
                Action::Quit => break,
                Action::Submit(input) => input,
            }
        } else {
            line.to_owned()
        };

        match session.send_message(&input, duration.take()).await {
            Ok(()) => {}
            Err(SubmitError::EmptyInput) => continue,
            Err(SubmitError::Busy) => {
                println!("Still working on your previous message.");
                continue;
            }
            Err(SubmitError::Closed) => break,
        }

        let mut progress_bar = None;

        loop {
            // Create a new progress bar if it has been finished.
            progress_bar
                .get_or_insert_with(|| {
                    let progress_bar = ProgressBar::new_spinner();
                    progress_bar.set_style(progress_style.clone());
                    progress_bar.set_message("Analyzing your symptoms...");
                    progress_bar
                })
                .inc(1);

            let sleep = sleep(Duration::from_millis(100));
            let event = select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        break 'outer;
                    };
                    event
                },
                _ = sleep => {
                    continue;
                }
            };

            // Finish the progress bar before printing anything else.
            if let Some(progress_bar) = &progress_bar {
                progress_bar.finish_and_clear();
            }
            progress_bar = None;

            match event {
                ChatEvent::Message(message) => print_message(&message),
                ChatEvent::Idle => break,
            }
        }
    }
}

async fn run_command(
    session: &healthchat::Session,
    command: &str,
    duration: &mut Option<String>,
    voice: &mut VoiceInput,
) -> Action {
    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(name, arg)| (name, arg.trim()));

    match name {
        "help" => println!("{}", render::HELP),
        "quit" | "exit" => return Action::Quit,
        "clear" => {
            if session.clear().await.is_err() {
                return Action::Quit;
            }
            *duration = None;
            println!("{}", "Conversation cleared.".dimmed());
            if let Ok(snapshot) = session.snapshot().await {
                snapshot.messages.iter().for_each(print_message);
            }
        }
        "plan" => {
            let tab = match arg.parse::<PlanTab>() {
                Ok(tab) => tab,
                Err(err) => {
                    println!("{err}");
                    return Action::Continue;
                }
            };
            let Ok(snapshot) = session.snapshot().await else {
                return Action::Quit;
            };
            let plan = snapshot
                .current_recommendation
                .unwrap_or_else(Recommendation::general_health);
            println!("{}", render::render_plan(&plan, tab));
        }
        "doctors" => {
            println!("{}", render::render_doctors(&session.doctors().await));
        }
        "connect" => match session.connect_doctor(arg).await {
            Ok(Some(doctor)) => println!(
                "{}",
                format!(
                    "Request sent to {}. We'll notify you when they respond.",
                    doctor.name
                )
                .bright_green()
            ),
            Ok(None) => println!("No doctor with id {arg:?}. Try /doctors."),
            Err(_) => return Action::Quit,
        },
        "duration" => {
            if arg.is_empty() {
                *duration = None;
                println!("Duration cleared.");
            } else {
                println!("Noted, your next message will mention {arg}.");
                *duration = Some(arg.to_owned());
            }
        }
        "voice" => return dictate(voice).await,
        "export" => match session.snapshot().await.map(|s| s.to_json()) {
            Ok(Ok(json)) => println!("{json}"),
            Ok(Err(err)) => error!("cannot export the conversation: {err}"),
            Err(_) => return Action::Quit,
        },
        _ => println!("Unknown command /{name}. Type /help for a list."),
    }
    Action::Continue
}

async fn dictate(voice: &mut VoiceInput) -> Action {
    match voice.start() {
        Ok(()) => {}
        Err(VoiceError::Unsupported) => {
            println!(
                "{}",
                "Voice input is not available in this terminal. Please type \
                 your symptoms instead."
                    .bright_yellow()
            );
            return Action::Continue;
        }
        Err(err @ VoiceError::PermissionDenied) => {
            println!("{}", err.bright_yellow());
            return Action::Continue;
        }
    }

    println!("{}", "Listening...".dimmed());
    while let Some(event) = voice.next_event().await {
        match voice.handle_event(event) {
            VoiceUpdate::Transcript(text) => println!("{}", text.dimmed()),
            VoiceUpdate::Finished(text) => return Action::Submit(text),
            VoiceUpdate::Failed(notice) => {
                println!("{}", notice.bright_yellow());
                break;
            }
            VoiceUpdate::Stopped => break,
        }
    }
    Action::Continue
}

fn print_message(message: &Message) {
    match message.role() {
        Role::Assistant => {
            let bar = BAR_CHAR.bright_cyan();
            for line in message.content().lines() {
                println!("{bar}{}", line.bright_white());
            }
        }
        Role::System => {
            let bar = BAR_CHAR.bright_yellow();
            for line in message.content().lines() {
                println!("{bar}{}", line.italic());
            }
        }
        Role::User => {}
    }
    println!();
}

async fn read_line<R>(input: &mut Lines<R>) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    match input.next_line().await {
        Ok(line) => line,
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_line_keeps_buffered_input() {
        let piped: &[u8] = b"I have a fever\n/plan diet\n/quit";
        let mut input = io::BufReader::new(piped).lines();

        assert_eq!(read_line(&mut input).await.as_deref(), Some("I have a fever"));
        assert_eq!(read_line(&mut input).await.as_deref(), Some("/plan diet"));
        assert_eq!(read_line(&mut input).await.as_deref(), Some("/quit"));
        assert_eq!(read_line(&mut input).await, None);
    }
}
