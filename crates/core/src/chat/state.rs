use std::fmt::{self, Debug};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use healthchat_model::ErrorKind;
use tokio::task::AbortHandle;
use tracing::Instrument;

use super::{FALLBACK_REPLY, SubmitError};
use crate::advisor::{Advisor, AdvisorError};
use crate::analyzer::SymptomRequest;
use crate::conversation::{ConversationSnapshot, Role};
use crate::doctors::Doctor;
use crate::store::ConversationStore;

pub enum Command {
    Submit {
        request: SymptomRequest,
        reply: oneshot::Sender<Result<(), SubmitError>>,
    },
    Clear {
        reply: oneshot::Sender<()>,
    },
    ConnectDoctor {
        doctor: Doctor,
        reply: oneshot::Sender<()>,
    },
    Snapshot {
        reply: oneshot::Sender<ConversationSnapshot>,
    },
    AdviceReady {
        generation: u64,
        result: Result<String, AdvisorError>,
    },
}

impl Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Submit { request, .. } => {
                f.debug_tuple("Submit").field(request).finish()
            }
            Command::Clear { .. } => f.write_str("Clear"),
            Command::ConnectDoctor { doctor, .. } => {
                f.debug_tuple("ConnectDoctor").field(&doctor.id).finish()
            }
            Command::Snapshot { .. } => f.write_str("Snapshot"),
            Command::AdviceReady { generation, result } => f
                .debug_struct("AdviceReady")
                .field("generation", generation)
                .field("ok", &result.is_ok())
                .finish(),
        }
    }
}

pub struct ChatState {
    pub(super) store: ConversationStore,
    pub(super) advisor: Arc<dyn Advisor>,
    pub(super) on_idle: Option<Box<dyn Fn() + Send + Sync>>,
    pub(super) commands: mpsc::WeakUnboundedSender<Command>,
    /// Bumped by every clear so replies to older turns can be told apart.
    pub(super) generation: u64,
    /// The in-flight advisor call.
    pub(super) running: Option<AbortHandle>,
}

impl ChatState {
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = commands.recv().await {
            trace!("got a command: {command:?}");
            self.handle(command);
        }
        trace!("chat session ended");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Submit { request, reply } => {
                reply.send(self.submit(request)).ok();
            }
            Command::Clear { reply } => {
                self.clear();
                reply.send(()).ok();
            }
            Command::ConnectDoctor { doctor, reply } => {
                self.store.add_message(
                    Role::System,
                    format!(
                        "You've requested to connect with {}. In a real \
                         application, this would initiate a consultation \
                         request.",
                        doctor.name
                    ),
                );
                reply.send(()).ok();
            }
            Command::Snapshot { reply } => {
                reply.send(self.store.snapshot()).ok();
            }
            Command::AdviceReady { generation, result } => {
                self.finish(generation, result);
            }
        }
    }

    #[inline]
    fn is_busy(&self) -> bool {
        self.running.is_some()
    }

    fn submit(&mut self, mut request: SymptomRequest) -> Result<(), SubmitError> {
        let symptoms = request.symptoms.trim();
        if symptoms.is_empty() {
            return Err(SubmitError::EmptyInput);
        }
        if self.is_busy() {
            debug!("rejected a submission while busy");
            return Err(SubmitError::Busy);
        }
        // Handles may all be gone while this command was still queued.
        let Some(commands) = self.commands.upgrade() else {
            return Err(SubmitError::Closed);
        };
        request.symptoms = symptoms.to_owned();

        let history = self.store.messages().to_vec();
        self.store.add_message(Role::User, request.symptoms.clone());
        self.store.set_is_typing(true);

        let generation = self.generation;
        let advisor = Arc::clone(&self.advisor);
        let advice = tokio::spawn(
            async move { advisor.advise(&history, &request).await }
                .instrument(debug_span!("advise", generation)),
        );
        self.running = Some(advice.abort_handle());

        // Reports back even when the advisor panics or is aborted.
        tokio::spawn(async move {
            let result = advice.await.unwrap_or_else(|err| {
                Err(AdvisorError::new(
                    format!("advisor task failed: {err}"),
                    ErrorKind::Other,
                ))
            });
            commands
                .send(Command::AdviceReady { generation, result })
                .ok();
        });
        Ok(())
    }

    fn finish(&mut self, generation: u64, result: Result<String, AdvisorError>) {
        if generation != self.generation {
            debug!(generation, "dropping a stale reply");
            return;
        }
        self.running = None;

        let reply = match result {
            Ok(reply) => reply,
            Err(err) => {
                error!("advisor failed: {err}");
                FALLBACK_REPLY.to_owned()
            }
        };
        self.store.add_message(Role::Assistant, reply);
        self.store.set_is_typing(false);
        self.notify_idle();
    }

    fn clear(&mut self) {
        self.generation += 1;
        let cancelled = self.running.take();
        if let Some(task) = &cancelled {
            task.abort();
        }
        self.store.clear_messages();
        self.store.set_is_typing(false);
        if cancelled.is_some() {
            self.notify_idle();
        }
    }

    fn notify_idle(&self) {
        if let Some(on_idle) = &self.on_idle {
            on_idle();
        }
    }
}
