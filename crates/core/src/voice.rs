//! Optional speech-to-text input.
//!
//! Voice input is a capability: a front end may or may not have a speech
//! backend, and the user may or may not grant microphone access. Both are
//! folded into one [`Permission`] value so callers never probe globals.

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, timeout_at};

/// Error code a recognizer reports when microphone access is refused.
pub const PERMISSION_DENIED_CODE: &str = "not-allowed";

/// How long a backend may take to confirm a stop before recording is
/// considered over anyway.
pub const STOP_GRACE_PERIOD: Duration = Duration::from_secs(2);

const PERMISSION_DENIED_NOTICE: &str = "Microphone access was denied. \
    Please allow microphone access to use voice input.";

/// Whether speech input can be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Permission {
    /// A backend exists and may record.
    Granted,
    /// A backend exists but the user refused access.
    Denied,
    /// No speech backend is available.
    Unsupported,
}

/// An event produced by a [`SpeechRecognizer`] while recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeechEvent {
    /// A transcript that may still change.
    Interim(String),
    /// The final transcript of the utterance.
    Final(String),
    /// Recognition failed with a backend error code.
    Error(String),
    /// The backend stopped listening.
    End,
}

impl SpeechEvent {
    /// Returns `true` if no further events follow this one.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SpeechEvent::Interim(_))
    }
}

/// Error returned by [`VoiceInput::start`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceError {
    /// No speech backend is available.
    Unsupported,
    /// The user refused microphone access.
    PermissionDenied,
}

impl Display for VoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoiceError::Unsupported => {
                f.write_str("voice input is not supported here")
            }
            VoiceError::PermissionDenied => f.write_str(PERMISSION_DENIED_NOTICE),
        }
    }
}

impl StdError for VoiceError {}

/// A speech-to-text backend.
pub trait SpeechRecognizer: Send {
    /// Reports availability and microphone permission.
    fn permission(&self) -> Permission;

    /// Starts listening. Events are delivered through `events` until a
    /// terminal event is sent.
    fn start(&mut self, events: mpsc::UnboundedSender<SpeechEvent>);

    /// Stops listening. The backend should still send [`SpeechEvent::End`].
    fn stop(&mut self);
}

/// What the front end should do after a [`SpeechEvent`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoiceUpdate {
    /// The live transcript changed.
    Transcript(String),
    /// Recording ended with this transcript, ready to be submitted.
    Finished(String),
    /// Recording ended without a result. Carries a message for the user.
    Failed(String),
    /// Recording ended with nothing to report.
    Stopped,
}

/// Tracks one recognizer and its recording state.
pub struct VoiceInput {
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    recording: bool,
    transcript: String,
    events_rx: Option<mpsc::UnboundedReceiver<SpeechEvent>>,
    stop_deadline: Option<Instant>,
}

impl VoiceInput {
    /// Wraps a recognizer. `None` means the platform has no speech backend.
    #[inline]
    pub fn new(recognizer: Option<Box<dyn SpeechRecognizer>>) -> Self {
        Self {
            recognizer,
            recording: false,
            transcript: String::new(),
            events_rx: None,
            stop_deadline: None,
        }
    }

    /// A voice input without any backend.
    #[inline]
    pub fn unsupported() -> Self {
        Self::new(None)
    }

    #[allow(missing_docs)]
    pub fn permission(&self) -> Permission {
        self.recognizer
            .as_ref()
            .map_or(Permission::Unsupported, |r| r.permission())
    }

    #[allow(missing_docs)]
    #[inline]
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Returns the latest transcript.
    #[inline]
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Starts recording. Does nothing if already recording.
    pub fn start(&mut self) -> Result<(), VoiceError> {
        let Some(recognizer) = &mut self.recognizer else {
            return Err(VoiceError::Unsupported);
        };
        match recognizer.permission() {
            Permission::Granted => {}
            Permission::Denied => return Err(VoiceError::PermissionDenied),
            Permission::Unsupported => return Err(VoiceError::Unsupported),
        }
        if self.recording {
            return Ok(());
        }

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        recognizer.start(events_tx);
        self.events_rx = Some(events_rx);
        self.stop_deadline = None;
        self.recording = true;
        self.transcript.clear();
        debug!("voice recording started");
        Ok(())
    }

    /// Asks the backend to stop. Safe to call at any time.
    ///
    /// If the backend does not end the recording within
    /// [`STOP_GRACE_PERIOD`], [`next_event`](Self::next_event) ends it.
    pub fn stop(&mut self) {
        if !self.recording || self.stop_deadline.is_some() {
            return;
        }
        if let Some(recognizer) = &mut self.recognizer {
            recognizer.stop();
        }
        self.stop_deadline = Some(Instant::now() + STOP_GRACE_PERIOD);
    }

    /// Waits for the next backend event. Returns `None` when not recording
    /// or when the backend went away.
    pub async fn next_event(&mut self) -> Option<SpeechEvent> {
        let events_rx = self.events_rx.as_mut()?;
        let event = match self.stop_deadline {
            Some(deadline) => match timeout_at(deadline, events_rx.recv()).await {
                Ok(event) => event,
                Err(_) => {
                    debug!("speech backend did not confirm the stop");
                    self.finish_recording();
                    return Some(SpeechEvent::End);
                }
            },
            None => events_rx.recv().await,
        };
        if event.is_none() {
            // Backend dropped its sender without a terminal event.
            self.finish_recording();
        }
        event
    }

    /// Applies a backend event. Every terminal event clears the recording
    /// flag.
    pub fn handle_event(&mut self, event: SpeechEvent) -> VoiceUpdate {
        if event.is_terminal() {
            self.finish_recording();
        }
        match event {
            SpeechEvent::Interim(text) => {
                self.transcript = text;
                VoiceUpdate::Transcript(self.transcript.clone())
            }
            SpeechEvent::Final(text) => {
                self.transcript = text;
                VoiceUpdate::Finished(self.transcript.clone())
            }
            SpeechEvent::Error(code) => {
                warn!(code = %code, "speech recognition failed");
                VoiceUpdate::Failed(error_notice(&code))
            }
            SpeechEvent::End => VoiceUpdate::Stopped,
        }
    }

    fn finish_recording(&mut self) {
        self.recording = false;
        self.events_rx = None;
        self.stop_deadline = None;
    }
}

impl fmt::Debug for VoiceInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceInput")
            .field("permission", &self.permission())
            .field("recording", &self.recording)
            .field("transcript", &self.transcript)
            .finish()
    }
}

/// Maps a backend error code to the notice shown to the user.
pub fn error_notice(code: &str) -> String {
    if code == PERMISSION_DENIED_CODE {
        PERMISSION_DENIED_NOTICE.to_owned()
    } else {
        format!("Voice input failed ({code}). Please try again or type your symptoms.")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Default)]
    struct Calls {
        started: usize,
        stopped: usize,
        sender: Option<mpsc::UnboundedSender<SpeechEvent>>,
        ignore_stop: bool,
    }

    struct FakeRecognizer {
        permission: Permission,
        calls: Arc<Mutex<Calls>>,
    }

    impl SpeechRecognizer for FakeRecognizer {
        fn permission(&self) -> Permission {
            self.permission
        }

        fn start(&mut self, events: mpsc::UnboundedSender<SpeechEvent>) {
            let mut calls = self.calls.lock().unwrap();
            calls.started += 1;
            calls.sender = Some(events);
        }

        fn stop(&mut self) {
            let mut calls = self.calls.lock().unwrap();
            calls.stopped += 1;
            if calls.ignore_stop {
                return;
            }
            if let Some(sender) = &calls.sender {
                sender.send(SpeechEvent::End).unwrap();
            }
        }
    }

    fn voice(permission: Permission) -> (VoiceInput, Arc<Mutex<Calls>>) {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let recognizer = FakeRecognizer {
            permission,
            calls: Arc::clone(&calls),
        };
        (VoiceInput::new(Some(Box::new(recognizer))), calls)
    }

    #[test]
    fn test_unsupported() {
        let mut voice = VoiceInput::unsupported();
        assert_eq!(voice.permission(), Permission::Unsupported);
        assert_eq!(voice.start(), Err(VoiceError::Unsupported));
        assert!(!voice.is_recording());
        voice.stop();
    }

    #[test]
    fn test_permission_denied() {
        let (mut voice, calls) = voice(Permission::Denied);
        assert_eq!(voice.start(), Err(VoiceError::PermissionDenied));
        assert!(!voice.is_recording());
        assert_eq!(calls.lock().unwrap().started, 0);
    }

    #[tokio::test]
    async fn test_final_transcript() {
        let (mut voice, calls) = voice(Permission::Granted);
        voice.start().unwrap();
        voice.start().unwrap();
        assert!(voice.is_recording());
        assert_eq!(calls.lock().unwrap().started, 1);

        let sender = calls.lock().unwrap().sender.clone().unwrap();
        sender.send(SpeechEvent::Interim("head".to_owned())).unwrap();
        sender.send(SpeechEvent::Final("headache".to_owned())).unwrap();

        let event = voice.next_event().await.unwrap();
        assert_eq!(
            voice.handle_event(event),
            VoiceUpdate::Transcript("head".to_owned())
        );
        assert!(voice.is_recording());

        let event = voice.next_event().await.unwrap();
        assert_eq!(
            voice.handle_event(event),
            VoiceUpdate::Finished("headache".to_owned())
        );
        assert!(!voice.is_recording());
        assert_eq!(voice.transcript(), "headache");
        assert_eq!(voice.next_event().await, None);
    }

    #[tokio::test]
    async fn test_stop_ends_recording() {
        let (mut voice, calls) = voice(Permission::Granted);
        voice.start().unwrap();
        voice.stop();
        assert_eq!(calls.lock().unwrap().stopped, 1);

        let event = voice.next_event().await.unwrap();
        assert_eq!(voice.handle_event(event), VoiceUpdate::Stopped);
        assert!(!voice.is_recording());

        // Stopping again is harmless.
        voice.stop();
        assert_eq!(calls.lock().unwrap().stopped, 1);
    }

    #[test]
    fn test_error_events() {
        let (mut voice, _calls) = voice(Permission::Granted);
        voice.start().unwrap();
        let VoiceUpdate::Failed(denied) =
            voice.handle_event(SpeechEvent::Error("not-allowed".to_owned()))
        else {
            panic!("expected a failure");
        };
        assert!(!voice.is_recording());

        voice.start().unwrap();
        let VoiceUpdate::Failed(other) =
            voice.handle_event(SpeechEvent::Error("network".to_owned()))
        else {
            panic!("expected a failure");
        };
        assert!(!voice.is_recording());

        assert_eq!(denied, PERMISSION_DENIED_NOTICE);
        assert_ne!(denied, other);
        assert!(other.contains("network"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_without_end_event() {
        let (mut voice, calls) = voice(Permission::Granted);
        calls.lock().unwrap().ignore_stop = true;
        voice.start().unwrap();
        calls
            .lock()
            .unwrap()
            .sender
            .as_ref()
            .unwrap()
            .send(SpeechEvent::Interim("sore".to_owned()))
            .unwrap();
        voice.stop();

        // Events already sent are still delivered.
        let event = voice.next_event().await.unwrap();
        assert_eq!(
            voice.handle_event(event),
            VoiceUpdate::Transcript("sore".to_owned())
        );
        assert!(voice.is_recording());

        let start = Instant::now();
        let event = voice.next_event().await.unwrap();
        assert!(start.elapsed() >= STOP_GRACE_PERIOD);
        assert_eq!(voice.handle_event(event), VoiceUpdate::Stopped);
        assert!(!voice.is_recording());
        assert_eq!(voice.next_event().await, None);
    }

    #[tokio::test]
    async fn test_backend_dropped() {
        let (mut voice, calls) = voice(Permission::Granted);
        voice.start().unwrap();
        calls.lock().unwrap().sender = None;
        assert_eq!(voice.next_event().await, None);
        assert!(!voice.is_recording());
    }
}
