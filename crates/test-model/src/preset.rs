use healthchat_model::{ErrorKind, ModelFinishReason};
use serde::{Deserialize, Serialize};

/// The events in a preset response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetEvent {
    #[serde(rename = "message_delta")]
    MessageDelta(String),
    /// Breaks the stream with an error after the preceding deltas.
    #[serde(rename = "stream_error")]
    StreamError(PresetFailure),
    /// Ends the stream early with the given reason.
    #[serde(rename = "completed")]
    Completed(ModelFinishReason),
}

/// Serializable mirror of [`ErrorKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetFailure {
    Moderated,
    RateLimited,
    Unauthorized,
    Other,
}

impl From<PresetFailure> for ErrorKind {
    fn from(value: PresetFailure) -> Self {
        match value {
            PresetFailure::Moderated => ErrorKind::Moderated,
            PresetFailure::RateLimited => ErrorKind::RateLimitExceeded,
            PresetFailure::Unauthorized => ErrorKind::Unauthorized,
            PresetFailure::Other => ErrorKind::Other,
        }
    }
}

/// The preset response for one request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Events in this response.
    pub events: Vec<PresetEvent>,
    /// If set, the request will fail in the first `failures` attempts.
    /// `Some(0)` means the request will fail infinitely.
    pub failures: Option<u64>,
    /// The kind reported by the failed attempts.
    #[serde(default = "default_failure")]
    pub failure_kind: PresetFailure,
}

fn default_failure() -> PresetFailure {
    PresetFailure::Other
}

impl PresetResponse {
    /// Creates a `PresetResponse` with the specified events.
    #[inline]
    pub fn with_events(events: impl Into<Vec<PresetEvent>>) -> Self {
        Self {
            events: events.into(),
            failures: None,
            failure_kind: default_failure(),
        }
    }

    /// Creates a `PresetResponse` that streams `text` split on spaces.
    pub fn with_text(text: &str) -> Self {
        let mut words: Vec<_> = text.split(' ').map(str::to_owned).collect();
        let last = words.len() - 1;
        for word in &mut words[..last] {
            word.push(' ');
        }
        Self::with_events(
            words
                .into_iter()
                .map(PresetEvent::MessageDelta)
                .collect::<Vec<_>>(),
        )
    }

    /// Sets failure times before a successful response. `0` means the
    /// response will always be a failure.
    #[inline]
    pub fn with_failures(mut self, failures: u64, kind: PresetFailure) -> Self {
        self.failures = Some(failures);
        self.failure_kind = kind;
        self
    }
}
