mod builder;
mod state;

use std::error::Error as StdError;
use std::fmt::{self, Display};

use tokio::sync::{mpsc, oneshot};

use crate::analyzer::SymptomRequest;
use crate::conversation::ConversationSnapshot;
use crate::doctors::Doctor;
pub use builder::ChatBuilder;
use state::Command;

/// Reply appended when the advisor fails.
pub const FALLBACK_REPLY: &str = "I'm sorry, I encountered an error while \
    processing your request. Please try again later.";

/// Error returned when the chat session task is gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChatClosed;

impl Display for ChatClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("chat session has been closed")
    }
}

impl StdError for ChatClosed {}

/// Why a submission was rejected. A rejected submission leaves the
/// conversation untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitError {
    /// The input is empty or only whitespace.
    EmptyInput,
    /// A previous submission has not been answered yet.
    Busy,
    /// The chat session task is gone.
    Closed,
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::EmptyInput => f.write_str("input is empty"),
            SubmitError::Busy => {
                f.write_str("still waiting for the previous reply")
            }
            SubmitError::Closed => Display::fmt(&ChatClosed, f),
        }
    }
}

impl StdError for SubmitError {}

impl From<ChatClosed> for SubmitError {
    #[inline]
    fn from(_: ChatClosed) -> Self {
        SubmitError::Closed
    }
}

/// A chat session.
///
/// The session owns a [`ConversationStore`](crate::store::ConversationStore)
/// on its own task and applies commands one at a time, in the order they
/// were sent. Advisor calls run on separate tasks and report back to the
/// session, so the store is never shared.
///
/// Handles are cheap to clone. The session ends once every handle is
/// dropped and no reply is pending.
#[derive(Clone, Debug)]
pub struct Chat {
    commands: mpsc::UnboundedSender<Command>,
}

impl Chat {
    /// Submits free text as the next user turn.
    ///
    /// Returns once the submission has been accepted, i.e. after the user
    /// message was appended and the typing indicator switched on. The reply
    /// arrives later through the store observers and the idle callback.
    #[inline]
    pub async fn submit<S: Into<String>>(
        &self,
        text: S,
    ) -> Result<(), SubmitError> {
        self.submit_request(SymptomRequest::new(text)).await
    }

    /// Like [`Chat::submit`], with duration, severity and additional
    /// information attached.
    pub async fn submit_request(
        &self,
        request: SymptomRequest,
    ) -> Result<(), SubmitError> {
        if request.symptoms.trim().is_empty() {
            return Err(SubmitError::EmptyInput);
        }
        self.call(|reply| Command::Submit { request, reply })
            .await?
    }

    /// Resets the conversation. A reply still being prepared is discarded.
    #[inline]
    pub async fn clear(&self) -> Result<(), ChatClosed> {
        self.call(|reply| Command::Clear { reply }).await
    }

    /// Records a request to consult `doctor`.
    #[inline]
    pub async fn connect_doctor(&self, doctor: &Doctor) -> Result<(), ChatClosed> {
        let doctor = doctor.clone();
        self.call(|reply| Command::ConnectDoctor { doctor, reply })
            .await
    }

    /// Returns a copy of the current conversation state.
    #[inline]
    pub async fn snapshot(&self) -> Result<ConversationSnapshot, ChatClosed> {
        self.call(|reply| Command::Snapshot { reply }).await
    }

    async fn call<T>(
        &self,
        make_command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, ChatClosed> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(make_command(reply_tx))
            .map_err(|_| ChatClosed)?;
        reply_rx.await.map_err(|_| ChatClosed)
    }
}
