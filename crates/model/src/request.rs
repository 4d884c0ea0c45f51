/// A request to be sent to the model provider.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelRequest {
    /// The input messages, oldest first.
    pub messages: Vec<ModelMessage>,
    /// Sampling temperature. Providers use their own default when unset.
    pub temperature: Option<f32>,
}

impl ModelRequest {
    /// Creates a request from the given messages.
    #[inline]
    pub fn with_messages(messages: impl Into<Vec<ModelMessage>>) -> Self {
        Self {
            messages: messages.into(),
            temperature: None,
        }
    }

    /// Returns the text of the last user message, if any.
    pub fn last_user_text(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|msg| match msg {
            ModelMessage::User(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A complete message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModelMessage {
    /// The system instructions.
    System(String),
    /// A user input text.
    User(String),
    /// An assistant text.
    Assistant(String),
}

impl ModelMessage {
    /// Returns the text carried by this message.
    #[inline]
    pub fn text(&self) -> &str {
        match self {
            ModelMessage::System(text)
            | ModelMessage::User(text)
            | ModelMessage::Assistant(text) => text,
        }
    }
}
