//! Conversation-related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::recommendation::Recommendation;

/// Id of the seeded welcome message.
pub const WELCOME_MESSAGE_ID: &str = "welcome";

/// Content of the seeded welcome message.
pub const WELCOME_MESSAGE: &str = "Hello! I'm your health assistant. Please \
    describe your symptoms, and I'll try to help you understand what might \
    be happening.";

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person describing symptoms.
    User,
    /// The health assistant.
    Assistant,
    /// Notes from the application itself, e.g. a doctor connect request.
    System,
}

impl Role {
    /// Returns the tag used when a conversation is rendered as text.
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
            Role::System => "System",
        }
    }
}

/// A chat message. Messages are immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: String,
    role: Role,
    content: String,
    timestamp: DateTime<Utc>,
}

impl Message {
    #[inline]
    pub(crate) fn new(id: String, role: Role, content: String) -> Self {
        Self {
            id,
            role,
            content,
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn welcome() -> Self {
        Self::new(
            WELCOME_MESSAGE_ID.to_owned(),
            Role::Assistant,
            WELCOME_MESSAGE.to_owned(),
        )
    }

    /// Returns the id, unique within the store that created it.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the author role.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the text content.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the creation time.
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// An owned copy of the conversation state at one point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationSnapshot {
    /// Messages in insertion order.
    pub messages: Vec<Message>,
    /// Whether a reply is being prepared.
    pub is_typing: bool,
    /// The care plan derived from the latest assistant message.
    pub current_recommendation: Option<Recommendation>,
}

impl ConversationSnapshot {
    /// Returns the last message. A snapshot always holds at least the
    /// welcome message.
    #[inline]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Renders the snapshot as pretty-printed JSON.
    #[inline]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
