//! Core logic of the health chat: the conversation store, the symptom
//! analyzer and its knowledge tables, advisors, and the chat session.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

pub mod advisor;
pub mod analyzer;
mod chat;
pub mod conversation;
pub mod doctors;
pub mod knowledge;
mod model_client;
pub mod recommendation;
pub mod store;
pub mod voice;

pub use advisor::{Advisor, AdvisorError, KeywordAdvisor, ModelAdvisor};
pub use analyzer::{AnalyzerResult, SymptomAnalyzer, SymptomRequest};
pub use chat::{Chat, ChatBuilder, ChatClosed, FALLBACK_REPLY, SubmitError};
pub use conversation::{ConversationSnapshot, Message, Role};
pub use store::{ConversationStore, StoreEvent};
