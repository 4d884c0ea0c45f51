//! Provider-neutral types for generative-text backends.
//!
//! The chat core only needs "text in, text out, or failure" from a
//! generative model. This crate pins that contract down as a small set of
//! request, response and error types so that the OpenAI-compatible
//! provider, the scripted test provider, and any future backend can be
//! swapped without touching the chat session.
//!
//! Types in this crate don't define any behavior, they are the
//! constraints that implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
