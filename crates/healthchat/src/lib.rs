//! An out-of-the-box health chat that assembles the symptom analyzer, the
//! optional generative advisor and the doctor directory.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library to bring the chat into your own host apps.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod config;
pub mod render;
mod session;

pub use session::{AdvisorKind, Session, SessionBuilder};

/// Re-exports of [`healthchat_core`] crate.
pub mod core {
    pub use healthchat_core::*;
}
