//! # Connector Layer
//!
//! External integrations implementing application ports:
//! - Model provider (Anthropic Messages API over SSE, plus an offline mock)
//! - Reference content (the book, read from disk)
//! - Conversation storage (in-memory, per session)
//! - Presentation (console output)
//!
//! The `api` module wires them together behind the CLI.

pub mod adapter;
pub mod api;

pub use adapter::*;
