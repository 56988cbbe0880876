//! # Domain Layer
//!
//! Conversation models, the system prompt value, and the error taxonomy.
//! This layer is independent of external frameworks and infrastructure.

mod error;
pub mod models;

pub use error::DomainError;
pub use models::*;
