//! # Application Layer
//!
//! Ports the connector layer implements, and the use cases that drive a
//! conversation through them.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
