//! Prompt Garden: a prompt library stored in a Google Sheet.
//!
//! The binary entry point is `src/main.rs`; the library exposes the pieces
//! for integration tests.

mod bootstrap;
mod core;

pub mod annotation;
pub mod garden;
pub mod server;
pub mod sheets;

pub use bootstrap::logger;
pub use self::core::{config, error};
