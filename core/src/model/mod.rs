//! Model layer
//!
//! Conversation message types and the streaming chat client for Ollama.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ModelService, NullSink, OllamaClient, TokenSink};
pub use error::{ModelError, Result};
pub use types::{ChatOutcome, Message, ModelOptions, Role};
