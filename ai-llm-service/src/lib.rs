//! Text-generation backends for the review bot.
//!
//! - [`config`]: provider kinds and env-driven model configs
//! - [`services`]: OpenAI and Anthropic HTTP clients
//! - [`generator`]: the [`TextGenerator`] seam and the [`LlmClient`] dispatcher
//! - [`error_handler`]: unified [`AiLlmError`]
//! - [`telemetry`]: tracing layer helpers shared with the binary

pub mod config;
pub mod error_handler;
pub mod generator;
pub mod services;
pub mod telemetry;

pub use error_handler::AiLlmError;
pub use generator::{LlmClient, TextGenerator};
