//! AI writing checks: prompt construction, an OpenAI-compatible completion
//! client, and tolerant parsing of the model's suggestion list.
//!
//! Failures never reach the editor as errors: [`RemoteChecker::check`]
//! degrades to an empty suggestion list and logs why.

mod checker;
mod client;
mod error;
pub mod parse;
pub mod prompt;

pub use checker::RemoteChecker;
pub use client::{
    AiConfig, CompletionProvider, CompletionRequest, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT,
    OpenAiClient,
};
pub use error::AiError;
