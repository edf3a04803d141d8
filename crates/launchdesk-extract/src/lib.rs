//! LaunchDesk Extract - structured requirement extraction
//!
//! Turns a raw conversation transcript into an `OrderRecord` with a single
//! structured-output completion call. Extraction is stateless per call: it
//! operates purely on the transcript text, and fields the model does not
//! return fall back to null/empty defaults, never to a previous record.

mod extractor;
mod provider;

pub use extractor::{format_transcript, RequirementExtractor};
pub use provider::{ChatCompletion, CompletionRequest, GroqConfig, GroqProvider};

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Request failed: {message}")]
    RequestFailed { message: String },

    #[error("Malformed extraction output: {message}")]
    Malformed { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
