//! Error types for LaunchDesk
//!
//! All failures are explicit typed outcomes; nothing in the core is
//! allowed to crash the process on a bad transaction hash or an
//! unreachable network.

use thiserror::Error;

/// Result type for LaunchDesk operations
pub type Result<T> = std::result::Result<T, DeskError>;

/// LaunchDesk error types
#[derive(Debug, Clone, Error)]
pub enum DeskError {
    /// Caller supplied input that fails validation before any I/O
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    /// Transport failure talking to an external system
    #[error("Network error: {message}")]
    Network { message: String },

    /// Malformed data from an external system
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// Requirement extraction failed
    #[error("Extraction failed: {message}")]
    Extraction { message: String },

    /// The conversational engine failed
    #[error("Engine error: {message}")]
    Engine { message: String },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DeskError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
