//! LaunchDesk Agent - conversational-engine collaboration
//!
//! The conversational engine itself lives outside this workspace; this
//! crate speaks to it through the `ChatEngine` seam, executes the closed
//! set of tool commands it may request, and keeps the per-partner session
//! record in sync after every exchange.

pub mod desk;
pub mod engine;
pub mod tools;

use launchdesk_extract::ExtractError;
use launchdesk_types::DeskError;
use thiserror::Error;

pub use desk::{DeskReply, SalesDesk};
pub use engine::{ChatEngine, EngineTurn, ToolInvocation};
pub use tools::{ToolCommand, ToolExecutor, ToolReply, ToolStatus};

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("engine failure: {message}")]
    Engine { message: String },

    #[error("engine requested unknown tool {name:?}")]
    UnknownTool { name: String },

    #[error("invalid arguments for tool {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error(transparent)]
    Session(#[from] DeskError),

    #[error(transparent)]
    Extraction(#[from] ExtractError),
}

impl AgentError {
    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
