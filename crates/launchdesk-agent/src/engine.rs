//! Seam to the external conversational engine
//!
//! The engine owns personas, prompting, and when to call a tool; this side
//! only sees an opaque conversation handle and one turn at a time.

use crate::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A tool call the engine wants executed, as (name, json arguments)
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: Value,
}

/// One engine turn: the reply to relay, whether the conversation is over,
/// and at most one requested tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineTurn {
    pub reply: String,
    pub is_finished: bool,
    pub tool_invocation: Option<ToolInvocation>,
}

impl EngineTurn {
    pub fn reply_only(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            is_finished: false,
            tool_invocation: None,
        }
    }
}

#[async_trait]
pub trait ChatEngine: Send + Sync {
    /// Open a conversation for a partner; returns the engine's opaque
    /// handle to pass back on every subsequent turn.
    async fn create_conversation(&self, partner_id: &str, partner_name: &str) -> Result<String>;

    /// Feed one inbound message and get the engine's turn back
    async fn advance(&self, conversation: &str, message: &str) -> Result<EngineTurn>;
}
