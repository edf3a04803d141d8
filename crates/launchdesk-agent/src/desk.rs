//! Per-message orchestration
//!
//! `SalesDesk` ties the session store, the conversational engine, the
//! requirement extractor, and the tool executor together. Each inbound
//! message is one pass: advance the engine, record both transcript lines
//! in arrival order, execute at most one tool, and re-extract the order
//! record exactly when a tool ran.

use crate::engine::ChatEngine;
use crate::tools::{ToolCommand, ToolExecutor, ToolReply};
use crate::Result;
use launchdesk_extract::RequirementExtractor;
use launchdesk_session::SessionStore;
use launchdesk_types::Speaker;
use std::sync::Arc;
use tracing::info;

/// What the caller gets back for one inbound message
#[derive(Debug, Clone)]
pub struct DeskReply {
    pub reply: String,
    pub is_finished: bool,
    pub tool_reply: Option<ToolReply>,
}

pub struct SalesDesk {
    store: SessionStore,
    engine: Arc<dyn ChatEngine>,
    extractor: RequirementExtractor,
    tools: ToolExecutor,
}

impl SalesDesk {
    pub fn new(
        engine: Arc<dyn ChatEngine>,
        extractor: RequirementExtractor,
        tools: ToolExecutor,
    ) -> Self {
        Self {
            store: SessionStore::new(),
            engine,
            extractor,
            tools,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Handle one inbound partner message end to end.
    ///
    /// The partner's session lock is held for the whole
    /// engine/append/tool/extraction sequence, so at most one message per
    /// partner is in flight and transcript lines land in arrival order.
    /// Other partners' sessions have their own locks and never wait.
    pub async fn handle_message(
        &self,
        partner_id: &str,
        partner_name: &str,
        message: &str,
    ) -> Result<DeskReply> {
        let session = self.store.get_or_create(partner_id, partner_name).await;
        let mut session = session.lock().await;

        let conversation = match &session.engine_conversation {
            Some(handle) => handle.clone(),
            None => {
                let handle = self
                    .engine
                    .create_conversation(partner_id, partner_name)
                    .await?;
                session.engine_conversation = Some(handle.clone());
                handle
            }
        };

        let turn = self.engine.advance(&conversation, message).await?;
        session.append_turn(Speaker::User, message);
        session.append_turn(Speaker::Agent, turn.reply.as_str());

        let mut tool_reply = None;
        if let Some(invocation) = &turn.tool_invocation {
            let command = ToolCommand::parse(invocation)?;
            let quoted_price = match &command {
                ToolCommand::CheckPayment { price, .. } => *price,
                ToolCommand::DeterminePrice { .. } => None,
            };
            info!("Partner {} requested tool {}", partner_id, command.name());

            let reply = self.tools.execute(command).await;

            // A tool invocation is the only trigger for re-extraction; the
            // fresh record replaces the stored one wholesale.
            let record = self.extractor.extract(&session.transcript).await?;
            session.set_order_record(record);

            if reply.is_done() {
                if let Some(price) = quoted_price {
                    session.mark_paid(price);
                }
            }
            tool_reply = Some(reply);
        }

        Ok(DeskReply {
            reply: turn.reply,
            is_finished: turn.is_finished,
            tool_reply,
        })
    }
}
