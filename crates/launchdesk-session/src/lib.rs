//! LaunchDesk Session Store - per-partner conversation state
//!
//! One session per counterpart identity, held in memory for the process
//! lifetime. The store is an explicit key-value abstraction with per-key
//! mutual exclusion: mutations of one partner's session are serialized by
//! that session's own mutex, while different partners never contend.
//!
//! There is no eviction; the map grows for as long as the process runs.

use chrono::{DateTime, Utc};
use launchdesk_types::{DeskError, OrderRecord, Result, Speaker, Turn, Usdc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

/// A partner's session: an explicit, serializable snapshot rather than an
/// ad-hoc attribute bag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Stable external identifier of the counterpart (primary key)
    pub partner_id: String,
    /// Display name supplied on first contact
    pub partner_name: String,
    /// Opaque handle into the external conversational engine's state
    pub engine_conversation: Option<String>,
    /// Ordered user/agent history; even index user, odd index agent
    pub transcript: Vec<Turn>,
    /// Latest extracted order record, replaced wholesale on extraction
    pub order: Option<OrderRecord>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    fn new(partner_id: impl Into<String>, partner_name: impl Into<String>) -> Self {
        Self {
            partner_id: partner_id.into(),
            partner_name: partner_name.into(),
            engine_conversation: None,
            transcript: Vec::new(),
            order: None,
            created_at: Utc::now(),
        }
    }

    /// Append one transcript line, preserving arrival order
    pub fn append_turn(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.transcript.push(Turn {
            speaker,
            text: text.into(),
        });
    }

    /// Replace the stored order record wholesale
    pub fn set_order_record(&mut self, record: OrderRecord) {
        self.order = Some(record);
    }

    /// Flip `paid` to true, but only when the stored record carries this
    /// exact price. Returns whether the flag was set.
    pub fn mark_paid(&mut self, price: Usdc) -> bool {
        match self.order.as_mut() {
            Some(order) if order.price == Some(price) => {
                order.paid = true;
                info!("Partner {} paid {}", self.partner_id, price);
                true
            }
            Some(order) => {
                warn!(
                    "Refusing to mark partner {} paid: verified {} but record holds {:?}",
                    self.partner_id, price, order.price
                );
                false
            }
            None => {
                warn!(
                    "Refusing to mark partner {} paid: no order record",
                    self.partner_id
                );
                false
            }
        }
    }
}

/// Keyed store of live sessions
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the session for `partner_id`, creating a fresh one (empty
    /// transcript, no order record) if the partner has not been seen.
    /// An existing session is returned unmodified.
    pub async fn get_or_create(
        &self,
        partner_id: &str,
        partner_name: &str,
    ) -> Arc<Mutex<Session>> {
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(partner_id) {
                return session.clone();
            }
        }

        let mut sessions = self.sessions.write().await;
        // A racing writer may have inserted between the locks
        sessions
            .entry(partner_id.to_string())
            .or_insert_with(|| {
                info!("Creating session for partner {}", partner_id);
                Arc::new(Mutex::new(Session::new(partner_id, partner_name)))
            })
            .clone()
    }

    async fn get(&self, partner_id: &str) -> Result<Arc<Mutex<Session>>> {
        self.sessions
            .read()
            .await
            .get(partner_id)
            .cloned()
            .ok_or_else(|| DeskError::internal(format!("no session for partner {}", partner_id)))
    }

    /// Append one transcript line under the session's own lock
    pub async fn append_turn(
        &self,
        partner_id: &str,
        speaker: Speaker,
        text: impl Into<String>,
    ) -> Result<()> {
        let session = self.get(partner_id).await?;
        session.lock().await.append_turn(speaker, text);
        Ok(())
    }

    /// Replace the stored order record under the session's own lock
    pub async fn set_order_record(&self, partner_id: &str, record: OrderRecord) -> Result<()> {
        let session = self.get(partner_id).await?;
        session.lock().await.set_order_record(record);
        Ok(())
    }

    /// `Session::mark_paid` under the session's own lock
    pub async fn mark_paid(&self, partner_id: &str, price: Usdc) -> Result<bool> {
        let session = self.get(partner_id).await?;
        let marked = session.lock().await.mark_paid(price);
        Ok(marked)
    }

    /// Snapshot of a partner's transcript
    pub async fn transcript(&self, partner_id: &str) -> Result<Vec<Turn>> {
        let session = self.get(partner_id).await?;
        let session = session.lock().await;
        Ok(session.transcript.clone())
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
