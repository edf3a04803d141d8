//! Etherscan-style explorer REST client
//!
//! Raw transactions and blocks come back through the `module=proxy`
//! envelope with hex-encoded numeric fields. Requests carry a bounded
//! timeout; a timeout is indistinguishable from any other transport
//! failure for fallback purposes.

use crate::registry::NetworkConfig;
use async_trait::async_trait;
use launchdesk_types::TxHash;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Explorer protocol error: {message}")]
    Protocol { message: String },
}

/// A raw transaction as returned by `eth_getTransactionByHash`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    /// Direct recipient; `None` for contract creation
    pub to: Option<String>,
    /// Calldata, hex-encoded
    pub input: String,
    /// Containing block, hex-encoded
    pub block_number: String,
}

/// A raw block as returned by `eth_getBlockByNumber`
#[derive(Debug, Clone, Deserialize)]
pub struct RawBlock {
    /// Unix seconds, hex-encoded
    pub timestamp: String,
}

/// Explorer access seam; tests substitute canned implementations
#[async_trait]
pub trait ExplorerApi: Send + Sync {
    /// Fetch a transaction by hash; `Ok(None)` when the network has no
    /// such transaction
    async fn transaction_by_hash(
        &self,
        network: &NetworkConfig,
        hash: &TxHash,
    ) -> Result<Option<RawTransaction>, ExplorerError>;

    /// Fetch the block identified by a hex block tag
    async fn block_by_number(
        &self,
        network: &NetworkConfig,
        tag: &str,
    ) -> Result<RawBlock, ExplorerError>;
}

#[derive(Deserialize)]
struct ProxyEnvelope<T> {
    result: Option<T>,
}

/// HTTP implementation over the explorer REST endpoints
pub struct HttpExplorer {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpExplorer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    async fn proxy_call<T: serde::de::DeserializeOwned>(
        &self,
        network: &NetworkConfig,
        params: &[(&str, &str)],
    ) -> Result<Option<T>, ExplorerError> {
        let response = self
            .client
            .get(&network.api_url)
            .query(&[("module", "proxy"), ("apikey", network.api_key.as_str())])
            .query(params)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ExplorerError::Network {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ExplorerError::Network {
                message: format!("HTTP {}", response.status()),
            });
        }

        let envelope: ProxyEnvelope<T> =
            response.json().await.map_err(|e| ExplorerError::Protocol {
                message: e.to_string(),
            })?;
        Ok(envelope.result)
    }
}

impl Default for HttpExplorer {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

#[async_trait]
impl ExplorerApi for HttpExplorer {
    async fn transaction_by_hash(
        &self,
        network: &NetworkConfig,
        hash: &TxHash,
    ) -> Result<Option<RawTransaction>, ExplorerError> {
        self.proxy_call(
            network,
            &[
                ("action", "eth_getTransactionByHash"),
                ("txhash", hash.as_str()),
            ],
        )
        .await
    }

    async fn block_by_number(
        &self,
        network: &NetworkConfig,
        tag: &str,
    ) -> Result<RawBlock, ExplorerError> {
        self.proxy_call(
            network,
            &[
                ("action", "eth_getBlockByNumber"),
                ("tag", tag),
                ("boolean", "true"),
            ],
        )
        .await?
        .ok_or_else(|| ExplorerError::Protocol {
            message: format!("explorer returned no block for tag {}", tag),
        })
    }
}
