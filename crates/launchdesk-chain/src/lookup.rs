//! Transaction lookup with ordered network fallback
//!
//! Each supported network gets exactly one attempt per lookup, producing
//! an explicit typed outcome; there is no retry and no parallel fan-out.
//! Transport failures and misses fall through to the next network, while
//! decode and timestamp failures abort the whole lookup rather than
//! surfacing a misleading amount.

use crate::decode::decode_transfer;
use crate::explorer::ExplorerApi;
use crate::registry::{NetworkConfig, NetworkRegistry};
use chrono::DateTime;
use launchdesk_types::{TransactionRecord, TxHash, Usdc};
use std::sync::Arc;
use tracing::{info, warn};

/// Aggregate result of one lookup call
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    Found(TransactionRecord),
    Failed { reason: String },
}

/// Typed outcome of a single network's attempt
enum NetworkAttempt {
    Found(TransactionRecord),
    /// The network does not know this hash
    NotFound,
    /// Known hash, but its direct recipient is not the token contract;
    /// the same hash may be a real transfer on another network
    NotTokenTransfer,
    /// Transport/HTTP failure; eligible for fallback
    Unreachable(String),
    /// The transaction exists but cannot be trusted (undecodable calldata
    /// or missing timestamp); aborts the whole lookup
    Invalid(String),
}

/// Resolves transaction hashes against the registry's networks
pub struct TransactionLookup {
    registry: NetworkRegistry,
    explorer: Arc<dyn ExplorerApi>,
}

impl TransactionLookup {
    pub fn new(registry: NetworkRegistry, explorer: Arc<dyn ExplorerApi>) -> Self {
        Self { registry, explorer }
    }

    /// Look up a hash across all supported networks in priority order
    pub async fn lookup(&self, hash: &TxHash) -> LookupResult {
        for network in self.registry.networks() {
            match self.attempt(network, hash).await {
                NetworkAttempt::Found(record) => {
                    info!("Transaction {} found on {}", hash, network.id);
                    return LookupResult::Found(record);
                }
                NetworkAttempt::NotFound => {}
                NetworkAttempt::NotTokenTransfer => {
                    warn!("Transaction {} on {} is not a token transfer", hash, network.id);
                }
                NetworkAttempt::Unreachable(message) => {
                    warn!("Explorer for {} unreachable: {}", network.id, message);
                }
                NetworkAttempt::Invalid(reason) => {
                    return LookupResult::Failed { reason };
                }
            }
        }

        LookupResult::Failed {
            reason: "transaction not found on any supported network".to_string(),
        }
    }

    async fn attempt(&self, network: &NetworkConfig, hash: &TxHash) -> NetworkAttempt {
        let tx = match self.explorer.transaction_by_hash(network, hash).await {
            Ok(Some(tx)) => tx,
            Ok(None) => return NetworkAttempt::NotFound,
            Err(e) => return NetworkAttempt::Unreachable(e.to_string()),
        };

        match tx.to.as_deref() {
            Some(to) if launchdesk_types::Address::new(to) == network.token_contract => {}
            _ => return NetworkAttempt::NotTokenTransfer,
        }

        let (recipient, raw_amount) = match decode_transfer(&tx.input) {
            Ok(decoded) => decoded,
            Err(e) => {
                return NetworkAttempt::Invalid(format!(
                    "failed to decode transfer on {}: {}",
                    network.id, e
                ))
            }
        };
        // The settlement token's 6 decimals are exactly Usdc micro-units
        let amount = Usdc::from_micro(raw_amount);

        let block = match self.explorer.block_by_number(network, &tx.block_number).await {
            Ok(block) => block,
            Err(e) => {
                return NetworkAttempt::Invalid(format!(
                    "failed to fetch block {} on {}: {}",
                    tx.block_number, network.id, e
                ))
            }
        };

        let observed_at = match parse_hex_timestamp(&block.timestamp) {
            Some(ts) => ts,
            None => {
                return NetworkAttempt::Invalid(format!(
                    "invalid block timestamp {:?} on {}",
                    block.timestamp, network.id
                ))
            }
        };

        NetworkAttempt::Found(TransactionRecord {
            network: network.id,
            amount,
            recipient,
            observed_at,
        })
    }
}

fn parse_hex_timestamp(hex_ts: &str) -> Option<DateTime<chrono::Utc>> {
    let seconds = i64::from_str_radix(hex_ts.trim().trim_start_matches("0x"), 16).ok()?;
    DateTime::from_timestamp(seconds, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::{ExplorerError, RawBlock, RawTransaction};
    use async_trait::async_trait;
    use chrono::Utc;
    use launchdesk_types::{Address, NetworkId};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CONTRACT_ETH: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
    const CONTRACT_BASE: &str = "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913";
    const RECIPIENT: &str = "140591903f35375aa78b01272882c2de3aefe21c";

    fn registry() -> NetworkRegistry {
        NetworkRegistry::new(vec![
            NetworkConfig {
                id: NetworkId::Ethereum,
                api_url: "http://eth".to_string(),
                api_key: String::new(),
                token_contract: Address::new(CONTRACT_ETH),
            },
            NetworkConfig {
                id: NetworkId::Base,
                api_url: "http://base".to_string(),
                api_key: String::new(),
                token_contract: Address::new(CONTRACT_BASE),
            },
        ])
    }

    fn transfer_tx(to: &str, amount_micro: u128) -> RawTransaction {
        RawTransaction {
            to: Some(to.to_string()),
            input: format!("0xa9059cbb{:0>64}{:064x}", RECIPIENT, amount_micro),
            block_number: "0x10".to_string(),
        }
    }

    /// Canned explorer: per-network transaction (or error), shared block
    #[derive(Default)]
    struct CannedExplorer {
        transactions: HashMap<NetworkId, RawTransaction>,
        unreachable: Vec<NetworkId>,
        block_timestamp: Option<String>,
        calls: AtomicUsize,
    }

    impl CannedExplorer {
        fn with_tx(mut self, network: NetworkId, tx: RawTransaction) -> Self {
            self.transactions.insert(network, tx);
            self
        }

        fn with_unreachable(mut self, network: NetworkId) -> Self {
            self.unreachable.push(network);
            self
        }

        fn with_block_timestamp(mut self, ts: &str) -> Self {
            self.block_timestamp = Some(ts.to_string());
            self
        }
    }

    #[async_trait]
    impl ExplorerApi for CannedExplorer {
        async fn transaction_by_hash(
            &self,
            network: &NetworkConfig,
            _hash: &TxHash,
        ) -> Result<Option<RawTransaction>, ExplorerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.unreachable.contains(&network.id) {
                return Err(ExplorerError::Network {
                    message: "timed out".to_string(),
                });
            }
            Ok(self.transactions.get(&network.id).cloned())
        }

        async fn block_by_number(
            &self,
            _network: &NetworkConfig,
            tag: &str,
        ) -> Result<RawBlock, ExplorerError> {
            match &self.block_timestamp {
                Some(ts) => Ok(RawBlock {
                    timestamp: ts.clone(),
                }),
                None => Err(ExplorerError::Protocol {
                    message: format!("no block {}", tag),
                }),
            }
        }
    }

    fn now_hex() -> String {
        format!("{:#x}", Utc::now().timestamp())
    }

    #[tokio::test]
    async fn absent_everywhere_is_a_miss() {
        let lookup = TransactionLookup::new(registry(), Arc::new(CannedExplorer::default()));
        let result = lookup.lookup(&TxHash::new("0xdead")).await;
        assert_eq!(
            result,
            LookupResult::Failed {
                reason: "transaction not found on any supported network".to_string()
            }
        );
    }

    #[tokio::test]
    async fn second_priority_network_is_reached() {
        let explorer = CannedExplorer::default()
            .with_tx(NetworkId::Base, transfer_tx(CONTRACT_BASE, 15_000_000))
            .with_block_timestamp(&now_hex());
        let lookup = TransactionLookup::new(registry(), Arc::new(explorer));

        match lookup.lookup(&TxHash::new("0xabc")).await {
            LookupResult::Found(record) => {
                assert_eq!(record.network, NetworkId::Base);
                assert_eq!(record.amount, Usdc::from_units(15));
                assert_eq!(record.recipient, Address::new(format!("0x{}", RECIPIENT)));
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_network_falls_through() {
        let explorer = CannedExplorer::default()
            .with_unreachable(NetworkId::Ethereum)
            .with_tx(NetworkId::Base, transfer_tx(CONTRACT_BASE, 1_000_000))
            .with_block_timestamp(&now_hex());
        let lookup = TransactionLookup::new(registry(), Arc::new(explorer));

        match lookup.lookup(&TxHash::new("0xabc")).await {
            LookupResult::Found(record) => assert_eq!(record.network, NetworkId::Base),
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn wrong_contract_falls_through_to_next_network() {
        // Same hash appears on Ethereum as an unrelated call and on Base
        // as a genuine transfer; the Base record must win.
        let explorer = CannedExplorer::default()
            .with_tx(
                NetworkId::Ethereum,
                transfer_tx("0x000000000000000000000000000000000000beef", 9),
            )
            .with_tx(NetworkId::Base, transfer_tx(CONTRACT_BASE, 2_500_000))
            .with_block_timestamp(&now_hex());
        let lookup = TransactionLookup::new(registry(), Arc::new(explorer));

        match lookup.lookup(&TxHash::new("0xabc")).await {
            LookupResult::Found(record) => {
                assert_eq!(record.network, NetworkId::Base);
                assert_eq!(record.amount, Usdc::from_micro(2_500_000));
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn undecodable_calldata_aborts_the_lookup() {
        let tx = RawTransaction {
            to: Some(CONTRACT_ETH.to_string()),
            input: "0xdeadbeef".to_string(),
            block_number: "0x10".to_string(),
        };
        let explorer = CannedExplorer::default()
            .with_tx(NetworkId::Ethereum, tx)
            .with_block_timestamp(&now_hex());
        let lookup = TransactionLookup::new(registry(), Arc::new(explorer));

        match lookup.lookup(&TxHash::new("0xabc")).await {
            LookupResult::Failed { reason } => assert!(reason.contains("decode")),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_block_aborts_the_lookup() {
        let explorer =
            CannedExplorer::default().with_tx(NetworkId::Ethereum, transfer_tx(CONTRACT_ETH, 1));
        let lookup = TransactionLookup::new(registry(), Arc::new(explorer));

        match lookup.lookup(&TxHash::new("0xabc")).await {
            LookupResult::Failed { reason } => assert!(reason.contains("block")),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn each_network_is_tried_at_most_once() {
        let explorer = Arc::new(
            CannedExplorer::default()
                .with_unreachable(NetworkId::Ethereum)
                .with_unreachable(NetworkId::Base),
        );
        let lookup = TransactionLookup::new(registry(), explorer.clone());

        let result = lookup.lookup(&TxHash::new("0xabc")).await;
        assert!(matches!(result, LookupResult::Failed { .. }));
        assert_eq!(explorer.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn hex_timestamps_parse() {
        let ts = parse_hex_timestamp("0x65a0f000").unwrap();
        assert_eq!(ts.timestamp(), 0x65a0f000);
        assert!(parse_hex_timestamp("not hex").is_none());
    }
}
