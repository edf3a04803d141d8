//! Payment verification rules
//!
//! Combines an on-chain transaction lookup with the business checks that
//! decide whether a payment settles an order: freshness, recipient, and
//! amount, applied in that order. The first failing check wins so the
//! counterpart always gets one actionable correction at a time.

use chrono::{DateTime, Duration, Utc};
use launchdesk_chain::{LookupResult, TransactionLookup};
use launchdesk_types::{
    Address, RejectReason, TransactionRecord, TxHash, Usdc, VerificationOutcome,
};
use tracing::info;

/// A payment older than this cannot settle an order
pub const FRESHNESS_WINDOW_MINUTES: i64 = 10;

/// Verifies payments against a treasury address
pub struct PaymentVerifier {
    lookup: TransactionLookup,
    treasury: Address,
}

impl PaymentVerifier {
    pub fn new(lookup: TransactionLookup, treasury: Address) -> Self {
        Self { lookup, treasury }
    }

    /// Verify that the given transaction settles an order at `price`.
    ///
    /// Input checks run before any network call; a missing hash or price
    /// is rejected without touching an explorer.
    pub async fn verify(&self, hash: &TxHash, price: Option<Usdc>) -> VerificationOutcome {
        if hash.is_empty() {
            return VerificationOutcome::rejected(RejectReason::MissingTxHash);
        }
        let price = match price {
            Some(p) => p,
            None => return VerificationOutcome::rejected(RejectReason::MissingPrice),
        };

        let record = match self.lookup.lookup(hash).await {
            LookupResult::Found(record) => record,
            LookupResult::Failed { reason } => {
                return VerificationOutcome::LookupFailed { reason }
            }
        };

        let outcome = check_record(&record, &self.treasury, price, Utc::now());
        if outcome.is_verified() {
            info!(
                "Payment of {} on {} verified for hash {}",
                record.amount, record.network, hash
            );
        }
        outcome
    }
}

/// Apply the business checks to an already-resolved transfer.
///
/// A timestamp ahead of `now` counts as fresh; explorer clocks and ours
/// are not guaranteed to agree within a block interval.
pub fn check_record(
    record: &TransactionRecord,
    treasury: &Address,
    price: Usdc,
    now: DateTime<Utc>,
) -> VerificationOutcome {
    let age = now - record.observed_at;
    // Compare full durations, not truncated minutes: 10m01s is stale
    if age > Duration::minutes(FRESHNESS_WINDOW_MINUTES) {
        return VerificationOutcome::rejected(RejectReason::Stale {
            age_minutes: age.num_minutes(),
        });
    }

    if &record.recipient != treasury {
        return VerificationOutcome::rejected(RejectReason::WrongRecipient {
            paid: record.amount,
            expected: treasury.clone(),
        });
    }

    if record.amount < price {
        return VerificationOutcome::rejected(RejectReason::Insufficient {
            paid: record.amount,
            shortfall: price.saturating_sub(record.amount),
        });
    }

    VerificationOutcome::Verified {
        amount: record.amount,
        recipient: record.recipient.clone(),
        observed_at: record.observed_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use launchdesk_chain::{
        ExplorerApi, ExplorerError, NetworkConfig, NetworkRegistry, RawBlock, RawTransaction,
    };
    use launchdesk_types::NetworkId;
    use std::sync::Arc;

    const TREASURY: &str = "0x140591903f35375aa78b01272882c2de3aefe21c";

    fn record(amount_units: u64, recipient: &str, age: Duration) -> TransactionRecord {
        TransactionRecord {
            network: NetworkId::Ethereum,
            amount: Usdc::from_units(amount_units),
            recipient: Address::new(recipient),
            observed_at: Utc::now() - age,
        }
    }

    fn treasury() -> Address {
        Address::new(TREASURY)
    }

    #[test]
    fn fresh_exact_payment_verifies() {
        let rec = record(15, TREASURY, Duration::minutes(3));
        let outcome = check_record(&rec, &treasury(), Usdc::from_units(15), Utc::now());
        assert!(outcome.is_verified());
    }

    #[test]
    fn overpayment_verifies() {
        let rec = record(20, TREASURY, Duration::minutes(1));
        let outcome = check_record(&rec, &treasury(), Usdc::from_units(15), Utc::now());
        assert!(outcome.is_verified());
    }

    #[test]
    fn stale_payment_is_rejected_before_other_checks() {
        // Both stale and underpaid; staleness must win.
        let rec = record(1, "0xother", Duration::minutes(15));
        let outcome = check_record(&rec, &treasury(), Usdc::from_units(15), Utc::now());
        assert_eq!(
            outcome,
            VerificationOutcome::rejected(RejectReason::Stale { age_minutes: 15 })
        );
    }

    #[test]
    fn seconds_past_the_window_are_stale() {
        // 10m30s old: whole-minute truncation would call this fresh
        let rec = record(15, TREASURY, Duration::seconds(630));
        let outcome = check_record(&rec, &treasury(), Usdc::from_units(15), Utc::now());
        assert_eq!(
            outcome,
            VerificationOutcome::rejected(RejectReason::Stale { age_minutes: 10 })
        );
    }

    #[test]
    fn exactly_ten_minutes_is_fresh() {
        let now = Utc::now();
        let rec = TransactionRecord {
            network: NetworkId::Ethereum,
            amount: Usdc::from_units(15),
            recipient: treasury(),
            observed_at: now - Duration::minutes(10),
        };
        let outcome = check_record(&rec, &treasury(), Usdc::from_units(15), now);
        assert!(outcome.is_verified());
    }

    #[test]
    fn future_timestamp_counts_as_fresh() {
        let rec = record(15, TREASURY, Duration::minutes(-2));
        let outcome = check_record(&rec, &treasury(), Usdc::from_units(15), Utc::now());
        assert!(outcome.is_verified());
    }

    #[test]
    fn wrong_recipient_is_rejected() {
        let rec = record(15, "0x000000000000000000000000000000000000beef", Duration::zero());
        let outcome = check_record(&rec, &treasury(), Usdc::from_units(15), Utc::now());
        assert_eq!(
            outcome,
            VerificationOutcome::rejected(RejectReason::WrongRecipient {
                paid: Usdc::from_units(15),
                expected: treasury(),
            })
        );
    }

    #[test]
    fn underpayment_reports_the_shortfall() {
        let rec = record(10, TREASURY, Duration::zero());
        let outcome = check_record(&rec, &treasury(), Usdc::from_units(15), Utc::now());
        assert_eq!(
            outcome,
            VerificationOutcome::rejected(RejectReason::Insufficient {
                paid: Usdc::from_units(10),
                shortfall: Usdc::from_units(5),
            })
        );
    }

    #[test]
    fn recipient_comparison_ignores_hex_case() {
        let rec = record(15, &TREASURY.to_uppercase(), Duration::zero());
        let outcome = check_record(&rec, &treasury(), Usdc::from_units(15), Utc::now());
        assert!(outcome.is_verified());
    }

    /// Explorer double that knows a single fresh transfer to the treasury
    struct OneTransferExplorer;

    #[async_trait]
    impl ExplorerApi for OneTransferExplorer {
        async fn transaction_by_hash(
            &self,
            network: &NetworkConfig,
            _hash: &TxHash,
        ) -> Result<Option<RawTransaction>, ExplorerError> {
            if network.id != NetworkId::Ethereum {
                return Ok(None);
            }
            Ok(Some(RawTransaction {
                to: Some(network.token_contract.to_string()),
                input: format!(
                    "0xa9059cbb{:0>64}{:064x}",
                    TREASURY.trim_start_matches("0x"),
                    15_000_000u128
                ),
                block_number: "0x10".to_string(),
            }))
        }

        async fn block_by_number(
            &self,
            _network: &NetworkConfig,
            _tag: &str,
        ) -> Result<RawBlock, ExplorerError> {
            Ok(RawBlock {
                timestamp: format!("{:#x}", Utc::now().timestamp()),
            })
        }
    }

    fn verifier() -> PaymentVerifier {
        let registry = NetworkRegistry::new(vec![NetworkConfig {
            id: NetworkId::Ethereum,
            api_url: "http://eth".to_string(),
            api_key: String::new(),
            token_contract: Address::new("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"),
        }]);
        let lookup = TransactionLookup::new(registry, Arc::new(OneTransferExplorer));
        PaymentVerifier::new(lookup, treasury())
    }

    #[tokio::test]
    async fn empty_hash_short_circuits() {
        let outcome = verifier()
            .verify(&TxHash::new("  "), Some(Usdc::from_units(15)))
            .await;
        assert_eq!(
            outcome,
            VerificationOutcome::rejected(RejectReason::MissingTxHash)
        );
    }

    #[tokio::test]
    async fn missing_price_short_circuits() {
        let outcome = verifier().verify(&TxHash::new("0xabc"), None).await;
        assert_eq!(
            outcome,
            VerificationOutcome::rejected(RejectReason::MissingPrice)
        );
    }

    #[tokio::test]
    async fn end_to_end_verification_through_lookup() {
        let outcome = verifier()
            .verify(&TxHash::new("0xabc"), Some(Usdc::from_units(15)))
            .await;
        assert!(outcome.is_verified(), "got {:?}", outcome);
    }
}
