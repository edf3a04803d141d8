//! Transaction lookup and payment verification outcomes
//!
//! Business-rule rejections are not errors: they are a normal negative
//! outcome and carry enough detail for the conversational layer to prompt
//! the counterpart correctly.

use crate::{Address, Usdc};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported networks, in lookup priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    Ethereum,
    Base,
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ethereum => write!(f, "ethereum"),
            Self::Base => write!(f, "base"),
        }
    }
}

/// A decoded token transfer, as observed on-chain. Ephemeral; produced by
/// transaction lookup and consumed by a single verification call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub network: NetworkId,
    pub amount: Usdc,
    pub recipient: Address,
    pub observed_at: DateTime<Utc>,
}

/// Why a payment was rejected. Variants are mutually exclusive and ranked
/// by the order the checks are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    /// No transaction hash supplied
    MissingTxHash,
    /// No expected price supplied
    MissingPrice,
    /// Transaction is older than the freshness window
    Stale { age_minutes: i64 },
    /// Paid to the wrong address
    WrongRecipient { paid: Usdc, expected: Address },
    /// Paid less than the quoted price
    Insufficient { paid: Usdc, shortfall: Usdc },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTxHash => write!(
                f,
                "Transaction hash empty. Please ask the user to provide a valid transaction hash."
            ),
            Self::MissingPrice => write!(f, "Price empty. Please input a valid price."),
            Self::Stale { .. } => write!(
                f,
                "The transaction was made more than 10 minutes ago. Please ask the user to \
                 make a new payment and send the transaction hash within 10 minutes after \
                 making the payment."
            ),
            Self::WrongRecipient { expected, .. } => write!(
                f,
                "The user has not paid to the correct address. Please ask the user to send \
                 the payment to the correct address, which is {}.",
                expected
            ),
            Self::Insufficient { paid, shortfall } => write!(
                f,
                "The user has not paid the full amount. The user has paid {}. Please ask \
                 the user to pay {}.",
                paid, shortfall
            ),
        }
    }
}

/// Result of verifying a payment transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VerificationOutcome {
    /// All checks passed
    Verified {
        amount: Usdc,
        recipient: Address,
        observed_at: DateTime<Utc>,
    },
    /// A business rule failed
    Rejected { reason: RejectReason },
    /// The transaction could not be located or decoded
    LookupFailed { reason: String },
}

impl VerificationOutcome {
    pub fn rejected(reason: RejectReason) -> Self {
        Self::Rejected { reason }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }
}
