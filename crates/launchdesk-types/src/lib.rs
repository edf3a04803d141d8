//! LaunchDesk Types - Canonical domain types
//!
//! Shared by every other launchdesk crate. This crate has no dependencies
//! on the rest of the workspace so that the domain vocabulary (amounts,
//! addresses, order records, verification outcomes) stays in one place.

pub mod address;
pub mod amount;
pub mod error;
pub mod order;
pub mod outcome;

pub use address::{Address, TxHash};
pub use amount::{Usdc, USDC_DECIMALS};
pub use error::{DeskError, Result};
pub use order::{OrderRecord, ServiceType, Speaker, Turn};
pub use outcome::{NetworkId, RejectReason, TransactionRecord, VerificationOutcome};
