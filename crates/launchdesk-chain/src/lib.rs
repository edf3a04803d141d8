//! LaunchDesk Chain - explorer access and transaction lookup
//!
//! Resolves a transaction hash to a decoded token transfer by querying the
//! supported networks' explorers in fixed priority order. Fallback across
//! networks is strictly sequential: each network is tried at most once per
//! lookup, and the first success wins.

pub mod decode;
pub mod explorer;
pub mod lookup;
pub mod registry;

pub use decode::{decode_transfer, DecodeError};
pub use explorer::{ExplorerApi, ExplorerError, HttpExplorer, RawBlock, RawTransaction};
pub use lookup::{LookupResult, TransactionLookup};
pub use registry::{NetworkConfig, NetworkRegistry};
