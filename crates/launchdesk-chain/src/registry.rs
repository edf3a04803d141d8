//! Supported chain/explorer configurations
//!
//! A static, priority-ordered list. Ethereum mainnet is tried before Base;
//! a hash that exists on both settles on the first.

use launchdesk_types::{Address, DeskError, NetworkId, Result};

/// Canonical USDC contract on Ethereum mainnet
const USDC_ETHEREUM: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
/// Canonical USDC contract on Base mainnet
const USDC_BASE: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";

/// One supported network's explorer configuration
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub id: NetworkId,
    /// Etherscan-style REST endpoint
    pub api_url: String,
    pub api_key: String,
    /// The settlement token's contract on this network; a transaction
    /// whose direct recipient differs is not a token transfer here
    pub token_contract: Address,
}

/// Priority-ordered set of supported networks
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    networks: Vec<NetworkConfig>,
}

impl NetworkRegistry {
    pub fn new(networks: Vec<NetworkConfig>) -> Self {
        Self { networks }
    }

    /// Ethereum-then-Base mainnet registry with explorer keys from the
    /// environment (`ETHSCAN_API_KEY`, `BASESCAN_API_KEY`)
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let ethscan_key = std::env::var("ETHSCAN_API_KEY")
            .map_err(|_| DeskError::invalid_input("ETHSCAN_API_KEY", "not set"))?;
        let basescan_key = std::env::var("BASESCAN_API_KEY")
            .map_err(|_| DeskError::invalid_input("BASESCAN_API_KEY", "not set"))?;

        Ok(Self::new(vec![
            NetworkConfig {
                id: NetworkId::Ethereum,
                api_url: "https://api.etherscan.io/api".to_string(),
                api_key: ethscan_key,
                token_contract: Address::new(USDC_ETHEREUM),
            },
            NetworkConfig {
                id: NetworkId::Base,
                api_url: "https://api.basescan.org/api".to_string(),
                api_key: basescan_key,
                token_contract: Address::new(USDC_BASE),
            },
        ]))
    }

    /// Networks in lookup priority order
    pub fn networks(&self) -> &[NetworkConfig] {
        &self.networks
    }
}
