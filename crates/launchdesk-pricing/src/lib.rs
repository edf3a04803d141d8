//! LaunchDesk Pricing - Deterministic catalog pricing
//!
//! A pure, total mapping from a requested service set to a package price.
//! Requesting the complete catalog earns the flat bundle price instead of
//! the additive total.

use launchdesk_types::{DeskError, Result, ServiceType, Usdc};
use std::collections::BTreeSet;
use tracing::info;

/// Flat price when the full six-service catalog is requested
pub const BUNDLE_PRICE: u64 = 50;

/// Fixed unit price of one catalog service, in whole settlement tokens
pub fn unit_price(service: ServiceType) -> u64 {
    match service {
        ServiceType::NarrativeStrategy => 10,
        ServiceType::AvatarDesign => 10,
        ServiceType::MemeImages => 5,
        ServiceType::MusicGeneration => 5,
        ServiceType::LaunchVideo => 20,
        ServiceType::OnchainMinting => 10,
    }
}

/// Price a requested service set.
///
/// The empty set is an error, not a free order: it signals that no
/// services were specified at all.
pub fn price(services: &BTreeSet<ServiceType>) -> Result<Usdc> {
    if services.is_empty() {
        return Err(DeskError::invalid_input(
            "services",
            "no services provided",
        ));
    }

    let total = if services.len() == ServiceType::ALL.len() {
        BUNDLE_PRICE
    } else {
        services.iter().map(|s| unit_price(*s)).sum()
    };

    let amount = Usdc::from_units(total);
    info!("Priced {} service(s) at {}", services.len(), amount);
    Ok(amount)
}

/// Collect raw service labels from the wire into a catalog set.
/// Duplicates collapse; labels outside the catalog are dropped.
pub fn collect_services(labels: &[String]) -> BTreeSet<ServiceType> {
    labels
        .iter()
        .filter_map(|label| ServiceType::parse(label))
        .collect()
}
