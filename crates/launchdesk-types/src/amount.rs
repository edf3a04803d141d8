//! Settlement-token amounts with 6-decimal precision
//!
//! LaunchDesk settles in a single USDC-like stablecoin with 6 decimals.
//! Amounts are fixed-point `u128` micro-units so that amounts decoded
//! from raw on-chain integers never lose precision or go negative.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal precision of the settlement token
pub const USDC_DECIMALS: u32 = 6;

/// Micro-units per whole token
const MICRO: u128 = 1_000_000;

/// A non-negative settlement-token amount in micro-units
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Usdc {
    micro: u128,
}

impl Usdc {
    /// Zero amount
    pub const ZERO: Usdc = Usdc { micro: 0 };

    /// From raw on-chain units (the token's smallest denomination)
    pub fn from_micro(micro: u128) -> Self {
        Self { micro }
    }

    /// From a whole number of tokens
    pub fn from_units(units: u64) -> Self {
        Self {
            micro: units as u128 * MICRO,
        }
    }

    /// From a human-readable value; returns `None` for negative or
    /// non-finite input
    pub fn from_human(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        Some(Self {
            micro: (value * MICRO as f64).round() as u128,
        })
    }

    /// Raw micro-units
    pub fn micro(&self) -> u128 {
        self.micro
    }

    /// Human-readable value
    pub fn to_human(&self) -> f64 {
        self.micro as f64 / MICRO as f64
    }

    pub fn is_zero(&self) -> bool {
        self.micro == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.micro.checked_add(other.micro).map(|micro| Self { micro })
    }

    /// Difference, clamped at zero (shortfall arithmetic)
    pub fn saturating_sub(self, other: Self) -> Self {
        Self {
            micro: self.micro.saturating_sub(other.micro),
        }
    }
}

impl fmt::Display for Usdc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = self.micro / MICRO;
        let frac = self.micro % MICRO;
        if frac == 0 {
            write!(f, "{} USDC", units)
        } else {
            let digits = format!("{:06}", frac);
            write!(f, "{}.{} USDC", units, digits.trim_end_matches('0'))
        }
    }
}
