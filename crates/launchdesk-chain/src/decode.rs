//! ERC-20 transfer calldata decoding
//!
//! The payment transaction's input data carries a
//! `transfer(address recipient, uint256 amount)` call: a 4-byte selector
//! followed by two 32-byte words. Decoding failures are hard errors and
//! never degrade into a zero or partial amount.

use launchdesk_types::Address;
use thiserror::Error;

/// Keccak selector of `transfer(address,uint256)`
const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// selector + recipient word + amount word
const TRANSFER_CALLDATA_LEN: usize = 4 + 32 + 32;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Calldata too short: {len} bytes")]
    TooShort { len: usize },

    #[error("Not a transfer call: selector 0x{selector}")]
    WrongSelector { selector: String },

    #[error("Invalid hex in calldata: {message}")]
    InvalidHex { message: String },

    #[error("Transfer amount exceeds u128 range")]
    AmountOverflow,
}

/// Decode transfer calldata into `(recipient, raw amount)`.
/// The raw amount is in the token's smallest units.
pub fn decode_transfer(input: &str) -> Result<(Address, u128), DecodeError> {
    let bytes = hex::decode(input.trim().trim_start_matches("0x")).map_err(|e| {
        DecodeError::InvalidHex {
            message: e.to_string(),
        }
    })?;

    if bytes.len() < TRANSFER_CALLDATA_LEN {
        return Err(DecodeError::TooShort { len: bytes.len() });
    }

    if bytes[..4] != TRANSFER_SELECTOR {
        return Err(DecodeError::WrongSelector {
            selector: hex::encode(&bytes[..4]),
        });
    }

    // Address occupies the low 20 bytes of the first word
    let recipient = Address::new(format!("0x{}", hex::encode(&bytes[16..36])));

    // uint256 amount must fit u128; the high 16 bytes must be zero
    let amount_word = &bytes[36..68];
    if amount_word[..16].iter().any(|&b| b != 0) {
        return Err(DecodeError::AmountOverflow);
    }
    let mut amount: u128 = 0;
    for &b in &amount_word[16..] {
        amount = (amount << 8) | b as u128;
    }

    Ok((recipient, amount))
}
