//! Closed tool-command set and its executor
//!
//! The engine requests tools by name with free-form JSON arguments; this
//! module narrows that to a closed, typed command set before anything
//! executes. Unknown names and malformed arguments are errors, never
//! silently dropped calls.

use crate::engine::ToolInvocation;
use crate::{AgentError, Result};
use launchdesk_pricing::collect_services;
use launchdesk_types::{RejectReason, TxHash, Usdc, VerificationOutcome};
use launchdesk_verify::PaymentVerifier;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

pub const TOOL_DETERMINE_PRICE: &str = "determine_price";
pub const TOOL_CHECK_PAYMENT: &str = "check_payment";

/// Every tool the engine may request, fully typed
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCommand {
    DeterminePrice {
        services: Vec<String>,
    },
    CheckPayment {
        transaction_hash: TxHash,
        /// Quoted price; absent or non-positive quotes are rejected later
        price: Option<Usdc>,
    },
}

#[derive(Deserialize)]
struct DeterminePriceArgs {
    #[serde(default)]
    services: Vec<String>,
}

#[derive(Deserialize)]
struct CheckPaymentArgs {
    #[serde(default)]
    transaction_hash: String,
    price: Option<f64>,
}

impl ToolCommand {
    /// Narrow an engine invocation to a typed command
    pub fn parse(invocation: &ToolInvocation) -> Result<Self> {
        match invocation.name.as_str() {
            TOOL_DETERMINE_PRICE => {
                let args: DeterminePriceArgs = parse_args(invocation)?;
                Ok(Self::DeterminePrice {
                    services: args.services,
                })
            }
            TOOL_CHECK_PAYMENT => {
                let args: CheckPaymentArgs = parse_args(invocation)?;
                Ok(Self::CheckPayment {
                    transaction_hash: TxHash::new(args.transaction_hash),
                    price: args
                        .price
                        .and_then(Usdc::from_human)
                        .filter(|p| !p.is_zero()),
                })
            }
            other => Err(AgentError::UnknownTool {
                name: other.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DeterminePrice { .. } => TOOL_DETERMINE_PRICE,
            Self::CheckPayment { .. } => TOOL_CHECK_PAYMENT,
        }
    }
}

fn parse_args<T: for<'de> Deserialize<'de>>(invocation: &ToolInvocation) -> Result<T> {
    serde_json::from_value(invocation.arguments.clone()).map_err(|e| {
        AgentError::InvalidArguments {
            tool: invocation.name.clone(),
            message: e.to_string(),
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    Done,
    Failed,
}

/// What goes back to the engine: a status, a message it can phrase to the
/// user, and a structured payload the caller can act on directly.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolReply {
    pub status: ToolStatus,
    pub message: String,
    pub data: Value,
}

impl ToolReply {
    fn done(message: impl Into<String>, data: Value) -> Self {
        Self {
            status: ToolStatus::Done,
            message: message.into(),
            data,
        }
    }

    fn failed(message: impl Into<String>, data: Value) -> Self {
        Self {
            status: ToolStatus::Failed,
            message: message.into(),
            data,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == ToolStatus::Done
    }
}

/// Executes typed tool commands against the pricing table and the verifier
pub struct ToolExecutor {
    verifier: PaymentVerifier,
}

impl ToolExecutor {
    pub fn new(verifier: PaymentVerifier) -> Self {
        Self { verifier }
    }

    pub async fn execute(&self, command: ToolCommand) -> ToolReply {
        match command {
            ToolCommand::DeterminePrice { services } => self.determine_price(&services),
            ToolCommand::CheckPayment {
                transaction_hash,
                price,
            } => self.check_payment(&transaction_hash, price).await,
        }
    }

    fn determine_price(&self, services: &[String]) -> ToolReply {
        let selected = collect_services(services);
        if selected.is_empty() {
            return ToolReply::failed("No services provided. Please input services.", json!({}));
        }

        let price = match launchdesk_pricing::price(&selected) {
            Ok(price) => price,
            Err(e) => return ToolReply::failed(e.to_string(), json!({})),
        };

        let labels: Vec<&str> = selected.iter().map(|s| s.label()).collect();
        info!("Priced {:?} at {}", labels, price);
        ToolReply::done(
            format!("The price of the services is {}.", price),
            json!({ "services": labels, "price": price.to_human() }),
        )
    }

    async fn check_payment(&self, hash: &TxHash, price: Option<Usdc>) -> ToolReply {
        match self.verifier.verify(hash, price).await {
            VerificationOutcome::Verified { amount, .. } => ToolReply::done(
                format!("The user has paid {} for the product.", amount),
                json!({
                    "paid": true,
                    "txn_value": amount.to_human(),
                    "product_price": price.map(|p| p.to_human()),
                }),
            ),
            VerificationOutcome::Rejected { reason } => {
                let data = match &reason {
                    RejectReason::WrongRecipient { paid, .. }
                    | RejectReason::Insufficient { paid, .. } => json!({
                        "paid": false,
                        "txn_value": paid.to_human(),
                        "product_price": price.map(|p| p.to_human()),
                    }),
                    _ => json!({ "paid": false }),
                };
                ToolReply::failed(reason.to_string(), data)
            }
            VerificationOutcome::LookupFailed { reason } => ToolReply::failed(
                format!(
                    "Transaction not found or error. Please input a valid transaction hash. \
                     Error: {}",
                    reason
                ),
                json!({ "paid": false }),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(name: &str, arguments: Value) -> ToolInvocation {
        ToolInvocation {
            name: name.to_string(),
            arguments,
        }
    }

    #[test]
    fn determine_price_arguments_parse() {
        let command = ToolCommand::parse(&invocation(
            TOOL_DETERMINE_PRICE,
            json!({ "services": ["avatar design", "meme images"] }),
        ))
        .unwrap();
        assert_eq!(
            command,
            ToolCommand::DeterminePrice {
                services: vec!["avatar design".to_string(), "meme images".to_string()],
            }
        );
    }

    #[test]
    fn check_payment_arguments_parse_and_normalize() {
        let command = ToolCommand::parse(&invocation(
            TOOL_CHECK_PAYMENT,
            json!({ "transaction_hash": "0xABC", "price": 15 }),
        ))
        .unwrap();
        assert_eq!(
            command,
            ToolCommand::CheckPayment {
                transaction_hash: TxHash::new("0xABC"),
                price: Some(Usdc::from_units(15)),
            }
        );
    }

    #[test]
    fn zero_or_negative_quotes_count_as_missing() {
        for bad in [json!(0), json!(-3.5)] {
            let command = ToolCommand::parse(&invocation(
                TOOL_CHECK_PAYMENT,
                json!({ "transaction_hash": "0xabc", "price": bad }),
            ))
            .unwrap();
            assert!(matches!(
                command,
                ToolCommand::CheckPayment { price: None, .. }
            ));
        }
    }

    #[test]
    fn unknown_tool_names_are_rejected() {
        let err = ToolCommand::parse(&invocation("transfer_funds", json!({}))).unwrap_err();
        assert!(matches!(err, AgentError::UnknownTool { name } if name == "transfer_funds"));
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        let err = ToolCommand::parse(&invocation(
            TOOL_DETERMINE_PRICE,
            json!({ "services": "avatar design" }),
        ))
        .unwrap_err();
        assert!(matches!(err, AgentError::InvalidArguments { tool, .. } if tool == TOOL_DETERMINE_PRICE));
    }
}
