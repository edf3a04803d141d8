//! Requirement extraction from conversation transcripts

use crate::{ChatCompletion, CompletionRequest, ExtractError, Result};
use launchdesk_types::{OrderRecord, ServiceType, Speaker, Turn, Usdc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

const SYSTEM_INSTRUCTION: &str = r#"You are a helpful assistant that parses the details of the user's requirements from the conversation history.
Given a conversation between a user and an agent, extract the details of the user's requirements:
- token_name: name of the token. Can be just a word/concept the user likes if they have no name in mind.
- target_segment: the target segment of the token.
- core_idea: the core idea behind the token (the user's Ideal Customer Profile).
- edge: the unique edge of the token; what makes it different from other meme tokens.
- references: reference accounts or profiles the user likes (X handles, memes, or influencers).
- stage: the current development stage of the token.
- services: a list of requested services. Each entry must be one of "token narrative & GTM strategy", "avatar design", "meme images", "music generation", "launch video", or "on-chain minting".
- price: price of the package in USDC as a number, or null if not determined yet.
- paid: payment status of the user; either true or false.

Return a single JSON object with exactly those keys. Use null for anything the conversation does not establish. Only return the JSON object. Do not include any other text."#;

/// The model's output shape. Absent fields default here, so a partial
/// answer never inherits values from an earlier record.
#[derive(Debug, Default, Deserialize)]
struct WireRecord {
    #[serde(default)]
    token_name: Option<String>,
    #[serde(default)]
    target_segment: Option<String>,
    #[serde(default)]
    core_idea: Option<String>,
    #[serde(default)]
    edge: Option<String>,
    #[serde(default)]
    references: Option<String>,
    #[serde(default)]
    stage: Option<String>,
    #[serde(default)]
    services: Vec<String>,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    paid: Option<serde_json::Value>,
}

/// Render a transcript as the alternating USER/AGENT lines the model sees
pub fn format_transcript(transcript: &[Turn]) -> String {
    transcript
        .iter()
        .map(|turn| match turn.speaker {
            Speaker::User => format!("USER: {}", turn.text),
            Speaker::Agent => format!("AGENT: {}", turn.text),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Stateless transcript-to-order-record extractor
pub struct RequirementExtractor {
    provider: Arc<dyn ChatCompletion>,
}

impl RequirementExtractor {
    pub fn new(provider: Arc<dyn ChatCompletion>) -> Self {
        Self { provider }
    }

    /// Extract a fresh `OrderRecord` from the full transcript.
    ///
    /// Malformed model output (non-JSON or schema mismatch) is a hard
    /// failure: it is not retried and must never fall back to a stale
    /// record.
    pub async fn extract(&self, transcript: &[Turn]) -> Result<OrderRecord> {
        let request = CompletionRequest::new(format_transcript(transcript))
            .with_system(SYSTEM_INSTRUCTION)
            .with_temperature(0.3)
            .with_json_mode();

        let content = self.provider.complete(request).await?;
        let record = parse_record(&content)?;
        info!(
            "Extracted order record: {} service(s), price {:?}",
            record.services.len(),
            record.price
        );
        Ok(record)
    }
}

fn parse_record(content: &str) -> Result<OrderRecord> {
    let wire: WireRecord =
        serde_json::from_str(content).map_err(|e| ExtractError::Malformed {
            message: e.to_string(),
        })?;

    let price = match wire.price {
        Some(value) => Some(Usdc::from_human(value).ok_or_else(|| ExtractError::Malformed {
            message: format!("price {} is not a non-negative number", value),
        })?),
        None => None,
    };

    Ok(OrderRecord {
        token_name: wire.token_name,
        target_segment: wire.target_segment,
        core_idea: wire.core_idea,
        edge: wire.edge,
        references: wire.references,
        stage: wire.stage,
        // Labels outside the catalog are not part of the schema; drop them
        services: wire
            .services
            .iter()
            .filter_map(|label| ServiceType::parse(label))
            .collect(),
        price,
        paid: parse_paid(wire.paid.as_ref()),
    })
}

/// The model is asked for a boolean but sometimes answers with the strings
/// 'true'/'false'; accept both.
fn parse_paid(value: Option<&serde_json::Value>) -> bool {
    match value {
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}
