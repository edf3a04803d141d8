//! Order records and conversation transcripts
//!
//! An `OrderRecord` is the structured snapshot of a session's commercial
//! intent. It is replaced wholesale on every successful extraction and
//! never merged field by field.

use crate::Usdc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The closed catalog of sellable services
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    NarrativeStrategy,
    AvatarDesign,
    MemeImages,
    MusicGeneration,
    LaunchVideo,
    OnchainMinting,
}

impl ServiceType {
    /// Every catalog entry, in display order
    pub const ALL: [ServiceType; 6] = [
        ServiceType::NarrativeStrategy,
        ServiceType::AvatarDesign,
        ServiceType::MemeImages,
        ServiceType::MusicGeneration,
        ServiceType::LaunchVideo,
        ServiceType::OnchainMinting,
    ];

    /// The human label used on the wire by the conversational engine
    pub fn label(&self) -> &'static str {
        match self {
            Self::NarrativeStrategy => "token narrative & GTM strategy",
            Self::AvatarDesign => "avatar design",
            Self::MemeImages => "meme images",
            Self::MusicGeneration => "music generation",
            Self::LaunchVideo => "launch video",
            Self::OnchainMinting => "on-chain minting",
        }
    }

    /// Parse a service from either its snake_case id or its human label.
    /// Returns `None` for anything outside the catalog.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "narrative_strategy" | "token narrative & gtm strategy" => {
                Some(Self::NarrativeStrategy)
            }
            "avatar_design" | "avatar design" => Some(Self::AvatarDesign),
            "meme_images" | "meme images" => Some(Self::MemeImages),
            "music_generation" | "music generation" => Some(Self::MusicGeneration),
            "launch_video" | "launch video" => Some(Self::LaunchVideo),
            "onchain_minting" | "on-chain minting" => Some(Self::OnchainMinting),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Who produced a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Agent,
}

/// One transcript line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Agent,
            text: text.into(),
        }
    }
}

/// Structured snapshot of a session's commercial intent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Name of the token (or the word/concept the user likes)
    pub token_name: Option<String>,
    /// Target segment of the token
    pub target_segment: Option<String>,
    /// Core idea behind the token
    pub core_idea: Option<String>,
    /// What makes the token different from other meme tokens
    pub edge: Option<String>,
    /// Reference accounts, memes, or influencers the user vibes with
    pub references: Option<String>,
    /// Current development stage of the token
    pub stage: Option<String>,
    /// Requested services; duplicates collapse, order irrelevant
    pub services: BTreeSet<ServiceType>,
    /// Quoted package price, once determined
    pub price: Option<Usdc>,
    /// Set only after a verified payment against `price`
    pub paid: bool,
}
