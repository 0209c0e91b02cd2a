// src/presence/mod.rs — Chat backend contract: specialist presence + live chats
//
// The backend itself lives elsewhere. This module defines the data it hands
// us and the two traits the rest of the crate talks to.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Specialist ───────────────────────────────────────────────────

/// Presence state of a specialist as seen by customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialistStatus {
    Online,
    Offline,
    Busy,
    /// Anything the backend sends that we don't recognise.
    #[serde(other)]
    Unknown,
}

impl SpecialistStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialistStatus::Online => "online",
            SpecialistStatus::Offline => "offline",
            SpecialistStatus::Busy => "busy",
            SpecialistStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SpecialistStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialistProfile {
    pub id: String,
    pub name: String,
    pub status: SpecialistStatus,
    pub max_concurrent_chats: u32,
}

// ── Live chats ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveChatSession {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user_info: Option<UserInfo>,
    #[serde(default)]
    pub context: ChatContext,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatContext {
    /// Turns exchanged with the intake bot before a human took over.
    #[serde(default)]
    pub bot_transcript: Vec<BotTurn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotTurn {
    pub role: String,
    pub content: String,
}

impl LiveChatSession {
    pub const DEFAULT_CUSTOMER: &'static str = "Customer";
    pub const PREVIEW_IN_PROGRESS: &'static str = "Chat in progress";
    pub const PREVIEW_NEW: &'static str = "New chat request";

    /// Display name of the customer, or a generic label.
    pub fn customer_name(&self) -> &str {
        self.user_info
            .as_ref()
            .and_then(|u| u.name.as_deref())
            .unwrap_or(Self::DEFAULT_CUSTOMER)
    }

    /// One-line preview: a prior bot conversation means the chat is already underway.
    pub fn preview(&self) -> &'static str {
        if self.context.bot_transcript.is_empty() {
            Self::PREVIEW_NEW
        } else {
            Self::PREVIEW_IN_PROGRESS
        }
    }
}

// ── Errors ───────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum PresenceError {
    #[error("Backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend returned HTTP {code} for {endpoint}")]
    Status { endpoint: String, code: u16 },

    #[error("Could not decode backend response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Specialist '{0}' is not registered with the backend")]
    UnknownSpecialist(String),
}

// ── Traits ───────────────────────────────────────────────────────

/// Profile lookups and presence writes against the chat backend.
#[async_trait]
pub trait PresenceClient: Send + Sync {
    /// `Ok(None)` when the id does not resolve to a specialist.
    async fn get_specialist(&self, id: &str) -> Result<Option<SpecialistProfile>, PresenceError>;

    async fn update_specialist_status(
        &self,
        id: &str,
        status: SpecialistStatus,
    ) -> Result<(), PresenceError>;
}

/// Source of the live chats currently routed to a specialist.
#[async_trait]
pub trait ActiveChatsSource: Send + Sync {
    async fn active_chats(&self, specialist_id: &str)
        -> Result<Vec<LiveChatSession>, PresenceError>;
}
