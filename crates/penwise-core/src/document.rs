//! Documents and per-user suggestion feedback, as persisted by the store.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::suggestion::SuggestionKind;

/// A user's document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_id: String,
}

impl Document {
    /// A new, empty document owned by `owner_id`.
    pub fn new(owner_id: &str, title: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: String::new(),
            created_at: now,
            updated_at: now,
            owner_id: owner_id.to_string(),
        }
    }

    /// Apply a partial update and bump `updated_at`.
    pub fn apply_update(&mut self, update: &DocumentUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(content) = &update.content {
            self.content = content.clone();
        }
        self.updated_at = Utc::now();
    }
}

/// Partial field update for [`Document`]; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl DocumentUpdate {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            title: None,
            content: Some(content.into()),
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// Accept/reject counts for one suggestion kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindFeedback {
    pub accepted: u32,
    pub rejected: u32,
}

impl KindFeedback {
    pub fn total(&self) -> u32 {
        self.accepted + self.rejected
    }

    /// Share of accepted suggestions in `[0, 1]`, or `None` with no samples.
    pub fn acceptance_rate(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            n => Some(self.accepted as f64 / n as f64),
        }
    }
}

/// A user's history of applying or dismissing suggestions, per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackStats {
    #[serde(default)]
    pub kinds: BTreeMap<SuggestionKind, KindFeedback>,
}

impl FeedbackStats {
    pub fn record_accepted(&mut self, kind: SuggestionKind) {
        self.kinds.entry(kind).or_default().accepted += 1;
    }

    pub fn record_rejected(&mut self, kind: SuggestionKind) {
        self.kinds.entry(kind).or_default().rejected += 1;
    }

    pub fn get(&self, kind: SuggestionKind) -> KindFeedback {
        self.kinds.get(&kind).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.values().all(|k| k.total() == 0)
    }
}
