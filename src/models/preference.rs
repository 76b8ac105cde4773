//! Preference record data model.
//!
//! A record is the unit of learning: the settings and render parameters a
//! user ended up with for a given scene context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ContextVector, FilterParams, ManualAdjustments, RecommendedSettings};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceRecord {
    pub id: String,
    pub context: ContextVector,
    pub settings: RecommendedSettings,
    pub filters: FilterParams,
    pub mode: String,
    pub manual_adjustments: ManualAdjustments,
    pub usage_count: u32,
    pub is_liked: bool,
    pub last_used: DateTime<Utc>,
}

/// Where the settings handed back by `PreferenceStore::apply` came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum PreferenceSource {
    /// No similar record; the heuristic baseline is returned untouched.
    Ai,
    /// A learned record matched. Its stored render is preferred outright.
    #[serde(rename_all = "camelCase")]
    User {
        record_id: String,
        filters: FilterParams,
        mode: String,
        manual_adjustments: ManualAdjustments,
        is_liked: bool,
        similarity: f64,
    },
}

impl PreferenceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceSource::Ai => "ai",
            PreferenceSource::User { .. } => "user",
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self, PreferenceSource::User { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppliedPreference {
    pub settings: RecommendedSettings,
    #[serde(flatten)]
    pub source: PreferenceSource,
}
