//! Capture-session data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FilterOrigin, FilterParams, ManualAdjustments};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    Idle,
    Live,
    /// Variant generation in progress; sampling and rendering are suspended.
    MultiCapture,
    Closed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "Idle",
            SessionStatus::Live => "Live",
            SessionStatus::MultiCapture => "MultiCapture",
            SessionStatus::Closed => "Closed",
        }
    }
}

/// Frozen filter state attached to a captured image so it can be re-applied
/// elsewhere. Also the shape persisted for captures and variant sets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSnapshot {
    pub id: String,
    pub session_id: String,
    pub record_id: Option<String>,
    pub variant: Option<String>,
    pub mode: String,
    pub origin: FilterOrigin,
    pub filters: FilterParams,
    pub manual_adjustments: ManualAdjustments,
    pub liked: bool,
    pub taken_at: DateTime<Utc>,
}

/// Live parameters published to the preview renderer on every display tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreviewFrame {
    pub filters: FilterParams,
    pub origin: FilterOrigin,
    pub css: String,
    pub rendered_at: DateTime<Utc>,
}
