use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum WhiteBalance {
    Auto,
    Cloudy,
    Tungsten,
}

impl WhiteBalance {
    pub fn as_str(&self) -> &'static str {
        match self {
            WhiteBalance::Auto => "auto",
            WhiteBalance::Cloudy => "cloudy",
            WhiteBalance::Tungsten => "tungsten",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ContrastHint {
    Increase,
    Keep,
    Decrease,
}

/// Output of the heuristic generator. Recomputed every tick and never
/// persisted on its own, only as part of a preference record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedSettings {
    /// -1.5..=1.5
    pub exposure_ev: f64,
    pub white_balance: WhiteBalance,
    pub hdr_recommended: bool,
    /// 0..=100
    pub contrast: f64,
    pub contrast_hint: ContrastHint,
    /// 0..=100
    pub saturation: f64,
    /// -25..=25, before any user scaling
    pub warmth: f64,
    pub angle_suggestion: String,
    pub tips: Vec<String>,
}

impl Default for RecommendedSettings {
    fn default() -> Self {
        Self {
            exposure_ev: 0.0,
            white_balance: WhiteBalance::Auto,
            hdr_recommended: false,
            contrast: 55.0,
            contrast_hint: ContrastHint::Keep,
            saturation: 55.0,
            warmth: 5.0,
            angle_suggestion: "45°".into(),
            tips: Vec::new(),
        }
    }
}
