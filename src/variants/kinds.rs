use serde::{Deserialize, Serialize};

use crate::models::FilterDelta;

/// The five fixed looks rendered in multi-capture mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    Natural,
    Vibrant,
    Cool,
    Soft,
    Dramatic,
}

impl VariantKind {
    pub const ALL: [VariantKind; 5] = [
        VariantKind::Natural,
        VariantKind::Vibrant,
        VariantKind::Cool,
        VariantKind::Soft,
        VariantKind::Dramatic,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            VariantKind::Natural => "natural",
            VariantKind::Vibrant => "vibrant",
            VariantKind::Cool => "cool",
            VariantKind::Soft => "soft",
            VariantKind::Dramatic => "dramatic",
        }
    }

    /// Offset on brightness / contrast / saturation / warmth.
    pub fn delta(&self) -> FilterDelta {
        match self {
            VariantKind::Natural => FilterDelta::ZERO,
            VariantKind::Vibrant => FilterDelta::new(5.0, 10.0, 25.0, 15.0),
            VariantKind::Cool => FilterDelta::new(0.0, 5.0, -5.0, -20.0),
            VariantKind::Soft => FilterDelta::new(10.0, -15.0, -10.0, 5.0),
            VariantKind::Dramatic => FilterDelta::new(-5.0, 25.0, 15.0, 10.0),
        }
    }
}
