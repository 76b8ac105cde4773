//! Render parameters, user slider deltas and the tag recording which
//! composition path produced the live parameters.

use serde::{Deserialize, Serialize};

pub const BRIGHTNESS_RANGE: (f64, f64) = (50.0, 200.0);
pub const CONTRAST_RANGE: (f64, f64) = (50.0, 200.0);
pub const SATURATE_RANGE: (f64, f64) = (50.0, 300.0);
pub const WARMTH_RANGE: (f64, f64) = (-75.0, 75.0);

pub const VARIANT_BRIGHTNESS_RANGE: (f64, f64) = (50.0, 150.0);
pub const VARIANT_CONTRAST_RANGE: (f64, f64) = (50.0, 150.0);
pub const VARIANT_SATURATE_RANGE: (f64, f64) = (50.0, 200.0);
pub const VARIANT_WARMTH_RANGE: (f64, f64) = (-50.0, 50.0);

pub const MANUAL_LIMIT: f64 = 50.0;

fn clamp(value: f64, (lo, hi): (f64, f64)) -> f64 {
    if value.is_nan() {
        return lo.max(0.0).min(hi);
    }
    value.clamp(lo, hi)
}

/// Final render parameters: percentages for brightness/contrast/saturate,
/// signed warmth.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    pub brightness: f64,
    pub contrast: f64,
    pub saturate: f64,
    pub warmth: f64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl FilterParams {
    pub const NEUTRAL: FilterParams = FilterParams {
        brightness: 100.0,
        contrast: 100.0,
        saturate: 100.0,
        warmth: 0.0,
    };

    pub fn new(brightness: f64, contrast: f64, saturate: f64, warmth: f64) -> Self {
        Self {
            brightness,
            contrast,
            saturate,
            warmth,
        }
    }

    /// Clamp to the live-preview ranges.
    pub fn clamped(self) -> Self {
        Self {
            brightness: clamp(self.brightness, BRIGHTNESS_RANGE),
            contrast: clamp(self.contrast, CONTRAST_RANGE),
            saturate: clamp(self.saturate, SATURATE_RANGE),
            warmth: clamp(self.warmth, WARMTH_RANGE),
        }
    }

    /// Clamp to the tighter ranges used for multi-capture variants.
    pub fn clamped_variant(self) -> Self {
        Self {
            brightness: clamp(self.brightness, VARIANT_BRIGHTNESS_RANGE),
            contrast: clamp(self.contrast, VARIANT_CONTRAST_RANGE),
            saturate: clamp(self.saturate, VARIANT_SATURATE_RANGE),
            warmth: clamp(self.warmth, VARIANT_WARMTH_RANGE),
        }
    }

    pub fn is_within_live_bounds(&self) -> bool {
        within(self.brightness, BRIGHTNESS_RANGE)
            && within(self.contrast, CONTRAST_RANGE)
            && within(self.saturate, SATURATE_RANGE)
            && within(self.warmth, WARMTH_RANGE)
    }

    pub fn is_within_variant_bounds(&self) -> bool {
        within(self.brightness, VARIANT_BRIGHTNESS_RANGE)
            && within(self.contrast, VARIANT_CONTRAST_RANGE)
            && within(self.saturate, VARIANT_SATURATE_RANGE)
            && within(self.warmth, VARIANT_WARMTH_RANGE)
    }

    pub fn offset(self, delta: &FilterDelta) -> Self {
        Self {
            brightness: self.brightness + delta.brightness,
            contrast: self.contrast + delta.contrast,
            saturate: self.saturate + delta.saturate,
            warmth: self.warmth + delta.warmth,
        }
    }

    pub fn subtract(self, delta: &FilterDelta) -> Self {
        Self {
            brightness: self.brightness - delta.brightness,
            contrast: self.contrast - delta.contrast,
            saturate: self.saturate - delta.saturate,
            warmth: self.warmth - delta.warmth,
        }
    }
}

fn within(value: f64, (lo, hi): (f64, f64)) -> bool {
    value >= lo && value <= hi
}

/// Additive change to a `FilterParams`, in the same units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterDelta {
    pub brightness: f64,
    pub contrast: f64,
    pub saturate: f64,
    pub warmth: f64,
}

impl FilterDelta {
    pub const ZERO: FilterDelta = FilterDelta {
        brightness: 0.0,
        contrast: 0.0,
        saturate: 0.0,
        warmth: 0.0,
    };

    pub const fn new(brightness: f64, contrast: f64, saturate: f64, warmth: f64) -> Self {
        Self {
            brightness,
            contrast,
            saturate,
            warmth,
        }
    }
}

/// User slider positions, each kept within -50..=50.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManualAdjustments {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub warmth: f64,
}

impl ManualAdjustments {
    pub fn new(brightness: f64, contrast: f64, saturation: f64, warmth: f64) -> Self {
        Self {
            brightness,
            contrast,
            saturation,
            warmth,
        }
        .clamped()
    }

    pub fn clamped(self) -> Self {
        let limit = (-MANUAL_LIMIT, MANUAL_LIMIT);
        Self {
            brightness: clamp(self.brightness, limit),
            contrast: clamp(self.contrast, limit),
            saturation: clamp(self.saturation, limit),
            warmth: clamp(self.warmth, limit),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Slider values as they are felt on top of an analysed or learned baseline.
    pub fn scaled(&self) -> FilterDelta {
        FilterDelta {
            brightness: self.brightness * 1.5,
            contrast: self.contrast * 1.5,
            saturate: self.saturation * 2.0,
            warmth: self.warmth * 1.5,
        }
    }

    pub fn unscaled(&self) -> FilterDelta {
        FilterDelta {
            brightness: self.brightness,
            contrast: self.contrast,
            saturate: self.saturation,
            warmth: self.warmth,
        }
    }
}

/// Which composition path last produced the live `FilterParams`.
///
/// The manual-slider scaling is a function of this tag alone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum FilterOrigin {
    #[default]
    ModeOnly,
    RegionAnalyzed,
    Learned,
}

impl FilterOrigin {
    pub fn manual_delta(&self, manual: &ManualAdjustments) -> FilterDelta {
        match self {
            FilterOrigin::ModeOnly => manual.unscaled(),
            FilterOrigin::RegionAnalyzed | FilterOrigin::Learned => manual.scaled(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOrigin::ModeOnly => "mode",
            FilterOrigin::RegionAnalyzed => "region",
            FilterOrigin::Learned => "learned",
        }
    }
}
