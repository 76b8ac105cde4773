//! Scene statistics and the similarity key derived from them.
//!
//! A `SceneSample` is recomputed on every sampling tick and is only kept
//! until it has been folded into a `ContextVector`.

use serde::{Deserialize, Serialize};

/// Ambient brightness must exceed the subject by this much to count as backlit.
pub const BACKLIT_MARGIN: f64 = 30.0;

/// Ambient brightness below this is treated as a low-light scene.
pub const LOW_LIGHT_THRESHOLD: f64 = 80.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorVibrancy {
    Low,
    Medium,
    High,
}

impl ColorVibrancy {
    pub fn from_saturation(saturation_pct: f64) -> Self {
        if saturation_pct < 25.0 {
            ColorVibrancy::Low
        } else if saturation_pct > 50.0 {
            ColorVibrancy::High
        } else {
            ColorVibrancy::Medium
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorVibrancy::Low => "low",
            ColorVibrancy::Medium => "medium",
            ColorVibrancy::High => "high",
        }
    }
}

impl Default for ColorVibrancy {
    fn default() -> Self {
        ColorVibrancy::Medium
    }
}

/// Compact numeric description of the lighting and colour around the subject.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SceneSample {
    /// Mean luma of the region of interest, 0..=255.
    pub brightness: f64,
    /// Mean luma of the downsampled whole frame, 0..=255.
    pub env_brightness: f64,
    /// Max minus min luma inside the region.
    pub dynamic_range: f64,
    /// Red-minus-blue bias, -100..=100.
    pub color_temp: f64,
    pub saturation_pct: f64,
    pub is_backlit: bool,
    pub is_low_light: bool,
    pub is_warm_tone: bool,
    pub is_cool_tone: bool,
    pub color_vibrancy: ColorVibrancy,
    pub dominant_hue_deg: f64,
}

impl Default for SceneSample {
    fn default() -> Self {
        Self {
            brightness: 128.0,
            env_brightness: 128.0,
            dynamic_range: 150.0,
            color_temp: 0.0,
            saturation_pct: 35.0,
            is_backlit: false,
            is_low_light: false,
            is_warm_tone: false,
            is_cool_tone: false,
            color_vibrancy: ColorVibrancy::Medium,
            dominant_hue_deg: 0.0,
        }
    }
}

impl SceneSample {
    pub fn backlit(region_brightness: f64, env_brightness: f64) -> bool {
        env_brightness > region_brightness + BACKLIT_MARGIN
    }

    pub fn low_light(env_brightness: f64) -> bool {
        env_brightness < LOW_LIGHT_THRESHOLD
    }
}

/// Similarity key combining scene statistics with the detected object label.
///
/// Immutable once built. Out-of-range values are a caller bug and panic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContextVector {
    pub object_type: Option<String>,
    pub brightness: f64,
    pub color_temp: f64,
    pub saturation_pct: f64,
    pub is_warm_tone: bool,
    pub is_cool_tone: bool,
    pub is_backlit: bool,
    pub is_low_light: bool,
}

impl ContextVector {
    pub fn from_sample(sample: &SceneSample, object_type: Option<&str>) -> Self {
        let object_type = object_type
            .map(|label| label.trim().to_lowercase())
            .filter(|label| !label.is_empty());

        let context = Self {
            object_type,
            brightness: sample.brightness,
            color_temp: sample.color_temp,
            saturation_pct: sample.saturation_pct,
            is_warm_tone: sample.is_warm_tone,
            is_cool_tone: sample.is_cool_tone,
            is_backlit: sample.is_backlit,
            is_low_light: sample.is_low_light,
        };
        context.assert_well_formed();
        context
    }

    /// True when every numeric field is finite and in the sampler's domain.
    pub fn is_well_formed(&self) -> bool {
        self.brightness.is_finite()
            && (0.0..=255.0).contains(&self.brightness)
            && self.color_temp.is_finite()
            && (-100.0..=100.0).contains(&self.color_temp)
            && self.saturation_pct.is_finite()
            && (0.0..=100.0).contains(&self.saturation_pct)
    }

    /// Panics when a field is outside the domain the sampler can produce.
    pub fn assert_well_formed(&self) {
        assert!(
            self.brightness.is_finite() && (0.0..=255.0).contains(&self.brightness),
            "context brightness {} outside 0..=255",
            self.brightness
        );
        assert!(
            self.color_temp.is_finite() && (-100.0..=100.0).contains(&self.color_temp),
            "context color temp {} outside -100..=100",
            self.color_temp
        );
        assert!(
            self.saturation_pct.is_finite() && (0.0..=100.0).contains(&self.saturation_pct),
            "context saturation {} outside 0..=100",
            self.saturation_pct
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vibrancy_buckets() {
        assert_eq!(ColorVibrancy::from_saturation(10.0), ColorVibrancy::Low);
        assert_eq!(ColorVibrancy::from_saturation(25.0), ColorVibrancy::Medium);
        assert_eq!(ColorVibrancy::from_saturation(50.0), ColorVibrancy::Medium);
        assert_eq!(ColorVibrancy::from_saturation(51.0), ColorVibrancy::High);
    }

    #[test]
    fn context_normalises_label() {
        let ctx = ContextVector::from_sample(&SceneSample::default(), Some("  Pizza "));
        assert_eq!(ctx.object_type.as_deref(), Some("pizza"));

        let blank = ContextVector::from_sample(&SceneSample::default(), Some("   "));
        assert_eq!(blank.object_type, None);
    }

    #[test]
    #[should_panic(expected = "brightness")]
    fn malformed_context_panics() {
        let sample = SceneSample {
            brightness: f64::NAN,
            ..SceneSample::default()
        };
        let _ = ContextVector::from_sample(&sample, None);
    }

    #[test]
    fn backlit_and_low_light_thresholds() {
        assert!(SceneSample::backlit(100.0, 131.0));
        assert!(!SceneSample::backlit(100.0, 130.0));
        assert!(SceneSample::low_light(79.9));
        assert!(!SceneSample::low_light(80.0));
    }
}
