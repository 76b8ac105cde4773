//! The three paths that produce live `FilterParams`.
//!
//! Whatever the path, the result is clamped to the live ranges and tagged
//! with the `FilterOrigin` that decides how manual sliders are scaled.

use crate::models::{
    ColorVibrancy, FilterOrigin, FilterParams, ManualAdjustments, RecommendedSettings,
    SceneSample,
};

use super::presets::ModePreset;

const EXPOSURE_TO_BRIGHTNESS: f64 = 8.0;
const CONTRAST_GAIN: f64 = 0.6;
const SATURATION_GAIN: f64 = 0.8;

/// Live parameters plus the path that produced them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposedFilters {
    pub params: FilterParams,
    pub origin: FilterOrigin,
}

/// Inputs to one composition, selected by the caller's current state.
#[derive(Debug, Clone, Copy)]
pub enum CompositionInput<'a> {
    /// No analysed region and no learned match.
    ModeOnly,
    /// Heuristic settings derived from a sampled region.
    RegionAnalyzed {
        settings: &'a RecommendedSettings,
        sample: &'a SceneSample,
    },
    /// A learned record's stored render.
    Learned { stored: &'a FilterParams },
}

pub fn compose(
    preset: &ModePreset,
    input: CompositionInput<'_>,
    manual: &ManualAdjustments,
) -> ComposedFilters {
    match input {
        CompositionInput::ModeOnly => ComposedFilters {
            params: compose_mode_only(preset, manual, FilterOrigin::ModeOnly),
            origin: FilterOrigin::ModeOnly,
        },
        CompositionInput::RegionAnalyzed { settings, sample } => ComposedFilters {
            params: compose_ai(preset, settings, sample, manual),
            origin: FilterOrigin::RegionAnalyzed,
        },
        CompositionInput::Learned { stored } => ComposedFilters {
            params: compose_learned(stored, manual),
            origin: FilterOrigin::Learned,
        },
    }
}

/// Preset plus manual sliders, scaled according to `origin`.
pub fn compose_mode_only(
    preset: &ModePreset,
    manual: &ManualAdjustments,
    origin: FilterOrigin,
) -> FilterParams {
    preset
        .filters
        .offset(&origin.manual_delta(manual))
        .clamped()
}

/// Saturation nudge from the sampled vibrancy.
pub fn saturation_nudge(vibrancy: ColorVibrancy) -> f64 {
    match vibrancy {
        ColorVibrancy::Low => 15.0,
        ColorVibrancy::Medium => 0.0,
        ColorVibrancy::High => -5.0,
    }
}

/// Warmth nudge from the tone vote and the dominant hue.
pub fn warmth_nudge(sample: &SceneSample) -> f64 {
    let tone = if sample.is_warm_tone {
        10.0
    } else if sample.is_cool_tone {
        -15.0
    } else {
        0.0
    };

    let hue = sample.dominant_hue_deg;
    let hue_nudge = if hue < 30.0 || hue >= 300.0 {
        // red / magenta
        8.0
    } else if (180.0..=260.0).contains(&hue) {
        // blue / cyan
        -10.0
    } else {
        0.0
    };

    tone + hue_nudge
}

pub fn compose_ai(
    preset: &ModePreset,
    settings: &RecommendedSettings,
    sample: &SceneSample,
    manual: &ManualAdjustments,
) -> FilterParams {
    let mode = &preset.filters;
    let adjust = FilterOrigin::RegionAnalyzed.manual_delta(manual);

    FilterParams {
        brightness: 100.0
            + settings.exposure_ev * EXPOSURE_TO_BRIGHTNESS
            + (mode.brightness - 100.0)
            + adjust.brightness,
        contrast: 100.0
            + (settings.contrast - 50.0) * CONTRAST_GAIN
            + (mode.contrast - 100.0)
            + adjust.contrast,
        saturate: 100.0
            + (settings.saturation - 50.0) * SATURATION_GAIN
            + (mode.saturate - 100.0)
            + saturation_nudge(sample.color_vibrancy)
            + adjust.saturate,
        warmth: settings.warmth + mode.warmth + warmth_nudge(sample) + adjust.warmth,
    }
    .clamped()
}

/// Stored render of a learned record, re-scaled only by the current sliders.
pub fn compose_learned(stored: &FilterParams, manual: &ManualAdjustments) -> FilterParams {
    stored
        .offset(&FilterOrigin::Learned.manual_delta(manual))
        .clamped()
}
