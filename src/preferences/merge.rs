//! Weighted averaging of preference values.
//!
//! Every numeric field is merged independently as
//! `(old * old_weight + new * new_weight) / (old_weight + new_weight)`,
//! so the result always lies between the two inputs. Non-numeric fields
//! follow whichever side carries more weight, ties going to the newer value.

use crate::models::{FilterParams, ManualAdjustments, RecommendedSettings};

/// Weighted mean of two values. Panics on a non-positive or non-finite weight.
pub fn merge_weighted(old: f64, new: f64, old_weight: f64, new_weight: f64) -> f64 {
    assert!(
        old_weight.is_finite() && old_weight > 0.0,
        "merge weight {old_weight} must be positive"
    );
    assert!(
        new_weight.is_finite() && new_weight > 0.0,
        "merge weight {new_weight} must be positive"
    );
    let merged = (old * old_weight + new * new_weight) / (old_weight + new_weight);
    // rounding can land a hair outside the inputs
    merged.clamp(old.min(new), old.max(new))
}

/// The side with more weight; ties go to `new`.
pub fn heavier<T: Clone>(old: &T, new: &T, old_weight: f64, new_weight: f64) -> T {
    if old_weight > new_weight {
        old.clone()
    } else {
        new.clone()
    }
}

pub fn merge_settings(
    old: &RecommendedSettings,
    new: &RecommendedSettings,
    old_weight: f64,
    new_weight: f64,
) -> RecommendedSettings {
    let m = |a: f64, b: f64| merge_weighted(a, b, old_weight, new_weight);
    RecommendedSettings {
        exposure_ev: m(old.exposure_ev, new.exposure_ev),
        white_balance: heavier(&old.white_balance, &new.white_balance, old_weight, new_weight),
        hdr_recommended: heavier(&old.hdr_recommended, &new.hdr_recommended, old_weight, new_weight),
        contrast: m(old.contrast, new.contrast),
        contrast_hint: heavier(&old.contrast_hint, &new.contrast_hint, old_weight, new_weight),
        saturation: m(old.saturation, new.saturation),
        warmth: m(old.warmth, new.warmth),
        angle_suggestion: heavier(
            &old.angle_suggestion,
            &new.angle_suggestion,
            old_weight,
            new_weight,
        ),
        tips: heavier(&old.tips, &new.tips, old_weight, new_weight),
    }
}

pub fn merge_filters(
    old: &FilterParams,
    new: &FilterParams,
    old_weight: f64,
    new_weight: f64,
) -> FilterParams {
    let m = |a: f64, b: f64| merge_weighted(a, b, old_weight, new_weight);
    FilterParams {
        brightness: m(old.brightness, new.brightness),
        contrast: m(old.contrast, new.contrast),
        saturate: m(old.saturate, new.saturate),
        warmth: m(old.warmth, new.warmth),
    }
}

pub fn merge_manual(
    old: &ManualAdjustments,
    new: &ManualAdjustments,
    old_weight: f64,
    new_weight: f64,
) -> ManualAdjustments {
    let m = |a: f64, b: f64| merge_weighted(a, b, old_weight, new_weight);
    ManualAdjustments {
        brightness: m(old.brightness, new.brightness),
        contrast: m(old.contrast, new.contrast),
        saturation: m(old.saturation, new.saturation),
        warmth: m(old.warmth, new.warmth),
    }
}

/// Blend learned settings with the heuristic baseline, `learned_share` in
/// favour of the learned side.
pub fn blend_settings(
    learned: &RecommendedSettings,
    baseline: &RecommendedSettings,
    learned_share: f64,
) -> RecommendedSettings {
    assert!(
        (0.0..=1.0).contains(&learned_share) && learned_share > 0.0,
        "blend share {learned_share} outside (0, 1]"
    );
    let baseline_share = 1.0 - learned_share;
    if baseline_share <= 0.0 {
        return learned.clone();
    }
    let mut blended = merge_settings(baseline, learned, baseline_share, learned_share);
    blended.tips = baseline.tips.clone();
    blended
}
