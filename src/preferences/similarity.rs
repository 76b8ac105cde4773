use crate::models::ContextVector;
use crate::preferences::config::PreferenceConfig;

/// Weighted similarity of two contexts in `[0, 1]`.
///
/// Each feature contributes `weight * partial_score`; the result is divided
/// by the total weight of the features present, so weights always sum to 1.
/// The label is only absent when neither context carries one.
pub fn similarity(a: &ContextVector, b: &ContextVector, config: &PreferenceConfig) -> f64 {
    let mut score = 0.0;
    let mut total = 0.0;

    let mut add = |weight: f64, partial: f64| {
        score += weight * partial;
        total += weight;
    };

    if let Some(partial) = score_label(a.object_type.as_deref(), b.object_type.as_deref()) {
        add(config.weight_label, partial);
    }
    add(
        config.weight_brightness,
        closeness(a.brightness, b.brightness, config.brightness_span),
    );
    add(
        config.weight_color_temp,
        closeness(a.color_temp, b.color_temp, config.color_temp_span),
    );
    add(
        config.weight_saturation,
        closeness(a.saturation_pct, b.saturation_pct, config.saturation_span),
    );
    add(config.weight_warm, agreement(a.is_warm_tone, b.is_warm_tone));
    add(config.weight_cool, agreement(a.is_cool_tone, b.is_cool_tone));
    add(config.weight_backlit, agreement(a.is_backlit, b.is_backlit));
    add(config.weight_low_light, agreement(a.is_low_light, b.is_low_light));

    if total <= 0.0 {
        return 0.0;
    }
    (score / total).clamp(0.0, 1.0)
}

/// Exact label match. `None` when neither side has a label.
fn score_label(a: Option<&str>, b: Option<&str>) -> Option<f64> {
    match (a, b) {
        (None, None) => None,
        (Some(a), Some(b)) if a == b => Some(1.0),
        _ => Some(0.0),
    }
}

/// Linear falloff: 1 when equal, 0 once the gap reaches `span`.
fn closeness(a: f64, b: f64, span: f64) -> f64 {
    (1.0 - (a - b).abs() / span).max(0.0)
}

fn agreement(a: bool, b: bool) -> f64 {
    if a == b {
        1.0
    } else {
        0.0
    }
}
