use crate::models::FilterParams;

/// Sepia amount per unit of positive warmth.
pub const SEPIA_PER_WARMTH: f64 = 0.004;
/// Hue rotation in degrees per unit of (negative) warmth.
pub const HUE_ROTATE_PER_WARMTH: f64 = 0.6;

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let rounded = (value * factor).round() / factor;
    // avoid printing "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// CSS filter string for the live preview.
///
/// `brightness(b%) contrast(c%) saturate(s%)` followed by a sepia tint for
/// positive warmth or a hue rotation for negative warmth.
pub fn filter_string(params: &FilterParams) -> String {
    let mut css = format!(
        "brightness({}%) contrast({}%) saturate({}%)",
        round_to(params.brightness, 1),
        round_to(params.contrast, 1),
        round_to(params.saturate, 1),
    );

    if params.warmth > 0.0 {
        css.push_str(&format!(
            " sepia({})",
            round_to(params.warmth * SEPIA_PER_WARMTH, 3)
        ));
    } else if params.warmth < 0.0 {
        css.push_str(&format!(
            " hue-rotate({}deg)",
            round_to(params.warmth * HUE_ROTATE_PER_WARMTH, 1)
        ));
    }

    css
}
