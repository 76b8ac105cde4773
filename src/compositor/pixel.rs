use anyhow::{bail, Result};
use image::RgbaImage;

use crate::models::FilterParams;

const MID_GRAY: f64 = 128.0;

/// Warmth is added to the primary channel at full strength and to green at
/// this fraction.
const WARM_GREEN_SHARE: f64 = 0.5;
const COOL_GREEN_SHARE: f64 = 0.3;

/// Luma weights used for the saturation blend.
fn saturation_luma(r: f64, g: f64, b: f64) -> f64 {
    0.2989 * r + 0.5870 * g + 0.1140 * b
}

#[inline]
fn to_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Transform one RGB triple. Order: brightness, contrast around mid-grey,
/// saturation blend toward luma, warmth bias.
pub fn transform_rgb(rgb: [u8; 3], params: &FilterParams) -> [u8; 3] {
    let brightness = params.brightness / 100.0;
    let contrast = params.contrast / 100.0;
    let saturate = params.saturate / 100.0;

    let mut r = f64::from(rgb[0]) * brightness;
    let mut g = f64::from(rgb[1]) * brightness;
    let mut b = f64::from(rgb[2]) * brightness;

    r = (r - MID_GRAY) * contrast + MID_GRAY;
    g = (g - MID_GRAY) * contrast + MID_GRAY;
    b = (b - MID_GRAY) * contrast + MID_GRAY;

    let y = saturation_luma(r, g, b);
    r = y + (r - y) * saturate;
    g = y + (g - y) * saturate;
    b = y + (b - y) * saturate;

    let warmth = params.warmth;
    if warmth > 0.0 {
        r += warmth;
        g += warmth * WARM_GREEN_SHARE;
    } else if warmth < 0.0 {
        b += -warmth;
        g += -warmth * COOL_GREEN_SHARE;
    }

    [to_channel(r), to_channel(g), to_channel(b)]
}

/// Render `params` into a new raster. The source is left untouched and
/// alpha is carried over as-is.
pub fn apply_filters(frame: &RgbaImage, params: &FilterParams) -> Result<RgbaImage> {
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        bail!("cannot render an empty {width}x{height} frame");
    }
    if ![params.brightness, params.contrast, params.saturate, params.warmth]
        .iter()
        .all(|v| v.is_finite())
    {
        bail!("non-finite filter parameters {params:?}");
    }

    let mut output = frame.clone();
    for pixel in output.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let [r, g, b] = transform_rgb([r, g, b], params);
        pixel.0 = [r, g, b, a];
    }
    Ok(output)
}
