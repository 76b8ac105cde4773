use image::{imageops, RgbaImage};

use crate::models::{ColorVibrancy, SceneSample};

use super::region::Region;

/// Ambient light is measured on a frame downsampled by this factor.
const AMBIENT_DOWNSAMPLE: u32 = 8;

/// A channel must exceed the pixel's mean by more than this to vote warm/cool.
const HUE_VOTE_MARGIN: f64 = 20.0;

pub fn luma(r: f64, g: f64, b: f64) -> f64 {
    0.299 * r + 0.587 * g + 0.114 * b
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HueVote {
    Warm,
    Cool,
    Neutral,
}

fn hue_vote(r: f64, g: f64, b: f64) -> HueVote {
    let avg = (r + g + b) / 3.0;
    let tinted = r > avg + HUE_VOTE_MARGIN || g > avg + HUE_VOTE_MARGIN;
    if tinted && r > g {
        HueVote::Warm
    } else if tinted && g > r {
        HueVote::Cool
    } else {
        HueVote::Neutral
    }
}

/// Running totals over the region of interest. Every field is an
/// order-independent sum or extreme, so partial stats over disjoint pixel
/// sets combine without loss.
#[derive(Debug, Clone)]
struct RegionStats {
    count: u64,
    luma_sum: f64,
    luma_min: f64,
    luma_max: f64,
    r_sum: f64,
    g_sum: f64,
    b_sum: f64,
    saturation_sum: f64,
    warm: u64,
    cool: u64,
    neutral: u64,
}

impl RegionStats {
    fn new() -> Self {
        Self {
            count: 0,
            luma_sum: 0.0,
            luma_min: f64::MAX,
            luma_max: f64::MIN,
            r_sum: 0.0,
            g_sum: 0.0,
            b_sum: 0.0,
            saturation_sum: 0.0,
            warm: 0,
            cool: 0,
            neutral: 0,
        }
    }

    fn push(&mut self, r: f64, g: f64, b: f64) {
        let y = luma(r, g, b);
        self.count += 1;
        self.luma_sum += y;
        self.luma_min = self.luma_min.min(y);
        self.luma_max = self.luma_max.max(y);
        self.r_sum += r;
        self.g_sum += g;
        self.b_sum += b;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        if max > 0.0 {
            self.saturation_sum += (max - min) / max;
        }

        match hue_vote(r, g, b) {
            HueVote::Warm => self.warm += 1,
            HueVote::Cool => self.cool += 1,
            HueVote::Neutral => self.neutral += 1,
        }
    }
}

/// Hue in degrees of an RGB triple (HSV model). Grey maps to 0.
pub fn hue_degrees(r: f64, g: f64, b: f64) -> f64 {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    if delta <= f64::EPSILON {
        return 0.0;
    }

    let hue = if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    let hue = hue.rem_euclid(360.0);
    if hue >= 360.0 {
        0.0
    } else {
        hue
    }
}

/// Mean luma of the whole frame after 1/8 downsampling.
fn ambient_brightness(frame: &RgbaImage) -> f64 {
    let (width, height) = frame.dimensions();
    let small = imageops::thumbnail(
        frame,
        (width / AMBIENT_DOWNSAMPLE).max(1),
        (height / AMBIENT_DOWNSAMPLE).max(1),
    );

    let mut sum = 0.0_f64;
    let mut count = 0_u64;
    for pixel in small.pixels() {
        let [r, g, b, _] = pixel.0;
        sum += luma(f64::from(r), f64::from(g), f64::from(b));
        count += 1;
    }

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Reduce the region of interest and the ambient frame to a `SceneSample`.
///
/// Returns `None` for an empty frame or a region that does not overlap it;
/// the caller keeps the previous parameters for that tick.
pub fn sample_scene(frame: &RgbaImage, region: Region) -> Option<SceneSample> {
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 || region.is_empty() {
        return None;
    }

    let x_end = region.x.saturating_add(region.width).min(width);
    let y_end = region.y.saturating_add(region.height).min(height);
    if region.x >= x_end || region.y >= y_end {
        return None;
    }

    let mut stats = RegionStats::new();
    for y in region.y..y_end {
        for x in region.x..x_end {
            let [r, g, b, _] = frame.get_pixel(x, y).0;
            stats.push(f64::from(r), f64::from(g), f64::from(b));
        }
    }

    let n = stats.count as f64;
    let brightness = (stats.luma_sum / n).clamp(0.0, 255.0);
    let dynamic_range = (stats.luma_max - stats.luma_min).clamp(0.0, 255.0);
    let avg_r = stats.r_sum / n;
    let avg_g = stats.g_sum / n;
    let avg_b = stats.b_sum / n;
    let color_temp = ((avg_r - avg_b) / 255.0 * 100.0).clamp(-100.0, 100.0);
    let saturation_pct = (stats.saturation_sum / n * 100.0).clamp(0.0, 100.0);

    let env_brightness = ambient_brightness(frame).clamp(0.0, 255.0);

    Some(SceneSample {
        brightness,
        env_brightness,
        dynamic_range,
        color_temp,
        saturation_pct,
        is_backlit: SceneSample::backlit(brightness, env_brightness),
        is_low_light: SceneSample::low_light(env_brightness),
        is_warm_tone: stats.warm > stats.cool && stats.warm > stats.neutral,
        is_cool_tone: stats.cool > stats.warm && stats.cool > stats.neutral,
        color_vibrancy: ColorVibrancy::from_saturation(saturation_pct),
        dominant_hue_deg: hue_degrees(avg_r, avg_g, avg_b),
    })
}
