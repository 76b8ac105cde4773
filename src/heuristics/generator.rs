use crate::models::{ContrastHint, RecommendedSettings, SceneSample, WhiteBalance};

use super::categories::Category;

pub const EV_BACKLIT: f64 = 1.5;
pub const EV_LOW_LIGHT: f64 = 1.2;
pub const EV_DARK: f64 = 0.8;
pub const EV_BRIGHT: f64 = -0.7;

const DARK_BRIGHTNESS: f64 = 90.0;
const BRIGHT_BRIGHTNESS: f64 = 190.0;
const COLOR_TEMP_SWING: f64 = 25.0;
const HDR_DYNAMIC_RANGE: f64 = 180.0;
const LOW_DYNAMIC_RANGE: f64 = 100.0;
const HIGH_DYNAMIC_RANGE: f64 = 200.0;

/// Map a scene sample and detector label to recommended capture settings.
///
/// Total over its domain: every `(sample, label)` pair yields a value.
pub fn generate(sample: &SceneSample, object_label: Option<&str>) -> RecommendedSettings {
    let category = Category::of(object_label);
    let profile = category.profile(object_label);
    let mut tips = Vec::new();

    let exposure_ev = if sample.is_backlit {
        tips.push("Subject is backlit: exposing for the subject".to_string());
        EV_BACKLIT
    } else if sample.is_low_light {
        tips.push("Low light: enable night mode or steady the camera".to_string());
        EV_LOW_LIGHT
    } else if sample.brightness < DARK_BRIGHTNESS {
        tips.push("Scene is dark: brightening exposure".to_string());
        EV_DARK
    } else if sample.brightness > BRIGHT_BRIGHTNESS {
        tips.push("Scene is bright: pulling exposure down to keep highlights".to_string());
        EV_BRIGHT
    } else {
        0.0
    };

    let (white_balance, mut warmth): (WhiteBalance, f64) = if sample.color_temp > COLOR_TEMP_SWING {
        tips.push("Warm cast detected: cooling white balance".to_string());
        (WhiteBalance::Cloudy, -10.0)
    } else if sample.color_temp < -COLOR_TEMP_SWING {
        tips.push("Cool cast detected: warming white balance".to_string());
        (WhiteBalance::Tungsten, 25.0)
    } else if category.is_food() {
        (WhiteBalance::Auto, 15.0)
    } else {
        (WhiteBalance::Auto, 5.0)
    };

    let hdr_recommended = sample.dynamic_range > HDR_DYNAMIC_RANGE || sample.is_backlit;
    if hdr_recommended {
        tips.push("High contrast scene: HDR recommended".to_string());
    }

    let (contrast, contrast_hint) = if sample.dynamic_range < LOW_DYNAMIC_RANGE {
        (65.0, ContrastHint::Increase)
    } else if sample.dynamic_range > HIGH_DYNAMIC_RANGE {
        (40.0, ContrastHint::Decrease)
    } else {
        (55.0, ContrastHint::Keep)
    };

    if let Some(floor) = profile.warmth_floor {
        warmth = warmth.max(floor);
    }

    if profile.angle != super::categories::DEFAULT_ANGLE {
        tips.push(format!("Try shooting from {}", profile.angle));
    }

    RecommendedSettings {
        exposure_ev,
        white_balance,
        hdr_recommended,
        contrast,
        contrast_hint,
        saturation: profile.saturation,
        warmth: warmth.clamp(-25.0, 25.0),
        angle_suggestion: profile.angle.to_string(),
        tips,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColorVibrancy;

    fn sample(brightness: f64, env: f64, color_temp: f64, dynamic_range: f64) -> SceneSample {
        SceneSample {
            brightness,
            env_brightness: env,
            dynamic_range,
            color_temp,
            saturation_pct: 30.0,
            is_backlit: SceneSample::backlit(brightness, env),
            is_low_light: SceneSample::low_light(env),
            is_warm_tone: false,
            is_cool_tone: false,
            color_vibrancy: ColorVibrancy::Medium,
            dominant_hue_deg: 0.0,
        }
    }

    #[test]
    fn dark_pizza_scene() {
        let settings = generate(&sample(60.0, 55.0, 0.0, 150.0), Some("pizza"));
        assert!(settings.exposure_ev >= EV_DARK);
        assert_eq!(settings.saturation, 65.0);
        assert_eq!(settings.angle_suggestion, "90° overhead");
        assert!(settings.tips.iter().any(|t| t.contains("night mode")));
    }

    #[test]
    fn exposure_rules_in_priority_order() {
        assert_eq!(generate(&sample(100.0, 140.0, 0.0, 150.0), None).exposure_ev, EV_BACKLIT);
        assert_eq!(generate(&sample(100.0, 70.0, 0.0, 150.0), None).exposure_ev, EV_LOW_LIGHT);
        assert_eq!(generate(&sample(85.0, 100.0, 0.0, 150.0), None).exposure_ev, EV_DARK);
        assert_eq!(generate(&sample(200.0, 200.0, 0.0, 150.0), None).exposure_ev, EV_BRIGHT);
        assert_eq!(generate(&sample(130.0, 130.0, 0.0, 150.0), None).exposure_ev, 0.0);
    }

    #[test]
    fn white_balance_and_warmth() {
        let cloudy = generate(&sample(130.0, 130.0, 40.0, 150.0), None);
        assert_eq!(cloudy.white_balance, WhiteBalance::Cloudy);
        assert_eq!(cloudy.warmth, -10.0);

        let tungsten = generate(&sample(130.0, 130.0, -40.0, 150.0), None);
        assert_eq!(tungsten.white_balance, WhiteBalance::Tungsten);
        assert_eq!(tungsten.warmth, 25.0);

        assert_eq!(generate(&sample(130.0, 130.0, 0.0, 150.0), Some("banana")).warmth, 15.0);
        assert_eq!(generate(&sample(130.0, 130.0, 0.0, 150.0), Some("person")).warmth, 5.0);
    }

    #[test]
    fn baked_goods_keep_a_warmth_floor() {
        let settings = generate(&sample(130.0, 130.0, 40.0, 150.0), Some("cake"));
        assert_eq!(settings.white_balance, WhiteBalance::Cloudy);
        assert_eq!(settings.warmth, 20.0);
    }

    #[test]
    fn contrast_and_hdr_follow_dynamic_range() {
        let flat = generate(&sample(130.0, 130.0, 0.0, 80.0), None);
        assert_eq!((flat.contrast, flat.contrast_hint), (65.0, ContrastHint::Increase));
        assert!(!flat.hdr_recommended);

        let harsh = generate(&sample(130.0, 130.0, 0.0, 220.0), None);
        assert_eq!((harsh.contrast, harsh.contrast_hint), (40.0, ContrastHint::Decrease));
        assert!(harsh.hdr_recommended);

        let mid = generate(&sample(130.0, 130.0, 0.0, 190.0), None);
        assert_eq!(mid.contrast, 55.0);
        assert!(mid.hdr_recommended);
    }

    #[test]
    fn category_table() {
        let drink = generate(&sample(130.0, 130.0, 0.0, 150.0), Some("cup"));
        assert_eq!((drink.saturation, drink.angle_suggestion.as_str()), (45.0, "15° tilt"));

        let bowl = generate(&sample(130.0, 130.0, 0.0, 150.0), Some("bowl"));
        assert_eq!((bowl.saturation, bowl.angle_suggestion.as_str()), (60.0, "60° tilt"));

        let fruit = generate(&sample(130.0, 130.0, 0.0, 150.0), Some("apple"));
        assert_eq!(fruit.saturation, 70.0);
    }

    #[test]
    fn food_warmth_only_for_dishes() {
        let neutral = sample(130.0, 130.0, 0.0, 150.0);
        assert_eq!(generate(&neutral, Some("banana")).warmth, 15.0);
        assert_eq!(generate(&neutral, Some("cake")).warmth, 20.0);
        assert_eq!(generate(&neutral, Some("cup")).warmth, 5.0);
        assert_eq!(generate(&neutral, Some("bowl")).warmth, 5.0);
        assert_eq!(generate(&neutral, None).warmth, 5.0);
    }

    #[test]
    fn warm_cast_warmth_is_clamped_after_floor() {
        let warm_pizza = generate(&sample(130.0, 130.0, 40.0, 150.0), Some("pizza"));
        assert_eq!(warm_pizza.white_balance, WhiteBalance::Cloudy);
        assert_eq!(warm_pizza.warmth, 20.0);

        let cool_room = generate(&sample(130.0, 130.0, -40.0, 150.0), None);
        assert_eq!(cool_room.white_balance, WhiteBalance::Tungsten);
        assert_eq!(cool_room.warmth, 25.0);
    }
}
