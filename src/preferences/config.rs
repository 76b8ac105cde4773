/// Tunable constants for preference matching, merging and eviction.
#[derive(Debug, Clone)]
pub struct PreferenceConfig {
    /// Minimum similarity for a stored record to count as a match
    pub similarity_threshold: f64,

    /// Hard cap on stored records
    pub max_records: usize,

    /// Merge weight of a liked capture (unliked captures weigh 1)
    pub liked_weight: u32,

    /// Share of the learned settings when blending with the heuristic baseline
    pub liked_blend: f64,
    pub unliked_blend: f64,

    /// Similarity feature weights
    pub weight_label: f64,
    pub weight_brightness: f64,
    pub weight_color_temp: f64,
    pub weight_saturation: f64,
    pub weight_warm: f64,
    pub weight_cool: f64,
    pub weight_backlit: f64,
    pub weight_low_light: f64,

    /// Distances at which a feature's partial score reaches zero
    pub brightness_span: f64,
    pub color_temp_span: f64,
    pub saturation_span: f64,
}

impl Default for PreferenceConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.70,
            max_records: 100,
            liked_weight: 3,
            liked_blend: 0.8,
            unliked_blend: 0.7,
            weight_label: 0.35,
            weight_brightness: 0.15,
            weight_color_temp: 0.15,
            weight_saturation: 0.10,
            weight_warm: 0.05,
            weight_cool: 0.05,
            weight_backlit: 0.05,
            weight_low_light: 0.05,
            brightness_span: 120.0,
            color_temp_span: 60.0,
            saturation_span: 100.0,
        }
    }
}

impl PreferenceConfig {
    pub fn capture_weight(&self, liked: bool) -> u32 {
        if liked {
            self.liked_weight
        } else {
            1
        }
    }

    pub fn blend_for(&self, liked: bool) -> f64 {
        if liked {
            self.liked_blend
        } else {
            self.unliked_blend
        }
    }
}
