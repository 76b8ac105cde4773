use uuid::Uuid;

use crate::compositor::{compose, ComposedFilters, CompositionInput, ModePreset};
use crate::models::{
    FilterOrigin, FilterParams, ManualAdjustments, PreferenceSource, RecommendedSettings,
    SceneSample, SessionStatus,
};

/// Everything one capture session mutates, in one place.
///
/// Owned by a single `SessionController`; the sampling loop, render loop and
/// user-input handlers all go through the same lock.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub status: SessionStatus,
    pub mode: String,
    pub filters: FilterParams,
    pub origin: FilterOrigin,
    pub manual: ManualAdjustments,
    pub last_sample: Option<SceneSample>,
    pub last_settings: Option<RecommendedSettings>,
    pub last_label: Option<String>,
    pub last_source: Option<PreferenceSource>,
}

impl Session {
    pub fn new(mode: &str) -> Self {
        let preset = ModePreset::by_name(mode);
        let manual = ManualAdjustments::default();
        let composed = compose(preset, CompositionInput::ModeOnly, &manual);
        Self {
            id: Uuid::new_v4().to_string(),
            status: SessionStatus::Idle,
            mode: preset.name.to_string(),
            filters: composed.params,
            origin: composed.origin,
            manual,
            last_sample: None,
            last_settings: None,
            last_label: None,
            last_source: None,
        }
    }

    pub fn preset(&self) -> &'static ModePreset {
        ModePreset::by_name(&self.mode)
    }

    /// Rebuild the live filters from what the session already knows.
    pub fn recompose(&mut self) -> FilterParams {
        let preset = self.preset();
        let composed = match (&self.last_source, &self.last_settings, &self.last_sample) {
            (Some(PreferenceSource::User { filters, .. }), _, _) => compose(
                preset,
                CompositionInput::Learned { stored: filters },
                &self.manual,
            ),
            (_, Some(settings), Some(sample)) => compose(
                preset,
                CompositionInput::RegionAnalyzed { settings, sample },
                &self.manual,
            ),
            _ => compose(preset, CompositionInput::ModeOnly, &self.manual),
        };
        self.set_composed(composed);
        self.filters
    }

    pub fn set_composed(&mut self, composed: ComposedFilters) {
        debug_assert!(composed.params.is_within_live_bounds());
        self.filters = composed.params;
        self.origin = composed.origin;
    }

    /// Switch mode. Unknown names fall back to the default preset.
    pub fn set_mode(&mut self, mode: &str) -> FilterParams {
        self.mode = ModePreset::by_name(mode).name.to_string();
        self.recompose()
    }

    pub fn set_manual(&mut self, manual: ManualAdjustments) -> FilterParams {
        self.manual = manual.clamped();
        self.recompose()
    }

    pub fn reset_manual(&mut self) -> FilterParams {
        self.set_manual(ManualAdjustments::default())
    }

    /// Drop everything learned during the session; mode and id survive.
    pub fn discard(&mut self) {
        self.manual = ManualAdjustments::default();
        self.last_sample = None;
        self.last_settings = None;
        self.last_label = None;
        self.last_source = None;
        self.recompose();
    }
}
