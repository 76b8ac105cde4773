//! One pass of sample → generate → apply → composite.
//!
//! The pixel work (`analyze`) is split from the store lookup (`resolve`) so
//! callers can run the former on a blocking worker and hold the store lock
//! only for the latter.

use image::RgbaImage;

use crate::compositor::{compose, ComposedFilters, CompositionInput, ModePreset};
use crate::heuristics::generate;
use crate::models::{
    AppliedPreference, ContextVector, Detection, ManualAdjustments, PreferenceSource,
    RecommendedSettings, SceneSample,
};
use crate::preferences::PreferenceStore;
use crate::sampling::{region_for, sample_scene};

use super::state::Session;

/// Pixel-derived half of a pass.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub sample: SceneSample,
    pub settings: RecommendedSettings,
    pub context: ContextVector,
    pub label: Option<String>,
    /// False when no detection was supplied and the centred default region
    /// was sampled instead. Untracked passes stay on the mode preset and are
    /// never learned.
    pub tracked: bool,
}

/// Result of one full pass.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub analysis: Option<Analysis>,
    pub applied: Option<AppliedPreference>,
    pub composed: ComposedFilters,
}

/// Sample the tracked region and derive baseline settings.
///
/// `None` when there is no usable region (empty frame or degenerate box);
/// callers skip the tick.
pub fn analyze(frame: &RgbaImage, detection: Option<&Detection>) -> Option<Analysis> {
    let (width, height) = frame.dimensions();
    let region = region_for(detection.map(|d| &d.bbox), width, height)?;
    let sample = sample_scene(frame, region)?;

    let label = detection
        .map(|d| d.label.trim().to_lowercase())
        .filter(|label| !label.is_empty());
    let settings = generate(&sample, label.as_deref());
    let context = ContextVector::from_sample(&sample, label.as_deref());

    Some(Analysis {
        sample,
        settings,
        context,
        label,
        tracked: detection.is_some(),
    })
}

/// Look the analysis up in the store and composite the live filters.
///
/// Without a tracked object the preset alone drives the filters; the
/// default-region settings are still returned for display.
pub fn resolve(
    analysis: Option<Analysis>,
    store: &PreferenceStore,
    preset: &ModePreset,
    manual: &ManualAdjustments,
) -> Evaluation {
    let analysis = match analysis {
        Some(analysis) if analysis.tracked => analysis,
        untracked => {
            return Evaluation {
                analysis: untracked,
                applied: None,
                composed: compose(preset, CompositionInput::ModeOnly, manual),
            };
        }
    };

    let applied = store.apply(&analysis.context, &analysis.settings);
    let composed = match &applied.source {
        PreferenceSource::User { filters, .. } => {
            compose(preset, CompositionInput::Learned { stored: filters }, manual)
        }
        PreferenceSource::Ai => compose(
            preset,
            CompositionInput::RegionAnalyzed {
                settings: &applied.settings,
                sample: &analysis.sample,
            },
            manual,
        ),
    };

    Evaluation {
        analysis: Some(analysis),
        applied: Some(applied),
        composed,
    }
}

pub fn evaluate(
    frame: &RgbaImage,
    detection: Option<&Detection>,
    store: &PreferenceStore,
    session: &mut Session,
) -> Evaluation {
    let analysis = analyze(frame, detection);
    let evaluation = resolve(analysis, store, session.preset(), &session.manual);
    absorb(session, &evaluation);
    evaluation
}

/// Fold a pass into the session.
///
/// A pass without analysis keeps the last known scene so the live view does
/// not flicker back to the bare preset. An untracked pass forgets the scene
/// and keeps only the default-region settings for display.
pub fn absorb(session: &mut Session, evaluation: &Evaluation) {
    match (&evaluation.analysis, &evaluation.applied) {
        (Some(analysis), Some(applied)) => {
            session.last_sample = Some(analysis.sample.clone());
            session.last_settings = Some(applied.settings.clone());
            session.last_label = analysis.label.clone();
            session.last_source = Some(applied.source.clone());
            session.set_composed(evaluation.composed);
        }
        (Some(analysis), None) => {
            session.last_sample = None;
            session.last_settings = Some(analysis.settings.clone());
            session.last_label = None;
            session.last_source = None;
            session.set_composed(evaluation.composed);
        }
        (None, _) => {
            session.recompose();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BoundingBox, FilterOrigin};
    use crate::preferences::CaptureInput;
    use image::Rgba;

    fn frame(color: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(40, 30, Rgba([color[0], color[1], color[2], 255]))
    }

    fn pizza() -> Detection {
        Detection::new("Pizza", 0.9, BoundingBox::new(10.0, 5.0, 20.0, 20.0))
    }

    #[test]
    fn empty_frame_falls_back_to_mode_only() {
        let mut session = Session::new("vivid");
        let store = PreferenceStore::default();
        let evaluation = evaluate(&RgbaImage::new(0, 0), None, &store, &mut session);

        assert!(evaluation.analysis.is_none());
        assert_eq!(evaluation.composed.origin, FilterOrigin::ModeOnly);
        assert_eq!(session.origin, FilterOrigin::ModeOnly);
    }

    #[test]
    fn missing_detection_stays_on_mode_preset() {
        let mut session = Session::new("warm");
        let mut store = PreferenceStore::default();

        // a learned record for the same unlabelled scene must not be applied
        let untracked = analyze(&frame([180, 120, 60]), None).unwrap();
        assert!(!untracked.tracked);
        assert!(untracked.label.is_none());
        store.record(CaptureInput {
            context: untracked.context.clone(),
            settings: untracked.settings.clone(),
            filters: crate::models::FilterParams::new(130.0, 110.0, 150.0, 20.0),
            mode: "warm".into(),
            manual_adjustments: ManualAdjustments::default(),
            liked: true,
        });

        let detection = pizza();
        evaluate(&frame([180, 120, 60]), Some(&detection), &store, &mut session);
        assert_eq!(session.origin, FilterOrigin::RegionAnalyzed);

        let evaluation = evaluate(&frame([180, 120, 60]), None, &store, &mut session);
        assert!(evaluation.applied.is_none());
        assert_eq!(evaluation.composed.origin, FilterOrigin::ModeOnly);
        assert_eq!(session.origin, FilterOrigin::ModeOnly);
        assert_eq!(session.filters, ModePreset::by_name("warm").filters);
        assert_eq!(
            session.last_settings.as_ref(),
            evaluation.analysis.as_ref().map(|a| &a.settings)
        );
        assert!(session.last_source.is_none());

        // later slider changes keep the preset as the base
        session.set_manual(ManualAdjustments::default());
        assert_eq!(session.origin, FilterOrigin::ModeOnly);
    }

    #[test]
    fn cold_store_uses_region_analysis() {
        let mut session = Session::new("natural");
        let store = PreferenceStore::default();
        let detection = pizza();
        let evaluation = evaluate(&frame([180, 120, 60]), Some(&detection), &store, &mut session);

        let analysis = evaluation.analysis.unwrap();
        assert_eq!(analysis.label.as_deref(), Some("pizza"));
        assert_eq!(analysis.context.object_type.as_deref(), Some("pizza"));
        assert_eq!(evaluation.composed.origin, FilterOrigin::RegionAnalyzed);
        assert_eq!(session.last_source, Some(PreferenceSource::Ai));
        assert!(session.filters.is_within_live_bounds());
    }

    #[test]
    fn learned_match_reuses_stored_render() {
        let detection = pizza();
        let analysis = analyze(&frame([180, 120, 60]), Some(&detection)).unwrap();
        let stored = crate::models::FilterParams::new(130.0, 110.0, 150.0, 20.0);

        let mut store = PreferenceStore::default();
        store.record(CaptureInput {
            context: analysis.context.clone(),
            settings: analysis.settings.clone(),
            filters: stored,
            mode: "natural".into(),
            manual_adjustments: ManualAdjustments::default(),
            liked: true,
        });

        let mut session = Session::new("natural");
        let evaluation = evaluate(&frame([180, 120, 60]), Some(&detection), &store, &mut session);
        assert_eq!(evaluation.composed.origin, FilterOrigin::Learned);
        assert_eq!(session.filters, stored);
        assert!(session.last_source.as_ref().is_some_and(|s| s.is_user()));
    }
}
