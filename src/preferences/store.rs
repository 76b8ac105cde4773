use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    AppliedPreference, ContextVector, FilterParams, ManualAdjustments, PreferenceRecord,
    PreferenceSource, RecommendedSettings,
};
use crate::preferences::config::PreferenceConfig;
use crate::preferences::merge::{
    blend_settings, heavier, merge_filters, merge_manual, merge_settings,
};
use crate::preferences::similarity::similarity;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Everything known about one capture, ready to be learned from.
#[derive(Debug, Clone)]
pub struct CaptureInput {
    pub context: ContextVector,
    pub settings: RecommendedSettings,
    pub filters: FilterParams,
    pub mode: String,
    pub manual_adjustments: ManualAdjustments,
    pub liked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutcome {
    pub record_id: String,
    /// True when the capture was folded into an existing record.
    pub merged: bool,
    pub usage_count: u32,
    pub evicted: usize,
}

/// In-memory list of learned preference records.
///
/// Lookups are first-match: the scan stops at the first record whose
/// similarity clears the threshold, even if a later one would score higher.
#[derive(Debug, Clone, Default)]
pub struct PreferenceStore {
    records: Vec<PreferenceRecord>,
    config: PreferenceConfig,
}

impl PreferenceStore {
    pub fn new(config: PreferenceConfig) -> Self {
        Self {
            records: Vec::new(),
            config,
        }
    }

    /// Rebuild a store from persisted records, enforcing the capacity.
    ///
    /// Records that could not have been produced by a capture (zero usage,
    /// out-of-range context) are dropped with a warning.
    pub fn from_records(records: Vec<PreferenceRecord>, config: PreferenceConfig) -> Self {
        let records = records
            .into_iter()
            .filter(|record| {
                if record.usage_count == 0 {
                    log_warn!("dropping stored record {}: usage count is 0", record.id);
                    return false;
                }
                if !record.context.is_well_formed() {
                    log_warn!("dropping stored record {}: context out of range", record.id);
                    return false;
                }
                true
            })
            .collect();

        let mut store = Self { records, config };
        store.evict();
        store
    }

    pub fn config(&self) -> &PreferenceConfig {
        &self.config
    }

    pub fn records(&self) -> &[PreferenceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PreferenceRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// First record similar enough to `context`, with its score.
    pub fn find_similar(&self, context: &ContextVector) -> Option<(usize, f64)> {
        self.records.iter().enumerate().find_map(|(idx, record)| {
            let score = similarity(&record.context, context, &self.config);
            (score >= self.config.similarity_threshold).then_some((idx, score))
        })
    }

    pub fn record(&mut self, capture: CaptureInput) -> RecordOutcome {
        self.record_at(capture, Utc::now())
    }

    /// Learn from a capture: merge into the first similar record or append.
    pub fn record_at(&mut self, capture: CaptureInput, now: DateTime<Utc>) -> RecordOutcome {
        capture.context.assert_well_formed();
        let weight = self.config.capture_weight(capture.liked);

        let (record_id, merged, usage_count) = match self.find_similar(&capture.context) {
            Some((idx, score)) => {
                let record = &mut self.records[idx];
                let old_weight = f64::from(record.usage_count);
                let new_weight = f64::from(weight);

                record.settings =
                    merge_settings(&record.settings, &capture.settings, old_weight, new_weight);
                record.filters =
                    merge_filters(&record.filters, &capture.filters, old_weight, new_weight);
                record.manual_adjustments = merge_manual(
                    &record.manual_adjustments,
                    &capture.manual_adjustments,
                    old_weight,
                    new_weight,
                );
                record.mode = heavier(&record.mode, &capture.mode, old_weight, new_weight);
                record.usage_count = record.usage_count.saturating_add(weight);
                record.is_liked = record.is_liked || capture.liked;
                record.last_used = now;

                log_debug!(
                    "merged capture into record {} (similarity {:.3}, usage {})",
                    record.id,
                    score,
                    record.usage_count
                );
                (record.id.clone(), true, record.usage_count)
            }
            None => {
                let record = PreferenceRecord {
                    id: Uuid::new_v4().to_string(),
                    context: capture.context,
                    settings: capture.settings,
                    filters: capture.filters,
                    mode: capture.mode,
                    manual_adjustments: capture.manual_adjustments,
                    usage_count: weight,
                    is_liked: capture.liked,
                    last_used: now,
                };
                log_debug!("created preference record {}", record.id);
                let id = record.id.clone();
                self.records.push(record);
                (id, false, weight)
            }
        };

        let evicted = self.evict();

        RecordOutcome {
            record_id,
            merged,
            usage_count,
            evicted,
        }
    }

    /// Learned settings for `context`, or the baseline when nothing matches.
    pub fn apply(
        &self,
        context: &ContextVector,
        baseline: &RecommendedSettings,
    ) -> AppliedPreference {
        let Some((idx, score)) = self.find_similar(context) else {
            return AppliedPreference {
                settings: baseline.clone(),
                source: PreferenceSource::Ai,
            };
        };

        let record = &self.records[idx];
        let share = self.config.blend_for(record.is_liked);
        AppliedPreference {
            settings: blend_settings(&record.settings, baseline, share),
            source: PreferenceSource::User {
                record_id: record.id.clone(),
                filters: record.filters,
                mode: record.mode.clone(),
                manual_adjustments: record.manual_adjustments,
                is_liked: record.is_liked,
                similarity: score,
            },
        }
    }

    /// Mark a record as liked after the fact. The flag never reverts.
    pub fn mark_liked(&mut self, id: &str) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.is_liked = true;
                record.last_used = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Drop the weakest records beyond capacity. Liked records rank first,
    /// then higher usage, then the most recently used.
    fn evict(&mut self) -> usize {
        if self.records.len() <= self.config.max_records {
            return 0;
        }

        self.records.sort_by_key(|r| {
            (
                Reverse(r.is_liked),
                Reverse(r.usage_count),
                Reverse(r.last_used),
            )
        });
        let evicted = self.records.len() - self.config.max_records;
        self.records.truncate(self.config.max_records);
        log_info!("evicted {} preference record(s)", evicted);
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn context(label: &str, brightness: f64, color_temp: f64) -> ContextVector {
        ContextVector {
            object_type: Some(label.to_string()),
            brightness,
            color_temp,
            saturation_pct: 40.0,
            is_warm_tone: false,
            is_cool_tone: false,
            is_backlit: false,
            is_low_light: false,
        }
    }

    fn capture(ctx: ContextVector, warmth: f64, liked: bool) -> CaptureInput {
        CaptureInput {
            context: ctx,
            settings: RecommendedSettings::default(),
            filters: FilterParams::new(100.0, 100.0, 100.0, warmth),
            mode: "natural".into(),
            manual_adjustments: ManualAdjustments::new(0.0, 0.0, 0.0, warmth),
            liked,
        }
    }

    #[test]
    fn near_duplicate_context_merges() {
        let mut store = PreferenceStore::default();
        let first = store.record(capture(context("pizza", 100.0, 10.0), 0.0, false));
        let second = store.record(capture(context("pizza", 104.0, 13.0), 10.0, false));

        assert!(!first.merged);
        assert!(second.merged);
        assert_eq!(first.record_id, second.record_id);
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].usage_count, 2);
        assert_eq!(store.records()[0].manual_adjustments.warmth, 5.0);
    }

    #[test]
    fn different_label_creates_new_record() {
        let mut store = PreferenceStore::default();
        store.record(capture(context("pizza", 100.0, 10.0), 0.0, false));
        // label mismatch alone drops similarity to 0.65
        let outcome = store.record(capture(context("cake", 100.0, 10.0), 0.0, false));
        assert!(!outcome.merged);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn liked_capture_outweighs_later_ones() {
        let mut store = PreferenceStore::default();
        let ctx = context("cake", 120.0, 0.0);
        store.record(capture(ctx.clone(), 20.0, true));
        store.record(capture(ctx.clone(), 0.0, false));
        store.record(capture(ctx, 0.0, false));

        let record = &store.records()[0];
        assert_eq!(record.usage_count, 5);
        assert_eq!(record.manual_adjustments.warmth, 12.0);
        let unweighted: f64 = 20.0 / 3.0;
        assert!((record.manual_adjustments.warmth - 20.0).abs() < (unweighted - 20.0).abs());
    }

    #[test]
    fn merge_conserves_weight_without_overshoot() {
        let mut store = PreferenceStore::default();
        let ctx = context("bowl", 90.0, -5.0);
        store.record(capture(ctx.clone(), -30.0, false));
        store.record(capture(ctx.clone(), 40.0, false));
        let before = store.records()[0].clone();

        store.record(capture(ctx, 10.0, true));
        let after = &store.records()[0];

        assert_eq!(after.usage_count, before.usage_count + 3);
        let lo = before.filters.warmth.min(10.0);
        let hi = before.filters.warmth.max(10.0);
        assert!((lo..=hi).contains(&after.filters.warmth));
    }

    #[test]
    fn mode_follows_heavier_side() {
        let mut store = PreferenceStore::default();
        let ctx = context("cake", 120.0, 0.0);
        let mut liked = capture(ctx.clone(), 0.0, true);
        liked.mode = "warm".into();
        store.record(liked);

        let mut later = capture(ctx.clone(), 0.0, false);
        later.mode = "cool".into();
        store.record(later);
        assert_eq!(store.records()[0].mode, "warm");

        // usage is now 4; a liked capture (3) is lighter and still loses
        let mut again = capture(ctx, 0.0, true);
        again.mode = "moody".into();
        store.record(again);
        assert_eq!(store.records()[0].mode, "warm");
    }

    #[test]
    fn malformed_stored_records_are_dropped_on_load() {
        let mut seed = PreferenceStore::default();
        let ctx = context("cake", 120.0, 0.0);
        seed.record(capture(ctx.clone(), 0.0, false));
        seed.record(capture(context("cup", 60.0, 0.0), 0.0, false));
        seed.record(capture(context("bowl", 200.0, 0.0), 0.0, false));

        let mut records = seed.records().to_vec();
        records[0].usage_count = 0;
        records[1].context.brightness = f64::NAN;
        let kept_id = records[2].id.clone();

        let mut store = PreferenceStore::from_records(records, PreferenceConfig::default());
        assert_eq!(store.len(), 1);
        assert!(store.get(&kept_id).is_some());

        // the zero-usage context no longer matches anything and merges cleanly
        let outcome = store.record(capture(ctx.clone(), 10.0, false));
        assert!(!outcome.merged);
        let outcome = store.record(capture(ctx, 0.0, false));
        assert!(outcome.merged);
        assert_eq!(outcome.usage_count, 2);
    }

    #[test]
    fn like_flag_is_monotonic() {
        let mut store = PreferenceStore::default();
        let ctx = context("cup", 150.0, 0.0);
        store.record(capture(ctx.clone(), 0.0, true));
        for _ in 0..3 {
            store.record(capture(ctx.clone(), 0.0, false));
        }
        assert!(store.records()[0].is_liked);
    }

    #[test]
    fn mark_liked_after_capture() {
        let mut store = PreferenceStore::default();
        let outcome = store.record(capture(context("cup", 150.0, 0.0), 0.0, false));
        assert!(store.mark_liked(&outcome.record_id));
        assert!(store.get(&outcome.record_id).unwrap().is_liked);
        assert!(!store.mark_liked("missing"));
    }

    #[test]
    fn eviction_keeps_liked_and_heavily_used() {
        let mut store = PreferenceStore::default();
        let start = Utc::now();
        let labels: Vec<String> = (0..100).map(|i| format!("object-{i}")).collect();

        for (i, label) in labels.iter().enumerate() {
            let liked = i < 10;
            store.record_at(
                capture(context(label, 100.0, 0.0), 0.0, liked),
                start + Duration::seconds(i as i64),
            );
        }
        assert_eq!(store.len(), 100);

        let outcome = store.record_at(
            capture(context("newcomer", 100.0, 0.0), 0.0, false),
            start + Duration::seconds(500),
        );
        assert_eq!(outcome.evicted, 1);
        assert_eq!(store.len(), 100);

        let liked_left = store.records().iter().filter(|r| r.is_liked).count();
        assert_eq!(liked_left, 10);
        // the oldest unliked single-use record goes first
        assert!(store
            .records()
            .iter()
            .all(|r| r.context.object_type.as_deref() != Some("object-10")));
        assert!(store.get(&outcome.record_id).is_some());
    }

    #[test]
    fn apply_prefers_learned_record() {
        let mut store = PreferenceStore::default();
        let ctx = context("pizza", 100.0, 0.0);
        let mut input = capture(ctx.clone(), 20.0, true);
        input.settings.saturation = 80.0;
        input.mode = "vivid".into();
        store.record(input);

        let baseline = RecommendedSettings {
            saturation: 40.0,
            ..RecommendedSettings::default()
        };
        let applied = store.apply(&ctx, &baseline);
        assert!((applied.settings.saturation - 72.0).abs() < 1e-9);
        match applied.source {
            PreferenceSource::User {
                filters,
                mode,
                manual_adjustments,
                is_liked,
                ..
            } => {
                assert_eq!(filters.warmth, 20.0);
                assert_eq!(mode, "vivid");
                assert_eq!(manual_adjustments.warmth, 20.0);
                assert!(is_liked);
            }
            PreferenceSource::Ai => panic!("expected learned source"),
        }
    }

    #[test]
    fn apply_without_match_returns_baseline() {
        let store = PreferenceStore::default();
        let baseline = RecommendedSettings::default();
        let applied = store.apply(&context("pizza", 100.0, 0.0), &baseline);
        assert_eq!(applied.settings, baseline);
        assert_eq!(applied.source, PreferenceSource::Ai);
    }

    #[test]
    fn first_match_wins_over_better_match() {
        let mut store = PreferenceStore::default();
        let now = Utc::now();
        // distinct labels keep the two records apart while recording
        store.record_at(capture(context("cup", 150.0, 30.0), 1.0, false), now);
        store.record_at(capture(context("mug", 150.0, 0.0), 2.0, false), now);
        store.records[0].context.object_type = Some("mug".into());

        let (idx, score) = store.find_similar(&context("mug", 150.0, 0.0)).unwrap();
        assert_eq!(idx, 0);
        assert!(score < 1.0);
    }
}
