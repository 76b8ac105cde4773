use std::sync::Arc;

use anyhow::{Context, Result};
use image::RgbaImage;

use crate::compositor::apply_filters;
use crate::models::{FilterOrigin, FilterParams, ManualAdjustments};

use super::kinds::VariantKind;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// One rendered look. Holds its own raw base so it can be re-adjusted
/// without touching the other variants or the source frame.
#[derive(Debug, Clone)]
pub struct CaptureVariant {
    pub kind: VariantKind,
    pub rendered: RgbaImage,
    pub raw_base: Arc<RgbaImage>,
    /// Variant look before any per-variant slider change.
    pub base_filters: FilterParams,
    pub user_adjustments: ManualAdjustments,
    /// Parameters behind `rendered`.
    pub filters: FilterParams,
}

impl CaptureVariant {
    pub fn id(&self) -> &'static str {
        self.kind.id()
    }

    /// Re-render from the raw base with new sliders for this variant only.
    /// On failure the variant keeps its previous render.
    pub fn readjust(&mut self, manual: ManualAdjustments) -> Result<()> {
        let manual = manual.clamped();
        let filters = self.base_filters.offset(&manual.scaled()).clamped_variant();
        let rendered = apply_filters(&self.raw_base, &filters)
            .with_context(|| format!("failed to re-render variant {}", self.id()))?;

        self.rendered = rendered;
        self.filters = filters;
        self.user_adjustments = manual;
        Ok(())
    }
}

/// Result of a multi-capture: the variants that rendered plus the ones
/// that were dropped and why.
#[derive(Debug, Clone, Default)]
pub struct VariantSet {
    pub variants: Vec<CaptureVariant>,
    pub failed: Vec<(VariantKind, String)>,
}

impl VariantSet {
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn get(&self, kind: VariantKind) -> Option<&CaptureVariant> {
        self.variants.iter().find(|v| v.kind == kind)
    }

    pub fn get_mut(&mut self, kind: VariantKind) -> Option<&mut CaptureVariant> {
        self.variants.iter_mut().find(|v| v.kind == kind)
    }
}

/// Strip the current sliders back out of the live parameters.
pub fn ai_base(live: &FilterParams, manual: &ManualAdjustments, origin: FilterOrigin) -> FilterParams {
    live.subtract(&origin.manual_delta(manual))
}

/// Variant look for `kind` on top of `base`, in the tighter variant ranges.
pub fn variant_filters(base: &FilterParams, kind: VariantKind) -> FilterParams {
    base.offset(&kind.delta()).clamped_variant()
}

pub fn render_variants(
    raw: Arc<RgbaImage>,
    live: &FilterParams,
    manual: &ManualAdjustments,
    origin: FilterOrigin,
) -> VariantSet {
    render_variants_with(raw, live, manual, origin, apply_filters)
}

/// Render all five looks with `render`. A look whose render fails is left
/// out of the set; the rest still complete.
pub fn render_variants_with<F>(
    raw: Arc<RgbaImage>,
    live: &FilterParams,
    manual: &ManualAdjustments,
    origin: FilterOrigin,
    render: F,
) -> VariantSet
where
    F: Fn(&RgbaImage, &FilterParams) -> Result<RgbaImage>,
{
    let base = ai_base(live, manual, origin);
    let mut set = VariantSet::default();

    for kind in VariantKind::ALL {
        let filters = variant_filters(&base, kind);
        match render(raw.as_ref(), &filters) {
            Ok(rendered) => set.variants.push(CaptureVariant {
                kind,
                rendered,
                raw_base: Arc::clone(&raw),
                base_filters: filters,
                user_adjustments: ManualAdjustments::default(),
                filters,
            }),
            Err(err) => {
                log_warn!("variant {} failed to render: {err:#}", kind.id());
                set.failed.push((kind, format!("{err:#}")));
            }
        }
    }

    log_info!(
        "rendered {}/{} variants",
        set.variants.len(),
        VariantKind::ALL.len()
    );
    set
}
