use serde::Serialize;

use crate::models::FilterParams;

pub const DEFAULT_MODE: &str = "natural";

/// Named baseline filter bundle, selectable independently of learning.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModePreset {
    pub name: &'static str,
    pub filters: FilterParams,
}

const PRESETS: &[ModePreset] = &[
    ModePreset {
        name: "natural",
        filters: FilterParams {
            brightness: 100.0,
            contrast: 100.0,
            saturate: 100.0,
            warmth: 0.0,
        },
    },
    ModePreset {
        name: "vivid",
        filters: FilterParams {
            brightness: 105.0,
            contrast: 115.0,
            saturate: 135.0,
            warmth: 5.0,
        },
    },
    ModePreset {
        name: "moody",
        filters: FilterParams {
            brightness: 92.0,
            contrast: 125.0,
            saturate: 80.0,
            warmth: -10.0,
        },
    },
    ModePreset {
        name: "warm",
        filters: FilterParams {
            brightness: 103.0,
            contrast: 100.0,
            saturate: 110.0,
            warmth: 25.0,
        },
    },
    ModePreset {
        name: "cool",
        filters: FilterParams {
            brightness: 100.0,
            contrast: 105.0,
            saturate: 95.0,
            warmth: -25.0,
        },
    },
    ModePreset {
        name: "mono-soft",
        filters: FilterParams {
            brightness: 105.0,
            contrast: 90.0,
            saturate: 60.0,
            warmth: 0.0,
        },
    },
];

impl ModePreset {
    pub fn all() -> &'static [ModePreset] {
        PRESETS
    }

    pub fn find(name: &str) -> Option<&'static ModePreset> {
        let name = name.trim();
        PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Preset by name, falling back to `natural` for unknown names.
    pub fn by_name(name: &str) -> &'static ModePreset {
        Self::find(name).unwrap_or(&PRESETS[0])
    }
}
