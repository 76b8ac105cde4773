//! Adaptive camera tuning: samples the tracked region of each frame, derives
//! capture settings, learns what the user keeps, and renders live filters
//! and multi-capture variants.

pub mod compositor;
pub mod db;
pub mod engine;
pub mod heuristics;
pub mod models;
pub mod persistence;
pub mod preferences;
pub mod sampling;
pub mod session;
pub mod settings;
pub mod variants;
mod utils;

pub use engine::TuningEngine;
pub use models::{
    Detection, FilterOrigin, FilterParams, ManualAdjustments, PreferenceRecord,
    RecommendedSettings, SceneSample,
};
pub use session::{CaptureResult, FrameFeed, Session, SessionController};
pub use settings::{EngineSettings, SettingsStore};
