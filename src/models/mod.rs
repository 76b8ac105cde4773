pub mod detection;
pub mod filters;
pub mod preference;
pub mod recommendation;
pub mod scene;
pub mod session;

pub use detection::{BoundingBox, Detection};
pub use filters::{FilterDelta, FilterOrigin, FilterParams, ManualAdjustments};
pub use preference::{AppliedPreference, PreferenceRecord, PreferenceSource};
pub use recommendation::{ContrastHint, RecommendedSettings, WhiteBalance};
pub use scene::{ColorVibrancy, ContextVector, SceneSample};
pub use session::{CaptureSnapshot, PreviewFrame, SessionStatus};
