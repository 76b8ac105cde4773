pub mod config;
pub mod merge;
pub mod similarity;
pub mod store;

pub use config::PreferenceConfig;
pub use similarity::similarity;
pub use store::{CaptureInput, PreferenceStore, RecordOutcome};
