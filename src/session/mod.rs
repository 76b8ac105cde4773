//! Live capture sessions: state, frame feed, the two background loops and
//! the controller that owns them.

mod controller;
mod feed;
mod loop_worker;
pub mod pipeline;
mod state;

pub use controller::{CaptureResult, SessionController};
pub use feed::FrameFeed;
pub use pipeline::{analyze, evaluate, resolve, Analysis, Evaluation};
pub use state::Session;
