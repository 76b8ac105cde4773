use std::sync::Arc;

use image::RgbaImage;
use tokio::sync::watch;

use crate::models::Detection;

/// Latest-value slots for the camera frame and the tracked object.
///
/// Producers overwrite; the loops only ever see the most recent value.
pub struct FrameFeed {
    frame: watch::Sender<Option<Arc<RgbaImage>>>,
    detection: watch::Sender<Option<Detection>>,
}

impl Default for FrameFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameFeed {
    pub fn new() -> Self {
        let (frame, _) = watch::channel(None);
        let (detection, _) = watch::channel(None);
        Self { frame, detection }
    }

    pub fn push_frame(&self, frame: RgbaImage) {
        self.frame.send_replace(Some(Arc::new(frame)));
    }

    pub fn set_detection(&self, detection: Option<Detection>) {
        self.detection.send_replace(detection);
    }

    pub fn latest_frame(&self) -> Option<Arc<RgbaImage>> {
        self.frame.borrow().clone()
    }

    pub fn latest_detection(&self) -> Option<Detection> {
        self.detection.borrow().clone()
    }
}
