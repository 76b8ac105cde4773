//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use image::{Rgba, RgbaImage};
use scenetune::{
    models::{BoundingBox, Detection},
    persistence::{MemoryBackend, PreferenceBackend},
    settings::BackendKind,
    EngineSettings, TuningEngine,
};

pub const WIDTH: u32 = 64;
pub const HEIGHT: u32 = 48;

/// Uniform frame of one colour.
pub fn solid_frame(rgb: [u8; 3]) -> RgbaImage {
    RgbaImage::from_pixel(WIDTH, HEIGHT, Rgba([rgb[0], rgb[1], rgb[2], 255]))
}

/// Dark object in the middle of a bright surround.
pub fn backlit_frame() -> RgbaImage {
    let mut frame = solid_frame([235, 235, 235]);
    for y in 16..32 {
        for x in 20..44 {
            frame.put_pixel(x, y, Rgba([60, 50, 45, 255]));
        }
    }
    frame
}

pub fn detection(label: &str) -> Detection {
    Detection::new(label, 0.9, BoundingBox::new(20.0, 16.0, 24.0, 16.0))
}

pub fn fast_settings() -> EngineSettings {
    EngineSettings {
        sampling_interval_ms: 10,
        render_interval_ms: 5,
        backend: BackendKind::Memory,
        ..EngineSettings::default()
    }
}

pub async fn memory_engine() -> (TuningEngine, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    let dyn_backend: Arc<dyn PreferenceBackend> = backend.clone();
    (TuningEngine::load(fast_settings(), dyn_backend).await, backend)
}
