use serde::{Deserialize, Serialize};

use crate::models::BoundingBox;

/// Fraction of each frame dimension used when no subject is tracked.
const DEFAULT_REGION_FRACTION: f64 = 0.2;

/// Integer pixel rectangle inside a frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    /// Whole-frame region.
    pub fn full(width: u32, height: u32) -> Option<Self> {
        let region = Self::new(0, 0, width, height);
        (!region.is_empty()).then_some(region)
    }

    /// Centred default region, 20% of each dimension (at least one pixel).
    pub fn centered_default(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let w = ((f64::from(width) * DEFAULT_REGION_FRACTION).round() as u32).clamp(1, width);
        let h = ((f64::from(height) * DEFAULT_REGION_FRACTION).round() as u32).clamp(1, height);
        Some(Self::new((width - w) / 2, (height - h) / 2, w, h))
    }

    /// Clip a tracking box to the frame. `None` when nothing remains.
    pub fn from_bbox(bbox: &BoundingBox, width: u32, height: u32) -> Option<Self> {
        if !(bbox.x.is_finite() && bbox.y.is_finite() && bbox.w.is_finite() && bbox.h.is_finite())
        {
            return None;
        }
        let frame_w = f64::from(width);
        let frame_h = f64::from(height);

        let x0 = bbox.x.max(0.0).floor().min(frame_w);
        let y0 = bbox.y.max(0.0).floor().min(frame_h);
        let x1 = (bbox.x + bbox.w).min(frame_w).ceil().max(x0);
        let y1 = (bbox.y + bbox.h).min(frame_h).ceil().max(y0);

        let region = Self::new(x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32);
        (!region.is_empty()).then_some(region)
    }
}

/// Region to sample for the current tick.
///
/// A tracked box wins; without one the centred default is used. A box that
/// clips to nothing yields `None` and the caller skips the tick.
pub fn region_for(bbox: Option<&BoundingBox>, width: u32, height: u32) -> Option<Region> {
    match bbox {
        Some(bbox) => Region::from_bbox(bbox, width, height),
        None => Region::centered_default(width, height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_region_is_centred() {
        let region = region_for(None, 100, 50).unwrap();
        assert_eq!(region, Region::new(40, 20, 20, 10));
    }

    #[test]
    fn bbox_is_clipped_to_frame() {
        let bbox = BoundingBox::new(-10.0, 30.0, 50.0, 100.0);
        let region = region_for(Some(&bbox), 64, 64).unwrap();
        assert_eq!(region, Region::new(0, 30, 40, 34));
    }

    #[test]
    fn zero_area_regions_are_rejected() {
        let outside = BoundingBox::new(200.0, 200.0, 10.0, 10.0);
        assert_eq!(region_for(Some(&outside), 64, 64), None);

        let flat = BoundingBox::new(10.0, 10.0, 0.0, 10.0);
        assert_eq!(region_for(Some(&flat), 64, 64), None);

        assert_eq!(region_for(None, 0, 64), None);
    }

    #[test]
    fn tiny_frames_still_get_a_pixel() {
        assert_eq!(region_for(None, 2, 2), Some(Region::new(0, 0, 1, 1)));
    }
}
