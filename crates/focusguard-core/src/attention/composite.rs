//! Privacy composite: the full frame is blurred except for the closest face.

use image::{imageops, RgbaImage};

use super::observation::{BoundingBox, FaceObservation};

/// Pixel rectangle copied unblurred onto the composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Pick the widest face box, pad it on every side and clamp it to the frame.
pub fn sharp_region(
    boxes: &[BoundingBox],
    padding: f64,
    frame_width: u32,
    frame_height: u32,
) -> Option<CropRegion> {
    let closest = boxes
        .iter()
        .max_by(|a, b| a.width().total_cmp(&b.width()))?;

    let (w, h) = (frame_width as f64, frame_height as f64);
    let x = (closest.min_x - closest.width() * padding).floor().clamp(0.0, w);
    let y = (closest.min_y - closest.height() * padding).floor().clamp(0.0, h);
    let width = (closest.width() * (1.0 + 2.0 * padding)).floor().min(w - x).max(0.0);
    let height = (closest.height() * (1.0 + 2.0 * padding)).floor().min(h - y).max(0.0);

    if width < 1.0 || height < 1.0 {
        return None;
    }
    Some(CropRegion {
        x: x as u32,
        y: y as u32,
        width: width as u32,
        height: height as u32,
    })
}

/// Render the composite for one frame. Frames without faces are returned as-is.
pub fn render_composite(
    frame: &RgbaImage,
    faces: &[FaceObservation],
    padding: f64,
    blur_sigma: f32,
) -> RgbaImage {
    let (w, h) = frame.dimensions();
    let boxes: Vec<BoundingBox> = faces
        .iter()
        .filter_map(|f| f.bounding_box(w as f64, h as f64))
        .collect();

    if boxes.is_empty() {
        return frame.clone();
    }

    let mut composite = imageops::blur(frame, blur_sigma);
    if let Some(region) = sharp_region(&boxes, padding, w, h) {
        let sharp =
            imageops::crop_imm(frame, region.x, region.y, region.width, region.height).to_image();
        imageops::replace(&mut composite, &sharp, region.x as i64, region.y as i64);
    }
    composite
}

/// Tracks when the last composite was produced so a stale view can be replaced
/// by the raw camera feed.
#[derive(Debug, Clone)]
pub struct CompositeMonitor {
    stale_after_ms: u64,
    last_success_ms: Option<u64>,
}

impl CompositeMonitor {
    pub fn new(stale_after_ms: u64) -> Self {
        Self {
            stale_after_ms,
            last_success_ms: None,
        }
    }

    pub fn record_success(&mut self, now_ms: u64) {
        self.last_success_ms = Some(now_ms);
    }

    pub fn reset(&mut self) {
        self.last_success_ms = None;
    }

    pub fn ms_since_success(&self, now_ms: u64) -> Option<u64> {
        self.last_success_ms.map(|t| now_ms.saturating_sub(t))
    }

    pub fn needs_raw_fallback(&self, now_ms: u64) -> bool {
        self.ms_since_success(now_ms)
            .map_or(true, |elapsed| elapsed > self.stale_after_ms)
    }
}
