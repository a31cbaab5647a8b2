//! Camera capture seam.
//!
//! The classifier owns at most one [`CaptureStream`] at a time and always stops
//! the previous stream before acquiring another.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::CaptureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureQuality {
    #[default]
    Hd,
    /// Conservative 640x480 for devices that reject HD constraints.
    Safe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CaptureConstraints {
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub quality: CaptureQuality,
}

impl CaptureConstraints {
    /// Ideal (width, height) requested from the device.
    pub fn ideal_resolution(&self) -> (u32, u32) {
        match (self.quality, self.orientation) {
            (CaptureQuality::Safe, _) => (640, 480),
            (CaptureQuality::Hd, Orientation::Landscape) => (1280, 720),
            (CaptureQuality::Hd, Orientation::Portrait) => (720, 1280),
        }
    }
}

/// A live capture. Dropping a stream without calling `stop` leaks the device on
/// some platforms, so owners always stop explicitly.
pub trait CaptureStream {
    fn dimensions(&self) -> (u32, u32);

    /// The latest frame, or `None` while the device is not ready.
    fn read_frame(&mut self) -> Option<RgbaImage>;

    fn stop(&mut self);

    fn is_live(&self) -> bool;
}

pub trait CameraProvider {
    fn acquire(
        &mut self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn CaptureStream>, CaptureError>;
}

/// In-memory camera that yields a fixed frame. Used for trace replay and tests.
#[derive(Debug, Clone)]
pub struct VirtualCamera {
    outcome: Result<(), CaptureError>,
    frame: Option<RgbaImage>,
    acquisitions: usize,
    /// Acquisitions that succeed before `outcome` applies.
    grace: usize,
}

impl VirtualCamera {
    /// A camera that grants access but never produces pixels.
    pub fn blank() -> Self {
        Self {
            outcome: Ok(()),
            frame: None,
            acquisitions: 0,
            grace: 0,
        }
    }

    pub fn with_frame(frame: RgbaImage) -> Self {
        Self {
            outcome: Ok(()),
            frame: Some(frame),
            acquisitions: 0,
            grace: 0,
        }
    }

    pub fn failing(error: CaptureError) -> Self {
        Self {
            outcome: Err(error),
            frame: None,
            acquisitions: 0,
            grace: 0,
        }
    }

    /// Grants `successes` acquisitions, then fails every later one with `error`.
    pub fn failing_after(successes: usize, error: CaptureError) -> Self {
        Self {
            grace: successes,
            ..Self::failing(error)
        }
    }

    pub fn acquisitions(&self) -> usize {
        self.acquisitions
    }
}

impl CameraProvider for VirtualCamera {
    fn acquire(
        &mut self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn CaptureStream>, CaptureError> {
        if self.acquisitions >= self.grace {
            self.outcome.clone()?;
        }
        self.acquisitions += 1;
        let dimensions = self
            .frame
            .as_ref()
            .map(|f| f.dimensions())
            .unwrap_or_else(|| constraints.ideal_resolution());
        Ok(Box::new(VirtualStream {
            dimensions,
            frame: self.frame.clone(),
            live: true,
        }))
    }
}

#[derive(Debug)]
struct VirtualStream {
    dimensions: (u32, u32),
    frame: Option<RgbaImage>,
    live: bool,
}

impl CaptureStream for VirtualStream {
    fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    fn read_frame(&mut self) -> Option<RgbaImage> {
        if !self.live {
            return None;
        }
        self.frame.clone()
    }

    fn stop(&mut self) {
        self.live = false;
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ideal_resolution_follows_constraints() {
        let mut c = CaptureConstraints::default();
        assert_eq!(c.ideal_resolution(), (1280, 720));
        c.orientation = Orientation::Portrait;
        assert_eq!(c.ideal_resolution(), (720, 1280));
        c.quality = CaptureQuality::Safe;
        assert_eq!(c.ideal_resolution(), (640, 480));
    }

    #[test]
    fn failing_camera_reports_error() {
        let mut camera = VirtualCamera::failing(CaptureError::PermissionDenied);
        let err = camera.acquire(&CaptureConstraints::default()).err();
        assert_eq!(err, Some(CaptureError::PermissionDenied));
        assert_eq!(camera.acquisitions(), 0);
    }

    #[test]
    fn stopped_stream_yields_no_frames() {
        let mut camera = VirtualCamera::with_frame(RgbaImage::new(4, 4));
        let mut stream = camera.acquire(&CaptureConstraints::default()).unwrap();
        assert!(stream.read_frame().is_some());
        stream.stop();
        assert!(!stream.is_live());
        assert!(stream.read_frame().is_none());
    }
}
