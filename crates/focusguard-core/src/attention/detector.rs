//! Landmark detector backends and the fallback chain that selects one.

use image::RgbaImage;
use log::{info, warn};

use super::observation::FaceObservation;
use crate::error::DetectorError;

pub trait LandmarkDetector {
    fn backend(&self) -> &str;

    fn detect(&mut self, frame: &RgbaImage) -> Result<Vec<FaceObservation>, DetectorError>;
}

/// Factory for a detector backend. Loading may fail independently per backend.
pub trait DetectorProvider {
    fn backend(&self) -> &str;

    fn load(&self) -> Result<Box<dyn LandmarkDetector>, DetectorError>;
}

/// Try each provider in order and keep the first that loads.
///
/// Returns `None` when every backend fails; the caller keeps the stream live and
/// shows raw video.
pub fn load_first_available(
    providers: &[Box<dyn DetectorProvider>],
) -> Option<Box<dyn LandmarkDetector>> {
    for provider in providers {
        match provider.load() {
            Ok(detector) => {
                info!("landmark backend '{}' loaded", provider.backend());
                return Some(detector);
            }
            Err(err) => warn!("{err}; trying next backend"),
        }
    }
    warn!("no landmark backend available, showing raw video");
    None
}
