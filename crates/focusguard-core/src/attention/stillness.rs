use super::observation::Point;

/// Detects prolonged physical stillness from the face centroid.
///
/// The alert is edge-triggered: once fired it stays latched until the centroid
/// moves again, no matter how long the stillness lasts.
#[derive(Debug, Clone)]
pub struct StillnessTracker {
    movement_threshold_px: f64,
    still_after_ms: u64,
    last_centroid: Option<Point>,
    last_movement_ms: u64,
    alerted: bool,
}

impl StillnessTracker {
    pub fn new(movement_threshold_px: f64, still_after_ms: u64, now_ms: u64) -> Self {
        Self {
            movement_threshold_px,
            still_after_ms,
            last_centroid: None,
            last_movement_ms: now_ms,
            alerted: false,
        }
    }

    /// Start a fresh episode, e.g. after the camera is (re)acquired.
    pub fn reset(&mut self, now_ms: u64) {
        self.last_centroid = None;
        self.last_movement_ms = now_ms;
        self.alerted = false;
    }

    pub fn observe(&mut self, now_ms: u64, centroid: Point) {
        if let Some(prev) = self.last_centroid {
            if centroid.distance(&prev) > self.movement_threshold_px {
                self.last_movement_ms = now_ms;
                self.alerted = false;
            }
        }
        self.last_centroid = Some(centroid);
    }

    /// Returns how long the user has been still when the alert fires.
    pub fn check(&mut self, now_ms: u64) -> Option<u64> {
        let still_for = now_ms.saturating_sub(self.last_movement_ms);
        if still_for >= self.still_after_ms && !self.alerted {
            self.alerted = true;
            return Some(still_for);
        }
        None
    }

    pub fn is_alerted(&self) -> bool {
        self.alerted
    }

    pub fn last_movement_ms(&self) -> u64 {
        self.last_movement_ms
    }
}
