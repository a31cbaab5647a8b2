//! Face signal classifier.
//!
//! Owns the camera stream and detector, classifies every frame, debounces the
//! result and publishes an [`AttentionState`].
//!
//! ## State Transitions
//!
//! ```text
//! Off -> PermissionNeeded -> Initializing -> Focused <-> Distracted <-> Away
//!                                         \-> PermissionDenied | Error
//! (any) -> Off
//! ```
//!
//! Like the timer engine this is a caller-driven state machine: the capture
//! scheduler calls [`FaceSignalClassifier::process_frame`] once per frame and the
//! 1 Hz scheduler calls [`FaceSignalClassifier::poll`] so the debounce timer fires
//! even when frames stall.

use image::RgbaImage;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use super::camera::{CameraProvider, CaptureConstraints, CaptureQuality, CaptureStream, Orientation};
use super::composite::{render_composite, CompositeMonitor};
use super::debounce::DebounceTimer;
use super::detector::{load_first_available, DetectorProvider, LandmarkDetector};
use super::observation::{classify, FaceObservation, GazeThresholds};
use super::state::AttentionState;
use super::stillness::StillnessTracker;
use crate::clock::to_datetime;
use crate::error::CaptureError;
use crate::events::Event;

/// Tunables for classification, debounce, stillness and rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_pupil_offset")]
    pub pupil_offset_threshold: f64,
    #[serde(default = "default_gaze_confidence")]
    pub gaze_confidence_threshold: f64,
    #[serde(default = "default_stillness_px")]
    pub stillness_movement_px: f64,
    #[serde(default = "default_stillness_ms")]
    pub stillness_after_ms: u64,
    #[serde(default = "default_face_padding")]
    pub face_padding: f64,
    #[serde(default = "default_blur_sigma")]
    pub blur_sigma: f32,
    #[serde(default = "default_composite_stale_ms")]
    pub composite_stale_ms: u64,
}

fn default_debounce_ms() -> u64 {
    2_000
}
fn default_pupil_offset() -> f64 {
    0.4
}
fn default_gaze_confidence() -> f64 {
    0.6
}
fn default_stillness_px() -> f64 {
    1.5
}
fn default_stillness_ms() -> u64 {
    7_000
}
fn default_face_padding() -> f64 {
    0.35
}
fn default_blur_sigma() -> f32 {
    12.0
}
fn default_composite_stale_ms() -> u64 {
    1_200
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            pupil_offset_threshold: default_pupil_offset(),
            gaze_confidence_threshold: default_gaze_confidence(),
            stillness_movement_px: default_stillness_px(),
            stillness_after_ms: default_stillness_ms(),
            face_padding: default_face_padding(),
            blur_sigma: default_blur_sigma(),
            composite_stale_ms: default_composite_stale_ms(),
        }
    }
}

impl ClassifierConfig {
    fn thresholds(&self) -> GazeThresholds {
        GazeThresholds {
            pupil_offset: self.pupil_offset_threshold,
            gaze_confidence: self.gaze_confidence_threshold,
        }
    }
}

/// Point-in-time diagnostics for a debug overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierDebug {
    pub state: AttentionState,
    pub stream_dimensions: Option<(u32, u32)>,
    pub backend: Option<String>,
    pub ms_since_composite: Option<u64>,
    pub raw_video_fallback: bool,
    pub orientation: Orientation,
    pub quality: CaptureQuality,
    pub debounce_pending: bool,
}

pub struct FaceSignalClassifier {
    config: ClassifierConfig,
    state: AttentionState,
    camera: Box<dyn CameraProvider>,
    providers: Vec<Box<dyn DetectorProvider>>,
    stream: Option<Box<dyn CaptureStream>>,
    detector: Option<Box<dyn LandmarkDetector>>,
    constraints: CaptureConstraints,
    /// Cooperative loop flag: frames are ignored once cleared.
    capturing: bool,
    debounce: DebounceTimer<AttentionState>,
    stillness: StillnessTracker,
    composite: CompositeMonitor,
    last_composite: Option<RgbaImage>,
}

impl FaceSignalClassifier {
    pub fn new(
        config: ClassifierConfig,
        camera: Box<dyn CameraProvider>,
        providers: Vec<Box<dyn DetectorProvider>>,
        constraints: CaptureConstraints,
        now_ms: u64,
    ) -> Self {
        Self {
            debounce: DebounceTimer::new(config.debounce_ms),
            stillness: StillnessTracker::new(
                config.stillness_movement_px,
                config.stillness_after_ms,
                now_ms,
            ),
            composite: CompositeMonitor::new(config.composite_stale_ms),
            config,
            state: AttentionState::Off,
            camera,
            providers,
            stream: None,
            detector: None,
            constraints,
            capturing: false,
            last_composite: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> AttentionState {
        self.state
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    pub fn constraints(&self) -> CaptureConstraints {
        self.constraints
    }

    pub fn backend(&self) -> Option<&str> {
        self.detector.as_ref().map(|d| d.backend())
    }

    /// True when the consumer should show the raw feed instead of the composite.
    pub fn needs_raw_fallback(&self, now_ms: u64) -> bool {
        self.composite.needs_raw_fallback(now_ms)
    }

    pub fn latest_composite(&self) -> Option<&RgbaImage> {
        self.last_composite.as_ref()
    }

    pub fn debug_snapshot(&self, now_ms: u64) -> ClassifierDebug {
        ClassifierDebug {
            state: self.state,
            stream_dimensions: self.stream.as_ref().map(|s| s.dimensions()),
            backend: self.backend().map(str::to_string),
            ms_since_composite: self.composite.ms_since_success(now_ms),
            raw_video_fallback: self.needs_raw_fallback(now_ms),
            orientation: self.constraints.orientation,
            quality: self.constraints.quality,
            debounce_pending: self.debounce.is_armed(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Enable the classifier. Asks for permission unless a capture already exists
    /// or the previous attempt ended in a terminal state.
    pub fn activate(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        if self.stream.is_none() && !self.state.is_terminal() {
            self.publish(AttentionState::PermissionNeeded, now_ms, &mut events);
        }
        events
    }

    /// Acquire the camera and start classifying.
    ///
    /// Valid after activation or from a terminal state (retry).
    pub fn grant(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        if !matches!(
            self.state,
            AttentionState::PermissionNeeded
                | AttentionState::PermissionDenied
                | AttentionState::Error
        ) {
            debug!("grant ignored in state {}", self.state);
            return events;
        }

        self.publish(AttentionState::Initializing, now_ms, &mut events);
        self.release_stream();

        match self.camera.acquire(&self.constraints) {
            Ok(stream) => {
                let (w, h) = stream.dimensions();
                info!("camera acquired at {w}x{h}");
                self.stream = Some(stream);
                self.publish(AttentionState::Focused, now_ms, &mut events);

                if self.detector.is_none() {
                    self.detector = load_first_available(&self.providers);
                }
                self.debounce.cancel();
                self.stillness.reset(now_ms);
                self.composite.reset();
                self.capturing = true;
            }
            Err(err) => {
                warn!("camera acquisition failed: {err}");
                self.publish(failure_state(&err), now_ms, &mut events);
            }
        }
        events
    }

    /// Tear down unconditionally: stop the stream, end the loop, clear the timer.
    pub fn deactivate(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        self.capturing = false;
        self.release_stream();
        self.debounce.cancel();
        self.composite.reset();
        self.last_composite = None;
        self.publish(AttentionState::Off, now_ms, &mut events);
        events
    }

    /// Change orientation, re-acquiring the stream if one is live.
    pub fn set_orientation(&mut self, now_ms: u64, orientation: Orientation) -> Vec<Event> {
        if self.constraints.orientation == orientation {
            return Vec::new();
        }
        self.constraints.orientation = orientation;
        self.reacquire(now_ms)
    }

    pub fn set_quality(&mut self, now_ms: u64, quality: CaptureQuality) -> Vec<Event> {
        if self.constraints.quality == quality {
            return Vec::new();
        }
        self.constraints.quality = quality;
        self.reacquire(now_ms)
    }

    /// Fire the debounce timer if due. Called from the 1 Hz scheduler.
    pub fn poll(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        if self.capturing {
            self.fire_debounce(now_ms, &mut events);
        }
        events
    }

    /// One iteration of the capture loop: read, detect, render, classify.
    pub fn process_frame(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        if !self.capturing {
            return events;
        }
        self.fire_debounce(now_ms, &mut events);

        let Some(frame) = self.stream.as_mut().and_then(|s| s.read_frame()) else {
            return events;
        };
        let Some(detector) = self.detector.as_mut() else {
            return events;
        };

        let faces = match detector.detect(&frame) {
            Ok(faces) => faces,
            Err(err) => {
                debug!("{err}; treating frame as no detection");
                Vec::new()
            }
        };

        self.last_composite = Some(render_composite(
            &frame,
            &faces,
            self.config.face_padding,
            self.config.blur_sigma,
        ));
        self.composite.record_success(now_ms);

        self.classify_faces(now_ms, &faces, &mut events);
        events
    }

    /// Classify observations produced outside the capture loop (trace replay).
    pub fn process_observations(&mut self, now_ms: u64, faces: &[FaceObservation]) -> Vec<Event> {
        let mut events = Vec::new();
        if !self.capturing {
            return events;
        }
        self.fire_debounce(now_ms, &mut events);
        self.classify_faces(now_ms, faces, &mut events);
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn classify_faces(&mut self, now_ms: u64, faces: &[FaceObservation], events: &mut Vec<Event>) {
        let raw = classify(faces, &self.config.thresholds());
        self.submit(now_ms, raw.into());

        if let Some(centroid) = faces.first().and_then(FaceObservation::centroid) {
            self.stillness.observe(now_ms, centroid);
        }
        if let Some(still_for_ms) = self.stillness.check(now_ms) {
            info!("prolonged stillness ({still_for_ms} ms)");
            events.push(Event::StillnessDetected {
                still_for_ms,
                at: to_datetime(now_ms),
            });
        }
    }

    fn submit(&mut self, now_ms: u64, candidate: AttentionState) {
        if candidate == self.state {
            self.debounce.cancel();
        } else {
            self.debounce.arm(now_ms, candidate);
        }
    }

    fn fire_debounce(&mut self, now_ms: u64, events: &mut Vec<Event>) {
        if let Some(candidate) = self.debounce.poll(now_ms) {
            self.publish(candidate, now_ms, events);
        }
    }

    fn publish(&mut self, next: AttentionState, now_ms: u64, events: &mut Vec<Event>) {
        if next == self.state {
            return;
        }
        debug!("attention {} -> {}", self.state, next);
        events.push(Event::AttentionChanged {
            from: self.state,
            to: next,
            at: to_datetime(now_ms),
        });
        self.state = next;
    }

    fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            debug!("camera stream released");
        }
    }

    /// Swap the live stream for one matching the current constraints. A failed
    /// acquisition ends capture in the same terminal state a failed grant would.
    fn reacquire(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        if self.stream.is_none() {
            return events;
        }
        self.release_stream();
        match self.camera.acquire(&self.constraints) {
            Ok(stream) => self.stream = Some(stream),
            Err(err) => {
                error!("failed to re-acquire camera: {err}");
                self.capturing = false;
                self.debounce.cancel();
                self.composite.reset();
                self.last_composite = None;
                self.publish(failure_state(&err), now_ms, &mut events);
            }
        }
        events
    }
}

fn failure_state(err: &CaptureError) -> AttentionState {
    match err {
        CaptureError::PermissionDenied => AttentionState::PermissionDenied,
        CaptureError::Device(_) => AttentionState::Error,
    }
}

impl Drop for FaceSignalClassifier {
    fn drop(&mut self) {
        self.release_stream();
    }
}
