//! Focus engine.
//!
//! Wires one classifier, one scorer and one session controller together and
//! routes events between them. Instances share nothing, so several engines may
//! run side by side.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = FocusEngine::new(&config, Box::new(camera), detectors, now);
//! engine.set_shield(now, true);
//! engine.grant_camera(now);
//! // capture scheduler, ~30 fps:
//! engine.on_frame(now);
//! // 1 Hz scheduler:
//! engine.tick(now);
//! ```

use serde::{Deserialize, Serialize};

use crate::attention::{
    AttentionState, CameraProvider, CaptureQuality, ClassifierDebug, DetectorProvider,
    FaceObservation, FaceSignalClassifier, Orientation,
};
use crate::config::Config;
use crate::engagement::{
    CameraSignal, EngagementScorer, FixedIdlePenalty, IdlePenalty, InputActivity,
};
use crate::events::Event;
use crate::session::{SessionController, SessionSnapshot};

/// Everything a dashboard needs in one serializable value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub attention: AttentionState,
    pub score: f64,
    pub threshold: f64,
    pub session: SessionSnapshot,
    pub classifier: ClassifierDebug,
}

pub struct FocusEngine {
    classifier: FaceSignalClassifier,
    scorer: EngagementScorer,
    controller: SessionController,
    activity: InputActivity,
    penalty: Box<dyn IdlePenalty>,
}

impl FocusEngine {
    pub fn new(
        config: &Config,
        camera: Box<dyn CameraProvider>,
        detectors: Vec<Box<dyn DetectorProvider>>,
        now_ms: u64,
    ) -> Self {
        let controller = SessionController::new(config.timer, config.alerts);
        Self::with_controller(config, camera, detectors, controller, now_ms)
    }

    /// Use a pre-built controller, e.g. one with a seeded prompt generator.
    pub fn with_controller(
        config: &Config,
        camera: Box<dyn CameraProvider>,
        detectors: Vec<Box<dyn DetectorProvider>>,
        controller: SessionController,
        now_ms: u64,
    ) -> Self {
        let penalty = FixedIdlePenalty {
            points: config.engagement.idle_penalty_points,
        };
        Self {
            classifier: FaceSignalClassifier::new(
                config.attention.clone(),
                camera,
                detectors,
                config.camera,
                now_ms,
            ),
            scorer: EngagementScorer::new(config.engagement.clone(), now_ms),
            controller,
            activity: InputActivity::new(now_ms),
            penalty: Box::new(penalty),
        }
    }

    /// Replace the idle-penalty helper.
    pub fn with_penalty(mut self, penalty: Box<dyn IdlePenalty>) -> Self {
        self.penalty = penalty;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn attention(&self) -> AttentionState {
        self.classifier.state()
    }

    pub fn score(&self) -> f64 {
        self.scorer.score()
    }

    pub fn classifier(&self) -> &FaceSignalClassifier {
        &self.classifier
    }

    pub fn scorer(&self) -> &EngagementScorer {
        &self.scorer
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// Setters and presets live on the controller.
    pub fn controller_mut(&mut self) -> &mut SessionController {
        &mut self.controller
    }

    pub fn snapshot(&self, now_ms: u64) -> EngineSnapshot {
        EngineSnapshot {
            attention: self.classifier.state(),
            score: self.scorer.score(),
            threshold: self.scorer.threshold(),
            session: self.controller.snapshot(),
            classifier: self.classifier.debug_snapshot(now_ms),
        }
    }

    // ── Schedulers ───────────────────────────────────────────────────

    /// One capture-loop iteration.
    pub fn on_frame(&mut self, now_ms: u64) -> Vec<Event> {
        let events = self.classifier.process_frame(now_ms);
        self.route(now_ms, events)
    }

    /// Feed detector output produced elsewhere, bypassing the camera.
    pub fn on_observations(&mut self, now_ms: u64, faces: &[FaceObservation]) -> Vec<Event> {
        let events = self.classifier.process_observations(now_ms, faces);
        self.route(now_ms, events)
    }

    /// The 1 Hz tick: debounce poll, scoring, penalties, countdown.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Event> {
        let polled = self.classifier.poll(now_ms);
        let mut events = self.route(now_ms, polled);

        let camera = self.camera_signal();
        events.extend(self.scorer.tick(now_ms, camera, &self.activity));
        events.extend(self.scorer.check_penalties(
            now_ms,
            camera,
            &self.activity,
            self.penalty.as_ref(),
        ));
        events.extend(self.controller.tick(
            now_ms,
            self.scorer.history(),
            self.scorer.threshold(),
        ));
        events
    }

    // ── Input ────────────────────────────────────────────────────────

    pub fn key(&mut self, now_ms: u64) -> Vec<Event> {
        self.activity.record_key(now_ms);
        self.scorer.on_key(now_ms)
    }

    pub fn mouse(&mut self, now_ms: u64) {
        self.activity.record_mouse(now_ms);
    }

    pub fn scroll(&mut self, now_ms: u64) {
        self.activity.record_scroll(now_ms);
    }

    pub fn visibility(&mut self, now_ms: u64, visible: bool) -> Vec<Event> {
        if self.activity.set_visible(visible) {
            self.scorer.on_hidden(now_ms)
        } else {
            Vec::new()
        }
    }

    pub fn window_focus(&mut self, focused: bool) {
        self.activity.set_window_focused(focused);
    }

    // ── Attention shield ─────────────────────────────────────────────

    /// Turn camera-based tracking on or off.
    pub fn set_shield(&mut self, now_ms: u64, enabled: bool) -> Vec<Event> {
        if enabled == self.controller.is_shield_enabled() {
            return Vec::new();
        }
        let mut events = self.controller.set_shield_enabled(now_ms, enabled);
        let classifier_events = if enabled {
            events.push(self.scorer.start(now_ms));
            self.classifier.activate(now_ms)
        } else {
            events.push(self.scorer.stop(now_ms));
            self.classifier.deactivate(now_ms)
        };
        events.extend(self.route(now_ms, classifier_events));
        events
    }

    /// The user answered the camera permission prompt (or retried).
    pub fn grant_camera(&mut self, now_ms: u64) -> Vec<Event> {
        let events = self.classifier.grant(now_ms);
        self.route(now_ms, events)
    }

    pub fn set_orientation(&mut self, now_ms: u64, orientation: Orientation) -> Vec<Event> {
        let events = self.classifier.set_orientation(now_ms, orientation);
        self.route(now_ms, events)
    }

    pub fn set_quality(&mut self, now_ms: u64, quality: CaptureQuality) -> Vec<Event> {
        let events = self.classifier.set_quality(now_ms, quality);
        self.route(now_ms, events)
    }

    // ── Session ──────────────────────────────────────────────────────

    pub fn toggle(&mut self, now_ms: u64) -> Vec<Event> {
        let mark = self.scorer.history().next_index();
        let attention = self.classifier.state();
        self.controller.toggle(now_ms, mark, attention)
    }

    /// Start the countdown, pausing at once if the user is already away.
    pub fn start(&mut self, now_ms: u64) -> Vec<Event> {
        let mark = self.scorer.history().next_index();
        let attention = self.classifier.state();
        self.controller.start(now_ms, mark, attention)
    }

    pub fn pause(&mut self, now_ms: u64) -> Event {
        self.controller.pause(now_ms)
    }

    pub fn reset(&mut self, now_ms: u64) -> Event {
        let mark = self.scorer.history().next_index();
        self.controller.reset(now_ms, mark)
    }

    /// Outcome of a re-engagement challenge. Passing restores full engagement.
    pub fn complete_challenge(&mut self, now_ms: u64, passed: bool) -> Option<Event> {
        passed.then(|| self.scorer.reset(now_ms))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn camera_signal(&self) -> CameraSignal {
        if self.controller.is_shield_enabled() {
            CameraSignal::tracking(self.classifier.state())
        } else {
            CameraSignal::off()
        }
    }

    /// Forward classifier events to the controller, keeping causal order.
    fn route(&mut self, now_ms: u64, events: Vec<Event>) -> Vec<Event> {
        let mut out = Vec::with_capacity(events.len());
        for event in events {
            let follow_up = match &event {
                Event::AttentionChanged { to, .. } => self.controller.on_attention(now_ms, *to),
                Event::StillnessDetected { .. } => vec![self.controller.on_stillness(now_ms)],
                _ => Vec::new(),
            };
            out.push(event);
            out.extend(follow_up);
        }
        out
    }
}
