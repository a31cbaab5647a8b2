//! Integration tests for the face signal classifier.
//!
//! Drives the classifier through a virtual camera and a scripted detector
//! backend, covering the fallback chain, debounce, stillness and the privacy
//! composite.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use focusguard_core::attention::{
    CaptureConstraints, CaptureQuality, ClassifierConfig, DetectorProvider, FaceObservation,
    FaceSignalClassifier, Keypoint, LandmarkDetector, Landmark, VirtualCamera,
};
use focusguard_core::{AttentionState, CaptureError, DetectorError, Event};
use image::{Rgba, RgbaImage};

type Script = Rc<RefCell<VecDeque<Vec<FaceObservation>>>>;

struct Scripted {
    script: Script,
}

impl LandmarkDetector for Scripted {
    fn backend(&self) -> &str {
        "scripted"
    }

    fn detect(&mut self, _frame: &RgbaImage) -> Result<Vec<FaceObservation>, DetectorError> {
        self.script
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| DetectorError::FrameProcessing("script exhausted".into()))
    }
}

struct ScriptedBackend {
    script: Script,
}

impl DetectorProvider for ScriptedBackend {
    fn backend(&self) -> &str {
        "scripted"
    }

    fn load(&self) -> Result<Box<dyn LandmarkDetector>, DetectorError> {
        Ok(Box::new(Scripted {
            script: self.script.clone(),
        }))
    }
}

struct BrokenBackend;

impl DetectorProvider for BrokenBackend {
    fn backend(&self) -> &str {
        "broken"
    }

    fn load(&self) -> Result<Box<dyn LandmarkDetector>, DetectorError> {
        Err(DetectorError::ModelLoad {
            backend: "broken".into(),
            message: "model file missing".into(),
        })
    }
}

fn face_at(x: f64, y: f64) -> FaceObservation {
    FaceObservation::new(vec![
        Keypoint::named(x, y, Landmark::LeftEye),
        Keypoint::named(x + 40.0, y, Landmark::RightEye),
        Keypoint::named(x, y, Landmark::LeftPupil),
        Keypoint::named(x + 40.0, y, Landmark::RightPupil),
        Keypoint::named(x + 20.0, y + 30.0, Landmark::Nose),
    ])
}

fn looking_aside(x: f64, y: f64) -> FaceObservation {
    FaceObservation::new(vec![
        Keypoint::named(x, y, Landmark::LeftEye),
        Keypoint::named(x + 40.0, y, Landmark::RightEye),
        Keypoint::named(x + 20.0, y, Landmark::LeftPupil),
        Keypoint::named(x + 60.0, y, Landmark::RightPupil),
        Keypoint::named(x + 20.0, y + 30.0, Landmark::Nose),
    ])
}

fn checkerboard(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        if (x / 4 + y / 4) % 2 == 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    })
}

fn classifier_with(
    script: &Script,
    providers_first: Vec<Box<dyn DetectorProvider>>,
) -> FaceSignalClassifier {
    let mut providers = providers_first;
    providers.push(Box::new(ScriptedBackend {
        script: script.clone(),
    }));
    FaceSignalClassifier::new(
        ClassifierConfig::default(),
        Box::new(VirtualCamera::with_frame(checkerboard(160, 120))),
        providers,
        CaptureConstraints::default(),
        0,
    )
}

fn published(events: &[Event]) -> Vec<AttentionState> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::AttentionChanged { to, .. } => Some(*to),
            _ => None,
        })
        .collect()
}

#[test]
fn test_fallback_backend_classifies_frames() {
    let script: Script = Rc::default();
    let mut c = classifier_with(&script, vec![Box::new(BrokenBackend)]);
    c.activate(0);
    c.grant(0);
    assert_eq!(c.backend(), Some("scripted"));

    let mut events = Vec::new();
    for t in (0..=2_400).step_by(100) {
        script.borrow_mut().push_back(vec![looking_aside(50.0, 40.0)]);
        events.extend(c.process_frame(t));
    }
    assert_eq!(published(&events), vec![AttentionState::Distracted]);
    assert!(c.latest_composite().is_some());
    assert!(!c.needs_raw_fallback(2_400));
}

#[test]
fn test_flicker_never_publishes() {
    let script: Script = Rc::default();
    let mut c = classifier_with(&script, Vec::new());
    c.activate(0);
    c.grant(0);

    let mut events = Vec::new();
    for t in (0..10_000).step_by(100) {
        // 1.5 s away, 0.5 s present, repeated.
        let frame = if t % 2_000 < 1_500 {
            Vec::new()
        } else {
            vec![face_at(50.0 + (t % 7) as f64 * 3.0, 40.0)]
        };
        script.borrow_mut().push_back(frame);
        events.extend(c.process_frame(t));
        events.extend(c.poll(t));
    }
    assert!(published(&events).is_empty());
    assert_eq!(c.state(), AttentionState::Focused);
}

#[test]
fn test_changed_candidate_must_hold_for_full_delay() {
    let script: Script = Rc::default();
    let mut c = classifier_with(&script, Vec::new());
    c.activate(0);
    c.grant(0);

    let mut published_at = Vec::new();
    for t in (0..=4_500).step_by(100) {
        let frame = if t < 1_900 {
            vec![looking_aside(50.0, 40.0)]
        } else {
            Vec::new()
        };
        script.borrow_mut().push_back(frame);
        for e in c.process_frame(t) {
            if let Event::AttentionChanged { to, .. } = e {
                published_at.push((t, to));
            }
        }
    }
    assert_eq!(published_at, vec![(3_900, AttentionState::Away)]);
}

#[test]
fn test_stillness_fires_once_then_rearms_on_movement() {
    let script: Script = Rc::default();
    let mut c = classifier_with(&script, Vec::new());
    c.activate(0);
    c.grant(0);

    let mut stills = Vec::new();
    for t in (0..=20_000).step_by(100) {
        let x = if t < 15_000 { 50.0 } else { 60.0 };
        script.borrow_mut().push_back(vec![face_at(x, 40.0)]);
        for e in c.process_frame(t) {
            if let Event::StillnessDetected { .. } = e {
                stills.push(t);
            }
        }
    }
    assert_eq!(stills, vec![7_000]);

    for t in (20_100..=23_000).step_by(100) {
        script.borrow_mut().push_back(vec![face_at(60.0, 40.0)]);
        for e in c.process_frame(t) {
            if let Event::StillnessDetected { .. } = e {
                stills.push(t);
            }
        }
    }
    assert_eq!(stills, vec![7_000, 22_000]);
}

#[test]
fn test_no_backend_keeps_stream_and_shows_raw_video() {
    let mut c = FaceSignalClassifier::new(
        ClassifierConfig::default(),
        Box::new(VirtualCamera::with_frame(checkerboard(64, 48))),
        vec![Box::new(BrokenBackend)],
        CaptureConstraints::default(),
        0,
    );
    c.activate(0);
    c.grant(0);
    for t in (0..5_000).step_by(100) {
        assert!(c.process_frame(t).is_empty());
    }
    assert_eq!(c.state(), AttentionState::Focused);
    assert!(c.has_stream());
    assert!(c.needs_raw_fallback(5_000));
    assert_eq!(c.backend(), None);
}

#[test]
fn test_device_error_then_retry() {
    let mut c = FaceSignalClassifier::new(
        ClassifierConfig::default(),
        Box::new(VirtualCamera::failing(CaptureError::Device("busy".into()))),
        Vec::new(),
        CaptureConstraints::default(),
        0,
    );
    c.activate(0);
    let events = c.grant(0);
    assert_eq!(
        published(&events),
        vec![AttentionState::Initializing, AttentionState::Error]
    );
    assert!(c.activate(10).is_empty());
    assert_eq!(c.state(), AttentionState::Error);

    c.grant(20);
    assert_eq!(c.state(), AttentionState::Error);
    c.deactivate(30);
    assert_eq!(c.state(), AttentionState::Off);
}

#[test]
fn test_quality_change_reacquires_stream() {
    let script: Script = Rc::default();
    let mut c = classifier_with(&script, Vec::new());
    c.activate(0);
    c.grant(0);
    assert!(c.set_quality(10, CaptureQuality::Safe).is_empty());
    assert!(c.has_stream());
    assert_eq!(c.constraints().ideal_resolution(), (640, 480));
    let snapshot = c.debug_snapshot(0);
    assert_eq!(snapshot.quality, CaptureQuality::Safe);
}
