//! Deterministic trace replay.
//!
//! A trace is JSON Lines: one timestamped input per line, ordered by time.
//! Blank lines and lines starting with `#` are ignored.
//!
//! ```text
//! {"at_ms": 0, "kind": "shield", "enabled": true}
//! {"at_ms": 0, "kind": "grant"}
//! {"at_ms": 0, "kind": "start"}
//! {"at_ms": 100, "kind": "faces", "faces": []}
//! {"at_ms": 2500, "kind": "key"}
//! ```
//!
//! Frames are given as detector output, so no camera or model is needed. The
//! replayer runs a [`FocusEngine`] against a virtual camera and synthesizes the
//! 1 Hz tick between entries.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::attention::{AttentionState, FaceObservation, VirtualCamera};
use crate::config::Config;
use crate::engine::FocusEngine;
use crate::error::{CoreError, Result, TraceError};
use crate::events::Event;
use crate::session::{SessionController, SessionSnapshot};

/// One recorded input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub at_ms: u64,
    #[serde(flatten)]
    pub input: TraceInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceInput {
    /// Detector output for one frame; empty means no face.
    Faces {
        #[serde(default)]
        faces: Vec<FaceObservation>,
    },
    Key,
    Mouse,
    Scroll,
    Visibility {
        visible: bool,
    },
    WindowFocus {
        focused: bool,
    },
    Shield {
        enabled: bool,
    },
    Grant,
    Toggle,
    Start,
    Pause,
    Reset,
    Challenge {
        passed: bool,
    },
    /// An explicit scheduler tick.
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Insert a tick every second between entries.
    pub synthesize_ticks: bool,
    /// Keep ticking until this time after the last entry.
    pub until_ms: Option<u64>,
    /// Seed for distraction prompt selection.
    pub seed: u64,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            synthesize_ticks: true,
            until_ms: None,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    pub events: Vec<Event>,
    pub ticks: u64,
    pub final_score: f64,
    pub final_attention: AttentionState,
    pub session: SessionSnapshot,
}

impl ReplayReport {
    pub fn count(&self, kind: &str) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

/// Parse a JSON Lines trace.
///
/// # Errors
///
/// Fails on the first malformed line or on an entry earlier than its predecessor.
pub fn parse_trace(input: &str) -> Result<Vec<TraceEntry>, TraceError> {
    let mut entries: Vec<TraceEntry> = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let entry: TraceEntry =
            serde_json::from_str(text).map_err(|source| TraceError::Parse { line, source })?;
        if let Some(previous) = entries.last() {
            if entry.at_ms < previous.at_ms {
                return Err(TraceError::OutOfOrder {
                    line,
                    at_ms: entry.at_ms,
                    previous_ms: previous.at_ms,
                });
            }
        }
        entries.push(entry);
    }
    Ok(entries)
}

/// Read and parse a trace file.
pub fn load_trace(path: &Path) -> Result<Vec<TraceEntry>> {
    let input = std::fs::read_to_string(path).map_err(|source| CoreError::ReadTrace {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_trace(&input)?)
}

/// Feed `entries` through a fresh engine and collect everything it emits.
pub fn replay(entries: &[TraceEntry], config: &Config, options: ReplayOptions) -> ReplayReport {
    let start = entries.first().map_or(0, |e| e.at_ms);
    let controller = SessionController::with_seed(config.timer, config.alerts, options.seed);
    let mut engine = FocusEngine::with_controller(
        config,
        Box::new(VirtualCamera::blank()),
        Vec::new(),
        controller,
        start,
    );

    let mut events = Vec::new();
    let mut ticks = 0u64;
    let mut next_tick = start + 1_000;
    let mut run_ticks_until = |engine: &mut FocusEngine, events: &mut Vec<Event>, until: u64| {
        if !options.synthesize_ticks {
            return;
        }
        while next_tick <= until {
            events.extend(engine.tick(next_tick));
            ticks += 1;
            next_tick += 1_000;
        }
    };

    for entry in entries {
        run_ticks_until(&mut engine, &mut events, entry.at_ms);
        apply(&mut engine, entry, &mut events);
    }
    let end = options
        .until_ms
        .unwrap_or_else(|| entries.last().map_or(start, |e| e.at_ms));
    run_ticks_until(&mut engine, &mut events, end);

    let explicit_ticks = entries
        .iter()
        .filter(|e| matches!(e.input, TraceInput::Tick))
        .count() as u64;
    debug!("replayed {} entries, {} events", entries.len(), events.len());

    ReplayReport {
        ticks: ticks + explicit_ticks,
        final_score: engine.score(),
        final_attention: engine.attention(),
        session: engine.controller().snapshot(),
        events,
    }
}

fn apply(engine: &mut FocusEngine, entry: &TraceEntry, events: &mut Vec<Event>) {
    let now = entry.at_ms;
    match &entry.input {
        TraceInput::Faces { faces } => events.extend(engine.on_observations(now, faces)),
        TraceInput::Key => events.extend(engine.key(now)),
        TraceInput::Mouse => engine.mouse(now),
        TraceInput::Scroll => engine.scroll(now),
        TraceInput::Visibility { visible } => events.extend(engine.visibility(now, *visible)),
        TraceInput::WindowFocus { focused } => engine.window_focus(*focused),
        TraceInput::Shield { enabled } => events.extend(engine.set_shield(now, *enabled)),
        TraceInput::Grant => events.extend(engine.grant_camera(now)),
        TraceInput::Toggle => events.extend(engine.toggle(now)),
        TraceInput::Start => events.extend(engine.start(now)),
        TraceInput::Pause => events.push(engine.pause(now)),
        TraceInput::Reset => events.push(engine.reset(now)),
        TraceInput::Challenge { passed } => events.extend(engine.complete_challenge(now, *passed)),
        TraceInput::Tick => events.extend(engine.tick(now)),
    }
}
