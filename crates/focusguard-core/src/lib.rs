//! # FocusGuard Core Library
//!
//! The attention and engagement engine behind the FocusGuard study timer. It
//! turns noisy, asynchronous signals (camera-derived face observations,
//! keyboard/mouse/scroll activity, window focus) into a debounced attention
//! state and a decaying engagement score, and drives a Pomodoro countdown that
//! pauses itself when the user looks away.
//!
//! ## Architecture
//!
//! - **Attention**: per-frame classification, debounce, stillness detection and
//!   a privacy composite that blurs everything but the user's face
//! - **Engagement**: a 0..=100 score with hysteresis, idle/away penalties and a
//!   one-shot threshold breach
//! - **Session**: the Pomodoro state machine with attention auto-pause and
//!   per-session summaries
//!
//! Every component is a caller-driven state machine: methods take the current
//! epoch milliseconds and return the [`Event`]s they produced. [`FocusEngine`]
//! wires them together; [`EngineDriver`] schedules it on tokio and [`replay`]
//! runs it against a recorded trace.
//!
//! ## Key Components
//!
//! - [`FaceSignalClassifier`]: camera frames to [`AttentionState`]
//! - [`EngagementScorer`]: the continuous engagement score
//! - [`SessionController`]: focus/break countdown
//! - [`Config`]: TOML configuration management

pub mod attention;
pub mod clock;
pub mod config;
pub mod driver;
pub mod engagement;
pub mod engine;
pub mod error;
pub mod events;
pub mod replay;
pub mod session;

pub use attention::{AttentionState, FaceObservation, FaceSignalClassifier};
pub use clock::{Clock, SystemClock, TokioClock};
pub use config::{data_dir, Config};
pub use driver::EngineDriver;
pub use engagement::{EngagementScorer, IdlePenalty, SessionSummary};
pub use engine::{EngineSnapshot, FocusEngine};
pub use error::{
    CaptureError, ConfigError, CoreError, DetectorError, PenaltyError, TraceError,
    ValidationError,
};
pub use events::Event;
pub use replay::{
    load_trace, parse_trace, replay, ReplayOptions, ReplayReport, TraceEntry, TraceInput,
};
pub use session::{SessionController, TimerMode};
