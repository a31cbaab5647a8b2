mod controller;
mod settings;

use serde::{Deserialize, Serialize};

pub use controller::{SessionController, SessionKind, SessionLogEntry, SessionSnapshot};
pub use settings::{
    AlertConfig, Preset, TimerConfig, CYCLES_UNTIL_LONG_BREAK, FOCUS_MINUTES, LONG_BREAK_MINUTES,
    SHORT_BREAK_MINUTES,
};

/// Countdown mode. A long break is a `ShortBreak` with the long-break length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Pomodoro,
    ShortBreak,
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimerMode::Pomodoro => f.write_str("pomodoro"),
            TimerMode::ShortBreak => f.write_str("short break"),
        }
    }
}
