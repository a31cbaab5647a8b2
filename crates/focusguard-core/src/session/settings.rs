use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const FOCUS_MINUTES: (u32, u32) = (1, 180);
pub const SHORT_BREAK_MINUTES: (u32, u32) = (1, 60);
pub const LONG_BREAK_MINUTES: (u32, u32) = (5, 90);
pub const CYCLES_UNTIL_LONG_BREAK: (u32, u32) = (2, 10);

/// Pomodoro lengths and the long-break cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    #[serde(default = "default_cycles_until_long_break")]
    pub cycles_until_long_break: u32,
}

fn default_focus_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_cycles_until_long_break() -> u32 {
    4
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            cycles_until_long_break: default_cycles_until_long_break(),
        }
    }
}

impl TimerConfig {
    /// Reject values outside the ranges the setters clamp to.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("timer.focus_minutes", self.focus_minutes, FOCUS_MINUTES)?;
        check_range("timer.short_break_minutes", self.short_break_minutes, SHORT_BREAK_MINUTES)?;
        check_range("timer.long_break_minutes", self.long_break_minutes, LONG_BREAK_MINUTES)?;
        check_range(
            "timer.cycles_until_long_break",
            self.cycles_until_long_break,
            CYCLES_UNTIL_LONG_BREAK,
        )
    }
}

fn check_range(field: &str, value: u32, (min, max): (u32, u32)) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: i64::from(value),
            min: i64::from(min),
            max: i64::from(max),
        })
    }
}

pub(crate) fn clamp_minutes(value: u32, (min, max): (u32, u32)) -> u32 {
    value.clamp(min, max)
}

/// Alert presentation preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_true")]
    pub session_end_sound: bool,
    #[serde(default = "default_true")]
    pub distraction_sound: bool,
    #[serde(default = "default_true")]
    pub visual_flash: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            session_end_sound: true,
            distraction_sound: true,
            visual_flash: true,
        }
    }
}

/// Quick focus/short-break length presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    #[serde(rename = "25/5")]
    Classic,
    #[serde(rename = "50/10")]
    Extended,
    #[serde(rename = "default")]
    Default,
}

impl Preset {
    /// `(focus, short break)` minutes.
    pub fn lengths(self) -> (u32, u32) {
        match self {
            Preset::Classic | Preset::Default => (25, 5),
            Preset::Extended => (50, 10),
        }
    }
}

impl FromStr for Preset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "25/5" => Ok(Preset::Classic),
            "50/10" => Ok(Preset::Extended),
            "default" => Ok(Preset::Default),
            other => Err(ValidationError::InvalidValue {
                field: "preset".to_string(),
                message: format!("unknown preset '{other}' (expected 25/5, 50/10 or default)"),
            }),
        }
    }
}
