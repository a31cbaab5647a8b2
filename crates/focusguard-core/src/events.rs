use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attention::AttentionState;
use crate::engagement::SessionSummary;
use crate::session::TimerMode;

/// Every state change in the engine produces an Event.
/// Consumers drain them from the entry point that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The debounced attention state changed.
    AttentionChanged {
        from: AttentionState,
        to: AttentionState,
        at: DateTime<Utc>,
    },
    /// The face centroid has not moved for the stillness window.
    StillnessDetected {
        still_for_ms: u64,
        at: DateTime<Utc>,
    },
    ThresholdBreached {
        score: f64,
        threshold: f64,
        at: DateTime<Utc>,
    },
    /// Score dropped below the challenge level; offer a re-engagement challenge.
    ChallengePrompted {
        score: f64,
        at: DateTime<Utc>,
    },
    IdlePenaltyApplied {
        penalty: f64,
        score: f64,
        at: DateTime<Utc>,
    },
    AwayPenaltyApplied {
        penalty: f64,
        score: f64,
        at: DateTime<Utc>,
    },
    VisibilityPenaltyApplied {
        penalty: f64,
        score: f64,
        at: DateTime<Utc>,
    },
    EngagementReset {
        reason: ResetReason,
        at: DateTime<Utc>,
    },
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// Countdown halted because the user looked away.
    PausedByAttention {
        attention: AttentionState,
        at: DateTime<Utc>,
    },
    ResumedByAttention {
        at: DateTime<Utc>,
    },
    DistractionDetected {
        attention: AttentionState,
        at: DateTime<Utc>,
    },
    /// One-shot encouragement for the current distraction episode.
    DistractionAlert {
        message: String,
        play_sound: bool,
        flash: bool,
        at: DateTime<Utc>,
    },
    FocusCompleted {
        session_id: Uuid,
        minutes: u32,
        summary: Option<SessionSummary>,
        completed_cycles: u32,
        at: DateTime<Utc>,
    },
    BreakCompleted {
        minutes: u32,
        at: DateTime<Utc>,
    },
    ModeChanged {
        mode: TimerMode,
        duration_secs: u64,
        is_long_break: bool,
        message: String,
        cue: AlertCue,
        at: DateTime<Utc>,
    },
    StillnessAlert {
        count: u32,
        at: DateTime<Utc>,
    },
}

/// Why the engagement score was restored to max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetReason {
    Started,
    Stopped,
    Recovered,
    ActivityResumed,
}

/// Presentation hints attached to an alerting event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertCue {
    pub play_sound: bool,
    pub flash: bool,
}

impl Event {
    /// Wire name of the variant, as written in the `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::AttentionChanged { .. } => "AttentionChanged",
            Event::StillnessDetected { .. } => "StillnessDetected",
            Event::ThresholdBreached { .. } => "ThresholdBreached",
            Event::ChallengePrompted { .. } => "ChallengePrompted",
            Event::IdlePenaltyApplied { .. } => "IdlePenaltyApplied",
            Event::AwayPenaltyApplied { .. } => "AwayPenaltyApplied",
            Event::VisibilityPenaltyApplied { .. } => "VisibilityPenaltyApplied",
            Event::EngagementReset { .. } => "EngagementReset",
            Event::TimerStarted { .. } => "TimerStarted",
            Event::TimerPaused { .. } => "TimerPaused",
            Event::TimerReset { .. } => "TimerReset",
            Event::PausedByAttention { .. } => "PausedByAttention",
            Event::ResumedByAttention { .. } => "ResumedByAttention",
            Event::DistractionDetected { .. } => "DistractionDetected",
            Event::DistractionAlert { .. } => "DistractionAlert",
            Event::FocusCompleted { .. } => "FocusCompleted",
            Event::BreakCompleted { .. } => "BreakCompleted",
            Event::ModeChanged { .. } => "ModeChanged",
            Event::StillnessAlert { .. } => "StillnessAlert",
        }
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::AttentionChanged { at, .. }
            | Event::StillnessDetected { at, .. }
            | Event::ThresholdBreached { at, .. }
            | Event::ChallengePrompted { at, .. }
            | Event::IdlePenaltyApplied { at, .. }
            | Event::AwayPenaltyApplied { at, .. }
            | Event::VisibilityPenaltyApplied { at, .. }
            | Event::EngagementReset { at, .. }
            | Event::TimerStarted { at, .. }
            | Event::TimerPaused { at, .. }
            | Event::TimerReset { at }
            | Event::PausedByAttention { at, .. }
            | Event::ResumedByAttention { at }
            | Event::DistractionDetected { at, .. }
            | Event::DistractionAlert { at, .. }
            | Event::FocusCompleted { at, .. }
            | Event::BreakCompleted { at, .. }
            | Event::ModeChanged { at, .. }
            | Event::StillnessAlert { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::to_datetime;

    #[test]
    fn tagged_by_type() {
        let event = Event::AttentionChanged {
            from: AttentionState::Focused,
            to: AttentionState::Away,
            at: to_datetime(0),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "AttentionChanged");
        assert_eq!(json["to"], "away");
        assert_eq!(event.kind(), "AttentionChanged");

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
