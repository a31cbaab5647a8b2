//! Session controller.
//!
//! A Pomodoro countdown driven by the 1 Hz tick. Like the classifier it owns no
//! thread; every method takes the current epoch milliseconds.
//!
//! ## State Transitions
//!
//! ```text
//! Pomodoro --(zero)--> ShortBreak (long length every Nth cycle) --(zero)--> Pomodoro
//! ```
//!
//! The countdown runs while `is_active && !is_paused_by_attention`. Transitions
//! chain automatically: the controller stays active after each completion.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::settings::{
    clamp_minutes, AlertConfig, Preset, TimerConfig, CYCLES_UNTIL_LONG_BREAK, FOCUS_MINUTES,
    LONG_BREAK_MINUTES, SHORT_BREAK_MINUTES,
};
use super::TimerMode;
use crate::attention::AttentionState;
use crate::clock::to_datetime;
use crate::engagement::EngagementHistory;
use crate::events::{AlertCue, Event};

const SESSION_LOG_CAPACITY: usize = 50;

const DISTRACTION_PROMPTS: [&str; 7] = [
    "Wake up, stay focused!",
    "Eyes on the goal! You got this.",
    "Let's refocus. Your future self will thank you.",
    "Tiny break? Snap back to focus mode.",
    "Stay sharp, distraction detected!",
    "Deep breath, back to the task.",
    "Keep going, momentum matters!",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Focus,
    Break,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLogEntry {
    pub kind: SessionKind,
    pub minutes: u32,
    pub at: DateTime<Utc>,
}

/// Serializable view of the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub mode: TimerMode,
    pub remaining_secs: u64,
    pub is_active: bool,
    pub is_paused_by_attention: bool,
    pub shield_enabled: bool,
    pub completed_cycles: u32,
    pub stillness_count: u32,
    pub log: Vec<SessionLogEntry>,
}

#[derive(Debug, Clone)]
pub struct SessionController {
    timer: TimerConfig,
    alerts: AlertConfig,
    session_id: Uuid,
    mode: TimerMode,
    remaining_secs: u64,
    is_active: bool,
    paused_by_attention: bool,
    shield_enabled: bool,
    distraction_alerted: bool,
    /// Whether the break in progress uses the long-break length.
    long_break: bool,
    completed_cycles: u32,
    stillness_count: u32,
    /// History sequence number at which the current focus session started.
    session_start: u64,
    log: VecDeque<SessionLogEntry>,
    /// Sub-second remainder of counted wall-clock time.
    carry_ms: u64,
    last_flush_ms: Option<u64>,
    rng: StdRng,
}

impl SessionController {
    pub fn new(timer: TimerConfig, alerts: AlertConfig) -> Self {
        Self::with_rng(timer, alerts, StdRng::from_entropy())
    }

    /// Seeded variant; prompt selection becomes reproducible.
    pub fn with_seed(timer: TimerConfig, alerts: AlertConfig, seed: u64) -> Self {
        Self::with_rng(timer, alerts, StdRng::seed_from_u64(seed))
    }

    fn with_rng(timer: TimerConfig, alerts: AlertConfig, rng: StdRng) -> Self {
        Self {
            remaining_secs: u64::from(timer.focus_minutes) * 60,
            timer,
            alerts,
            session_id: Uuid::new_v4(),
            mode: TimerMode::Pomodoro,
            is_active: false,
            paused_by_attention: false,
            shield_enabled: false,
            distraction_alerted: false,
            long_break: false,
            completed_cycles: 0,
            stillness_count: 0,
            session_start: 0,
            log: VecDeque::with_capacity(SESSION_LOG_CAPACITY),
            carry_ms: 0,
            last_flush_ms: None,
            rng,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_paused_by_attention(&self) -> bool {
        self.paused_by_attention
    }

    /// True when the countdown is advancing.
    pub fn is_running(&self) -> bool {
        self.is_active && !self.paused_by_attention
    }

    pub fn is_shield_enabled(&self) -> bool {
        self.shield_enabled
    }

    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    pub fn stillness_count(&self) -> u32 {
        self.stillness_count
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn session_start(&self) -> u64 {
        self.session_start
    }

    pub fn timer_config(&self) -> &TimerConfig {
        &self.timer
    }

    pub fn alert_config(&self) -> &AlertConfig {
        &self.alerts
    }

    pub fn session_log(&self) -> impl Iterator<Item = &SessionLogEntry> {
        self.log.iter()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id,
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            is_active: self.is_active,
            is_paused_by_attention: self.paused_by_attention,
            shield_enabled: self.shield_enabled,
            completed_cycles: self.completed_cycles,
            stillness_count: self.stillness_count,
            log: self.log.iter().cloned().collect(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or pause the countdown. `history_mark` is the engagement history's
    /// next index, recorded as the session start when a Pomodoro begins.
    /// `attention` is the currently published attention state.
    pub fn toggle(
        &mut self,
        now_ms: u64,
        history_mark: u64,
        attention: AttentionState,
    ) -> Vec<Event> {
        if self.is_active {
            vec![self.pause(now_ms)]
        } else {
            self.start(now_ms, history_mark, attention)
        }
    }

    /// Start (or resume) the countdown. Starting while the user is already
    /// inattentive pauses it straight away.
    pub fn start(
        &mut self,
        now_ms: u64,
        history_mark: u64,
        attention: AttentionState,
    ) -> Vec<Event> {
        self.flush(now_ms);
        if !self.is_active && self.mode == TimerMode::Pomodoro {
            self.session_start = history_mark;
            self.stillness_count = 0;
        }
        self.is_active = true;
        info!("{} started with {}s remaining", self.mode, self.remaining_secs);
        let mut events = vec![Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: to_datetime(now_ms),
        }];
        if attention.is_inattentive() {
            events.extend(self.on_attention(now_ms, attention));
        } else if self.paused_by_attention {
            self.paused_by_attention = false;
            self.distraction_alerted = false;
            events.push(Event::ResumedByAttention {
                at: to_datetime(now_ms),
            });
        }
        events
    }

    pub fn pause(&mut self, now_ms: u64) -> Event {
        self.flush(now_ms);
        self.is_active = false;
        self.paused_by_attention = false;
        Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: to_datetime(now_ms),
        }
    }

    /// Back to an idle Pomodoro at full length.
    pub fn reset(&mut self, now_ms: u64, history_mark: u64) -> Event {
        self.is_active = false;
        self.paused_by_attention = false;
        self.mode = TimerMode::Pomodoro;
        self.long_break = false;
        self.remaining_secs = u64::from(self.timer.focus_minutes) * 60;
        self.session_start = history_mark;
        self.stillness_count = 0;
        self.session_id = Uuid::new_v4();
        self.carry_ms = 0;
        self.last_flush_ms = None;
        Event::TimerReset {
            at: to_datetime(now_ms),
        }
    }

    /// Record whether the attention shield (camera classifier) is enabled.
    /// Disabling it releases any attention pause.
    pub fn set_shield_enabled(&mut self, now_ms: u64, enabled: bool) -> Vec<Event> {
        let mut events = Vec::new();
        self.shield_enabled = enabled;
        if !enabled && self.paused_by_attention {
            self.flush(now_ms);
            self.paused_by_attention = false;
            self.distraction_alerted = false;
            events.push(Event::ResumedByAttention {
                at: to_datetime(now_ms),
            });
        }
        events
    }

    /// React to a published attention state.
    pub fn on_attention(&mut self, now_ms: u64, state: AttentionState) -> Vec<Event> {
        let mut events = Vec::new();
        if !self.shield_enabled || !self.is_active {
            return events;
        }
        let at = to_datetime(now_ms);

        if state.is_inattentive() {
            if self.paused_by_attention {
                return events;
            }
            self.flush(now_ms);
            self.paused_by_attention = true;
            info!("countdown paused: user is {state}");
            events.push(Event::PausedByAttention {
                attention: state,
                at,
            });
            events.push(Event::DistractionDetected {
                attention: state,
                at,
            });
            if !self.distraction_alerted {
                self.distraction_alerted = true;
                let message = DISTRACTION_PROMPTS
                    .choose(&mut self.rng)
                    .copied()
                    .unwrap_or(DISTRACTION_PROMPTS[0]);
                events.push(Event::DistractionAlert {
                    message: message.to_string(),
                    play_sound: self.alerts.distraction_sound,
                    flash: self.alerts.visual_flash,
                    at,
                });
            }
        } else if state == AttentionState::Focused && self.paused_by_attention {
            self.flush(now_ms);
            self.paused_by_attention = false;
            self.distraction_alerted = false;
            info!("countdown resumed: user refocused");
            events.push(Event::ResumedByAttention { at });
        }
        events
    }

    /// A prolonged-stillness notification from the classifier.
    pub fn on_stillness(&mut self, now_ms: u64) -> Event {
        self.stillness_count += 1;
        Event::StillnessAlert {
            count: self.stillness_count,
            at: to_datetime(now_ms),
        }
    }

    /// Advance the countdown by the wall-clock time since the last call.
    ///
    /// `history` and `threshold` feed the summary attached to a completed
    /// focus session.
    pub fn tick(
        &mut self,
        now_ms: u64,
        history: &EngagementHistory,
        threshold: f64,
    ) -> Vec<Event> {
        let mut events = Vec::new();
        self.flush(now_ms);
        while self.carry_ms >= 1_000 && self.is_running() {
            self.carry_ms -= 1_000;
            self.remaining_secs = self.remaining_secs.saturating_sub(1);
            if self.remaining_secs == 0 {
                self.complete(now_ms, history, threshold, &mut events);
            }
        }
        events
    }

    // ── Setters ──────────────────────────────────────────────────────

    /// Returns the clamped value that was applied.
    pub fn set_focus_minutes(&mut self, minutes: u32) -> u32 {
        let minutes = clamp_minutes(minutes, FOCUS_MINUTES);
        self.timer.focus_minutes = minutes;
        if !self.is_active && self.mode == TimerMode::Pomodoro {
            self.remaining_secs = u64::from(minutes) * 60;
        }
        minutes
    }

    pub fn set_short_break_minutes(&mut self, minutes: u32) -> u32 {
        let minutes = clamp_minutes(minutes, SHORT_BREAK_MINUTES);
        self.timer.short_break_minutes = minutes;
        if !self.is_active && self.mode == TimerMode::ShortBreak && !self.long_break {
            self.remaining_secs = u64::from(minutes) * 60;
        }
        minutes
    }

    pub fn set_long_break_minutes(&mut self, minutes: u32) -> u32 {
        let minutes = clamp_minutes(minutes, LONG_BREAK_MINUTES);
        self.timer.long_break_minutes = minutes;
        if !self.is_active && self.mode == TimerMode::ShortBreak && self.long_break {
            self.remaining_secs = u64::from(minutes) * 60;
        }
        minutes
    }

    pub fn set_cycles_until_long_break(&mut self, cycles: u32) -> u32 {
        let cycles = clamp_minutes(cycles, CYCLES_UNTIL_LONG_BREAK);
        self.timer.cycles_until_long_break = cycles;
        cycles
    }

    pub fn apply_preset(&mut self, preset: Preset) {
        let (focus, short) = preset.lengths();
        self.set_focus_minutes(focus);
        self.set_short_break_minutes(short);
    }

    pub fn set_alerts(&mut self, alerts: AlertConfig) {
        self.alerts = alerts;
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Bank elapsed wall-clock time while running; idle time is discarded.
    fn flush(&mut self, now_ms: u64) {
        if let Some(last) = self.last_flush_ms {
            if self.is_running() {
                self.carry_ms += now_ms.saturating_sub(last);
            }
        }
        self.last_flush_ms = Some(now_ms);
    }

    fn complete(
        &mut self,
        now_ms: u64,
        history: &EngagementHistory,
        threshold: f64,
        events: &mut Vec<Event>,
    ) {
        let at = to_datetime(now_ms);
        let cue = AlertCue {
            play_sound: self.alerts.session_end_sound,
            flash: self.alerts.visual_flash,
        };

        match self.mode {
            TimerMode::Pomodoro => {
                let minutes = self.timer.focus_minutes;
                let summary =
                    history.summarize(self.session_start, threshold, self.stillness_count);
                let will_be_long =
                    (self.completed_cycles + 1) % self.timer.cycles_until_long_break.max(1) == 0;
                self.completed_cycles += 1;
                self.push_log(SessionKind::Focus, minutes, at);
                events.push(Event::FocusCompleted {
                    session_id: self.session_id,
                    minutes,
                    summary,
                    completed_cycles: self.completed_cycles,
                    at,
                });

                self.stillness_count = 0;
                self.session_start = history.next_index();
                self.long_break = will_be_long;
                self.mode = TimerMode::ShortBreak;
                let length = if will_be_long {
                    self.timer.long_break_minutes
                } else {
                    self.timer.short_break_minutes
                };
                self.remaining_secs = u64::from(length) * 60;
                let message = if will_be_long {
                    "Long break time! Recharge well."
                } else {
                    "Focus session over. Time for a short break!"
                };
                info!("focus session complete ({} cycles), {message}", self.completed_cycles);
                events.push(Event::ModeChanged {
                    mode: self.mode,
                    duration_secs: self.remaining_secs,
                    is_long_break: will_be_long,
                    message: message.to_string(),
                    cue,
                    at,
                });
            }
            TimerMode::ShortBreak => {
                let minutes = if self.long_break {
                    self.timer.long_break_minutes
                } else {
                    self.timer.short_break_minutes
                };
                self.push_log(SessionKind::Break, minutes, at);
                events.push(Event::BreakCompleted { minutes, at });

                self.long_break = false;
                self.mode = TimerMode::Pomodoro;
                self.remaining_secs = u64::from(self.timer.focus_minutes) * 60;
                self.session_id = Uuid::new_v4();
                self.session_start = history.next_index();
                debug!("break over, next focus session {}", self.session_id);
                events.push(Event::ModeChanged {
                    mode: self.mode,
                    duration_secs: self.remaining_secs,
                    is_long_break: false,
                    message: "Break's over. Let's get back to it!".to_string(),
                    cue,
                    at,
                });
            }
        }
        self.is_active = true;
    }

    fn push_log(&mut self, kind: SessionKind, minutes: u32, at: DateTime<Utc>) {
        if self.log.len() == SESSION_LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(SessionLogEntry { kind, minutes, at });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(focus: u32, cycles: u32) -> SessionController {
        let timer = TimerConfig {
            focus_minutes: focus,
            cycles_until_long_break: cycles,
            ..TimerConfig::default()
        };
        SessionController::with_seed(timer, AlertConfig::default(), 7)
    }

    fn run_seconds(
        c: &mut SessionController,
        from_ms: u64,
        secs: u64,
        history: &EngagementHistory,
    ) -> Vec<Event> {
        let mut events = Vec::new();
        for i in 1..=secs {
            events.extend(c.tick(from_ms + i * 1_000, history, 30.0));
        }
        events
    }

    #[test]
    fn countdown_only_while_running() {
        let history = EngagementHistory::new(100);
        let mut c = controller(25, 4);
        c.tick(0, &history, 30.0);
        run_seconds(&mut c, 0, 5, &history);
        assert_eq!(c.remaining_secs(), 25 * 60);

        c.start(5_000, 0, AttentionState::Focused);
        run_seconds(&mut c, 5_000, 10, &history);
        assert_eq!(c.remaining_secs(), 25 * 60 - 10);
    }

    #[test]
    fn sub_second_ticks_accumulate() {
        let history = EngagementHistory::new(100);
        let mut c = controller(25, 4);
        c.start(0, 0, AttentionState::Focused);
        for t in (400..=2_000).step_by(400) {
            c.tick(t, &history, 30.0);
        }
        assert_eq!(c.remaining_secs(), 25 * 60 - 2);
    }

    #[test]
    fn fourth_completion_enters_long_break() {
        let history = EngagementHistory::new(100);
        let mut c = controller(1, 4);
        c.completed_cycles = 3;
        c.start(0, 0, AttentionState::Focused);
        let events = run_seconds(&mut c, 0, 60, &history);

        assert!(events
            .iter()
            .any(|e| matches!(e, Event::FocusCompleted { minutes: 1, completed_cycles: 4, .. })));
        assert_eq!(c.mode(), TimerMode::ShortBreak);
        assert_eq!(c.remaining_secs(), 15 * 60);
        assert!(c.is_active());
    }

    #[test]
    fn break_chains_back_to_focus() {
        let history = EngagementHistory::new(100);
        let mut c = controller(1, 4);
        c.set_short_break_minutes(1);
        c.start(0, 0, AttentionState::Focused);
        run_seconds(&mut c, 0, 120, &history);
        assert_eq!(c.mode(), TimerMode::Pomodoro);
        assert_eq!(c.remaining_secs(), 60);
        let kinds: Vec<_> = c.session_log().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![SessionKind::Focus, SessionKind::Break]);
    }

    #[test]
    fn summary_covers_session_samples() {
        let mut history = EngagementHistory::new(100);
        history.push(0, 5.0);
        let mut c = controller(1, 4);
        c.start(0, history.next_index(), AttentionState::Focused);
        c.on_stillness(500);
        for score in [100.0, 20.0] {
            history.push(1_000, score);
        }
        let events = run_seconds(&mut c, 0, 60, &history);
        let summary = events.iter().find_map(|e| match e {
            Event::FocusCompleted { summary, .. } => *summary,
            _ => None,
        });
        let summary = summary.unwrap();
        assert_eq!(summary.average_score, 60);
        assert_eq!(summary.seconds_below_threshold, 1);
        assert_eq!(summary.stillness_alerts, 1);
        assert_eq!(c.stillness_count(), 0);
    }

    #[test]
    fn attention_pause_is_edge_triggered() {
        let history = EngagementHistory::new(100);
        let mut c = controller(25, 4);
        c.set_shield_enabled(0, true);
        c.start(0, 0, AttentionState::Focused);

        let first = c.on_attention(1_000, AttentionState::Distracted);
        assert!(c.is_paused_by_attention());
        assert_eq!(
            first.iter().filter(|e| matches!(e, Event::DistractionAlert { .. })).count(),
            1
        );
        assert!(c.on_attention(1_500, AttentionState::Away).is_empty());

        run_seconds(&mut c, 1_000, 5, &history);
        assert_eq!(c.remaining_secs(), 25 * 60);

        let resumed = c.on_attention(6_000, AttentionState::Focused);
        assert!(matches!(resumed.as_slice(), [Event::ResumedByAttention { .. }]));
        assert!(!c.is_paused_by_attention());

        let again = c.on_attention(7_000, AttentionState::Away);
        assert!(again.iter().any(|e| matches!(e, Event::DistractionAlert { .. })));
    }

    #[test]
    fn non_attention_states_never_pause() {
        let mut c = controller(25, 4);
        c.set_shield_enabled(0, true);
        c.start(0, 0, AttentionState::Focused);
        for state in [
            AttentionState::Initializing,
            AttentionState::Error,
            AttentionState::Off,
            AttentionState::PermissionNeeded,
            AttentionState::PermissionDenied,
        ] {
            assert!(c.on_attention(100, state).is_empty());
            assert!(!c.is_paused_by_attention());
        }
    }

    #[test]
    fn starting_while_away_pauses_immediately() {
        let history = EngagementHistory::new(100);
        let mut c = controller(25, 4);
        c.set_shield_enabled(0, true);
        let events = c.start(0, 0, AttentionState::Away);
        assert!(c.is_active());
        assert!(c.is_paused_by_attention());
        assert!(events.iter().any(|e| matches!(e, Event::PausedByAttention { .. })));
        assert!(events.iter().any(|e| matches!(e, Event::DistractionAlert { .. })));
        run_seconds(&mut c, 0, 5, &history);
        assert_eq!(c.remaining_secs(), 25 * 60);
    }

    #[test]
    fn resuming_after_manual_pause_while_distracted_stays_paused() {
        let history = EngagementHistory::new(100);
        let mut c = controller(25, 4);
        c.set_shield_enabled(0, true);
        c.start(0, 0, AttentionState::Focused);
        run_seconds(&mut c, 0, 3, &history);
        c.pause(3_000);
        let events = c.toggle(4_000, 0, AttentionState::Distracted);
        assert!(c.is_paused_by_attention());
        assert!(events.iter().any(|e| matches!(e, Event::PausedByAttention { .. })));
        run_seconds(&mut c, 4_000, 5, &history);
        assert_eq!(c.remaining_secs(), 25 * 60 - 3);
    }

    #[test]
    fn start_keeps_attention_pause_while_user_is_away() {
        let mut c = controller(25, 4);
        c.set_shield_enabled(0, true);
        c.start(0, 0, AttentionState::Focused);
        c.on_attention(100, AttentionState::Away);
        let events = c.start(200, 0, AttentionState::Away);
        assert!(c.is_paused_by_attention());
        assert!(!events.iter().any(|e| matches!(e, Event::ResumedByAttention { .. })));
        assert!(!events.iter().any(|e| matches!(e, Event::PausedByAttention { .. })));
    }

    #[test]
    fn start_without_shield_ignores_attention() {
        let mut c = controller(25, 4);
        let events = c.start(0, 0, AttentionState::Away);
        assert!(!c.is_paused_by_attention());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn disabling_shield_clears_pause() {
        let mut c = controller(25, 4);
        c.set_shield_enabled(0, true);
        c.start(0, 0, AttentionState::Focused);
        c.on_attention(100, AttentionState::Away);
        assert!(c.is_paused_by_attention());
        c.set_shield_enabled(200, false);
        assert!(!c.is_paused_by_attention());
        assert!(c.is_running());
    }

    #[test]
    fn setters_clamp_and_update_idle_remaining() {
        let mut c = controller(25, 4);
        assert_eq!(c.set_focus_minutes(500), 180);
        assert_eq!(c.remaining_secs(), 180 * 60);
        assert_eq!(c.set_short_break_minutes(0), 1);
        assert_eq!(c.set_long_break_minutes(1), 5);
        assert_eq!(c.set_cycles_until_long_break(20), 10);

        c.start(0, 0, AttentionState::Focused);
        c.set_focus_minutes(30);
        assert_eq!(c.remaining_secs(), 180 * 60);
    }

    #[test]
    fn preset_applies_lengths() {
        let mut c = controller(25, 4);
        c.apply_preset(Preset::Extended);
        assert_eq!(c.timer_config().focus_minutes, 50);
        assert_eq!(c.timer_config().short_break_minutes, 10);
        assert_eq!(c.remaining_secs(), 50 * 60);
    }

    #[test]
    fn session_log_is_capped() {
        let mut c = controller(25, 4);
        for _ in 0..60 {
            c.push_log(SessionKind::Focus, 25, to_datetime(0));
        }
        assert_eq!(c.session_log().count(), SESSION_LOG_CAPACITY);
    }

    #[test]
    fn reset_returns_to_idle_pomodoro() {
        let history = EngagementHistory::new(100);
        let mut c = controller(1, 4);
        c.start(0, 0, AttentionState::Focused);
        run_seconds(&mut c, 0, 60, &history);
        assert_eq!(c.mode(), TimerMode::ShortBreak);
        c.reset(61_000, 0);
        assert_eq!(c.mode(), TimerMode::Pomodoro);
        assert!(!c.is_active());
        assert_eq!(c.remaining_secs(), 60);
    }
}
