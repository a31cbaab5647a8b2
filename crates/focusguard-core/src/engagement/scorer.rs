//! Engagement scorer.
//!
//! A continuous 0..=100 score driven by the 1 Hz tick. With the camera on the
//! score follows the (hysteresis-filtered) attention state; with the camera off
//! it falls back to keyboard, mouse and scroll activity.
//!
//! Mutators are [`EngagementScorer::tick`], [`EngagementScorer::check_penalties`],
//! [`EngagementScorer::on_key`] and [`EngagementScorer::on_hidden`]. They are
//! never called concurrently, and every one of them clamps the score.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::activity::ActivitySource;
use super::history::EngagementHistory;
use super::penalty::IdlePenalty;
use crate::attention::AttentionState;
use crate::clock::to_datetime;
use crate::events::{Event, ResetReason};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementConfig {
    #[serde(default = "default_max_score")]
    pub max_score: f64,
    /// Points lost per tick while decaying.
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f64,
    /// Points gained per tick (or keypress) of input activity.
    #[serde(default = "default_activity_bump")]
    pub activity_bump: f64,
    /// Points gained per tick of stable camera focus.
    #[serde(default = "default_camera_focus_bump")]
    pub camera_focus_bump: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Downward crossing of this level prompts a re-engagement challenge.
    #[serde(default = "default_challenge_level")]
    pub challenge_level: f64,
    #[serde(default = "default_camera_stabilize_ms")]
    pub camera_stabilize_ms: u64,
    #[serde(default = "default_key_idle_ms")]
    pub key_idle_ms: u64,
    #[serde(default = "default_mouse_idle_ms")]
    pub mouse_idle_ms: u64,
    #[serde(default = "default_scroll_idle_ms")]
    pub scroll_idle_ms: u64,
    #[serde(default = "default_no_move_ms")]
    pub no_move_ms: u64,
    #[serde(default = "default_penalty_after_ms")]
    pub idle_penalty_after_ms: u64,
    #[serde(default = "default_idle_penalty_points")]
    pub idle_penalty_points: f64,
    #[serde(default = "default_penalty_after_ms")]
    pub away_penalty_after_ms: u64,
    #[serde(default = "default_away_penalty_points")]
    pub away_penalty_points: f64,
    #[serde(default = "default_visibility_penalty_points")]
    pub visibility_penalty_points: f64,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

fn default_max_score() -> f64 {
    100.0
}
fn default_decay_rate() -> f64 {
    1.0
}
fn default_activity_bump() -> f64 {
    5.0
}
fn default_camera_focus_bump() -> f64 {
    10.0
}
fn default_threshold() -> f64 {
    30.0
}
fn default_challenge_level() -> f64 {
    85.0
}
fn default_camera_stabilize_ms() -> u64 {
    2_000
}
fn default_key_idle_ms() -> u64 {
    2_000
}
fn default_mouse_idle_ms() -> u64 {
    2_000
}
fn default_scroll_idle_ms() -> u64 {
    3_000
}
fn default_no_move_ms() -> u64 {
    7_000
}
fn default_penalty_after_ms() -> u64 {
    13_000
}
fn default_idle_penalty_points() -> f64 {
    15.0
}
fn default_away_penalty_points() -> f64 {
    2.0
}
fn default_visibility_penalty_points() -> f64 {
    0.5
}
fn default_history_capacity() -> usize {
    100
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            max_score: default_max_score(),
            decay_rate: default_decay_rate(),
            activity_bump: default_activity_bump(),
            camera_focus_bump: default_camera_focus_bump(),
            threshold: default_threshold(),
            challenge_level: default_challenge_level(),
            camera_stabilize_ms: default_camera_stabilize_ms(),
            key_idle_ms: default_key_idle_ms(),
            mouse_idle_ms: default_mouse_idle_ms(),
            scroll_idle_ms: default_scroll_idle_ms(),
            no_move_ms: default_no_move_ms(),
            idle_penalty_after_ms: default_penalty_after_ms(),
            idle_penalty_points: default_idle_penalty_points(),
            away_penalty_after_ms: default_penalty_after_ms(),
            away_penalty_points: default_away_penalty_points(),
            visibility_penalty_points: default_visibility_penalty_points(),
            history_capacity: default_history_capacity(),
        }
    }
}

/// Camera state as seen by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoarseCamera {
    Focused,
    Distracted,
    Away,
    None,
}

/// Camera input for one scorer call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraSignal {
    pub tracking: bool,
    pub attention: AttentionState,
}

impl CameraSignal {
    pub fn off() -> Self {
        Self {
            tracking: false,
            attention: AttentionState::Off,
        }
    }

    pub fn tracking(attention: AttentionState) -> Self {
        Self {
            tracking: true,
            attention,
        }
    }

    /// Anything other than `focused` counts against the user while tracking.
    pub fn coarse(&self) -> CoarseCamera {
        if !self.tracking {
            return CoarseCamera::None;
        }
        match self.attention {
            AttentionState::Focused => CoarseCamera::Focused,
            AttentionState::Away => CoarseCamera::Away,
            _ => CoarseCamera::Distracted,
        }
    }

    pub fn distracted_or_away(&self) -> bool {
        self.tracking && self.attention != AttentionState::Focused
    }

    pub fn away(&self) -> bool {
        self.tracking && self.attention == AttentionState::Away
    }
}

#[derive(Debug, Clone)]
pub struct EngagementScorer {
    config: EngagementConfig,
    score: f64,
    history: EngagementHistory,
    breached: bool,
    camera_state: CoarseCamera,
    camera_changed_ms: u64,
    no_move_armed: bool,
    idle_penalty_applied: bool,
    away_penalty_applied: bool,
    decay_eligible_since: Option<u64>,
    /// Lower bounds on activity timestamps, stamped by start/reset.
    key_floor_ms: u64,
    mouse_floor_ms: u64,
}

impl EngagementScorer {
    pub fn new(config: EngagementConfig, now_ms: u64) -> Self {
        Self {
            score: config.max_score,
            history: EngagementHistory::new(config.history_capacity),
            config,
            breached: false,
            camera_state: CoarseCamera::None,
            camera_changed_ms: now_ms,
            no_move_armed: false,
            idle_penalty_applied: false,
            away_penalty_applied: false,
            decay_eligible_since: None,
            key_floor_ms: now_ms,
            mouse_floor_ms: now_ms,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn history(&self) -> &EngagementHistory {
        &self.history
    }

    pub fn config(&self) -> &EngagementConfig {
        &self.config
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    pub fn is_breached(&self) -> bool {
        self.breached
    }

    pub fn is_no_move_armed(&self) -> bool {
        self.no_move_armed
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, now_ms: u64) -> Event {
        self.score = self.config.max_score;
        self.history.clear();
        self.breached = false;
        self.key_floor_ms = now_ms;
        self.idle_penalty_applied = false;
        self.no_move_armed = false;
        self.decay_eligible_since = None;
        Event::EngagementReset {
            reason: ResetReason::Started,
            at: to_datetime(now_ms),
        }
    }

    /// Go idle at full score. The breach latch is left as-is.
    pub fn stop(&mut self, now_ms: u64) -> Event {
        self.score = self.config.max_score;
        self.history.clear();
        Event::EngagementReset {
            reason: ResetReason::Stopped,
            at: to_datetime(now_ms),
        }
    }

    /// Recovery after a positive intervention such as a passed challenge.
    pub fn reset(&mut self, now_ms: u64) -> Event {
        self.score = self.config.max_score;
        self.history.clear();
        self.breached = false;
        self.key_floor_ms = now_ms;
        self.mouse_floor_ms = now_ms;
        self.idle_penalty_applied = false;
        self.away_penalty_applied = false;
        self.decay_eligible_since = None;
        Event::EngagementReset {
            reason: ResetReason::Recovered,
            at: to_datetime(now_ms),
        }
    }

    /// The 1 Hz scoring tick.
    pub fn tick(
        &mut self,
        now_ms: u64,
        camera: CameraSignal,
        activity: &dyn ActivitySource,
    ) -> Vec<Event> {
        let mut events = Vec::new();
        let cfg = &self.config;

        let key_idle = now_ms.saturating_sub(self.last_key_ms(activity));
        let mouse_idle = now_ms.saturating_sub(self.last_mouse_ms(activity));
        let scroll_idle = now_ms.saturating_sub(activity.last_scroll_ms());

        let no_inputs = key_idle > cfg.key_idle_ms
            && mouse_idle > cfg.mouse_idle_ms
            && scroll_idle > cfg.scroll_idle_ms
            && activity.is_window_focused();
        let no_move =
            key_idle > cfg.no_move_ms && mouse_idle > cfg.no_move_ms && scroll_idle > cfg.no_move_ms;
        if no_move && !self.no_move_armed {
            debug!("no input for {} ms, next keypress resets engagement", cfg.no_move_ms);
            self.no_move_armed = true;
        }

        let coarse = camera.coarse();
        if coarse != self.camera_state {
            self.camera_state = coarse;
            self.camera_changed_ms = now_ms;
        }

        let cfg = &self.config;
        let next = if camera.tracking {
            let stable = now_ms.saturating_sub(self.camera_changed_ms) >= cfg.camera_stabilize_ms;
            match (coarse, stable) {
                (CoarseCamera::Focused, true) => self.score + cfg.camera_focus_bump,
                (CoarseCamera::Distracted | CoarseCamera::Away, true) => {
                    self.score - cfg.decay_rate * 4.0
                }
                _ => self.score - cfg.decay_rate,
            }
        } else if no_inputs || no_move {
            self.score - cfg.decay_rate
        } else {
            self.score + cfg.activity_bump
        };
        self.set_score(next, now_ms, &mut events);

        if self.score < self.config.threshold && !self.breached {
            self.breached = true;
            info!("engagement {:.1} fell below {}", self.score, self.config.threshold);
            events.push(Event::ThresholdBreached {
                score: self.score,
                threshold: self.config.threshold,
                at: to_datetime(now_ms),
            });
        }

        self.history.push(now_ms, self.score);
        events
    }

    /// The separate 1 Hz idle/away penalty check.
    pub fn check_penalties(
        &mut self,
        now_ms: u64,
        camera: CameraSignal,
        activity: &dyn ActivitySource,
        penalty: &dyn IdlePenalty,
    ) -> Vec<Event> {
        let mut events = Vec::new();
        let key_idle = now_ms.saturating_sub(self.last_key_ms(activity));
        let mouse_idle = now_ms.saturating_sub(self.last_mouse_ms(activity));

        let eligible = (!camera.tracking && key_idle > self.config.key_idle_ms)
            || camera.distracted_or_away();
        let eligible_for = if eligible {
            let since = *self.decay_eligible_since.get_or_insert(now_ms);
            now_ms.saturating_sub(since)
        } else {
            self.decay_eligible_since = None;
            0
        };

        if eligible && eligible_for >= self.config.idle_penalty_after_ms && !self.idle_penalty_applied
        {
            match penalty.apply(self.score) {
                Ok(next) => {
                    self.idle_penalty_applied = true;
                    let before = self.score;
                    self.set_score(next, now_ms, &mut events);
                    info!("idle penalty applied, engagement {before:.1} -> {:.1}", self.score);
                    events.push(Event::IdlePenaltyApplied {
                        penalty: before - self.score,
                        score: self.score,
                        at: to_datetime(now_ms),
                    });
                }
                Err(err) => warn!("{err}; skipping idle penalty this cycle"),
            }
        }

        let away_idle = camera.away() && mouse_idle >= self.config.away_penalty_after_ms;
        if away_idle && !self.away_penalty_applied {
            self.away_penalty_applied = true;
            let before = self.score;
            self.set_score(before - self.config.away_penalty_points, now_ms, &mut events);
            events.push(Event::AwayPenaltyApplied {
                penalty: before - self.score,
                score: self.score,
                at: to_datetime(now_ms),
            });
        }
        if !away_idle {
            self.away_penalty_applied = false;
        }
        events
    }

    /// A keypress. Call after the activity source has recorded it.
    ///
    /// After a long dead period the first keypress restores full engagement
    /// instead of bumping gradually.
    pub fn on_key(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        self.idle_penalty_applied = false;
        self.away_penalty_applied = false;
        self.decay_eligible_since = None;

        if self.no_move_armed {
            self.no_move_armed = false;
            self.score = self.config.max_score;
            self.history.clear();
            self.breached = false;
            info!("activity resumed after a dead period, engagement restored");
            events.push(Event::EngagementReset {
                reason: ResetReason::ActivityResumed,
                at: to_datetime(now_ms),
            });
            return events;
        }

        let next = self.score + self.config.activity_bump;
        self.set_score(next, now_ms, &mut events);
        events
    }

    /// The page went from visible to hidden.
    pub fn on_hidden(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        let before = self.score;
        self.set_score(before - self.config.visibility_penalty_points, now_ms, &mut events);
        events.push(Event::VisibilityPenaltyApplied {
            penalty: before - self.score,
            score: self.score,
            at: to_datetime(now_ms),
        });
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn last_key_ms(&self, activity: &dyn ActivitySource) -> u64 {
        activity.last_key_ms().max(self.key_floor_ms)
    }

    fn last_mouse_ms(&self, activity: &dyn ActivitySource) -> u64 {
        activity.last_mouse_ms().max(self.mouse_floor_ms)
    }

    fn set_score(&mut self, next: f64, now_ms: u64, events: &mut Vec<Event>) {
        let next = if next.is_nan() { 0.0 } else { next.clamp(0.0, self.config.max_score) };
        let previous = std::mem::replace(&mut self.score, next);
        let level = self.config.challenge_level;
        if previous >= level && next < level {
            events.push(Event::ChallengePrompted {
                score: next,
                at: to_datetime(now_ms),
            });
        }
    }
}
