//! Single-shot delay timer used to debounce published attention.
//!
//! The timer is polled rather than callback-driven: the owner calls
//! [`DebounceTimer::poll`] from its scheduled callbacks and receives the candidate
//! once the delay has elapsed.

#[derive(Debug, Clone)]
struct Pending<T> {
    candidate: T,
    armed_at_ms: u64,
}

#[derive(Debug, Clone)]
pub struct DebounceTimer<T> {
    delay_ms: u64,
    pending: Option<Pending<T>>,
}

impl<T: Copy + PartialEq> DebounceTimer<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Arm the timer for `candidate`.
    ///
    /// Re-arming with the pending candidate keeps its deadline; a different
    /// candidate restarts the full delay.
    pub fn arm(&mut self, now_ms: u64, candidate: T) {
        if let Some(pending) = &self.pending {
            if pending.candidate == candidate {
                return;
            }
        }
        self.pending = Some(Pending {
            candidate,
            armed_at_ms: now_ms,
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.pending
            .as_ref()
            .map(|p| p.armed_at_ms.saturating_add(self.delay_ms))
    }

    /// Fire if the deadline has passed. Firing disarms the timer.
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        let deadline = self.deadline_ms()?;
        if now_ms < deadline {
            return None;
        }
        self.pending.take().map(|p| p.candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_delay() {
        let mut timer = DebounceTimer::new(2_000);
        timer.arm(1_000, 'a');
        assert_eq!(timer.poll(2_999), None);
        assert_eq!(timer.poll(3_000), Some('a'));
        assert!(!timer.is_armed());
        assert_eq!(timer.poll(10_000), None);
    }

    #[test]
    fn same_candidate_keeps_deadline() {
        let mut timer = DebounceTimer::new(2_000);
        timer.arm(0, 'a');
        timer.arm(1_500, 'a');
        assert_eq!(timer.deadline_ms(), Some(2_000));
        assert_eq!(timer.poll(2_000), Some('a'));
    }

    #[test]
    fn new_candidate_restarts_delay() {
        let mut timer = DebounceTimer::new(2_000);
        timer.arm(0, 'd');
        timer.arm(1_900, 'w');
        assert_eq!(timer.poll(2_000), None);
        assert_eq!(timer.deadline_ms(), Some(3_900));
        assert_eq!(timer.poll(3_900), Some('w'));
    }

    #[test]
    fn cancel_discards_candidate() {
        let mut timer = DebounceTimer::new(2_000);
        timer.arm(0, 'a');
        timer.cancel();
        assert_eq!(timer.poll(5_000), None);
        timer.arm(5_000, 'c');
        assert_eq!(timer.deadline_ms(), Some(7_000));
    }
}
