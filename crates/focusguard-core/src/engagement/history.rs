use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// One scoring-tick sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngagementRecord {
    /// Position in the lifetime sequence of samples; survives ring eviction.
    pub seq: u64,
    /// Epoch milliseconds.
    pub time: u64,
    pub score: f64,
}

/// Analytics for one focus session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Mean score, rounded to the nearest integer.
    pub average_score: u32,
    /// One sample per second, so the count of low samples is seconds.
    pub seconds_below_threshold: u32,
    pub stillness_alerts: u32,
    pub samples: u32,
}

/// Bounded ring buffer of score samples.
#[derive(Debug, Clone)]
pub struct EngagementHistory {
    records: VecDeque<EngagementRecord>,
    capacity: usize,
    next_seq: u64,
}

impl EngagementHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            next_seq: 0,
        }
    }

    pub fn push(&mut self, time: u64, score: f64) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(EngagementRecord {
            seq: self.next_seq,
            time,
            score,
        });
        self.next_seq += 1;
    }

    /// Drop all samples. Sequence numbers keep counting.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Marker to pass to [`EngagementHistory::since`] later.
    pub fn next_index(&self) -> u64 {
        self.next_seq
    }

    pub fn records(&self) -> impl Iterator<Item = &EngagementRecord> {
        self.records.iter()
    }

    pub fn latest(&self) -> Option<&EngagementRecord> {
        self.records.back()
    }

    pub fn since(&self, start: u64) -> impl Iterator<Item = &EngagementRecord> {
        self.records.iter().filter(move |r| r.seq >= start)
    }

    /// Summarize samples recorded at or after `start`. `None` when there are none.
    pub fn summarize(&self, start: u64, threshold: f64, stillness_alerts: u32) -> Option<SessionSummary> {
        let (count, sum, below) = self.since(start).fold((0u32, 0.0, 0u32), |(n, sum, below), r| {
            (n + 1, sum + r.score, below + u32::from(r.score < threshold))
        });
        if count == 0 {
            return None;
        }
        Some(SessionSummary {
            average_score: (sum / count as f64).round() as u32,
            seconds_below_threshold: below,
            stillness_alerts,
            samples: count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_drops_oldest() {
        let mut h = EngagementHistory::new(100);
        for i in 0..150 {
            h.push(i * 1_000, 50.0);
        }
        assert_eq!(h.len(), 100);
        assert_eq!(h.records().next().unwrap().seq, 50);
        assert_eq!(h.next_index(), 150);
    }

    #[test]
    fn summary_since_marker() {
        let mut h = EngagementHistory::new(100);
        h.push(0, 10.0);
        let mark = h.next_index();
        for score in [100.0, 80.0, 20.0, 25.0] {
            h.push(1_000, score);
        }
        let s = h.summarize(mark, 30.0, 2).unwrap();
        assert_eq!(s.average_score, 56);
        assert_eq!(s.seconds_below_threshold, 2);
        assert_eq!(s.stillness_alerts, 2);
        assert_eq!(s.samples, 4);
    }

    #[test]
    fn clear_keeps_sequence() {
        let mut h = EngagementHistory::new(10);
        h.push(0, 1.0);
        h.push(0, 2.0);
        h.clear();
        assert!(h.is_empty());
        assert_eq!(h.next_index(), 2);
        assert!(h.summarize(0, 30.0, 0).is_none());
    }
}
