use crate::error::PenaltyError;

/// Computes the score after a sustained-idle penalty.
///
/// Implementations may be backed by a remote service; a failure skips the
/// penalty for that check instead of interrupting scoring.
pub trait IdlePenalty {
    fn apply(&self, score: f64) -> Result<f64, PenaltyError>;
}

/// Subtracts a fixed number of points and floors the result at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedIdlePenalty {
    pub points: f64,
}

impl Default for FixedIdlePenalty {
    fn default() -> Self {
        Self { points: 15.0 }
    }
}

impl IdlePenalty for FixedIdlePenalty {
    fn apply(&self, score: f64) -> Result<f64, PenaltyError> {
        Ok((score - self.points).floor().max(0.0))
    }
}
