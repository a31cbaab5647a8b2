mod activity;
mod history;
mod penalty;
mod scorer;

pub use activity::{ActivitySource, InputActivity};
pub use history::{EngagementHistory, EngagementRecord, SessionSummary};
pub use penalty::{FixedIdlePenalty, IdlePenalty};
pub use scorer::{CameraSignal, CoarseCamera, EngagementConfig, EngagementScorer};
