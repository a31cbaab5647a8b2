use serde::{Deserialize, Serialize};

/// Published attention classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttentionState {
    Initializing,
    PermissionNeeded,
    PermissionDenied,
    Focused,
    Distracted,
    Away,
    Error,
    Off,
}

impl AttentionState {
    /// States that require the consumer to invoke grant again.
    pub fn is_terminal(self) -> bool {
        matches!(self, AttentionState::PermissionDenied | AttentionState::Error)
    }

    /// Only explicit distraction states may pause a session.
    pub fn is_inattentive(self) -> bool {
        matches!(self, AttentionState::Distracted | AttentionState::Away)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttentionState::Initializing => "initializing",
            AttentionState::PermissionNeeded => "permission-needed",
            AttentionState::PermissionDenied => "permission-denied",
            AttentionState::Focused => "focused",
            AttentionState::Distracted => "distracted",
            AttentionState::Away => "away",
            AttentionState::Error => "error",
            AttentionState::Off => "off",
        }
    }
}

impl std::fmt::Display for AttentionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-frame classification before debouncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawAttention {
    Focused,
    Distracted,
    Away,
}

impl From<RawAttention> for AttentionState {
    fn from(raw: RawAttention) -> Self {
        match raw {
            RawAttention::Focused => AttentionState::Focused,
            RawAttention::Distracted => AttentionState::Distracted,
            RawAttention::Away => AttentionState::Away,
        }
    }
}
