use serde::{Deserialize, Serialize};

/// Limits applied by a [`SessionHost`](crate::SessionHost).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Open sessions allowed at once; closing a session frees its slot.
    pub max_sessions: usize,
}

impl HostConfig {
    pub const DEFAULT_MAX_SESSIONS: usize = 1024;
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            max_sessions: Self::DEFAULT_MAX_SESSIONS,
        }
    }
}
