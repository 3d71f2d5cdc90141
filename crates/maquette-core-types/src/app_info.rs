use serde::{Deserialize, Serialize};

use crate::session_state::SessionState;

/// Application/session metadata record stored at the top of a command log
///
/// Every persisted command log carries exactly one AppInfo. Unlike the
/// commands themselves, which are re-executed on load, the AppInfo is copied
/// verbatim from the loaded log onto the rebuilt one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    /// Version string of the application that wrote the log
    pub version: String,

    /// Session state flags in effect when the log was written
    pub session_state: SessionState,
}

impl AppInfo {
    /// Create an AppInfo for the current application version
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            session_state: SessionState::new(),
        }
    }
}

impl Default for AppInfo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_current_version() {
        let info = AppInfo::new();
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(info.session_state, SessionState::new());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut info = AppInfo::new();
        info.session_state.build_volume_visible = true;

        let json = serde_json::to_string(&info).unwrap();
        let back: AppInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, back);
    }
}
