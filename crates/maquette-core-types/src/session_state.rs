use serde::{Deserialize, Serialize};

/// Per-session editor state that is saved and restored with a session
///
/// These flags capture viewing/interaction toggles that are not part of the
/// document itself but should survive a save/load cycle. They are carried
/// inside [`AppInfo`](crate::AppInfo) rather than being replayed: session
/// state is copied verbatim on load, never reconstructed from commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Whether the point target is visible
    pub point_target_visible: bool,

    /// Whether the edge target is visible
    pub edge_target_visible: bool,

    /// Whether model edges are shown
    pub edges_shown: bool,

    /// Whether the build volume is visible
    pub build_volume_visible: bool,

    /// Whether interactive transforms are axis-aligned
    pub axis_aligned: bool,
}

impl SessionState {
    /// Create a new SessionState with all flags off
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether this state differs from another
    ///
    /// The session layer compares the live state against the state captured
    /// at load/save time to decide whether there is anything to save.
    pub fn differs_from(&self, other: &SessionState) -> bool {
        self != other
    }
}
