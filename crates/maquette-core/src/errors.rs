use thiserror::Error;

/// Result type alias using MaquetteError
pub type Result<T> = std::result::Result<T, MaquetteError>;

/// Errors for the persisted-data validity class
///
/// This covers only structural problems in a deserialized command log,
/// caught by [`CommandList::validate`](crate::CommandList::validate) before
/// replay is attempted. The session layer surfaces the `Display` text as the
/// "could not load session" detail string.
///
/// Invariant violations inside the engine (out-of-range index access,
/// undo/redo without a preceding `can_*` check, dispatch to an unregistered
/// command type) are defects, not runtime states; they panic and are never
/// represented here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaquetteError {
    /// The log record has no application/session metadata
    #[error("missing app_info record in command log")]
    MissingAppInfo,

    /// The saved cursor does not fit the command list
    #[error("invalid current_index {current_index} for {command_count} command(s)")]
    InvalidCurrentIndex {
        /// Cursor value found in the record
        current_index: usize,
        /// Number of commands in the record
        command_count: usize,
    },
}
