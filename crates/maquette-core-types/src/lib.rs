//! Core types shared across Maquette facilities
//!
//! This crate provides the persisted session metadata types used by the
//! command history core and the session layer:
//!
//! - **AppInfo**: the application/session metadata record stored at the top
//!   of every command log
//! - **SessionState**: per-session editor flags that travel with the log

pub mod app_info;
pub mod session_state;

pub use app_info::AppInfo;
pub use session_state::SessionState;
