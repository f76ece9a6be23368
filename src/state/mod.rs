//! State module for chapter traversal
//!
//! # Components
//!
//! - `SessionState`: The named states a chapter session moves through
//! - `TerminationReason`: Why a session reached its terminal state

mod session_state;

// Re-export main types
pub use session_state::{SessionState, TerminationReason};
