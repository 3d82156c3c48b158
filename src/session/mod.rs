//! Page session: connection lifecycle, reconnect supervision, dispatch.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `config` | [`SessionConfig`] and its builder |
//! | `core` | [`Session`] state machine and dispatcher loop |
//! | `timer` | Single-shot [`ReconnectTimer`] |

// ============================================================================
// Submodules
// ============================================================================

/// Session configuration and builder.
pub mod config;

/// Session state machine and dispatcher loop.
pub mod core;

/// Reconnect timer.
pub mod timer;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{DEFAULT_NAMESPACE, DEFAULT_RECONNECT_DELAY, SessionBuilder, SessionConfig};
pub use core::{ConnectionState, Intent, NOT_OPEN_NOTICE, Session, SessionEvent};
pub use timer::ReconnectTimer;
