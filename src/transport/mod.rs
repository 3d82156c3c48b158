//! WebSocket transport layer.
//!
//! This module owns the persistent duplex channel between the dashboard
//! client and the backend.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Session        │                              │  Backend        │
//! │                 │         WebSocket            │                 │
//! │  Transport      │◄────────────────────────────►│  /ws endpoint   │
//! │  → EventSender  │   ws:// or wss:// per page   │                 │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `channel_url` - Derive the endpoint from the page origin
//! 2. `Transport::connect` - Start a channel, get its epoch
//! 3. `Signal::Opened` - Channel accepts sends
//! 4. `Signal::MessageReceived` - Inbound frames, in arrival order
//! 5. `Signal::Closed` - Channel ended; the session decides what next
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | Transport trait, events and WebSocket implementation |
//! | `endpoint` | Channel URL derivation |

// ============================================================================
// Submodules
// ============================================================================

/// Transport trait, events and WebSocket implementation.
pub mod connection;

/// Channel URL derivation.
pub mod endpoint;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{EventReceiver, EventSender, Signal, Transport, TransportEvent, WsTransport};
pub use endpoint::{DEFAULT_CHANNEL_PATH, channel_url};
