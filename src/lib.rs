//! Groot dashboard client - real-time channel to the cluster assistant.
//!
//! This library keeps a persistent WebSocket channel to the Groot backend,
//! sends chat queries and status refresh requests, and turns the typed
//! replies into view models for a renderer.
//!
//! # Architecture
//!
//! ```text
//! UI intent ─► protocol::build_* ─► Transport::send ──► backend /ws
//!                                                          │
//! ViewSink ◄── view::to_* ◄── Router::route ◄── Signal::MessageReceived
//!
//! Session (one per page): owns transport, reconnect timer, router
//! ```
//!
//! - Each [`Session`] owns one channel, one reconnect timer and one router
//! - The protocol has no correlation IDs; replies match requests by arrival
//! - A dropped channel is retried after a fixed delay until teardown
//!
//! # Quick Start
//!
//! ```no_run
//! use groot_client::{ChatViewModel, Intent, Session, SessionConfig, StatusViewModel, ViewSink};
//!
//! struct Console;
//!
//! impl ViewSink for Console {
//!     fn chat_entry(&mut self, entry: ChatViewModel) {
//!         println!("{}", entry.text);
//!     }
//!     fn status_view(&mut self, view: StatusViewModel) {
//!         println!("{} pods", view.pod_count);
//!     }
//!     fn error_message(&mut self, message: &str) {
//!         eprintln!("{message}");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> groot_client::Result<()> {
//!     let config = SessionConfig::builder()
//!         .origin("http://127.0.0.1:8080")
//!         .request_status_on_open(true)
//!         .build()?;
//!
//!     let (intents, intents_rx) = tokio::sync::mpsc::unbounded_channel();
//!     intents.send(Intent::RefreshStatus).ok();
//!
//!     let mut session = Session::websocket(config, Console);
//!     session.run(intents_rx).await
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Backend HTTP endpoints (namespace listing) |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Connection epochs and timer generations |
//! | [`protocol`] | Inbound and outbound envelopes |
//! | [`router`] | Inbound frame dispatch |
//! | [`session`] | Connection state machine and dispatcher loop |
//! | [`transport`] | WebSocket transport layer |
//! | [`view`] | Presentation adapters and the [`ViewSink`] seam |

// ============================================================================
// Modules
// ============================================================================

/// Backend HTTP endpoints.
pub mod api;

/// Error types and result aliases.
pub mod error;

/// Type-safe identifiers.
pub mod identifiers;

/// WebSocket protocol message types.
pub mod protocol;

/// Inbound frame dispatch.
pub mod router;

/// Page session: lifecycle, reconnect supervision, dispatch.
pub mod session;

/// WebSocket transport layer.
pub mod transport;

/// Presentation adapters.
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

// API types
pub use api::NamespaceClient;

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{ConnectionEpoch, TimerGeneration};

// Protocol types
pub use protocol::{
    AssistantResponse, InboundEnvelope, OutboundEnvelope, StatusSnapshot, SuggestedCommand,
    build_query, build_status_request,
};

// Router types
pub use router::{RouteOutcome, Router};

// Session types
pub use session::{
    ConnectionState, Intent, ReconnectTimer, Session, SessionBuilder, SessionConfig, SessionEvent,
};

// Transport types
pub use transport::{Signal, Transport, TransportEvent, WsTransport, channel_url};

// View types
pub use view::{
    ChartSlice, ChatViewModel, NamespaceRow, StatusChart, StatusViewModel, ViewSink,
    namespace_rows, to_chat_entry, to_status_view,
};
