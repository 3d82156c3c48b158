//! Inbound message routing.
//!
//! The router parses each inbound frame and hands the payload to exactly one
//! presentation path. Frames that fail to parse or carry an unknown `type`
//! are logged and dropped; routing never returns an error to the channel
//! event handler, so one bad frame cannot stop later frames from being
//! handled.

// ============================================================================
// Imports
// ============================================================================

use tracing::{debug, warn};

use crate::protocol::InboundEnvelope;
use crate::view::{ViewSink, format_error, to_chat_entry, to_status_view};

// ============================================================================
// RouteOutcome
// ============================================================================

/// Which path a frame was dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Sent to the chat transcript.
    Chat,
    /// Sent to the status view.
    Status,
    /// Sent to the error display.
    Error,
    /// Not dispatched: malformed or unknown kind.
    Dropped,
}

// ============================================================================
// Router
// ============================================================================

/// Dispatches inbound frames to a [`ViewSink`].
#[derive(Debug)]
pub struct Router<S> {
    sink: S,
}

impl<S: ViewSink> Router<S> {
    /// Creates a router rendering into `sink`.
    #[inline]
    #[must_use]
    pub const fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Routes one raw text frame.
    pub fn route(&mut self, raw: &str) -> RouteOutcome {
        let envelope = match InboundEnvelope::parse(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, len = raw.len(), "Dropping malformed frame");
                return RouteOutcome::Dropped;
            }
        };

        debug!(kind = envelope.kind(), "Routing frame");

        match envelope {
            InboundEnvelope::Response(response) => {
                self.sink.chat_entry(to_chat_entry(&response));
                RouteOutcome::Chat
            }

            InboundEnvelope::StatusUpdate(status) => {
                self.sink.status_view(to_status_view(&status));
                RouteOutcome::Status
            }

            InboundEnvelope::Error(message) => {
                self.sink.error_message(&format_error(&message));
                RouteOutcome::Error
            }

            InboundEnvelope::Unknown { kind } => {
                warn!(%kind, "Dropping frame with unknown type");
                RouteOutcome::Dropped
            }
        }
    }

    /// Returns the sink.
    #[inline]
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the sink mutably.
    #[inline]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the router, returning the sink.
    #[inline]
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }
}

// ============================================================================
// Tests
// ============================================================================
