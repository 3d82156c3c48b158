//! WebSocket protocol message types.
//!
//! This module defines the frames exchanged between the dashboard client
//! and the backend over the `/ws` channel.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `query` | Client → Backend | Natural-language question |
//! | `status_update` | Client → Backend | Status refresh request |
//! | `response` | Backend → Client | Assistant answer |
//! | `status_update` | Backend → Client | Cluster status snapshot |
//! | `error` | Backend → Client | Backend failure |
//!
//! The protocol carries no correlation IDs. Responses are matched to
//! requests purely by arrival order.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `inbound` | Backend → client envelopes and payloads |
//! | `outbound` | Client → backend envelopes and builders |

// ============================================================================
// Submodules
// ============================================================================

/// Backend → client envelopes.
pub mod inbound;

/// Client → backend envelopes.
pub mod outbound;

// ============================================================================
// Re-exports
// ============================================================================

pub use inbound::{AssistantResponse, InboundEnvelope, StatusSnapshot, SuggestedCommand};
pub use outbound::{OutboundEnvelope, build_query, build_status_request};
