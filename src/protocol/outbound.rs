//! Outbound envelopes and their builders.
//!
//! Envelopes are built from UI intent, serialized once and discarded after
//! the send. Building performs no network or rendering side effects.

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;
use serde_json::to_string;

use crate::error::{Error, Result};

// ============================================================================
// OutboundEnvelope
// ============================================================================

/// A message from the client to the backend.
///
/// # Format
///
/// Query:
/// ```json
/// { "type": "query", "query": "list pods", "namespace": "default" }
/// ```
///
/// Status refresh:
/// ```json
/// { "type": "status_update" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEnvelope {
    /// Natural-language query scoped to a namespace.
    Query {
        /// Trimmed user text.
        query: String,
        /// Namespace the query refers to.
        namespace: String,
    },

    /// Request for a fresh cluster status snapshot.
    StatusUpdate,
}

impl OutboundEnvelope {
    /// Returns the wire discriminator of this envelope.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Query { .. } => "query",
            Self::StatusUpdate => "status_update",
        }
    }

    /// Serializes the envelope into a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_frame(&self) -> Result<String> {
        Ok(to_string(self)?)
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Builds a query envelope.
///
/// Leading and trailing whitespace is removed from `text`.
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] if `text` is blank; the caller must not send.
pub fn build_query(text: &str, namespace: &str) -> Result<OutboundEnvelope> {
    let query = text.trim();
    if query.is_empty() {
        return Err(Error::EmptyInput);
    }

    Ok(OutboundEnvelope::Query {
        query: query.to_string(),
        namespace: namespace.to_string(),
    })
}

/// Builds a status refresh envelope.
#[inline]
#[must_use]
pub const fn build_status_request() -> OutboundEnvelope {
    OutboundEnvelope::StatusUpdate
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_serializes_exactly() {
        let envelope = build_query("list pods", "default").expect("valid query");
        let frame = envelope.to_frame().expect("serialize");
        assert_eq!(
            frame,
            r#"{"type":"query","query":"list pods","namespace":"default"}"#
        );
    }

    #[test]
    fn test_build_query_rejects_blank() {
        assert!(matches!(build_query("", "default"), Err(Error::EmptyInput)));
        assert!(matches!(
            build_query("   ", "default"),
            Err(Error::EmptyInput)
        ));
        assert!(matches!(
            build_query("\n\t ", "kube-system"),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_build_query_trims_text() {
        let envelope = build_query("  show services \n", "web").expect("valid query");
        assert_eq!(
            envelope,
            OutboundEnvelope::Query {
                query: "show services".into(),
                namespace: "web".into(),
            }
        );
    }

    #[test]
    fn test_status_request_serializes_exactly() {
        let frame = build_status_request().to_frame().expect("serialize");
        assert_eq!(frame, r#"{"type":"status_update"}"#);
    }

    #[test]
    fn test_kind() {
        assert_eq!(build_status_request().kind(), "status_update");
        assert_eq!(build_query("x", "y").expect("valid").kind(), "query");
    }
}
