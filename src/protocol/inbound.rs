//! Inbound envelopes.
//!
//! Every text frame from the backend carries a `type` discriminator.
//! Known discriminators are parsed into typed payloads; anything else becomes
//! [`InboundEnvelope::Unknown`] so the caller can log and drop it.
//!
//! | `type` | Body field | Payload |
//! |--------|------------|---------|
//! | `response` | `response` | [`AssistantResponse`] |
//! | `status_update` | `status` | [`StatusSnapshot`] |
//! | `error` | `error` | `String` |

// ============================================================================
// Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, from_str, from_value};

use crate::error::{Error, Result};

// ============================================================================
// Payload Types
// ============================================================================

/// Reads an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Reply produced by the backend assistant for a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantResponse {
    /// Markdown answer. Absent when the assistant failed to answer.
    #[serde(default)]
    pub ai_response: Option<String>,

    /// Suggested commands, in backend order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub commands: Vec<SuggestedCommand>,

    /// Follow-up questions, in backend order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub follow_up_questions: Vec<String>,
}

/// A command the assistant suggests running.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedCommand {
    /// Command line, e.g. `kubectl get pods -n default`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub command: String,

    /// Human readable explanation.
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// Aggregate cluster counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Number of pods.
    #[serde(default, deserialize_with = "null_as_default")]
    pub pod_count: u64,

    /// Number of deployments.
    #[serde(default, deserialize_with = "null_as_default")]
    pub deployment_count: u64,

    /// Number of services.
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_count: u64,

    /// Pod phase label to count.
    #[serde(default, deserialize_with = "null_as_default")]
    pub pod_statuses: BTreeMap<String, u64>,
}

// ============================================================================
// InboundEnvelope
// ============================================================================

/// A message from the backend, keyed by its `type` discriminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEnvelope {
    /// Assistant answer to a query.
    Response(AssistantResponse),

    /// Cluster status snapshot.
    StatusUpdate(StatusSnapshot),

    /// Backend-reported failure.
    Error(String),

    /// Discriminator not known to this client.
    Unknown {
        /// The unrecognized `type` value.
        kind: String,
    },
}

/// Wire shape for the known discriminators.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum KnownFrame {
    Response { response: AssistantResponse },
    StatusUpdate { status: StatusSnapshot },
    Error { error: String },
}

impl From<KnownFrame> for InboundEnvelope {
    fn from(frame: KnownFrame) -> Self {
        match frame {
            KnownFrame::Response { response } => Self::Response(response),
            KnownFrame::StatusUpdate { status } => Self::StatusUpdate(status),
            KnownFrame::Error { error } => Self::Error(error),
        }
    }
}

impl InboundEnvelope {
    /// Parses a raw text frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedPayload`] if the frame is not a JSON object,
    /// has no string `type`, or a known `type` has a body of the wrong shape.
    /// An unrecognized `type` is not an error: it yields [`Self::Unknown`].
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value =
            from_str(text).map_err(|e| Error::malformed(format!("invalid JSON: {e}")))?;

        let kind = match value.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(_) => return Err(Error::malformed("`type` is not a string")),
            None => return Err(Error::malformed("missing `type`")),
        };

        match kind.as_str() {
            "response" | "status_update" | "error" => from_value::<KnownFrame>(value)
                .map(Self::from)
                .map_err(|e| Error::malformed(format!("invalid `{kind}` body: {e}"))),
            _ => Ok(Self::Unknown { kind }),
        }
    }

    /// Returns the wire discriminator.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Response(_) => "response",
            Self::StatusUpdate(_) => "status_update",
            Self::Error(_) => "error",
            Self::Unknown { kind } => kind,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
