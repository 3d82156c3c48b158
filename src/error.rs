//! Error types for the dashboard client.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use groot_client::{Result, build_query};
//!
//! fn example() -> Result<String> {
//!     let envelope = build_query("list pods", "default")?;
//!     envelope.to_frame()
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Connection | [`Error::NotOpen`], [`Error::Connection`] |
//! | Protocol | [`Error::MalformedPayload`], [`Error::EmptyInput`] |
//! | Backend API | [`Error::Api`] |
//! | External | [`Error::Json`], [`Error::WebSocket`], [`Error::Url`], [`Error::Http`] |
//!
//! None of these are fatal: the worst outcome for a session is a channel
//! that stays down while the reconnect loop keeps retrying.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when session or endpoint configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// Send attempted while the channel is not open.
    ///
    /// Recoverable: the session starts a reconnect when it sees this.
    #[error("WebSocket connection is not open")]
    NotOpen,

    /// WebSocket connection failed.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Inbound frame could not be parsed or carried an unusable body.
    #[error("Malformed payload: {message}")]
    MalformedPayload {
        /// Description of what was wrong with the frame.
        message: String,
    },

    /// User submitted blank text.
    #[error("Empty input")]
    EmptyInput,

    // ========================================================================
    // Backend API Errors
    // ========================================================================
    /// Backend answered an HTTP request with an `{"error": ...}` body.
    #[error("Backend error: {message}")]
    Api {
        /// Message reported by the backend.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// URL parse error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a malformed payload error.
    #[inline]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }

    /// Creates a backend API error.
    #[inline]
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error is recoverable.
    ///
    /// Recoverable errors leave the session usable: the action is either
    /// retried by the reconnect loop or simply ignored.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotOpen
                | Self::Connection { .. }
                | Self::WebSocket(_)
                | Self::MalformedPayload { .. }
                | Self::EmptyInput
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
