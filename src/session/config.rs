//! Session configuration and its builder.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use groot_client::SessionConfig;
//!
//! # fn example() -> groot_client::Result<()> {
//! let config = SessionConfig::builder()
//!     .origin("http://127.0.0.1:8080")
//!     .reconnect_delay(Duration::from_secs(3))
//!     .request_status_on_open(true)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::transport::{DEFAULT_CHANNEL_PATH, channel_url};

// ============================================================================
// Constants
// ============================================================================

/// Delay before a reconnect attempt after the channel drops.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(3000);

/// Namespace used when the user has not picked one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Environment variable holding the page origin.
pub const ENV_ORIGIN: &str = "GROOT_ORIGIN";

/// Environment variable holding the reconnect delay in milliseconds.
pub const ENV_RECONNECT_MS: &str = "GROOT_RECONNECT_MS";

/// Environment variable holding the default namespace.
pub const ENV_NAMESPACE: &str = "GROOT_NAMESPACE";

// ============================================================================
// SessionConfig
// ============================================================================

/// Validated session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    origin: Url,
    channel_path: String,
    reconnect_delay: Duration,
    request_status_on_open: bool,
    default_namespace: String,
}

impl SessionConfig {
    /// Creates a new configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Builds a configuration from `GROOT_*` environment variables.
    ///
    /// # Errors
    ///
    /// Same as [`SessionBuilder::from_env`] and [`SessionBuilder::build`].
    pub fn from_env() -> Result<Self> {
        SessionBuilder::from_env()?.build()
    }

    /// Page origin the dashboard was served from.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> &Url {
        &self.origin
    }

    /// Path of the channel endpoint.
    #[inline]
    #[must_use]
    pub fn channel_path(&self) -> &str {
        &self.channel_path
    }

    /// Fixed reconnect delay.
    #[inline]
    #[must_use]
    pub const fn reconnect_delay(&self) -> Duration {
        self.reconnect_delay
    }

    /// Whether a status refresh is sent as soon as the channel opens.
    #[inline]
    #[must_use]
    pub const fn request_status_on_open(&self) -> bool {
        self.request_status_on_open
    }

    /// Namespace used when the caller passes none.
    #[inline]
    #[must_use]
    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    /// Derives the channel URL from the origin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the origin scheme is not http(s).
    pub fn channel_url(&self) -> Result<Url> {
        channel_url(&self.origin, &self.channel_path)
    }
}

// ============================================================================
// SessionBuilder
// ============================================================================

/// Builder for [`SessionConfig`].
#[derive(Debug, Default, Clone)]
pub struct SessionBuilder {
    origin: Option<String>,
    channel_path: Option<String>,
    reconnect_delay: Option<Duration>,
    request_status_on_open: bool,
    default_namespace: Option<String>,
}

impl SessionBuilder {
    /// Creates a builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder seeded from `GROOT_*` environment variables.
    ///
    /// Unset variables leave the corresponding setting at its default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `GROOT_RECONNECT_MS` is not a number.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::new();

        if let Ok(origin) = env::var(ENV_ORIGIN) {
            builder = builder.origin(origin);
        }

        if let Ok(raw) = env::var(ENV_RECONNECT_MS) {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                Error::config(format!("{ENV_RECONNECT_MS} must be milliseconds, got `{raw}`"))
            })?;
            builder = builder.reconnect_delay(Duration::from_millis(millis));
        }

        if let Ok(namespace) = env::var(ENV_NAMESPACE) {
            builder = builder.default_namespace(namespace);
        }

        Ok(builder)
    }

    /// Sets the page origin, e.g. `https://dash.example.com`.
    #[inline]
    #[must_use]
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Sets the channel path. Defaults to `/ws`.
    #[inline]
    #[must_use]
    pub fn channel_path(mut self, path: impl Into<String>) -> Self {
        self.channel_path = Some(path.into());
        self
    }

    /// Sets the reconnect delay. Defaults to 3 s.
    #[inline]
    #[must_use]
    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = Some(delay);
        self
    }

    /// Requests a status refresh every time the channel opens.
    #[inline]
    #[must_use]
    pub fn request_status_on_open(mut self, enabled: bool) -> Self {
        self.request_status_on_open = enabled;
        self
    }

    /// Sets the namespace used when none is given.
    #[inline]
    #[must_use]
    pub fn default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = Some(namespace.into());
        self
    }

    /// Validates and builds the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the origin is missing
    /// - [`Error::Url`] if the origin does not parse
    /// - [`Error::Config`] if the origin scheme is not http(s)
    /// - [`Error::Config`] if the default namespace is blank
    pub fn build(self) -> Result<SessionConfig> {
        let origin = self.validate_origin()?;
        let default_namespace = self.validate_namespace()?;

        let config = SessionConfig {
            origin,
            channel_path: self
                .channel_path
                .unwrap_or_else(|| DEFAULT_CHANNEL_PATH.to_string()),
            reconnect_delay: self.reconnect_delay.unwrap_or(DEFAULT_RECONNECT_DELAY),
            request_status_on_open: self.request_status_on_open,
            default_namespace,
        };

        // Fail on bad schemes now rather than on the first connect.
        config.channel_url()?;

        Ok(config)
    }
}

// ============================================================================
// Validation
// ============================================================================

impl SessionBuilder {
    fn validate_origin(&self) -> Result<Url> {
        let origin = self.origin.as_deref().ok_or_else(|| {
            Error::config(format!(
                "Page origin is required. Use .origin() or set {ENV_ORIGIN}.\n\
                 Example: SessionConfig::builder().origin(\"http://127.0.0.1:8080\")"
            ))
        })?;

        Ok(Url::parse(origin)?)
    }

    fn validate_namespace(&self) -> Result<String> {
        match self.default_namespace.as_deref().map(str::trim) {
            None => Ok(DEFAULT_NAMESPACE.to_string()),
            Some("") => Err(Error::config("Default namespace must not be blank")),
            Some(namespace) => Ok(namespace.to_string()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
