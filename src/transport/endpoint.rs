//! Channel endpoint derivation.
//!
//! The WebSocket URL mirrors the transport security of the page origin:
//! `https` pages talk to `wss`, `http` pages talk to `ws`. The URL is
//! computed on every connect call from the configured origin.

// ============================================================================
// Imports
// ============================================================================

use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default path of the channel endpoint.
pub const DEFAULT_CHANNEL_PATH: &str = "/ws";

// ============================================================================
// Functions
// ============================================================================

/// Derives the WebSocket endpoint for a page origin.
///
/// Host, port and credentials of `origin` are kept; its path, query and
/// fragment are replaced by `path`.
///
/// # Errors
///
/// Returns [`Error::Config`] if the origin scheme is neither `http` nor
/// `https`, or if the origin has no host.
///
/// # Example
///
/// ```ignore
/// let origin = Url::parse("https://dash.example.com:8443/status")?;
/// let ws = channel_url(&origin, "/ws")?;
/// assert_eq!(ws.as_str(), "wss://dash.example.com:8443/ws");
/// ```
pub fn channel_url(origin: &Url, path: &str) -> Result<Url> {
    let scheme = match origin.scheme() {
        "https" => "wss",
        "http" => "ws",
        other => {
            return Err(Error::config(format!(
                "Unsupported page scheme `{other}`, expected http or https"
            )));
        }
    };

    let host = origin
        .host_str()
        .ok_or_else(|| Error::config(format!("Page origin `{origin}` has no host")))?;

    let authority = match origin.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    Ok(Url::parse(&format!("{scheme}://{authority}{path}"))?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).expect("valid url")
    }

    #[test]
    fn test_http_maps_to_ws() {
        let ws = channel_url(&url("http://localhost:8000/"), DEFAULT_CHANNEL_PATH)
            .expect("derive");
        assert_eq!(ws.as_str(), "ws://localhost:8000/ws");
    }

    #[test]
    fn test_https_maps_to_wss() {
        let ws = channel_url(&url("https://dash.example.com/status?x=1#top"), "/ws")
            .expect("derive");
        assert_eq!(ws.as_str(), "wss://dash.example.com/ws");
    }

    #[test]
    fn test_keeps_explicit_port() {
        let ws = channel_url(&url("https://dash.example.com:8443"), "/ws").expect("derive");
        assert_eq!(ws.port(), Some(8443));
        assert_eq!(ws.scheme(), "wss");
    }

    #[test]
    fn test_path_without_leading_slash() {
        let ws = channel_url(&url("http://127.0.0.1:8080"), "socket").expect("derive");
        assert_eq!(ws.path(), "/socket");
    }

    #[test]
    fn test_ipv6_host() {
        let ws = channel_url(&url("http://[::1]:8080/"), "/ws").expect("derive");
        assert_eq!(ws.as_str(), "ws://[::1]:8080/ws");
    }

    #[test]
    fn test_rejects_other_schemes() {
        let err = channel_url(&url("ftp://example.com"), "/ws").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
