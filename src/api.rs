//! Backend HTTP API used alongside the channel.
//!
//! Only the namespace listing is consumed here; it feeds the namespace
//! selector on the chat page and the namespace table on the status page.

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::view::{NamespaceRow, namespace_rows};

// ============================================================================
// Constants
// ============================================================================

/// Path of the namespace listing endpoint.
pub const NAMESPACES_PATH: &str = "/api/namespaces";

// ============================================================================
// Wire Types
// ============================================================================

/// `{"namespaces": [...]}` or `{"error": "..."}`.
#[derive(Debug, Default, Deserialize)]
struct NamespacesBody {
    #[serde(default)]
    namespaces: Option<Vec<String>>,
    #[serde(default)]
    error: Option<String>,
}

impl NamespacesBody {
    fn into_result(self) -> Result<Vec<String>> {
        match (self.namespaces, self.error) {
            (Some(namespaces), _) => Ok(namespaces),
            (None, Some(message)) => Err(Error::api(message)),
            (None, None) => Ok(Vec::new()),
        }
    }
}

// ============================================================================
// NamespaceClient
// ============================================================================

/// Client for `GET /api/namespaces`.
#[derive(Debug, Clone)]
pub struct NamespaceClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl NamespaceClient {
    /// Creates a client for the backend serving `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`] if the endpoint cannot be joined to `origin`.
    pub fn new(origin: &Url) -> Result<Self> {
        Self::with_client(origin, reqwest::Client::new())
    }

    /// Creates a client reusing a configured HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`] if the endpoint cannot be joined to `origin`.
    pub fn with_client(origin: &Url, http: reqwest::Client) -> Result<Self> {
        Ok(Self {
            http,
            endpoint: origin.join(NAMESPACES_PATH)?,
        })
    }

    /// Endpoint this client queries.
    #[inline]
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetches namespace names in backend order.
    ///
    /// # Errors
    ///
    /// - [`Error::Http`] on transport failure or a non-success status
    /// - [`Error::Api`] if the backend answered with an `error` body
    pub async fn list(&self) -> Result<Vec<String>> {
        let body: NamespacesBody = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let namespaces = body.into_result()?;
        debug!(count = namespaces.len(), "Namespaces loaded");
        Ok(namespaces)
    }

    /// Fetches namespaces as table rows.
    ///
    /// # Errors
    ///
    /// Same as [`NamespaceClient::list`].
    pub async fn rows(&self) -> Result<Vec<NamespaceRow>> {
        Ok(namespace_rows(&self.list().await?))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one HTTP response with `body`, then closes.
    async fn serve_once(body: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.expect("read");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.expect("write");
            stream.shutdown().await.expect("shutdown");
        });

        Url::parse(&format!("http://127.0.0.1:{port}/status")).expect("url")
    }

    fn local_client(origin: &Url) -> NamespaceClient {
        let http = reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("http client");
        NamespaceClient::with_client(origin, http).expect("client")
    }

    #[test]
    fn test_endpoint_is_joined_to_origin() {
        let origin = Url::parse("https://dash.example.com/status").expect("url");
        let client = NamespaceClient::new(&origin).expect("client");
        assert_eq!(
            client.endpoint().as_str(),
            "https://dash.example.com/api/namespaces"
        );
    }

    #[test]
    fn test_body_with_namespaces() {
        let body: NamespacesBody =
            serde_json::from_str(r#"{"namespaces":["default","web"]}"#).expect("parse");
        assert_eq!(body.into_result().expect("ok"), vec!["default", "web"]);
    }

    #[test]
    fn test_body_with_error() {
        let body: NamespacesBody =
            serde_json::from_str(r#"{"error":"forbidden"}"#).expect("parse");
        let err = body.into_result().unwrap_err();
        assert!(matches!(err, Error::Api { ref message } if message == "forbidden"));
    }

    #[test]
    fn test_empty_body() {
        let body: NamespacesBody = serde_json::from_str("{}").expect("parse");
        assert!(body.into_result().expect("ok").is_empty());
    }

    #[tokio::test]
    async fn test_rows_from_live_endpoint() {
        let origin = serve_once(r#"{"namespaces":["default","kube-system"]}"#).await;
        let client = local_client(&origin);

        let rows = client.rows().await.expect("rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].name, "kube-system");
        assert_eq!(rows[1].status, "Active");
        assert_eq!(rows[1].age, "Unknown");
    }

    #[tokio::test]
    async fn test_https_origin_attempts_tls() {
        // Plain TCP peer: the TLS handshake fails, but it must be attempted.
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            drop(stream);
        });

        let origin = Url::parse(&format!("https://127.0.0.1:{port}/")).expect("url");
        let err = local_client(&origin).list().await.unwrap_err();

        let Error::Http(inner) = &err else {
            panic!("expected http error, got {err:?}");
        };
        assert!(!format!("{inner:?}").contains("scheme is not http"), "{inner:?}");
    }

    #[tokio::test]
    async fn test_live_error_body() {
        let origin = serve_once(r#"{"error":"cluster unreachable"}"#).await;
        let client = local_client(&origin);
        assert!(matches!(client.list().await, Err(Error::Api { .. })));
    }
}
