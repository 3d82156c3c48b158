//! Duplex channel abstraction and its WebSocket implementation.
//!
//! A [`Transport`] owns at most one live channel. Lifecycle and inbound
//! frames are reported as [`TransportEvent`]s on an unbounded tokio channel
//! supplied at construction, so the session can consume them from a single
//! dispatcher loop.
//!
//! # Event Loop
//!
//! [`WsTransport::connect`] spawns a tokio task that:
//!
//! - Performs the WebSocket handshake
//! - Forwards inbound text frames as [`Signal::MessageReceived`]
//! - Writes outbound frames queued by [`Transport::send`]
//! - Reports [`Signal::Closed`] exactly once when the channel ends

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, trace, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::ConnectionEpoch;

// ============================================================================
// Events
// ============================================================================

/// Lifecycle or data signal emitted by a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// Handshake completed; the channel accepts sends.
    Opened,

    /// A text frame arrived.
    MessageReceived(String),

    /// The channel ended.
    Closed {
        /// `true` if the close handshake completed normally.
        was_clean: bool,
    },

    /// The channel failed. Usually followed by [`Signal::Closed`].
    Errored(String),
}

/// A [`Signal`] tagged with the epoch of the channel that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportEvent {
    /// Channel the signal belongs to.
    pub epoch: ConnectionEpoch,
    /// What happened.
    pub signal: Signal,
}

/// Sending half of the event channel handed to a transport.
pub type EventSender = mpsc::UnboundedSender<TransportEvent>;

/// Receiving half of the event channel consumed by the session.
pub type EventReceiver = mpsc::UnboundedReceiver<TransportEvent>;

// ============================================================================
// Transport
// ============================================================================

/// A duplex channel to the backend.
pub trait Transport: Send {
    /// Opens a new channel to `url`.
    ///
    /// Any prior channel is closed first, so at most one channel is live.
    /// Returns immediately; the outcome is reported as [`Signal::Opened`] or
    /// [`Signal::Errored`] / [`Signal::Closed`] tagged with the returned epoch.
    fn connect(&mut self, url: &Url) -> ConnectionEpoch;

    /// Queues a text frame on the open channel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if no channel is currently open.
    fn send(&self, frame: String) -> Result<()>;

    /// Closes the current channel, if any.
    fn close(&mut self);

    /// Returns `true` while the current channel is open.
    fn is_open(&self) -> bool;
}

// ============================================================================
// ChannelCommand
// ============================================================================

/// Internal commands for the channel task.
enum ChannelCommand {
    /// Write a text frame.
    Send(String),
    /// Close the channel.
    Shutdown,
}

// ============================================================================
// WsTransport
// ============================================================================

/// Handle to the channel task of the current epoch.
struct ActiveChannel {
    command_tx: mpsc::UnboundedSender<ChannelCommand>,
    open: Arc<Mutex<bool>>,
    task: JoinHandle<()>,
}

/// [`Transport`] backed by tokio-tungstenite.
///
/// Must be used from within a tokio runtime.
pub struct WsTransport {
    /// Where channel tasks report events.
    events: EventSender,
    /// Epoch of the most recent `connect` call.
    epoch: ConnectionEpoch,
    /// Current channel, if one was started and not closed.
    active: Option<ActiveChannel>,
}

impl WsTransport {
    /// Creates a transport that reports events on `events`.
    #[must_use]
    pub fn new(events: EventSender) -> Self {
        Self {
            events,
            epoch: ConnectionEpoch::NONE,
            active: None,
        }
    }

    /// Returns the epoch of the most recent `connect` call.
    #[inline]
    #[must_use]
    pub const fn epoch(&self) -> ConnectionEpoch {
        self.epoch
    }

    /// Channel task: handshake, then pump frames until either side closes.
    async fn run_channel(
        url: Url,
        epoch: ConnectionEpoch,
        mut command_rx: mpsc::UnboundedReceiver<ChannelCommand>,
        open: Arc<Mutex<bool>>,
        events: EventSender,
    ) {
        let emit = |signal: Signal| {
            // Receiver gone means the session was dropped; nothing to report to.
            let _ = events.send(TransportEvent { epoch, signal });
        };

        let ws_stream = match connect_async(url.as_str()).await {
            Ok((stream, _response)) => stream,
            Err(e) => {
                warn!(%url, %epoch, error = %e, "WebSocket connect failed");
                let err = Error::connection(format!("{url}: {e}"));
                emit(Signal::Errored(err.to_string()));
                emit(Signal::Closed { was_clean: false });
                return;
            }
        };

        *open.lock() = true;
        info!(%url, %epoch, "WebSocket connection established");
        emit(Signal::Opened);

        let (mut ws_write, mut ws_read) = ws_stream.split();

        let was_clean = loop {
            tokio::select! {
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            trace!(%epoch, len = text.len(), "Frame received");
                            emit(Signal::MessageReceived(text.as_str().to_owned()));
                        }

                        Some(Ok(Message::Close(frame))) => {
                            debug!(%epoch, ?frame, "WebSocket closed by remote");
                            break true;
                        }

                        Some(Err(e)) => {
                            warn!(%epoch, error = %e, "WebSocket error");
                            emit(Signal::Errored(Error::from(e).to_string()));
                            break false;
                        }

                        None => {
                            debug!(%epoch, "WebSocket stream ended");
                            break false;
                        }

                        // Binary, Ping, Pong
                        _ => {}
                    }
                }

                command = command_rx.recv() => {
                    match command {
                        Some(ChannelCommand::Send(frame)) => {
                            if let Err(e) = ws_write.send(Message::Text(frame.into())).await {
                                warn!(%epoch, error = %e, "Failed to write frame");
                                emit(Signal::Errored(Error::from(e).to_string()));
                                break false;
                            }
                            trace!(%epoch, "Frame sent");
                        }

                        Some(ChannelCommand::Shutdown) | None => {
                            debug!(%epoch, "Shutdown requested");
                            let _ = ws_write.close().await;
                            break true;
                        }
                    }
                }
            }
        };

        *open.lock() = false;
        emit(Signal::Closed { was_clean });
        debug!(%epoch, was_clean, "Channel task terminated");
    }
}

impl Transport for WsTransport {
    fn connect(&mut self, url: &Url) -> ConnectionEpoch {
        self.close();

        self.epoch = self.epoch.next();
        let epoch = self.epoch;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let open = Arc::new(Mutex::new(false));

        let task = tokio::spawn(Self::run_channel(
            url.clone(),
            epoch,
            command_rx,
            Arc::clone(&open),
            self.events.clone(),
        ));

        debug!(%url, %epoch, "Connecting");

        self.active = Some(ActiveChannel {
            command_tx,
            open,
            task,
        });

        epoch
    }

    fn send(&self, frame: String) -> Result<()> {
        let Some(active) = self.active.as_ref() else {
            return Err(Error::NotOpen);
        };

        if !*active.open.lock() {
            return Err(Error::NotOpen);
        }

        active
            .command_tx
            .send(ChannelCommand::Send(frame))
            .map_err(|_| Error::NotOpen)
    }

    fn close(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        let was_open = std::mem::replace(&mut *active.open.lock(), false);

        if was_open && active.command_tx.send(ChannelCommand::Shutdown).is_ok() {
            debug!(epoch = %self.epoch, "Closing channel");
        } else {
            // Still in the handshake or already gone: nothing to close gracefully.
            active.task.abort();
            debug!(epoch = %self.epoch, "Channel task aborted");
        }
    }

    fn is_open(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| *active.open.lock())
    }
}

impl Drop for WsTransport {
    fn drop(&mut self) {
        self.close();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use tokio::net::TcpListener;
    use tokio::time::timeout;
    use tokio_tungstenite::accept_async;

    const STEP_TIMEOUT: Duration = Duration::from_secs(5);

    async fn next_event(rx: &mut EventReceiver) -> TransportEvent {
        timeout(STEP_TIMEOUT, rx.recv())
            .await
            .expect("event within timeout")
            .expect("event channel open")
    }

    /// Accepts one client and echoes every text frame back.
    async fn spawn_echo_server() -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let mut ws = accept_async(stream).await.expect("upgrade");
            while let Some(Ok(message)) = ws.next().await {
                if message.is_text() && ws.send(message).await.is_err() {
                    break;
                }
            }
        });

        Url::parse(&format!("ws://127.0.0.1:{port}/ws")).expect("url")
    }

    #[test]
    fn test_send_without_connect_is_not_open() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let transport = WsTransport::new(tx);
        assert!(!transport.is_open());
        assert!(matches!(
            transport.send("{}".into()),
            Err(Error::NotOpen)
        ));
    }

    #[tokio::test]
    async fn test_connect_send_and_receive() {
        let url = spawn_echo_server().await;
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut transport = WsTransport::new(tx);

        let epoch = transport.connect(&url);
        assert_eq!(epoch, transport.epoch());

        let opened = next_event(&mut rx).await;
        assert_eq!(opened.signal, Signal::Opened);
        assert_eq!(opened.epoch, epoch);
        assert!(transport.is_open());

        transport
            .send(r#"{"type":"status_update"}"#.into())
            .expect("send while open");

        let echoed = next_event(&mut rx).await;
        assert_eq!(
            echoed.signal,
            Signal::MessageReceived(r#"{"type":"status_update"}"#.into())
        );

        transport.close();
        assert!(!transport.is_open());
        let closed = next_event(&mut rx).await;
        assert_eq!(closed.epoch, epoch);
        assert!(matches!(closed.signal, Signal::Closed { .. }));
    }

    #[tokio::test]
    async fn test_connect_refused_reports_error_then_closed() {
        // Bind then drop to get a port nobody listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut transport = WsTransport::new(tx);
        let url = Url::parse(&format!("ws://127.0.0.1:{port}/ws")).expect("url");
        let epoch = transport.connect(&url);

        let errored = next_event(&mut rx).await;
        assert_eq!(errored.epoch, epoch);
        assert!(
            matches!(&errored.signal, Signal::Errored(detail) if detail.starts_with("Connection failed:"))
        );

        let closed = next_event(&mut rx).await;
        assert_eq!(closed.signal, Signal::Closed { was_clean: false });
        assert!(!transport.is_open());
    }

    #[tokio::test]
    async fn test_remote_close_is_clean() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let mut ws = accept_async(stream).await.expect("upgrade");
            ws.close(None).await.expect("close");
            while let Some(Ok(_)) = ws.next().await {}
        });

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut transport = WsTransport::new(tx);
        let url = Url::parse(&format!("ws://127.0.0.1:{port}/ws")).expect("url");
        let epoch = transport.connect(&url);

        assert_eq!(next_event(&mut rx).await.signal, Signal::Opened);

        let closed = next_event(&mut rx).await;
        assert_eq!(closed.epoch, epoch);
        assert_eq!(closed.signal, Signal::Closed { was_clean: true });
        assert!(!transport.is_open());
        assert!(matches!(
            transport.send("{}".into()),
            Err(Error::NotOpen)
        ));
    }

    #[tokio::test]
    async fn test_remote_drop_reports_error_then_unclean_close() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let ws = accept_async(stream).await.expect("upgrade");
            // No close handshake.
            drop(ws);
        });

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut transport = WsTransport::new(tx);
        let url = Url::parse(&format!("ws://127.0.0.1:{port}/ws")).expect("url");
        transport.connect(&url);

        assert_eq!(next_event(&mut rx).await.signal, Signal::Opened);

        let errored = next_event(&mut rx).await;
        assert!(
            matches!(&errored.signal, Signal::Errored(detail) if detail.starts_with("WebSocket error:"))
        );

        let closed = next_event(&mut rx).await;
        assert_eq!(closed.signal, Signal::Closed { was_clean: false });
        assert!(!transport.is_open());
    }

    #[tokio::test]
    async fn test_wss_attempts_tls_handshake() {
        // Plain TCP peer: the TLS handshake fails, but it must be attempted.
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            drop(stream);
        });

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut transport = WsTransport::new(tx);
        let url = Url::parse(&format!("wss://127.0.0.1:{port}/ws")).expect("url");
        transport.connect(&url);

        let errored = next_event(&mut rx).await;
        let Signal::Errored(detail) = errored.signal else {
            panic!("expected error, got {errored:?}");
        };
        assert!(!detail.contains("TLS support not compiled in"), "{detail}");

        let closed = next_event(&mut rx).await;
        assert_eq!(closed.signal, Signal::Closed { was_clean: false });
    }

    #[tokio::test]
    async fn test_reconnect_advances_epoch() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut transport = WsTransport::new(tx);
        let url = Url::parse("ws://127.0.0.1:9/ws").expect("url");

        let first = transport.connect(&url);
        let second = transport.connect(&url);
        assert!(second > first);
    }
}
