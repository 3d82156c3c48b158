//! Page session: connection state machine and dispatcher loop.
//!
//! A [`Session`] owns the transport, the reconnect timer and the router.
//! All of its state is mutated from one place, the dispatcher loop, which
//! handles each event to completion before taking the next.
//!
//! # State Machine
//!
//! ```text
//! Idle ──init()──► Connecting ──Opened──► Open
//! Open ──Closed/Errored──► Closed ──(delay)──► Reconnecting ──Opened──► Open
//! Closed/Connecting/Reconnecting ──send()──► Reconnecting   (immediate)
//! any ──teardown()──► Idle
//! ```
//!
//! The reconnect delay is fixed and attempts are unbounded; the loop keeps
//! retrying until teardown.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::error::{Error, Result};
use crate::identifiers::{ConnectionEpoch, TimerGeneration};
use crate::protocol::{OutboundEnvelope, build_query, build_status_request};
use crate::router::{RouteOutcome, Router};
use crate::transport::{EventReceiver, Signal, Transport, TransportEvent, WsTransport};
use crate::view::{ViewSink, format_error};

use super::config::SessionConfig;
use super::timer::ReconnectTimer;

// ============================================================================
// Constants
// ============================================================================

/// Transcript notice when a query is sent on a closed channel.
pub const NOT_OPEN_NOTICE: &str = "WebSocket connection is not open. Trying to reconnect...";

// ============================================================================
// ConnectionState
// ============================================================================

/// Connection state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Not initialized, or torn down.
    #[default]
    Idle,
    /// First connection attempt in progress.
    Connecting,
    /// Channel open; sends are accepted.
    Open,
    /// Channel down; a reconnect is scheduled.
    Closed,
    /// Supervisor-initiated attempt in progress.
    Reconnecting,
}

impl ConnectionState {
    /// Returns `true` while an attempt is in progress.
    #[inline]
    #[must_use]
    pub const fn is_connecting(self) -> bool {
        matches!(self, Self::Connecting | Self::Reconnecting)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Reconnecting => "reconnecting",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Events and Intents
// ============================================================================

/// Input to the dispatcher loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Something happened on a channel.
    Transport(TransportEvent),
    /// The reconnect timer fired.
    ReconnectDue(TimerGeneration),
}

/// UI action fed into [`Session::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// User submitted a chat query.
    Query {
        /// Raw input text.
        text: String,
        /// Selected namespace; `None` uses the configured default.
        namespace: Option<String>,
    },
    /// User asked for fresh status.
    RefreshStatus,
    /// Page is going away.
    Teardown,
}

// ============================================================================
// Session
// ============================================================================

/// One page session against the backend.
pub struct Session<T, S> {
    config: SessionConfig,
    transport: T,
    events: EventReceiver,
    timer: ReconnectTimer,
    timer_rx: mpsc::UnboundedReceiver<TimerGeneration>,
    router: Router<S>,
    state: ConnectionState,
    epoch: ConnectionEpoch,
}

impl<T, S> fmt::Debug for Session<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("epoch", &self.epoch)
            .field("reconnect_pending", &self.timer.is_armed())
            .finish_non_exhaustive()
    }
}

impl<S: ViewSink> Session<WsTransport, S> {
    /// Creates a session over a real WebSocket transport.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn websocket(config: SessionConfig, sink: S) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self::new(config, WsTransport::new(events_tx), events_rx, sink)
    }
}

// ============================================================================
// Session - Lifecycle
// ============================================================================

impl<T: Transport, S: ViewSink> Session<T, S> {
    /// Creates an idle session.
    ///
    /// `events` must receive the events emitted by `transport`.
    #[must_use]
    pub fn new(config: SessionConfig, transport: T, events: EventReceiver, sink: S) -> Self {
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let timer = ReconnectTimer::new(config.reconnect_delay(), timer_tx);

        Self {
            config,
            transport,
            events,
            timer,
            timer_rx,
            router: Router::new(sink),
            state: ConnectionState::Idle,
            epoch: ConnectionEpoch::NONE,
        }
    }

    /// Starts the first connection attempt.
    ///
    /// Calling it again restarts the connection from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the channel URL cannot be derived.
    pub fn init(&mut self) -> Result<()> {
        self.start_attempt(ConnectionState::Connecting)
    }

    /// Cancels any pending reconnect, closes the channel, and goes idle.
    pub fn teardown(&mut self) {
        let canceled = self.timer.cancel();
        self.transport.close();
        self.state = ConnectionState::Idle;
        info!(reconnect_canceled = canceled, "Session torn down");
    }

    /// Current connection state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Returns `true` if a reconnect is scheduled.
    #[inline]
    #[must_use]
    pub const fn reconnect_pending(&self) -> bool {
        self.timer.is_armed()
    }

    /// Session configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Rendering collaborator.
    #[inline]
    #[must_use]
    pub const fn sink(&self) -> &S {
        self.router.sink()
    }

    /// Rendering collaborator, mutably.
    #[inline]
    pub fn sink_mut(&mut self) -> &mut S {
        self.router.sink_mut()
    }

    /// Cancels the timer and opens a fresh channel.
    fn start_attempt(&mut self, next: ConnectionState) -> Result<()> {
        self.timer.cancel();
        let url = self.config.channel_url()?;
        self.epoch = self.transport.connect(&url);
        self.state = next;
        info!(%url, epoch = %self.epoch, state = %self.state, "Connection attempt started");
        Ok(())
    }

    /// Starts a reconnect attempt right away.
    fn reconnect_now(&mut self) {
        if let Err(e) = self.start_attempt(ConnectionState::Reconnecting) {
            warn!(error = %e, "Reconnect attempt could not start");
        }
    }
}

// ============================================================================
// Session - Outbound
// ============================================================================

impl<T: Transport, S: ViewSink> Session<T, S> {
    /// Sends an envelope on the open channel.
    ///
    /// If the channel is not open, an immediate reconnect is started (unless
    /// the session is idle) and the failure is reported to the caller.
    ///
    /// # Errors
    ///
    /// - [`Error::NotOpen`] if the channel is not open
    /// - [`Error::Json`] if the envelope cannot be serialized
    pub fn send(&mut self, envelope: &OutboundEnvelope) -> Result<()> {
        if self.state == ConnectionState::Open && self.transport.is_open() {
            match self.transport.send(envelope.to_frame()?) {
                Ok(()) => {
                    debug!(kind = envelope.kind(), "Envelope sent");
                    return Ok(());
                }
                Err(Error::NotOpen) => {}
                Err(e) => return Err(e),
            }
        }

        warn!(kind = envelope.kind(), state = %self.state, "Send on a channel that is not open");

        if self.state != ConnectionState::Idle {
            self.reconnect_now();
        }

        Err(Error::NotOpen)
    }

    /// Submits a chat query.
    ///
    /// The trimmed text is echoed to the sink before sending. If the channel
    /// is not open the sink also receives [`NOT_OPEN_NOTICE`].
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] if `text` is blank; nothing is echoed or sent
    /// - [`Error::NotOpen`] if the channel is not open
    pub fn submit_query(&mut self, text: &str, namespace: Option<&str>) -> Result<()> {
        let namespace = namespace.unwrap_or_else(|| self.config.default_namespace());
        let envelope = build_query(text, namespace)?;

        if let OutboundEnvelope::Query { query, .. } = &envelope {
            self.router.sink_mut().user_message(query);
        }

        let result = self.send(&envelope);
        if matches!(result, Err(Error::NotOpen)) {
            self.router
                .sink_mut()
                .error_message(&format_error(NOT_OPEN_NOTICE));
        }
        result
    }

    /// Requests a fresh status snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the channel is not open. Nothing is shown
    /// to the user in that case.
    pub fn refresh_status(&mut self) -> Result<()> {
        self.send(&build_status_request())
    }
}

// ============================================================================
// Session - Dispatcher
// ============================================================================

impl<T: Transport, S: ViewSink> Session<T, S> {
    /// Waits for the next transport event or timer firing.
    ///
    /// Returns `None` once both sources are exhausted.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        tokio::select! {
            biased;

            Some(event) = self.events.recv() => Some(SessionEvent::Transport(event)),
            Some(generation) = self.timer_rx.recv() => Some(SessionEvent::ReconnectDue(generation)),
            else => None,
        }
    }

    /// Handles every event that is already queued, without waiting.
    ///
    /// Returns the number of events handled.
    pub fn drain_pending(&mut self) -> usize {
        let mut handled = 0;
        loop {
            if let Ok(event) = self.events.try_recv() {
                self.handle(SessionEvent::Transport(event));
            } else if let Ok(generation) = self.timer_rx.try_recv() {
                self.handle(SessionEvent::ReconnectDue(generation));
            } else {
                return handled;
            }
            handled += 1;
        }
    }

    /// Handles one event to completion.
    pub fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Transport(event) => self.handle_transport_event(event),
            SessionEvent::ReconnectDue(generation) => self.handle_reconnect_due(generation),
        }
    }

    /// Runs the dispatcher loop until teardown.
    ///
    /// Connects, then processes transport events, reconnect firings and UI
    /// intents in arrival order. Returns after [`Intent::Teardown`] or when
    /// the intent channel closes; the session is torn down either way.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the first attempt cannot start.
    pub async fn run(&mut self, mut intents: mpsc::UnboundedReceiver<Intent>) -> Result<()> {
        self.init()?;

        loop {
            // Channel events first, so intents see the state they caused.
            tokio::select! {
                biased;

                event = self.next_event() => match event {
                    Some(event) => self.handle(event),
                    None => {
                        debug!("Event sources closed");
                        break;
                    }
                },

                intent = intents.recv() => match intent {
                    Some(Intent::Query { text, namespace }) => {
                        match self.submit_query(&text, namespace.as_deref()) {
                            Err(e) if e.is_recoverable() => debug!(error = %e, "Query not sent"),
                            Err(e) => warn!(error = %e, "Query failed"),
                            Ok(()) => {}
                        }
                    }
                    Some(Intent::RefreshStatus) => {
                        match self.refresh_status() {
                            Err(e) if e.is_recoverable() => debug!(error = %e, "Status refresh not sent"),
                            Err(e) => warn!(error = %e, "Status refresh failed"),
                            Ok(()) => {}
                        }
                    }
                    Some(Intent::Teardown) | None => break,
                },
            }
        }

        self.teardown();
        Ok(())
    }

    fn handle_transport_event(&mut self, event: TransportEvent) {
        if self.state == ConnectionState::Idle {
            trace!(epoch = %event.epoch, "Event ignored while idle");
            return;
        }

        if event.epoch != self.epoch {
            debug!(epoch = %event.epoch, current = %self.epoch, "Stale channel event ignored");
            return;
        }

        match event.signal {
            Signal::Opened => {
                self.state = ConnectionState::Open;
                info!(epoch = %self.epoch, "Channel open");

                if self.config.request_status_on_open()
                    && let Err(e) = self.refresh_status()
                {
                    warn!(error = %e, "Initial status request failed");
                }
            }

            Signal::MessageReceived(text) => {
                if self.router.route(&text) == RouteOutcome::Dropped {
                    trace!("Frame dropped by router");
                }
            }

            Signal::Closed { was_clean } => {
                info!(epoch = %self.epoch, was_clean, "Channel closed");
                self.channel_down();
            }

            Signal::Errored(detail) => {
                warn!(epoch = %self.epoch, %detail, "Channel error");
                self.channel_down();
            }
        }
    }

    fn channel_down(&mut self) {
        self.state = ConnectionState::Closed;

        if self.timer.arm() {
            info!(delay = ?self.timer.delay(), "Reconnect scheduled");
        }
    }

    fn handle_reconnect_due(&mut self, generation: TimerGeneration) {
        if !self.timer.take_if_current(generation) {
            trace!(?generation, "Stale reconnect firing ignored");
            return;
        }

        if self.state == ConnectionState::Idle {
            return;
        }

        self.reconnect_now();
    }
}

// ============================================================================
// Tests
// ============================================================================
