//! Test doubles for the transport and rendering seams.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use url::Url;

use crate::error::{Error, Result};
use crate::identifiers::ConnectionEpoch;
use crate::transport::{EventReceiver, EventSender, Signal, Transport, TransportEvent};
use crate::view::{ChatViewModel, StatusViewModel, ViewSink};

// ============================================================================
// RecordingSink
// ============================================================================

/// Something the sink was asked to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    User(String),
    Chat(ChatViewModel),
    Status(StatusViewModel),
    Error(String),
}

/// Sink that remembers every call, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub rendered: Vec<Rendered>,
}

impl RecordingSink {
    pub fn statuses(&self) -> Vec<&StatusViewModel> {
        self.rendered
            .iter()
            .filter_map(|r| match r {
                Rendered::Status(view) => Some(view),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.rendered
            .iter()
            .filter_map(|r| match r {
                Rendered::Error(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl ViewSink for RecordingSink {
    fn chat_entry(&mut self, entry: ChatViewModel) {
        self.rendered.push(Rendered::Chat(entry));
    }

    fn status_view(&mut self, view: StatusViewModel) {
        self.rendered.push(Rendered::Status(view));
    }

    fn error_message(&mut self, message: &str) {
        self.rendered.push(Rendered::Error(message.to_string()));
    }

    fn user_message(&mut self, text: &str) {
        self.rendered.push(Rendered::User(text.to_string()));
    }
}

// ============================================================================
// ScriptedTransport
// ============================================================================

/// What the session did to the transport.
#[derive(Debug, Default)]
pub struct TransportLog {
    pub connects: Vec<Url>,
    pub sent: Vec<String>,
    pub closes: usize,
    pub open: bool,
    pub epoch: ConnectionEpoch,
}

/// Transport driven by the test: nothing touches the network, and lifecycle
/// signals are injected through [`TransportHandle`].
pub struct ScriptedTransport {
    log: Arc<Mutex<TransportLog>>,
}

impl Transport for ScriptedTransport {
    fn connect(&mut self, url: &Url) -> ConnectionEpoch {
        let mut log = self.log.lock();
        if log.open {
            log.closes += 1;
        }
        log.open = false;
        log.epoch = log.epoch.next();
        log.connects.push(url.clone());
        log.epoch
    }

    fn send(&self, frame: String) -> Result<()> {
        let mut log = self.log.lock();
        if !log.open {
            return Err(Error::NotOpen);
        }
        log.sent.push(frame);
        Ok(())
    }

    fn close(&mut self) {
        let mut log = self.log.lock();
        log.open = false;
        log.closes += 1;
    }

    fn is_open(&self) -> bool {
        self.log.lock().open
    }
}

/// Test-side handle: inspects the log and injects events.
#[derive(Clone)]
pub struct TransportHandle {
    pub log: Arc<Mutex<TransportLog>>,
    events: EventSender,
}

impl TransportHandle {
    /// Emits a signal for the current epoch.
    pub fn emit(&self, signal: Signal) {
        let epoch = self.log.lock().epoch;
        self.emit_for(epoch, signal);
    }

    /// Emits a signal for an explicit epoch.
    pub fn emit_for(&self, epoch: ConnectionEpoch, signal: Signal) {
        {
            let mut log = self.log.lock();
            if epoch == log.epoch {
                match signal {
                    Signal::Opened => log.open = true,
                    Signal::Closed { .. } | Signal::Errored(_) => log.open = false,
                    Signal::MessageReceived(_) => {}
                }
            }
        }
        self.events
            .send(TransportEvent { epoch, signal })
            .expect("session alive");
    }

    pub fn connect_count(&self) -> usize {
        self.log.lock().connects.len()
    }

    pub fn sent(&self) -> Vec<String> {
        self.log.lock().sent.clone()
    }

    pub fn epoch(&self) -> ConnectionEpoch {
        self.log.lock().epoch
    }
}

/// Builds a scripted transport, its handle, and the session's event receiver.
pub fn scripted_transport() -> (ScriptedTransport, TransportHandle, EventReceiver) {
    let (events, rx) = mpsc::unbounded_channel();
    let log = Arc::new(Mutex::new(TransportLog::default()));
    let transport = ScriptedTransport {
        log: Arc::clone(&log),
    };
    (transport, TransportHandle { log, events }, rx)
}
