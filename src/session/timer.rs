//! Single-shot reconnect timer.
//!
//! At most one reconnect is pending at a time. Each arming gets a fresh
//! [`TimerGeneration`]; a firing is only honoured if its generation is still
//! current, so a cancel that races with an already-delivered firing wins.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::trace;

use crate::identifiers::TimerGeneration;

// ============================================================================
// ReconnectTimer
// ============================================================================

/// Owns the pending reconnect callback, if any.
#[derive(Debug)]
pub struct ReconnectTimer {
    delay: Duration,
    fired_tx: mpsc::UnboundedSender<TimerGeneration>,
    generation: TimerGeneration,
    pending: Option<JoinHandle<()>>,
}

impl ReconnectTimer {
    /// Creates an unarmed timer that reports firings on `fired_tx`.
    #[must_use]
    pub fn new(delay: Duration, fired_tx: mpsc::UnboundedSender<TimerGeneration>) -> Self {
        Self {
            delay,
            fired_tx,
            generation: TimerGeneration::default(),
            pending: None,
        }
    }

    /// Fixed delay between arming and firing.
    #[inline]
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns `true` if a reconnect is pending.
    #[inline]
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Schedules a firing after the delay.
    ///
    /// Returns `false` without scheduling if one is already pending.
    pub fn arm(&mut self) -> bool {
        if self.pending.is_some() {
            return false;
        }

        self.generation = self.generation.next();
        let generation = self.generation;
        let delay = self.delay;
        let fired_tx = self.fired_tx.clone();

        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            let _ = fired_tx.send(generation);
        }));

        trace!(?generation, ?delay, "Reconnect timer armed");
        true
    }

    /// Cancels the pending firing.
    ///
    /// Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        let Some(handle) = self.pending.take() else {
            return false;
        };

        handle.abort();
        // Invalidate a firing that may already sit in the channel.
        self.generation = self.generation.next();
        trace!("Reconnect timer canceled");
        true
    }

    /// Consumes a firing.
    ///
    /// Returns `true` if `generation` is the pending one; the timer is then
    /// unarmed. Stale firings return `false` and change nothing.
    pub fn take_if_current(&mut self, generation: TimerGeneration) -> bool {
        if self.pending.is_none() || generation != self.generation {
            return false;
        }
        self.pending = None;
        true
    }
}

impl Drop for ReconnectTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
