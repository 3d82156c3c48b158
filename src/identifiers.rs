//! Type-safe identifiers.
//!
//! Newtype wrappers keep connection epochs and timer generations from being
//! mixed up with plain counters.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

// ============================================================================
// ConnectionEpoch
// ============================================================================

/// Identifies one `connect` call on a transport.
///
/// Every transport event carries the epoch of the channel that produced it.
/// Events whose epoch is older than the current one come from a superseded
/// channel and are ignored by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ConnectionEpoch(u64);

impl ConnectionEpoch {
    /// Epoch before any connection was made.
    pub const NONE: Self = Self(0);

    /// Returns the epoch following this one.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// TimerGeneration
// ============================================================================

/// Identifies one arming of the reconnect timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimerGeneration(u64);

impl TimerGeneration {
    /// Returns the generation following this one.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_next_is_greater() {
        let first = ConnectionEpoch::NONE.next();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.as_u64(), 2);
    }

    #[test]
    fn test_epoch_display() {
        assert_eq!(ConnectionEpoch::NONE.next().to_string(), "1");
    }

    #[test]
    fn test_generation_next_differs() {
        let g = TimerGeneration::default();
        assert_ne!(g, g.next());
    }
}
