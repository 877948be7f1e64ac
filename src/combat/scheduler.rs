//! Deferred opponent turns.
//!
//! The front-end schedules the opponent's retaliation a short delay
//! after the player acts so the exchange reads as two events rather
//! than one. The pending turn is keyed by session id; if the battle it
//! belongs to ends before the delay elapses, the turn is discarded
//! instead of landing on whatever battle is active by then.

use std::time::{Duration, Instant};

use crate::combat::session::SessionId;

#[derive(Debug, Clone, Copy)]
struct PendingTurn {
    session: SessionId,
    due: Instant,
}

#[derive(Debug, Default)]
pub struct TurnScheduler {
    pending: Option<PendingTurn>,
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules an opponent turn for `session`, replacing any pending
    /// one. At most one turn is ever in flight.
    pub fn schedule(&mut self, session: SessionId, delay: Duration) {
        self.pending = Some(PendingTurn {
            session,
            due: Instant::now() + delay,
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns true when a due turn belongs to the currently active
    /// session. A due turn for any other session is dropped silently
    /// apart from a log line.
    pub fn poll(&mut self, now: Instant, active: Option<SessionId>) -> bool {
        let Some(pending) = self.pending else {
            return false;
        };
        if now < pending.due {
            return false;
        }

        self.pending = None;

        match active {
            Some(session) if session == pending.session => true,
            _ => {
                tracing::warn!(
                    session = ?pending.session,
                    "discarding opponent turn for an ended battle"
                );
                false
            }
        }
    }
}
