//! Edit-quiescence debouncing.
//!
//! A [`Debouncer`] is a restartable one-shot deadline keyed by an edit generation. Every
//! [`Debouncer::schedule`] bumps the generation and pushes the deadline out to
//! `now + interval`; the previous deadline is dropped, never queued. Time is passed in by the
//! caller, so the host's event loop decides when to [`Debouncer::poll`].

use std::time::{Duration, Instant};

/// Reference quiescence interval.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy)]
struct Pending {
    deadline: Instant,
    generation: u64,
}

/// A restartable one-shot timer.
#[derive(Debug, Clone)]
pub struct Debouncer {
    interval: Duration,
    generation: u64,
    pending: Option<Pending>,
}

impl Debouncer {
    /// Create an idle debouncer.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            generation: 0,
            pending: None,
        }
    }

    /// Quiescence interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Latest edit generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` while a deadline is armed.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The armed deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|pending| pending.deadline)
    }

    /// Record an edit at `now` and restart the deadline. Returns the new generation.
    pub fn schedule(&mut self, now: Instant) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.pending = Some(Pending {
            deadline: now + self.interval,
            generation: self.generation,
        });
        self.generation
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Returns `true` if `generation` is the latest one.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Claim the armed deadline for `generation` and disarm it.
    ///
    /// Hosts that run their own timers capture the generation from [`Self::schedule`] and
    /// claim it here when the timer fires.
    ///
    /// Returns `false` if nothing is armed for that generation (superseded, already fired,
    /// or cancelled), so each generation fires at most once.
    pub fn take(&mut self, generation: u64) -> bool {
        match self.pending {
            Some(pending) if pending.generation == generation => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Fire if the deadline has passed. Returns the generation that fired.
    pub fn poll(&mut self, now: Instant) -> Option<u64> {
        let pending = self.pending?;
        if now < pending.deadline {
            return None;
        }
        self.pending = None;

        if !self.is_current(pending.generation) {
            tracing::debug!(
                "debounce: dropping stale generation {} (current {})",
                pending.generation,
                self.generation
            );
            return None;
        }
        Some(pending.generation)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
