use std::time::{Duration, Instant};

/// A cancellable scheduled task that fires once its input has gone quiet.
///
/// Every [`schedule`](Debouncer::schedule) cancels the pending value and
/// restarts the delay, so a burst of calls fires exactly once, carrying the
/// last value, `delay` after the final call. Time is supplied by the caller.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Scheduled<T>>,
}

#[derive(Debug)]
struct Scheduled<T> {
    value: T,
    due: Instant,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule `value` to fire at `now + delay`.
    ///
    /// Returns `true` if a pending value was cancelled.
    pub fn schedule(&mut self, value: T, now: Instant) -> bool {
        let cancelled = self.pending.is_some();
        self.pending = Some(Scheduled {
            value,
            due: now + self.delay,
        });
        cancelled
    }

    /// Drop the pending value without firing it.
    #[cfg(test)]
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|s| s.value)
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.as_ref().is_some_and(|s| now >= s.due) {
            self.pending.take().map(|s| s.value)
        } else {
            None
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|s| s.due)
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
