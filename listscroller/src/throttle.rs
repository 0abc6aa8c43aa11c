/// Coalesces bursts of events into at most one delivery per interval.
///
/// The first event arms a deadline `interval_ms` in the future; later events only replace the
/// pending value. [`Throttle::poll`] hands out the most recent value once the deadline passed.
/// Intermediate values are dropped, never queued.
#[derive(Clone, Debug)]
pub struct Throttle<T> {
    interval_ms: u64,
    pending: Option<T>,
    due_ms: Option<u64>,
}

impl<T> Throttle<T> {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            pending: None,
            due_ms: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn set_interval_ms(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    pub fn push(&mut self, value: T, now_ms: u64) {
        self.pending = Some(value);
        if self.due_ms.is_none() {
            self.due_ms = Some(now_ms.saturating_add(self.interval_ms));
        }
    }

    /// Returns the latest pushed value if its deadline has passed.
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        let due = self.due_ms?;
        if now_ms < due {
            return None;
        }
        self.due_ms = None;
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes available, if any.
    pub fn due_ms(&self) -> Option<u64> {
        self.due_ms
    }

    pub fn clear(&mut self) {
        self.pending = None;
        self.due_ms = None;
    }
}
