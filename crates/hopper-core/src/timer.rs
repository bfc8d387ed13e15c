//! Deferred one-shot timers driven by the frame clock.

/// Handle returned by [`DeferredTimers::schedule`], used to cancel the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct PendingTimer<T> {
    handle: TimerHandle,
    remaining: f32,
    payload: T,
}

/// A set of pending one-shot timers carrying a payload each.
///
/// Timers are owned by whoever scheduled them; dropping the set cancels
/// everything still pending.
#[derive(Debug, Clone)]
pub struct DeferredTimers<T> {
    pending: Vec<PendingTimer<T>>,
    next_id: u64,
}

impl<T> Default for DeferredTimers<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> DeferredTimers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `payload` to fire after `delay` seconds.
    pub fn schedule(&mut self, delay: f32, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingTimer {
            handle,
            remaining: delay.max(0.0),
            payload,
        });
        handle
    }

    /// Cancels a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.handle != handle);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|t| t.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Advances all timers and returns the payloads that fired, earliest first.
    pub fn tick(&mut self, dt: f32) -> Vec<T> {
        let mut fired = Vec::new();
        let mut still_pending = Vec::with_capacity(self.pending.len());

        for mut timer in self.pending.drain(..) {
            timer.remaining -= dt;
            if timer.remaining <= 0.0 {
                fired.push(timer);
            } else {
                still_pending.push(timer);
            }
        }
        self.pending = still_pending;

        // Timers that overshot the most were due first
        fired.sort_by(|a, b| {
            a.remaining
                .partial_cmp(&b.remaining)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        fired.into_iter().map(|t| t.payload).collect()
    }
}
