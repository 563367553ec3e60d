//! Scheduled tasks driven by an explicit clock
//!
//! Nothing here spawns threads. Owners poll with the current `Instant` on
//! every tick and dropping the owner cancels the task.

use std::time::{Duration, Instant};

/// Fires once per interval while alive
#[derive(Debug, Clone)]
pub struct RepeatingTimer {
    interval: Duration,
    last_fired: Instant,
}

impl RepeatingTimer {
    pub fn start(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_fired: now,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_due(&self) -> Instant {
        self.last_fired + self.interval
    }

    /// Returns true when an interval has elapsed; the next one is measured
    /// from `now` so a stalled loop does not fire a burst of catch-up ticks.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now >= self.next_due() {
            self.last_fired = now;
            true
        } else {
            false
        }
    }

    /// Fraction of the current interval that has elapsed (0.0 - 1.0)
    pub fn progress(&self, now: Instant) -> f32 {
        let total = self.interval.as_secs_f32();
        if total <= 0.0 {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.last_fired).as_secs_f32();
        (elapsed / total).min(1.0)
    }
}

/// Last-write-wins delay: each `schedule` replaces the pending value
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn due_at(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    /// Take the value once its quiet period has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, due)) if now >= *due => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    /// Take the pending value immediately
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_repeating_timer() {
        let t0 = Instant::now();
        let mut timer = RepeatingTimer::start(3000 * MS, t0);

        assert!(!timer.poll(t0 + 2999 * MS));
        assert!(timer.poll(t0 + 3000 * MS));
        assert!(!timer.poll(t0 + 3001 * MS));
        assert!(timer.poll(t0 + 6000 * MS));
    }

    #[test]
    fn test_timer_does_not_burst_after_stall() {
        let t0 = Instant::now();
        let mut timer = RepeatingTimer::start(100 * MS, t0);

        assert!(timer.poll(t0 + 1000 * MS));
        assert!(!timer.poll(t0 + 1050 * MS));
        assert_eq!(timer.next_due(), t0 + 1100 * MS);
    }

    #[test]
    fn test_progress() {
        let t0 = Instant::now();
        let timer = RepeatingTimer::start(1000 * MS, t0);
        assert_eq!(timer.progress(t0), 0.0);
        assert!((timer.progress(t0 + 500 * MS) - 0.5).abs() < 1e-3);
        assert_eq!(timer.progress(t0 + 5000 * MS), 1.0);
    }

    #[test]
    fn test_debounce_last_write_wins() {
        let t0 = Instant::now();
        let mut debounce = Debouncer::new(220 * MS);

        debounce.schedule("b", t0);
        debounce.schedule("br", t0 + 100 * MS);
        debounce.schedule("bri", t0 + 200 * MS);

        // First keystroke's deadline has passed but it was replaced
        assert_eq!(debounce.poll(t0 + 300 * MS), None);
        assert_eq!(debounce.poll(t0 + 420 * MS), Some("bri"));
        assert!(!debounce.is_pending());
        assert_eq!(debounce.poll(t0 + 1000 * MS), None);
    }

    #[test]
    fn test_debounce_cancel_and_flush() {
        let t0 = Instant::now();
        let mut debounce = Debouncer::new(220 * MS);

        debounce.schedule(1, t0);
        debounce.cancel();
        assert_eq!(debounce.poll(t0 + 1000 * MS), None);

        debounce.schedule(2, t0);
        assert_eq!(debounce.due_at(), Some(t0 + 220 * MS));
        assert_eq!(debounce.flush(), Some(2));
        assert_eq!(debounce.flush(), None);
    }
}
