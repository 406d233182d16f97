//! Fixed-rate refresh timer for the response curve.

use std::time::{Duration, Instant};

/// Default refresh rate in Hz.
pub const DEFAULT_REFRESH_HZ: u32 = 60;

/// Fires at most once per interval.
///
/// Polling is driven by the UI's repaint loop. If frames arrive late the
/// missed ticks are dropped rather than queued, so a stalled UI never bursts.
///
/// ```rust
/// use std::time::{Duration, Instant};
/// use vxt_gui_core::RefreshTimer;
///
/// let mut timer = RefreshTimer::default();
/// let start = Instant::now();
/// assert!(timer.poll(start));
/// assert!(!timer.poll(start + Duration::from_millis(5)));
/// assert!(timer.poll(start + Duration::from_millis(17)));
/// ```
#[derive(Debug, Clone)]
pub struct RefreshTimer {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl RefreshTimer {
    /// A timer firing at `hz` times per second. Zero is treated as 1 Hz.
    pub fn with_rate(hz: u32) -> Self {
        Self {
            interval: Duration::from_nanos(1_000_000_000 / u64::from(hz.max(1))),
            last_fired: None,
        }
    }

    /// Minimum time between two firings.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` if at least one interval has passed since the last
    /// firing (or if it never fired).
    pub fn poll(&mut self, now: Instant) -> bool {
        let due = self
            .last_fired
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
        if due {
            self.last_fired = Some(now);
        }
        due
    }

    /// Time until the next firing, zero if already due.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.last_fired.map_or(Duration::ZERO, |last| {
            self.interval
                .saturating_sub(now.saturating_duration_since(last))
        })
    }
}

impl Default for RefreshTimer {
    fn default() -> Self {
        Self::with_rate(DEFAULT_REFRESH_HZ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_fires_twice_within_interval() {
        let mut timer = RefreshTimer::default();
        let start = Instant::now();
        assert!(timer.poll(start));

        let interval = timer.interval();
        assert!(interval >= Duration::from_micros(16_666));
        for ms in [1, 5, 10, 16] {
            assert!(!timer.poll(start + Duration::from_millis(ms)), "{ms} ms");
        }
        assert!(timer.poll(start + interval));
    }

    #[test]
    fn missed_ticks_are_skipped() {
        let mut timer = RefreshTimer::default();
        let start = Instant::now();
        timer.poll(start);

        // A 100 ms stall fires once, then waits a full interval again.
        let late = start + Duration::from_millis(100);
        assert!(timer.poll(late));
        assert!(!timer.poll(late + Duration::from_millis(1)));
        assert_eq!(timer.remaining(late), timer.interval());
    }

    #[test]
    fn zero_rate_is_clamped() {
        assert_eq!(RefreshTimer::with_rate(0).interval(), Duration::from_secs(1));
    }
}
