//! Animation Clock - Explicit timestamps for reveal sampling.
//!
//! Reveal transitions are sampled against a monotonic clock that the host
//! event loop advances once per tick. Keeping the clock explicit (instead
//! of reading wall time inside the animator) makes every transition
//! deterministic under test: set the clock, sample, assert.

use std::time::Duration;

use spark_signals::{signal, Signal};

thread_local! {
    /// Elapsed time since mount. Advanced by the event loop.
    static CLOCK: Signal<Duration> = signal(Duration::ZERO);
}

/// Current animation time.
pub fn clock_now() -> Duration {
    CLOCK.with(|clock| clock.get())
}

/// Set the clock to an absolute timestamp.
///
/// The clock is monotonic: attempts to move it backwards are ignored.
pub fn set_clock(now: Duration) {
    CLOCK.with(|clock| {
        if now > clock.get() {
            clock.set(now);
        }
    });
}

/// Advance the clock by a delta. Returns the new time.
pub fn advance_clock(dt: Duration) -> Duration {
    CLOCK.with(|clock| {
        let now = clock.get() + dt;
        clock.set(now);
        now
    })
}

/// Reset the clock to zero (for testing).
pub fn reset_clock() {
    CLOCK.with(|clock| clock.set(Duration::ZERO));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() {
        reset_clock();
    }

    #[test]
    fn test_advance() {
        setup();

        assert_eq!(clock_now(), Duration::ZERO);
        assert_eq!(advance_clock(Duration::from_millis(16)), Duration::from_millis(16));
        advance_clock(Duration::from_millis(16));
        assert_eq!(clock_now(), Duration::from_millis(32));
    }

    #[test]
    fn test_set_is_monotonic() {
        setup();

        set_clock(Duration::from_millis(100));
        assert_eq!(clock_now(), Duration::from_millis(100));

        // Moving backwards is ignored
        set_clock(Duration::from_millis(50));
        assert_eq!(clock_now(), Duration::from_millis(100));
    }
}
