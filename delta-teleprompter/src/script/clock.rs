use std::time::{Duration, Instant};

use super::ScriptCursor;

/// Fixed-interval tick source for auto scrolling: one pixel per tick.
///
/// The host polls it from its event loop; nothing here runs on another thread.
/// Ticks that fall due while the teleprompter is not running are dropped, not queued.
#[derive(Debug)]
pub struct ScrollClock {
    interval: Duration,
    next_due: Instant,
}

impl ScrollClock {
    /// Interval at speed 0.  Every speed step takes a millisecond off.
    pub const BASE_INTERVAL: Duration = Duration::from_millis(255);
    pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

    pub fn new(speed: u8, now: Instant) -> Self {
        let interval = Self::interval_for(speed);
        Self {
            interval,
            next_due: now + interval,
        }
    }

    pub fn interval_for(speed: u8) -> Duration {
        Self::BASE_INTERVAL
            .saturating_sub(Duration::from_millis(speed.into()))
            .max(Self::MIN_INTERVAL)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Changes the cadence; the next tick is a full new interval away.
    pub fn set_speed(&mut self, speed: u8, now: Instant) {
        self.interval = Self::interval_for(speed);
        self.restart(now);
    }

    /// Forgets any ticks that were due and schedules the next one an interval from `now`.
    pub fn restart(&mut self, now: Instant) {
        self.next_due = now + self.interval;
    }

    pub fn next_deadline(&self) -> Instant {
        self.next_due
    }

    /// Number of ticks that fell due since the last poll.
    pub fn poll(&mut self, now: Instant) -> u32 {
        if now < self.next_due {
            return 0;
        }
        let late = now - self.next_due;
        let ticks = u32::try_from(late.as_nanos() / self.interval.as_nanos())
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        // Less than one interval, so it fits
        let into_interval = (late.as_nanos() % self.interval.as_nanos()) as u64;
        self.next_due = now + self.interval - Duration::from_nanos(into_interval);
        ticks
    }

    /// One tick: a pixel of scrolling, but only while running.
    /// Returns `true` if the cursor was stepped.
    pub fn tick(&self, running: bool, cursor: &mut ScriptCursor) -> bool {
        if running {
            cursor.step_pixel();
        }
        running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Size;
    use crate::script::reflow;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn faster_speed_means_shorter_interval() {
        assert_eq!(ScrollClock::interval_for(0), ms(255));
        assert_eq!(ScrollClock::interval_for(240), ms(15));
        assert!(ScrollClock::interval_for(200) < ScrollClock::interval_for(100));
    }

    #[test]
    fn interval_is_clamped() {
        assert_eq!(ScrollClock::interval_for(255), ScrollClock::MIN_INTERVAL);
        assert_eq!(ScrollClock::interval_for(254), ms(1));
    }

    #[test]
    fn poll_counts_elapsed_intervals() {
        let start = Instant::now();
        let mut clock = ScrollClock::new(245, start);
        assert_eq!(clock.interval(), ms(10));

        assert_eq!(clock.poll(start + ms(9)), 0);
        assert_eq!(clock.poll(start + ms(10)), 1);
        assert_eq!(clock.poll(start + ms(15)), 0);
        assert_eq!(clock.poll(start + ms(45)), 3);
        assert_eq!(clock.next_deadline(), start + ms(50));
    }

    #[test]
    fn long_stall_saturates() {
        let start = Instant::now();
        let mut clock = ScrollClock::new(255, start);
        let stalled = start + ms(u64::from(u32::MAX) + 10);
        assert_eq!(clock.poll(stalled), u32::MAX);
        assert_eq!(clock.next_deadline(), stalled + ms(1));
    }

    #[test]
    fn restart_drops_missed_ticks() {
        let start = Instant::now();
        let mut clock = ScrollClock::new(245, start);
        clock.restart(start + ms(1000));
        assert_eq!(clock.poll(start + ms(1005)), 0);
        assert_eq!(clock.poll(start + ms(1010)), 1);
    }

    #[test]
    fn set_speed_restarts() {
        let start = Instant::now();
        let mut clock = ScrollClock::new(0, start);
        clock.set_speed(235, start + ms(100));
        assert_eq!(clock.interval(), ms(20));
        assert_eq!(clock.next_deadline(), start + ms(120));
    }

    #[test]
    fn ticks_only_step_while_running() {
        let mut cursor = ScriptCursor::default();
        cursor.install(
            reflow("abc", 100, 100, |s| Size {
                width: s.len(),
                height: 10,
            })
            .unwrap(),
        );
        let clock = ScrollClock::new(240, Instant::now());

        assert!(!clock.tick(false, &mut cursor));
        assert_eq!(cursor.row_offset(), 0);

        assert!(clock.tick(true, &mut cursor));
        assert_eq!(cursor.row_offset(), 1);
    }
}
