use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Seconds since the clock was created. This is the animation time fed
    /// to shaders; it is never clamped and never rebased.
    pub elapsed: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// One clock per window, so multi-window applications do not share delta-time
/// state. Delta time is clamped to avoid pathological values when the
/// application is paused by the debugger, minimized, or stalls.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    latest: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps (100µs .. 250ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            latest: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the delta-time baseline.
    ///
    /// Useful after surface reconfigure events or when resuming from
    /// suspension. Elapsed time is unaffected.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to an explicit timestamp.
    ///
    /// Timestamps earlier than the previous tick saturate to a zero interval
    /// (then clamped to `dt_min`).
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = self.last.max(now);
        self.latest = self.latest.max(now);

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: self.latest.saturating_duration_since(self.start).as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration { Duration::from_millis(v) }

    #[test]
    fn first_tick_starts_near_zero() {
        let mut clock = FrameClock::new();
        let start = clock.start;
        let ft = clock.tick_at(start);
        assert_eq!(ft.frame_index, 0);
        assert_eq!(ft.elapsed, 0.0);
    }

    #[test]
    fn elapsed_tracks_wall_time() {
        let mut clock = FrameClock::new();
        let start = clock.start;
        clock.tick_at(start + ms(16));
        let ft = clock.tick_at(start + ms(1500));
        assert!((ft.elapsed - 1.5).abs() < 1e-4);
        assert_eq!(ft.frame_index, 1);
    }

    #[test]
    fn dt_clamped_to_max_after_stall() {
        let mut clock = FrameClock::new();
        let start = clock.start;
        let ft = clock.tick_at(start + Duration::from_secs(5));
        assert!((ft.dt - 0.25).abs() < 1e-6);
        // Elapsed is not clamped.
        assert!((ft.elapsed - 5.0).abs() < 1e-4);
    }

    #[test]
    fn dt_clamped_to_min_for_repeated_timestamp() {
        let mut clock = FrameClock::new();
        let start = clock.start;
        clock.tick_at(start + ms(10));
        let ft = clock.tick_at(start + ms(10));
        assert!((ft.dt - 0.0001).abs() < 1e-6);
    }

    #[test]
    fn reset_keeps_elapsed_monotonic() {
        let mut clock = FrameClock::new();
        let start = clock.start;
        let a = clock.tick_at(start + ms(100));
        clock.reset();
        let b = clock.tick();
        assert!(b.elapsed >= a.elapsed);
    }

    #[test]
    fn earlier_timestamp_does_not_rewind() {
        let mut clock = FrameClock::new();
        let start = clock.start;
        let a = clock.tick_at(start + ms(200));
        let b = clock.tick_at(start + ms(100));
        assert_eq!(a.elapsed, b.elapsed);
    }
}
