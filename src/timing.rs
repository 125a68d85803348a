//! Frame timing: elapsed time per tick, an optional frame cap, and an FPS counter.

use std::time::{Duration, Instant};

/// Measures wall-clock time between ticks.
pub struct FrameClock {
    previous: Instant,
    frame_target: Option<Duration>,
    frame_timer: f32,
    frame_count: u32,
    last_fps: u32,
    last_elapsed: f32,
}

impl FrameClock {
    /// Creates a clock. `frame_cap` limits ticks per second by sleeping.
    pub fn new(frame_cap: Option<u32>) -> Self {
        Self {
            previous: Instant::now(),
            frame_target: frame_cap
                .filter(|&fps| fps > 0)
                .map(|fps| Duration::from_secs_f64(1.0 / fps as f64)),
            frame_timer: 0.0,
            frame_count: 0,
            last_fps: 0,
            last_elapsed: 0.0,
        }
    }

    /// Restarts measurement from now.
    pub fn restart(&mut self) {
        self.previous = Instant::now();
    }

    /// Waits if a frame cap is set and returns the seconds elapsed since the
    /// previous tick.
    pub fn tick(&mut self) -> f32 {
        let mut now = Instant::now();
        if let Some(target) = self.frame_target {
            let delta = now - self.previous;
            if delta < target {
                std::thread::sleep(target - delta);
                now = Instant::now();
            }
        }

        let elapsed = (now - self.previous).as_secs_f32();
        self.previous = now;
        self.last_elapsed = elapsed;
        elapsed
    }

    /// Counts one frame of `elapsed` seconds. Returns the new FPS value each
    /// time a whole second has accumulated.
    pub fn record(&mut self, elapsed: f32) -> Option<u32> {
        self.frame_timer += elapsed;
        self.frame_count += 1;
        if self.frame_timer >= 1.0 {
            self.frame_timer -= 1.0;
            self.last_fps = self.frame_count;
            self.frame_count = 0;
            Some(self.last_fps)
        } else {
            None
        }
    }

    pub fn fps(&self) -> u32 {
        self.last_fps
    }

    pub fn last_elapsed(&self) -> f32 {
        self.last_elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_reported_once_per_second() {
        let mut clock = FrameClock::new(None);
        for _ in 0..59 {
            assert_eq!(clock.record(1.0 / 60.0), None);
        }
        assert_eq!(clock.record(1.0 / 60.0 + 0.001), Some(60));
        assert_eq!(clock.fps(), 60);
        assert_eq!(clock.record(0.1), None);
    }

    #[test]
    fn tick_measures_non_negative_time() {
        let mut clock = FrameClock::new(None);
        let elapsed = clock.tick();
        assert!(elapsed >= 0.0);
        assert_eq!(clock.last_elapsed(), elapsed);
    }

    #[test]
    fn frame_cap_waits_for_target() {
        let mut clock = FrameClock::new(Some(100));
        clock.restart();
        let elapsed = clock.tick();
        assert!(elapsed >= 0.009);
    }
}
