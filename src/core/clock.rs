use std::time::Instant;

use super::frame::FrameTiming;

/// Session clock - tracks elapsed time since start and delta between samples
#[derive(Debug, Clone)]
pub struct Clock {
    start: Instant,
    last_sample: Instant,
    samples: u64,
}

impl Clock {
    /// Create new clock starting now
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a clock whose origin is `start`
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last_sample: start,
            samples: 0,
        }
    }

    /// Sample elapsed and delta time against the wall clock and advance
    pub fn sample(&mut self) -> FrameTiming {
        self.sample_at(Instant::now())
    }

    /// Sample against an explicit instant. Instants earlier than the previous
    /// sample yield a zero delta rather than going backwards.
    pub fn sample_at(&mut self, now: Instant) -> FrameTiming {
        let delta = now.saturating_duration_since(self.last_sample).as_secs_f32();
        let elapsed = now.saturating_duration_since(self.start).as_secs_f32();
        self.last_sample = self.last_sample.max(now);

        let timing = FrameTiming::new(self.samples, elapsed, delta);
        self.samples += 1;
        timing
    }

    /// Seconds since the clock origin, without advancing
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    /// Number of samples taken since the last reset
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Reset clock origin to current time
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last_sample = now;
        self.samples = 0;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
