/// Self-contained timers - accumulate delta time and decide when to fire

/// Throttled timer - minimum interval between fires
#[derive(Debug, Clone, Copy)]
pub struct Throttled {
    min_interval: f32,
    time_since_last: f32,
}

impl Throttled {
    /// Create throttled timer with minimum interval
    pub fn new(min_interval: f32) -> Self {
        Self {
            min_interval,
            time_since_last: 0.0,
        }
    }

    /// Attempt to fire, returns true if enough time has passed
    pub fn try_tick(&mut self, delta: f32) -> bool {
        self.time_since_last += delta;

        if self.time_since_last >= self.min_interval {
            self.time_since_last = 0.0;
            true
        } else {
            false
        }
    }
}

/// Frames-per-second counter, reporting once per interval
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    report: Throttled,
    frames: u32,
    window: f32,
    fps: f32,
}

impl FpsCounter {
    pub fn new(interval: f32) -> Self {
        Self {
            report: Throttled::new(interval),
            frames: 0,
            window: 0.0,
            fps: 0.0,
        }
    }

    /// Count one frame. Returns the fresh FPS figure when an interval closes.
    pub fn tick(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.window += delta;

        if self.report.try_tick(delta) {
            self.fps = if self.window > 0.0 {
                self.frames as f32 / self.window
            } else {
                0.0
            };
            self.frames = 0;
            self.window = 0.0;
            Some(self.fps)
        } else {
            None
        }
    }

    /// Most recent FPS figure
    pub fn fps(&self) -> f32 {
        self.fps
    }
}
