/// Frame timing - sample number, seconds since the session started, and
/// seconds since the previous frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    pub number: u64,
    pub elapsed: f32,
    pub delta: f32,
}

impl FrameTiming {
    pub fn new(number: u64, elapsed: f32, delta: f32) -> Self {
        Self {
            number,
            elapsed,
            delta,
        }
    }

    /// Synthetic timing at a fixed rate, handy for driving the update rule
    /// without a wall clock
    pub fn fixed(number: u64, delta: f32) -> Self {
        Self::new(number, (number + 1) as f32 * delta, delta)
    }
}
