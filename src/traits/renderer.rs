use anyhow::Result;

use crate::scene::Scene;

/// Frame sink - draws the whole scene once per call
pub trait FrameSink {
    fn render(&mut self, scene: &Scene) -> Result<()>;
}

/// Sink that draws nothing, for headless runs and tests
#[derive(Debug, Default)]
pub struct NullSink {
    frames: u64,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames handed to this sink so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl FrameSink for NullSink {
    fn render(&mut self, _scene: &Scene) -> Result<()> {
        self.frames += 1;
        Ok(())
    }
}
