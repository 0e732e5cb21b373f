use std::sync::Arc;

use super::clip::Clip;
use super::skeleton::{Pose, Skeleton};

/// Per-entity playback cursor over a shared clip. Plays on repeat.
#[derive(Debug, Clone)]
pub struct Mixer {
    clip: Arc<Clip>,
    time: f32,
    time_scale: f32,
    playing: bool,
}

impl Mixer {
    /// Create a mixer that is already playing `clip` from the start
    pub fn new(clip: Arc<Clip>) -> Self {
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            playing: true,
        }
    }

    /// Advance the playback cursor by `delta` seconds of wall time
    pub fn update(&mut self, delta: f32) {
        if self.playing {
            self.time += delta * self.time_scale;
        }
    }

    /// Total time played, unwrapped
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Position inside the clip after looping
    pub fn local_time(&self) -> f32 {
        if self.clip.duration > 0.0 {
            self.time.rem_euclid(self.clip.duration)
        } else {
            0.0
        }
    }

    pub fn clip(&self) -> &Arc<Clip> {
        &self.clip
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale;
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Sample the clip at the current cursor over the skeleton's rest pose
    pub fn pose(&self, skeleton: &Skeleton) -> Pose {
        let mut pose = skeleton.rest_pose();
        self.clip.apply(self.local_time(), &mut pose);
        pose
    }
}
