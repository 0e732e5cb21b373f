use glam::{Quat, Vec3};

use super::skeleton::Pose;

/// How values between two keyframes are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    Step,
}

/// Keyframe values for one animated property
#[derive(Debug, Clone, PartialEq)]
pub enum TrackValues {
    Translation(Vec<Vec3>),
    Rotation(Vec<Quat>),
    Scale(Vec<Vec3>),
}

impl TrackValues {
    pub fn len(&self) -> usize {
        match self {
            TrackValues::Translation(v) | TrackValues::Scale(v) => v.len(),
            TrackValues::Rotation(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One animated property of one node
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub node: usize,
    pub times: Vec<f32>,
    pub values: TrackValues,
    pub interpolation: Interpolation,
}

impl Track {
    /// Keyframe pair bracketing `t` and the blend factor between them.
    /// Times outside the keyed range clamp to the first or last key.
    fn segment(&self, t: f32) -> Option<(usize, usize, f32)> {
        let last = self.times.len().checked_sub(1)?;
        if t <= self.times[0] {
            return Some((0, 0, 0.0));
        }
        if t >= self.times[last] {
            return Some((last, last, 0.0));
        }
        // First key strictly after t; t is inside (times[0], times[last])
        let next = self.times.partition_point(|&k| k <= t);
        let prev = next - 1;
        let span = self.times[next] - self.times[prev];
        let f = if span > 0.0 {
            (t - self.times[prev]) / span
        } else {
            0.0
        };
        match self.interpolation {
            Interpolation::Linear => Some((prev, next, f)),
            Interpolation::Step => Some((prev, prev, 0.0)),
        }
    }

    /// Write this track's value at time `t` into the pose
    pub fn apply(&self, t: f32, pose: &mut Pose) {
        if self.values.len() != self.times.len() {
            return;
        }
        let Some(local) = pose.locals.get_mut(self.node) else {
            return;
        };
        let Some((a, b, f)) = self.segment(t) else {
            return;
        };
        match &self.values {
            TrackValues::Translation(v) => local.translation = v[a].lerp(v[b], f),
            TrackValues::Rotation(v) => local.rotation = v[a].slerp(v[b], f).normalize(),
            TrackValues::Scale(v) => local.scale = v[a].lerp(v[b], f),
        }
    }
}

/// Reusable, time-parameterized animation data
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl Clip {
    /// Build a clip; the duration is the latest keyframe time of any track
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let duration = tracks
            .iter()
            .filter_map(|t| t.times.last().copied())
            .fold(0.0f32, f32::max);
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    /// Sample every track at `t` (seconds into the clip) into `pose`
    pub fn apply(&self, t: f32, pose: &mut Pose) {
        for track in &self.tracks {
            track.apply(t, pose);
        }
    }
}
