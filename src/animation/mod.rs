//! Keyframe animation for actor models.
//!
//! A [`Clip`] is shared between every clone of a model; each clone owns a
//! [`Mixer`] that keeps its own playback cursor and samples the clip into a
//! [`Pose`] over the model's [`Skeleton`].

mod clip;
mod mixer;
mod skeleton;
mod skinning;
mod template;

pub use clip::{Clip, Interpolation, Track, TrackValues};
pub use mixer::Mixer;
pub use skeleton::{NodeTransform, Pose, Skeleton};
pub use skinning::{joint_palette, skin_vertex, Skin};
pub use template::{ActorTemplate, SkinBinding, TemplateMesh};
