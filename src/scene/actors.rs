use glam::Vec3;
use rand::Rng;
use std::sync::Arc;

use crate::animation::{ActorTemplate, Mixer, Pose};
use crate::config::{ActorConfig, Tuning};
use crate::math::wrap_step;

use super::transform::Transform;

/// One clone of the actor template: its own transform and playback cursor
#[derive(Debug, Clone)]
pub struct Actor {
    pub transform: Transform,
    pub mixer: Option<Mixer>,
}

impl Actor {
    pub fn new(transform: Transform, mixer: Option<Mixer>) -> Self {
        Self { transform, mixer }
    }

    /// Advance the animation by `delta` seconds and drift along +X,
    /// wrapping past `wrap_bound`
    pub fn step(&mut self, delta: f32, tuning: &Tuning) {
        if let Some(mixer) = &mut self.mixer {
            mixer.update(delta);
        }
        let x = &mut self.transform.position.x;
        *x = wrap_step(*x, tuning.actor_step, tuning.wrap_bound);
    }

    /// Current pose over the template skeleton
    pub fn pose(&self, template: &ActorTemplate) -> Pose {
        match &self.mixer {
            Some(mixer) => mixer.pose(&template.skeleton),
            None => template.skeleton.rest_pose(),
        }
    }
}

/// The drifting flock. Empty until the template load resolves.
#[derive(Debug, Clone, Default)]
pub struct ActorSet {
    template: Option<Arc<ActorTemplate>>,
    actors: Vec<Actor>,
}

impl ActorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn template(&self) -> Option<&Arc<ActorTemplate>> {
        self.template.as_ref()
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actors_mut(&mut self) -> &mut [Actor] {
        &mut self.actors
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Clone `template` `config.count` times at random positions inside the
    /// spawn box. Returns how many actors were added.
    pub fn populate<R: Rng>(&mut self, template: Arc<ActorTemplate>, config: &ActorConfig, rng: &mut R) -> usize {
        let clip = template.clip(config.clip_index);
        if clip.is_none() {
            log::warn!(
                "Model {} has no clip {}; actors will hold their rest pose",
                template.name,
                config.clip_index
            );
        }

        for _ in 0..config.count {
            let position = Vec3::new(
                rng.gen_range(config.spawn_x[0]..config.spawn_x[1]),
                rng.gen_range(config.spawn_y[0]..config.spawn_y[1]),
                rng.gen_range(config.spawn_z[0]..config.spawn_z[1]),
            );
            let transform = Transform::from_position(position).with_uniform_scale(config.scale);
            self.actors.push(Actor::new(transform, clip.clone().map(Mixer::new)));
        }

        self.template = Some(template);
        config.count
    }

    /// Per-frame update for every actor
    pub fn step(&mut self, delta: f32, tuning: &Tuning) {
        for actor in &mut self.actors {
            actor.step(delta, tuning);
        }
    }
}
