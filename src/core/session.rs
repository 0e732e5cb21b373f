use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

use super::clock::Clock;
use super::frame::FrameTiming;
use super::pointer::PointerTracker;
use crate::animation::ActorTemplate;
use crate::config::{ActorConfig, DemoConfig, Tuning};
use crate::loaders::PendingAsset;
use crate::scene::Scene;
use crate::traits::{FrameSink, RefreshScheduler};

/// Everything the frame loop reads and mutates, owned by the host
pub struct Session {
    clock: Clock,
    pointer: PointerTracker,
    scene: Scene,
    tuning: Tuning,
    actor_config: ActorConfig,
    rng: StdRng,
    pending_template: Option<PendingAsset<ActorTemplate>>,
}

impl Session {
    /// Assemble the scene for a `width` x `height` viewport
    pub fn new(config: &DemoConfig, width: u32, height: u32) -> Self {
        let aspect = if width == 0 || height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        };
        let rng = match config.actors.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            clock: Clock::new(),
            pointer: PointerTracker::new(width, height),
            scene: Scene::from_config(config, aspect),
            tuning: config.tuning,
            actor_config: config.actors.clone(),
            rng,
            pending_template: None,
        }
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut PointerTracker {
        &mut self.pointer
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Resize the pointer mapping and the camera aspect together
    pub fn resize(&mut self, width: u32, height: u32) {
        self.pointer.on_resize(width, height);
        if width > 0 && height > 0 {
            self.scene.camera.set_aspect(width as f32 / height as f32);
        }
    }

    /// The update rule for one frame: smooth the primary mesh toward the
    /// pointer, advance the water, then step every actor
    pub fn step(&mut self, timing: FrameTiming) {
        let tuning = self.tuning;
        let pointer = self.pointer.state();

        self.scene.primary.follow_pointer(pointer, &tuning);
        self.scene.water.advance(tuning.water_time_step);
        self.scene.actors.step(timing.delta, &tuning);
    }

    /// Hand over a template load to be absorbed between frames
    pub fn expect_template(&mut self, pending: PendingAsset<ActorTemplate>) {
        self.pending_template = Some(pending);
    }

    pub fn is_loading(&self) -> bool {
        self.pending_template.as_ref().is_some_and(|p| p.is_pending())
    }

    /// Check the pending template load. Returns the number of actors added
    /// when it resolves successfully this call.
    pub fn poll_assets(&mut self) -> Option<usize> {
        let pending = self.pending_template.as_mut()?;
        let result = pending.poll()?;
        let label = pending.label().to_string();
        self.pending_template = None;

        match result {
            Ok(template) => Some(self.attach_template(Arc::new(template))),
            Err(e) => {
                log::warn!("Actor model {} failed to load: {:#}", label, e);
                None
            }
        }
    }

    /// Clone the template into the scene's actor set
    pub fn attach_template(&mut self, template: Arc<ActorTemplate>) -> usize {
        let added = self
            .scene
            .actors
            .populate(template, &self.actor_config, &mut self.rng);
        log::info!("Added {} actors", added);
        added
    }
}

/// Run one frame: sample the clock, update, render, then ask for the next
/// refresh. The refresh is requested even when rendering fails, so a bad
/// frame is reported without stopping the loop.
pub fn advance_frame<S, R>(session: &mut Session, sink: &mut S, scheduler: &R) -> Result<FrameTiming>
where
    S: FrameSink + ?Sized,
    R: RefreshScheduler + ?Sized,
{
    let timing = session.clock.sample();
    session.step(timing);

    let rendered = sink.render(&session.scene);
    scheduler.request_refresh();

    rendered.with_context(|| format!("Failed to render frame {}", timing.number))?;
    Ok(timing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Clip, NodeTransform, Skeleton};
    use crate::core::pointer::PointerState;
    use crate::traits::{NullSink, RefreshFlag};
    use anyhow::bail;

    fn session() -> Session {
        let mut config = DemoConfig::default();
        config.actors.seed = Some(5);
        Session::new(&config, 800, 600)
    }

    fn template() -> ActorTemplate {
        ActorTemplate {
            name: "gull".to_string(),
            skeleton: Skeleton::new(vec![None], vec![NodeTransform::IDENTITY]),
            clips: vec![Arc::new(Clip::new("fly", Vec::new()))],
            ..Default::default()
        }
    }

    struct FailingSink;

    impl FrameSink for FailingSink {
        fn render(&mut self, _scene: &Scene) -> Result<()> {
            bail!("surface gone")
        }
    }

    #[test]
    fn test_advance_frame_renders_and_requests_refresh() {
        let mut session = session();
        let mut sink = NullSink::new();
        let flag = RefreshFlag::new();

        let timing = advance_frame(&mut session, &mut sink, &flag).unwrap();
        assert_eq!(timing.number, 0);
        assert_eq!(sink.frames(), 1);
        assert!(flag.take());
        assert!((session.scene().water.time() - 1.0 / 600.0).abs() < 1e-12);
    }

    #[test]
    fn test_render_failure_still_requests_refresh() {
        let mut session = session();
        let flag = RefreshFlag::new();
        let err = advance_frame(&mut session, &mut FailingSink, &flag).unwrap_err();
        assert!(format!("{:#}", err).contains("surface gone"));
        assert!(flag.take());
    }

    #[test]
    fn test_step_follows_pointer() {
        let mut session = session();
        session.pointer_mut().set_state(PointerState::new(1.0, 0.0));
        session.step(FrameTiming::fixed(0, 1.0 / 60.0));
        let o = session.scene().primary.orientation();
        assert!((o.yaw - 0.025).abs() < 1e-7);
        assert_eq!(o.pitch, 0.0);
    }

    #[test]
    fn test_template_absorbed_once() {
        let mut session = session();
        session.expect_template(PendingAsset::ready("gull", Ok(template())));
        assert!(session.is_loading());
        assert_eq!(session.poll_assets(), Some(5));
        assert!(!session.is_loading());
        assert_eq!(session.poll_assets(), None);
        assert_eq!(session.scene().actors.len(), 5);
    }

    #[test]
    fn test_failed_template_leaves_no_actors() {
        let mut session = session();
        session.expect_template(PendingAsset::ready("gull", Err(anyhow::anyhow!("no such file"))));
        assert_eq!(session.poll_assets(), None);
        assert!(session.scene().actors.is_empty());
        assert!(!session.is_loading());
    }

    #[test]
    fn test_resize_updates_camera_aspect() {
        let mut session = session();
        session.resize(1000, 500);
        assert_eq!(session.scene().camera.aspect, 2.0);
        session.resize(0, 500);
        assert_eq!(session.scene().camera.aspect, 2.0);
    }
}
