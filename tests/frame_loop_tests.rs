use anyhow::Result;
use std::cell::Cell;
use std::sync::Arc;

use teapot_harbor::animation::{ActorTemplate, Clip, NodeTransform, Skeleton};
use teapot_harbor::config::DemoConfig;
use teapot_harbor::core::{advance_frame, FrameTiming, PointerState, Session};
use teapot_harbor::loaders::PendingAsset;
use teapot_harbor::math::steps_to_within;
use teapot_harbor::scene::{Orientation, Scene};
use teapot_harbor::traits::{FrameSink, RefreshScheduler};

/// Records what each render saw
#[derive(Default)]
struct RecordingSink {
    water_times: Vec<f64>,
    actor_counts: Vec<usize>,
}

impl FrameSink for RecordingSink {
    fn render(&mut self, scene: &Scene) -> Result<()> {
        self.water_times.push(scene.water.time());
        self.actor_counts.push(scene.actors.len());
        Ok(())
    }
}

#[derive(Default)]
struct CountingScheduler {
    requests: Cell<u32>,
}

impl RefreshScheduler for CountingScheduler {
    fn request_refresh(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}

fn session() -> Session {
    let mut config = DemoConfig::default();
    config.actors.seed = Some(11);
    Session::new(&config, 1280, 720)
}

fn gull_template() -> ActorTemplate {
    ActorTemplate {
        name: "gull".to_string(),
        skeleton: Skeleton::new(vec![None], vec![NodeTransform::IDENTITY]),
        clips: vec![Arc::new(Clip::new("glide", Vec::new()))],
        ..Default::default()
    }
}

#[cfg(test)]
mod frame_loop_tests {
    use super::*;

    #[test]
    fn test_each_frame_renders_once_then_requests_refresh() {
        let mut session = session();
        let mut sink = RecordingSink::default();
        let scheduler = CountingScheduler::default();

        for _ in 0..3 {
            advance_frame(&mut session, &mut sink, &scheduler).unwrap();
        }

        assert_eq!(sink.water_times.len(), 3);
        assert_eq!(scheduler.requests.get(), 3);
        // The render sees the water already advanced for its frame
        assert!((sink.water_times[0] - 1.0 / 600.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_actors_frame_succeeds() {
        let mut session = session();
        let mut sink = RecordingSink::default();
        let scheduler = CountingScheduler::default();

        advance_frame(&mut session, &mut sink, &scheduler).unwrap();
        assert_eq!(sink.actor_counts, vec![0]);
        assert!(session.scene().actors.is_empty());
    }

    #[test]
    fn test_water_time_after_6000_frames() {
        let mut session = session();
        for n in 0..6000 {
            session.step(FrameTiming::fixed(n, 1.0 / 60.0));
        }
        assert!((session.scene().water.time() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_water_time_ignores_delta() {
        let mut a = session();
        let mut b = session();
        for n in 0..100 {
            a.step(FrameTiming::fixed(n, 1.0 / 30.0));
            b.step(FrameTiming::fixed(n, 1.0 / 144.0));
        }
        assert_eq!(a.scene().water.time(), b.scene().water.time());
    }

    #[test]
    fn test_centre_pointer_is_fixed_point() {
        let mut session = session();
        for n in 0..200 {
            session.step(FrameTiming::fixed(n, 1.0 / 60.0));
        }
        assert_eq!(session.scene().primary.orientation(), Orientation::default());
    }

    #[test]
    fn test_decay_from_tilted_start() {
        let mut session = session();
        session.scene_mut().primary.set_orientation(Orientation::new(0.4, 0.0));
        for n in 0..50 {
            session.step(FrameTiming::fixed(n, 1.0 / 60.0));
        }
        let pitch = session.scene().primary.orientation().pitch;
        assert!((pitch - 0.4 * 0.95f32.powi(50)).abs() < 1e-5);
        assert!((pitch - 0.0308).abs() < 1e-3);
    }

    #[test]
    fn test_smoothing_converges_monotonically_without_overshoot() {
        let mut session = session();
        session.pointer_mut().set_state(PointerState::new(0.8, -0.6));
        let target = Orientation::new(-0.3, 0.4);
        let epsilon = 1e-3f32;
        let steps = steps_to_within(epsilon, 0.05);

        let mut previous = f32::INFINITY;
        for n in 0..steps as u64 {
            session.step(FrameTiming::fixed(n, 1.0 / 60.0));
            let o = session.scene().primary.orientation();
            let distance = (o.pitch - target.pitch).abs().max((o.yaw - target.yaw).abs());
            assert!(distance < previous, "distance grew at step {}", n);
            assert!(distance > 0.0, "reached target at step {}", n);
            // Same side of the target as the start
            assert!(o.pitch > target.pitch && o.yaw < target.yaw);
            previous = distance;
        }
        assert!(previous <= epsilon * 0.4 * 1.001);
    }

    #[test]
    fn test_actors_appear_after_load_and_wrap() {
        let mut session = session();
        let mut sink = RecordingSink::default();
        let scheduler = CountingScheduler::default();

        session.expect_template(PendingAsset::ready("gull", Ok(gull_template())));
        advance_frame(&mut session, &mut sink, &scheduler).unwrap();
        assert_eq!(sink.actor_counts, vec![0]);

        assert_eq!(session.poll_assets(), Some(5));
        for actor in session.scene_mut().actors.actors_mut() {
            actor.transform.position.x = 49.95;
        }
        session.step(FrameTiming::fixed(1, 1.0 / 60.0));
        for actor in session.scene().actors.actors() {
            assert_eq!(actor.transform.position.x, -50.0);
            let mixer = actor.mixer.as_ref().unwrap();
            assert!((mixer.time() - 1.0 / 60.0).abs() < 1e-7);
        }
    }

    #[test]
    fn test_actor_positions_stay_inside_band() {
        let mut session = session();
        session.attach_template(Arc::new(gull_template()));
        for n in 0..5000 {
            session.step(FrameTiming::fixed(n, 1.0 / 60.0));
            for actor in session.scene().actors.actors() {
                let x = actor.transform.position.x;
                assert!((-50.0..=50.0).contains(&x));
            }
        }
    }
}
