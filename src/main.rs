use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use teapot_harbor::cli::Cli;
use teapot_harbor::config::DemoConfig;
use teapot_harbor::core::{advance_frame, CancelToken, FpsCounter, RunLoop, Session};
use teapot_harbor::loaders::load_actor_template_async;
use teapot_harbor::render::SceneRenderer;
use teapot_harbor::traits::NullSink;

const FPS_UPDATE_INTERVAL: f32 = 1.0;
const HEADLESS_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);
const HEADLESS_DEFAULT_FRAMES: u64 = 600;

// === Application ===

struct App {
    config: DemoConfig,
    cancel: CancelToken,
    max_frames: Option<u64>,
    session: Option<Session>,
    renderer: Option<SceneRenderer>,
    fps: FpsCounter,
    frames: u64,
}

impl App {
    fn new(config: DemoConfig, cancel: CancelToken, max_frames: Option<u64>) -> Self {
        Self {
            config,
            cancel,
            max_frames,
            session: None,
            renderer: None,
            fps: FpsCounter::new(FPS_UPDATE_INTERVAL),
            frames: 0,
        }
    }

    fn stop(&mut self, event_loop: &ActiveEventLoop) {
        self.cancel.cancel();
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.cancel.is_cancelled() || self.max_frames.is_some_and(|max| self.frames >= max) {
            self.stop(event_loop);
            return;
        }
        let (Some(session), Some(renderer)) = (&mut self.session, &mut self.renderer) else {
            return;
        };

        renderer.prepare_overlay(&mut session.scene_mut().sky.effect, self.fps.fps());

        let window = renderer.window().clone();
        match advance_frame(session, renderer, window.as_ref()) {
            Ok(timing) => {
                if let Some(rate) = self.fps.tick(timing.delta) {
                    log::info!("FPS: {:.1}", rate);
                }
            }
            Err(e) => log::error!("Render error: {:#}", e),
        }
        self.frames += 1;
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        let window_config = self.config.window.clone();
        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(window_config.title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(window_config.width, window_config.height)),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                self.stop(event_loop);
                return;
            }
        };

        let renderer = match pollster::block_on(SceneRenderer::new(
            window.clone(),
            window_config.max_pixel_ratio,
            window_config.show_panel,
        )) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Failed to initialize renderer: {:#}", e);
                self.stop(event_loop);
                return;
            }
        };

        let size = window.inner_size();
        let mut session = Session::new(&self.config, size.width, size.height);
        session.expect_template(load_actor_template_async(&self.config.actors.model_path));

        self.session = Some(session);
        self.renderer = Some(renderer);

        // Every later frame is requested by the one before it
        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        // Let the panel handle the event first
        if let Some(renderer) = &mut self.renderer {
            if renderer.handle_event(&event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.stop(event_loop),
            WindowEvent::Resized(size) => {
                if let Some(session) = &mut self.session {
                    session.resize(size.width, size.height);
                }
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(renderer) = &mut self.renderer {
                    let size = renderer.window().inner_size();
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::CursorMoved { .. } => {
                if let Some(session) = &mut self.session {
                    session.pointer_mut().process_event(&event);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(session) = &mut self.session {
            session.poll_assets();
        }
    }
}

fn run_headless(config: &DemoConfig, frames: Option<u64>) {
    let mut session = Session::new(config, config.window.width, config.window.height);
    session.expect_template(load_actor_template_async(&config.actors.model_path));

    let run_loop = RunLoop::new(CancelToken::new())
        .with_max_frames(frames.unwrap_or(HEADLESS_DEFAULT_FRAMES))
        .with_frame_interval(HEADLESS_FRAME_INTERVAL);
    let mut sink = NullSink::new();
    let summary = run_loop.run(&mut session, &mut sink);

    let orientation = session.scene().primary.orientation();
    log::info!(
        "Headless run finished: {} frames ({} failed), {} actors, water time {:.3}, pitch {:.4}, yaw {:.4}",
        summary.frames,
        summary.failed_frames,
        session.scene().actors.len(),
        session.scene().water.time(),
        orientation.pitch,
        orientation.yaw
    );
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    if cli.print_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    if cli.headless {
        run_headless(&config, cli.frames);
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, CancelToken::new(), cli.frames);

    println!("Teapot Harbor - Controls: move the pointer to tilt the teapot, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
