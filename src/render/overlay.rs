use winit::window::Window;

use crate::config::EffectController;

struct PreparedOverlay {
    primitives: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    pixels_per_point: f32,
}

/// egui panel for editing the sky live
pub struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    prepared: Option<PreparedOverlay>,
}

impl Overlay {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());

        Self {
            ctx,
            state,
            renderer,
            prepared: None,
        }
    }

    /// Let egui see the event first. True when egui consumed it.
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Run the panel UI against `effect`. The result is painted on the next
    /// frame. Returns true when any control changed.
    pub fn prepare(&mut self, window: &Window, effect: &mut EffectController, fps: f32) -> bool {
        let before = *effect;
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, |ctx| {
            egui::Window::new("Sky")
                .default_pos(egui::pos2(10.0, 10.0))
                .resizable(false)
                .show(ctx, |ui| effect_controls(ui, effect, fps));
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        self.prepared = Some(PreparedOverlay {
            primitives,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        });

        *effect != before
    }

    /// Draw the prepared panel over `view`. Returns command buffers egui
    /// recorded for its uploads; submit them before `encoder`.
    pub fn paint(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
    ) -> Vec<wgpu::CommandBuffer> {
        let Some(prepared) = self.prepared.take() else {
            return Vec::new();
        };

        for (id, image_delta) in &prepared.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: prepared.pixels_per_point,
        };

        let commands = self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &prepared.primitives,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();

            self.renderer
                .render(&mut render_pass, &prepared.primitives, &screen_descriptor);
        }

        for id in &prepared.textures_delta.free {
            self.renderer.free_texture(id);
        }

        commands
    }
}

fn effect_controls(ui: &mut egui::Ui, effect: &mut EffectController, fps: f32) {
    ui.label(
        egui::RichText::new(format!("{:.0} FPS", fps))
            .color(egui::Color32::from_rgb(74, 158, 255)),
    );
    ui.separator();
    ui.add(egui::Slider::new(&mut effect.turbidity, 0.0..=20.0).text("turbidity"));
    ui.add(egui::Slider::new(&mut effect.rayleigh, 0.0..=4.0).text("rayleigh"));
    ui.add(egui::Slider::new(&mut effect.mie_coefficient, 0.0..=0.1).text("mieCoefficient"));
    ui.add(egui::Slider::new(&mut effect.mie_directional_g, 0.0..=1.0).text("mieDirectionalG"));
    ui.add(egui::Slider::new(&mut effect.elevation, 0.0..=90.0).text("elevation"));
    ui.add(egui::Slider::new(&mut effect.azimuth, -180.0..=180.0).text("azimuth"));
    ui.add(egui::Slider::new(&mut effect.exposure, 0.0..=1.0).text("exposure"));
}
