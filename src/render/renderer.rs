use anyhow::{bail, Context, Result};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, Buffer, Device, Surface, SurfaceConfiguration, TextureView};
use winit::window::Window;

use super::gpu::GpuContext;
use super::overlay::Overlay;
use super::pipelines::{create_depth_view, Pipelines};
use super::uniforms::{FrameUniform, ObjectUniform};
use crate::animation::ActorTemplate;
use crate::config::EffectController;
use crate::core::Viewport;
use crate::geometry::{MeshData, Vertex};
use crate::scene::{Material, Scene};
use crate::traits::FrameSink;

/// Surface material used for imported actor models
const ACTOR_MATERIAL: Material = Material {
    color: [1.0, 1.0, 1.0],
    metalness: 0.0,
    roughness: 0.8,
};

const WATER_MATERIAL: Material = Material {
    color: [1.0, 1.0, 1.0],
    metalness: 0.0,
    roughness: 1.0,
};

/// Vertex and index buffers for one mesh
struct GpuMesh {
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &Device, label: &str, mesh: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertices", label)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Indices", label)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

/// Uniform buffer and bind group for one drawn object
struct ObjectBinding {
    buffer: Buffer,
    bind_group: BindGroup,
}

impl ObjectBinding {
    fn new(device: &Device, layout: &wgpu::BindGroupLayout, label: &str, uniform: ObjectUniform) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }
}

/// One actor's posed vertices and transform
struct ActorInstance {
    vertex_buffer: Buffer,
    object: ObjectBinding,
}

/// GPU side of the actor set, rebuilt if the template changes
struct ActorMeshes {
    template: Arc<ActorTemplate>,
    index_buffer: Buffer,
    index_count: u32,
    vertex_bytes: u64,
    instances: Vec<ActorInstance>,
}

impl ActorMeshes {
    fn new(device: &Device, template: Arc<ActorTemplate>) -> Self {
        let indices = template.indices();
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Actor Indices"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let vertex_bytes = (template.vertex_count() * std::mem::size_of::<Vertex>()) as u64;
        log::info!(
            "Uploaded actor model {}: {} vertices, {} triangles",
            template.name,
            template.vertex_count(),
            indices.len() / 3
        );
        Self {
            template,
            index_buffer,
            index_count: indices.len() as u32,
            vertex_bytes,
            instances: Vec::new(),
        }
    }
}

/// Forward renderer for the whole scene, drawing into a window surface
pub struct SceneRenderer {
    window: Arc<Window>,
    gpu: GpuContext,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    viewport: Viewport,
    depth_view: TextureView,
    pipelines: Pipelines,
    frame_buffer: Buffer,
    frame_bind_group: BindGroup,
    primary: Option<(GpuMesh, ObjectBinding)>,
    water: Option<(GpuMesh, ObjectBinding)>,
    actors: Option<ActorMeshes>,
    overlay: Option<Overlay>,
}

impl SceneRenderer {
    /// Create a renderer for `window`. The effect panel is built when
    /// `show_panel` is set.
    pub async fn new(window: Arc<Window>, max_pixel_ratio: f64, show_panel: bool) -> Result<Self> {
        let size = window.inner_size();
        let viewport = Viewport::new(size.width, size.height, window.scale_factor(), max_pixel_ratio);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;
        let gpu = GpuContext::new_with_surface(&instance, &surface).await?;

        let (width, height) = viewport.render_size();
        let surface_config = gpu.surface_config(&surface, width, height)?;
        surface.configure(gpu.device(), &surface_config);

        let device = gpu.device();
        let depth_view = create_depth_view(device, surface_config.width, surface_config.height);
        let pipelines = Pipelines::new(device, surface_config.format);

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &pipelines.frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let overlay = show_panel.then(|| Overlay::new(&window, device, surface_config.format));

        log::info!(
            "Renderer initialized: {}x{} ({:?})",
            surface_config.width,
            surface_config.height,
            surface_config.format
        );

        Ok(Self {
            window,
            gpu,
            surface,
            surface_config,
            viewport,
            depth_view,
            pipelines,
            frame_buffer,
            frame_bind_group,
            primary: None,
            water: None,
            actors: None,
            overlay,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Track a new window size; the surface follows at the capped pixel ratio
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport.resize(width, height);
        self.viewport.scale_factor = self.window.scale_factor();
        if self.viewport.is_empty() {
            return;
        }
        self.configure_surface();
    }

    fn configure_surface(&mut self) {
        let (width, height) = self.viewport.render_size();
        self.surface_config.width = width.max(1);
        self.surface_config.height = height.max(1);
        self.surface.configure(self.gpu.device(), &self.surface_config);
        self.depth_view = create_depth_view(self.gpu.device(), self.surface_config.width, self.surface_config.height);
    }

    /// Let the panel see window events first. True when it consumed the event.
    pub fn handle_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        match &mut self.overlay {
            Some(overlay) => overlay.on_window_event(&self.window, event),
            None => false,
        }
    }

    /// Build this frame's panel, editing `effect` in place
    pub fn prepare_overlay(&mut self, effect: &mut EffectController, fps: f32) -> bool {
        match &mut self.overlay {
            Some(overlay) => overlay.prepare(&self.window, effect, fps),
            None => false,
        }
    }

    /// Upload static geometry the first time it is seen
    fn ensure_static_meshes(&mut self, scene: &Scene) {
        let device = self.gpu.device();
        if self.primary.is_none() {
            let mesh = GpuMesh::upload(device, "Primary", &scene.primary.mesh);
            let object = ObjectBinding::new(
                device,
                &self.pipelines.object_layout,
                "Primary Object",
                ObjectUniform::from_transform(&scene.primary.transform, &scene.primary.material),
            );
            self.primary = Some((mesh, object));
        }
        if self.water.is_none() {
            let mut plane = MeshData::plane(scene.water.size, scene.water.size);
            plane.set_color(scene.water.water_color);
            let mesh = GpuMesh::upload(device, "Water", &plane);
            let object = ObjectBinding::new(
                device,
                &self.pipelines.object_layout,
                "Water Object",
                ObjectUniform::new(glam::Mat4::IDENTITY, &WATER_MATERIAL),
            );
            self.water = Some((mesh, object));
        }
    }

    /// Match GPU actor resources to the scene's actors and upload their poses
    fn sync_actors(&mut self, scene: &Scene) {
        let Some(template) = scene.actors.template() else {
            self.actors = None;
            return;
        };
        let device = self.gpu.device();
        let queue = self.gpu.queue();

        let stale = self
            .actors
            .as_ref()
            .is_none_or(|a| !Arc::ptr_eq(&a.template, template));
        if stale {
            self.actors = Some(ActorMeshes::new(device, template.clone()));
        }
        let Some(meshes) = self.actors.as_mut() else {
            return;
        };
        if meshes.vertex_bytes == 0 {
            return;
        }

        while meshes.instances.len() < scene.actors.len() {
            let n = meshes.instances.len();
            let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("Actor {} Vertices", n)),
                size: meshes.vertex_bytes,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let object = ObjectBinding::new(
                device,
                &self.pipelines.object_layout,
                &format!("Actor {} Object", n),
                ObjectUniform::new(glam::Mat4::IDENTITY, &ACTOR_MATERIAL),
            );
            meshes.instances.push(ActorInstance { vertex_buffer, object });
        }

        for (actor, instance) in scene.actors.actors().iter().zip(&meshes.instances) {
            let vertices = meshes.template.posed_vertices(&actor.pose(&meshes.template));
            queue.write_buffer(&instance.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
            let uniform = ObjectUniform::from_transform(&actor.transform, &ACTOR_MATERIAL);
            queue.write_buffer(&instance.object.buffer, 0, bytemuck::cast_slice(&[uniform]));
        }
    }

    fn acquire_frame(&mut self) -> Result<Option<wgpu::SurfaceTexture>> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated; reconfiguring and skipping frame");
                self.configure_surface();
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timed out; skipping frame");
                Ok(None)
            }
            Err(e) => bail!("Failed to acquire surface texture: {}", e),
        }
    }
}

impl FrameSink for SceneRenderer {
    fn render(&mut self, scene: &Scene) -> Result<()> {
        if self.viewport.is_empty() {
            return Ok(());
        }

        self.ensure_static_meshes(scene);
        self.sync_actors(scene);

        let queue = self.gpu.queue();
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[FrameUniform::from_scene(scene)]));
        if let Some((_, object)) = &self.primary {
            let uniform = ObjectUniform::from_transform(&scene.primary.transform, &scene.primary.material);
            queue.write_buffer(&object.buffer, 0, bytemuck::cast_slice(&[uniform]));
        }

        let Some(output) = self.acquire_frame()? else {
            return Ok(());
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

            render_pass.set_pipeline(&self.pipelines.sky);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle

            if let Some((mesh, object)) = &self.water {
                render_pass.set_pipeline(&self.pipelines.water);
                render_pass.set_bind_group(1, &object.bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }

            render_pass.set_pipeline(&self.pipelines.mesh);
            if let Some((mesh, object)) = &self.primary {
                render_pass.set_bind_group(1, &object.bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }

            if let Some(actors) = &self.actors {
                render_pass.set_index_buffer(actors.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                for instance in actors.instances.iter().take(scene.actors.len()) {
                    render_pass.set_bind_group(1, &instance.object.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, instance.vertex_buffer.slice(..));
                    render_pass.draw_indexed(0..actors.index_count, 0, 0..1);
                }
            }
        }

        let size_in_pixels = [self.surface_config.width, self.surface_config.height];
        let overlay_commands = match &mut self.overlay {
            Some(overlay) => overlay.paint(self.gpu.device(), self.gpu.queue(), &mut encoder, &view, size_in_pixels),
            None => Vec::new(),
        };

        self.gpu
            .queue()
            .submit(overlay_commands.into_iter().chain(std::iter::once(encoder.finish())));
        output.present();
        Ok(())
    }
}
