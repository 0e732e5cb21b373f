use wgpu::{BindGroupLayout, Device, RenderPipeline, TextureFormat, TextureView};

use crate::geometry::Vertex;

pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

const SKY_SHADER: &str = concat!(
    include_str!("shaders/common.wgsl"),
    include_str!("shaders/atmosphere.wgsl"),
    include_str!("shaders/sky.wgsl"),
);
const WATER_SHADER: &str = concat!(
    include_str!("shaders/common.wgsl"),
    include_str!("shaders/atmosphere.wgsl"),
    include_str!("shaders/water.wgsl"),
);
const MESH_SHADER: &str = concat!(
    include_str!("shaders/common.wgsl"),
    include_str!("shaders/atmosphere.wgsl"),
    include_str!("shaders/mesh.wgsl"),
);

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

/// Every pipeline the scene pass uses, plus the bind group layouts they share
pub struct Pipelines {
    pub frame_layout: BindGroupLayout,
    pub object_layout: BindGroupLayout,
    pub sky: RenderPipeline,
    pub water: RenderPipeline,
    pub mesh: RenderPipeline,
}

impl Pipelines {
    pub fn new(device: &Device, surface_format: TextureFormat) -> Self {
        let frame_layout = uniform_layout(device, "Frame Bind Group Layout");
        let object_layout = uniform_layout(device, "Object Bind Group Layout");

        let sky_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sky Pipeline Layout"),
            bind_group_layouts: &[&frame_layout],
            push_constant_ranges: &[],
        });
        let object_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Object Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &object_layout],
            push_constant_ranges: &[],
        });

        // Sky sits at the far plane and never occludes
        let sky = create_pipeline(
            device,
            "Sky",
            SKY_SHADER,
            &sky_layout,
            &[],
            surface_format,
            false,
            wgpu::CompareFunction::Always,
        );
        let water = create_pipeline(
            device,
            "Water",
            WATER_SHADER,
            &object_pipeline_layout,
            &[vertex_layout()],
            surface_format,
            true,
            wgpu::CompareFunction::Less,
        );
        let mesh = create_pipeline(
            device,
            "Mesh",
            MESH_SHADER,
            &object_pipeline_layout,
            &[vertex_layout()],
            surface_format,
            true,
            wgpu::CompareFunction::Less,
        );

        Self {
            frame_layout,
            object_layout,
            sky,
            water,
            mesh,
        }
    }
}

fn uniform_layout(device: &Device, label: &str) -> BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

#[allow(clippy::too_many_arguments)]
fn create_pipeline(
    device: &Device,
    name: &str,
    source: &str,
    layout: &wgpu::PipelineLayout,
    buffers: &[wgpu::VertexBufferLayout],
    surface_format: TextureFormat,
    depth_write: bool,
    depth_compare: wgpu::CompareFunction,
) -> RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{} Shader", name)),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", name)),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            // Imported models and the water plane are viewed from both sides
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: depth_write,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Depth attachment matching the surface size
pub fn create_depth_view(device: &Device, width: u32, height: u32) -> TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
