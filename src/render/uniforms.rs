use glam::{Mat4, Vec4};

use crate::math::scaled_rgba;
use crate::scene::{Material, Scene, Transform};

/// Per-frame shader inputs, shared by the sky, water and mesh passes.
/// Layout mirrors `FrameUniform` in `common.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub inv_view_proj: [[f32; 4]; 4],
    /// xyz camera position, w water time
    pub camera_position: [f32; 4],
    /// xyz unit vector toward the sun, w exposure
    pub sun_direction: [f32; 4],
    /// turbidity, rayleigh, mie coefficient, mie directional g
    pub sky_params: [f32; 4],
    /// Ambient colour premultiplied by intensity
    pub ambient: [f32; 4],
    pub point_light_position: [f32; 4],
    /// Point light colour premultiplied by intensity
    pub point_light_color: [f32; 4],
    /// rgb water colour, w distortion scale
    pub water_color: [f32; 4],
    /// rgb sun colour
    pub sun_color: [f32; 4],
}

impl FrameUniform {
    pub fn from_scene(scene: &Scene) -> Self {
        let camera = &scene.camera;
        let view_proj = camera.view_projection();
        let effect = &scene.sky.effect;
        let sun = scene.sky.sun_position();
        let lights = &scene.lights;
        let water = &scene.water;

        Self {
            view_proj: view_proj.to_cols_array_2d(),
            inv_view_proj: view_proj.inverse().to_cols_array_2d(),
            camera_position: camera.position.extend(water.shader_time()).to_array(),
            sun_direction: sun.normalize_or_zero().extend(effect.exposure).to_array(),
            sky_params: [
                effect.turbidity,
                effect.rayleigh,
                effect.mie_coefficient,
                effect.mie_directional_g,
            ],
            ambient: scaled_rgba(lights.ambient.color, lights.ambient.intensity),
            point_light_position: lights.point.position.extend(1.0).to_array(),
            point_light_color: scaled_rgba(lights.point.color, lights.point.intensity),
            water_color: [
                water.water_color[0],
                water.water_color[1],
                water.water_color[2],
                water.distortion_scale,
            ],
            sun_color: [water.sun_color[0], water.sun_color[1], water.sun_color[2], 1.0],
        }
    }
}

/// Per-object transform and surface parameters
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    /// metalness, roughness, unused, unused
    pub material: [f32; 4],
}

impl ObjectUniform {
    pub fn new(model: Mat4, material: &Material) -> Self {
        // Inverse transpose keeps normals perpendicular under non-uniform scale
        let normal_matrix = model.inverse().transpose();
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            material: Vec4::new(material.metalness, material.roughness, 0.0, 0.0).to_array(),
        }
    }

    pub fn from_transform(transform: &Transform, material: &Material) -> Self {
        Self::new(transform.matrix(), material)
    }
}
