use glam::Vec3;

use crate::config::{EffectController, LightsConfig, WaterConfig};
use crate::math::{hex_to_linear, sun_position};

/// Analytic sky, parameterised by the effect controller
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sky {
    pub effect: EffectController,
}

impl Sky {
    pub fn new(effect: EffectController) -> Self {
        Self { effect }
    }

    /// Unit vector toward the sun
    pub fn sun_position(&self) -> Vec3 {
        sun_position(self.effect.elevation, self.effect.azimuth)
    }
}

/// The animated water plane. Its shader time only ever grows.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterSurface {
    pub size: f32,
    pub water_color: [f32; 3],
    pub sun_color: [f32; 3],
    pub distortion_scale: f32,
    time: f64,
}

impl WaterSurface {
    pub fn new(config: &WaterConfig) -> Self {
        Self {
            size: config.size,
            water_color: hex_to_linear(config.water_color),
            sun_color: hex_to_linear(config.sun_color),
            distortion_scale: config.distortion_scale,
            time: 0.0,
        }
    }

    pub fn advance(&mut self, step: f64) {
        self.time += step;
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Time narrowed for upload as a shader uniform
    pub fn shader_time(&self) -> f32 {
        self.time as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lights {
    pub ambient: AmbientLight,
    pub point: PointLight,
}

impl Lights {
    pub fn new(config: &LightsConfig) -> Self {
        Self {
            ambient: AmbientLight {
                color: hex_to_linear(config.ambient_color),
                intensity: config.ambient_intensity,
            },
            point: PointLight {
                color: hex_to_linear(config.point_color),
                intensity: config.point_intensity,
                position: Vec3::from_array(config.point_position),
            },
        }
    }
}
