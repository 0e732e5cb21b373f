// config.rs - Scene and tuning configuration, loadable from JSON
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete demo configuration. Every section falls back to its defaults, so a
/// config file only needs the keys it wants to change.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub tuning: Tuning,
    pub actors: ActorConfig,
    pub camera: CameraConfig,
    pub sky: EffectController,
    pub water: WaterConfig,
    pub lights: LightsConfig,
    pub teapot: TeapotConfig,
    pub window: WindowConfig,
}

/// Per-frame update constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Radians of rotation per unit of pointer travel
    pub pointer_gain: f32,
    /// Fraction of the remaining angle covered each frame
    pub smoothing_rate: f32,
    /// Water shader time added each frame
    pub water_time_step: f64,
    /// Actor x translation per frame
    pub actor_step: f32,
    /// Actors wrap from `wrap_bound` to `-wrap_bound`
    pub wrap_bound: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            pointer_gain: 0.5,
            smoothing_rate: 0.05,
            water_time_step: 1.0 / 600.0,
            actor_step: 0.1,
            wrap_bound: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    pub model_path: PathBuf,
    pub count: usize,
    pub scale: f32,
    /// Which clip of the model each mixer plays
    pub clip_index: usize,
    pub spawn_x: [f32; 2],
    pub spawn_y: [f32; 2],
    pub spawn_z: [f32; 2],
    /// Fixed seed for reproducible placement; random when absent
    pub seed: Option<u64>,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("assets/models/seagull.glb"),
            count: 5,
            scale: 0.1,
            clip_index: 0,
            spawn_x: [-50.0, 50.0],
            spawn_y: [5.0, 15.0],
            spawn_z: [-50.0, 50.0],
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 3.0, 8.0],
        }
    }
}

/// Sky parameters, edited live from the effect panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectController {
    pub turbidity: f32,
    pub rayleigh: f32,
    pub mie_coefficient: f32,
    pub mie_directional_g: f32,
    /// Sun height above the horizon, degrees
    pub elevation: f32,
    /// Sun bearing, degrees
    pub azimuth: f32,
    /// Tone mapping exposure
    pub exposure: f32,
}

impl Default for EffectController {
    fn default() -> Self {
        Self {
            turbidity: 10.0,
            rayleigh: 3.0,
            mie_coefficient: 0.005,
            mie_directional_g: 0.7,
            elevation: 2.0,
            azimuth: 180.0,
            exposure: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    pub size: f32,
    pub water_color: u32,
    pub sun_color: u32,
    pub distortion_scale: f32,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            size: 10000.0,
            water_color: 0x001e0f,
            sun_color: 0xffffff,
            distortion_scale: 3.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightsConfig {
    pub ambient_color: u32,
    pub ambient_intensity: f32,
    pub point_color: u32,
    pub point_intensity: f32,
    pub point_position: [f32; 3],
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            ambient_color: 0xffffff,
            ambient_intensity: 0.5,
            point_color: 0xffffff,
            point_intensity: 1.0,
            point_position: [5.0, 5.0, 5.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeapotConfig {
    pub size: f32,
    pub segments: u32,
    pub position: [f32; 3],
    pub color: u32,
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for TeapotConfig {
    fn default() -> Self {
        Self {
            size: 0.8,
            segments: 10,
            position: [0.0, 2.0, 0.0],
            color: 0xaaaaaa,
            metalness: 1.0,
            roughness: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub max_pixel_ratio: f64,
    pub show_panel: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Teapot Harbor".to_string(),
            width: 1280,
            height: 720,
            max_pixel_ratio: 2.0,
            show_panel: true,
        }
    }
}

impl DemoConfig {
    /// Load a JSON config file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_json(&text).with_context(|| format!("Invalid config file: {:?}", path))
    }

    /// Parse and validate a JSON config document
    pub fn from_json(text: &str) -> Result<Self> {
        let config: DemoConfig = serde_json::from_str(text).context("Malformed config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty JSON rendering, suitable as a starting config file
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Reject values the update loop or renderer cannot work with
    pub fn validate(&self) -> Result<()> {
        let t = &self.tuning;
        if !(t.smoothing_rate > 0.0 && t.smoothing_rate <= 1.0) {
            bail!("tuning.smoothing_rate must be in (0, 1], got {}", t.smoothing_rate);
        }
        if !(t.wrap_bound > 0.0) {
            bail!("tuning.wrap_bound must be positive, got {}", t.wrap_bound);
        }
        if !(t.water_time_step >= 0.0) {
            bail!("tuning.water_time_step must not be negative, got {}", t.water_time_step);
        }

        let a = &self.actors;
        for (name, range) in [("spawn_x", a.spawn_x), ("spawn_y", a.spawn_y), ("spawn_z", a.spawn_z)] {
            if !(range[0] < range[1]) {
                bail!("actors.{} must be an increasing [min, max] pair, got {:?}", name, range);
            }
        }
        if !(a.scale > 0.0) {
            bail!("actors.scale must be positive, got {}", a.scale);
        }

        let c = &self.camera;
        if !(c.near > 0.0 && c.far > c.near) {
            bail!("camera planes must satisfy 0 < near < far, got {} / {}", c.near, c.far);
        }
        if !(c.fov_deg > 0.0 && c.fov_deg < 180.0) {
            bail!("camera.fov_deg must be in (0, 180), got {}", c.fov_deg);
        }

        if self.teapot.segments == 0 {
            bail!("teapot.segments must be at least 1");
        }
        if !(self.window.max_pixel_ratio > 0.0) {
            bail!("window.max_pixel_ratio must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_scene_constants() {
        let config = DemoConfig::default();
        assert_eq!(config.tuning.pointer_gain, 0.5);
        assert_eq!(config.tuning.smoothing_rate, 0.05);
        assert_eq!(config.tuning.water_time_step, 1.0 / 600.0);
        assert_eq!(config.tuning.actor_step, 0.1);
        assert_eq!(config.tuning.wrap_bound, 50.0);
        assert_eq!(config.actors.count, 5);
        assert_eq!(config.actors.scale, 0.1);
        assert_eq!(config.camera.fov_deg, 75.0);
        assert_eq!(config.sky.turbidity, 10.0);
        assert_eq!(config.water.water_color, 0x001e0f);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = DemoConfig::from_json(r#"{ "tuning": { "smoothing_rate": 0.1 }, "actors": { "count": 12 } }"#)
            .unwrap();
        assert_eq!(config.tuning.smoothing_rate, 0.1);
        assert_eq!(config.tuning.pointer_gain, 0.5);
        assert_eq!(config.actors.count, 12);
        assert_eq!(config.actors.scale, 0.1);
        assert_eq!(config.sky, EffectController::default());
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(DemoConfig::from_json("{}").unwrap(), DemoConfig::default());
    }

    #[test]
    fn test_rejects_bad_smoothing_rate() {
        let err = DemoConfig::from_json(r#"{ "tuning": { "smoothing_rate": 1.5 } }"#).unwrap_err();
        assert!(format!("{:#}", err).contains("smoothing_rate"));
    }

    #[test]
    fn test_rejects_inverted_spawn_range() {
        let err = DemoConfig::from_json(r#"{ "actors": { "spawn_y": [15.0, 5.0] } }"#).unwrap_err();
        assert!(format!("{:#}", err).contains("spawn_y"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(DemoConfig::from_json("{ tuning: ").is_err());
    }

    #[test]
    fn test_pretty_json_parses_back() {
        let mut config = DemoConfig::default();
        config.actors.seed = Some(7);
        let text = config.to_json_pretty().unwrap();
        assert_eq!(DemoConfig::from_json(&text).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let err = DemoConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(format!("{:#}", err).contains("not/here.json"));
    }
}
