//! Retained scene description: everything the renderer draws and the frame
//! loop mutates.

mod actors;
mod camera;
mod environment;
mod primary;
mod transform;

pub use actors::{Actor, ActorSet};
pub use camera::PerspectiveCamera;
pub use environment::{AmbientLight, Lights, PointLight, Sky, WaterSurface};
pub use primary::{Material, Orientation, PrimaryMesh};
pub use transform::Transform;

use crate::config::DemoConfig;

#[derive(Debug, Clone)]
pub struct Scene {
    pub camera: PerspectiveCamera,
    pub lights: Lights,
    pub sky: Sky,
    pub water: WaterSurface,
    pub primary: PrimaryMesh,
    pub actors: ActorSet,
}

impl Scene {
    /// Assemble the static scene. Actors arrive later, once their model loads.
    pub fn from_config(config: &DemoConfig, aspect: f32) -> Self {
        let scene = Self {
            camera: PerspectiveCamera::new(&config.camera, aspect),
            lights: Lights::new(&config.lights),
            sky: Sky::new(config.sky),
            water: WaterSurface::new(&config.water),
            primary: PrimaryMesh::teapot(&config.teapot),
            actors: ActorSet::new(),
        };
        log::info!(
            "Scene assembled: teapot {} triangles, water {}x{}",
            scene.primary.mesh.triangle_count(),
            scene.water.size,
            scene.water.size
        );
        scene
    }
}
