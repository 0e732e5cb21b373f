use crate::config::{TeapotConfig, Tuning};
use crate::core::pointer::PointerState;
use crate::geometry::{teapot, MeshData};
use crate::math::{approach, hex_to_linear};
use glam::Vec3;

use super::transform::Transform;

/// Pitch (about X) and yaw (about Y), radians
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orientation {
    pub pitch: f32,
    pub yaw: f32,
}

impl Orientation {
    pub fn new(pitch: f32, yaw: f32) -> Self {
        Self { pitch, yaw }
    }

    /// Orientation the pointer asks for: vertical pointer travel pitches,
    /// horizontal travel yaws
    pub fn target(pointer: PointerState, gain: f32) -> Self {
        Self {
            pitch: pointer.y * gain,
            yaw: pointer.x * gain,
        }
    }

    /// One smoothing step toward `target`
    pub fn approach(&mut self, target: Orientation, rate: f32) {
        self.pitch = approach(self.pitch, target.pitch, rate);
        self.yaw = approach(self.yaw, target.yaw, rate);
    }
}

/// Physically based surface parameters. Colour is linear RGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            metalness: 0.0,
            roughness: 1.0,
        }
    }
}

/// The pointer-following mesh at the centre of the scene
#[derive(Debug, Clone)]
pub struct PrimaryMesh {
    pub mesh: MeshData,
    pub material: Material,
    pub transform: Transform,
    orientation: Orientation,
}

impl PrimaryMesh {
    pub fn new(mesh: MeshData, material: Material, position: Vec3) -> Self {
        Self {
            mesh,
            material,
            transform: Transform::from_position(position),
            orientation: Orientation::default(),
        }
    }

    /// The teapot described by `config`
    pub fn teapot(config: &TeapotConfig) -> Self {
        let material = Material {
            color: hex_to_linear(config.color),
            metalness: config.metalness,
            roughness: config.roughness,
        };
        let mut mesh = teapot(config.size, config.segments);
        mesh.set_color(material.color);
        Self::new(mesh, material, Vec3::from_array(config.position))
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.sync_rotation();
    }

    /// Smooth the orientation toward the pointer target
    pub fn follow_pointer(&mut self, pointer: PointerState, tuning: &Tuning) {
        let target = Orientation::target(pointer, tuning.pointer_gain);
        self.orientation.approach(target, tuning.smoothing_rate);
        self.sync_rotation();
    }

    fn sync_rotation(&mut self) {
        self.transform.rotation.x = self.orientation.pitch;
        self.transform.rotation.y = self.orientation.yaw;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> Tuning {
        Tuning::default()
    }

    fn plane_stub() -> PrimaryMesh {
        PrimaryMesh::new(MeshData::plane(1.0, 1.0), Material::default(), Vec3::ZERO)
    }

    #[test]
    fn test_target_from_pointer() {
        let t = Orientation::target(PointerState::new(1.0, -0.5), 0.5);
        assert_eq!(t, Orientation::new(-0.25, 0.5));
    }

    #[test]
    fn test_single_step_from_rest() {
        let mut mesh = plane_stub();
        mesh.follow_pointer(PointerState::new(1.0, 1.0), &tuning());
        let o = mesh.orientation();
        assert!((o.pitch - 0.025).abs() < 1e-7);
        assert!((o.yaw - 0.025).abs() < 1e-7);
        assert_eq!(mesh.transform.rotation.x, o.pitch);
        assert_eq!(mesh.transform.rotation.y, o.yaw);
    }

    #[test]
    fn test_centre_pointer_decays_toward_zero() {
        let mut mesh = plane_stub();
        mesh.set_orientation(Orientation::new(0.4, 0.0));
        for _ in 0..50 {
            mesh.follow_pointer(PointerState::CENTER, &tuning());
        }
        let expected = 0.4 * 0.95f32.powi(50);
        assert!((mesh.orientation().pitch - expected).abs() < 1e-5);
        assert!((mesh.orientation().pitch - 0.0308).abs() < 1e-3);
        assert_eq!(mesh.orientation().yaw, 0.0);
    }

    #[test]
    fn test_teapot_from_config() {
        let config = TeapotConfig::default();
        let mesh = PrimaryMesh::teapot(&config);
        assert_eq!(mesh.transform.position, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(mesh.material.metalness, 1.0);
        assert!(!mesh.mesh.is_empty());
    }
}
