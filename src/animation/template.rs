use glam::{Mat3, Vec3};
use std::sync::Arc;

use super::clip::Clip;
use super::skeleton::{Pose, Skeleton};
use super::skinning::{joint_palette, skin_vertex, Skin};
use crate::geometry::{MeshData, Vertex};

/// Per-vertex skin influences for a mesh bound to one of the template's skins
#[derive(Debug, Clone, PartialEq)]
pub struct SkinBinding {
    pub skin: usize,
    pub joints: Vec<[u16; 4]>,
    pub weights: Vec<[f32; 4]>,
}

/// Mesh attached to a skeleton node
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateMesh {
    pub node: usize,
    pub mesh: MeshData,
    pub skin: Option<SkinBinding>,
}

/// Immutable model shared by every actor cloned from it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActorTemplate {
    pub name: String,
    pub skeleton: Skeleton,
    pub meshes: Vec<TemplateMesh>,
    pub skins: Vec<Skin>,
    pub clips: Vec<Arc<Clip>>,
}

impl ActorTemplate {
    pub fn clip(&self, index: usize) -> Option<Arc<Clip>> {
        self.clips.get(index).cloned()
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.mesh.vertices.len()).sum()
    }

    /// Index buffer for all meshes concatenated in order. Matches the vertex
    /// order produced by [`ActorTemplate::posed_vertices`].
    pub fn indices(&self) -> Vec<u32> {
        let mut out = Vec::new();
        let mut base = 0u32;
        for m in &self.meshes {
            out.extend(m.mesh.indices.iter().map(|i| i + base));
            base += m.mesh.vertices.len() as u32;
        }
        out
    }

    /// All mesh vertices in model space for `pose`.
    ///
    /// Skinned meshes are deformed by their joint palette (the mesh node's own
    /// transform does not apply); rigid meshes follow their node's global.
    pub fn posed_vertices(&self, pose: &Pose) -> Vec<Vertex> {
        let globals = self.skeleton.globals(pose);
        let mut out = Vec::with_capacity(self.vertex_count());

        for m in &self.meshes {
            let skinned = m
                .skin
                .as_ref()
                .and_then(|binding| self.skins.get(binding.skin).map(|skin| (binding, skin)));

            match skinned {
                Some((binding, skin)) => {
                    let palette = joint_palette(skin, &globals);
                    for (i, v) in m.mesh.vertices.iter().enumerate() {
                        let joints = binding.joints.get(i).copied().unwrap_or([0; 4]);
                        let weights = binding.weights.get(i).copied().unwrap_or([0.0; 4]);
                        let (p, n) = skin_vertex(
                            Vec3::from_array(v.position),
                            Vec3::from_array(v.normal),
                            joints,
                            weights,
                            &palette,
                        );
                        out.push(Vertex::new(p.to_array(), n.to_array(), v.color));
                    }
                }
                None => {
                    let model = globals.get(m.node).copied().unwrap_or_default();
                    let normal_matrix = Mat3::from_mat4(model).inverse().transpose();
                    for v in &m.mesh.vertices {
                        let p = model.transform_point3(Vec3::from_array(v.position));
                        let n = (normal_matrix * Vec3::from_array(v.normal)).normalize_or_zero();
                        out.push(Vertex::new(p.to_array(), n.to_array(), v.color));
                    }
                }
            }
        }
        out
    }
}
