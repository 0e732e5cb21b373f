use anyhow::{bail, Context, Result};
use glam::{Mat4, Quat, Vec3};
use gltf::animation::util::ReadOutputs;
use std::path::Path;
use std::sync::Arc;

use crate::animation::{
    ActorTemplate, Clip, Interpolation, NodeTransform, Skeleton, Skin, SkinBinding, TemplateMesh, Track,
    TrackValues,
};
use crate::geometry::{MeshData, Vertex};

/// Loads a glTF/GLB file as an actor template (meshes, node hierarchy, skins, clips)
pub fn load_actor_template(path: impl AsRef<Path>) -> Result<ActorTemplate> {
    let path = path.as_ref();
    log::info!("Loading glTF file: {:?}", path);

    let (document, buffers, _images) =
        gltf::import(path).context(format!("Failed to load glTF file: {:?}", path))?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    build_template(&document, &buffers, name)
}

/// Loads an actor template from in-memory glTF JSON or GLB bytes
pub fn load_actor_template_slice(bytes: &[u8], name: &str) -> Result<ActorTemplate> {
    let (document, buffers, _images) =
        gltf::import_slice(bytes).context(format!("Failed to parse glTF data for {}", name))?;
    build_template(&document, &buffers, name.to_string())
}

fn build_template(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    name: String,
) -> Result<ActorTemplate> {
    log::info!("glTF loaded successfully:");
    log::info!("  Nodes: {}", document.nodes().count());
    log::info!("  Meshes: {}", document.meshes().count());
    log::info!("  Skins: {}", document.skins().count());
    log::info!("  Animations: {}", document.animations().count());

    let skeleton = read_skeleton(document);
    let skins = document
        .skins()
        .map(|skin| read_skin(&skin, buffers))
        .collect::<Vec<_>>();

    let mut meshes = Vec::new();
    for node in document.nodes() {
        if let Some(mesh) = node.mesh() {
            let skin_index = node.skin().map(|s| s.index());
            process_mesh(&mesh, node.index(), skin_index, buffers, &mut meshes)?;
        }
    }

    if meshes.is_empty() {
        bail!("glTF {} contains no triangle geometry", name);
    }

    let clips = document
        .animations()
        .map(|animation| Arc::new(read_clip(&animation, buffers)))
        .collect::<Vec<_>>();

    for clip in &clips {
        log::info!("  Clip {:?}: {} tracks, {:.2}s", clip.name, clip.tracks.len(), clip.duration);
    }

    let template = ActorTemplate {
        name,
        skeleton,
        meshes,
        skins,
        clips,
    };
    log::info!(
        "Extracted {} vertices in {} meshes from {}",
        template.vertex_count(),
        template.meshes.len(),
        template.name
    );
    Ok(template)
}

/// Parent links and rest transforms for every node
fn read_skeleton(document: &gltf::Document) -> Skeleton {
    let count = document.nodes().count();
    let mut parents = vec![None; count];
    let mut rest = vec![NodeTransform::IDENTITY; count];

    for node in document.nodes() {
        let (t, r, s) = node.transform().decomposed();
        rest[node.index()] = NodeTransform {
            translation: Vec3::from_array(t),
            rotation: Quat::from_array(r).normalize(),
            scale: Vec3::from_array(s),
        };
        for child in node.children() {
            parents[child.index()] = Some(node.index());
        }
    }

    Skeleton::new(parents, rest)
}

fn read_skin(skin: &gltf::Skin, buffers: &[gltf::buffer::Data]) -> Skin {
    let joints: Vec<usize> = skin.joints().map(|j| j.index()).collect();
    let reader = skin.reader(|buffer| Some(&buffers[buffer.index()]));
    let inverse_bind = reader
        .read_inverse_bind_matrices()
        .map(|iter| iter.map(|m| Mat4::from_cols_array_2d(&m)).collect())
        // Absent matrices mean identity for every joint
        .unwrap_or_else(|| vec![Mat4::IDENTITY; joints.len()]);
    Skin { joints, inverse_bind }
}

/// Processes a glTF mesh into one template mesh per triangle primitive
fn process_mesh(
    mesh: &gltf::Mesh,
    node: usize,
    skin: Option<usize>,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<TemplateMesh>,
) -> Result<()> {
    log::debug!("  Processing mesh: {:?}", mesh.name());

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!("Skipping non-triangle primitive ({:?}) in mesh {:?}", primitive.mode(), mesh.name());
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .context("Mesh primitive has no positions")?
            .collect();

        if positions.is_empty() {
            continue;
        }

        // Material colour (base colour factor is already linear)
        let base = primitive.material().pbr_metallic_roughness().base_color_factor();
        let color = [base[0], base[1], base[2]];

        let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|n| n.collect());
        let has_normals = normals.as_ref().is_some_and(|n| n.len() == positions.len());

        let vertices = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let normal = normals
                    .as_ref()
                    .filter(|_| has_normals)
                    .map(|n| n[i])
                    .unwrap_or([0.0, 1.0, 0.0]);
                Vertex::new(p, normal, color)
            })
            .collect::<Vec<_>>();

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            // No indices - treat as triangle list
            None => (0..positions.len() as u32).collect(),
        };

        let vertex_count = vertices.len() as u32;
        if indices.iter().any(|&i| i >= vertex_count) {
            bail!("Mesh {:?} has indices past its {} vertices", mesh.name(), vertex_count);
        }

        let mut data = MeshData::new(vertices, indices);
        if !has_normals {
            data.recompute_normals();
        }

        let binding = skin.and_then(|skin| {
            let joints: Vec<[u16; 4]> = reader.read_joints(0)?.into_u16().collect();
            let weights: Vec<[f32; 4]> = reader.read_weights(0)?.into_f32().collect();
            (joints.len() == positions.len() && weights.len() == positions.len()).then_some(SkinBinding {
                skin,
                joints,
                weights,
            })
        });

        out.push(TemplateMesh {
            node,
            mesh: data,
            skin: binding,
        });
    }

    Ok(())
}

/// Reads every channel of an animation into a clip
fn read_clip(animation: &gltf::Animation, buffers: &[gltf::buffer::Data]) -> Clip {
    let mut tracks = Vec::new();

    for channel in animation.channels() {
        let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));
        let Some(times) = reader.read_inputs().map(|t| t.collect::<Vec<f32>>()) else {
            continue;
        };
        let Some(outputs) = reader.read_outputs() else {
            continue;
        };

        let (interpolation, cubic) = match channel.sampler().interpolation() {
            gltf::animation::Interpolation::Linear => (Interpolation::Linear, false),
            gltf::animation::Interpolation::Step => (Interpolation::Step, false),
            // Keep the keyed values and drop the tangents
            gltf::animation::Interpolation::CubicSpline => (Interpolation::Linear, true),
        };

        let values = match outputs {
            ReadOutputs::Translations(v) => {
                TrackValues::Translation(keyed_values(v.map(Vec3::from_array).collect(), cubic))
            }
            ReadOutputs::Rotations(v) => TrackValues::Rotation(keyed_values(
                v.into_f32().map(|q| Quat::from_array(q).normalize()).collect(),
                cubic,
            )),
            ReadOutputs::Scales(v) => TrackValues::Scale(keyed_values(v.map(Vec3::from_array).collect(), cubic)),
            ReadOutputs::MorphTargetWeights(_) => continue,
        };

        if values.len() != times.len() {
            log::warn!(
                "Skipping channel on node {}: {} keys but {} values",
                channel.target().node().index(),
                times.len(),
                values.len()
            );
            continue;
        }

        tracks.push(Track {
            node: channel.target().node().index(),
            times,
            values,
            interpolation,
        });
    }

    Clip::new(animation.name().unwrap_or("unnamed"), tracks)
}

/// Cubic spline outputs are stored as (in-tangent, value, out-tangent) triples
fn keyed_values<T: Copy>(values: Vec<T>, cubic: bool) -> Vec<T> {
    if cubic {
        values.chunks_exact(3).map(|c| c[1]).collect()
    } else {
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_values_cubic_takes_middle() {
        let v = keyed_values(vec![0, 1, 2, 3, 4, 5], true);
        assert_eq!(v, vec![1, 4]);
    }

    #[test]
    fn test_keyed_values_linear_passthrough() {
        let v = keyed_values(vec![7, 8], false);
        assert_eq!(v, vec![7, 8]);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_actor_template("no/such/seagull.glb").unwrap_err();
        assert!(format!("{:#}", err).contains("seagull.glb"));
    }

    #[test]
    fn test_garbage_bytes_fail() {
        assert!(load_actor_template_slice(b"not a gltf", "junk").is_err());
    }
}
