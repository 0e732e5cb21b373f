use glam::{Mat4, Vec3};
use serde_json::json;

use teapot_harbor::animation::{Interpolation, Mixer, TrackValues};
use teapot_harbor::loaders::{load_actor_template_slice, PendingAsset};

/// Pack a glTF JSON document and its binary buffer into a GLB container
fn glb(document: &serde_json::Value, bin: &[u8]) -> Vec<u8> {
    let mut json_chunk = serde_json::to_vec(document).unwrap();
    while json_chunk.len() % 4 != 0 {
        json_chunk.push(b' ');
    }
    let mut bin_chunk = bin.to_vec();
    while bin_chunk.len() % 4 != 0 {
        bin_chunk.push(0);
    }

    let total = 12 + 8 + json_chunk.len() + 8 + bin_chunk.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json_chunk.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json_chunk);
    out.extend_from_slice(&(bin_chunk.len() as u32).to_le_bytes());
    out.extend_from_slice(b"BIN\0");
    out.extend_from_slice(&bin_chunk);
    out
}

fn push_f32s(buf: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        buf.extend_from_slice(&v.to_le_bytes());
    }
}

/// One triangle on a child node, with the parent sliding along +X over a
/// second
fn sliding_triangle() -> Vec<u8> {
    let mut bin = Vec::new();
    push_f32s(&mut bin, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]); // 0..36
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes()); // 36..42
    }
    bin.extend_from_slice(&[0, 0]); // pad to 44
    push_f32s(&mut bin, &[0.0, 1.0]); // 44..52
    push_f32s(&mut bin, &[0.0, 0.0, 0.0, 2.0, 0.0, 0.0]); // 52..76

    let document = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "root", "children": [1] },
            { "name": "body", "mesh": 0, "translation": [0.0, 1.0, 0.0] }
        ],
        "meshes": [{
            "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1, "material": 0 }]
        }],
        "materials": [{ "pbrMetallicRoughness": { "baseColorFactor": [1.0, 0.0, 0.0, 1.0] } }],
        "animations": [{
            "name": "glide",
            "channels": [{ "sampler": 0, "target": { "node": 0, "path": "translation" } }],
            "samplers": [{ "input": 2, "output": 3, "interpolation": "LINEAR" }]
        }],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 0.0, 1.0] },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" },
            { "bufferView": 2, "componentType": 5126, "count": 2, "type": "SCALAR",
              "min": [0.0], "max": [1.0] },
            { "bufferView": 3, "componentType": 5126, "count": 2, "type": "VEC3" }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 },
            { "buffer": 0, "byteOffset": 44, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 52, "byteLength": 24 }
        ],
        "buffers": [{ "byteLength": bin.len() }]
    });

    glb(&document, &bin)
}

/// One triangle bound to a single joint. The joint rests at y = 1 and a
/// cubic-spline channel slides it to x = 2 over a second. The mesh node sits
/// far off to the side, which skinning ignores.
fn skinned_triangle(with_inverse_bind: bool) -> Vec<u8> {
    let mut bin = Vec::new();
    push_f32s(&mut bin, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]); // 0..36
    bin.extend_from_slice(&[0u8; 12]); // joints 36..48
    for _ in 0..3 {
        push_f32s(&mut bin, &[1.0, 0.0, 0.0, 0.0]); // weights 48..96
    }
    // Inverse bind of the joint rest transform, column major 96..160
    push_f32s(
        &mut bin,
        &[
            1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, -1.0, 0.0, 1.0,
        ],
    );
    push_f32s(&mut bin, &[0.0, 1.0]); // 160..168
    // (in-tangent, value, out-tangent) per key 168..240
    push_f32s(
        &mut bin,
        &[
            9.0, 9.0, 9.0, 0.0, 1.0, 0.0, 9.0, 9.0, 9.0, //
            9.0, 9.0, 9.0, 2.0, 1.0, 0.0, 9.0, 9.0, 9.0,
        ],
    );

    let mut skin = json!({ "joints": [2] });
    if with_inverse_bind {
        skin["inverseBindMatrices"] = json!(3);
    }

    let document = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "rig", "children": [1, 2] },
            { "name": "body", "mesh": 0, "skin": 0, "translation": [50.0, 0.0, 0.0] },
            { "name": "bone", "translation": [0.0, 1.0, 0.0] }
        ],
        "meshes": [{
            "primitives": [{ "attributes": { "POSITION": 0, "JOINTS_0": 1, "WEIGHTS_0": 2 } }]
        }],
        "skins": [skin],
        "animations": [{
            "name": "flap",
            "channels": [{ "sampler": 0, "target": { "node": 2, "path": "translation" } }],
            "samplers": [{ "input": 4, "output": 5, "interpolation": "CUBICSPLINE" }]
        }],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 0.0, 1.0] },
            { "bufferView": 1, "componentType": 5121, "count": 3, "type": "VEC4" },
            { "bufferView": 2, "componentType": 5126, "count": 3, "type": "VEC4" },
            { "bufferView": 3, "componentType": 5126, "count": 1, "type": "MAT4" },
            { "bufferView": 4, "componentType": 5126, "count": 2, "type": "SCALAR",
              "min": [0.0], "max": [1.0] },
            { "bufferView": 5, "componentType": 5126, "count": 6, "type": "VEC3" }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 12, "target": 34962 },
            { "buffer": 0, "byteOffset": 48, "byteLength": 48, "target": 34962 },
            { "buffer": 0, "byteOffset": 96, "byteLength": 64 },
            { "buffer": 0, "byteOffset": 160, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 168, "byteLength": 72 }
        ],
        "buffers": [{ "byteLength": bin.len() }]
    });

    glb(&document, &bin)
}

fn close(actual: [f32; 3], expected: Vec3) -> bool {
    (Vec3::from_array(actual) - expected).length() < 1e-5
}

#[cfg(test)]
mod gltf_loader_tests {
    use super::*;

    #[test]
    fn test_loads_hierarchy_mesh_and_clip() {
        let template = load_actor_template_slice(&sliding_triangle(), "slider").unwrap();

        assert_eq!(template.name, "slider");
        assert_eq!(template.skeleton.len(), 2);
        assert_eq!(template.skeleton.parents, vec![None, Some(0)]);
        assert_eq!(template.meshes.len(), 1);
        assert_eq!(template.meshes[0].node, 1);
        assert!(template.meshes[0].skin.is_none());
        assert_eq!(template.indices(), vec![0, 1, 2]);

        let vertex = template.meshes[0].mesh.vertices[0];
        assert_eq!(vertex.color, [1.0, 0.0, 0.0]);
        // Normals were absent, so they are rebuilt from the face
        assert!((vertex.normal[1].abs() - 1.0).abs() < 1e-5);

        assert_eq!(template.clips.len(), 1);
        assert_eq!(template.clips[0].name, "glide");
        assert_eq!(template.clips[0].duration, 1.0);
    }

    #[test]
    fn test_posed_vertices_follow_animated_parent() {
        let template = load_actor_template_slice(&sliding_triangle(), "slider").unwrap();
        let clip = template.clip(0).unwrap();
        let mut mixer = Mixer::new(clip);

        let rest = template.posed_vertices(&mixer.pose(&template.skeleton));
        assert!((Vec3::from_array(rest[0].position) - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);

        mixer.update(0.5);
        let posed = template.posed_vertices(&mixer.pose(&template.skeleton));
        assert!((Vec3::from_array(posed[0].position) - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
        assert!((Vec3::from_array(posed[1].position) - Vec3::new(2.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_reads_skin_and_vertex_bindings() {
        let template = load_actor_template_slice(&skinned_triangle(true), "gull").unwrap();

        assert_eq!(template.skins.len(), 1);
        assert_eq!(template.skins[0].joints, vec![2]);
        assert_eq!(template.skins[0].inverse_bind.len(), 1);
        assert!(template.skins[0].inverse_bind[0]
            .abs_diff_eq(Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)), 1e-6));

        let binding = template.meshes[0].skin.as_ref().expect("mesh should be skinned");
        assert_eq!(binding.skin, 0);
        assert_eq!(binding.joints, vec![[0u16; 4]; 3]);
        assert_eq!(binding.weights, vec![[1.0, 0.0, 0.0, 0.0]; 3]);
    }

    #[test]
    fn test_missing_inverse_bind_defaults_to_identity() {
        let template = load_actor_template_slice(&skinned_triangle(false), "gull").unwrap();
        assert_eq!(template.skins[0].inverse_bind, vec![Mat4::IDENTITY]);

        // The joint's rest offset is no longer cancelled out
        let rest = template.posed_vertices(&template.skeleton.rest_pose());
        assert!(close(rest[0].position, Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_cubic_spline_keeps_keyed_values() {
        let template = load_actor_template_slice(&skinned_triangle(true), "gull").unwrap();
        let track = &template.clips[0].tracks[0];

        assert_eq!(track.node, 2);
        assert_eq!(track.times, vec![0.0, 1.0]);
        assert_eq!(track.interpolation, Interpolation::Linear);
        assert_eq!(
            track.values,
            TrackValues::Translation(vec![Vec3::new(0.0, 1.0, 0.0), Vec3::new(2.0, 1.0, 0.0)])
        );
    }

    #[test]
    fn test_skinned_vertices_follow_animated_joint() {
        let template = load_actor_template_slice(&skinned_triangle(true), "gull").unwrap();
        let mut mixer = Mixer::new(template.clip(0).unwrap());

        // At rest the inverse bind cancels the joint, and the mesh node offset is ignored
        let rest = template.posed_vertices(&mixer.pose(&template.skeleton));
        assert!(close(rest[0].position, Vec3::ZERO));
        assert!(close(rest[1].position, Vec3::new(1.0, 0.0, 0.0)));

        mixer.update(0.5);
        let posed = template.posed_vertices(&mixer.pose(&template.skeleton));
        assert!(close(posed[0].position, Vec3::new(1.0, 0.0, 0.0)));
        assert!(close(posed[1].position, Vec3::new(2.0, 0.0, 0.0)));
        assert!(close(posed[2].position, Vec3::new(1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_background_load_hands_over_template() {
        let bytes = sliding_triangle();
        let pending = PendingAsset::spawn("slider", move || load_actor_template_slice(&bytes, "slider"));
        let template = pollster::block_on(pending.wait()).unwrap();
        assert_eq!(template.vertex_count(), 3);
    }

    #[test]
    fn test_missing_model_is_an_error_not_a_panic() {
        let mut pending = teapot_harbor::loaders::load_actor_template_async("does/not/exist.glb");
        let result = loop {
            if let Some(result) = pending.poll() {
                break result;
            }
            std::thread::yield_now();
        };
        assert!(result.is_err());
    }
}
