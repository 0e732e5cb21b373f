use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::TAU;

use super::mesh::{MeshData, Vertex};

/// Body and lid silhouette as (radius, height), bottom to knob tip. Units are
/// body radii.
const PROFILE: [(f32, f32); 17] = [
    (0.00, 0.00),
    (0.80, 0.00),
    (0.95, 0.08),
    (1.05, 0.30),
    (1.08, 0.55),
    (1.00, 0.85),
    (0.85, 1.05),
    (0.75, 1.12),
    (0.72, 1.16),
    (0.45, 1.25),
    (0.20, 1.32),
    (0.10, 1.36),
    (0.12, 1.42),
    (0.15, 1.50),
    (0.12, 1.55),
    (0.06, 1.58),
    (0.00, 1.59),
];

/// Handle centreline in the XZ=0 plane, attached on the -X side
const HANDLE: [(f32, f32); 6] = [
    (-0.95, 0.95),
    (-1.35, 1.00),
    (-1.62, 0.85),
    (-1.62, 0.55),
    (-1.40, 0.33),
    (-1.02, 0.28),
];
const HANDLE_RADIUS: f32 = 0.08;

/// Spout centreline on the +X side, with its radius at each point
const SPOUT: [(f32, f32, f32); 6] = [
    (0.85, 0.35, 0.22),
    (1.25, 0.42, 0.17),
    (1.50, 0.70, 0.13),
    (1.65, 1.00, 0.10),
    (1.80, 1.15, 0.08),
    (1.95, 1.20, 0.075),
];

/// Build a teapot whose body radius is `size`, centred on the origin.
///
/// `segments` controls tessellation the same way for every part: the body is
/// revolved in `4 * segments` steps and every curve span is split `segments`
/// ways (at least 3).
pub fn teapot(size: f32, segments: u32) -> MeshData {
    let radial = (segments.max(2) * 4) as usize;
    let subdivisions = segments.max(3) as usize;

    let profile: Vec<Vec2> = smooth_curve(
        &PROFILE.iter().map(|&(r, y)| Vec2::new(r, y)).collect::<Vec<_>>(),
        subdivisions,
    );
    let mut mesh = lathe(&profile, radial);
    mesh.recompute_normals();

    let handle_path = smooth_curve(
        &HANDLE.iter().map(|&(x, y)| Vec2::new(x, y)).collect::<Vec<_>>(),
        subdivisions,
    );
    let handle_radii = vec![HANDLE_RADIUS; handle_path.len()];
    mesh.append(&tube(&handle_path, &handle_radii, radial / 2));

    let spout_path = smooth_curve(
        &SPOUT.iter().map(|&(x, y, _)| Vec2::new(x, y)).collect::<Vec<_>>(),
        subdivisions,
    );
    let spout_radii = resample(&SPOUT.iter().map(|&(_, _, r)| r).collect::<Vec<_>>(), spout_path.len());
    mesh.append(&tube(&spout_path, &spout_radii, radial / 2));

    if let Some((min, max)) = mesh.bounds() {
        let center = (min + max) * 0.5;
        mesh.transform(Mat4::from_scale(Vec3::splat(size)) * Mat4::from_translation(-center));
    }
    mesh
}

/// Surface of revolution around +Y. Each ring shares its seam vertex, so the
/// smooth normals are continuous all the way round.
fn lathe(profile: &[Vec2], radial: usize) -> MeshData {
    let white = [1.0, 1.0, 1.0];
    let mut vertices = Vec::with_capacity(profile.len() * radial);
    for p in profile {
        for j in 0..radial {
            let angle = j as f32 / radial as f32 * TAU;
            vertices.push(Vertex::new(
                [p.x * angle.cos(), p.y, p.x * angle.sin()],
                [0.0, 1.0, 0.0],
                white,
            ));
        }
    }

    let mut indices = Vec::with_capacity((profile.len() - 1) * radial * 6);
    for i in 0..profile.len().saturating_sub(1) {
        for j in 0..radial {
            let a = (i * radial + j) as u32;
            let b = (i * radial + (j + 1) % radial) as u32;
            let c = ((i + 1) * radial + j) as u32;
            let d = ((i + 1) * radial + (j + 1) % radial) as u32;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }
    MeshData::new(vertices, indices)
}

/// Tube swept along a curve lying in the z = 0 plane, with analytic normals
fn tube(path: &[Vec2], radii: &[f32], radial: usize) -> MeshData {
    let white = [1.0, 1.0, 1.0];
    let radial = radial.max(3);
    let mut vertices = Vec::with_capacity(path.len() * radial);

    for (k, p) in path.iter().enumerate() {
        let prev = path[k.saturating_sub(1)];
        let next = path[(k + 1).min(path.len() - 1)];
        let tangent = (next - prev).normalize_or_zero();
        // In-plane normal; the binormal is +Z for a planar curve
        let normal = Vec3::new(-tangent.y, tangent.x, 0.0);
        let center = Vec3::new(p.x, p.y, 0.0);

        for j in 0..radial {
            let angle = j as f32 / radial as f32 * TAU;
            let dir = normal * angle.cos() + Vec3::Z * angle.sin();
            vertices.push(Vertex::new(
                (center + dir * radii[k]).to_array(),
                dir.to_array(),
                white,
            ));
        }
    }

    let mut indices = Vec::with_capacity((path.len() - 1) * radial * 6);
    for k in 0..path.len().saturating_sub(1) {
        for j in 0..radial {
            let a = (k * radial + j) as u32;
            let b = (k * radial + (j + 1) % radial) as u32;
            let c = ((k + 1) * radial + j) as u32;
            let d = ((k + 1) * radial + (j + 1) % radial) as u32;
            indices.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }
    MeshData::new(vertices, indices)
}

/// Catmull-Rom through every control point, `subdivisions` samples per span
fn smooth_curve(points: &[Vec2], subdivisions: usize) -> Vec<Vec2> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let last = points.len() - 1;
    let mut out = Vec::with_capacity(last * subdivisions + 1);
    for i in 0..last {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(last)];
        for s in 0..subdivisions {
            out.push(catmull_rom(p0, p1, p2, p3, s as f32 / subdivisions as f32));
        }
    }
    out.push(points[last]);
    out
}

fn catmull_rom(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

/// Linearly resample `values` to `count` evenly spaced samples
fn resample(values: &[f32], count: usize) -> Vec<f32> {
    if values.len() < 2 || count < 2 {
        return vec![values.first().copied().unwrap_or(0.0); count];
    }
    let span = (values.len() - 1) as f32;
    (0..count)
        .map(|i| {
            let t = i as f32 / (count - 1) as f32 * span;
            let k = (t.floor() as usize).min(values.len() - 2);
            let f = t - k as f32;
            values[k] + (values[k + 1] - values[k]) * f
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teapot_is_valid_mesh() {
        let mesh = teapot(0.8, 10);
        assert!(mesh.triangle_count() > 1000);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
        for v in &mesh.vertices {
            let len = Vec3::from_array(v.normal).length();
            assert!((len - 1.0).abs() < 1e-3, "normal length {}", len);
        }
    }

    #[test]
    fn test_teapot_is_centred() {
        let (min, max) = teapot(0.8, 10).bounds().unwrap();
        let center = (min + max) * 0.5;
        assert!(center.length() < 1e-4, "centre {:?}", center);
    }

    #[test]
    fn test_teapot_scales_with_size() {
        let (min1, max1) = teapot(1.0, 6).bounds().unwrap();
        let (min2, max2) = teapot(2.0, 6).bounds().unwrap();
        let ratio = (max2 - min2).x / (max1 - min1).x;
        assert!((ratio - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_teapot_proportions() {
        // Handle tip to spout tip spans well beyond the body diameter
        let (min, max) = teapot(1.0, 6).bounds().unwrap();
        assert!(max.x - min.x > 3.0);
        assert!(max.y - min.y > 1.4);
    }

    #[test]
    fn test_more_segments_more_vertices() {
        assert!(teapot(0.8, 12).vertices.len() > teapot(0.8, 6).vertices.len());
    }

    #[test]
    fn test_smooth_curve_hits_control_points() {
        let points = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(2.0, 0.0)];
        let curve = smooth_curve(&points, 4);
        assert_eq!(curve.len(), 9);
        assert_eq!(curve[0], points[0]);
        assert!((curve[4] - points[1]).length() < 1e-6);
        assert_eq!(curve[8], points[2]);
    }

    #[test]
    fn test_resample_endpoints() {
        let r = resample(&[0.2, 0.1], 5);
        assert_eq!(r.len(), 5);
        assert!((r[0] - 0.2).abs() < 1e-6);
        assert!((r[2] - 0.15).abs() < 1e-6);
        assert!((r[4] - 0.1).abs() < 1e-6);
    }
}
