use glam::{Mat4, Vec3, Vec4};

/// Joint list of a skin and the matching inverse bind matrices
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Skin {
    /// Skeleton node index of each joint, in skin order
    pub joints: Vec<usize>,
    pub inverse_bind: Vec<Mat4>,
}

/// Build the joint palette: node global * inverse bind, per joint in skin order
pub fn joint_palette(skin: &Skin, globals: &[Mat4]) -> Vec<Mat4> {
    skin.joints
        .iter()
        .enumerate()
        .map(|(i, &node)| {
            let global = globals.get(node).copied().unwrap_or(Mat4::IDENTITY);
            let ibm = skin.inverse_bind.get(i).copied().unwrap_or(Mat4::IDENTITY);
            global * ibm
        })
        .collect()
}

/// Linear blend skinning of one vertex. Joint indices outside the palette are
/// skipped; if no weight lands the vertex is returned unchanged.
pub fn skin_vertex(
    position: Vec3,
    normal: Vec3,
    joints: [u16; 4],
    weights: [f32; 4],
    palette: &[Mat4],
) -> (Vec3, Vec3) {
    let mut blended = Mat4::ZERO;
    let mut total = 0.0;
    for (&joint, &weight) in joints.iter().zip(weights.iter()) {
        if weight <= 0.0 {
            continue;
        }
        if let Some(m) = palette.get(joint as usize) {
            blended += *m * weight;
            total += weight;
        }
    }
    if total <= 0.0 {
        return (position, normal);
    }
    blended = blended * (1.0 / total);

    let p = blended * Vec4::new(position.x, position.y, position.z, 1.0);
    let n = blended * Vec4::new(normal.x, normal.y, normal.z, 0.0);
    (p.truncate(), n.truncate().normalize_or_zero())
}
