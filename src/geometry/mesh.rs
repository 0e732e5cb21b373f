use glam::{Mat3, Mat4, Vec3};

/// Vertex layout shared by every mesh pipeline
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            position,
            normal,
            color,
        }
    }
}

/// Indexed triangle list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Flat plane in XZ facing +Y, centred on the origin
    pub fn plane(width: f32, depth: f32) -> Self {
        let (hw, hd) = (width * 0.5, depth * 0.5);
        let up = [0.0, 1.0, 0.0];
        let white = [1.0, 1.0, 1.0];
        let vertices = vec![
            Vertex::new([-hw, 0.0, -hd], up, white),
            Vertex::new([hw, 0.0, -hd], up, white),
            Vertex::new([hw, 0.0, hd], up, white),
            Vertex::new([-hw, 0.0, hd], up, white),
        ];
        // Counter-clockwise seen from above
        let indices = vec![0, 2, 1, 0, 3, 2];
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append another mesh, rebasing its indices
    pub fn append(&mut self, other: &MeshData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Transform positions by `matrix` and normals by its inverse transpose
    pub fn transform(&mut self, matrix: Mat4) {
        let normal_matrix = Mat3::from_mat4(matrix).inverse().transpose();
        for v in &mut self.vertices {
            v.position = matrix.transform_point3(Vec3::from_array(v.position)).to_array();
            v.normal = (normal_matrix * Vec3::from_array(v.normal))
                .normalize_or_zero()
                .to_array();
        }
    }

    /// Replace every vertex colour
    pub fn set_color(&mut self, color: [f32; 3]) {
        for v in &mut self.vertices {
            v.color = color;
        }
    }

    /// Axis-aligned bounds, or `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.vertices.iter().map(|v| Vec3::from_array(v.position));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    /// Rebuild smooth normals from area-weighted face normals
    pub fn recompute_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.vertices.len()];

        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let pa = Vec3::from_array(self.vertices[a].position);
            let pb = Vec3::from_array(self.vertices[b].position);
            let pc = Vec3::from_array(self.vertices[c].position);
            // Cross product length is twice the area, which gives the weighting
            let face = (pb - pa).cross(pc - pa);
            accum[a] += face;
            accum[b] += face;
            accum[c] += face;
        }

        for (v, n) in self.vertices.iter_mut().zip(accum) {
            let n = n.normalize_or_zero();
            v.normal = if n == Vec3::ZERO { Vec3::Y } else { n }.to_array();
        }
    }
}
