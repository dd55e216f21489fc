//! Indexed triangle mesh

use nalgebra::Vector3;

/// A model-space vertex position
pub type Vertex = Vector3<f32>;

/// A triangle face defined by three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self { indices: [a, b, c] }
    }

    /// The indices, if every one of them addresses one of `vertex_count` vertices
    pub fn checked(&self, vertex_count: usize) -> Option<[usize; 3]> {
        if self.indices.iter().all(|&i| i < vertex_count) {
            Some(self.indices)
        } else {
            None
        }
    }
}

/// A 3D mesh: vertex positions plus triangles indexing into them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, triangles: Vec<Triangle>) -> Self {
        Self { vertices, triangles }
    }

    /// A mesh with nothing to draw
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.triangles.is_empty()
    }

    /// Axis-aligned bounds as (min, max), or `None` without vertices
    pub fn bounds(&self) -> Option<(Vertex, Vertex)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.inf(v), max.sup(v))
        }))
    }

    /// Create a simple cube mesh for testing
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let vertices = vec![
            // Front face
            Vertex::new(-half, -half, half),
            Vertex::new(half, -half, half),
            Vertex::new(half, half, half),
            Vertex::new(-half, half, half),
            // Back face
            Vertex::new(-half, -half, -half),
            Vertex::new(half, -half, -half),
            Vertex::new(half, half, -half),
            Vertex::new(-half, half, -half),
        ];

        let triangles = [
            [0, 1, 2], [2, 3, 0], // front
            [4, 6, 5], [6, 4, 7], // back
            [4, 0, 3], [3, 7, 4], // left
            [1, 5, 6], [6, 2, 1], // right
            [3, 2, 6], [6, 7, 3], // top
            [4, 5, 1], [1, 0, 4], // bottom
        ]
        .into_iter()
        .map(|[a, b, c]| Triangle::new(a, b, c))
        .collect();

        Self::new(vertices, triangles)
    }
}
