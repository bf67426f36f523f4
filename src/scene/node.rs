use std::ops::Range;

use cgmath::{Matrix4, SquareMatrix, Vector3};

use super::{bounds::BoundingSphere, material::MaterialRef, vertex::Vertex};

/// One shape's run of triangles sharing a single material
///
/// The vertex list is a triangle list owned exclusively by this node; it is
/// never empty and its length is always a multiple of 3. `start_position..
/// end_position` is the node's slice of the flattened vertex array of the
/// whole scene.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub material: MaterialRef,
    vertices: Vec<Vertex>,
    pub transform: Matrix4<f32>, // cgmath 4x4 transformation matrix
    pub start_position: usize,
    pub end_position: usize,
    pub bounds: BoundingSphere,
}

impl SceneNode {
    /// Create a node whose vertices start at `start_position` in the scene's
    /// vertex array. Bounds stay at their default until the scene is finished.
    pub(crate) fn new(
        name: &str,
        material: MaterialRef,
        vertices: Vec<Vertex>,
        transform: Matrix4<f32>,
        start_position: usize,
    ) -> Self {
        debug_assert!(!vertices.is_empty() && vertices.len() % 3 == 0);
        let end_position = start_position + vertices.len();
        Self {
            name: name.to_string(),
            material,
            vertices,
            transform,
            start_position,
            end_position,
            bounds: BoundingSphere::default(),
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Cursor range into the flattened vertex array
    pub fn range(&self) -> Range<usize> {
        self.start_position..self.end_position
    }

    /// Set translation
    pub fn set_translation(&mut self, translation: Vector3<f32>) {
        self.transform = Matrix4::from_translation(translation);
    }

    /// Reset to identity matrix
    pub fn reset_transform(&mut self) {
        self.transform = Matrix4::identity();
    }
}
