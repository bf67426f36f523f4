//! # Vertex Data Structures
//!
//! This module defines the vertex record stored in the `vertex` table of a
//! scene database.

/// A 3D vertex with position, normal and texture coordinate data.
///
/// Vertices are produced by the scene builder and owned by exactly one
/// [`SceneNode`](super::SceneNode). They are never modified afterwards.
///
/// # Fields
///
/// - `position`: 3D position coordinates [x, y, z]
/// - `normal`: 3D normal vector [nx, ny, nz], unit length is intended but not enforced
/// - `tex_coords`: texture coordinates [u, v] with v already flipped from the OBJ convention
///
/// # Examples
///
/// ```
/// use obj2scene::scene::Vertex;
///
/// let vertex = Vertex {
///     position: [0.0, 1.0, 0.0],
///     normal: [0.0, 1.0, 0.0],
///     tex_coords: [0.5, 0.5],
/// };
/// assert_eq!(vertex.position[1], 1.0);
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Vertex {
    /// 3D position coordinates [x, y, z]
    pub position: [f32; 3],
    /// 3D normal vector [nx, ny, nz]
    pub normal: [f32; 3],
    /// Texture coordinates [u, v]
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Builds a vertex from the eight REAL columns of a `vertex` row.
    #[allow(clippy::too_many_arguments)]
    pub fn from_f64(px: f64, py: f64, pz: f64, nx: f64, ny: f64, nz: f64, tu: f64, tv: f64) -> Self {
        Self {
            position: [px as f32, py as f32, pz as f32],
            normal: [nx as f32, ny as f32, nz as f32],
            tex_coords: [tu as f32, tv as f32],
        }
    }
}
