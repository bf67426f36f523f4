//! # Parsed Model Data
//!
//! The scene builder consumes models in the shape described here: global
//! position, normal and texture coordinate arrays plus triangulated shapes
//! whose face corners index into them. [`load_obj`] produces this from a
//! Wavefront OBJ file; tests and other front ends can build it directly.

pub mod obj;

pub use obj::load_obj;

use crate::scene::Material;

/// One corner of a triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceVertex {
    /// Index into [`ParsedModel::positions`]
    pub position: usize,
    /// Index into [`ParsedModel::normals`], if the corner has a normal
    pub normal: Option<usize>,
    /// Index into [`ParsedModel::texcoords`], if the corner has one
    pub texcoord: Option<usize>,
}

impl FaceVertex {
    pub fn new(position: usize, normal: Option<usize>, texcoord: Option<usize>) -> Self {
        Self {
            position,
            normal,
            texcoord,
        }
    }
}

/// A triangle and the index of its material in [`ParsedModel::materials`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub vertices: [FaceVertex; 3],
    pub material: Option<usize>,
}

/// A named group of triangulated faces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub name: String,
    pub faces: Vec<Face>,
}

impl Shape {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            faces: Vec::new(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }
}

/// Geometry, shapes and materials of one source model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedModel {
    /// Name used in diagnostics, usually the file name
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub texcoords: Vec<[f32; 2]>,
    pub shapes: Vec<Shape>,
    pub materials: Vec<Material>,
}

impl ParsedModel {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.shapes.iter().map(Shape::triangle_count).sum()
    }
}
