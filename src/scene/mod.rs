//! # Scene Module
//!
//! In-memory scene produced from parsed models and written to a scene
//! database.
//!
//! ## Key Components
//!
//! - [`SceneBuilder`] - Splits shapes into scene nodes, one per material run
//! - [`MaterialRegistry`] - Name-keyed, insertion-ordered material store
//! - [`SceneNode`] - A run of triangles with its material, cursor range and bounds
//! - [`BoundingSphere`] - Centroid and enclosing radius of a node
//! - [`TextureSet`] - Deduplicated texture file names and their resolution
//! - [`Vertex`] - Position, normal and texture coordinate record
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use obj2scene::error::Diagnostics;
//! use obj2scene::model::load_obj;
//! use obj2scene::scene::SceneBuilder;
//!
//! let mut diagnostics = Diagnostics::new();
//! let model = load_obj(Path::new("models"), "house.obj").unwrap();
//!
//! let mut builder = SceneBuilder::new();
//! builder.add_model_identity(&model, &mut diagnostics).unwrap();
//! let scene = builder.finish(&mut diagnostics).unwrap();
//! println!("{} nodes, {} vertices", scene.nodes.len(), scene.vertex_count());
//! ```

pub mod bounds;
pub mod builder;
pub mod material;
pub mod node;
pub mod texture;
pub mod vertex;

// Re-export main types
pub use bounds::BoundingSphere;
pub use builder::SceneBuilder;
pub use material::{Material, MaterialRef, MaterialRegistry};
pub use node::SceneNode;
pub use texture::{TextureImage, TextureSet, DEFAULT_TEXTURE_NAME};
pub use vertex::Vertex;

/// A finished scene: nodes with bounds, their materials and referenced textures
#[derive(Debug)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    pub materials: MaterialRegistry,
    pub textures: TextureSet,
}

impl Scene {
    /// All vertices in node order; node cursor ranges index into this sequence
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.nodes.iter().flat_map(|node| node.vertices())
    }

    pub fn vertex_count(&self) -> usize {
        self.nodes.iter().map(SceneNode::vertex_count).sum()
    }

    /// Whether any node falls back to the default material
    pub fn uses_default_material(&self) -> bool {
        self.nodes
            .iter()
            .any(|node| node.material == MaterialRef::Default)
    }
}
