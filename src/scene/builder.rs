//! # Scene Node Builder
//!
//! Walks the shapes of parsed models and turns every run of triangles that
//! shares one material into a [`SceneNode`]. Nodes are laid out back to back
//! in the order they are discovered, so their cursor ranges tile a single
//! flattened vertex array.
//!
//! ## Per vertex
//!
//! - Positions are copied from the model.
//! - Normals are copied when the corner has an in-range normal index;
//!   otherwise the whole triangle gets the face normal
//!   `normalize(edge2 × edge1)` with `edge1 = v1 - v0` and `edge2 = v2 - v0`.
//! - Texture coordinates are copied with `v' = 1 - v`; a corner without one
//!   gets `(0, 0)` and a [`Warning::MissingTexCoord`].

use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3};

use crate::error::{ConvertError, Diagnostics, Warning};
use crate::model::{Face, ParsedModel, Shape};

use super::{
    bounds::BoundingSphere,
    material::{MaterialRef, MaterialRegistry},
    node::SceneNode,
    texture::TextureSet,
    vertex::Vertex,
    Scene,
};

/// Accumulates materials, textures and scene nodes from one or more models
#[derive(Debug, Default)]
pub struct SceneBuilder {
    materials: MaterialRegistry,
    textures: TextureSet,
    nodes: Vec<SceneNode>,
    start_position: usize,
}

/// Triangles collected for the node currently being built
struct NodeAccumulator {
    material: MaterialRef,
    vertices: Vec<Vertex>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    pub fn textures(&self) -> &TextureSet {
        &self.textures
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// Adds the materials and geometry of a model
    ///
    /// # Arguments
    /// * `model` - Parsed model; its face material indices are local to it
    /// * `transform` - Stored on every node created from this model
    /// * `diagnostics` - Receives the non-fatal conditions
    ///
    /// # Returns
    /// The number of scene nodes created, or a fatal error for a duplicate
    /// material name, a model without texture coordinates or a face corner
    /// whose position index is out of range.
    pub fn add_model(
        &mut self,
        model: &ParsedModel,
        transform: Matrix4<f32>,
        diagnostics: &mut Diagnostics,
    ) -> Result<usize, ConvertError> {
        if model.triangle_count() > 0 && model.texcoords.is_empty() {
            return Err(ConvertError::MissingTexCoords(model.name.clone()));
        }

        let material_base = self.materials.len();
        for material in &model.materials {
            self.materials
                .add_material(material.clone(), &mut self.textures, diagnostics)?;
        }
        let material_count = model.materials.len();

        let nodes_before = self.nodes.len();
        for shape in &model.shapes {
            if shape.faces.is_empty() {
                diagnostics.push(Warning::EmptyShape {
                    shape: shape.name.clone(),
                });
                continue;
            }
            self.add_shape(model, shape, transform, material_base, material_count, diagnostics)?;
        }

        let created = self.nodes.len() - nodes_before;
        log::debug!("{}: created {} scene nodes", model.name, created);
        Ok(created)
    }

    /// Convenience for [`add_model`](Self::add_model) with an identity transform
    pub fn add_model_identity(
        &mut self,
        model: &ParsedModel,
        diagnostics: &mut Diagnostics,
    ) -> Result<usize, ConvertError> {
        self.add_model(model, Matrix4::identity(), diagnostics)
    }

    fn add_shape(
        &mut self,
        model: &ParsedModel,
        shape: &Shape,
        transform: Matrix4<f32>,
        material_base: usize,
        material_count: usize,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), ConvertError> {
        let mut current: Option<NodeAccumulator> = None;

        for face in &shape.faces {
            let local = face.material.filter(|&index| index < material_count);
            let material = self
                .materials
                .resolve_material_id(local.map(|index| material_base + index));

            if material == MaterialRef::Default {
                diagnostics.push(Warning::DefaultMaterial {
                    shape: shape.name.clone(),
                    index: face.material,
                });
            }

            if current.as_ref().map(|node| node.material) != Some(material) {
                if let Some(node) = current.take() {
                    self.finish_node(&shape.name, node, transform);
                }
                current = Some(NodeAccumulator {
                    material,
                    vertices: Vec::new(),
                });
            }

            let vertices = triangle_vertices(model, shape, face, diagnostics)?;
            if let Some(node) = current.as_mut() {
                node.vertices.extend(vertices);
            }
        }

        if let Some(node) = current {
            self.finish_node(&shape.name, node, transform);
        }
        Ok(())
    }

    fn finish_node(&mut self, name: &str, node: NodeAccumulator, transform: Matrix4<f32>) {
        let scene_node = SceneNode::new(
            name,
            node.material,
            node.vertices,
            transform,
            self.start_position,
        );
        self.start_position = scene_node.end_position;
        self.nodes.push(scene_node);
    }

    /// Computes the bounding spheres and hands out the finished scene
    ///
    /// Fails with [`ConvertError::NoGeometry`] when no model contributed a
    /// single triangle.
    pub fn finish(mut self, diagnostics: &mut Diagnostics) -> Result<Scene, ConvertError> {
        if self.nodes.is_empty() {
            return Err(ConvertError::NoGeometry(
                "unable to build a scene without triangles".to_string(),
            ));
        }

        for node in self.nodes.iter_mut() {
            let (bounds, clamped) = BoundingSphere::from_vertices(node.vertices());
            if clamped {
                diagnostics.push(Warning::DegenerateBounds {
                    node: node.name.clone(),
                    clamped: bounds.radius,
                });
            }
            log::debug!(
                "Scene node {} ({} vertices) centered at ({:.3}, {:.3}, {:.3}), radius {:.3}",
                node.name,
                node.vertex_count(),
                bounds.center[0],
                bounds.center[1],
                bounds.center[2],
                bounds.radius
            );
            node.bounds = bounds;
        }

        Ok(Scene {
            nodes: self.nodes,
            materials: self.materials,
            textures: self.textures,
        })
    }
}

fn triangle_vertices(
    model: &ParsedModel,
    shape: &Shape,
    face: &Face,
    diagnostics: &mut Diagnostics,
) -> Result<[Vertex; 3], ConvertError> {
    let mut positions = [[0.0_f32; 3]; 3];
    for (position, corner) in positions.iter_mut().zip(&face.vertices) {
        *position = *model
            .positions
            .get(corner.position)
            .ok_or_else(|| ConvertError::Parse {
                path: model.name.clone().into(),
                message: format!(
                    "shape {} references position {} of {}",
                    shape.name,
                    corner.position,
                    model.positions.len()
                ),
            })?;
    }

    let has_normals = face
        .vertices
        .iter()
        .all(|corner| corner.normal.is_some_and(|n| n < model.normals.len()));
    let computed_normal = if has_normals {
        None
    } else {
        Some(face_normal(&positions))
    };

    let mut vertices = [Vertex::default(); 3];
    for ((vertex, corner), position) in vertices.iter_mut().zip(&face.vertices).zip(positions) {
        vertex.position = position;
        vertex.normal = match (computed_normal, corner.normal) {
            (Some(normal), _) => normal,
            (None, Some(index)) => model.normals[index],
            (None, None) => [0.0; 3],
        };
        vertex.tex_coords = match corner.texcoord.and_then(|t| model.texcoords.get(t)) {
            Some(&[u, v]) => [u, 1.0 - v],
            None => {
                diagnostics.push(Warning::MissingTexCoord {
                    shape: shape.name.clone(),
                });
                [0.0, 0.0]
            }
        };
    }
    Ok(vertices)
}

/// Normal shared by all three corners of a triangle without usable normals
///
/// A zero-area triangle yields the zero vector.
pub fn face_normal(positions: &[[f32; 3]; 3]) -> [f32; 3] {
    let v0 = Vector3::from(positions[0]);
    let v1 = Vector3::from(positions[1]);
    let v2 = Vector3::from(positions[2]);

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let normal = edge2.cross(edge1);

    if normal.magnitude2() > 0.0 {
        normal.normalize().into()
    } else {
        [0.0; 3]
    }
}
