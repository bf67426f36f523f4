//! Reads a scene database back into memory
//!
//! This is the viewer side of the persisted contract: vertices ordered by id
//! form the flattened vertex array that scene node cursors index into.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, Row};

use crate::error::ConvertError;
use crate::scene::{Material, TextureImage, Vertex};

use super::schema;

/// A row of the `scene_node` table
#[derive(Debug, Clone, PartialEq)]
pub struct StoredNode {
    pub name: String,
    pub material_id: Option<i64>,
    pub start_position: usize,
    pub end_position: usize,
    pub radius: f32,
    pub center: [f32; 3],
}

/// A row of the `material` table with its id
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMaterial {
    pub id: i64,
    pub material: Material,
}

/// Contents of a scene database
#[derive(Debug, Clone, Default)]
pub struct StoredScene {
    pub vertices: Vec<Vertex>,
    pub nodes: Vec<StoredNode>,
    pub materials: Vec<StoredMaterial>,
    pub textures: Vec<TextureImage>,
}

impl StoredScene {
    /// The vertices covered by a node's cursor range
    pub fn node_vertices(&self, node: &StoredNode) -> Result<&[Vertex], ConvertError> {
        self.vertices
            .get(node.start_position..node.end_position)
            .ok_or_else(|| {
                ConvertError::CorruptDatabase(format!(
                    "scene node {} covers {}..{} but there are {} vertices",
                    node.name,
                    node.start_position,
                    node.end_position,
                    self.vertices.len()
                ))
            })
    }

    /// Looks up a material by its row id
    pub fn material(&self, id: i64) -> Option<&Material> {
        self.materials
            .iter()
            .find(|stored| stored.id == id)
            .map(|stored| &stored.material)
    }

    pub fn texture(&self, name: &str) -> Option<&TextureImage> {
        self.textures.iter().find(|texture| texture.name == name)
    }
}

/// Read-only handle on an existing scene database
pub struct SceneDatabase {
    path: PathBuf,
    conn: Connection,
}

impl SceneDatabase {
    /// Opens an existing database; a missing file is an error
    pub fn open(path: &Path) -> Result<Self, ConvertError> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| ConvertError::DatabaseOpen {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            conn,
        })
    }

    /// Loads all four tables
    pub fn load_scene(&self) -> Result<StoredScene, ConvertError> {
        let vertices = self.query(schema::SELECT_VERTICES, |row| {
            Ok(Vertex::from_f64(
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
            ))
        })?;
        let nodes = self.query(schema::SELECT_SCENE_NODES, scene_node_from_row)?;
        let materials = self.query(schema::SELECT_MATERIALS, material_from_row)?;
        let textures = self.query(schema::SELECT_TEXTURES, |row| {
            Ok(TextureImage {
                name: row.get(0)?,
                image: row.get(1)?,
            })
        })?;

        for node in &nodes {
            if node.start_position > node.end_position || node.end_position > vertices.len() {
                return Err(ConvertError::CorruptDatabase(format!(
                    "scene node {} covers {}..{} but there are {} vertices",
                    node.name,
                    node.start_position,
                    node.end_position,
                    vertices.len()
                )));
            }
        }

        log::info!(
            "Loaded {} vertices in {} scene nodes from {}",
            vertices.len(),
            nodes.len(),
            self.path.display()
        );
        Ok(StoredScene {
            vertices,
            nodes,
            materials,
            textures,
        })
    }

    fn query<T, F>(&self, sql: &str, map: F) -> Result<Vec<T>, ConvertError>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], map)?;
        let values = rows.collect::<rusqlite::Result<Vec<T>>>()?;
        Ok(values)
    }
}

fn scene_node_from_row(row: &Row<'_>) -> rusqlite::Result<StoredNode> {
    let start: i64 = row.get(2)?;
    let end: i64 = row.get(3)?;
    let radius: f64 = row.get(4)?;
    let center: [f64; 3] = [row.get(5)?, row.get(6)?, row.get(7)?];
    Ok(StoredNode {
        name: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
        material_id: row.get(1)?,
        start_position: start.max(0) as usize,
        end_position: end.max(0) as usize,
        radius: radius as f32,
        center: center.map(|c| c as f32),
    })
}

fn material_from_row(row: &Row<'_>) -> rusqlite::Result<StoredMaterial> {
    let text = |i: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(i)?.unwrap_or_default())
    };
    let real = |i: usize, default: f32| -> rusqlite::Result<f32> {
        Ok(row.get::<_, Option<f64>>(i)?.map_or(default, |v| v as f32))
    };
    let rgb = |i: usize| -> rusqlite::Result<[f32; 3]> {
        Ok([real(i, 0.0)?, real(i + 1, 0.0)?, real(i + 2, 0.0)?])
    };

    let material = Material {
        name: text(1)?,
        normal_texname: text(2)?,
        dissolve: real(3, 1.0)?,
        diffuse: rgb(4)?,
        transmittance: rgb(7)?,
        emission: rgb(10)?,
        shininess: real(13, 1.0)?,
        specular_texname: text(14)?,
        specular: rgb(15)?,
        diffuse_texname: text(18)?,
        ambient: rgb(19)?,
        ior: real(22, 1.0)?,
        ambient_texname: text(23)?,
        illum: row.get::<_, Option<i64>>(24)?.unwrap_or(0) as i32,
    };
    Ok(StoredMaterial {
        id: row.get(0)?,
        material,
    })
}
