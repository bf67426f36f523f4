//! # Scene Database
//!
//! SQLite persistence of a converted scene. The database holds four tables:
//!
//! - `vertex` - flattened vertex array, ordered by id
//! - `scene_node` - name, material id, cursor range and bounding sphere per node
//! - `material` - material records, ids in registry order
//! - `texture` - image blobs keyed by file name, placeholder included
//!
//! [`SceneWriter`] replaces these tables in a single transaction and
//! [`SceneDatabase`] reads them back.

pub mod reader;
pub mod schema;
pub mod writer;

pub use reader::{SceneDatabase, StoredMaterial, StoredNode, StoredScene};
pub use writer::{write_scene, SceneWriter, WriteReport};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConvertError, Diagnostics, Warning};
    use crate::model::{Face, FaceVertex, ParsedModel, Shape};
    use crate::scene::{Material, Scene, SceneBuilder, TextureImage, DEFAULT_TEXTURE_NAME};
    use rusqlite::Connection;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_db(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("obj2scene-db-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scene.db");
        let _ = fs::remove_file(&path);
        path
    }

    fn triangle_scene(material: Option<usize>) -> Scene {
        let corner = |i: usize| FaceVertex::new(i, Some(0), Some(i));
        let mut shape = Shape::new("tri");
        shape.faces.push(Face {
            vertices: [corner(0), corner(1), corner(2)],
            material,
        });
        let model = ParsedModel {
            name: "tri.obj".to_string(),
            positions: vec![[0.0, 0.0, 0.0], [3.0, 0.0, 0.0], [0.0, 4.0, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]],
            texcoords: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            shapes: vec![shape],
            materials: vec![Material::new("it's \"quoted\"").with_diffuse(0.25, 0.5, 0.75)],
        };

        let mut diagnostics = Diagnostics::new();
        let mut builder = SceneBuilder::new();
        builder.add_model_identity(&model, &mut diagnostics).unwrap();
        builder.finish(&mut diagnostics).unwrap()
    }

    fn placeholder() -> Vec<TextureImage> {
        vec![TextureImage {
            name: DEFAULT_TEXTURE_NAME.to_string(),
            image: vec![0x89, b'P', b'N', b'G'],
        }]
    }

    #[test]
    fn test_schema_columns() {
        let path = scratch_db("schema");
        let scene = triangle_scene(Some(0));
        write_scene(&path, &scene, &placeholder(), &mut Diagnostics::new()).unwrap();

        let conn = Connection::open(&path).unwrap();
        let columns = |table: &str| -> Vec<(String, String, bool)> {
            let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})")).unwrap();
            let rows = stmt
                .query_map([], |row| Ok((row.get(1)?, row.get(2)?, row.get::<_, i64>(3)? != 0)))
                .unwrap();
            let columns = rows.collect::<rusqlite::Result<Vec<_>>>().unwrap();
            columns
        };

        let vertex = columns("vertex");
        let names: Vec<_> = vertex.iter().map(|c| c.0.as_str()).collect();
        assert_eq!(names, ["id", "px", "py", "pz", "nx", "ny", "nz", "tu", "tv"]);
        assert!(vertex[1..].iter().all(|c| c.1 == "REAL" && c.2));

        let node = columns("scene_node");
        assert_eq!(node[1], ("name".to_string(), "TEXT".to_string(), false));
        assert_eq!(node[2], ("material_id".to_string(), "INTEGER".to_string(), false));
        assert_eq!(node[3], ("start_position".to_string(), "INTEGER".to_string(), true));
        assert!(node[5..].iter().all(|c| c.1 == "REAL" && c.2));

        let material = columns("material");
        assert_eq!(material.len(), 25);
        assert_eq!(material[22], ("ior".to_string(), "INTEGER".to_string(), false));
        assert_eq!(material[24], ("illum".to_string(), "INTEGER".to_string(), false));

        let texture = columns("texture");
        assert_eq!(texture[0], ("name".to_string(), "TEXT".to_string(), true));
        assert_eq!(texture[1], ("image".to_string(), "BLOB".to_string(), true));

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_round_trip_single_triangle() {
        let path = scratch_db("roundtrip");
        let scene = triangle_scene(Some(0));
        let mut diagnostics = Diagnostics::new();
        let report = write_scene(&path, &scene, &placeholder(), &mut diagnostics).unwrap();

        assert_eq!(
            report,
            WriteReport {
                vertex_rows: 3,
                scene_node_rows: 1,
                material_rows: 1,
                texture_rows: 1,
                failed_statements: 0,
            }
        );

        let stored = SceneDatabase::open(&path).unwrap().load_scene().unwrap();
        assert_eq!(stored.vertices.len(), 3);
        let node = &stored.nodes[0];
        assert_eq!((node.start_position, node.end_position), (0, 3));
        assert_eq!(node.material_id, Some(1));
        assert_eq!(stored.node_vertices(node).unwrap(), scene.nodes[0].vertices());
        assert_eq!(node.center, scene.nodes[0].bounds.center);
        assert_eq!(node.radius, scene.nodes[0].bounds.radius);

        // quotes survive because every value is bound
        let material = stored.material(1).unwrap();
        assert_eq!(material.name, "it's \"quoted\"");
        assert_eq!(material.diffuse, [0.25, 0.5, 0.75]);
        assert_eq!(material.ior, 1.0);

        assert_eq!(stored.texture(DEFAULT_TEXTURE_NAME).unwrap().image, placeholder()[0].image);

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_default_material_row_written_when_referenced() {
        let path = scratch_db("default");
        let scene = triangle_scene(Some(5));
        write_scene(&path, &scene, &placeholder(), &mut Diagnostics::new()).unwrap();

        let stored = SceneDatabase::open(&path).unwrap().load_scene().unwrap();
        assert_eq!(stored.nodes[0].material_id, Some(2));
        assert_eq!(stored.materials.len(), 2);
        let default = stored.material(2).unwrap();
        assert_eq!(default.name, crate::scene::material::DEFAULT_MATERIAL_NAME);
        assert!(default.diffuse_texname.is_empty());

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_failed_statement_is_not_fatal() {
        let path = scratch_db("duplicate");
        let scene = triangle_scene(Some(0));
        let mut textures = placeholder();
        textures.push(textures[0].clone());
        textures.push(TextureImage {
            name: "wood.png".to_string(),
            image: vec![1, 2, 3],
        });

        let mut diagnostics = Diagnostics::new();
        let report = write_scene(&path, &scene, &textures, &mut diagnostics).unwrap();

        assert_eq!(report.texture_rows, 2);
        assert_eq!(report.failed_statements, 1);
        assert_eq!(
            diagnostics.count(|w| matches!(w, Warning::SqlStatement { statement: "INSERT INTO texture", .. })),
            1
        );

        let stored = SceneDatabase::open(&path).unwrap().load_scene().unwrap();
        assert_eq!(stored.textures.len(), 2);
        assert_eq!(stored.vertices.len(), 3);

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_rewrite_replaces_previous_scene() {
        let path = scratch_db("rewrite");
        let scene = triangle_scene(Some(0));
        write_scene(&path, &scene, &placeholder(), &mut Diagnostics::new()).unwrap();
        write_scene(&path, &scene, &placeholder(), &mut Diagnostics::new()).unwrap();

        let stored = SceneDatabase::open(&path).unwrap().load_scene().unwrap();
        assert_eq!(stored.vertices.len(), 3);
        assert_eq!(stored.nodes.len(), 1);
        assert_eq!(stored.textures.len(), 1);

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_unopenable_destination_aborts() {
        let path = std::env::temp_dir()
            .join(format!("obj2scene-db-missing-{}", std::process::id()))
            .join("no")
            .join("such")
            .join("scene.db");
        let err = SceneWriter::open(&path).err().unwrap();
        assert!(matches!(err, ConvertError::DatabaseOpen { .. }));

        let err = SceneDatabase::open(&path).err().unwrap();
        assert!(matches!(err, ConvertError::DatabaseOpen { .. }));
    }

    #[test]
    fn test_corrupt_node_range_detected() {
        let path = scratch_db("corrupt");
        let scene = triangle_scene(Some(0));
        write_scene(&path, &scene, &placeholder(), &mut Diagnostics::new()).unwrap();

        let conn = Connection::open(&path).unwrap();
        conn.execute("UPDATE scene_node SET end_position = 30", []).unwrap();
        drop(conn);

        let err = SceneDatabase::open(&path).unwrap().load_scene().unwrap_err();
        assert!(matches!(err, ConvertError::CorruptDatabase(_)));

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }
}
