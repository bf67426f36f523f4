//! Persists a finished [`Scene`] into the scene database schema
//!
//! The whole write runs in one exclusive transaction: drop and recreate the
//! four tables, insert vertices, scene nodes, materials and textures, commit.
//! A statement that fails is recorded as a [`Warning::SqlStatement`] and the
//! write moves on; only failing to open the file or to begin or commit the
//! transaction is fatal.

use std::path::{Path, PathBuf};

use rusqlite::{params, CachedStatement, Connection, Transaction, TransactionBehavior};

use crate::error::{ConvertError, Diagnostics, Warning};
use crate::scene::{Material, MaterialRef, Scene, TextureImage};

use super::schema;

/// Row counts of a completed write
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteReport {
    pub vertex_rows: usize,
    pub scene_node_rows: usize,
    pub material_rows: usize,
    pub texture_rows: usize,
    pub failed_statements: usize,
}

impl WriteReport {
    fn statement_failed(
        &mut self,
        statement: &'static str,
        err: rusqlite::Error,
        diagnostics: &mut Diagnostics,
    ) {
        self.failed_statements += 1;
        diagnostics.push(Warning::SqlStatement {
            statement,
            reason: err.to_string(),
        });
    }
}

/// An open destination database
pub struct SceneWriter {
    path: PathBuf,
    conn: Connection,
}

impl SceneWriter {
    /// Opens or creates the database at `path`
    pub fn open(path: &Path) -> Result<Self, ConvertError> {
        let conn = Connection::open(path).map_err(|source| ConvertError::DatabaseOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            conn,
        })
    }

    /// Replaces the scene tables with `scene` and `textures`
    ///
    /// `textures` is the resolved texture set, placeholder included. The
    /// connection is closed when this returns, on success and failure.
    pub fn write(
        mut self,
        scene: &Scene,
        textures: &[TextureImage],
        diagnostics: &mut Diagnostics,
    ) -> Result<WriteReport, ConvertError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Exclusive)?;
        let mut report = WriteReport::default();

        create_schema(&tx, &mut report, diagnostics);
        let vertex_rows = insert_vertices(&tx, scene, &mut report, diagnostics);
        let scene_node_rows = insert_scene_nodes(&tx, scene, &mut report, diagnostics);
        let material_rows = insert_materials(&tx, scene, &mut report, diagnostics);
        let texture_rows = insert_textures(&tx, textures, &mut report, diagnostics);
        report.vertex_rows = vertex_rows;
        report.scene_node_rows = scene_node_rows;
        report.material_rows = material_rows;
        report.texture_rows = texture_rows;

        tx.commit()?;
        log::info!(
            "Done writing database {}: {} vertices, {} scene nodes, {} materials, {} textures",
            self.path.display(),
            report.vertex_rows,
            report.scene_node_rows,
            report.material_rows,
            report.texture_rows
        );
        Ok(report)
    }
}

/// Opens `path` and writes `scene` into it
pub fn write_scene(
    path: &Path,
    scene: &Scene,
    textures: &[TextureImage],
    diagnostics: &mut Diagnostics,
) -> Result<WriteReport, ConvertError> {
    SceneWriter::open(path)?.write(scene, textures, diagnostics)
}

fn create_schema(tx: &Transaction<'_>, report: &mut WriteReport, diagnostics: &mut Diagnostics) {
    for sql in schema::DROP_TABLES {
        if let Err(err) = tx.execute(sql, []) {
            report.statement_failed("DROP TABLE", err, diagnostics);
        }
    }
    for sql in schema::CREATE_TABLES {
        if let Err(err) = tx.execute(sql, []) {
            report.statement_failed("CREATE TABLE", err, diagnostics);
        }
    }
}

/// Runs `bind` once per row on a cached statement for `sql`
///
/// # Returns
/// The number of rows inserted
fn insert_all<I, F>(
    tx: &Transaction<'_>,
    statement: &'static str,
    sql: &str,
    rows: I,
    mut bind: F,
    report: &mut WriteReport,
    diagnostics: &mut Diagnostics,
) -> usize
where
    I: IntoIterator,
    F: FnMut(&mut CachedStatement<'_>, I::Item) -> rusqlite::Result<usize>,
{
    let mut stmt = match tx.prepare_cached(sql) {
        Ok(stmt) => stmt,
        Err(err) => {
            report.statement_failed(statement, err, diagnostics);
            return 0;
        }
    };

    let mut inserted = 0;
    for row in rows {
        match bind(&mut stmt, row) {
            Ok(_) => inserted += 1,
            Err(err) => report.statement_failed(statement, err, diagnostics),
        }
    }
    inserted
}

fn insert_vertices(
    tx: &Transaction<'_>,
    scene: &Scene,
    report: &mut WriteReport,
    diagnostics: &mut Diagnostics,
) -> usize {
    insert_all(
        tx,
        "INSERT INTO vertex",
        schema::INSERT_VERTEX,
        scene.vertices(),
        |stmt, v| {
            stmt.execute(params![
                f64::from(v.position[0]),
                f64::from(v.position[1]),
                f64::from(v.position[2]),
                f64::from(v.normal[0]),
                f64::from(v.normal[1]),
                f64::from(v.normal[2]),
                f64::from(v.tex_coords[0]),
                f64::from(v.tex_coords[1]),
            ])
        },
        report,
        diagnostics,
    )
}

fn insert_scene_nodes(
    tx: &Transaction<'_>,
    scene: &Scene,
    report: &mut WriteReport,
    diagnostics: &mut Diagnostics,
) -> usize {
    let material_count = scene.materials.len();
    insert_all(
        tx,
        "INSERT INTO scene_node",
        schema::INSERT_SCENE_NODE,
        &scene.nodes,
        |stmt, node| {
            stmt.execute(params![
                node.name,
                node.material.row_id(material_count),
                node.start_position as i64,
                node.end_position as i64,
                f64::from(node.bounds.radius),
                f64::from(node.bounds.center[0]),
                f64::from(node.bounds.center[1]),
                f64::from(node.bounds.center[2]),
            ])
        },
        report,
        diagnostics,
    )
}

fn insert_materials(
    tx: &Transaction<'_>,
    scene: &Scene,
    report: &mut WriteReport,
    diagnostics: &mut Diagnostics,
) -> usize {
    let material_count = scene.materials.len();
    let default_material = scene.uses_default_material().then(Material::default);

    let rows = scene
        .materials
        .materials()
        .iter()
        .enumerate()
        .map(|(i, material)| (i as i64 + 1, material))
        .chain(
            default_material
                .iter()
                .map(|material| (MaterialRef::Default.row_id(material_count), material)),
        );

    insert_all(
        tx,
        "INSERT INTO material",
        schema::INSERT_MATERIAL,
        rows,
        |stmt, (id, m)| {
            stmt.execute(params![
                id,
                m.name,
                m.normal_texname,
                f64::from(m.dissolve),
                f64::from(m.diffuse[0]),
                f64::from(m.diffuse[1]),
                f64::from(m.diffuse[2]),
                f64::from(m.transmittance[0]),
                f64::from(m.transmittance[1]),
                f64::from(m.transmittance[2]),
                f64::from(m.emission[0]),
                f64::from(m.emission[1]),
                f64::from(m.emission[2]),
                f64::from(m.shininess),
                m.specular_texname,
                f64::from(m.specular[0]),
                f64::from(m.specular[1]),
                f64::from(m.specular[2]),
                m.diffuse_texname,
                f64::from(m.ambient[0]),
                f64::from(m.ambient[1]),
                f64::from(m.ambient[2]),
                f64::from(m.ior),
                m.ambient_texname,
                m.illum,
            ])
        },
        report,
        diagnostics,
    )
}

fn insert_textures(
    tx: &Transaction<'_>,
    textures: &[TextureImage],
    report: &mut WriteReport,
    diagnostics: &mut Diagnostics,
) -> usize {
    insert_all(
        tx,
        "INSERT INTO texture",
        schema::INSERT_TEXTURE,
        textures,
        |stmt, texture| stmt.execute(params![texture.name, texture.image]),
        report,
        diagnostics,
    )
}
