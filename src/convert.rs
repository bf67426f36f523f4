//! # Conversion Entry Point
//!
//! [`Converter`] runs one OBJ model through the whole pipeline: parse, build
//! scene nodes, bound them, resolve textures and persist the result. The
//! destination database is only opened once the in-memory scene is complete,
//! so a fatal build error never leaves a database behind.
//!
//! ## Usage
//!
//! ```no_run
//! use obj2scene::config::Config;
//! use obj2scene::convert::{database_path_for, Converter};
//!
//! let config = Config::load("obj2scene.cfg").unwrap();
//! let converter = Converter::from_config(&config).unwrap();
//! let destination = database_path_for("house.obj").unwrap();
//! let report = converter.convert("house.obj", &destination).unwrap();
//! println!("{} scene nodes written", report.nodes);
//! ```

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::db::{write_scene, WriteReport};
use crate::error::{ConfigError, ConvertError, Diagnostics};
use crate::model::load_obj;
use crate::scene::SceneBuilder;

pub const MODEL_DIRECTORY_KEY: &str = "model.directory";
pub const TEXTURE_DIRECTORY_KEY: &str = "texture.directory";

/// Summary of a finished conversion
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub nodes: usize,
    pub vertices: usize,
    pub materials: usize,
    /// Texture rows resolved, placeholder included
    pub textures: usize,
    pub write: WriteReport,
    pub diagnostics: Diagnostics,
}

/// Converts models found in one directory, resolving textures in another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converter {
    model_directory: PathBuf,
    texture_directory: PathBuf,
}

impl Converter {
    pub fn new(model_directory: impl Into<PathBuf>, texture_directory: impl Into<PathBuf>) -> Self {
        Self {
            model_directory: model_directory.into(),
            texture_directory: texture_directory.into(),
        }
    }

    /// Reads both directories from `config`; a missing key is an error
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.get_var(MODEL_DIRECTORY_KEY)?,
            config.get_var(TEXTURE_DIRECTORY_KEY)?,
        ))
    }

    pub fn model_directory(&self) -> &Path {
        &self.model_directory
    }

    pub fn texture_directory(&self) -> &Path {
        &self.texture_directory
    }

    /// Converts `file_name`, relative to the model directory, into a scene
    /// database at `destination`
    ///
    /// # Arguments
    /// * `file_name` - OBJ file name, resolved against the model directory
    /// * `destination` - Database path; its scene tables are replaced
    ///
    /// # Returns
    /// A [`ConversionReport`] carrying the row counts and every non-fatal
    /// warning raised along the way
    pub fn convert(&self, file_name: &str, destination: &Path) -> Result<ConversionReport, ConvertError> {
        let mut diagnostics = Diagnostics::new();

        log::info!(
            "Converting {} from {}",
            file_name,
            self.model_directory.display()
        );
        let model = load_obj(&self.model_directory, file_name)?;

        let mut builder = SceneBuilder::new();
        builder.add_model_identity(&model, &mut diagnostics)?;
        let scene = builder.finish(&mut diagnostics)?;

        let textures = scene
            .textures
            .resolve(&self.texture_directory, &mut diagnostics);

        let write = write_scene(destination, &scene, &textures, &mut diagnostics)?;

        let report = ConversionReport {
            nodes: scene.nodes.len(),
            vertices: scene.vertex_count(),
            materials: scene.materials.len(),
            textures: textures.len(),
            write,
            diagnostics,
        };
        log::info!(
            "Converted {} into {} with {} warnings",
            file_name,
            destination.display(),
            report.diagnostics.len()
        );
        Ok(report)
    }
}

/// Database path for a model path: a trailing `.obj` becomes `.db`
///
/// Returns `None` when `input` does not end in `.obj` or has nothing before
/// the extension.
pub fn database_path_for(input: &str) -> Option<PathBuf> {
    let stem = input.strip_suffix(".obj")?;
    if stem.is_empty() {
        return None;
    }
    Some(PathBuf::from(format!("{stem}.db")))
}
