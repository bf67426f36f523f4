//! # obj2scene Prelude
//!
//! Commonly used types of the converter in one import.
//!
//! ## Usage
//!
//! ```no_run
//! use obj2scene::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("obj2scene.cfg")?;
//!     let report = Converter::from_config(&config)?
//!         .convert("house.obj", std::path::Path::new("house.db"))?;
//!
//!     for warning in report.diagnostics.warnings() {
//!         println!("{warning}");
//!     }
//!     Ok(())
//! }
//! ```

// Conversion pipeline
pub use crate::config::Config;
pub use crate::convert::{database_path_for, ConversionReport, Converter};
pub use crate::error::{ConfigError, ConvertError, Diagnostics, Warning};

// Parsed model and scene types
pub use crate::model::{load_obj, ParsedModel};
pub use crate::scene::{
    BoundingSphere, Material, MaterialRef, MaterialRegistry, Scene, SceneBuilder, SceneNode,
    TextureSet, Vertex,
};

// Persistence
pub use crate::db::{SceneDatabase, SceneWriter, StoredScene, WriteReport};

// Re-export common external dependencies
pub use cgmath::{Matrix4, SquareMatrix, Vector3};
