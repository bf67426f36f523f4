// src/lib.rs
//! obj2scene
//!
//! Converts Wavefront OBJ models into a SQLite scene database: a flattened
//! vertex table, one scene node per material run with a bounding sphere,
//! the material records and the referenced texture images.

pub mod config;
pub mod convert;
pub mod db;
pub mod error;
pub mod model;
pub mod prelude;
pub mod scene;

// Re-export main types for convenience
pub use convert::{database_path_for, ConversionReport, Converter};
pub use error::{ConfigError, ConvertError, Diagnostics, Warning};
