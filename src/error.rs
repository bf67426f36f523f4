//! # Errors and Diagnostics
//!
//! Fatal conditions are [`ConvertError`] values propagated to the conversion
//! entry point. Non-fatal conditions are [`Warning`] values recorded in a
//! [`Diagnostics`] collector; recording one logs it and never changes control
//! flow.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the key=value configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to load {key} from {file}")]
    MissingKey { key: String, file: String },

    #[error("unable to parse variable {key} of {value} as {kind}")]
    InvalidValue {
        key: String,
        value: String,
        kind: &'static str,
    },
}

/// Fatal conversion errors
///
/// Any of these aborts the conversion before the destination database is
/// touched, except [`ConvertError::Database`] which is raised from inside the
/// write transaction and leaves the destination as it was.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unable to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("material {0} has already been defined")]
    DuplicateMaterial(String),

    #[error("no geometry found in {0}")]
    NoGeometry(String),

    #[error("{0} has no texture coordinates")]
    MissingTexCoords(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("can't open database {}: {source}", path.display())]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("corrupt scene database: {0}")]
    CorruptDatabase(String),
}

/// Non-fatal conditions encountered during a conversion
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Warning {
    #[error("unable to open texture {}: {reason}", path.display())]
    TextureRead { path: PathBuf, reason: String },

    #[error("bounding sphere radius = 0 for {node}, clamped to {clamped}")]
    DegenerateBounds { node: String, clamped: f32 },

    #[error("SQL error in {statement}: {reason}")]
    SqlStatement {
        statement: &'static str,
        reason: String,
    },

    #[error("shape {shape} references material {index:?} which is not defined, using the default material")]
    DefaultMaterial { shape: String, index: Option<usize> },

    #[error("unable to put texcoord in {shape}")]
    MissingTexCoord { shape: String },

    #[error("shape {shape} has no triangles and was dropped")]
    EmptyShape { shape: String },

    #[error("name {original} exceeds {limit} bytes and was truncated")]
    NameTruncated { original: String, limit: usize },
}

/// Collects the warnings raised during one conversion run
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning and logs it
    pub fn push(&mut self, warning: Warning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Counts the recorded warnings matching `predicate`
    pub fn count(&self, predicate: impl Fn(&Warning) -> bool) -> usize {
        self.warnings.iter().filter(|w| predicate(w)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_record_in_order() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());

        diagnostics.push(Warning::EmptyShape {
            shape: "a".to_string(),
        });
        diagnostics.push(Warning::DegenerateBounds {
            node: "b".to_string(),
            clamped: 0.1,
        });

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics.count(|w| matches!(w, Warning::DegenerateBounds { .. })),
            1
        );
        assert_eq!(
            diagnostics.warnings()[0],
            Warning::EmptyShape {
                shape: "a".to_string()
            }
        );
    }

    #[test]
    fn test_missing_key_message() {
        let err = ConfigError::MissingKey {
            key: "model.directory".to_string(),
            file: "obj2scene.cfg".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unable to load model.directory from obj2scene.cfg"
        );
    }
}
