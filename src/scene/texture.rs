//! # Texture Resolution
//!
//! Texture file names referenced by materials are collected in a
//! [`TextureSet`] and read from the texture directory once per unique name
//! when the scene is written. The [`DEFAULT_TEXTURE_NAME`] placeholder is
//! always resolved as well so every database has a fallback image row.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Diagnostics, Warning};

/// Placeholder image that is always written to the `texture` table
pub const DEFAULT_TEXTURE_NAME: &str = "DEFAULT_BLANK_TEXTURE.png";

/// Image file contents keyed by the name materials reference it with
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub name: String,
    pub image: Vec<u8>,
}

/// Deduplicating set of referenced texture file names
#[derive(Debug, Default, Clone)]
pub struct TextureSet {
    names: BTreeSet<String>,
}

impl TextureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a texture file name; registering a name twice is a no-op
    pub fn add_texture(&mut self, name: &str) {
        if !self.names.contains(name) {
            self.names.insert(name.to_string());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Reads every registered texture plus the default placeholder
    ///
    /// A file that can't be read resolves to an empty image and records a
    /// [`Warning::TextureRead`]. So does a name that would leave the texture
    /// directory: absolute paths and `..` components are never read.
    pub fn resolve(&self, texture_directory: &Path, diagnostics: &mut Diagnostics) -> Vec<TextureImage> {
        let mut names = self.names.clone();
        names.insert(DEFAULT_TEXTURE_NAME.to_string());

        names
            .into_iter()
            .map(|name| {
                let image = match texture_path(texture_directory, &name) {
                    Some(path) => fs::read(&path).unwrap_or_else(|err| {
                        diagnostics.push(Warning::TextureRead {
                            path,
                            reason: err.to_string(),
                        });
                        Vec::new()
                    }),
                    None => {
                        diagnostics.push(Warning::TextureRead {
                            path: PathBuf::from(&name),
                            reason: "path is outside the texture directory".to_string(),
                        });
                        Vec::new()
                    }
                };
                log::debug!("Resolved texture {} ({} bytes)", name, image.len());
                TextureImage { name, image }
            })
            .collect()
    }
}

/// `name` under `texture_directory`, or `None` if it is absolute or climbs out
fn texture_path(texture_directory: &Path, name: &str) -> Option<PathBuf> {
    let relative = Path::new(name);
    relative
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
        .then(|| texture_directory.join(relative))
}
