//! Material records and the name-keyed material registry
//!
//! Materials are stored centrally in [`MaterialRegistry`] and scene nodes
//! reference them through a [`MaterialRef`]. Ids are 1-based and follow
//! insertion order, matching the `material.id` column of the scene database.

use std::collections::HashMap;

use crate::error::{ConvertError, Diagnostics, Warning};

use super::texture::TextureSet;

/// Longest material or texture name that is stored, in bytes
pub const MAX_NAME_LENGTH: usize = 127;

/// Name of the synthetic material used when a face has no valid material
pub const DEFAULT_MATERIAL_NAME: &str = "DEFAULT_MATERIAL";

/// Material definition as read from an MTL library
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub transmittance: [f32; 3],
    pub emission: [f32; 3],
    pub shininess: f32,
    /// Index of refraction
    pub ior: f32,
    /// 1 == opaque; 0 == fully transparent
    pub dissolve: f32,
    /// Illumination model
    pub illum: i32,
    pub ambient_texname: String,
    pub diffuse_texname: String,
    pub specular_texname: String,
    /// Normal map, or the specular highlight map when no normal map is given
    pub normal_texname: String,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: [0.8, 0.8, 0.8],
            ..Self::new(DEFAULT_MATERIAL_NAME)
        }
    }
}

impl Material {
    /// Creates a material with the MTL defaults: black colors, shininess,
    /// ior and dissolve of 1 and illumination model 0.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ambient: [0.0; 3],
            diffuse: [0.0; 3],
            specular: [0.0; 3],
            transmittance: [0.0; 3],
            emission: [0.0; 3],
            shininess: 1.0,
            ior: 1.0,
            dissolve: 1.0,
            illum: 0,
            ambient_texname: String::new(),
            diffuse_texname: String::new(),
            specular_texname: String::new(),
            normal_texname: String::new(),
        }
    }

    /// Builder pattern: Set diffuse color
    pub fn with_diffuse(mut self, r: f32, g: f32, b: f32) -> Self {
        self.diffuse = [r, g, b];
        self
    }

    /// Builder pattern: Set diffuse texture file name
    pub fn with_diffuse_texture(mut self, name: &str) -> Self {
        self.diffuse_texname = name.to_string();
        self
    }
}

/// Reference from a scene node to its material
///
/// `Known` holds the 1-based registry id. `Default` stands for the synthetic
/// default material and is only turned into a row id at write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialRef {
    Known(u32),
    Default,
}

impl MaterialRef {
    /// Row id in the `material` table for a registry of `material_count` entries
    pub fn row_id(self, material_count: usize) -> i64 {
        match self {
            MaterialRef::Known(id) => i64::from(id),
            MaterialRef::Default => material_count as i64 + 1,
        }
    }
}

/// Converts Windows directory separators on platforms that don't accept them
pub fn normalize_texture_path(name: &str) -> String {
    if cfg!(windows) {
        name.to_string()
    } else {
        name.replace('\\', "/")
    }
}

/// Truncates `name` to [`MAX_NAME_LENGTH`] bytes on a character boundary
pub fn bounded_name(name: &str, diagnostics: &mut Diagnostics) -> String {
    if name.len() <= MAX_NAME_LENGTH {
        return name.to_string();
    }

    let mut end = MAX_NAME_LENGTH;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    diagnostics.push(Warning::NameTruncated {
        original: name.to_string(),
        limit: MAX_NAME_LENGTH,
    });
    name[..end].to_string()
}

/// Deduplicating, insertion-ordered store of materials
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
    ids: HashMap<String, usize>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a material to the registry
    ///
    /// Names and texture names are bounded, texture paths are normalized and
    /// a non-empty diffuse texture is registered with `textures`.
    ///
    /// # Returns
    /// The reference later faces use for this material, or
    /// [`ConvertError::DuplicateMaterial`] if the name is already taken.
    pub fn add_material(
        &mut self,
        mut material: Material,
        textures: &mut TextureSet,
        diagnostics: &mut Diagnostics,
    ) -> Result<MaterialRef, ConvertError> {
        material.name = bounded_name(&material.name, diagnostics);
        if self.ids.contains_key(&material.name) {
            return Err(ConvertError::DuplicateMaterial(material.name));
        }

        for texname in [
            &mut material.ambient_texname,
            &mut material.diffuse_texname,
            &mut material.specular_texname,
            &mut material.normal_texname,
        ] {
            *texname = normalize_texture_path(&bounded_name(texname, diagnostics));
        }

        if !material.diffuse_texname.is_empty() {
            textures.add_texture(&material.diffuse_texname);
        }

        self.materials.push(material);
        let position = self.materials.len();
        self.ids
            .insert(self.materials[position - 1].name.clone(), position - 1);
        Ok(MaterialRef::Known(position as u32))
    }

    /// Maps a registry position to a material reference
    ///
    /// Valid positions map to `Known(position + 1)`; a missing or out of range
    /// position maps to [`MaterialRef::Default`].
    pub fn resolve_material_id(&self, source_index: Option<usize>) -> MaterialRef {
        match source_index {
            Some(index) if index < self.materials.len() => MaterialRef::Known(index as u32 + 1),
            _ => MaterialRef::Default,
        }
    }

    /// Gets a material by name
    pub fn get_material(&self, name: &str) -> Option<&Material> {
        self.ids.get(name).map(|&i| &self.materials[i])
    }

    /// Gets the id of a material by name
    pub fn material_id(&self, name: &str) -> Option<MaterialRef> {
        self.ids.get(name).map(|&i| MaterialRef::Known(i as u32 + 1))
    }

    /// Gets a material by reference; `Default` and unknown ids yield `None`
    pub fn get(&self, material: MaterialRef) -> Option<&Material> {
        match material {
            MaterialRef::Known(id) => self.materials.get((id as usize).checked_sub(1)?),
            MaterialRef::Default => None,
        }
    }

    /// Materials in id order
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Lists all material names in id order
    pub fn list_materials(&self) -> Vec<&str> {
        self.materials.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
