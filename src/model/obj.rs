//! Wavefront OBJ loading through `tobj`

use std::fs;
use std::path::Path;

use crate::error::ConvertError;
use crate::scene::Material;

use super::{Face, FaceVertex, ParsedModel, Shape};

/// Loads `file_name` from `model_directory`
///
/// Material libraries are resolved relative to the OBJ file. A library that
/// can't be loaded is logged and the model is returned without materials.
pub fn load_obj(model_directory: &Path, file_name: &str) -> Result<ParsedModel, ConvertError> {
    let path = model_directory.join(file_name);
    let (models, materials) = tobj::load_obj(
        &path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: false,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        },
    )
    .map_err(|err| ConvertError::Parse {
        path: path.clone(),
        message: err.to_string(),
    })?;

    let materials = materials.unwrap_or_else(|err| {
        log::warn!("No MTL file loaded for {} ({err}), using the default material", path.display());
        Vec::new()
    });

    let source = fs::read_to_string(&path).map_err(|err| ConvertError::Parse {
        path: path.clone(),
        message: err.to_string(),
    })?;
    let corners = scan_corner_attributes(&source);
    let index_count: usize = models.iter().map(|model| model.mesh.indices.len()).sum();
    let corners = if corners.len() == index_count {
        Some(corners)
    } else {
        log::warn!(
            "{}: found {} face corners but tobj produced {}, trusting tobj's attribute indices",
            path.display(),
            corners.len(),
            index_count
        );
        None
    };

    let mut parsed = ParsedModel::new(file_name);
    parsed.materials = materials.iter().map(convert_material).collect();
    let mut offset = 0;
    for model in &models {
        let count = model.mesh.indices.len();
        let model_corners = corners.as_deref().map(|c| &c[offset..offset + count]);
        append_model(&mut parsed, model, model_corners);
        offset += count;
    }

    log::info!(
        "Loaded {}: {} shapes, {} triangles, {} materials",
        path.display(),
        parsed.shapes.len(),
        parsed.triangle_count(),
        parsed.materials.len()
    );
    Ok(parsed)
}

/// Attributes a triangle corner carries in the OBJ face record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CornerAttributes {
    texcoord: bool,
    normal: bool,
}

impl CornerAttributes {
    const ALL: Self = Self {
        texcoord: true,
        normal: true,
    };
}

/// Lists the attributes of every triangle corner in file order
///
/// tobj pads a corner without `vt` or `vn` with a neighbouring corner's index
/// when other faces of the group have one, so presence has to come from the
/// face records. Polygons are fanned from their first corner, matching tobj's
/// triangulation; records with fewer than three corners produce nothing.
fn scan_corner_attributes(source: &str) -> Vec<CornerAttributes> {
    let mut corners = Vec::new();
    for line in source.lines() {
        let mut words = line.split_whitespace();
        if !matches!(words.next(), Some("f") | Some("l")) {
            continue;
        }

        let record: Vec<CornerAttributes> = words
            .map(|word| {
                let mut parts = word.split('/').skip(1);
                CornerAttributes {
                    texcoord: parts.next().is_some_and(|part| !part.is_empty()),
                    normal: parts.next().is_some_and(|part| !part.is_empty()),
                }
            })
            .collect();
        for i in 1..record.len().saturating_sub(1) {
            corners.extend([record[0], record[i], record[i + 1]]);
        }
    }
    corners
}

/// Appends one tobj model, rebasing its indices onto the global arrays.
///
/// tobj starts a new model whenever `usemtl` changes; consecutive models
/// with the same name are folded back into a single shape. `corners` holds
/// the attribute presence of this model's corners when it is known.
fn append_model(parsed: &mut ParsedModel, model: &tobj::Model, corners: Option<&[CornerAttributes]>) {
    let mesh = &model.mesh;
    let position_base = parsed.positions.len();
    let normal_base = parsed.normals.len();
    let texcoord_base = parsed.texcoords.len();

    parsed
        .positions
        .extend(mesh.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]));
    parsed
        .normals
        .extend(mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]));
    parsed
        .texcoords
        .extend(mesh.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]));

    let corner = |k: usize| {
        let present = corners
            .and_then(|c| c.get(k))
            .copied()
            .unwrap_or(CornerAttributes::ALL);
        FaceVertex::new(
            position_base + mesh.indices[k] as usize,
            mesh.normal_indices
                .get(k)
                .filter(|_| present.normal)
                .map(|&n| normal_base + n as usize),
            mesh.texcoord_indices
                .get(k)
                .filter(|_| present.texcoord)
                .map(|&t| texcoord_base + t as usize),
        )
    };
    let faces: Vec<Face> = (0..mesh.indices.len() / 3)
        .map(|t| Face {
            vertices: [corner(t * 3), corner(t * 3 + 1), corner(t * 3 + 2)],
            material: mesh.material_id,
        })
        .collect();

    match parsed.shapes.last_mut() {
        Some(shape) if shape.name == model.name => shape.faces.extend(faces),
        _ => parsed.shapes.push(Shape {
            name: model.name.clone(),
            faces,
        }),
    }
}

fn convert_material(mtl: &tobj::Material) -> Material {
    let defaults = Material::new(&mtl.name);
    Material {
        ambient: mtl.ambient.unwrap_or(defaults.ambient),
        diffuse: mtl.diffuse.unwrap_or(defaults.diffuse),
        specular: mtl.specular.unwrap_or(defaults.specular),
        transmittance: color_param(mtl, "Tf").unwrap_or(defaults.transmittance),
        emission: color_param(mtl, "Ke").unwrap_or(defaults.emission),
        shininess: mtl.shininess.unwrap_or(defaults.shininess),
        ior: mtl.optical_density.unwrap_or(defaults.ior),
        dissolve: mtl.dissolve.unwrap_or(defaults.dissolve),
        illum: mtl.illumination_model.map(i32::from).unwrap_or(defaults.illum),
        ambient_texname: mtl.ambient_texture.clone().unwrap_or_default(),
        diffuse_texname: mtl.diffuse_texture.clone().unwrap_or_default(),
        specular_texname: mtl.specular_texture.clone().unwrap_or_default(),
        normal_texname: mtl
            .normal_texture
            .clone()
            .or_else(|| mtl.shininess_texture.clone())
            .unwrap_or_default(),
        ..defaults
    }
}

/// Reads an RGB statement tobj doesn't know, e.g. `Ke 1 0.5 0`.
/// A single value is applied to all three channels.
fn color_param(mtl: &tobj::Material, key: &str) -> Option<[f32; 3]> {
    let values = mtl
        .unknown_param
        .get(key)?
        .split_whitespace()
        .map(str::parse::<f32>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    match values.as_slice() {
        [v] => Some([*v; 3]),
        [r, g, b, ..] => Some([*r, *g, *b]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("obj2scene-obj-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const TWO_MATERIAL_QUAD: &str = "\
mtllib quad.mtl
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
usemtl red
f 1/1/1 2/2/1 3/3/1
usemtl blue
f 1/1/1 3/3/1 4/4/1
";

    const QUAD_MTL: &str = "\
newmtl red
Kd 1 0 0
Ke 0.5 0.25 0
Tf 0.2
illum 2
map_Kd textures\\red.png

newmtl blue
Kd 0 0 1
Ns 32
map_Ns blue_spec.png
";

    #[test]
    fn test_material_switch_stays_one_shape() {
        let dir = scratch_dir("switch");
        fs::write(dir.join("quad.obj"), TWO_MATERIAL_QUAD).unwrap();
        fs::write(dir.join("quad.mtl"), QUAD_MTL).unwrap();

        let model = load_obj(&dir, "quad.obj").unwrap();

        assert_eq!(model.shapes.len(), 1);
        assert_eq!(model.shapes[0].name, "quad");
        assert_eq!(model.triangle_count(), 2);
        assert_eq!(model.shapes[0].faces[0].material, Some(0));
        assert_eq!(model.shapes[0].faces[1].material, Some(1));

        // every corner index resolves in the global arrays
        for face in &model.shapes[0].faces {
            for corner in &face.vertices {
                assert!(corner.position < model.positions.len());
                assert!(corner.normal.unwrap() < model.normals.len());
                assert!(corner.texcoord.unwrap() < model.texcoords.len());
            }
        }

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_material_fields_converted() {
        let dir = scratch_dir("fields");
        fs::write(dir.join("quad.obj"), TWO_MATERIAL_QUAD).unwrap();
        fs::write(dir.join("quad.mtl"), QUAD_MTL).unwrap();

        let model = load_obj(&dir, "quad.obj").unwrap();
        let red = &model.materials[0];
        let blue = &model.materials[1];

        assert_eq!(red.name, "red");
        assert_eq!(red.diffuse, [1.0, 0.0, 0.0]);
        assert_eq!(red.emission, [0.5, 0.25, 0.0]);
        assert_eq!(red.transmittance, [0.2, 0.2, 0.2]);
        assert_eq!(red.illum, 2);
        assert_eq!(red.diffuse_texname, "textures\\red.png");
        assert_eq!(red.dissolve, 1.0);

        assert_eq!(blue.shininess, 32.0);
        assert_eq!(blue.normal_texname, "blue_spec.png");
        assert_eq!(blue.illum, 0);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_mixed_face_formats_keep_per_corner_attributes() {
        let dir = scratch_dir("mixed");
        fs::write(
            dir.join("mixed.obj"),
            "\
o mixed
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vn 0 0 1
f 1/1 2/2 3/3
f 1/1/1 3/3/1 4/2/1
f 1 2 4
f 1//1 2//1 3//1 4//1
",
        )
        .unwrap();

        let model = load_obj(&dir, "mixed.obj").unwrap();
        let faces = &model.shapes[0].faces;
        assert_eq!(faces.len(), 5);

        let normals = |f: usize| faces[f].vertices.map(|c| c.normal.is_some());
        let texcoords = |f: usize| faces[f].vertices.map(|c| c.texcoord.is_some());
        assert_eq!(normals(0), [false; 3]);
        assert_eq!(texcoords(0), [true; 3]);
        assert_eq!(normals(1), [true; 3]);
        assert_eq!(texcoords(1), [true; 3]);
        assert_eq!(normals(2), [false; 3]);
        assert_eq!(texcoords(2), [false; 3]);
        // the quad fans into two triangles
        assert_eq!(normals(3), [true; 3]);
        assert_eq!(texcoords(4), [false; 3]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_scan_corner_attributes_fans_polygons() {
        let corners = scan_corner_attributes("v 0 0 0\nl 1 2\nf 1/1 2//2 3/3/3 4 5/5\n");
        assert_eq!(corners.len(), 9);
        let texcoords: Vec<_> = corners.iter().map(|c| c.texcoord).collect();
        assert_eq!(
            texcoords,
            [true, false, true, true, true, false, true, false, true]
        );
        assert!(corners[1].normal && corners[2].normal);
        assert!(!corners[0].normal);
    }

    #[test]
    fn test_missing_file_is_parse_error() {
        let dir = scratch_dir("missing");
        let err = load_obj(&dir, "nope.obj").unwrap_err();
        assert!(matches!(err, ConvertError::Parse { .. }));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_faces_without_texcoords() {
        let dir = scratch_dir("novt");
        fs::write(
            dir.join("tri.obj"),
            "o tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        )
        .unwrap();

        let model = load_obj(&dir, "tri.obj").unwrap();
        assert!(model.texcoords.is_empty());
        assert!(model.materials.is_empty());
        let face = model.shapes[0].faces[0];
        assert_eq!(face.vertices[0].texcoord, None);
        assert_eq!(face.vertices[0].normal, None);
        assert_eq!(face.material, None);

        fs::remove_dir_all(&dir).unwrap();
    }
}
