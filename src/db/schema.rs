//! SQL text of the scene database
//!
//! Table and column names, types and nullability are read by downstream
//! viewers and must not change.

pub const DROP_TABLES: [&str; 4] = [
    "DROP TABLE IF EXISTS vertex",
    "DROP TABLE IF EXISTS scene_node",
    "DROP TABLE IF EXISTS material",
    "DROP TABLE IF EXISTS texture",
];

pub const CREATE_VERTEX: &str = "CREATE TABLE vertex(\
id INTEGER PRIMARY KEY AUTOINCREMENT, \
px REAL NOT NULL, py REAL NOT NULL, pz REAL NOT NULL, \
nx REAL NOT NULL, ny REAL NOT NULL, nz REAL NOT NULL, \
tu REAL NOT NULL, tv REAL NOT NULL)";

pub const CREATE_SCENE_NODE: &str = "CREATE TABLE scene_node(\
id INTEGER PRIMARY KEY AUTOINCREMENT, \
name TEXT, \
material_id INTEGER, \
start_position INTEGER NOT NULL, \
end_position INTEGER NOT NULL, \
radius REAL NOT NULL, \
center_x REAL NOT NULL, center_y REAL NOT NULL, center_z REAL NOT NULL)";

pub const CREATE_MATERIAL: &str = "CREATE TABLE material(\
id INTEGER PRIMARY KEY AUTOINCREMENT, \
name TEXT, \
normal_texname TEXT, \
dissolve REAL, \
diffuse_r REAL, diffuse_g REAL, diffuse_b REAL, \
transmittance_r REAL, transmittance_g REAL, transmittance_b REAL, \
emission_r REAL, emission_g REAL, emission_b REAL, \
shininess REAL, \
specular_texname TEXT, \
specular_r REAL, specular_g REAL, specular_b REAL, \
diffuse_texname TEXT, \
ambient_r REAL, ambient_g REAL, ambient_b REAL, \
ior INTEGER, \
ambient_texname TEXT, \
illum INTEGER)";

pub const CREATE_TEXTURE: &str =
    "CREATE TABLE texture(name TEXT PRIMARY KEY NOT NULL, image BLOB NOT NULL)";

pub const CREATE_TABLES: [&str; 4] = [
    CREATE_VERTEX,
    CREATE_SCENE_NODE,
    CREATE_MATERIAL,
    CREATE_TEXTURE,
];

pub const INSERT_VERTEX: &str =
    "INSERT INTO vertex(px, py, pz, nx, ny, nz, tu, tv) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

pub const INSERT_SCENE_NODE: &str = "INSERT INTO scene_node(\
name, material_id, start_position, end_position, radius, center_x, center_y, center_z) \
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

pub const INSERT_MATERIAL: &str = "INSERT INTO material(\
id, name, normal_texname, dissolve, diffuse_r, diffuse_g, diffuse_b, \
transmittance_r, transmittance_g, transmittance_b, \
emission_r, emission_g, emission_b, shininess, specular_texname, \
specular_r, specular_g, specular_b, diffuse_texname, \
ambient_r, ambient_g, ambient_b, ior, ambient_texname, illum) \
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25)";

pub const INSERT_TEXTURE: &str = "INSERT INTO texture(name, image) VALUES (?1, ?2)";

pub const SELECT_VERTICES: &str =
    "SELECT px, py, pz, nx, ny, nz, tu, tv FROM vertex ORDER BY id";

pub const SELECT_SCENE_NODES: &str = "SELECT name, material_id, start_position, end_position, \
radius, center_x, center_y, center_z FROM scene_node ORDER BY id";

pub const SELECT_MATERIALS: &str = "SELECT id, name, normal_texname, dissolve, \
diffuse_r, diffuse_g, diffuse_b, transmittance_r, transmittance_g, transmittance_b, \
emission_r, emission_g, emission_b, shininess, specular_texname, \
specular_r, specular_g, specular_b, diffuse_texname, \
ambient_r, ambient_g, ambient_b, ior, ambient_texname, illum FROM material ORDER BY id";

pub const SELECT_TEXTURES: &str = "SELECT name, image FROM texture ORDER BY name";
