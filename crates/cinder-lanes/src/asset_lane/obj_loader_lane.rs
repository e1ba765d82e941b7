// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines a lane for loading Wavefront OBJ models and their MTL materials.

use super::AssetLoaderLane;
use crate::render_lane::{position_bounds, StaticMesh};
use ahash::{AHashMap, AHashSet};
use cinder_core::math::Vec3;
use cinder_core::renderer::api::{BufferDescriptor, BufferTarget, BufferUsage, VertexFormat};
use cinder_core::renderer::error::ResourceError;
use cinder_core::renderer::material::Material;
use cinder_core::renderer::uniform::UniformBlock;
use cinder_core::scene::{Submesh, Texture};
use cinder_core::GraphicsContext;
use std::borrow::Cow;
use std::error::Error;
use std::io::Cursor;
use thiserror::Error;

/// Binding point given to every material loaded from an MTL file.
pub const OBJ_MATERIAL_BINDING_POINT: u32 = 0;

const OBJ_DIRECTIVES: &[&str] = &[
    "v", "vt", "vn", "f", "usemtl", "mtllib", "o", "g", "s",
];
const MTL_DIRECTIVES: &[&str] = &[
    "newmtl", "Ka", "Kd", "Ks", "Ke", "Ns", "Ni", "d", "illum", "map_Kd",
];

/// Errors raised while loading an OBJ model.
#[derive(Debug, Error)]
pub enum ObjLoadError {
    /// The file is not UTF-8 text.
    #[error("OBJ file is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    /// The OBJ or MTL text could not be parsed.
    #[error("Failed to parse OBJ file: {0}")]
    Parse(#[from] tobj::LoadError),
    /// The file holds no geometry.
    #[error("No geometry found in OBJ file")]
    Empty,
    /// A GPU object could not be created.
    #[error("Failed to upload OBJ model: {0}")]
    Upload(#[from] ResourceError),
}

/// A material parsed from an MTL file.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjMaterial {
    /// `newmtl` name.
    pub name: String,
    /// `Ka`.
    pub ambient: Vec3,
    /// `Kd`.
    pub diffuse: Vec3,
    /// `Ks`.
    pub specular: Vec3,
    /// `Ke`.
    pub emissive: Vec3,
    /// `Ns`.
    pub shininess: f32,
    /// `Ni`.
    pub optical_density: f32,
    /// `d`, `1.0` is opaque.
    pub dissolve: f32,
    /// `illum`.
    pub illumination: Option<u8>,
    /// `map_Kd`, relative to the MTL file.
    pub diffuse_map: Option<String>,
}

impl ObjMaterial {
    /// Converts the parsed values into a renderable material.
    pub fn to_material(&self) -> Material {
        let mut material = Material::named(self.name.clone());
        material.set_ambient_color(self.ambient.extend(1.0));
        material.set_diffuse_color(self.diffuse.extend(1.0));
        material.set_specular_color(self.specular.extend(1.0));
        material.set_emissive_color(self.emissive.extend(1.0));
        material.set_specular_power(self.shininess);
        material.set_optical_density(self.optical_density);
        material.set_transparency(self.dissolve);
        material.set_binding_point(OBJ_MATERIAL_BINDING_POINT);
        material
    }

    fn from_tobj(material: &tobj::Material) -> Self {
        let vec3 = |v: Option<[f32; 3]>| v.map(Vec3::from_array).unwrap_or(Vec3::ZERO);
        Self {
            name: material.name.clone(),
            ambient: vec3(material.ambient),
            diffuse: vec3(material.diffuse),
            specular: vec3(material.specular),
            emissive: vec3(material.emissive),
            shininess: material.shininess.unwrap_or(0.0),
            optical_density: material.optical_density.unwrap_or(1.0),
            dissolve: material.dissolve.unwrap_or(1.0),
            illumination: material.illumination_model,
            diffuse_map: material.diffuse_texture.clone(),
        }
    }
}

/// One named group of triangles, de-indexed into interleaved rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjGroup {
    /// Group or object name.
    pub name: String,
    /// `position(3) texcoord(2) normal(3)` rows, three per triangle.
    pub vertices: Vec<f32>,
    /// Index into [`ObjModel::materials`].
    pub material: Option<usize>,
}

impl ObjGroup {
    /// The number of vertex rows.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 8
    }
}

/// A parsed OBJ file with its materials, ready to upload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjModel {
    /// Groups in file order.
    pub groups: Vec<ObjGroup>,
    /// Materials in MTL order.
    pub materials: Vec<ObjMaterial>,
}

impl ObjModel {
    /// Uploads the model as one submesh per group.
    ///
    /// Submeshes draw without indices. Materials get binding point `0` and
    /// every distinct `map_Kd` path is turned into a texture by `load_texture`.
    ///
    /// ## Errors
    /// * `ObjLoadError::Upload` - A GPU object could not be created.
    pub fn build_mesh(
        &self,
        context: &dyn GraphicsContext,
        mut load_texture: impl FnMut(&str) -> Texture,
    ) -> Result<StaticMesh, ObjLoadError> {
        let format = VertexFormat::position_texcoord_normal();
        let mut mesh = StaticMesh::new(context)?;
        mesh.set_vertex_format(format.clone());

        let mut texture_indices: AHashMap<&str, usize> = AHashMap::new();
        for obj_material in &self.materials {
            let mut material = obj_material.to_material();
            if let Some(path) = obj_material.diffuse_map.as_deref() {
                let index = match texture_indices.get(path) {
                    Some(&index) => index,
                    None => {
                        let index = mesh.add_texture(load_texture(path));
                        texture_indices.insert(path, index);
                        index
                    }
                };
                material.set_diffuse_texture_index(Some(index));
            }
            mesh.add_material(material);
        }

        for group in self.groups.iter().filter(|g| !g.vertices.is_empty()) {
            let buffer = context.create_buffer(&BufferDescriptor {
                label: Some(Cow::Borrowed(&group.name)),
                target: BufferTarget::Vertex,
                usage: BufferUsage::StaticDraw,
                contents: bytemuck::cast_slice(&group.vertices),
            })?;
            let mut submesh = Submesh::new(buffer, group.vertex_count() as u32);
            if let Some(bounding) = position_bounds(&group.vertices, &format) {
                submesh = submesh.with_bounding(bounding);
            }
            submesh.set_material_index(group.material.filter(|&i| i < self.materials.len()));
            mesh.add_submesh(submesh);
        }

        log::info!(
            "ObjLoaderLane: Built mesh with {} submeshes, {} materials and {} textures",
            mesh.submeshes().len(),
            mesh.materials().len(),
            mesh.textures().len()
        );
        Ok(mesh)
    }
}

/// Lane for loading OBJ models.
#[derive(Debug, Clone, Default)]
pub struct ObjLoaderLane;

impl ObjLoaderLane {
    /// Parses an OBJ file, resolving its `mtllib` with the given MTL text.
    ///
    /// Faces are triangulated. Directives the engine does not use are logged
    /// at warn level and ignored.
    ///
    /// ## Errors
    /// * `ObjLoadError::InvalidUtf8` - One of the files is not text.
    /// * `ObjLoadError::Parse` - The OBJ text is malformed.
    /// * `ObjLoadError::Empty` - The file holds no geometry.
    pub fn parse(&self, obj: &[u8], mtl: Option<&[u8]>) -> Result<ObjModel, ObjLoadError> {
        let obj_text = std::str::from_utf8(obj)?;
        warn_unknown("OBJ", &unknown_directives(obj_text, OBJ_DIRECTIVES));
        if let Some(mtl) = mtl {
            let mtl_text = std::str::from_utf8(mtl)?;
            warn_unknown("MTL", &unknown_directives(mtl_text, MTL_DIRECTIVES));
        }

        let (models, materials) = tobj::load_obj_buf(
            &mut Cursor::new(obj_text),
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
            |path| match mtl {
                Some(mtl) => tobj::load_mtl_buf(&mut Cursor::new(mtl)),
                None => {
                    log::warn!("ObjLoaderLane: No MTL text for '{}'", path.display());
                    Ok((Vec::new(), AHashMap::new()))
                }
            },
        )?;

        let materials = materials.unwrap_or_else(|e| {
            log::warn!("ObjLoaderLane: Materials unavailable: {e}");
            Vec::new()
        });

        if models.iter().all(|m| m.mesh.indices.is_empty()) {
            return Err(ObjLoadError::Empty);
        }

        Ok(ObjModel {
            groups: models.iter().map(deindex).collect(),
            materials: materials.iter().map(ObjMaterial::from_tobj).collect(),
        })
    }
}

impl AssetLoaderLane<ObjModel> for ObjLoaderLane {
    fn load(&self, bytes: &[u8]) -> Result<ObjModel, Box<dyn Error + Send + Sync>> {
        Ok(self.parse(bytes, None)?)
    }
}

/// Expands the shared index list into one interleaved row per corner.
fn deindex(model: &tobj::Model) -> ObjGroup {
    let mesh = &model.mesh;
    let mut vertices = Vec::with_capacity(mesh.indices.len() * 8);
    for &index in &mesh.indices {
        let i = index as usize;
        vertices.extend_from_slice(mesh.positions.get(3 * i..3 * i + 3).unwrap_or(&[0.0; 3]));
        vertices.extend_from_slice(mesh.texcoords.get(2 * i..2 * i + 2).unwrap_or(&[0.0; 2]));
        vertices.extend_from_slice(mesh.normals.get(3 * i..3 * i + 3).unwrap_or(&[0.0; 3]));
    }
    ObjGroup {
        name: model.name.clone(),
        vertices,
        material: mesh.material_id,
    }
}

/// The distinct leading keywords of `text` that are not in `known`.
pub fn unknown_directives(text: &str, known: &[&str]) -> Vec<String> {
    let mut seen = AHashSet::new();
    text.lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter(|keyword| !keyword.starts_with('#') && !known.contains(keyword))
        .filter(|keyword| seen.insert(*keyword))
        .map(str::to_string)
        .collect()
}

fn warn_unknown(kind: &str, directives: &[String]) {
    for directive in directives {
        log::warn!("ObjLoaderLane: Ignoring unknown {kind} directive '{directive}'");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cinder_core::math::Vec4;
    use cinder_core::testing::{Call, RecordingContext};

    const QUAD_OBJ: &str = "\
mtllib quad.mtl
o tri
v 0 1 0
v 0 2 0
v 1 1 0
f 1 2 3
o quad
v -1 0 1
v 1 0 1
v 1 0 -1
v -1 0 -1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 1 0
usemtl bricks
f 4/1/1 5/2/1 6/3/1 7/4/1
";

    const QUAD_MTL: &str = "\
newmtl bricks
Ka 0.1 0.1 0.1
Kd 0.8 0.4 0.2
Ks 1 1 1
Ke 0 0 0.5
Ns 32
Ni 1.5
d 0.75
illum 2
map_Kd bricks.png
map_Bump bricks_n.png
";

    fn parse() -> ObjModel {
        ObjLoaderLane
            .parse(QUAD_OBJ.as_bytes(), Some(QUAD_MTL.as_bytes()))
            .unwrap()
    }

    #[test]
    fn test_quad_is_triangulated_and_deindexed() {
        let model = parse();
        let quad = &model.groups[1];
        assert_eq!(quad.name, "quad");
        assert_eq!(quad.vertex_count(), 6);
        assert_eq!(quad.material, Some(0));
        // Normal of the first corner.
        assert_eq!(&quad.vertices[5..8], &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_missing_streams_are_zero_filled() {
        let model = parse();
        let tri = &model.groups[0];
        assert_eq!(tri.vertex_count(), 3);
        assert_eq!(&tri.vertices[3..8], &[0.0; 5]);
    }

    #[test]
    fn test_material_values() {
        let material = &parse().materials[0];
        assert_eq!(material.name, "bricks");
        assert_eq!(material.diffuse, Vec3::new(0.8, 0.4, 0.2));
        assert_eq!(material.emissive, Vec3::new(0.0, 0.0, 0.5));
        assert_relative_eq!(material.shininess, 32.0);
        assert_relative_eq!(material.optical_density, 1.5);
        assert_relative_eq!(material.dissolve, 0.75);
        assert_eq!(material.illumination, Some(2));
        assert_eq!(material.diffuse_map.as_deref(), Some("bricks.png"));

        let converted = material.to_material();
        assert_eq!(converted.binding_point(), Some(OBJ_MATERIAL_BINDING_POINT));
        assert_eq!(converted.diffuse_color(), Vec4::new(0.8, 0.4, 0.2, 1.0));
        assert_eq!(converted.emissive_color(), Vec4::new(0.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn test_unknown_directives_are_reported_once() {
        assert_eq!(
            unknown_directives(QUAD_MTL, MTL_DIRECTIVES),
            vec!["map_Bump".to_string()]
        );
        assert!(unknown_directives(QUAD_OBJ, OBJ_DIRECTIVES).is_empty());
        assert_eq!(
            unknown_directives("vp 1 2\nvp 3 4\n# note\ncurv 0 1", OBJ_DIRECTIVES),
            vec!["vp".to_string(), "curv".to_string()]
        );
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let err = ObjLoaderLane.parse(b"# nothing\n", None).unwrap_err();
        assert!(matches!(err, ObjLoadError::Empty));
        assert_eq!(err.to_string(), "No geometry found in OBJ file");
    }

    #[test]
    fn test_build_mesh_links_material_and_texture() {
        let context = RecordingContext::new();
        let mut requested = Vec::new();
        let mesh = parse()
            .build_mesh(&context, |path| {
                requested.push(path.to_string());
                Texture::pending(path)
            })
            .unwrap();

        assert_eq!(requested, vec!["bricks.png".to_string()]);
        assert_eq!(mesh.submeshes().len(), 2);
        assert_eq!(mesh.submeshes()[0].material_index(), None);
        assert_eq!(mesh.submeshes()[1].material_index(), Some(0));
        assert!(!mesh.submeshes()[1].is_indexed());
        assert!(mesh.submeshes()[1].bounding_volume().is_some());

        let material = &mesh.materials()[0];
        assert!(material.has_texture());
        assert_eq!(material.diffuse_texture_index(), Some(0));
        assert_eq!(
            context.count(|c| matches!(c, Call::CreateBuffer { target: BufferTarget::Vertex, .. })),
            2
        );
    }
}
