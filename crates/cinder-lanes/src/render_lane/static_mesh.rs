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

//! A static mesh and its render traversal.

use super::light_rig::LightRig;
use super::pipeline::{Pipeline, SAMPLER_UNIFORMS};
use cinder_core::math::{self, Mat4, Vec3};
use cinder_core::renderer::api::{
    BufferDescriptor, BufferTarget, BufferUsage, RenderMode, UniformValue, VertexArrayId,
    VertexFormat, ATTRIBUTE_POSITION,
};
use cinder_core::renderer::error::ResourceError;
use cinder_core::renderer::material::Material;
use cinder_core::renderer::uniform::UniformBlock;
use cinder_core::scene::{BoundingVolume, SphereBounding, Submesh, Texture};
use cinder_core::GraphicsContext;
use std::borrow::Cow;

/// A model made of submeshes sharing one vertex format, one transform and
/// one set of materials and textures.
///
/// Submesh material indices refer to [`StaticMesh::materials`], and material
/// texture indices refer to [`StaticMesh::textures`].
#[derive(Debug)]
pub struct StaticMesh {
    submeshes: Vec<Submesh>,
    materials: Vec<Material>,
    textures: Vec<Texture>,
    vertex_format: VertexFormat,
    vertex_array: VertexArrayId,
    position: Vec3,
    scale: Vec3,
    rotation: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
}

impl StaticMesh {
    /// Creates an empty mesh with its own vertex array.
    ///
    /// ## Errors
    /// * Any error of the context while creating the vertex array.
    pub fn new(context: &dyn GraphicsContext) -> Result<Self, ResourceError> {
        let vertex_array = context.create_vertex_array()?;
        Ok(Self {
            submeshes: Vec::new(),
            materials: Vec::new(),
            textures: Vec::new(),
            vertex_format: VertexFormat::new(),
            vertex_array,
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
        })
    }

    /// Appends a submesh, drawn after the existing ones.
    pub fn add_submesh(&mut self, submesh: Submesh) {
        self.submeshes.push(submesh);
    }

    /// Appends a material and returns its index.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Appends a texture and returns its index.
    pub fn add_texture(&mut self, texture: Texture) -> usize {
        self.textures.push(texture);
        self.textures.len() - 1
    }

    /// The submeshes in draw order.
    pub fn submeshes(&self) -> &[Submesh] {
        &self.submeshes
    }

    /// Mutable access to the submeshes, e.g. to reassign material indices.
    pub fn submeshes_mut(&mut self) -> &mut [Submesh] {
        &mut self.submeshes
    }

    /// The materials referenced by submesh material indices.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Mutable access to the materials. Setters mark them for re-upload.
    pub fn materials_mut(&mut self) -> &mut [Material] {
        &mut self.materials
    }

    /// The textures referenced by material texture indices.
    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    /// The interleaved row layout shared by every submesh.
    pub fn vertex_format(&self) -> &VertexFormat {
        &self.vertex_format
    }

    /// Replaces the row layout. It must match the pipelines the mesh is drawn with.
    pub fn set_vertex_format(&mut self, vertex_format: VertexFormat) {
        self.vertex_format = vertex_format;
    }

    /// The number of floats per vertex row.
    pub fn stride_floats(&self) -> u32 {
        self.vertex_format.stride_floats()
    }

    /// The vertex array bound while drawing.
    pub fn vertex_array(&self) -> VertexArrayId {
        self.vertex_array
    }

    /// World-space translation.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Sets the world-space translation.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Per-axis scale factors.
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Sets the per-axis scale factors.
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// The per-axis rotation angles in radians.
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Sets the rotation about X, replacing the previous angle.
    pub fn rotate_x(&mut self, angle: f32) {
        self.rotation.x = angle;
    }

    /// Sets the rotation about Y, replacing the previous angle.
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotation.y = angle;
    }

    /// Sets the rotation about Z, replacing the previous angle.
    pub fn rotate_z(&mut self, angle: f32) {
        self.rotation.z = angle;
    }

    /// Model-space -Z as of the last render.
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Model-space +X as of the last render.
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Model-space +Y as of the last render.
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// `T(position) · Ry · Rx · Rz · S(scale)`.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * math::rotation_yxz(self.rotation.x, self.rotation.y, self.rotation.z)
            * Mat4::from_scale(self.scale)
    }

    /// A sphere enclosing the bounds of every submesh, in model space.
    pub fn bounding_volume(&self) -> Option<BoundingVolume> {
        let corners = self
            .submeshes
            .iter()
            .filter_map(Submesh::bounding_volume)
            .flat_map(|bv| [bv.min(), bv.max()]);
        SphereBounding::from_points(corners).map(BoundingVolume::Sphere)
    }

    /// Draws every submesh with `pipeline`.
    ///
    /// Attributes the pipeline does not expose, unbound materials and textures
    /// still loading are skipped. All bindings are reset afterwards.
    pub fn render(&mut self, context: &dyn GraphicsContext, pipeline: &Pipeline, mode: RenderMode) {
        pipeline.activate(context);
        self.draw_submeshes(context, pipeline, mode);
    }

    /// Like [`StaticMesh::render`], binding the lights of `rig` first.
    pub fn render_lit(
        &mut self,
        context: &dyn GraphicsContext,
        pipeline: &Pipeline,
        rig: &mut LightRig,
        mode: RenderMode,
    ) {
        pipeline.activate(context);
        rig.bind(context, pipeline);
        self.draw_submeshes(context, pipeline, mode);
    }

    fn update_orientation(&mut self, model: &Mat4) {
        self.forward = model.transform_vector3(Vec3::NEG_Z);
        self.right = model.transform_vector3(Vec3::X);
        self.up = model.transform_vector3(Vec3::Y);
    }

    fn draw_submeshes(&mut self, context: &dyn GraphicsContext, pipeline: &Pipeline, mode: RenderMode) {
        let model = self.model_matrix();
        self.update_orientation(&model);
        pipeline.set_model(context, model);

        context.bind_vertex_array(Some(self.vertex_array));

        let mut enabled = Vec::with_capacity(self.vertex_format.attributes().len());
        let mut bound_units = 0;
        for submesh in &self.submeshes {
            context.bind_buffer(BufferTarget::Vertex, Some(submesh.vertex_buffer()));

            for (name, layout) in self.vertex_format.layouts() {
                match pipeline.attribute_location(name) {
                    Ok(location) => {
                        context.set_vertex_attribute(location, &layout);
                        context.enable_vertex_attribute(location);
                        enabled.push(location);
                    }
                    Err(e) => log::trace!("StaticMesh: {e}, attribute skipped"),
                }
            }

            if let Some(index) = submesh.material_index() {
                match self.materials.get_mut(index) {
                    Some(material) => {
                        let units = bind_material(context, pipeline, material, &self.textures);
                        bound_units = bound_units.max(units);
                    }
                    None => log::warn!("StaticMesh: Material index {index} is out of range"),
                }
            }

            match submesh.index_buffer() {
                Some(index_buffer) => {
                    context.bind_buffer(BufferTarget::Index, Some(index_buffer));
                    context.draw_elements(mode, submesh.index_count());
                }
                None => context.draw_arrays(mode, 0, submesh.vertex_count()),
            }

            for location in enabled.drain(..) {
                context.disable_vertex_attribute(location);
            }
        }

        context.bind_buffer(BufferTarget::Uniform, None);
        context.bind_buffer(BufferTarget::Vertex, None);
        context.bind_buffer(BufferTarget::Index, None);
        unbind_texture_units(context, bound_units);
        context.bind_vertex_array(None);
        context.use_program(None);
    }

    /// Destroys every GPU object owned by the mesh.
    pub fn release(&mut self, context: &dyn GraphicsContext) {
        for submesh in self.submeshes.drain(..) {
            submesh.release(context);
        }
        for material in &mut self.materials {
            material.uniform_state_mut().release(context);
        }
        for texture in self.textures.drain(..) {
            texture.release(context);
        }
        if let Err(e) = context.destroy_vertex_array(self.vertex_array) {
            log::warn!("StaticMesh: Failed to destroy {:?}: {e}", self.vertex_array);
        }
    }
}

/// Binds the material block, then its textures to consecutive units.
///
/// Texture binding stops at the first slot the pipeline has no sampler for,
/// the first empty slot or the first texture that is not uploaded yet.
/// Returns the number of texture units bound.
fn bind_material(
    context: &dyn GraphicsContext,
    pipeline: &Pipeline,
    material: &mut Material,
    textures: &[Texture],
) -> u32 {
    if let Some(buffer) = material.uniform_buffer(context, pipeline.program()) {
        if let Some(binding_point) = material.binding_point() {
            context.bind_buffer_base(binding_point, buffer);
        }
    }

    if !material.has_texture() {
        return 0;
    }
    let mut bound = 0;
    for (unit, (sampler, slot)) in SAMPLER_UNIFORMS
        .iter()
        .zip(material.texture_slots())
        .enumerate()
    {
        let Ok(location) = pipeline.uniform_location(sampler) else {
            break;
        };
        let Some(texture) = slot.and_then(|index| textures.get(index)) else {
            break;
        };
        let Some(handle) = texture.handle() else {
            log::trace!("StaticMesh: Texture '{}' is not ready", texture.label());
            break;
        };
        let unit = unit as u32;
        context.active_texture(unit);
        context.bind_texture(Some(handle));
        context.set_uniform(location, UniformValue::Int(unit as i32));
        bound = unit + 1;
    }
    bound
}

/// Clears units `0..units`, leaving unit 0 active.
fn unbind_texture_units(context: &dyn GraphicsContext, units: u32) {
    if units == 0 {
        context.bind_texture(None);
        return;
    }
    for unit in (0..units).rev() {
        context.active_texture(unit);
        context.bind_texture(None);
    }
}

/// Uploads interleaved vertices and 16-bit indices into a one-submesh mesh.
///
/// The submesh draws `vertices.len() / stride` vertices, or every index when
/// `indices` is not empty, and carries a bounding sphere computed from the
/// `in_position` stream when the format has one.
///
/// ## Errors
/// * Any error of the context while creating the vertex array or the buffers.
pub fn create_mesh(
    context: &dyn GraphicsContext,
    vertices: &[f32],
    indices: &[u16],
    vertex_format: VertexFormat,
) -> Result<StaticMesh, ResourceError> {
    let stride = vertex_format.stride_floats() as usize;
    if stride == 0 {
        return Err(ResourceError::BackendError(
            "vertex format has no attributes".to_string(),
        ));
    }

    let mut mesh = StaticMesh::new(context)?;
    let vertex_buffer = context.create_buffer(&BufferDescriptor {
        label: Some(Cow::Borrowed("mesh vertices")),
        target: BufferTarget::Vertex,
        usage: BufferUsage::StaticDraw,
        contents: bytemuck::cast_slice(vertices),
    })?;

    let mut submesh = Submesh::new(vertex_buffer, (vertices.len() / stride) as u32);
    if !indices.is_empty() {
        let index_buffer = context.create_buffer(&BufferDescriptor {
            label: Some(Cow::Borrowed("mesh indices")),
            target: BufferTarget::Index,
            usage: BufferUsage::StaticDraw,
            contents: bytemuck::cast_slice(indices),
        })?;
        submesh = submesh.with_indices(index_buffer, indices.len() as u32);
    }

    if let Some(bounding) = position_bounds(vertices, &vertex_format) {
        submesh = submesh.with_bounding(bounding);
    }

    log::debug!(
        "StaticMesh: Created mesh with {} vertices and {} indices",
        submesh.vertex_count(),
        indices.len()
    );
    mesh.set_vertex_format(vertex_format);
    mesh.add_submesh(submesh);
    Ok(mesh)
}

/// A bounding sphere over the position attribute of interleaved vertices.
pub fn position_bounds(vertices: &[f32], vertex_format: &VertexFormat) -> Option<BoundingVolume> {
    let stride = vertex_format.stride_floats() as usize;
    let (_, layout) = vertex_format
        .layouts()
        .find(|(name, layout)| *name == ATTRIBUTE_POSITION && layout.components >= 3)?;
    let offset = (layout.offset / 4) as usize;
    let points = vertices
        .chunks_exact(stride)
        .map(|row| Vec3::new(row[offset], row[offset + 1], row[offset + 2]));
    SphereBounding::from_points(points).map(BoundingVolume::Sphere)
}
