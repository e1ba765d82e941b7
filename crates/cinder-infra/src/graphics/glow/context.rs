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

//! Contains the [`GlowContext`], the `glow` backed [`GraphicsContext`].
//!
//! Every GL object created through the context is stored under a Cinder handle,
//! so the rest of the engine never sees a native name. All GL calls go through
//! `glow::HasContext`, whose methods are `unsafe` because they forward to the
//! driver. The context only passes objects it created itself, on the thread that
//! owns the native context.

use super::conversions::IntoGl;
use cinder_core::math::Vec4;
use cinder_core::renderer::api::*;
use cinder_core::renderer::error::{ResourceError, ShaderError};
use cinder_core::renderer::traits::GraphicsContext;
use glow::HasContext;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Maps Cinder handles to native objects.
struct HandleTable<K, V> {
    entries: RefCell<HashMap<K, V>>,
    kind: &'static str,
}

impl<K: Copy + Eq + Hash + fmt::Debug, V: Clone> HandleTable<K, V> {
    fn new(kind: &'static str) -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            kind,
        }
    }

    fn insert(&self, key: K, value: V) {
        self.entries.borrow_mut().insert(key, value);
    }

    /// Looks up a handle, warning when it is unknown.
    fn get(&self, key: K) -> Option<V> {
        let value = self.entries.borrow().get(&key).cloned();
        if value.is_none() {
            log::warn!("GlowContext: Unknown {} handle {:?}", self.kind, key);
        }
        value
    }

    fn remove(&self, key: K) -> Option<V> {
        let value = self.entries.borrow_mut().remove(&key);
        if value.is_none() {
            log::warn!("GlowContext: Attempted to destroy unknown {} {:?}", self.kind, key);
        }
        value
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

/// A [`GraphicsContext`] over any `glow` context.
///
/// Use `glow::Context::from_webgl2_context` on the web or
/// `glow::Context::from_loader_function` on native targets to build the inner
/// context, then hand it to [`GlowContext::new`].
pub struct GlowContext<H: HasContext> {
    gl: H,
    next_id: AtomicUsize,
    buffers: HandleTable<BufferId, H::Buffer>,
    vertex_arrays: HandleTable<VertexArrayId, H::VertexArray>,
    shaders: HandleTable<ShaderId, H::Shader>,
    programs: HandleTable<ProgramId, H::Program>,
    textures: HandleTable<TextureId, H::Texture>,
    uniform_locations: HandleTable<UniformLocationId, H::UniformLocation>,
    uniform_cache: RefCell<HashMap<(ProgramId, String), UniformLocationId>>,
}

impl<H: HasContext> fmt::Debug for GlowContext<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlowContext")
            .field("buffers", &self.buffers.len())
            .field("vertex_arrays", &self.vertex_arrays.len())
            .field("shaders", &self.shaders.len())
            .field("programs", &self.programs.len())
            .field("textures", &self.textures.len())
            .finish()
    }
}

impl<H: HasContext> GlowContext<H> {
    /// Wraps a native context.
    pub fn new(gl: H) -> Self {
        log::info!("GlowContext: Created on GL {:?}", gl.version());
        Self {
            gl,
            next_id: AtomicUsize::new(1),
            buffers: HandleTable::new("buffer"),
            vertex_arrays: HandleTable::new("vertex array"),
            shaders: HandleTable::new("shader"),
            programs: HandleTable::new("program"),
            textures: HandleTable::new("texture"),
            uniform_locations: HandleTable::new("uniform location"),
            uniform_cache: RefCell::new(HashMap::new()),
        }
    }

    /// The native context, for state Cinder does not manage (blending, culling, ...).
    pub fn gl(&self) -> &H {
        &self.gl
    }

    /// Sets the viewport and clears the color and depth buffers.
    ///
    /// Depth testing is enabled so meshes drawn afterwards occlude each other.
    pub fn begin_frame(&self, width: u32, height: u32, clear_color: Vec4) {
        // SAFETY: plain state calls on the owned context.
        unsafe {
            self.gl.viewport(0, 0, width as i32, height as i32);
            self.gl.enable(glow::DEPTH_TEST);
            self.gl
                .clear_color(clear_color.x, clear_color.y, clear_color.z, clear_color.w);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn next(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl<H: HasContext> GraphicsContext for GlowContext<H> {
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError> {
        let target = descriptor.target.into_gl();
        // SAFETY: the new buffer is bound before data is uploaded to it.
        let buffer = unsafe {
            let buffer = self
                .gl
                .create_buffer()
                .map_err(ResourceError::BackendError)?;
            self.gl.bind_buffer(target, Some(buffer));
            self.gl
                .buffer_data_u8_slice(target, descriptor.contents, descriptor.usage.into_gl());
            buffer
        };

        let id = BufferId(self.next());
        self.buffers.insert(id, buffer);
        log::debug!(
            "GlowContext: Created buffer '{}' with ID: {:?}, size: {} bytes",
            descriptor.label.as_deref().unwrap_or_default(),
            id,
            descriptor.contents.len()
        );
        Ok(id)
    }

    fn write_buffer(
        &self,
        id: BufferId,
        target: BufferTarget,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        let buffer = self.buffers.get(id).ok_or(ResourceError::InvalidHandle)?;
        let target = target.into_gl();
        // SAFETY: `buffer` was created by this context.
        unsafe {
            self.gl.bind_buffer(target, Some(buffer));
            self.gl.buffer_data_u8_slice(target, data, glow::DYNAMIC_DRAW);
        }
        Ok(())
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        let buffer = self.buffers.remove(id).ok_or(ResourceError::InvalidHandle)?;
        // SAFETY: the handle is removed from the table, so it is deleted once.
        unsafe { self.gl.delete_buffer(buffer) };
        Ok(())
    }

    fn bind_buffer(&self, target: BufferTarget, id: Option<BufferId>) {
        let buffer = match id {
            Some(id) => match self.buffers.get(id) {
                Some(buffer) => Some(buffer),
                None => return,
            },
            None => None,
        };
        // SAFETY: `buffer` is either unbound or owned by this context.
        unsafe { self.gl.bind_buffer(target.into_gl(), buffer) };
    }

    fn bind_buffer_base(&self, binding_point: u32, id: BufferId) {
        if let Some(buffer) = self.buffers.get(id) {
            // SAFETY: `buffer` was created by this context.
            unsafe {
                self.gl
                    .bind_buffer_base(glow::UNIFORM_BUFFER, binding_point, Some(buffer))
            };
        }
    }

    fn create_vertex_array(&self) -> Result<VertexArrayId, ResourceError> {
        // SAFETY: object creation has no preconditions.
        let vao = unsafe { self.gl.create_vertex_array() }.map_err(ResourceError::BackendError)?;
        let id = VertexArrayId(self.next());
        self.vertex_arrays.insert(id, vao);
        Ok(id)
    }

    fn bind_vertex_array(&self, id: Option<VertexArrayId>) {
        let vao = match id {
            Some(id) => match self.vertex_arrays.get(id) {
                Some(vao) => Some(vao),
                None => return,
            },
            None => None,
        };
        // SAFETY: `vao` is either the default array or owned by this context.
        unsafe { self.gl.bind_vertex_array(vao) };
    }

    fn destroy_vertex_array(&self, id: VertexArrayId) -> Result<(), ResourceError> {
        let vao = self
            .vertex_arrays
            .remove(id)
            .ok_or(ResourceError::InvalidHandle)?;
        // SAFETY: removed from the table, deleted once.
        unsafe { self.gl.delete_vertex_array(vao) };
        Ok(())
    }

    fn set_vertex_attribute(&self, location: u32, layout: &VertexAttributeLayout) {
        // SAFETY: reads from the buffer currently bound to ARRAY_BUFFER.
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                location,
                layout.components as i32,
                glow::FLOAT,
                false,
                layout.stride as i32,
                layout.offset as i32,
            )
        };
    }

    fn enable_vertex_attribute(&self, location: u32) {
        // SAFETY: state call.
        unsafe { self.gl.enable_vertex_attrib_array(location) };
    }

    fn disable_vertex_attribute(&self, location: u32) {
        // SAFETY: state call.
        unsafe { self.gl.disable_vertex_attrib_array(location) };
    }

    fn create_shader(
        &self,
        stage: ShaderStage,
        source: &str,
        label: &str,
    ) -> Result<ShaderId, ShaderError> {
        // SAFETY: the shader is created, compiled and deleted on failure here.
        let shader = unsafe {
            let shader = self
                .gl
                .create_shader(stage.into_gl())
                .map_err(ShaderError::CreationFailed)?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if !self.gl.get_shader_compile_status(shader) {
                let info = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                log::error!("GlowContext: {stage:?} shader '{label}' failed to compile: {info}");
                return Err(ShaderError::CompilationFailed {
                    label: label.to_owned(),
                    stage,
                    log: info,
                });
            }
            shader
        };

        let id = ShaderId(self.next());
        self.shaders.insert(id, shader);
        log::debug!("GlowContext: Compiled {stage:?} shader '{label}' with ID: {id:?}");
        Ok(id)
    }

    fn destroy_shader(&self, id: ShaderId) {
        if let Some(shader) = self.shaders.remove(id) {
            // SAFETY: removed from the table, deleted once.
            unsafe { self.gl.delete_shader(shader) };
        }
    }

    fn create_program(
        &self,
        vertex: ShaderId,
        fragment: ShaderId,
        label: &str,
    ) -> Result<ProgramId, ShaderError> {
        let (Some(vs), Some(fs)) = (self.shaders.get(vertex), self.shaders.get(fragment)) else {
            return Err(ShaderError::CreationFailed(format!(
                "program '{label}' references an unknown shader"
            )));
        };

        // SAFETY: both shaders were compiled by this context.
        let program = unsafe {
            let program = self
                .gl
                .create_program()
                .map_err(ShaderError::CreationFailed)?;
            self.gl.attach_shader(program, vs);
            self.gl.attach_shader(program, fs);
            self.gl.link_program(program);
            if !self.gl.get_program_link_status(program) {
                let info = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                log::error!("GlowContext: Program '{label}' failed to link: {info}");
                return Err(ShaderError::LinkFailed {
                    label: label.to_owned(),
                    log: info,
                });
            }
            program
        };

        let id = ProgramId(self.next());
        self.programs.insert(id, program);
        log::info!("GlowContext: Linked program '{label}' with ID: {id:?}");
        Ok(id)
    }

    fn destroy_program(&self, id: ProgramId) {
        let Some(program) = self.programs.remove(id) else {
            return;
        };
        let stale: Vec<UniformLocationId> = {
            let mut cache = self.uniform_cache.borrow_mut();
            let keys: Vec<_> = cache.keys().filter(|(p, _)| *p == id).cloned().collect();
            keys.iter().filter_map(|key| cache.remove(key)).collect()
        };
        for location in stale {
            self.uniform_locations.remove(location);
        }
        // SAFETY: removed from the table, deleted once.
        unsafe { self.gl.delete_program(program) };
    }

    fn use_program(&self, id: Option<ProgramId>) {
        let program = match id {
            Some(id) => match self.programs.get(id) {
                Some(program) => Some(program),
                None => return,
            },
            None => None,
        };
        // SAFETY: `program` is either none or linked by this context.
        unsafe { self.gl.use_program(program) };
    }

    fn attribute_location(&self, program: ProgramId, name: &str) -> Option<u32> {
        let native = self.programs.get(program)?;
        // SAFETY: reflection query on a linked program.
        unsafe { self.gl.get_attrib_location(native, name) }
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocationId> {
        let key = (program, name.to_owned());
        if let Some(id) = self.uniform_cache.borrow().get(&key) {
            return Some(*id);
        }

        let native = self.programs.get(program)?;
        // SAFETY: reflection query on a linked program.
        let location = unsafe { self.gl.get_uniform_location(native, name) }?;
        let id = UniformLocationId(self.next());
        self.uniform_locations.insert(id, location);
        self.uniform_cache.borrow_mut().insert(key, id);
        Some(id)
    }

    fn uniform_block_index(&self, program: ProgramId, name: &str) -> Option<u32> {
        let native = self.programs.get(program)?;
        // SAFETY: reflection query on a linked program.
        unsafe { self.gl.get_uniform_block_index(native, name) }
    }

    fn set_uniform_block_binding(&self, program: ProgramId, block_index: u32, binding_point: u32) {
        if let Some(native) = self.programs.get(program) {
            // SAFETY: `block_index` comes from a reflection query on the same program.
            unsafe {
                self.gl
                    .uniform_block_binding(native, block_index, binding_point)
            };
        }
    }

    fn set_uniform(&self, location: UniformLocationId, value: UniformValue) {
        let Some(native) = self.uniform_locations.get(location) else {
            return;
        };
        let native = Some(&native);
        // SAFETY: the location belongs to the program made current by the caller.
        unsafe {
            match value {
                UniformValue::Int(v) => self.gl.uniform_1_i32(native, v),
                UniformValue::Float(v) => self.gl.uniform_1_f32(native, v),
                UniformValue::Vec3(v) => self.gl.uniform_3_f32(native, v.x, v.y, v.z),
                UniformValue::Vec4(v) => self.gl.uniform_4_f32(native, v.x, v.y, v.z, v.w),
                UniformValue::Mat4(m) => {
                    self.gl
                        .uniform_matrix_4_f32_slice(native, false, &m.to_cols_array())
                }
            }
        }
    }

    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError> {
        let expected = descriptor.width as usize * descriptor.height as usize * 4;
        if descriptor.pixels.len() != expected {
            return Err(ResourceError::BackendError(format!(
                "texture '{}' has {} bytes, expected {} for {}x{} RGBA8",
                descriptor.label.as_deref().unwrap_or_default(),
                descriptor.pixels.len(),
                expected,
                descriptor.width,
                descriptor.height
            )));
        }

        let filter = descriptor.filter.into_gl();
        let wrap = descriptor.wrap.into_gl();
        // SAFETY: the pixel slice length matches the declared RGBA8 extent.
        let texture = unsafe {
            let texture = self
                .gl
                .create_texture()
                .map_err(ResourceError::BackendError)?;
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                descriptor.width as i32,
                descriptor.height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(descriptor.pixels)),
            );
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, filter);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, filter);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap);
            self.gl.bind_texture(glow::TEXTURE_2D, None);
            texture
        };

        let id = TextureId(self.next());
        self.textures.insert(id, texture);
        log::debug!(
            "GlowContext: Uploaded texture '{}' ({}x{}) with ID: {:?}",
            descriptor.label.as_deref().unwrap_or_default(),
            descriptor.width,
            descriptor.height,
            id
        );
        Ok(id)
    }

    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        let texture = self.textures.remove(id).ok_or(ResourceError::InvalidHandle)?;
        // SAFETY: removed from the table, deleted once.
        unsafe { self.gl.delete_texture(texture) };
        Ok(())
    }

    fn active_texture(&self, unit: u32) {
        // SAFETY: state call.
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) };
    }

    fn bind_texture(&self, id: Option<TextureId>) {
        let texture = match id {
            Some(id) => match self.textures.get(id) {
                Some(texture) => Some(texture),
                None => return,
            },
            None => None,
        };
        // SAFETY: `texture` is either none or owned by this context.
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, texture) };
    }

    fn draw_elements(&self, mode: RenderMode, count: u32) {
        // SAFETY: reads from the bound 16-bit index buffer.
        unsafe {
            self.gl
                .draw_elements(mode.into_gl(), count as i32, glow::UNSIGNED_SHORT, 0)
        };
    }

    fn draw_arrays(&self, mode: RenderMode, first: u32, count: u32) {
        // SAFETY: reads from the enabled attribute arrays.
        unsafe {
            self.gl
                .draw_arrays(mode.into_gl(), first as i32, count as i32)
        };
    }
}
