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

use crate::renderer::api::*;
use crate::renderer::error::{ResourceError, ShaderError};
use std::fmt::Debug;

/// The capability interface of a GL-style immediate graphics context.
///
/// Every scene object receives the context explicitly instead of reaching for a
/// global. Implementations are bound to the thread that owns the native context,
/// so the trait is neither `Send` nor `Sync`; they keep interior state behind
/// `&self` the same way a device handle does.
///
/// Binding methods never fail. Passing an unknown handle to them is logged by the
/// backend and ignored.
pub trait GraphicsContext: Debug {
    /// Creates a new GPU buffer and initializes it with the provided contents.
    /// ## Arguments
    /// * `descriptor` - The target, usage hint and initial contents of the buffer.
    /// ## Returns
    /// A `Result` containing the ID of the created buffer or an error if the creation fails.
    /// ## Errors
    /// * `ResourceError::BackendError` - If the backend could not allocate the buffer.
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError>;

    /// Replaces the whole contents of an existing buffer, keeping its handle.
    /// ## Arguments
    /// * `id` - The buffer to rewrite.
    /// * `target` - The target the buffer was created for.
    /// * `data` - The new contents.
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If the buffer does not exist.
    fn write_buffer(
        &self,
        id: BufferId,
        target: BufferTarget,
        data: &[u8],
    ) -> Result<(), ResourceError>;

    /// Destroys a GPU buffer.
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If the buffer does not exist.
    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError>;

    /// Binds a buffer to a target, or unbinds the target when `id` is `None`.
    fn bind_buffer(&self, target: BufferTarget, id: Option<BufferId>);

    /// Binds a uniform buffer to an indexed uniform binding point.
    fn bind_buffer_base(&self, binding_point: u32, id: BufferId);

    /// Creates a vertex array object.
    /// ## Errors
    /// * `ResourceError::BackendError` - If the backend could not allocate the object.
    fn create_vertex_array(&self) -> Result<VertexArrayId, ResourceError>;

    /// Binds a vertex array, or the default one when `id` is `None`.
    fn bind_vertex_array(&self, id: Option<VertexArrayId>);

    /// Destroys a vertex array object.
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If the vertex array does not exist.
    fn destroy_vertex_array(&self, id: VertexArrayId) -> Result<(), ResourceError>;

    /// Describes how the attribute at `location` is read from the bound vertex buffer.
    fn set_vertex_attribute(&self, location: u32, layout: &VertexAttributeLayout);

    /// Enables the vertex attribute array at `location`.
    fn enable_vertex_attribute(&self, location: u32);

    /// Disables the vertex attribute array at `location`.
    fn disable_vertex_attribute(&self, location: u32);

    /// Compiles a shader object from source.
    /// ## Arguments
    /// * `stage` - The stage the source targets.
    /// * `source` - The GLSL source text.
    /// * `label` - A label used in diagnostics.
    /// ## Returns
    /// The compiled shader handle.
    /// ## Errors
    /// * `ShaderError::CompilationFailed` - The info log is logged and the shader deleted.
    fn create_shader(
        &self,
        stage: ShaderStage,
        source: &str,
        label: &str,
    ) -> Result<ShaderId, ShaderError>;

    /// Destroys a shader object.
    fn destroy_shader(&self, id: ShaderId);

    /// Links a vertex and a fragment shader into a program.
    /// ## Errors
    /// * `ShaderError::LinkFailed` - The info log is logged and the program deleted.
    fn create_program(
        &self,
        vertex: ShaderId,
        fragment: ShaderId,
        label: &str,
    ) -> Result<ProgramId, ShaderError>;

    /// Destroys a program.
    fn destroy_program(&self, id: ProgramId);

    /// Makes a program current, or unbinds any program when `id` is `None`.
    fn use_program(&self, id: Option<ProgramId>);

    /// Returns the location of an active vertex attribute of `program`.
    fn attribute_location(&self, program: ProgramId, name: &str) -> Option<u32>;

    /// Returns the location of an active uniform of `program`.
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocationId>;

    /// Returns the index of a uniform block of `program`.
    fn uniform_block_index(&self, program: ProgramId, name: &str) -> Option<u32>;

    /// Connects a uniform block of `program` to a binding point.
    fn set_uniform_block_binding(&self, program: ProgramId, block_index: u32, binding_point: u32);

    /// Uploads a value to a uniform of the current program.
    fn set_uniform(&self, location: UniformLocationId, value: UniformValue);

    /// Creates a 2D texture and uploads its RGBA8 pixels.
    /// ## Errors
    /// * `ResourceError::BackendError` - If the backend could not allocate the texture.
    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError>;

    /// Destroys a texture.
    /// ## Errors
    /// * `ResourceError::InvalidHandle` - If the texture does not exist.
    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError>;

    /// Selects the texture unit affected by subsequent [`bind_texture`](Self::bind_texture) calls.
    fn active_texture(&self, unit: u32);

    /// Binds a 2D texture to the active unit, or unbinds it when `id` is `None`.
    fn bind_texture(&self, id: Option<TextureId>);

    /// Draws `count` 16-bit indices from the bound index buffer.
    fn draw_elements(&self, mode: RenderMode, count: u32);

    /// Draws `count` vertices starting at `first` from the enabled attribute arrays.
    fn draw_arrays(&self, mode: RenderMode, first: u32, count: u32);
}
