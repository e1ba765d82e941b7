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

//! An in-memory [`GraphicsContext`] that records every call.
//!
//! Reflection queries are answered from the shader sources: a name is reported
//! as present when it occurs as a whole identifier in the linked program.

use crate::renderer::api::*;
use crate::renderer::error::{ResourceError, ShaderError};
use crate::renderer::traits::GraphicsContext;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One recorded context call.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Call {
    CreateBuffer {
        id: BufferId,
        target: BufferTarget,
        len: usize,
    },
    WriteBuffer {
        id: BufferId,
        len: usize,
    },
    DestroyBuffer(BufferId),
    BindBuffer(BufferTarget, Option<BufferId>),
    BindBufferBase {
        binding_point: u32,
        buffer: BufferId,
    },
    CreateVertexArray(VertexArrayId),
    BindVertexArray(Option<VertexArrayId>),
    DestroyVertexArray(VertexArrayId),
    SetVertexAttribute {
        location: u32,
        layout: VertexAttributeLayout,
    },
    EnableVertexAttribute(u32),
    DisableVertexAttribute(u32),
    CreateShader(ShaderId, ShaderStage),
    DestroyShader(ShaderId),
    CreateProgram(ProgramId),
    DestroyProgram(ProgramId),
    UseProgram(Option<ProgramId>),
    SetUniformBlockBinding {
        program: ProgramId,
        block_index: u32,
        binding_point: u32,
    },
    SetUniform {
        location: UniformLocationId,
        value: UniformValue,
    },
    CreateTexture {
        id: TextureId,
        width: u32,
        height: u32,
    },
    DestroyTexture(TextureId),
    ActiveTexture(u32),
    BindTexture(Option<TextureId>),
    DrawElements {
        mode: RenderMode,
        count: u32,
    },
    DrawArrays {
        mode: RenderMode,
        first: u32,
        count: u32,
    },
}

/// A recording context with no GPU behind it.
#[derive(Debug, Default)]
pub struct RecordingContext {
    next_id: AtomicUsize,
    calls: Rc<RefCell<Vec<Call>>>,
    shaders: RefCell<HashMap<ShaderId, String>>,
    programs: RefCell<HashMap<ProgramId, String>>,
    attributes: RefCell<HashMap<(ProgramId, String), u32>>,
    uniforms: RefCell<HashMap<(ProgramId, String), UniformLocationId>>,
    blocks: RefCell<HashMap<(ProgramId, String), u32>>,
    uniform_names: Rc<RefCell<HashMap<UniformLocationId, String>>>,
    fail_stage: Cell<Option<ShaderStage>>,
    fail_link: Cell<bool>,
}

impl RecordingContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(1),
            ..Default::default()
        }
    }

    /// Makes every subsequent compilation of `stage` fail.
    pub fn fail_compilation_of(&self, stage: ShaderStage) {
        self.fail_stage.set(Some(stage));
    }

    /// Makes every subsequent link fail.
    pub fn fail_linking(&self) {
        self.fail_link.set(true);
    }

    /// A snapshot of the recorded calls.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// A handle on the call log that stays readable after the context is boxed.
    pub fn call_log(&self) -> CallLog {
        CallLog {
            calls: Rc::clone(&self.calls),
            uniform_names: Rc::clone(&self.uniform_names),
        }
    }

    /// Forgets the recorded calls, keeping every resource alive.
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Counts the recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| predicate(c)).count()
    }

    /// The uniform name a location was handed out for.
    pub fn uniform_name(&self, location: UniformLocationId) -> Option<String> {
        self.uniform_names.borrow().get(&location).cloned()
    }

    fn next(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn program_declares(&self, program: ProgramId, name: &str) -> bool {
        self.programs
            .borrow()
            .get(&program)
            .is_some_and(|source| contains_identifier(source, name))
    }
}

/// A shared view of a [`RecordingContext`]'s calls.
#[derive(Debug, Clone)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<Call>>>,
    uniform_names: Rc<RefCell<HashMap<UniformLocationId, String>>>,
}

impl CallLog {
    /// A snapshot of the recorded calls.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Counts the recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| predicate(c)).count()
    }

    /// The names of the uniforms written, in call order.
    pub fn uniforms_set(&self) -> Vec<String> {
        let names = self.uniform_names.borrow();
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::SetUniform { location, .. } => names.get(location).cloned(),
                _ => None,
            })
            .collect()
    }
}

fn contains_identifier(source: &str, name: &str) -> bool {
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';
    source.match_indices(name).any(|(start, _)| {
        let before = source[..start].chars().next_back();
        let after = source[start + name.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

impl GraphicsContext for RecordingContext {
    fn create_buffer(&self, descriptor: &BufferDescriptor) -> Result<BufferId, ResourceError> {
        let id = BufferId(self.next());
        self.record(Call::CreateBuffer {
            id,
            target: descriptor.target,
            len: descriptor.contents.len(),
        });
        Ok(id)
    }

    fn write_buffer(
        &self,
        id: BufferId,
        _target: BufferTarget,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        self.record(Call::WriteBuffer {
            id,
            len: data.len(),
        });
        Ok(())
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), ResourceError> {
        self.record(Call::DestroyBuffer(id));
        Ok(())
    }

    fn bind_buffer(&self, target: BufferTarget, id: Option<BufferId>) {
        self.record(Call::BindBuffer(target, id));
    }

    fn bind_buffer_base(&self, binding_point: u32, buffer: BufferId) {
        self.record(Call::BindBufferBase {
            binding_point,
            buffer,
        });
    }

    fn create_vertex_array(&self) -> Result<VertexArrayId, ResourceError> {
        let id = VertexArrayId(self.next());
        self.record(Call::CreateVertexArray(id));
        Ok(id)
    }

    fn bind_vertex_array(&self, id: Option<VertexArrayId>) {
        self.record(Call::BindVertexArray(id));
    }

    fn destroy_vertex_array(&self, id: VertexArrayId) -> Result<(), ResourceError> {
        self.record(Call::DestroyVertexArray(id));
        Ok(())
    }

    fn set_vertex_attribute(&self, location: u32, layout: &VertexAttributeLayout) {
        self.record(Call::SetVertexAttribute {
            location,
            layout: *layout,
        });
    }

    fn enable_vertex_attribute(&self, location: u32) {
        self.record(Call::EnableVertexAttribute(location));
    }

    fn disable_vertex_attribute(&self, location: u32) {
        self.record(Call::DisableVertexAttribute(location));
    }

    fn create_shader(
        &self,
        stage: ShaderStage,
        source: &str,
        label: &str,
    ) -> Result<ShaderId, ShaderError> {
        if self.fail_stage.get() == Some(stage) {
            return Err(ShaderError::CompilationFailed {
                label: label.to_string(),
                stage,
                log: "forced failure".to_string(),
            });
        }
        let id = ShaderId(self.next());
        self.shaders.borrow_mut().insert(id, source.to_string());
        self.record(Call::CreateShader(id, stage));
        Ok(id)
    }

    fn destroy_shader(&self, id: ShaderId) {
        self.record(Call::DestroyShader(id));
    }

    fn create_program(
        &self,
        vertex: ShaderId,
        fragment: ShaderId,
        label: &str,
    ) -> Result<ProgramId, ShaderError> {
        if self.fail_link.get() {
            return Err(ShaderError::LinkFailed {
                label: label.to_string(),
                log: "forced failure".to_string(),
            });
        }
        let shaders = self.shaders.borrow();
        let source = [vertex, fragment]
            .iter()
            .filter_map(|id| shaders.get(id).cloned())
            .collect::<Vec<_>>()
            .join("\n");
        let id = ProgramId(self.next());
        self.programs.borrow_mut().insert(id, source);
        self.record(Call::CreateProgram(id));
        Ok(id)
    }

    fn destroy_program(&self, id: ProgramId) {
        self.programs.borrow_mut().remove(&id);
        self.record(Call::DestroyProgram(id));
    }

    fn use_program(&self, id: Option<ProgramId>) {
        self.record(Call::UseProgram(id));
    }

    fn attribute_location(&self, program: ProgramId, name: &str) -> Option<u32> {
        if !self.program_declares(program, name) {
            return None;
        }
        let mut attributes = self.attributes.borrow_mut();
        let next = attributes.keys().filter(|(p, _)| *p == program).count() as u32;
        Some(
            *attributes
                .entry((program, name.to_string()))
                .or_insert(next),
        )
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocationId> {
        if !self.program_declares(program, name) {
            return None;
        }
        let location = *self
            .uniforms
            .borrow_mut()
            .entry((program, name.to_string()))
            .or_insert_with(|| UniformLocationId(self.next()));
        self.uniform_names
            .borrow_mut()
            .insert(location, name.to_string());
        Some(location)
    }

    fn uniform_block_index(&self, program: ProgramId, name: &str) -> Option<u32> {
        if !self.program_declares(program, name) {
            return None;
        }
        let mut blocks = self.blocks.borrow_mut();
        let next = blocks.keys().filter(|(p, _)| *p == program).count() as u32;
        Some(*blocks.entry((program, name.to_string())).or_insert(next))
    }

    fn set_uniform_block_binding(&self, program: ProgramId, block_index: u32, binding_point: u32) {
        self.record(Call::SetUniformBlockBinding {
            program,
            block_index,
            binding_point,
        });
    }

    fn set_uniform(&self, location: UniformLocationId, value: UniformValue) {
        self.record(Call::SetUniform { location, value });
    }

    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<TextureId, ResourceError> {
        let id = TextureId(self.next());
        self.record(Call::CreateTexture {
            id,
            width: descriptor.width,
            height: descriptor.height,
        });
        Ok(id)
    }

    fn destroy_texture(&self, id: TextureId) -> Result<(), ResourceError> {
        self.record(Call::DestroyTexture(id));
        Ok(())
    }

    fn active_texture(&self, unit: u32) {
        self.record(Call::ActiveTexture(unit));
    }

    fn bind_texture(&self, id: Option<TextureId>) {
        self.record(Call::BindTexture(id));
    }

    fn draw_elements(&self, mode: RenderMode, count: u32) {
        self.record(Call::DrawElements { mode, count });
    }

    fn draw_arrays(&self, mode: RenderMode, first: u32, count: u32) {
        self.record(Call::DrawArrays { mode, first, count });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_matching_respects_word_boundaries() {
        let source = "uniform sampler2D u_sampler0;\nuniform vec4 u_color;";
        assert!(contains_identifier(source, "u_sampler0"));
        assert!(!contains_identifier(source, "u_sampler"));
        assert!(!contains_identifier(source, "u_sampler1"));
        assert!(contains_identifier(source, "u_color"));
    }

    #[test]
    fn test_reflection_follows_program_sources() {
        let context = RecordingContext::new();
        let vs = context
            .create_shader(ShaderStage::Vertex, "in vec3 in_position; uniform mat4 u_mModel;", "vs")
            .unwrap();
        let fs = context
            .create_shader(ShaderStage::Fragment, "uniform vec4 u_color;", "fs")
            .unwrap();
        let program = context.create_program(vs, fs, "test").unwrap();

        assert_eq!(context.attribute_location(program, "in_position"), Some(0));
        assert_eq!(context.attribute_location(program, "in_normal"), None);
        let color = context.uniform_location(program, "u_color").unwrap();
        assert_eq!(context.uniform_location(program, "u_color"), Some(color));
        assert_eq!(context.uniform_name(color).as_deref(), Some("u_color"));
    }
}
