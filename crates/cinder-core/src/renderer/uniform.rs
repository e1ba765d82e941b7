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

//! Lazily synchronized std140 uniform blocks.
//!
//! Materials and lights all follow the same contract: a dirty flag, an
//! externally assigned binding point and a cached GPU buffer. [`UniformBlock`]
//! captures that contract once; each implementor only supplies its packed
//! layout through [`UniformBlock::to_raw`].

use crate::renderer::api::{BufferDescriptor, BufferId, BufferTarget, BufferUsage, ProgramId};
use crate::renderer::error::ResourceError;
use crate::renderer::traits::GraphicsContext;
use bytemuck::Pod;
use std::borrow::Cow;

/// The GPU-side bookkeeping of one uniform block instance.
///
/// A fresh state is dirty so that the first read uploads the block. Cloning a
/// state keeps the binding point but not the buffer: the clone allocates its
/// own buffer on first use.
#[derive(Debug)]
pub struct UniformState {
    binding_point: Option<u32>,
    buffer: Option<BufferId>,
    dirty: bool,
    linked_program: Option<ProgramId>,
    warned_unbound: bool,
}

impl Default for UniformState {
    fn default() -> Self {
        Self {
            binding_point: None,
            buffer: None,
            dirty: true,
            linked_program: None,
            warned_unbound: false,
        }
    }
}

impl Clone for UniformState {
    fn clone(&self) -> Self {
        Self {
            binding_point: self.binding_point,
            ..Self::default()
        }
    }
}

impl UniformState {
    /// Creates an unbound, dirty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The binding point assigned by the application, if any.
    pub fn binding_point(&self) -> Option<u32> {
        self.binding_point
    }

    /// Assigns or clears the binding point.
    pub fn set_binding_point(&mut self, binding_point: Option<u32>) {
        if self.binding_point != binding_point {
            self.binding_point = binding_point;
            self.linked_program = None;
            self.warned_unbound = false;
        }
    }

    /// Flags the CPU-side values as changed.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns `true` if the next read must upload the block.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The cached buffer, without touching the GPU.
    pub fn cached_buffer(&self) -> Option<BufferId> {
        self.buffer
    }

    /// Makes sure the GPU buffer holds `bytes` and returns its handle.
    ///
    /// The buffer is created on first use and rewritten in place while the
    /// state is dirty. The named block of `program` is connected to the binding
    /// point the first time a given program is seen.
    ///
    /// ## Errors
    /// * `ResourceError::UnboundBindingPoint` - No binding point is assigned. Nothing is allocated.
    /// * Any error of the context while creating or writing the buffer.
    pub fn sync(
        &mut self,
        context: &dyn GraphicsContext,
        program: ProgramId,
        block: &'static str,
        bytes: &[u8],
    ) -> Result<BufferId, ResourceError> {
        let binding_point = self
            .binding_point
            .ok_or(ResourceError::UnboundBindingPoint { block })?;

        let buffer = match self.buffer {
            Some(buffer) => {
                if self.dirty {
                    context.write_buffer(buffer, BufferTarget::Uniform, bytes)?;
                    log::trace!("UniformState: Rewrote '{block}' in {buffer:?}");
                }
                buffer
            }
            None => {
                let buffer = context.create_buffer(&BufferDescriptor {
                    label: Some(Cow::Borrowed(block)),
                    target: BufferTarget::Uniform,
                    usage: BufferUsage::DynamicDraw,
                    contents: bytes,
                })?;
                log::debug!("UniformState: Created {buffer:?} for '{block}'");
                self.buffer = Some(buffer);
                buffer
            }
        };
        self.dirty = false;

        if self.linked_program != Some(program) {
            match context.uniform_block_index(program, block) {
                Some(index) => {
                    context.set_uniform_block_binding(program, index, binding_point);
                    self.linked_program = Some(program);
                }
                None => log::debug!("UniformState: {program:?} declares no block '{block}'"),
            }
        }

        Ok(buffer)
    }

    /// Destroys the GPU buffer, if any. The next read recreates it.
    pub fn release(&mut self, context: &dyn GraphicsContext) {
        if let Some(buffer) = self.buffer.take() {
            if let Err(e) = context.destroy_buffer(buffer) {
                log::warn!("UniformState: Failed to destroy {buffer:?}: {e}");
            }
        }
        self.dirty = true;
        self.linked_program = None;
    }

    fn take_unbound_warning(&mut self) -> bool {
        !std::mem::replace(&mut self.warned_unbound, true)
    }
}

/// A CPU-side value mirrored into a std140 uniform block.
pub trait UniformBlock {
    /// The packed GPU layout of the block.
    type Raw: Pod;

    /// The block name declared by the shaders, e.g. `u_material`.
    const BLOCK_NAME: &'static str;

    /// Packs the current values into the GPU layout.
    fn to_raw(&self) -> Self::Raw;

    /// Read access to the GPU bookkeeping.
    fn uniform_state(&self) -> &UniformState;

    /// Write access to the GPU bookkeeping.
    fn uniform_state_mut(&mut self) -> &mut UniformState;

    /// The binding point this block is uploaded to, `None` while unbound.
    fn binding_point(&self) -> Option<u32> {
        self.uniform_state().binding_point()
    }

    /// Assigns the binding point this block is uploaded to.
    fn set_binding_point(&mut self, binding_point: u32) {
        self.uniform_state_mut()
            .set_binding_point(Some(binding_point));
    }

    /// Returns the GPU buffer holding this block for `program`.
    ///
    /// Consecutive calls without an intervening change return the same cached
    /// handle without touching the buffer. Returns `None`, without allocating,
    /// while no binding point is assigned or if the upload fails.
    fn uniform_buffer(
        &mut self,
        context: &dyn GraphicsContext,
        program: ProgramId,
    ) -> Option<BufferId> {
        let raw = self.to_raw();
        let state = self.uniform_state_mut();
        match state.sync(context, program, Self::BLOCK_NAME, bytemuck::bytes_of(&raw)) {
            Ok(buffer) => Some(buffer),
            Err(ResourceError::UnboundBindingPoint { block }) => {
                if state.take_unbound_warning() {
                    log::warn!("UniformBlock: '{block}' has no binding point, upload skipped");
                }
                None
            }
            Err(e) => {
                log::error!("UniformBlock: Failed to upload '{}': {e}", Self::BLOCK_NAME);
                None
            }
        }
    }
}
