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

//! A single draw call worth of geometry.

use crate::renderer::api::BufferId;
use crate::renderer::traits::GraphicsContext;
use crate::scene::bounding::BoundingVolume;

/// The GPU buffers, counts, material reference and bounds of one draw call.
///
/// A submesh is created by a mesh builder and only its material index changes
/// afterwards. Its buffers are released together with the owning mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Submesh {
    vertex_buffer: BufferId,
    index_buffer: Option<BufferId>,
    vertex_count: u32,
    index_count: u32,
    material_index: Option<usize>,
    bounding: Option<BoundingVolume>,
}

impl Submesh {
    /// Creates a non-indexed submesh drawing `vertex_count` vertices.
    pub fn new(vertex_buffer: BufferId, vertex_count: u32) -> Self {
        Self {
            vertex_buffer,
            index_buffer: None,
            vertex_count,
            index_count: 0,
            material_index: None,
            bounding: None,
        }
    }

    /// Attaches a 16-bit index buffer holding `index_count` indices.
    pub fn with_indices(mut self, index_buffer: BufferId, index_count: u32) -> Self {
        self.index_buffer = Some(index_buffer);
        self.index_count = index_count;
        self
    }

    /// Attaches a bounding volume.
    pub fn with_bounding(mut self, bounding: BoundingVolume) -> Self {
        self.bounding = Some(bounding);
        self
    }

    /// The interleaved vertex buffer.
    pub fn vertex_buffer(&self) -> BufferId {
        self.vertex_buffer
    }

    /// The index buffer, when the submesh is indexed.
    pub fn index_buffer(&self) -> Option<BufferId> {
        self.index_buffer
    }

    /// Number of vertices in the vertex buffer.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Number of indices, `0` for non-indexed submeshes.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Returns `true` when the submesh is drawn with indices.
    pub fn is_indexed(&self) -> bool {
        self.index_buffer.is_some() && self.index_count > 0
    }

    /// Index of the material in the owning mesh, `None` for no material.
    pub fn material_index(&self) -> Option<usize> {
        self.material_index
    }

    /// Reassigns the material.
    pub fn set_material_index(&mut self, index: Option<usize>) {
        self.material_index = index;
    }

    /// The bounding volume, if one was computed.
    pub fn bounding_volume(&self) -> Option<&BoundingVolume> {
        self.bounding.as_ref()
    }

    /// Replaces the bounding volume.
    pub fn set_bounding_volume(&mut self, bounding: Option<BoundingVolume>) {
        self.bounding = bounding;
    }

    /// Destroys the GPU buffers of the submesh.
    pub fn release(&self, context: &dyn GraphicsContext) {
        let buffers = std::iter::once(self.vertex_buffer).chain(self.index_buffer);
        for buffer in buffers {
            if let Err(e) = context.destroy_buffer(buffer) {
                log::warn!("Submesh: Failed to destroy {buffer:?}: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingContext};

    #[test]
    fn test_indexed_and_non_indexed() {
        let plain = Submesh::new(BufferId(1), 36);
        assert!(!plain.is_indexed());
        assert_eq!(plain.material_index(), None);

        let indexed = Submesh::new(BufferId(1), 24).with_indices(BufferId(2), 36);
        assert!(indexed.is_indexed());
        assert_eq!(indexed.index_count(), 36);
    }

    #[test]
    fn test_release_destroys_both_buffers() {
        let context = RecordingContext::new();
        Submesh::new(BufferId(1), 4)
            .with_indices(BufferId(2), 6)
            .release(&context);
        assert_eq!(
            context.calls(),
            vec![
                Call::DestroyBuffer(BufferId(1)),
                Call::DestroyBuffer(BufferId(2))
            ]
        );
    }
}
