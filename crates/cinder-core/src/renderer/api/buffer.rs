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

//! Defines data structures related to GPU buffer resources.

use std::borrow::Cow;

/// The binding target of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Interleaved vertex data (`ARRAY_BUFFER`).
    Vertex,
    /// 16-bit element indices (`ELEMENT_ARRAY_BUFFER`).
    Index,
    /// A std140 uniform block (`UNIFORM_BUFFER`).
    Uniform,
}

/// A hint describing how often the contents of a buffer change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    /// Written once, drawn many times.
    #[default]
    StaticDraw,
    /// Rewritten repeatedly, for instance uniform blocks.
    DynamicDraw,
}

/// A descriptor used to create a [`BufferId`] with its initial contents.
#[derive(Debug, Clone)]
pub struct BufferDescriptor<'a> {
    /// An optional debug label for the buffer.
    pub label: Option<Cow<'a, str>>,
    /// The target the buffer is created for.
    pub target: BufferTarget,
    /// The usage hint forwarded to the driver.
    pub usage: BufferUsage,
    /// The initial contents of the buffer.
    pub contents: &'a [u8],
}

/// An opaque handle to a GPU buffer resource.
///
/// This ID is returned by [`GraphicsContext::create_buffer`](crate::GraphicsContext::create_buffer)
/// and is used to reference the buffer in all subsequent operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub usize);
