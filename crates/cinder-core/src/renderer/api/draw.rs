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

//! Primitive modes for draw calls.

use serde::{Deserialize, Serialize};

/// The primitive assembly mode of a draw call.
///
/// The discriminants match the WebGL / OpenGL ES enumeration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum RenderMode {
    /// Each vertex is a point.
    Points = 0,
    /// Each pair of vertices is a line segment.
    Lines = 1,
    /// A closed polyline through every vertex.
    LineLoop = 2,
    /// An open polyline through every vertex.
    LineStrip = 3,
    /// Each triple of vertices is a triangle.
    #[default]
    Triangles = 4,
    /// A strip of triangles sharing edges.
    TriangleStrip = 5,
    /// A fan of triangles sharing the first vertex.
    TriangleFan = 6,
}

impl RenderMode {
    /// Returns the raw enumeration value used by GL-style APIs.
    pub fn as_raw(self) -> u32 {
        self as u32
    }
}
