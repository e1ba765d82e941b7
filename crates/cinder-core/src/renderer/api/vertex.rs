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

//! Vertex arrays and the interleaved vertex format shared by meshes and pipelines.

use serde::{Deserialize, Serialize};

/// An opaque handle to a vertex array object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayId(pub usize);

/// Name of the position attribute used by every built-in pipeline.
pub const ATTRIBUTE_POSITION: &str = "in_position";
/// Name of the texture coordinate attribute.
pub const ATTRIBUTE_TEXCOORD: &str = "in_texcoord";
/// Name of the normal attribute.
pub const ATTRIBUTE_NORMAL: &str = "in_normal";
/// Name of the per-vertex color attribute.
pub const ATTRIBUTE_COLOR: &str = "in_color";

/// One named attribute of an interleaved vertex row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexAttribute {
    /// The shader input name, e.g. `in_position`.
    pub name: String,
    /// The number of `f32` components.
    pub components: u32,
}

/// How a single attribute is read from the currently bound vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttributeLayout {
    /// The number of `f32` components.
    pub components: u32,
    /// The distance in bytes between two consecutive rows.
    pub stride: u32,
    /// The byte offset of the attribute inside a row.
    pub offset: u32,
}

/// An ordered list of attributes describing one interleaved vertex row.
///
/// The order of insertion is the order of the components in memory, and the
/// row stride is the sum of all component counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexFormat {
    attributes: Vec<VertexAttribute>,
}

impl VertexFormat {
    /// Creates an empty format.
    pub fn new() -> Self {
        Self::default()
    }

    /// The `in_position:3, in_texcoord:2, in_normal:3` layout produced by the
    /// shape generators and the OBJ loader.
    pub fn position_texcoord_normal() -> Self {
        Self::new()
            .with(ATTRIBUTE_POSITION, 3)
            .with(ATTRIBUTE_TEXCOORD, 2)
            .with(ATTRIBUTE_NORMAL, 3)
    }

    /// The `in_position:3, in_color:4` layout used with vertex colors.
    pub fn position_color() -> Self {
        Self::new().with(ATTRIBUTE_POSITION, 3).with(ATTRIBUTE_COLOR, 4)
    }

    /// Appends an attribute and returns the format, for chained construction.
    pub fn with(mut self, name: impl Into<String>, components: u32) -> Self {
        self.push(name, components);
        self
    }

    /// Appends an attribute at the end of the row.
    pub fn push(&mut self, name: impl Into<String>, components: u32) {
        self.attributes.push(VertexAttribute {
            name: name.into(),
            components,
        });
    }

    /// The attributes in memory order.
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Returns `true` if the format has no attribute.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// The number of floats in one row.
    pub fn stride_floats(&self) -> u32 {
        self.attributes.iter().map(|a| a.components).sum()
    }

    /// The size of one row in bytes.
    pub fn stride_bytes(&self) -> u32 {
        self.stride_floats() * std::mem::size_of::<f32>() as u32
    }

    /// Iterates over every attribute together with its resolved layout.
    pub fn layouts(&self) -> impl Iterator<Item = (&str, VertexAttributeLayout)> + '_ {
        let stride = self.stride_bytes();
        self.attributes.iter().scan(0u32, move |offset, attribute| {
            let layout = VertexAttributeLayout {
                components: attribute.components,
                stride,
                offset: *offset,
            };
            *offset += attribute.components * std::mem::size_of::<f32>() as u32;
            Some((attribute.name.as_str(), layout))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_format_stride() {
        let format = VertexFormat::position_texcoord_normal();
        assert_eq!(format.stride_floats(), 8);
        assert_eq!(format.stride_bytes(), 32);
    }

    #[test]
    fn test_layouts_accumulate_offsets_in_insertion_order() {
        let format = VertexFormat::position_texcoord_normal();
        let layouts: Vec<_> = format.layouts().collect();
        assert_eq!(layouts.len(), 3);
        assert_eq!(layouts[0].0, ATTRIBUTE_POSITION);
        assert_eq!(layouts[0].1.offset, 0);
        assert_eq!(layouts[1].0, ATTRIBUTE_TEXCOORD);
        assert_eq!(layouts[1].1.offset, 12);
        assert_eq!(layouts[2].0, ATTRIBUTE_NORMAL);
        assert_eq!(layouts[2].1.offset, 20);
        assert!(layouts.iter().all(|(_, l)| l.stride == 32));
    }

    #[test]
    fn test_position_color_format() {
        let format = VertexFormat::position_color();
        assert_eq!(format.stride_floats(), 7);
        assert_eq!(format.attributes()[1].name, ATTRIBUTE_COLOR);
    }
}
