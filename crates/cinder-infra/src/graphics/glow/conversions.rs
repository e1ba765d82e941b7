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

//! Conversions from Cinder's backend-agnostic enums to GL constants.

use cinder_core::renderer::api::{
    BufferTarget, BufferUsage, RenderMode, ShaderStage, TextureFilter, TextureWrap,
};

/// A local extension trait to convert engine types into GL enumerants.
/// This avoids Rust's orphan rules while keeping an idiomatic `.into_gl()` syntax.
pub trait IntoGl<T> {
    /// Consumes self and converts it into a GL value.
    fn into_gl(self) -> T;
}

impl IntoGl<u32> for BufferTarget {
    fn into_gl(self) -> u32 {
        match self {
            BufferTarget::Vertex => glow::ARRAY_BUFFER,
            BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
            BufferTarget::Uniform => glow::UNIFORM_BUFFER,
        }
    }
}

impl IntoGl<u32> for BufferUsage {
    fn into_gl(self) -> u32 {
        match self {
            BufferUsage::StaticDraw => glow::STATIC_DRAW,
            BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
        }
    }
}

impl IntoGl<u32> for ShaderStage {
    fn into_gl(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl IntoGl<u32> for RenderMode {
    fn into_gl(self) -> u32 {
        match self {
            RenderMode::Points => glow::POINTS,
            RenderMode::Lines => glow::LINES,
            RenderMode::LineLoop => glow::LINE_LOOP,
            RenderMode::LineStrip => glow::LINE_STRIP,
            RenderMode::Triangles => glow::TRIANGLES,
            RenderMode::TriangleStrip => glow::TRIANGLE_STRIP,
            RenderMode::TriangleFan => glow::TRIANGLE_FAN,
        }
    }
}

// Texture parameters are passed through `tex_parameter_i32`.

impl IntoGl<i32> for TextureFilter {
    fn into_gl(self) -> i32 {
        match self {
            TextureFilter::Nearest => glow::NEAREST as i32,
            TextureFilter::Linear => glow::LINEAR as i32,
        }
    }
}

impl IntoGl<i32> for TextureWrap {
    fn into_gl(self) -> i32 {
        match self {
            TextureWrap::Repeat => glow::REPEAT as i32,
            TextureWrap::ClampToEdge => glow::CLAMP_TO_EDGE as i32,
            TextureWrap::MirroredRepeat => glow::MIRRORED_REPEAT as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_targets() {
        assert_eq!(BufferTarget::Vertex.into_gl(), 0x8892);
        assert_eq!(BufferTarget::Index.into_gl(), 0x8893);
        assert_eq!(BufferTarget::Uniform.into_gl(), 0x8A11);
    }

    #[test]
    fn test_render_modes_match_raw_values() {
        for mode in [
            RenderMode::Points,
            RenderMode::Lines,
            RenderMode::LineLoop,
            RenderMode::LineStrip,
            RenderMode::Triangles,
            RenderMode::TriangleStrip,
            RenderMode::TriangleFan,
        ] {
            assert_eq!(mode.into_gl(), mode.as_raw());
        }
    }

    #[test]
    fn test_shader_stages() {
        assert_eq!(ShaderStage::Vertex.into_gl(), 0x8B31);
        assert_eq!(ShaderStage::Fragment.into_gl(), 0x8B30);
    }

    #[test]
    fn test_texture_parameters() {
        assert_eq!(TextureFilter::Linear.into_gl(), 0x2601);
        assert_eq!(TextureFilter::Nearest.into_gl(), 0x2600);
        assert_eq!(TextureWrap::Repeat.into_gl(), 0x2901);
        assert_eq!(TextureWrap::ClampToEdge.into_gl(), 0x812F);
        assert_eq!(TextureWrap::MirroredRepeat.into_gl(), 0x8370);
    }

    #[test]
    fn test_buffer_usages() {
        assert_eq!(BufferUsage::StaticDraw.into_gl(), 0x88E4);
        assert_eq!(BufferUsage::DynamicDraw.into_gl(), 0x88E8);
    }
}
