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

//! Flat color pipeline.

use super::{PipelineDescriptor, UNIFORM_MODEL, UNIFORM_PROJECTION, UNIFORM_VIEW};
use crate::render_lane::shaders::{SIMPLE_FRAG, SIMPLE_VERT};
use cinder_core::renderer::api::{
    VertexFormat, ATTRIBUTE_NORMAL, ATTRIBUTE_POSITION, ATTRIBUTE_TEXCOORD,
};
use std::borrow::Cow;

/// Flat color uniform of the simple pipeline.
pub const UNIFORM_COLOR: &str = "u_color";

const ATTRIBUTES: &[&str] = &[ATTRIBUTE_POSITION, ATTRIBUTE_TEXCOORD, ATTRIBUTE_NORMAL];
const UNIFORMS: &[&str] = &[UNIFORM_PROJECTION, UNIFORM_VIEW, UNIFORM_MODEL, UNIFORM_COLOR];

pub(super) fn descriptor() -> PipelineDescriptor<'static> {
    PipelineDescriptor {
        name: Cow::Borrowed("simple"),
        vertex_source: Cow::Borrowed(SIMPLE_VERT),
        fragment_source: Cow::Borrowed(SIMPLE_FRAG),
        vertex_format: VertexFormat::position_texcoord_normal(),
        attributes: ATTRIBUTES,
        uniforms: UNIFORMS,
        uniform_blocks: &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_lane::pipeline::{Pipeline, PipelineKind};
    use cinder_core::math::Vec4;
    use cinder_core::renderer::api::UniformValue;
    use cinder_core::testing::{Call, RecordingContext};

    #[test]
    fn test_set_color_uploads_vec4() {
        let context = RecordingContext::new();
        let pipeline = Pipeline::new(&context, PipelineKind::Simple).unwrap();
        let location = pipeline.uniform_location(UNIFORM_COLOR).unwrap();
        context.clear_calls();

        let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(pipeline.set_color(&context, red));
        assert_eq!(
            context.calls(),
            vec![Call::SetUniform {
                location,
                value: UniformValue::Vec4(red)
            }]
        );
    }
}
