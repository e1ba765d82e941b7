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

//! Vertex color pipeline.

use super::{PipelineDescriptor, UNIFORM_MODEL, UNIFORM_PROJECTION, UNIFORM_VIEW};
use crate::render_lane::shaders::{STANDARD_FRAG, STANDARD_VERT};
use cinder_core::renderer::api::{VertexFormat, ATTRIBUTE_COLOR, ATTRIBUTE_POSITION};
use std::borrow::Cow;

const ATTRIBUTES: &[&str] = &[ATTRIBUTE_POSITION, ATTRIBUTE_COLOR];
const UNIFORMS: &[&str] = &[UNIFORM_PROJECTION, UNIFORM_VIEW, UNIFORM_MODEL];

pub(super) fn descriptor() -> PipelineDescriptor<'static> {
    PipelineDescriptor {
        name: Cow::Borrowed("standard"),
        vertex_source: Cow::Borrowed(STANDARD_VERT),
        fragment_source: Cow::Borrowed(STANDARD_FRAG),
        vertex_format: VertexFormat::position_color(),
        attributes: ATTRIBUTES,
        uniforms: UNIFORMS,
        uniform_blocks: &[],
    }
}

#[cfg(test)]
mod tests {
    use crate::render_lane::pipeline::{Pipeline, PipelineKind};
    use cinder_core::testing::RecordingContext;

    #[test]
    fn test_vertex_format_is_position_color() {
        let context = RecordingContext::new();
        let pipeline = Pipeline::new(&context, PipelineKind::Standard).unwrap();

        assert_eq!(pipeline.vertex_format().stride_floats(), 7);
        assert!(pipeline.attribute_location("in_color").is_ok());
    }
}
