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

//! Unlit textured pipeline.

use super::{PipelineDescriptor, SAMPLER_UNIFORMS, UNIFORM_MODEL, UNIFORM_PROJECTION, UNIFORM_VIEW};
use crate::render_lane::shaders::{TEXTURE_FRAG, TEXTURE_VERT};
use cinder_core::renderer::api::{
    VertexFormat, ATTRIBUTE_NORMAL, ATTRIBUTE_POSITION, ATTRIBUTE_TEXCOORD,
};
use std::borrow::Cow;

const ATTRIBUTES: &[&str] = &[ATTRIBUTE_POSITION, ATTRIBUTE_TEXCOORD, ATTRIBUTE_NORMAL];
const UNIFORMS: &[&str] = &[
    UNIFORM_PROJECTION,
    UNIFORM_VIEW,
    UNIFORM_MODEL,
    SAMPLER_UNIFORMS[0],
];

pub(super) fn descriptor() -> PipelineDescriptor<'static> {
    PipelineDescriptor {
        name: Cow::Borrowed("texture"),
        vertex_source: Cow::Borrowed(TEXTURE_VERT),
        fragment_source: Cow::Borrowed(TEXTURE_FRAG),
        vertex_format: VertexFormat::position_texcoord_normal(),
        attributes: ATTRIBUTES,
        uniforms: UNIFORMS,
        uniform_blocks: &[],
    }
}

#[cfg(test)]
mod tests {
    use crate::render_lane::pipeline::{Pipeline, PipelineKind, SAMPLER_UNIFORMS};
    use cinder_core::testing::RecordingContext;

    #[test]
    fn test_exposes_exactly_one_sampler() {
        let context = RecordingContext::new();
        let pipeline = Pipeline::new(&context, PipelineKind::Texture).unwrap();

        assert!(pipeline.uniform_location(SAMPLER_UNIFORMS[0]).is_ok());
        assert!(pipeline.uniform_location(SAMPLER_UNIFORMS[1]).is_err());
    }
}
