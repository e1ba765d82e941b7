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

//! Phong lighting pipeline.
//!
//! Besides the matrices it reads the eye position, one sampler and four
//! std140 uniform blocks: the material and one light of each kind. The blocks
//! are bound by binding point, see [`crate::render_lane::LightRig`].

use super::{PipelineDescriptor, SAMPLER_UNIFORMS, UNIFORM_MODEL, UNIFORM_PROJECTION, UNIFORM_VIEW};
use crate::render_lane::shaders::{PHONG_FRAG, PHONG_VERT};
use cinder_core::renderer::api::{
    VertexFormat, ATTRIBUTE_NORMAL, ATTRIBUTE_POSITION, ATTRIBUTE_TEXCOORD,
};
use cinder_core::renderer::light::{DIRECTIONAL_LIGHT_BLOCK, POINT_LIGHT_BLOCK, SPOT_LIGHT_BLOCK};
use cinder_core::renderer::material::MATERIAL_BLOCK;
use std::borrow::Cow;

/// Eye position uniform of the Phong pipeline.
pub const UNIFORM_CAMERA_POSITION: &str = "u_camera_position";

const ATTRIBUTES: &[&str] = &[ATTRIBUTE_POSITION, ATTRIBUTE_TEXCOORD, ATTRIBUTE_NORMAL];
const UNIFORMS: &[&str] = &[
    UNIFORM_PROJECTION,
    UNIFORM_VIEW,
    UNIFORM_MODEL,
    UNIFORM_CAMERA_POSITION,
    SAMPLER_UNIFORMS[0],
];
const UNIFORM_BLOCKS: &[&str] = &[
    MATERIAL_BLOCK,
    DIRECTIONAL_LIGHT_BLOCK,
    POINT_LIGHT_BLOCK,
    SPOT_LIGHT_BLOCK,
];

pub(super) fn descriptor() -> PipelineDescriptor<'static> {
    PipelineDescriptor {
        name: Cow::Borrowed("phong"),
        vertex_source: Cow::Borrowed(PHONG_VERT),
        fragment_source: Cow::Borrowed(PHONG_FRAG),
        vertex_format: VertexFormat::position_texcoord_normal(),
        attributes: ATTRIBUTES,
        uniforms: UNIFORMS,
        uniform_blocks: UNIFORM_BLOCKS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_lane::pipeline::{Pipeline, PipelineKind};
    use cinder_core::testing::RecordingContext;

    #[test]
    fn test_resolves_all_blocks() {
        let context = RecordingContext::new();
        let pipeline = Pipeline::new(&context, PipelineKind::Phong).unwrap();

        for block in UNIFORM_BLOCKS {
            assert!(pipeline.has_uniform_block(block), "missing {block}");
        }
        assert!(pipeline.uniform_location(UNIFORM_CAMERA_POSITION).is_ok());
    }

    #[test]
    fn test_flat_pipeline_has_no_blocks() {
        let context = RecordingContext::new();
        let pipeline = Pipeline::new(&context, PipelineKind::Simple).unwrap();
        assert!(!pipeline.has_uniform_block(MATERIAL_BLOCK));
    }
}
