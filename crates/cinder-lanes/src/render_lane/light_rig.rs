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

//! Binds the scene lights to a pipeline.

use super::pipeline::Pipeline;
use cinder_core::renderer::light::{DirectionalLight, PointLight, SpotLight};
use cinder_core::renderer::uniform::UniformBlock;
use cinder_core::GraphicsContext;

/// At most one light of each kind, as read by the Phong pipeline.
///
/// Each light keeps its own binding point. [`LightRig::bind`] uploads dirty
/// lights and binds their buffers, skipping lights whose block the pipeline
/// does not declare.
#[derive(Debug, Clone, Default)]
pub struct LightRig {
    /// The directional light, if any.
    pub directional: Option<DirectionalLight>,
    /// The point light, if any.
    pub point: Option<PointLight>,
    /// The spot light, if any.
    pub spot: Option<SpotLight>,
}

impl LightRig {
    /// Creates an empty rig.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds every present light the pipeline can read.
    ///
    /// Returns the number of lights bound.
    pub fn bind(&mut self, context: &dyn GraphicsContext, pipeline: &Pipeline) -> usize {
        let mut bound = 0;
        if let Some(light) = self.directional.as_mut() {
            bound += usize::from(bind_block(context, pipeline, light));
        }
        if let Some(light) = self.point.as_mut() {
            bound += usize::from(bind_block(context, pipeline, light));
        }
        if let Some(light) = self.spot.as_mut() {
            bound += usize::from(bind_block(context, pipeline, light));
        }
        bound
    }

    /// Destroys the GPU buffers of every light.
    pub fn release(&mut self, context: &dyn GraphicsContext) {
        if let Some(light) = self.directional.as_mut() {
            light.uniform_state_mut().release(context);
        }
        if let Some(light) = self.point.as_mut() {
            light.uniform_state_mut().release(context);
        }
        if let Some(light) = self.spot.as_mut() {
            light.uniform_state_mut().release(context);
        }
    }
}

/// Uploads `block` if needed and binds it at its binding point.
fn bind_block<B: UniformBlock>(
    context: &dyn GraphicsContext,
    pipeline: &Pipeline,
    block: &mut B,
) -> bool {
    if !pipeline.has_uniform_block(B::BLOCK_NAME) {
        log::trace!(
            "LightRig: Pipeline '{}' does not read '{}'",
            pipeline.name(),
            B::BLOCK_NAME
        );
        return false;
    }
    let Some(buffer) = block.uniform_buffer(context, pipeline.program()) else {
        return false;
    };
    match block.binding_point() {
        Some(binding_point) => {
            context.bind_buffer_base(binding_point, buffer);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_lane::pipeline::PipelineKind;
    use cinder_core::testing::{Call, RecordingContext};

    #[test]
    fn test_binds_each_light_at_its_point() {
        let context = RecordingContext::new();
        let pipeline = Pipeline::new(&context, PipelineKind::Phong).unwrap();

        let mut sun = DirectionalLight::new();
        sun.set_binding_point(1);
        let mut lamp = PointLight::new();
        lamp.set_binding_point(2);
        let mut rig = LightRig {
            directional: Some(sun),
            point: Some(lamp),
            spot: None,
        };

        assert_eq!(rig.bind(&context, &pipeline), 2);
        let points: Vec<u32> = context
            .calls()
            .iter()
            .filter_map(|c| match c {
                Call::BindBufferBase { binding_point, .. } => Some(*binding_point),
                _ => None,
            })
            .collect();
        assert_eq!(points, vec![1, 2]);
    }

    #[test]
    fn test_unbound_light_is_skipped() {
        let context = RecordingContext::new();
        let pipeline = Pipeline::new(&context, PipelineKind::Phong).unwrap();
        let mut rig = LightRig {
            spot: Some(SpotLight::new()),
            ..LightRig::new()
        };

        assert_eq!(rig.bind(&context, &pipeline), 0);
        assert_eq!(context.count(|c| matches!(c, Call::CreateBuffer { .. })), 0);
    }

    #[test]
    fn test_flat_pipeline_reads_no_lights() {
        let context = RecordingContext::new();
        let pipeline = Pipeline::new(&context, PipelineKind::Simple).unwrap();
        let mut sun = DirectionalLight::new();
        sun.set_binding_point(1);
        let mut rig = LightRig {
            directional: Some(sun),
            ..LightRig::new()
        };

        assert_eq!(rig.bind(&context, &pipeline), 0);
        assert_eq!(context.count(|c| matches!(c, Call::BindBufferBase { .. })), 0);
    }
}
