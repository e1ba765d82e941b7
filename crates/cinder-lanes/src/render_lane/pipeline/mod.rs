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

//! Shading pipelines: a linked program plus cached reflection data.
//!
//! Every variant shares the same contract and differs only in data: its shader
//! pair, vertex format and the attribute, uniform and block names it caches.
//! A [`Pipeline`] only exists once both shaders compiled and the program
//! linked. Any failure on the way is returned as [`PipelineError::Build`] and
//! leaves no GPU object behind.

mod phong;
mod simple;
mod standard;
mod texture;

pub use phong::UNIFORM_CAMERA_POSITION;
pub use simple::UNIFORM_COLOR;

use ahash::AHashMap;
use cinder_core::math::{Mat4, Vec3, Vec4};
use cinder_core::renderer::api::{
    ProgramId, ShaderId, ShaderStage, UniformLocationId, UniformValue, VertexFormat,
};
use cinder_core::renderer::error::{PipelineError, ShaderError};
use cinder_core::GraphicsContext;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Projection matrix uniform shared by every built-in pipeline.
pub const UNIFORM_PROJECTION: &str = "u_mProj";
/// View matrix uniform shared by every built-in pipeline.
pub const UNIFORM_VIEW: &str = "u_mView";
/// Model matrix uniform shared by every built-in pipeline.
pub const UNIFORM_MODEL: &str = "u_mModel";

/// Sampler uniforms in texture unit order.
///
/// The render traversal binds textures to `u_sampler0`, `u_sampler1`, ... and
/// stops at the first name the pipeline does not expose.
pub const SAMPLER_UNIFORMS: [&str; 3] = ["u_sampler0", "u_sampler1", "u_sampler2"];

/// The built-in pipeline variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineKind {
    /// Flat color from a uniform.
    Simple,
    /// Unlit, one sampled texture.
    Texture,
    /// Interpolated per-vertex colors.
    Standard,
    /// Directional, point and spot lighting with an optional texture.
    Phong,
}

impl PipelineKind {
    /// The descriptor of this built-in variant.
    pub fn descriptor(self) -> PipelineDescriptor<'static> {
        match self {
            PipelineKind::Simple => simple::descriptor(),
            PipelineKind::Texture => texture::descriptor(),
            PipelineKind::Standard => standard::descriptor(),
            PipelineKind::Phong => phong::descriptor(),
        }
    }
}

/// Everything needed to build a [`Pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineDescriptor<'a> {
    /// A name used in logs and errors.
    pub name: Cow<'a, str>,
    /// GLSL ES source of the vertex stage.
    pub vertex_source: Cow<'a, str>,
    /// GLSL ES source of the fragment stage.
    pub fragment_source: Cow<'a, str>,
    /// The interleaved vertex row the shaders expect.
    pub vertex_format: VertexFormat,
    /// Attribute names to resolve after linking.
    pub attributes: &'a [&'a str],
    /// Uniform names to resolve after linking.
    pub uniforms: &'a [&'a str],
    /// Uniform block names to resolve after linking.
    pub uniform_blocks: &'a [&'a str],
}

/// A linked shading program with its reflection caches.
#[derive(Debug)]
pub struct Pipeline {
    name: String,
    vertex_shader: ShaderId,
    fragment_shader: ShaderId,
    program: ProgramId,
    vertex_format: VertexFormat,
    attributes: AHashMap<String, u32>,
    uniforms: AHashMap<String, UniformLocationId>,
    uniform_blocks: AHashMap<String, u32>,
}

/// Compiles both stages and links them into a program.
///
/// On failure every object created so far is deleted before returning.
///
/// ## Arguments
/// * `context` - The graphics context to create the objects in.
/// * `vertex_source` - GLSL ES source of the vertex stage.
/// * `fragment_source` - GLSL ES source of the fragment stage.
/// * `label` - A name used in logs and errors.
///
/// ## Returns
/// The two shader handles and the program handle.
///
/// ## Errors
/// * `ShaderError::CompilationFailed` - One of the stages did not compile.
/// * `ShaderError::LinkFailed` - The program did not link.
pub fn compile_and_link(
    context: &dyn GraphicsContext,
    vertex_source: &str,
    fragment_source: &str,
    label: &str,
) -> Result<(ShaderId, ShaderId, ProgramId), ShaderError> {
    let vertex = context.create_shader(ShaderStage::Vertex, vertex_source, label)?;
    let fragment = match context.create_shader(ShaderStage::Fragment, fragment_source, label) {
        Ok(fragment) => fragment,
        Err(e) => {
            context.destroy_shader(vertex);
            return Err(e);
        }
    };
    match context.create_program(vertex, fragment, label) {
        Ok(program) => Ok((vertex, fragment, program)),
        Err(e) => {
            context.destroy_shader(vertex);
            context.destroy_shader(fragment);
            Err(e)
        }
    }
}

impl Pipeline {
    /// Builds one of the built-in variants.
    ///
    /// ## Errors
    /// * `PipelineError::Build` - A shader failed to compile or the program failed to link.
    pub fn new(context: &dyn GraphicsContext, kind: PipelineKind) -> Result<Self, PipelineError> {
        Self::from_descriptor(context, &kind.descriptor())
    }

    /// Builds a pipeline from arbitrary shader sources.
    ///
    /// Names listed in the descriptor that the linked program does not expose
    /// are logged and left out of the caches; later lookups report them as
    /// missing.
    ///
    /// ## Errors
    /// * `PipelineError::Build` - A shader failed to compile or the program failed to link.
    pub fn from_descriptor(
        context: &dyn GraphicsContext,
        descriptor: &PipelineDescriptor,
    ) -> Result<Self, PipelineError> {
        let name = descriptor.name.to_string();
        let (vertex_shader, fragment_shader, program) = compile_and_link(
            context,
            &descriptor.vertex_source,
            &descriptor.fragment_source,
            &name,
        )
        .map_err(|source| {
            log::error!("Pipeline '{name}': {source}");
            PipelineError::Build {
                pipeline: name.clone(),
                source,
            }
        })?;

        let mut attributes = AHashMap::new();
        for &attribute in descriptor.attributes {
            match context.attribute_location(program, attribute) {
                Some(location) => {
                    attributes.insert(attribute.to_string(), location);
                }
                None => log::warn!("Pipeline '{name}': Attribute '{attribute}' is not active"),
            }
        }

        let mut uniforms = AHashMap::new();
        for &uniform in descriptor.uniforms {
            match context.uniform_location(program, uniform) {
                Some(location) => {
                    uniforms.insert(uniform.to_string(), location);
                }
                None => log::warn!("Pipeline '{name}': Uniform '{uniform}' is not active"),
            }
        }

        let mut uniform_blocks = AHashMap::new();
        for &block in descriptor.uniform_blocks {
            match context.uniform_block_index(program, block) {
                Some(index) => {
                    uniform_blocks.insert(block.to_string(), index);
                }
                None => log::warn!("Pipeline '{name}': Uniform block '{block}' is not active"),
            }
        }

        log::debug!("Pipeline '{name}': Linked {program:?}");
        Ok(Self {
            name,
            vertex_shader,
            fragment_shader,
            program,
            vertex_format: descriptor.vertex_format.clone(),
            attributes,
            uniforms,
            uniform_blocks,
        })
    }

    /// The pipeline name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The linked program.
    pub fn program(&self) -> ProgramId {
        self.program
    }

    /// The compiled vertex shader.
    pub fn vertex_shader(&self) -> ShaderId {
        self.vertex_shader
    }

    /// The compiled fragment shader.
    pub fn fragment_shader(&self) -> ShaderId {
        self.fragment_shader
    }

    /// The vertex row the shaders expect.
    pub fn vertex_format(&self) -> &VertexFormat {
        &self.vertex_format
    }

    /// Makes this program current. Every following draw uses it until another
    /// program is activated or the program is unbound.
    pub fn activate(&self, context: &dyn GraphicsContext) {
        context.use_program(Some(self.program));
    }

    /// The location of a vertex attribute.
    ///
    /// ## Errors
    /// * `PipelineError::LocationNotFound` - The program exposes no such attribute.
    pub fn attribute_location(&self, name: &str) -> Result<u32, PipelineError> {
        self.attributes
            .get(name)
            .copied()
            .ok_or_else(|| self.not_found(name))
    }

    /// The location of a uniform.
    ///
    /// ## Errors
    /// * `PipelineError::LocationNotFound` - The program exposes no such uniform.
    pub fn uniform_location(&self, name: &str) -> Result<UniformLocationId, PipelineError> {
        self.uniforms
            .get(name)
            .copied()
            .ok_or_else(|| self.not_found(name))
    }

    /// Returns `true` if the program declares the named uniform block.
    pub fn has_uniform_block(&self, name: &str) -> bool {
        self.uniform_blocks.contains_key(name)
    }

    /// Uploads a uniform value if the program exposes it.
    ///
    /// Returns `false`, after a trace log, when the uniform is missing.
    pub fn set_uniform(&self, context: &dyn GraphicsContext, name: &str, value: UniformValue) -> bool {
        match self.uniform_location(name) {
            Ok(location) => {
                context.set_uniform(location, value);
                true
            }
            Err(e) => {
                log::trace!("{e}, upload skipped");
                false
            }
        }
    }

    /// Uploads the projection and view matrices.
    pub fn set_view_projection(&self, context: &dyn GraphicsContext, projection: Mat4, view: Mat4) {
        self.set_uniform(context, UNIFORM_PROJECTION, UniformValue::Mat4(projection));
        self.set_uniform(context, UNIFORM_VIEW, UniformValue::Mat4(view));
    }

    /// Uploads the model matrix.
    pub fn set_model(&self, context: &dyn GraphicsContext, model: Mat4) -> bool {
        self.set_uniform(context, UNIFORM_MODEL, UniformValue::Mat4(model))
    }

    /// Uploads the flat color used by the simple pipeline.
    pub fn set_color(&self, context: &dyn GraphicsContext, color: Vec4) -> bool {
        self.set_uniform(context, UNIFORM_COLOR, UniformValue::Vec4(color))
    }

    /// Uploads the eye position used for specular highlights.
    pub fn set_camera_position(&self, context: &dyn GraphicsContext, position: Vec3) -> bool {
        self.set_uniform(context, UNIFORM_CAMERA_POSITION, UniformValue::Vec3(position))
    }

    /// Deletes the program and both shaders.
    pub fn destroy(self, context: &dyn GraphicsContext) {
        context.destroy_program(self.program);
        context.destroy_shader(self.vertex_shader);
        context.destroy_shader(self.fragment_shader);
        log::debug!("Pipeline '{}': Destroyed", self.name);
    }

    fn not_found(&self, name: &str) -> PipelineError {
        PipelineError::LocationNotFound {
            pipeline: self.name.clone(),
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_core::testing::{Call, RecordingContext};

    #[test]
    fn test_every_builtin_variant_links() {
        let context = RecordingContext::new();
        for kind in [
            PipelineKind::Simple,
            PipelineKind::Texture,
            PipelineKind::Standard,
            PipelineKind::Phong,
        ] {
            let pipeline = Pipeline::new(&context, kind).unwrap();
            assert!(pipeline.uniform_location(UNIFORM_MODEL).is_ok());
            assert!(pipeline.attribute_location("in_position").is_ok());
        }
    }

    #[test]
    fn test_compile_failure_deletes_vertex_shader() {
        let context = RecordingContext::new();
        context.fail_compilation_of(ShaderStage::Fragment);

        let err = Pipeline::new(&context, PipelineKind::Simple).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Build {
                source: ShaderError::CompilationFailed {
                    stage: ShaderStage::Fragment,
                    ..
                },
                ..
            }
        ));

        let calls = context.calls();
        let Some(Call::CreateShader(vertex, ShaderStage::Vertex)) = calls.first().cloned() else {
            panic!("expected the vertex shader to be created first, got {calls:?}");
        };
        assert!(calls.contains(&Call::DestroyShader(vertex)));
        assert_eq!(context.count(|c| matches!(c, Call::CreateProgram(_))), 0);
    }

    #[test]
    fn test_link_failure_deletes_both_shaders() {
        let context = RecordingContext::new();
        context.fail_linking();

        let err = Pipeline::new(&context, PipelineKind::Phong).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Pipeline 'phong' could not be built: Program link failed for 'phong': forced failure"
        );
        assert_eq!(context.count(|c| matches!(c, Call::DestroyShader(_))), 2);
    }

    #[test]
    fn test_missing_location_is_reported() {
        let context = RecordingContext::new();
        let pipeline = Pipeline::new(&context, PipelineKind::Standard).unwrap();

        assert_eq!(
            pipeline.attribute_location("in_normal"),
            Err(PipelineError::LocationNotFound {
                pipeline: "standard".to_string(),
                name: "in_normal".to_string(),
            })
        );
        assert!(pipeline.uniform_location("u_sampler0").is_err());
        assert!(!pipeline.set_color(&context, Vec4::ONE));
    }

    #[test]
    fn test_activate_binds_program() {
        let context = RecordingContext::new();
        let pipeline = Pipeline::new(&context, PipelineKind::Texture).unwrap();
        context.clear_calls();

        pipeline.activate(&context);
        assert_eq!(context.calls(), vec![Call::UseProgram(Some(pipeline.program()))]);
    }

    #[test]
    fn test_destroy_releases_program_and_shaders() {
        let context = RecordingContext::new();
        let pipeline = Pipeline::new(&context, PipelineKind::Simple).unwrap();
        let program = pipeline.program();
        context.clear_calls();

        pipeline.destroy(&context);
        assert_eq!(context.calls()[0], Call::DestroyProgram(program));
        assert_eq!(context.count(|c| matches!(c, Call::DestroyShader(_))), 2);
    }
}
