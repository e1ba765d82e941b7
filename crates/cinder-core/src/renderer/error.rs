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

//! Defines the hierarchy of error types for the rendering subsystem.
//!
//! Only context creation and pipeline construction surface these errors to the
//! application. Per-frame failures are logged by the caller and the offending
//! binding is skipped.

use crate::renderer::api::{ProgramId, ShaderStage};
use std::fmt;

/// An error related to the compilation or linking of shader code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// A shader object failed to compile. The object has been deleted.
    CompilationFailed {
        /// A descriptive label for the shader.
        label: String,
        /// The stage of the failing shader.
        stage: ShaderStage,
        /// The info log reported by the compiler.
        log: String,
    },
    /// A program failed to link. The program has been deleted.
    LinkFailed {
        /// A descriptive label for the program.
        label: String,
        /// The info log reported by the linker.
        log: String,
    },
    /// The backend could not allocate a shader or program object.
    CreationFailed(String),
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::CompilationFailed { label, stage, log } => {
                write!(f, "{stage:?} shader compilation failed for '{label}': {log}")
            }
            ShaderError::LinkFailed { label, log } => {
                write!(f, "Program link failed for '{label}': {log}")
            }
            ShaderError::CreationFailed(msg) => {
                write!(f, "Shader object creation failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to building or querying a shading pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The pipeline shaders could not be compiled or linked. The pipeline is unusable.
    Build {
        /// The name of the pipeline.
        pipeline: String,
        /// The underlying shader error.
        source: ShaderError,
    },
    /// The linked program has no active attribute or uniform with this name.
    LocationNotFound {
        /// The name of the pipeline.
        pipeline: String,
        /// The requested attribute or uniform name.
        name: String,
    },
    /// The linked program has no uniform block with this name.
    UniformBlockNotFound {
        /// The program that was queried.
        program: ProgramId,
        /// The requested block name.
        name: String,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Build { pipeline, source } => {
                write!(f, "Pipeline '{pipeline}' could not be built: {source}")
            }
            PipelineError::LocationNotFound { pipeline, name } => {
                write!(f, "Pipeline '{pipeline}' has no location for '{name}'")
            }
            PipelineError::UniformBlockNotFound { program, name } => {
                write!(f, "Program {program:?} has no uniform block '{name}'")
            }
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Build { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// An error related to the creation or use of a GPU resource (buffers, textures, etc.).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// A shader-specific error occurred.
    Shader(ShaderError),
    /// The handle or ID used to reference a resource is invalid.
    InvalidHandle,
    /// A uniform block was read before a binding point was assigned.
    UnboundBindingPoint {
        /// The name of the uniform block.
        block: &'static str,
    },
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
            ResourceError::InvalidHandle => write!(f, "Invalid resource handle or ID."),
            ResourceError::UnboundBindingPoint { block } => {
                write!(f, "Uniform block '{block}' has no binding point assigned.")
            }
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

/// A high-level error raised while setting up rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The graphics context is missing or does not offer the required feature level.
    InitializationFailed(String),
    /// An error occurred while managing a GPU resource.
    ResourceError(ResourceError),
    /// A pipeline could not be built.
    PipelineError(PipelineError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InitializationFailed(msg) => {
                write!(f, "Failed to initialize graphics backend: {msg}")
            }
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
            RenderError::PipelineError(err) => write!(f, "Pipeline error: {err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            RenderError::PipelineError(err) => Some(err),
            RenderError::InitializationFailed(_) => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}

impl From<PipelineError> for RenderError {
    fn from(err: PipelineError) -> Self {
        RenderError::PipelineError(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn shader_error_display() {
        let err = ShaderError::CompilationFailed {
            label: "phong.vert".to_string(),
            stage: ShaderStage::Vertex,
            log: "ERROR: 0:3: syntax error".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "Vertex shader compilation failed for 'phong.vert': ERROR: 0:3: syntax error"
        );

        let err_link = ShaderError::LinkFailed {
            label: "phong".to_string(),
            log: "varying mismatch".to_string(),
        };
        assert_eq!(
            format!("{err_link}"),
            "Program link failed for 'phong': varying mismatch"
        );
    }

    #[test]
    fn pipeline_error_wraps_shader_error() {
        let err = PipelineError::Build {
            pipeline: "simple".to_string(),
            source: ShaderError::CreationFailed("out of memory".to_string()),
        };
        assert_eq!(
            format!("{err}"),
            "Pipeline 'simple' could not be built: Shader object creation failed: out of memory"
        );
        assert!(err.source().is_some());

        let missing = PipelineError::LocationNotFound {
            pipeline: "texture".to_string(),
            name: "u_sampler1".to_string(),
        };
        assert_eq!(
            format!("{missing}"),
            "Pipeline 'texture' has no location for 'u_sampler1'"
        );
        assert!(missing.source().is_none());
    }

    #[test]
    fn resource_error_display() {
        let unbound = ResourceError::UnboundBindingPoint {
            block: "u_material",
        };
        assert_eq!(
            format!("{unbound}"),
            "Uniform block 'u_material' has no binding point assigned."
        );

        let shader_err: ResourceError =
            ShaderError::CreationFailed("context lost".to_string()).into();
        assert_eq!(
            format!("{shader_err}"),
            "Shader resource error: Shader object creation failed: context lost"
        );
        assert!(shader_err.source().is_some());
    }

    #[test]
    fn render_error_display_wrapping_resource_error() {
        let render_err: RenderError = ResourceError::InvalidHandle.into();
        assert_eq!(
            format!("{render_err}"),
            "Graphics resource operation failed: Invalid resource handle or ID."
        );
        assert!(render_err.source().is_some());

        let init = RenderError::InitializationFailed("WebGL2 is not available".to_string());
        assert_eq!(
            format!("{init}"),
            "Failed to initialize graphics backend: WebGL2 is not available"
        );
    }
}
