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

//! Rendering lane - shading pipelines and the mesh render traversal.

mod light_rig;
pub mod pipeline;
pub mod shaders;
mod static_mesh;

pub use light_rig::*;
pub use pipeline::{
    compile_and_link, Pipeline, PipelineDescriptor, PipelineKind, SAMPLER_UNIFORMS,
    UNIFORM_CAMERA_POSITION, UNIFORM_COLOR, UNIFORM_MODEL, UNIFORM_PROJECTION, UNIFORM_VIEW,
};
pub use static_mesh::*;
