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

//! Provides the public, backend-agnostic rendering contracts for Cinder.
//!
//! This module defines the "common language" of rendering: the
//! [`GraphicsContext`] capability, the handles and descriptors it traffics in,
//! the error types, and the uniform-backed scene parameters (materials and
//! lights). Concrete backends live in `cinder-infra`; pipelines and the render
//! traversal live in `cinder-lanes`.

pub mod api;
pub mod error;
pub mod light;
pub mod material;
pub mod traits;
pub mod uniform;

pub use self::api::*;
pub use self::error::{PipelineError, RenderError, ResourceError, ShaderError};
pub use self::light::{Attenuation, DirectionalLight, PointLight, SpotLight};
pub use self::material::Material;
pub use self::traits::GraphicsContext;
pub use self::uniform::{UniformBlock, UniformState};
