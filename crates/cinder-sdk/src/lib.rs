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

//! The public-facing Software Development Kit (SDK) for the Cinder engine.
//!
//! An application creates its own `glow` context, wraps it in a
//! [`GlowContext`](cinder_infra::GlowContext), and hands it to [`Engine::new`]
//! together with an [`EngineConfig`]. The engine then builds pipelines and
//! meshes and draws them with a camera and an optional light rig.

pub mod config;
pub mod engine;

pub use config::{CameraConfig, EngineConfig};
pub use engine::Engine;

pub mod prelude {
    //! The types most applications need.
    pub use crate::{CameraConfig, Engine, EngineConfig};
    pub use cinder_core::math::{Mat4, Vec2, Vec3, Vec4};
    pub use cinder_core::renderer::{
        DirectionalLight, GraphicsContext, Material, PointLight, RenderMode, SpotLight,
        VertexFormat,
    };
    pub use cinder_core::scene::{Camera, Texture};
    pub use cinder_lanes::{
        CubeDescriptor, CylinderDescriptor, GridDescriptor, LightRig, Pipeline, PipelineKind,
        ShapeDescriptor, SphereDescriptor, StaticMesh,
    };
}
