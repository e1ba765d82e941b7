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

//! # Cinder Lanes
//!
//! Hot-path execution built on the `cinder-core` contracts:
//!
//! - [`render_lane`]: shading pipelines, the static mesh render traversal and light binding.
//! - [`shape_lane`]: procedural cube, sphere, grid and cylinder generators.
//! - [`asset_lane`]: OBJ/MTL parsing and asynchronous texture decoding.

pub mod asset_lane;
pub mod render_lane;
pub mod shape_lane;

pub use asset_lane::*;
pub use render_lane::*;
pub use shape_lane::*;
