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

//! # Cinder Infra
//!
//! Concrete implementations of the contracts defined in `cinder-core`.
//!
//! - **[`graphics`]**: the [`GlowContext`](graphics::glow::GlowContext) backend,
//!   running on native OpenGL ES 3 and on WebGL2 through `glow`.
//! - **[`logging`]**: the `env_logger` setup used by applications.

#![warn(missing_docs)]

#[cfg(feature = "graphics")]
pub mod graphics;
pub mod logging;

#[cfg(feature = "graphics")]
pub use graphics::glow::GlowContext;
