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

//! Texture handles and upload descriptors.

use std::borrow::Cow;

/// An opaque handle to a 2D texture living on the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// The sampling filter used for both minification and magnification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFilter {
    /// Nearest texel.
    Nearest,
    /// Bilinear interpolation.
    #[default]
    Linear,
}

/// The wrapping mode applied on both texture axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureWrap {
    /// Tile the texture.
    #[default]
    Repeat,
    /// Clamp coordinates to the edge texels.
    ClampToEdge,
    /// Tile the texture, mirroring every other tile.
    MirroredRepeat,
}

/// A descriptor used to upload an RGBA8 image into a new [`TextureId`].
#[derive(Debug, Clone)]
pub struct TextureDescriptor<'a> {
    /// An optional debug label for the texture.
    pub label: Option<Cow<'a, str>>,
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Tightly packed RGBA8 rows, `width * height * 4` bytes.
    pub pixels: &'a [u8],
    /// Sampling filter.
    pub filter: TextureFilter,
    /// Wrapping mode.
    pub wrap: TextureWrap,
}
