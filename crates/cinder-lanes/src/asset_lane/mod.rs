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

//! Asset lane - decoding model and image files on the CPU.

mod obj_loader_lane;
mod texture_loader_lane;

pub use obj_loader_lane::*;
pub use texture_loader_lane::*;

use std::error::Error;

/// A trait for types that can load a specific kind of asset from a byte slice.
///
/// Implementors do the CPU side of loading: parsing and decoding raw file
/// data. Uploading to the GPU is a separate step that needs a context.
pub trait AssetLoaderLane<A> {
    /// Parses a byte slice into an instance of the asset `A`.
    ///
    /// # Parameters
    /// - `bytes`: The raw byte data read from an asset file.
    ///
    /// # Returns
    /// The loaded asset, or a boxed thread-safe error.
    fn load(&self, bytes: &[u8]) -> Result<A, Box<dyn Error + Send + Sync>>;
}
