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

//! A texture handle that becomes ready once its image has been uploaded.

use crate::renderer::api::TextureId;
use crate::renderer::traits::GraphicsContext;
use std::cell::Cell;
use std::rc::{Rc, Weak};

/// A shared, possibly not yet populated GPU texture.
///
/// Clones share the same slot. The slot is filled on the render thread by
/// whoever finishes the upload; until then [`Texture::handle`] is `None` and
/// the renderer skips the texture.
#[derive(Debug, Clone, Default)]
pub struct Texture {
    label: String,
    slot: Rc<Cell<Option<TextureId>>>,
}

/// A weak reference to the slot of a [`Texture`], held by pending loads.
#[derive(Debug, Clone)]
pub struct TextureSlot(Weak<Cell<Option<TextureId>>>);

impl TextureSlot {
    /// Fills the slot. Returns `false` when every owning texture was dropped.
    pub fn fill(&self, id: TextureId) -> bool {
        match self.0.upgrade() {
            Some(slot) => {
                slot.set(Some(id));
                true
            }
            None => false,
        }
    }

    /// Returns `true` while at least one owning texture is alive.
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl Texture {
    /// Creates an empty texture waiting for an upload.
    pub fn pending(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            slot: Rc::new(Cell::new(None)),
        }
    }

    /// Wraps an already uploaded texture.
    pub fn ready(label: impl Into<String>, id: TextureId) -> Self {
        Self {
            label: label.into(),
            slot: Rc::new(Cell::new(Some(id))),
        }
    }

    /// The label, usually the source path.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The GPU texture, `None` while the load is in flight.
    pub fn handle(&self) -> Option<TextureId> {
        self.slot.get()
    }

    /// Returns `true` once the texture can be bound.
    pub fn is_ready(&self) -> bool {
        self.handle().is_some()
    }

    /// A weak reference used to fill this texture later.
    pub fn slot(&self) -> TextureSlot {
        TextureSlot(Rc::downgrade(&self.slot))
    }

    /// Destroys the GPU texture, if uploaded, and empties the slot.
    pub fn release(&self, context: &dyn GraphicsContext) {
        if let Some(id) = self.slot.take() {
            if let Err(e) = context.destroy_texture(id) {
                log::warn!("Texture '{}': Failed to destroy {id:?}: {e}", self.label);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_texture_becomes_ready() {
        let texture = Texture::pending("bricks.png");
        assert!(!texture.is_ready());
        let slot = texture.slot();
        assert!(slot.fill(TextureId(7)));
        assert_eq!(texture.handle(), Some(TextureId(7)));
    }

    #[test]
    fn test_clones_share_the_slot() {
        let texture = Texture::pending("a");
        let copy = texture.clone();
        texture.slot().fill(TextureId(3));
        assert_eq!(copy.handle(), Some(TextureId(3)));
    }

    #[test]
    fn test_late_fill_after_drop_is_harmless() {
        let slot = {
            let texture = Texture::pending("gone");
            texture.slot()
        };
        assert!(!slot.is_alive());
        assert!(!slot.fill(TextureId(1)));
    }
}
