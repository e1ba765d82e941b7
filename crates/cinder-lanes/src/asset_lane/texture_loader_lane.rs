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

//! Texture loading: CPU decoding off the render thread, GPU upload on it.
//!
//! [`TextureLoaderLane::request`] hands out an unready [`Texture`] and a
//! [`TextureRequest`]. The request is `Send`: whoever owns the bytes completes
//! it, typically on another thread, which decodes the image and posts it back.
//! [`TextureLoaderLane::poll`] runs on the render thread, uploads every
//! decoded image and fills the texture in place. Images whose texture was
//! dropped in the meantime are discarded without touching the GPU.

use super::AssetLoaderLane;
use ahash::AHashMap;
use cinder_core::renderer::api::{TextureDescriptor, TextureFilter, TextureWrap};
use cinder_core::renderer::error::ResourceError;
use cinder_core::scene::{Texture, TextureSlot};
use cinder_core::GraphicsContext;
use flume::{Receiver, Sender};
use std::borrow::Cow;
use std::error::Error;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a texture.
#[derive(Debug, Error)]
pub enum TextureLoadError {
    /// The bytes are not a supported image.
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    /// The file could not be read.
    #[error("Failed to read '{path}': {source}")]
    Io {
        /// The file that was read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// The request was dropped without being completed.
    #[error("Texture request was abandoned")]
    Abandoned,
    /// The decoded image could not be uploaded.
    #[error("Failed to upload texture: {0}")]
    Upload(#[from] ResourceError),
}

/// Tightly packed RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes, top row first unless flipped.
    pub pixels: Vec<u8>,
}

/// Decodes any format supported by `image` into RGBA8.
///
/// ## Errors
/// * `TextureLoadError::Decode` - The bytes are not a supported image.
pub fn decode_image(bytes: &[u8], flip_vertically: bool) -> Result<DecodedImage, TextureLoadError> {
    let mut img = image::load_from_memory(bytes)?;
    if flip_vertically {
        img = img.flipv();
    }
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

#[derive(Debug)]
struct Completion {
    id: u64,
    result: Result<DecodedImage, TextureLoadError>,
}

/// A pending load, completed from any thread.
///
/// Dropping a request without completing it reports it as abandoned.
#[derive(Debug)]
pub struct TextureRequest {
    id: u64,
    label: String,
    flip_vertically: bool,
    sender: Option<Sender<Completion>>,
}

impl TextureRequest {
    /// The label the texture was requested with.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Decodes `bytes` and posts the image to the loader.
    pub fn complete(mut self, bytes: &[u8]) {
        let result = decode_image(bytes, self.flip_vertically);
        self.send(result);
    }

    /// Reports a failure to the loader.
    pub fn fail(mut self, error: TextureLoadError) {
        self.send(Err(error));
    }

    fn send(&mut self, result: Result<DecodedImage, TextureLoadError>) {
        if let Some(sender) = self.sender.take() {
            // The loader may be gone already, in which case nobody waits.
            let _ = sender.send(Completion {
                id: self.id,
                result,
            });
        }
    }
}

impl Drop for TextureRequest {
    fn drop(&mut self) {
        self.send(Err(TextureLoadError::Abandoned));
    }
}

/// A lane that decodes images on the CPU and uploads them when polled.
#[derive(Debug)]
pub struct TextureLoaderLane {
    flip_vertically: bool,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    pending: AHashMap<u64, (String, TextureSlot)>,
    next_id: u64,
}

impl Default for TextureLoaderLane {
    fn default() -> Self {
        Self::new(false)
    }
}

impl TextureLoaderLane {
    /// Creates a loader. With `flip_vertically` every image is flipped so the
    /// first row is the bottom one, as OpenGL samples it.
    pub fn new(flip_vertically: bool) -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            flip_vertically,
            sender,
            receiver,
            pending: AHashMap::new(),
            next_id: 0,
        }
    }

    /// Returns `true` if images are flipped vertically on decode.
    pub fn flips_vertically(&self) -> bool {
        self.flip_vertically
    }

    /// The number of requests not yet delivered by [`TextureLoaderLane::poll`].
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Starts a load and returns the texture it will fill.
    pub fn request(&mut self, label: impl Into<String>) -> (Texture, TextureRequest) {
        let label = label.into();
        let id = self.next_id;
        self.next_id += 1;

        let texture = Texture::pending(label.clone());
        self.pending.insert(id, (label.clone(), texture.slot()));
        log::debug!("TextureLoaderLane: Requested '{label}'");

        let request = TextureRequest {
            id,
            label,
            flip_vertically: self.flip_vertically,
            sender: Some(self.sender.clone()),
        };
        (texture, request)
    }

    /// Reads and decodes a file on a background thread.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(&mut self, path: impl Into<PathBuf>) -> Texture {
        let path = path.into();
        let (texture, request) = self.request(path.to_string_lossy());
        std::thread::spawn(move || match std::fs::read(&path) {
            Ok(bytes) => request.complete(&bytes),
            Err(source) => request.fail(TextureLoadError::Io { path, source }),
        });
        texture
    }

    /// Uploads every image decoded since the last call.
    ///
    /// Returns the number of textures that became ready. Failed loads are
    /// logged and leave their texture unready.
    pub fn poll(&mut self, context: &dyn GraphicsContext) -> usize {
        let mut uploaded = 0;
        for Completion { id, result } in self.receiver.try_iter() {
            let Some((label, slot)) = self.pending.remove(&id) else {
                continue;
            };
            if !slot.is_alive() {
                log::trace!("TextureLoaderLane: '{label}' was dropped, discarding");
                continue;
            }
            let image = match result {
                Ok(image) => image,
                Err(e) => {
                    log::error!("TextureLoaderLane: '{label}': {e}");
                    continue;
                }
            };
            match context.create_texture(&TextureDescriptor {
                label: Some(Cow::Borrowed(&label)),
                width: image.width,
                height: image.height,
                pixels: &image.pixels,
                filter: TextureFilter::Linear,
                wrap: TextureWrap::Repeat,
            }) {
                Ok(id) => {
                    if slot.fill(id) {
                        uploaded += 1;
                        log::debug!(
                            "TextureLoaderLane: Uploaded '{label}' ({}x{})",
                            image.width,
                            image.height
                        );
                    }
                }
                Err(e) => log::error!("TextureLoaderLane: '{label}': {}", TextureLoadError::from(e)),
            }
        }
        uploaded
    }
}

impl AssetLoaderLane<DecodedImage> for TextureLoaderLane {
    fn load(&self, bytes: &[u8]) -> Result<DecodedImage, Box<dyn Error + Send + Sync>> {
        Ok(decode_image(bytes, self.flip_vertically)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_core::testing::{Call, RecordingContext};
    use image::{ImageFormat, Rgba, RgbaImage};

    /// A 1x2 PNG, red on top and blue below.
    fn png() -> Vec<u8> {
        let mut img = RgbaImage::new(1, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_decode_and_flip() {
        let upright = decode_image(&png(), false).unwrap();
        assert_eq!((upright.width, upright.height), (1, 2));
        assert_eq!(&upright.pixels[..4], &[255, 0, 0, 255]);

        let flipped = decode_image(&png(), true).unwrap();
        assert_eq!(&flipped.pixels[..4], &[0, 0, 255, 255]);
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let err = TextureLoaderLane::default().load(b"not an image").unwrap_err();
        assert!(err.to_string().starts_with("Failed to decode image"));
    }

    #[test]
    fn test_texture_is_ready_only_after_poll() {
        let context = RecordingContext::new();
        let mut loader = TextureLoaderLane::new(false);
        let (texture, request) = loader.request("red.png");

        std::thread::spawn(move || request.complete(&png()))
            .join()
            .unwrap();
        assert!(!texture.is_ready());

        assert_eq!(loader.poll(&context), 1);
        assert!(texture.is_ready());
        assert_eq!(loader.pending_count(), 0);
        assert_eq!(
            context.count(|c| matches!(c, Call::CreateTexture { width: 1, height: 2, .. })),
            1
        );
    }

    #[test]
    fn test_dropped_texture_is_never_uploaded() {
        let context = RecordingContext::new();
        let mut loader = TextureLoaderLane::new(false);
        let (texture, request) = loader.request("late.png");
        drop(texture);

        request.complete(&png());
        assert_eq!(loader.poll(&context), 0);
        assert_eq!(context.count(|c| matches!(c, Call::CreateTexture { .. })), 0);
    }

    #[test]
    fn test_abandoned_request_is_cleared() {
        let context = RecordingContext::new();
        let mut loader = TextureLoaderLane::new(false);
        let (texture, request) = loader.request("never.png");
        drop(request);

        assert_eq!(loader.poll(&context), 0);
        assert!(!texture.is_ready());
        assert_eq!(loader.pending_count(), 0);
    }

    #[test]
    fn test_missing_file_fails_cleanly() {
        let context = RecordingContext::new();
        let mut loader = TextureLoaderLane::new(false);
        let texture = loader.load_file("/definitely/not/here.png");

        for _ in 0..200 {
            if loader.pending_count() == 0 {
                break;
            }
            loader.poll(&context);
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(loader.pending_count(), 0);
        assert!(!texture.is_ready());
    }
}
