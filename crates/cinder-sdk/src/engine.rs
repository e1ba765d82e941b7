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

//! The [`Engine`] facade.

use crate::config::EngineConfig;
use anyhow::{Context, Result};
use cinder_core::renderer::{GraphicsContext, RenderMode, VertexFormat};
use cinder_core::scene::{Camera, Texture};
use cinder_lanes::{
    create_mesh, LightRig, ObjLoaderLane, Pipeline, PipelineKind, ShapeDescriptor, StaticMesh,
    TextureLoaderLane, TextureRequest,
};
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

/// Owns the graphics context, the texture loader and the configuration.
///
/// Meshes, pipelines and light rigs stay owned by the application; the engine
/// only builds them and drives the per-frame uniform uploads.
#[derive(Debug)]
pub struct Engine {
    context: Box<dyn GraphicsContext>,
    textures: TextureLoaderLane,
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine over `context`, initializing logging from `config`.
    pub fn new(context: Box<dyn GraphicsContext>, config: EngineConfig) -> Self {
        cinder_infra::logging::init(&config.log_filter);
        log::info!("Engine: Started with {context:?}");
        Self {
            context,
            textures: TextureLoaderLane::new(config.flip_textures),
            config,
        }
    }

    /// The graphics context every resource is created on.
    pub fn context(&self) -> &dyn GraphicsContext {
        self.context.as_ref()
    }

    /// The configuration the engine was started with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A camera built from the configured settings.
    pub fn camera_from_config(&self) -> Camera {
        self.config.camera.build()
    }

    /// Compiles and links one of the built-in pipelines.
    pub fn create_pipeline(&self, kind: PipelineKind) -> Result<Pipeline> {
        Pipeline::new(self.context(), kind)
            .with_context(|| format!("Engine: Could not create the {kind:?} pipeline"))
    }

    /// Uploads raw interleaved vertices (and optional 16-bit indices) as a one-submesh mesh.
    pub fn create_mesh(
        &self,
        vertices: &[f32],
        indices: &[u16],
        format: VertexFormat,
    ) -> Result<StaticMesh> {
        create_mesh(self.context(), vertices, indices, format)
            .context("Engine: Could not upload mesh")
    }

    /// Generates and uploads a procedural shape.
    pub fn create_shape(&self, descriptor: &ShapeDescriptor) -> Result<StaticMesh> {
        let data = descriptor
            .generate()
            .with_context(|| format!("Engine: Invalid shape {descriptor:?}"))?;
        data.into_mesh(self.context())
    }

    /// Builds a mesh from OBJ (and optional MTL) text.
    ///
    /// `load_texture` turns each diffuse map path into a texture, typically
    /// through [`Engine::request_texture`] on the web.
    pub fn create_mesh_from_obj_with(
        &mut self,
        obj: &[u8],
        mtl: Option<&[u8]>,
        load_texture: impl FnMut(&mut TextureLoaderLane, &str) -> Texture,
    ) -> Result<StaticMesh> {
        let model = ObjLoaderLane
            .parse(obj, mtl)
            .context("Engine: Could not parse OBJ model")?;
        let mut load_texture = load_texture;
        let textures = &mut self.textures;
        let mesh = model
            .build_mesh(self.context.as_ref(), |path| load_texture(textures, path))
            .context("Engine: Could not upload OBJ model")?;
        Ok(mesh)
    }

    /// Builds a mesh from OBJ text, loading diffuse maps relative to `base_dir`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn create_mesh_from_obj(
        &mut self,
        obj: &[u8],
        mtl: Option<&[u8]>,
        base_dir: impl AsRef<Path>,
    ) -> Result<StaticMesh> {
        let base_dir = base_dir.as_ref().to_path_buf();
        self.create_mesh_from_obj_with(obj, mtl, |loader, path| {
            loader.load_file(base_dir.join(path))
        })
    }

    /// Reserves a texture whose bytes the caller delivers later.
    pub fn request_texture(&mut self, label: impl Into<String>) -> (Texture, TextureRequest) {
        self.textures.request(label)
    }

    /// Starts decoding an image file on a worker thread.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> Texture {
        self.textures.load_file(path.as_ref())
    }

    /// Uploads every decoded texture. Call once per frame.
    pub fn poll_textures(&mut self) -> usize {
        self.textures.poll(self.context.as_ref())
    }

    /// Draws `mesh` with `pipeline` as seen from `camera`.
    ///
    /// The camera's pending movement is applied here. Lights in `lights` are
    /// bound when the pipeline declares their blocks.
    pub fn draw(
        &self,
        mesh: &mut StaticMesh,
        pipeline: &Pipeline,
        camera: &mut Camera,
        lights: Option<&mut LightRig>,
        mode: RenderMode,
    ) {
        let context = self.context();
        let view = camera.view_matrix();
        pipeline.activate(context);
        pipeline.set_view_projection(context, camera.projection_matrix(), view);
        pipeline.set_camera_position(context, camera.position());
        match lights {
            Some(rig) => mesh.render_lit(context, pipeline, rig, mode),
            None => mesh.render(context, pipeline, mode),
        }
    }

    /// Releases a pipeline's GPU objects.
    pub fn destroy_pipeline(&self, pipeline: Pipeline) {
        pipeline.destroy(self.context());
    }

    /// Releases a mesh's GPU objects.
    pub fn release_mesh(&self, mut mesh: StaticMesh) {
        mesh.release(self.context());
    }
}
