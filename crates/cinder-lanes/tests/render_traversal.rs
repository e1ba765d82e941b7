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

//! Integration tests for the static mesh render traversal.

use cinder_core::math::{Vec3, Vec4};
use cinder_core::renderer::api::{
    BufferTarget, RenderMode, TextureId, UniformValue, VertexAttributeLayout, VertexFormat,
};
use cinder_core::renderer::light::DirectionalLight;
use cinder_core::renderer::material::Material;
use cinder_core::renderer::uniform::UniformBlock;
use cinder_core::scene::Texture;
use cinder_core::testing::{Call, RecordingContext};
use cinder_lanes::{
    create_mesh, cube, CubeDescriptor, LightRig, Pipeline, PipelineDescriptor, PipelineKind,
    StaticMesh,
};
use std::borrow::Cow;

fn cube_mesh(context: &RecordingContext) -> StaticMesh {
    cube(&CubeDescriptor::default()).into_mesh(context).unwrap()
}

#[test]
fn test_submesh_without_material_binds_no_uniform_buffer() {
    let context = RecordingContext::new();
    let pipeline = Pipeline::new(&context, PipelineKind::Phong).unwrap();
    let mut mesh = cube_mesh(&context);
    let mut material = Material::new();
    material.set_binding_point(0);
    mesh.add_material(material);

    mesh.render(&context, &pipeline, RenderMode::Triangles);

    assert_eq!(mesh.submeshes()[0].material_index(), None);
    assert_eq!(context.count(|c| matches!(c, Call::BindBufferBase { .. })), 0);
}

#[test]
fn test_traversal_call_sequence() {
    let context = RecordingContext::new();
    let pipeline = Pipeline::new(&context, PipelineKind::Simple).unwrap();
    let mut mesh = cube_mesh(&context);
    let submesh = mesh.submeshes()[0].clone();
    let model_location = pipeline.uniform_location("u_mModel").unwrap();
    let locations: Vec<u32> = ["in_position", "in_texcoord", "in_normal"]
        .iter()
        .map(|name| pipeline.attribute_location(name).unwrap())
        .collect();
    context.clear_calls();

    mesh.render(&context, &pipeline, RenderMode::Triangles);

    let layout = |components, offset| VertexAttributeLayout {
        components,
        stride: 32,
        offset,
    };
    let expected = vec![
        Call::UseProgram(Some(pipeline.program())),
        Call::SetUniform {
            location: model_location,
            value: UniformValue::Mat4(mesh.model_matrix()),
        },
        Call::BindVertexArray(Some(mesh.vertex_array())),
        Call::BindBuffer(BufferTarget::Vertex, Some(submesh.vertex_buffer())),
        Call::SetVertexAttribute {
            location: locations[0],
            layout: layout(3, 0),
        },
        Call::EnableVertexAttribute(locations[0]),
        Call::SetVertexAttribute {
            location: locations[1],
            layout: layout(2, 12),
        },
        Call::EnableVertexAttribute(locations[1]),
        Call::SetVertexAttribute {
            location: locations[2],
            layout: layout(3, 20),
        },
        Call::EnableVertexAttribute(locations[2]),
        Call::BindBuffer(BufferTarget::Index, submesh.index_buffer()),
        Call::DrawElements {
            mode: RenderMode::Triangles,
            count: 36,
        },
        Call::DisableVertexAttribute(locations[0]),
        Call::DisableVertexAttribute(locations[1]),
        Call::DisableVertexAttribute(locations[2]),
        Call::BindBuffer(BufferTarget::Uniform, None),
        Call::BindBuffer(BufferTarget::Vertex, None),
        Call::BindBuffer(BufferTarget::Index, None),
        Call::BindTexture(None),
        Call::BindVertexArray(None),
        Call::UseProgram(None),
    ];
    assert_eq!(context.calls(), expected);
}

#[test]
fn test_attributes_missing_from_pipeline_are_skipped() {
    let context = RecordingContext::new();
    let pipeline = Pipeline::new(&context, PipelineKind::Standard).unwrap();
    let mut mesh = cube_mesh(&context);
    context.clear_calls();

    mesh.render(&context, &pipeline, RenderMode::Triangles);

    assert_eq!(context.count(|c| matches!(c, Call::EnableVertexAttribute(_))), 1);
    assert_eq!(context.count(|c| matches!(c, Call::DrawElements { .. })), 1);
}

#[test]
fn test_non_indexed_draw_uses_requested_mode() {
    let context = RecordingContext::new();
    let pipeline = Pipeline::new(&context, PipelineKind::Standard).unwrap();
    let vertices = [0.0f32; 21];
    let mut mesh = create_mesh(&context, &vertices, &[], VertexFormat::position_color()).unwrap();
    context.clear_calls();

    mesh.render(&context, &pipeline, RenderMode::LineLoop);

    assert!(context.calls().contains(&Call::DrawArrays {
        mode: RenderMode::LineLoop,
        first: 0,
        count: 3,
    }));
    assert_eq!(
        context.count(|c| matches!(c, Call::BindBuffer(BufferTarget::Index, Some(_)))),
        0
    );
}

#[test]
fn test_material_buffer_is_cached_across_frames() {
    let context = RecordingContext::new();
    let pipeline = Pipeline::new(&context, PipelineKind::Phong).unwrap();
    let mut mesh = cube_mesh(&context);
    let mut material = Material::new();
    material.set_binding_point(3);
    let index = mesh.add_material(material);
    mesh.submeshes_mut()[0].set_material_index(Some(index));

    mesh.render(&context, &pipeline, RenderMode::Triangles);
    mesh.render(&context, &pipeline, RenderMode::Triangles);

    let uniform_buffers = context.count(|c| {
        matches!(
            c,
            Call::CreateBuffer {
                target: BufferTarget::Uniform,
                ..
            }
        )
    });
    assert_eq!(uniform_buffers, 1);
    assert_eq!(context.count(|c| matches!(c, Call::WriteBuffer { .. })), 0);
    assert_eq!(
        context.count(|c| matches!(c, Call::BindBufferBase { binding_point: 3, .. })),
        2
    );

    mesh.materials_mut()[0].set_diffuse_color(Vec4::ONE);
    mesh.render(&context, &pipeline, RenderMode::Triangles);
    assert_eq!(context.count(|c| matches!(c, Call::WriteBuffer { .. })), 1);
}

#[test]
fn test_unbound_material_still_draws() {
    let context = RecordingContext::new();
    let pipeline = Pipeline::new(&context, PipelineKind::Phong).unwrap();
    let mut mesh = cube_mesh(&context);
    let index = mesh.add_material(Material::new());
    mesh.submeshes_mut()[0].set_material_index(Some(index));
    context.clear_calls();

    mesh.render(&context, &pipeline, RenderMode::Triangles);

    assert_eq!(context.count(|c| matches!(c, Call::CreateBuffer { .. })), 0);
    assert_eq!(context.count(|c| matches!(c, Call::DrawElements { .. })), 1);
}

#[test]
fn test_ready_texture_is_bound_to_unit_zero() {
    let context = RecordingContext::new();
    let pipeline = Pipeline::new(&context, PipelineKind::Texture).unwrap();
    let sampler = pipeline.uniform_location("u_sampler0").unwrap();
    let mut mesh = cube_mesh(&context);
    let texture = mesh.add_texture(Texture::ready("bricks", TextureId(900)));
    let mut material = Material::new();
    material.set_diffuse_texture_index(Some(texture));
    let index = mesh.add_material(material);
    mesh.submeshes_mut()[0].set_material_index(Some(index));
    context.clear_calls();

    mesh.render(&context, &pipeline, RenderMode::Triangles);

    let calls = context.calls();
    let start = calls
        .iter()
        .position(|c| *c == Call::ActiveTexture(0))
        .unwrap();
    assert_eq!(
        &calls[start..start + 3],
        &[
            Call::ActiveTexture(0),
            Call::BindTexture(Some(TextureId(900))),
            Call::SetUniform {
                location: sampler,
                value: UniformValue::Int(0),
            },
        ]
    );
    assert_eq!(
        &calls[calls.len() - 4..calls.len() - 2],
        &[Call::ActiveTexture(0), Call::BindTexture(None)]
    );
    assert_eq!(context.count(|c| matches!(c, Call::ActiveTexture(_))), 2);
}

const TWO_SAMPLER_VERT: &str = "#version 300 es
in vec3 in_position;
in vec2 in_texcoord;
uniform mat4 u_mProj;
uniform mat4 u_mView;
uniform mat4 u_mModel;
out vec2 v_texcoord;
void main() {
    v_texcoord = in_texcoord;
    gl_Position = u_mProj * u_mView * u_mModel * vec4(in_position, 1.0);
}
";

const TWO_SAMPLER_FRAG: &str = "#version 300 es
precision mediump float;
in vec2 v_texcoord;
uniform sampler2D u_sampler0;
uniform sampler2D u_sampler1;
out vec4 out_color;
void main() {
    out_color = texture(u_sampler0, v_texcoord) * texture(u_sampler1, v_texcoord);
}
";

#[test]
fn test_texture_units_follow_pipeline_samplers_and_are_all_cleared() {
    let context = RecordingContext::new();
    let pipeline = Pipeline::from_descriptor(
        &context,
        &PipelineDescriptor {
            name: Cow::Borrowed("two_samplers"),
            vertex_source: Cow::Borrowed(TWO_SAMPLER_VERT),
            fragment_source: Cow::Borrowed(TWO_SAMPLER_FRAG),
            vertex_format: VertexFormat::position_texcoord_normal(),
            attributes: &["in_position", "in_texcoord"],
            uniforms: &["u_mProj", "u_mView", "u_mModel", "u_sampler0", "u_sampler1"],
            uniform_blocks: &[],
        },
    )
    .unwrap();
    let mut mesh = cube_mesh(&context);
    let diffuse = mesh.add_texture(Texture::ready("diffuse", TextureId(900)));
    let normal = mesh.add_texture(Texture::ready("normal", TextureId(901)));
    let bump = mesh.add_texture(Texture::ready("bump", TextureId(902)));
    let mut material = Material::new();
    material.set_diffuse_texture_index(Some(diffuse));
    material.set_normal_map_index(Some(normal));
    material.set_bump_map_index(Some(bump));
    let index = mesh.add_material(material);
    mesh.submeshes_mut()[0].set_material_index(Some(index));
    context.clear_calls();

    mesh.render(&context, &pipeline, RenderMode::Triangles);

    let texture_calls: Vec<Call> = context
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::ActiveTexture(_) | Call::BindTexture(_)))
        .collect();
    // The third slot has no sampler in this pipeline.
    assert_eq!(
        texture_calls,
        vec![
            Call::ActiveTexture(0),
            Call::BindTexture(Some(TextureId(900))),
            Call::ActiveTexture(1),
            Call::BindTexture(Some(TextureId(901))),
            Call::ActiveTexture(1),
            Call::BindTexture(None),
            Call::ActiveTexture(0),
            Call::BindTexture(None),
        ]
    );
}

#[test]
fn test_texture_still_loading_is_skipped() {
    let context = RecordingContext::new();
    let pipeline = Pipeline::new(&context, PipelineKind::Phong).unwrap();
    let mut mesh = cube_mesh(&context);
    let texture = mesh.add_texture(Texture::pending("loading.png"));
    let mut material = Material::new();
    material.set_binding_point(0);
    material.set_diffuse_texture_index(Some(texture));
    let index = mesh.add_material(material);
    mesh.submeshes_mut()[0].set_material_index(Some(index));
    context.clear_calls();

    mesh.render(&context, &pipeline, RenderMode::Triangles);

    assert_eq!(context.count(|c| matches!(c, Call::ActiveTexture(_))), 0);
    assert_eq!(
        context.count(|c| matches!(c, Call::BindTexture(Some(_)))),
        0
    );
    assert_eq!(context.count(|c| matches!(c, Call::DrawElements { .. })), 1);
}

#[test]
fn test_render_lit_binds_lights_before_drawing() {
    let context = RecordingContext::new();
    let pipeline = Pipeline::new(&context, PipelineKind::Phong).unwrap();
    let mut mesh = cube_mesh(&context);
    let mut sun = DirectionalLight::new();
    sun.set_direction(Vec3::new(0.0, -1.0, 0.0));
    sun.set_binding_point(1);
    let mut rig = LightRig {
        directional: Some(sun),
        ..LightRig::default()
    };
    context.clear_calls();

    mesh.render_lit(&context, &pipeline, &mut rig, RenderMode::Triangles);

    let calls = context.calls();
    let bind = calls
        .iter()
        .position(|c| matches!(c, Call::BindBufferBase { binding_point: 1, .. }))
        .unwrap();
    let draw = calls
        .iter()
        .position(|c| matches!(c, Call::DrawElements { .. }))
        .unwrap();
    assert_eq!(calls[0], Call::UseProgram(Some(pipeline.program())));
    assert!(bind < draw);
}
