use std::collections::{HashMap, HashSet};

use bytemuck::{Pod, Zeroable};
use cgmath::Matrix4;

use crate::device::{Gpu, GpuFrame};

use super::buffer::{IndexBuffer, VertexBuffer};
use super::camera::Camera;
use super::entity::Entity;
use super::handle::{Handle, Registry};
use super::material::{FRAGMENT_ENTRY, Material, VERTEX_ENTRY};
use super::renderable::{Geometry, Primitive, PrimitiveType, RenderableManager};
use super::scene::Scene;
use super::transform::TransformManager;
use super::view::{DepthPrepass, View};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MatrixUniform {
    matrix: [[f32; 4]; 4],
}

impl MatrixUniform {
    fn new(m: Matrix4<f32>) -> Self {
        Self { matrix: m.into() }
    }
}

struct UniformSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct PipelineKey {
    material: Handle<Material>,
    vertices: Handle<VertexBuffer>,
    kind: PrimitiveType,
}

struct Draw {
    entity: Entity,
    key: PipelineKey,
    geometry: Geometry,
}

/// Borrowed engine state the renderer reads while recording a frame.
pub(crate) struct SceneRefs<'a> {
    pub views: &'a Registry<View>,
    pub cameras: &'a Registry<Camera>,
    pub scenes: &'a Registry<Scene>,
    pub renderables: &'a RenderableManager,
    pub transforms: &'a TransformManager,
    pub vertex_buffers: &'a Registry<VertexBuffer>,
    pub index_buffers: &'a Registry<IndexBuffer>,
    pub materials: &'a Registry<Material>,
}

/// Records one color pass per rendered view.
///
/// GPU-side state (pipelines, uniform buffers) is created lazily the first
/// time a view, renderable or material/vertex-buffer pairing is drawn.
pub(crate) struct Renderer {
    format: wgpu::TextureFormat,
    sample_count: u32,

    view_layout: wgpu::BindGroupLayout,
    object_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,

    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    view_uniforms: HashMap<Handle<View>, UniformSlot>,
    object_uniforms: HashMap<Entity, UniformSlot>,

    warned: HashSet<String>,
}

impl Renderer {
    pub(crate) fn new(device: &wgpu::Device, format: wgpu::TextureFormat, sample_count: u32) -> Self {
        let view_layout = matrix_bind_group_layout(device, "lumen view bgl");
        let object_layout = matrix_bind_group_layout(device, "lumen object bgl");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lumen pipeline layout"),
            bind_group_layouts: &[&view_layout, &object_layout],
            immediate_size: 0,
        });

        Self {
            format,
            sample_count,
            view_layout,
            object_layout,
            pipeline_layout,
            pipelines: HashMap::new(),
            view_uniforms: HashMap::new(),
            object_uniforms: HashMap::new(),
            warned: HashSet::new(),
        }
    }

    /// Drops GPU state tied to a destroyed entity.
    pub(crate) fn forget_entity(&mut self, entity: Entity) {
        self.object_uniforms.remove(&entity);
    }

    pub(crate) fn render(&mut self, gpu: &Gpu<'_>, frame: &mut GpuFrame, refs: &SceneRefs<'_>, view_handle: Handle<View>) {
        let Some(view) = refs.views.get(view_handle) else {
            self.warn_once(format!("render called with unknown view {view_handle:?}"));
            return;
        };
        self.note_unsupported(view);

        let draws = self.prepare(gpu, refs, view_handle, view);
        let (target_w, target_h) = frame.extent();

        let [r, g, b, a] = view.clear_color();
        let (attachment, resolve_target) = match &frame.msaa_view {
            Some(msaa) => (msaa, Some(&frame.view)),
            None => (&frame.view, None),
        };

        let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumen color pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: attachment,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: r as f64,
                        g: g as f64,
                        b: b as f64,
                        a: a as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let Some((x, y, w, h)) = view.viewport().clamp_to_target(target_w, target_h) else {
            return;
        };
        pass.set_viewport(x as f32, y as f32, w as f32, h as f32, 0.0, 1.0);

        let Some(view_slot) = self.view_uniforms.get(&view_handle) else { return };
        pass.set_bind_group(0, &view_slot.bind_group, &[]);

        for draw in &draws {
            let (Some(pipeline), Some(object)) =
                (self.pipelines.get(&draw.key), self.object_uniforms.get(&draw.entity))
            else {
                continue;
            };
            let (Some(vb), Some(ib)) = (
                refs.vertex_buffers.get(draw.geometry.vertices),
                refs.index_buffers.get(draw.geometry.indices),
            ) else {
                continue;
            };
            let Some(index_data) = ib.gpu.as_ref() else { continue };

            pass.set_pipeline(pipeline);
            pass.set_bind_group(1, &object.bind_group, &[]);
            for (slot, buffer) in vb.gpu.iter().enumerate() {
                if let Some(buffer) = buffer {
                    pass.set_vertex_buffer(slot as u32, buffer.slice(..));
                }
            }
            pass.set_index_buffer(index_data.slice(..), ib.index_type.format());

            let start = draw.geometry.offset;
            pass.draw_indexed(start..start + draw.geometry.count, 0, 0..1);
        }
    }

    /// Uploads uniforms, builds missing pipelines and returns the draw list.
    fn prepare(
        &mut self,
        gpu: &Gpu<'_>,
        refs: &SceneRefs<'_>,
        view_handle: Handle<View>,
        view: &View,
    ) -> Vec<Draw> {
        let camera = view.camera().and_then(|c| refs.cameras.get(c));
        let scene = view.scene().and_then(|s| refs.scenes.get(s));
        let (Some(camera), Some(scene)) = (camera, scene) else {
            self.warn_once(format!("view {view_handle:?} has no camera or scene; clearing only"));
            return Vec::new();
        };

        let clip_from_world = camera.view_projection();
        self.write_view_uniform(gpu, view_handle, clip_from_world);

        let mut draws = Vec::new();
        for &entity in scene.entities() {
            let Some(renderable) = refs.renderables.get(entity) else { continue };

            let model = refs.transforms.world_transform(entity);
            if renderable.is_culled(&(clip_from_world * model)) {
                continue;
            }
            if renderable.casts_shadows() || renderable.receives_shadows() {
                self.debug_once("shadows are not rendered");
            }

            self.write_object_uniform(gpu, entity, model);

            for primitive in renderable.primitives() {
                if let Some(key) = self.ensure_pipeline(gpu.device(), refs, primitive) {
                    draws.push(Draw { entity, key, geometry: primitive.geometry });
                }
            }
        }
        draws
    }

    fn ensure_pipeline(
        &mut self,
        device: &wgpu::Device,
        refs: &SceneRefs<'_>,
        primitive: &Primitive,
    ) -> Option<PipelineKey> {
        let key = PipelineKey {
            material: primitive.material.material(),
            vertices: primitive.geometry.vertices,
            kind: primitive.geometry.kind,
        };
        if self.pipelines.contains_key(&key) {
            return Some(key);
        }

        let Some(material) = refs.materials.get(key.material) else {
            self.warn_once(format!("primitive references unknown material {:?}", key.material));
            return None;
        };
        let Some(vb) = refs.vertex_buffers.get(key.vertices) else {
            self.warn_once(format!("primitive references unknown vertex buffer {:?}", key.vertices));
            return None;
        };
        if !vb.is_complete() {
            self.warn_once(format!("vertex buffer {:?} drawn before all slots were uploaded", key.vertices));
            return None;
        }

        let buffers: Vec<wgpu::VertexBufferLayout<'_>> = vb.slot_layouts().iter().map(|s| s.as_wgpu()).collect();
        let label = format!("lumen {} pipeline", material.name());

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&label),
            layout: Some(&self.pipeline_layout),

            vertex: wgpu::VertexState {
                module: &material.module,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &material.module,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: key.kind.topology(),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: self.sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },

            multiview_mask: None,
            cache: None,
        });

        log::debug!("built pipeline for {} / {:?}", material.name(), key.vertices);
        self.pipelines.insert(key, pipeline);
        Some(key)
    }

    fn write_view_uniform(&mut self, gpu: &Gpu<'_>, view: Handle<View>, clip_from_world: Matrix4<f32>) {
        let slot = self
            .view_uniforms
            .entry(view)
            .or_insert_with(|| uniform_slot(gpu.device(), &self.view_layout, "lumen view ubo"));
        gpu.queue()
            .write_buffer(&slot.buffer, 0, bytemuck::bytes_of(&MatrixUniform::new(clip_from_world)));
    }

    fn write_object_uniform(&mut self, gpu: &Gpu<'_>, entity: Entity, model: Matrix4<f32>) {
        let slot = self
            .object_uniforms
            .entry(entity)
            .or_insert_with(|| uniform_slot(gpu.device(), &self.object_layout, "lumen object ubo"));
        gpu.queue()
            .write_buffer(&slot.buffer, 0, bytemuck::bytes_of(&MatrixUniform::new(model)));
    }

    fn note_unsupported(&mut self, view: &View) {
        if view.is_post_processing_enabled() {
            self.debug_once("post-processing is not implemented; view rendered without it");
        }
        if view.depth_prepass() == DepthPrepass::Enabled {
            self.debug_once("depth prepass is not implemented");
        }
    }

    fn warn_once(&mut self, msg: String) {
        if self.warned.insert(msg.clone()) {
            log::warn!("{msg}");
        }
    }

    fn debug_once(&mut self, msg: &str) {
        if self.warned.insert(msg.to_string()) {
            log::debug!("{msg}");
        }
    }
}

fn matrix_bind_group_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<MatrixUniform>() as u64),
            },
            count: None,
        }],
    })
}

fn uniform_slot(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> UniformSlot {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<MatrixUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });

    UniformSlot { buffer, bind_group }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{SquareMatrix, Vector3};

    #[test]
    fn matrix_uniform_is_64_bytes() {
        assert_eq!(std::mem::size_of::<MatrixUniform>(), 64);
    }

    #[test]
    fn matrix_uniform_is_column_major() {
        let m = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let u = MatrixUniform::new(m);
        assert_eq!(u.matrix[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(MatrixUniform::new(Matrix4::identity()).matrix[0], [1.0, 0.0, 0.0, 0.0]);
    }
}
