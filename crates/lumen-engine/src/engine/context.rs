use anyhow::Result;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::device::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
use crate::window::native;

use super::buffer::{IndexBuffer, IndexBufferBuilder, VertexBuffer, VertexBufferBuilder};
use super::camera::Camera;
use super::entity::{Entity, EntityManager};
use super::error::EngineError;
use super::frame::{FrameRenderer, FrameStats};
use super::handle::{Handle, Registry};
use super::material::{Material, MaterialBuilder, MaterialInstance};
use super::renderable::{RenderableBuilder, RenderableManager};
use super::renderer::{Renderer, SceneRefs};
use super::scene::Scene;
use super::transform::TransformManager;
use super::view::View;

/// Owns the GPU context and every engine object.
///
/// Objects are addressed by handles; dropping the engine releases all of
/// them together with the swap chain.
pub struct Engine<'w> {
    gpu: Gpu<'w>,
    renderer: Renderer,

    entities: EntityManager,
    transforms: TransformManager,
    renderables: RenderableManager,

    vertex_buffers: Registry<VertexBuffer>,
    index_buffers: Registry<IndexBuffer>,
    materials: Registry<Material>,
    cameras: Registry<Camera>,
    views: Registry<View>,
    scenes: Registry<Scene>,

    stats: FrameStats,
    fatal: Option<wgpu::SurfaceError>,
}

impl<'w> Engine<'w> {
    /// Creates the engine and its swap chain for `window`.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        // Not validated: a zero handle is only reported.
        match native::native_window(window) {
            Some(handle) => log::debug!("swap chain target: {handle}"),
            None => log::debug!("swap chain target: no native handle for this backend"),
        }

        let gpu = Gpu::new(window, init).await?;
        let renderer = Renderer::new(gpu.device(), gpu.surface_format(), gpu.sample_count());

        Ok(Self {
            gpu,
            renderer,
            entities: EntityManager::default(),
            transforms: TransformManager::default(),
            renderables: RenderableManager::default(),
            vertex_buffers: Registry::new(),
            index_buffers: Registry::new(),
            materials: Registry::new(),
            cameras: Registry::new(),
            views: Registry::new(),
            scenes: Registry::new(),
            stats: FrameStats::default(),
            fatal: None,
        })
    }

    /// Reconfigures the swap chain. Views keep their viewports.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.gpu.resize(size);
    }

    // ── entities & components ─────────────────────────────────────────────

    pub fn entity_manager(&mut self) -> &mut EntityManager {
        &mut self.entities
    }

    pub fn transform_manager_mut(&mut self) -> &mut TransformManager {
        &mut self.transforms
    }

    /// Attaches a renderable component to `entity`, creating its transform
    /// component if it has none.
    pub fn create_renderable(&mut self, entity: Entity, builder: RenderableBuilder) -> Result<(), EngineError> {
        if !self.entities.is_alive(entity) {
            return Err(EngineError::UnknownHandle("entity"));
        }

        let index_buffers = &self.index_buffers;
        let renderable = builder.validate(|h| index_buffers.get(h).map(IndexBuffer::index_count))?;

        for p in renderable.primitives() {
            if !self.vertex_buffers.contains(p.geometry.vertices) {
                return Err(EngineError::UnknownHandle("vertex buffer"));
            }
            if !self.materials.contains(p.material.material()) {
                return Err(EngineError::UnknownHandle("material"));
            }
        }

        self.transforms.create(entity);
        self.renderables.insert(entity, renderable);
        Ok(())
    }

    /// Removes the entity from every scene and drops its components.
    pub fn destroy_entity(&mut self, entity: Entity) {
        for (_, scene) in self.scenes.iter_mut() {
            scene.remove_entity(entity);
        }
        self.renderables.remove(entity);
        self.transforms.destroy(entity);
        self.renderer.forget_entity(entity);
        self.entities.destroy(entity);
    }

    // ── cameras, views, scenes ────────────────────────────────────────────

    pub fn create_camera(&mut self) -> Handle<Camera> {
        self.cameras.insert(Camera::default())
    }

    pub fn camera(&self, h: Handle<Camera>) -> Option<&Camera> {
        self.cameras.get(h)
    }

    pub fn camera_mut(&mut self, h: Handle<Camera>) -> Option<&mut Camera> {
        self.cameras.get_mut(h)
    }

    pub fn create_view(&mut self) -> Handle<View> {
        self.views.insert(View::default())
    }

    pub fn view(&self, h: Handle<View>) -> Option<&View> {
        self.views.get(h)
    }

    pub fn view_mut(&mut self, h: Handle<View>) -> Option<&mut View> {
        self.views.get_mut(h)
    }

    pub fn create_scene(&mut self) -> Handle<Scene> {
        self.scenes.insert(Scene::default())
    }

    pub fn scene(&self, h: Handle<Scene>) -> Option<&Scene> {
        self.scenes.get(h)
    }

    pub fn scene_mut(&mut self, h: Handle<Scene>) -> Option<&mut Scene> {
        self.scenes.get_mut(h)
    }

    // ── geometry ──────────────────────────────────────────────────────────

    pub fn create_vertex_buffer(&mut self, builder: VertexBufferBuilder) -> Result<Handle<VertexBuffer>, EngineError> {
        let slots = builder.layout()?;
        let gpu = vec![None; slots.len()];
        Ok(self.vertex_buffers.insert(VertexBuffer {
            vertex_count: builder.count(),
            slots,
            gpu,
        }))
    }

    /// Uploads the bytes of slot `index`. The length must be exactly
    /// `vertex_count * stride`.
    pub fn set_vertex_buffer_at(
        &mut self,
        vb: Handle<VertexBuffer>,
        index: usize,
        bytes: &[u8],
    ) -> Result<(), EngineError> {
        let device = self.gpu.device();
        let buffer = self
            .vertex_buffers
            .get_mut(vb)
            .ok_or(EngineError::UnknownHandle("vertex buffer"))?;
        buffer.check_upload(index, bytes.len())?;

        buffer.gpu[index] = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lumen vertex buffer"),
            contents: bytes,
            usage: wgpu::BufferUsages::VERTEX,
        }));
        Ok(())
    }

    pub fn create_index_buffer(&mut self, builder: IndexBufferBuilder) -> Result<Handle<IndexBuffer>, EngineError> {
        builder.validate()?;
        Ok(self.index_buffers.insert(builder.into_buffer()))
    }

    pub fn set_index_buffer(&mut self, ib: Handle<IndexBuffer>, bytes: &[u8]) -> Result<(), EngineError> {
        let device = self.gpu.device();
        let buffer = self
            .index_buffers
            .get_mut(ib)
            .ok_or(EngineError::UnknownHandle("index buffer"))?;
        buffer.check_upload(bytes.len())?;

        buffer.gpu = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lumen index buffer"),
            contents: bytes,
            usage: wgpu::BufferUsages::INDEX,
        }));
        Ok(())
    }

    // ── materials ─────────────────────────────────────────────────────────

    pub fn create_material(&mut self, builder: MaterialBuilder<'_>) -> Result<Handle<Material>, EngineError> {
        let (package, name) = builder.validate()?;

        let module = self
            .gpu
            .device()
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&name),
                source: wgpu::ShaderSource::Wgsl(package.source().into()),
            });

        log::debug!("material {name:?} loaded ({} bytes)", package.source().len());

        Ok(self.materials.insert_with(|handle| Material {
            name,
            module,
            default_instance: MaterialInstance::new(handle),
        }))
    }

    pub fn material(&self, h: Handle<Material>) -> Option<&Material> {
        self.materials.get(h)
    }

    // ── frames ────────────────────────────────────────────────────────────

    pub fn frame_stats(&self) -> FrameStats {
        self.stats
    }

    /// Returns the surface error that made the last `begin_frame` fatal.
    pub fn take_fatal_error(&mut self) -> Option<wgpu::SurfaceError> {
        self.fatal.take()
    }
}

impl FrameRenderer for Engine<'_> {
    type Frame = GpuFrame;

    fn begin_frame(&mut self) -> Option<GpuFrame> {
        match self.gpu.begin_frame() {
            Ok(frame) => Some(frame),
            Err(err) => {
                self.stats.skipped += 1;
                if self.gpu.handle_surface_error(&err) == SurfaceErrorAction::Fatal {
                    self.fatal = Some(err);
                }
                None
            }
        }
    }

    fn render(&mut self, frame: &mut GpuFrame, view: Handle<View>) {
        let refs = SceneRefs {
            views: &self.views,
            cameras: &self.cameras,
            scenes: &self.scenes,
            renderables: &self.renderables,
            transforms: &self.transforms,
            vertex_buffers: &self.vertex_buffers,
            index_buffers: &self.index_buffers,
            materials: &self.materials,
        };
        self.renderer.render(&self.gpu, frame, &refs, view);
    }

    fn end_frame(&mut self, frame: GpuFrame) {
        self.gpu.present(frame);
        self.stats.presented += 1;
    }
}

impl Drop for Engine<'_> {
    fn drop(&mut self) {
        log::debug!(
            "releasing engine: {} entities, {} renderables, {} materials, {} views",
            self.entities.len(),
            self.renderables.len(),
            self.materials.len(),
            self.views.len(),
        );
    }
}
