use std::f32::consts::FRAC_PI_4;

use anyhow::{Context, Result};
use cgmath::{Matrix4, Point3, Rad};
use winit::dpi::PhysicalSize;

use lumen_engine::core::{App, AppControl, AppCtx};
use lumen_engine::engine::{
    drive_frame, Aabb, AttributeType, Camera, DepthPrepass, Engine, FrameOutcome, Handle, IndexBuffer,
    IndexType, Material, PrimitiveType, RenderableManager, VertexAttribute, VertexBuffer, View,
    Viewport,
};

use crate::config::TriangleConfig;
use crate::input::{control_for, QuitKeys};
use crate::mesh::{self, TRIANGLE_INDICES, TRIANGLE_VERTICES};
use crate::projection::{look_from_at, OrthoBounds};

const BAKED_COLOR_PACKAGE: &[u8] = include_bytes!("../assets/baked_color.wgsl");

/// Engine objects the frame loop touches after setup.
///
/// Everything else created by [`TriangleScene::build`] is reachable only
/// through the scene graph; the engine releases all of it when the window
/// entry is dropped.
#[derive(Debug)]
pub struct TriangleScene {
    view: Handle<View>,
    camera: Handle<Camera>,
}

impl TriangleScene {
    pub fn build(engine: &mut Engine<'_>, framebuffer: PhysicalSize<u32>, config: &TriangleConfig) -> Result<Self> {
        let camera = engine.create_camera();
        let view = engine.create_view();
        let scene = engine.create_scene();

        let camera_model = look_from_at(Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, -1.0));
        engine
            .camera_mut(camera)
            .context("camera vanished after creation")?
            .set_model_matrix(camera_model);

        {
            let v = engine.view_mut(view).context("view vanished after creation")?;
            v.set_viewport(Viewport::full(framebuffer.width, framebuffer.height));
            v.set_clear_color(config.clear_color);
            v.set_post_processing_enabled(false);
            v.set_depth_prepass(DepthPrepass::Disabled);
        }

        let vertices = VertexBuffer::builder()
            .vertex_count(TRIANGLE_VERTICES.len() as u32)
            .buffer_count(1)
            .attribute(VertexAttribute::Position, 0, AttributeType::Float2, 0, mesh::STRIDE)
            .attribute(VertexAttribute::Color, 0, AttributeType::UByte4, mesh::COLOR_OFFSET, mesh::STRIDE)
            .normalized(VertexAttribute::Color)
            .build(engine)
            .context("creating vertex buffer")?;
        engine
            .set_vertex_buffer_at(vertices, 0, bytemuck::cast_slice(&TRIANGLE_VERTICES))
            .context("uploading vertices")?;

        let indices = IndexBuffer::builder()
            .index_count(TRIANGLE_INDICES.len() as u32)
            .buffer_type(IndexType::UShort)
            .build(engine)
            .context("creating index buffer")?;
        engine
            .set_index_buffer(indices, bytemuck::cast_slice(&TRIANGLE_INDICES))
            .context("uploading indices")?;

        let material = Material::builder()
            .package(BAKED_COLOR_PACKAGE)
            .name("baked color")
            .build(engine)
            .context("loading baked color material")?;
        let instance = engine
            .material(material)
            .context("material vanished after creation")?
            .default_instance();

        let entity = engine.entity_manager().create();
        RenderableManager::builder(1)
            .bounding_box(Aabb::new([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]))
            .material(0, instance)
            .geometry(0, PrimitiveType::Triangles, vertices, indices, 0, TRIANGLE_INDICES.len() as u32)
            .culling(false)
            .receive_shadows(false)
            .cast_shadows(false)
            .build(engine, entity)
            .context("creating triangle renderable")?;

        engine.scene_mut(scene).context("scene vanished after creation")?.add_entity(entity);
        {
            let v = engine.view_mut(view).context("view vanished after creation")?;
            v.set_camera(camera);
            v.set_scene(scene);
        }

        let transforms = engine.transform_manager_mut();
        let instance = transforms.instance(entity).context("renderable has no transform")?;
        transforms.set_transform(instance, Matrix4::from_angle_z(Rad(FRAC_PI_4)));

        log::info!("triangle scene ready ({}x{})", framebuffer.width, framebuffer.height);

        Ok(Self { view, camera })
    }

    /// Recomputes the projection from the current viewport, then runs one
    /// begin/render/end cycle.
    pub fn display(&self, engine: &mut Engine<'_>, zoom: f32) -> FrameOutcome {
        let Some(viewport) = engine.view(self.view).map(View::viewport) else {
            return FrameOutcome::Skipped;
        };
        if let Some(camera) = engine.camera_mut(self.camera) {
            OrthoBounds::from_viewport(viewport, zoom).apply(camera);
        }

        drive_frame(engine, self.view)
    }

    pub fn set_viewport(&self, engine: &mut Engine<'_>, viewport: Viewport) {
        if let Some(v) = engine.view_mut(self.view) {
            v.set_viewport(viewport);
        }
    }

    pub fn viewport(&self, engine: &Engine<'_>) -> Option<Viewport> {
        engine.view(self.view).map(View::viewport)
    }
}

/// Frame driver. `scene` is `None` until setup succeeded; frames before
/// that are no-ops.
#[derive(Debug, Default)]
pub struct TriangleApp {
    config: TriangleConfig,
    keys: QuitKeys,
    scene: Option<TriangleScene>,
}

impl TriangleApp {
    pub fn new(config: TriangleConfig) -> Self {
        Self { config, keys: QuitKeys::default(), scene: None }
    }
}

impl App for TriangleApp {
    fn on_init(&mut self, ctx: &mut AppCtx<'_, '_>) -> Result<()> {
        let size = ctx.window.framebuffer_size();
        self.scene = Some(TriangleScene::build(ctx.engine, size, &self.config)?);
        Ok(())
    }

    fn on_resize(&mut self, ctx: &mut AppCtx<'_, '_>, size: PhysicalSize<u32>) {
        let Some(scene) = &self.scene else { return };
        let Some(current) = scene.viewport(ctx.engine) else { return };

        let next = self.config.resize_policy.viewport_after_resize(current, size);
        if next != current {
            log::debug!("viewport {}x{} -> {}x{}", current.width, current.height, next.width, next.height);
            scene.set_viewport(ctx.engine, next);
        }
    }

    fn on_frame(&mut self, ctx: &mut AppCtx<'_, '_>) -> AppControl {
        let control = control_for(self.keys.poll(ctx.input));
        if control == AppControl::Exit {
            return control;
        }

        if let Some(scene) = &self.scene {
            scene.display(ctx.engine, self.config.zoom);
        }
        control
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_defines_both_entry_points() {
        let package = lumen_engine::engine::MaterialPackage::parse(BAKED_COLOR_PACKAGE).unwrap();
        assert!(package.source().contains("fn vs_main"));
        assert!(package.source().contains("fn fs_main"));
    }

    // With the default policy the viewport never follows the window, so a
    // wide framebuffer still projects with aspect 1.
    #[test]
    fn resize_policy_decides_projection_aspect() {
        let setup = Viewport::full(512, 512);
        let wide = PhysicalSize::new(1024, 512);
        let zoom = TriangleConfig::default().zoom;

        let fixed = crate::config::ResizePolicy::Fixed.viewport_after_resize(setup, wide);
        assert_eq!(OrthoBounds::from_viewport(fixed, zoom).right, 1.5);

        let tracked = crate::config::ResizePolicy::TrackFramebuffer.viewport_after_resize(setup, wide);
        assert_eq!(OrthoBounds::from_viewport(tracked, zoom).right, 3.0);
    }

    #[test]
    fn app_starts_uninitialized() {
        let app = TriangleApp::new(TriangleConfig::default());
        assert!(app.scene.is_none());
    }
}
