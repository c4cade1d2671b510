use super::camera::Camera;
use super::handle::Handle;
use super::scene::Scene;
use super::viewport::Viewport;

/// Depth prepass policy for a view.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum DepthPrepass {
    #[default]
    Default,
    Disabled,
    Enabled,
}

/// What to render (scene), from where (camera), and into which part of the
/// target (viewport).
#[derive(Debug, Clone)]
pub struct View {
    viewport: Viewport,
    camera: Option<Handle<Camera>>,
    scene: Option<Handle<Scene>>,
    clear_color: [f32; 4],
    post_processing: bool,
    depth_prepass: DepthPrepass,
}

impl Default for View {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            camera: None,
            scene: None,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            post_processing: true,
            depth_prepass: DepthPrepass::Default,
        }
    }
}

impl View {
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_camera(&mut self, camera: Handle<Camera>) {
        self.camera = Some(camera);
    }

    pub fn camera(&self) -> Option<Handle<Camera>> {
        self.camera
    }

    pub fn set_scene(&mut self, scene: Handle<Scene>) {
        self.scene = Some(scene);
    }

    pub fn scene(&self) -> Option<Handle<Scene>> {
        self.scene
    }

    /// Linear RGBA clear color.
    pub fn set_clear_color(&mut self, rgba: [f32; 4]) {
        self.clear_color = rgba;
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn set_post_processing_enabled(&mut self, enabled: bool) {
        self.post_processing = enabled;
    }

    pub fn is_post_processing_enabled(&self) -> bool {
        self.post_processing
    }

    pub fn set_depth_prepass(&mut self, prepass: DepthPrepass) {
        self.depth_prepass = prepass;
    }

    pub fn depth_prepass(&self) -> DepthPrepass {
        self.depth_prepass
    }
}
