use lumen_engine::engine::Viewport;
use winit::dpi::PhysicalSize;

/// How the view viewport follows framebuffer resizes.
///
/// The swap chain is reconfigured on every resize either way; only the view
/// viewport (and thus the aspect ratio) differs.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ResizePolicy {
    /// Keep the viewport captured at setup.
    #[default]
    Fixed,
    /// Replace the viewport with the new framebuffer extent.
    TrackFramebuffer,
}

impl ResizePolicy {
    /// Parses `fixed` or `track`, ignoring case and surrounding blanks.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed" => Some(ResizePolicy::Fixed),
            "track" => Some(ResizePolicy::TrackFramebuffer),
            _ => None,
        }
    }

    /// Viewport to use after the framebuffer became `size`.
    pub fn viewport_after_resize(self, current: Viewport, size: PhysicalSize<u32>) -> Viewport {
        match self {
            ResizePolicy::Fixed => current,
            ResizePolicy::TrackFramebuffer => Viewport::full(size.width, size.height),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TriangleConfig {
    /// Half-height of the visible region in world units.
    pub zoom: f32,
    pub clear_color: [f32; 4],
    pub resize_policy: ResizePolicy,
}

impl Default for TriangleConfig {
    fn default() -> Self {
        Self {
            zoom: 1.5,
            clear_color: [0.1, 0.125, 0.25, 1.0],
            resize_policy: ResizePolicy::Fixed,
        }
    }
}

impl TriangleConfig {
    /// Environment variable selecting the [`ResizePolicy`].
    pub const RESIZE_ENV: &'static str = "LUMEN_RESIZE";

    /// Defaults, with the resize policy taken from `resize` when it names one.
    pub fn with_resize_setting(resize: Option<&str>) -> Self {
        let mut config = Self::default();
        match resize.map(|v| (v, ResizePolicy::parse(v))) {
            Some((_, Some(policy))) => config.resize_policy = policy,
            Some((v, None)) => log::warn!("{}={v:?} is not `fixed` or `track`; keeping fixed", Self::RESIZE_ENV),
            None => {}
        }
        config
    }

    pub fn from_env() -> Self {
        Self::with_resize_setting(std::env::var(Self::RESIZE_ENV).ok().as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = TriangleConfig::default();
        assert_eq!(c.zoom, 1.5);
        assert_eq!(c.clear_color, [0.1, 0.125, 0.25, 1.0]);
        assert_eq!(c.resize_policy, ResizePolicy::Fixed);
    }

    #[test]
    fn fixed_policy_keeps_setup_viewport() {
        let setup = Viewport::full(512, 512);
        let vp = ResizePolicy::Fixed.viewport_after_resize(setup, PhysicalSize::new(1024, 512));
        assert_eq!(vp, setup);
    }

    #[test]
    fn tracking_policy_follows_framebuffer() {
        let setup = Viewport::full(512, 512);
        let vp = ResizePolicy::TrackFramebuffer.viewport_after_resize(setup, PhysicalSize::new(1024, 512));
        assert_eq!(vp, Viewport::new(0, 0, 1024, 512));
    }

    #[test]
    fn resize_setting_selects_policy() {
        assert_eq!(TriangleConfig::with_resize_setting(None).resize_policy, ResizePolicy::Fixed);
        assert_eq!(
            TriangleConfig::with_resize_setting(Some(" Track ")).resize_policy,
            ResizePolicy::TrackFramebuffer
        );
        assert_eq!(TriangleConfig::with_resize_setting(Some("fixed")).resize_policy, ResizePolicy::Fixed);
        assert_eq!(TriangleConfig::with_resize_setting(Some("stretch")).resize_policy, ResizePolicy::Fixed);
    }
}
