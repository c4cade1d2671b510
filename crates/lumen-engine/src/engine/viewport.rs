/// Rectangle of the render target a view draws into, in physical pixels.
///
/// The origin is the bottom-left corner of the target.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Viewport {
    pub left: i32,
    pub bottom: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(left: i32, bottom: i32, width: u32, height: u32) -> Self {
        Self { left, bottom, width, height }
    }

    /// Viewport covering a whole `width x height` target.
    #[inline]
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Width over height. A zero height is treated as one pixel.
    #[inline]
    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersects the viewport with a `target_w x target_h` target and
    /// converts it to top-left origin `(x, y, w, h)`.
    ///
    /// Returns `None` when nothing of the viewport lies on the target.
    pub fn clamp_to_target(self, target_w: u32, target_h: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = i64::from(self.left).clamp(0, i64::from(target_w));
        let x1 = (i64::from(self.left) + i64::from(self.width)).clamp(0, i64::from(target_w));
        let b0 = i64::from(self.bottom).clamp(0, i64::from(target_h));
        let b1 = (i64::from(self.bottom) + i64::from(self.height)).clamp(0, i64::from(target_h));

        if x1 <= x0 || b1 <= b0 {
            return None;
        }

        let y_top = i64::from(target_h) - b1;
        Some((x0 as u32, y_top as u32, (x1 - x0) as u32, (b1 - b0) as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_of_square_and_wide() {
        assert_eq!(Viewport::full(512, 512).aspect(), 1.0);
        assert_eq!(Viewport::full(1024, 512).aspect(), 2.0);
    }

    #[test]
    fn aspect_with_zero_height_is_finite() {
        assert!(Viewport::full(640, 0).aspect().is_finite());
    }

    #[test]
    fn full_viewport_maps_to_full_target() {
        assert_eq!(Viewport::full(512, 512).clamp_to_target(512, 512), Some((0, 0, 512, 512)));
    }

    #[test]
    fn viewport_larger_than_target_is_clamped() {
        assert_eq!(Viewport::full(512, 512).clamp_to_target(300, 200), Some((0, 0, 300, 200)));
    }

    #[test]
    fn bottom_left_origin_flips_to_top_left() {
        // 100x50 at bottom-left (10, 20) on a 200x100 target: top edge is 100 - 70 = 30.
        let vp = Viewport::new(10, 20, 100, 50);
        assert_eq!(vp.clamp_to_target(200, 100), Some((10, 30, 100, 50)));
    }

    #[test]
    fn offscreen_viewport_is_none() {
        assert_eq!(Viewport::new(600, 0, 100, 100).clamp_to_target(512, 512), None);
        assert_eq!(Viewport::full(0, 100).clamp_to_target(512, 512), None);
    }
}
