use winit::dpi::PhysicalSize;

use crate::input::KeyEvent;

use super::ctx::AppCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`Runtime`](crate::window::Runtime).
pub trait App {
    /// Called once after the window and engine exist. An error aborts the
    /// run before the first frame.
    fn on_init(&mut self, ctx: &mut AppCtx<'_, '_>) -> anyhow::Result<()>;

    /// Called for every keyboard transition, after the input state is updated.
    fn on_key(&mut self, ctx: &mut AppCtx<'_, '_>, event: &KeyEvent) -> AppControl {
        let _ = (ctx, event);
        AppControl::Continue
    }

    /// Called after the swap chain was reconfigured for `size`.
    fn on_resize(&mut self, ctx: &mut AppCtx<'_, '_>, size: PhysicalSize<u32>) {
        let _ = (ctx, size);
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut AppCtx<'_, '_>) -> AppControl;
}
