use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use crate::engine::Engine;
use crate::input::InputState;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Framebuffer size in physical pixels.
    pub fn framebuffer_size(&self) -> PhysicalSize<u32> {
        self.window.inner_size()
    }
}

/// Context passed to every [`App`](super::App) callback.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Engine<'w>`
pub struct AppCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub engine: &'a mut Engine<'w>,
    pub input: &'a mut InputState,
}
