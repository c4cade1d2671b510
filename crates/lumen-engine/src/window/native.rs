//! Native window handle extraction.
//!
//! The backend is picked from the `RawWindowHandle` variant at runtime, so a
//! single build reports X11 or Wayland depending on the session.

use std::fmt;

use raw_window_handle::{HasWindowHandle, RawWindowHandle};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WindowBackend {
    X11,
    Wayland,
    Win32,
    AppKit,
}

/// Platform window identifier as an integer.
///
/// The value is reported as-is; a zero handle is not treated as an error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct NativeWindow {
    pub backend: WindowBackend,
    pub handle: usize,
}

impl fmt::Display for NativeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} window {:#x}", self.backend, self.handle)
    }
}

/// One windowing backend able to read its handle out of a raw handle.
trait NativeWindowSource: Sync {
    fn backend(&self) -> WindowBackend;

    /// `None` when `raw` belongs to another backend.
    fn native_handle(&self, raw: &RawWindowHandle) -> Option<usize>;
}

struct X11;
struct Wayland;
struct Win32;
struct AppKit;

impl NativeWindowSource for X11 {
    fn backend(&self) -> WindowBackend {
        WindowBackend::X11
    }

    fn native_handle(&self, raw: &RawWindowHandle) -> Option<usize> {
        match raw {
            RawWindowHandle::Xlib(h) => Some(h.window as usize),
            RawWindowHandle::Xcb(h) => Some(h.window.get() as usize),
            _ => None,
        }
    }
}

impl NativeWindowSource for Wayland {
    fn backend(&self) -> WindowBackend {
        WindowBackend::Wayland
    }

    fn native_handle(&self, raw: &RawWindowHandle) -> Option<usize> {
        match raw {
            RawWindowHandle::Wayland(h) => Some(h.surface.as_ptr() as usize),
            _ => None,
        }
    }
}

impl NativeWindowSource for Win32 {
    fn backend(&self) -> WindowBackend {
        WindowBackend::Win32
    }

    fn native_handle(&self, raw: &RawWindowHandle) -> Option<usize> {
        match raw {
            RawWindowHandle::Win32(h) => Some(h.hwnd.get() as usize),
            _ => None,
        }
    }
}

impl NativeWindowSource for AppKit {
    fn backend(&self) -> WindowBackend {
        WindowBackend::AppKit
    }

    fn native_handle(&self, raw: &RawWindowHandle) -> Option<usize> {
        match raw {
            RawWindowHandle::AppKit(h) => Some(h.ns_view.as_ptr() as usize),
            _ => None,
        }
    }
}

fn source_for(raw: &RawWindowHandle) -> Option<&'static dyn NativeWindowSource> {
    match raw {
        RawWindowHandle::Xlib(_) | RawWindowHandle::Xcb(_) => Some(&X11),
        RawWindowHandle::Wayland(_) => Some(&Wayland),
        RawWindowHandle::Win32(_) => Some(&Win32),
        RawWindowHandle::AppKit(_) => Some(&AppKit),
        _ => None,
    }
}

/// Reads the native handle of a raw window handle, if its backend is known.
pub fn from_raw(raw: &RawWindowHandle) -> Option<NativeWindow> {
    let source = source_for(raw)?;
    let handle = source.native_handle(raw)?;
    Some(NativeWindow { backend: source.backend(), handle })
}

/// Reads the native handle of `window`.
pub fn native_window(window: &impl HasWindowHandle) -> Option<NativeWindow> {
    match window.window_handle() {
        Ok(h) => from_raw(&h.as_raw()),
        Err(e) => {
            log::debug!("window handle unavailable: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::{NonZeroIsize, NonZeroU32};
    use std::ptr::NonNull;

    use raw_window_handle::{
        AppKitWindowHandle, WaylandWindowHandle, Win32WindowHandle, XcbWindowHandle,
        XlibWindowHandle,
    };

    use super::*;

    // ── backend selection ─────────────────────────────────────────────────

    #[test]
    fn xlib_reports_x11() {
        let raw = RawWindowHandle::Xlib(XlibWindowHandle::new(0x2a00007));
        let native = from_raw(&raw).unwrap();
        assert_eq!(native.backend, WindowBackend::X11);
        assert_eq!(native.handle, 0x2a00007);
    }

    #[test]
    fn xcb_reports_x11() {
        let raw = RawWindowHandle::Xcb(XcbWindowHandle::new(NonZeroU32::new(77).unwrap()));
        assert_eq!(
            from_raw(&raw),
            Some(NativeWindow { backend: WindowBackend::X11, handle: 77 })
        );
    }

    #[test]
    fn zero_xlib_window_is_passed_through() {
        let raw = RawWindowHandle::Xlib(XlibWindowHandle::new(0));
        assert_eq!(from_raw(&raw).map(|n| n.handle), Some(0));
    }

    #[test]
    fn wayland_uses_surface_pointer() {
        let mut surface = 0u8;
        let ptr = NonNull::from(&mut surface).cast();
        let raw = RawWindowHandle::Wayland(WaylandWindowHandle::new(ptr));

        let native = from_raw(&raw).unwrap();
        assert_eq!(native.backend, WindowBackend::Wayland);
        assert_eq!(native.handle, ptr.as_ptr() as usize);
    }

    #[test]
    fn win32_uses_hwnd() {
        let raw = RawWindowHandle::Win32(Win32WindowHandle::new(NonZeroIsize::new(0x10).unwrap()));
        assert_eq!(
            from_raw(&raw),
            Some(NativeWindow { backend: WindowBackend::Win32, handle: 0x10 })
        );
    }

    #[test]
    fn appkit_uses_ns_view() {
        let mut view = 0u64;
        let ptr = NonNull::from(&mut view).cast();
        let raw = RawWindowHandle::AppKit(AppKitWindowHandle::new(ptr));
        assert_eq!(from_raw(&raw).map(|n| n.backend), Some(WindowBackend::AppKit));
    }

    #[test]
    fn source_rejects_foreign_variant() {
        let raw = RawWindowHandle::Xlib(XlibWindowHandle::new(1));
        assert!(Wayland.native_handle(&raw).is_none());
        assert!(Win32.native_handle(&raw).is_none());
    }

    #[test]
    fn display_shows_backend_and_hex() {
        let n = NativeWindow { backend: WindowBackend::X11, handle: 255 };
        assert_eq!(n.to_string(), "X11 window 0xff");
    }
}
