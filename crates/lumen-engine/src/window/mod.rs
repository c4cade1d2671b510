//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single window, wires them to the engine
//! and reports the platform's native window handle.

mod error;
pub mod native;
mod runtime;

pub use error::RuntimeError;
pub use runtime::{Runtime, RuntimeConfig};
