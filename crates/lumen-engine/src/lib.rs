//! Lumen engine crate.
//!
//! Owns the platform loop, the GPU device and a small handle-based scene
//! engine (entities, transforms, renderables, cameras, views) drawn with wgpu.

pub mod core;
pub mod device;
pub mod engine;
pub mod input;
pub mod window;

pub mod logging;
