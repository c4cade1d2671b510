//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop)
//! and the application: lifecycle callbacks and the context they receive.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{AppCtx, WindowCtx};
