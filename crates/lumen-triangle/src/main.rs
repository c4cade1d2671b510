//! Opens a window and draws one vertex-colored triangle until Q is pressed.

mod app;
mod config;
mod input;
mod mesh;
mod projection;

use winit::dpi::LogicalSize;

use lumen_engine::device::GpuInit;
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::window::{Runtime, RuntimeConfig};

use app::TriangleApp;
use config::TriangleConfig;

fn main() {
    init_logging(LoggingConfig::default());

    let runtime = RuntimeConfig {
        title: "lumen triangle".to_string(),
        initial_size: LogicalSize::new(512.0, 512.0),
    };
    let gpu_init = GpuInit {
        present_mode: wgpu::PresentMode::Fifo,
        sample_count: 2,
        ..GpuInit::default()
    };

    if let Err(e) = Runtime::run(runtime, gpu_init, TriangleApp::new(TriangleConfig::from_env())) {
        eprintln!("lumen-triangle: {e}");
        std::process::exit(1);
    }
}
