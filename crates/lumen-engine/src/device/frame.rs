/// A single acquired swap chain image plus the encoder recording into it.
///
/// Short-lived: holding the surface texture blocks acquisition of the next
/// image. `Gpu::present` consumes it.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    /// Multisampled color target resolving into `view`, when MSAA is active.
    pub msaa_view: Option<wgpu::TextureView>,
    pub encoder: wgpu::CommandEncoder,
}

impl GpuFrame {
    /// Size of the acquired image in physical pixels.
    pub fn extent(&self) -> (u32, u32) {
        let t = &self.surface_texture.texture;
        (t.width(), t.height())
    }
}
