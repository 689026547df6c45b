/// A single acquired render target for one pass.
///
/// Short-lived: holding a surface texture prevents acquisition of the next one.
pub struct TargetFrame {
    /// Present for window canvases; offscreen canvases have nothing to present.
    pub surface_texture: Option<wgpu::SurfaceTexture>,
    pub view: wgpu::TextureView,
}

impl TargetFrame {
    /// Presents the frame. Call after the commands rendering into it are submitted.
    pub fn present(self) {
        drop(self.view);
        if let Some(texture) = self.surface_texture {
            texture.present();
        }
    }
}
