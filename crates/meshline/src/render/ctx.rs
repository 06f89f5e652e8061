use glam::{Mat4, Vec3};

/// Renderer-facing context (device/queue + target format).
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub target_format: wgpu::TextureFormat,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        target_format: wgpu::TextureFormat,
    ) -> Self {
        Self {
            device,
            queue,
            target_format,
        }
    }
}

/// Target for drawing (encoder + color view).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}

/// View and projection matrices of the camera a line is drawn with.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub view: Mat4,
    pub projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self { view: Mat4::IDENTITY, projection: Mat4::IDENTITY }
    }
}

impl Camera {
    /// Right-handed perspective camera at `eye` looking at `target`, +Y up.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32, eye: Vec3, target: Vec3) -> Self {
        Self {
            view: Mat4::look_at_rh(eye, target, Vec3::Y),
            projection: Mat4::perspective_rh(fov_y, aspect, near, far),
        }
    }

    /// projection · view · model
    #[inline]
    pub fn model_view_projection(&self, model: &Mat4) -> Mat4 {
        self.projection * self.view * *model
    }
}
