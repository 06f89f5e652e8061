use anyhow::{Context, Result};

use crate::render::{RenderCtx, RenderTarget};

use super::GpuInit;

/// Owns wgpu core objects and an offscreen color target.
///
/// This is the rendering context for tools and demos that draw lines without a
/// window:
/// - creates and stores Instance/Adapter/Device/Queue
/// - owns a color texture the renderer draws into
/// - hands out encoders and submits them
pub struct HeadlessGpu {
    /// Kept alive for the adapter and device.
    _instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,

    format: wgpu::TextureFormat,
    size: (u32, u32),
    _target: wgpu::Texture,
    target_view: wgpu::TextureView,
}

/// One recorded batch of work against the offscreen target.
pub struct HeadlessFrame {
    pub encoder: wgpu::CommandEncoder,
}

impl HeadlessGpu {
    /// Creates a device and a `width` x `height` color target.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu; see
    /// [`HeadlessGpu::new_blocking`] for synchronous callers.
    pub async fn new(width: u32, height: u32, init: GpuInit) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "offscreen target has zero size");

        let format = init.target_format();
        let GpuInit {
            power_preference,
            force_fallback_adapter,
            backends,
            required_features,
            required_limits,
            ..
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: None,
                force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("meshline device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        log::info!("meshline: using adapter {:?}", adapter.get_info().name);

        let (target, target_view) = create_target(&device, format, width, height);

        Ok(Self {
            _instance: instance,
            adapter,
            device,
            queue,
            format,
            size: (width, height),
            _target: target,
            target_view,
        })
    }

    /// [`HeadlessGpu::new`], blocking the current thread.
    pub fn new_blocking(width: u32, height: u32, init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::new(width, height, init))
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Color format of the offscreen target.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Target size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn target_view(&self) -> &wgpu::TextureView {
        &self.target_view
    }

    /// Recreates the target at a new size. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == self.size {
            return;
        }
        let (target, view) = create_target(&self.device, self.format, width, height);
        self._target = target;
        self.target_view = view;
        self.size = (width, height);
    }

    /// Renderer context for this device and target format.
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(&self.device, &self.queue, self.format)
    }

    /// Starts a batch whose first pass clears the target to `clear`.
    pub fn begin_frame(&self, clear: wgpu::Color) -> HeadlessFrame {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("meshline frame encoder"),
            });

        // Clear pass; line passes load on top of it.
        let _ = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("meshline clear pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.target_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        HeadlessFrame { encoder }
    }

    /// Render target borrowing the frame's encoder and this target's view.
    pub fn target<'a>(&'a self, frame: &'a mut HeadlessFrame) -> RenderTarget<'a> {
        RenderTarget::new(&mut frame.encoder, &self.target_view)
    }

    /// Submits the recorded commands.
    pub fn submit(&self, frame: HeadlessFrame) {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
    }
}

fn create_target(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("meshline offscreen target"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}
