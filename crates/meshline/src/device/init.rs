/// Initialization parameters for the offscreen GPU context.
///
/// Add configuration flags only when a concrete platform or backend requirement
/// exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Render into an sRGB target (`Rgba8UnormSrgb`) instead of `Rgba8Unorm`.
    pub prefer_srgb: bool,

    /// Adapter selection hint.
    pub power_preference: wgpu::PowerPreference,

    /// Accept only a software adapter (useful on CI without a GPU).
    pub force_fallback_adapter: bool,

    /// Backends wgpu may pick from.
    pub backends: wgpu::Backends,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            backends: wgpu::Backends::all(),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
        }
    }
}

impl GpuInit {
    /// Color format of the offscreen target.
    pub fn target_format(&self) -> wgpu::TextureFormat {
        if self.prefer_srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_format_follows_srgb_preference() {
        assert_eq!(GpuInit::default().target_format(), wgpu::TextureFormat::Rgba8UnormSrgb);
        let linear = GpuInit { prefer_srgb: false, ..Default::default() };
        assert_eq!(linear.target_format(), wgpu::TextureFormat::Rgba8Unorm);
    }
}
