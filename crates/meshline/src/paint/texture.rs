use std::sync::atomic::{AtomicU64, Ordering};

use glam::{Vec2, Vec4};

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a texture, used by renderers to cache GPU copies.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(u64);

/// RGBA8 image sampled by the line material (`map` / `alphaMap`).
///
/// Coordinates wrap (repeat addressing) in both directions.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    id: TextureId,
    width: u32,
    height: u32,
    texels: Vec<[u8; 4]>,
}

impl Texture {
    /// Creates a texture from row-major texels, top row first.
    ///
    /// Returns `None` when the dimensions are zero or do not match the texel count.
    pub fn from_rgba8(width: u32, height: u32, texels: Vec<[u8; 4]>) -> Option<Self> {
        if width == 0 || height == 0 || texels.len() != (width as usize) * (height as usize) {
            return None;
        }
        let id = TextureId(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed));
        Some(Self { id, width, height, texels })
    }

    /// A 1x1 texture of a single texel.
    pub fn solid(texel: [u8; 4]) -> Self {
        let id = TextureId(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed));
        Self { id, width: 1, height: 1, texels: vec![texel] }
    }

    #[inline]
    pub fn id(&self) -> TextureId {
        self.id
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw bytes for upload, row-major RGBA8.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    /// Nearest-texel lookup with repeat wrapping. Returns normalized RGBA.
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        let wrap = |c: f32, n: u32| -> usize {
            let f = c - c.floor();
            ((f * n as f32) as usize).min(n as usize - 1)
        };
        let x = wrap(uv.x, self.width);
        let y = wrap(uv.y, self.height);
        let [r, g, b, a] = self.texels[y * self.width as usize + x];
        Vec4::new(r as f32, g as f32, b as f32, a as f32) / 255.0
    }
}
