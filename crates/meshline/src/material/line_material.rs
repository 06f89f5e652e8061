use std::sync::Arc;

use glam::{Mat4, Vec2};

use crate::paint::{Color, Texture};

use super::uniform::LineUniform;

/// Partial material update. `None` fields are left unchanged by
/// [`MeshLineMaterial::configure`].
#[derive(Debug, Clone, Default)]
pub struct MaterialOptions {
    pub line_width: Option<f32>,
    pub map: Option<Arc<Texture>>,
    pub use_map: Option<bool>,
    pub alpha_map: Option<Arc<Texture>>,
    pub use_alpha_map: Option<bool>,
    pub color: Option<Color>,
    pub opacity: Option<f32>,
    pub resolution: Option<Vec2>,
    pub size_attenuation: Option<bool>,
    /// Also toggles dashing: a non-zero period enables it.
    pub dash_array: Option<f32>,
    pub dash_offset: Option<f32>,
    pub dash_ratio: Option<f32>,
    pub use_dash: Option<bool>,
    pub gradient: Option<[Color; 2]>,
    pub use_gradient: Option<bool>,
    pub visibility: Option<f32>,
    pub alpha_test: Option<f32>,
    pub repeat: Option<Vec2>,
}

/// Uniform set of the extrusion shader.
///
/// Defaults: white, opaque, `line_width = 1`, constant screen-space width,
/// no texture, no dashing, no gradient, fully visible.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshLineMaterial {
    line_width: f32,
    map: Option<Arc<Texture>>,
    use_map: bool,
    alpha_map: Option<Arc<Texture>>,
    use_alpha_map: bool,
    color: Color,
    opacity: f32,
    resolution: Vec2,
    size_attenuation: bool,
    dash_array: f32,
    dash_offset: f32,
    dash_ratio: f32,
    use_dash: bool,
    gradient: [Color; 2],
    use_gradient: bool,
    visibility: f32,
    alpha_test: f32,
    repeat: Vec2,
}

impl Default for MeshLineMaterial {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            map: None,
            use_map: false,
            alpha_map: None,
            use_alpha_map: false,
            color: Color::WHITE,
            opacity: 1.0,
            resolution: Vec2::ONE,
            size_attenuation: false,
            dash_array: 0.0,
            dash_offset: 0.0,
            dash_ratio: 0.5,
            use_dash: false,
            gradient: [Color::RED, Color::GREEN],
            use_gradient: false,
            visibility: 1.0,
            alpha_test: 0.0,
            repeat: Vec2::ONE,
        }
    }
}

impl MeshLineMaterial {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default material with `options` applied.
    pub fn with_options(options: MaterialOptions) -> Self {
        let mut material = Self::default();
        material.configure(options);
        material
    }

    /// Applies every `Some` field of `options`.
    ///
    /// `dash_array` is applied before `use_dash`, so an explicit `use_dash` wins.
    pub fn configure(&mut self, options: MaterialOptions) {
        let MaterialOptions {
            line_width,
            map,
            use_map,
            alpha_map,
            use_alpha_map,
            color,
            opacity,
            resolution,
            size_attenuation,
            dash_array,
            dash_offset,
            dash_ratio,
            use_dash,
            gradient,
            use_gradient,
            visibility,
            alpha_test,
            repeat,
        } = options;

        if let Some(v) = line_width { self.set_line_width(v); }
        if let Some(v) = map { self.set_map(Some(v)); }
        if let Some(v) = use_map { self.set_use_map(v); }
        if let Some(v) = alpha_map { self.set_alpha_map(Some(v)); }
        if let Some(v) = use_alpha_map { self.set_use_alpha_map(v); }
        if let Some(v) = color { self.set_color(v); }
        if let Some(v) = opacity { self.set_opacity(v); }
        if let Some(v) = resolution { self.set_resolution(v); }
        if let Some(v) = size_attenuation { self.set_size_attenuation(v); }
        if let Some(v) = dash_array { self.set_dash_array(v); }
        if let Some(v) = dash_offset { self.set_dash_offset(v); }
        if let Some(v) = dash_ratio { self.set_dash_ratio(v); }
        if let Some(v) = use_dash { self.set_use_dash(v); }
        if let Some(v) = gradient { self.set_gradient(v); }
        if let Some(v) = use_gradient { self.set_use_gradient(v); }
        if let Some(v) = visibility { self.set_visibility(v); }
        if let Some(v) = alpha_test { self.set_alpha_test(v); }
        if let Some(v) = repeat { self.set_repeat(v); }
    }

    // ── setters ───────────────────────────────────────────────────────────

    pub fn set_line_width(&mut self, v: f32) { self.line_width = v; }
    pub fn set_map(&mut self, v: Option<Arc<Texture>>) { self.map = v; }
    pub fn set_use_map(&mut self, v: bool) { self.use_map = v; }
    pub fn set_alpha_map(&mut self, v: Option<Arc<Texture>>) { self.alpha_map = v; }
    pub fn set_use_alpha_map(&mut self, v: bool) { self.use_alpha_map = v; }
    pub fn set_color(&mut self, v: Color) { self.color = v; }
    pub fn set_opacity(&mut self, v: f32) { self.opacity = v; }
    pub fn set_size_attenuation(&mut self, v: bool) { self.size_attenuation = v; }
    pub fn set_dash_offset(&mut self, v: f32) { self.dash_offset = v; }
    pub fn set_dash_ratio(&mut self, v: f32) { self.dash_ratio = v; }
    pub fn set_use_dash(&mut self, v: bool) { self.use_dash = v; }
    pub fn set_gradient(&mut self, v: [Color; 2]) { self.gradient = v; }
    pub fn set_use_gradient(&mut self, v: bool) { self.use_gradient = v; }
    pub fn set_alpha_test(&mut self, v: f32) { self.alpha_test = v; }
    pub fn set_repeat(&mut self, v: Vec2) { self.repeat = v; }

    /// Viewport size in pixels. Required for aspect correction; non-positive
    /// components are ignored with a warning.
    pub fn set_resolution(&mut self, v: Vec2) {
        if !(v.x > 0.0 && v.y > 0.0 && v.is_finite()) {
            log::warn!("ignoring invalid line resolution {v:?}");
            return;
        }
        self.resolution = v;
    }

    /// Sets the dash period (in counter units) and enables dashing when non-zero.
    pub fn set_dash_array(&mut self, v: f32) {
        self.dash_array = v;
        self.use_dash = v != 0.0;
    }

    /// Progressive reveal cutoff, clamped to `[0, 1]`.
    pub fn set_visibility(&mut self, v: f32) {
        self.visibility = v.clamp(0.0, 1.0);
    }

    // ── getters ───────────────────────────────────────────────────────────

    pub fn line_width(&self) -> f32 { self.line_width }
    pub fn map(&self) -> Option<&Arc<Texture>> { self.map.as_ref() }
    pub fn use_map(&self) -> bool { self.use_map }
    pub fn alpha_map(&self) -> Option<&Arc<Texture>> { self.alpha_map.as_ref() }
    pub fn use_alpha_map(&self) -> bool { self.use_alpha_map }
    pub fn color(&self) -> Color { self.color }
    pub fn opacity(&self) -> f32 { self.opacity }
    pub fn resolution(&self) -> Vec2 { self.resolution }
    pub fn size_attenuation(&self) -> bool { self.size_attenuation }
    pub fn dash_array(&self) -> f32 { self.dash_array }
    pub fn dash_offset(&self) -> f32 { self.dash_offset }
    pub fn dash_ratio(&self) -> f32 { self.dash_ratio }
    pub fn use_dash(&self) -> bool { self.use_dash }
    pub fn gradient(&self) -> [Color; 2] { self.gradient }
    pub fn use_gradient(&self) -> bool { self.use_gradient }
    pub fn visibility(&self) -> f32 { self.visibility }
    pub fn alpha_test(&self) -> f32 { self.alpha_test }
    pub fn repeat(&self) -> Vec2 { self.repeat }

    /// Texture sampled for `map`, only when enabled and present.
    pub(crate) fn active_map(&self) -> Option<&Texture> {
        self.map.as_deref().filter(|_| self.use_map)
    }

    pub(crate) fn active_alpha_map(&self) -> Option<&Texture> {
        self.alpha_map.as_deref().filter(|_| self.use_alpha_map)
    }

    /// Packs the uniform block for one draw.
    ///
    /// `model_view_projection` is projection · view · model; `projection` alone is
    /// needed for the constant-width rescale.
    pub fn uniform(&self, model_view_projection: &Mat4, projection: &Mat4) -> LineUniform {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        let [g0, g1] = self.gradient;
        LineUniform {
            model_view_projection: model_view_projection.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            color: [self.color.r, self.color.g, self.color.b, self.opacity],
            gradient_start: [g0.r, g0.g, g0.b, 1.0],
            gradient_end: [g1.r, g1.g, g1.b, 1.0],
            resolution: self.resolution.to_array(),
            repeat: self.repeat.to_array(),
            line_width: self.line_width,
            size_attenuation: flag(self.size_attenuation),
            dash_array: self.dash_array,
            dash_offset: self.dash_offset,
            dash_ratio: self.dash_ratio,
            use_dash: flag(self.use_dash),
            use_gradient: flag(self.use_gradient),
            visibility: self.visibility,
            alpha_test: self.alpha_test,
            use_map: flag(self.active_map().is_some()),
            use_alpha_map: flag(self.active_alpha_map().is_some()),
            _pad: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_plain_white() {
        let m = MeshLineMaterial::new();
        assert_eq!(m.line_width(), 1.0);
        assert_eq!(m.color(), Color::WHITE);
        assert_eq!(m.opacity(), 1.0);
        assert!(!m.size_attenuation());
        assert!(!m.use_dash());
        assert!(!m.use_gradient());
        assert!(!m.use_map());
        assert_eq!(m.visibility(), 1.0);
        assert_eq!(m.dash_ratio(), 0.5);
        assert_eq!(m.repeat(), Vec2::ONE);
    }

    #[test]
    fn dash_array_toggles_dashing() {
        let mut m = MeshLineMaterial::new();
        m.set_dash_array(0.1);
        assert!(m.use_dash());
        m.set_dash_array(0.0);
        assert!(!m.use_dash());
    }

    #[test]
    fn configure_applies_only_given_fields() {
        let mut m = MeshLineMaterial::new();
        m.configure(MaterialOptions {
            line_width: Some(4.0),
            color: Some(Color::RED),
            ..Default::default()
        });
        assert_eq!(m.line_width(), 4.0);
        assert_eq!(m.color(), Color::RED);
        assert_eq!(m.opacity(), 1.0);
    }

    #[test]
    fn explicit_use_dash_wins_over_dash_array() {
        let m = MeshLineMaterial::with_options(MaterialOptions {
            dash_array: Some(0.2),
            use_dash: Some(false),
            ..Default::default()
        });
        assert_eq!(m.dash_array(), 0.2);
        assert!(!m.use_dash());
    }

    #[test]
    fn invalid_resolution_is_ignored() {
        let mut m = MeshLineMaterial::new();
        m.set_resolution(Vec2::new(800.0, 600.0));
        m.set_resolution(Vec2::new(0.0, 600.0));
        assert_eq!(m.resolution(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn visibility_is_clamped() {
        let mut m = MeshLineMaterial::new();
        m.set_visibility(1.5);
        assert_eq!(m.visibility(), 1.0);
    }

    #[test]
    fn uniform_flags_require_texture() {
        let mut m = MeshLineMaterial::new();
        m.set_use_map(true);
        assert_eq!(m.uniform(&Mat4::IDENTITY, &Mat4::IDENTITY).use_map, 0.0);

        m.set_map(Some(Arc::new(Texture::solid([255; 4]))));
        let u = m.uniform(&Mat4::IDENTITY, &Mat4::IDENTITY);
        assert_eq!(u.use_map, 1.0);
        assert_eq!(u.color, [1.0, 1.0, 1.0, 1.0]);
    }
}
