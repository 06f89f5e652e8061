//! CPU rendition of the line fragment stage (`fs_main`).

use glam::{Vec2, Vec4};

use super::MeshLineMaterial;

/// Interpolated values reaching the fragment stage.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FragmentInput {
    pub uv: Vec2,
    pub counter: f32,
}

/// GLSL-style `mod`: result has the sign of `y`.
#[inline]
pub fn floored_mod(x: f32, y: f32) -> f32 {
    x - y * (x / y).floor()
}

/// Dash multiplier for a normalized counter: 1 inside the dash, 0 in the gap.
pub fn dash_mask(counter: f32, dash_array: f32, dash_offset: f32, dash_ratio: f32) -> f32 {
    if floored_mod(counter + dash_offset, dash_array) < dash_array * dash_ratio {
        1.0
    } else {
        0.0
    }
}

/// Shades one fragment. `None` means the fragment is discarded by the alpha test.
///
/// Colors are straight (not premultiplied) RGBA.
pub fn shade_fragment(material: &MeshLineMaterial, input: FragmentInput) -> Option<Vec4> {
    let mut c = if material.use_gradient() {
        let [g0, g1] = material.gradient();
        let g = g0.lerp(g1, input.counter);
        Vec4::new(g.r, g.g, g.b, 1.0)
    } else {
        let base = material.color();
        Vec4::new(base.r, base.g, base.b, material.opacity())
    };

    let uv = input.uv * material.repeat();
    if let Some(map) = material.active_map() {
        c *= map.sample(uv);
    }
    if let Some(alpha_map) = material.active_alpha_map() {
        c.w *= alpha_map.sample(uv).w;
    }

    if c.w < material.alpha_test() {
        return None;
    }

    if material.use_dash() {
        c.w *= dash_mask(
            input.counter,
            material.dash_array(),
            material.dash_offset(),
            material.dash_ratio(),
        );
    }

    if input.counter > material.visibility() {
        c.w = 0.0;
    }
    Some(c)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::paint::{Color, Texture};

    fn at(counter: f32) -> FragmentInput {
        FragmentInput { uv: Vec2::new(counter, 0.0), counter }
    }

    fn alpha(m: &MeshLineMaterial, counter: f32) -> f32 {
        shade_fragment(m, at(counter)).map_or(-1.0, |c| c.w)
    }

    // ── base color ────────────────────────────────────────────────────────

    #[test]
    fn default_is_opaque_white() {
        let m = MeshLineMaterial::new();
        assert_eq!(shade_fragment(&m, at(0.3)), Some(Vec4::ONE));
    }

    #[test]
    fn gradient_ignores_opacity() {
        let mut m = MeshLineMaterial::new();
        m.set_use_gradient(true);
        m.set_opacity(0.2);
        let c = shade_fragment(&m, at(0.5)).unwrap();
        assert_eq!(c, Vec4::new(0.5, 0.5, 0.0, 1.0));
    }

    // ── textures ──────────────────────────────────────────────────────────

    #[test]
    fn map_multiplies_color() {
        let mut m = MeshLineMaterial::new();
        m.set_color(Color::new(1.0, 1.0, 0.0));
        m.set_map(Some(Arc::new(Texture::solid([255, 0, 255, 255]))));
        m.set_use_map(true);
        let c = shade_fragment(&m, at(0.1)).unwrap();
        assert_eq!(c, Vec4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn map_without_toggle_is_ignored() {
        let mut m = MeshLineMaterial::new();
        m.set_map(Some(Arc::new(Texture::solid([0, 0, 0, 0]))));
        assert_eq!(shade_fragment(&m, at(0.1)), Some(Vec4::ONE));
    }

    #[test]
    fn alpha_map_scales_alpha_only() {
        let mut m = MeshLineMaterial::new();
        m.set_alpha_map(Some(Arc::new(Texture::solid([0, 0, 0, 0]))));
        m.set_use_alpha_map(true);
        let c = shade_fragment(&m, at(0.1)).unwrap();
        assert_eq!(c, Vec4::new(1.0, 1.0, 1.0, 0.0));
    }

    #[test]
    fn repeat_scales_uv() {
        let tex = Texture::from_rgba8(2, 1, vec![[255, 255, 255, 255], [0, 0, 0, 255]]).unwrap();
        let mut m = MeshLineMaterial::new();
        m.set_map(Some(Arc::new(tex)));
        m.set_use_map(true);
        let input = FragmentInput { uv: Vec2::new(0.3, 0.0), counter: 0.3 };
        assert_eq!(shade_fragment(&m, input).unwrap().x, 1.0);

        m.set_repeat(Vec2::new(2.0, 1.0));
        assert_eq!(shade_fragment(&m, input).unwrap().x, 0.0);
    }

    // ── alpha test ────────────────────────────────────────────────────────

    #[test]
    fn alpha_test_discards() {
        let mut m = MeshLineMaterial::new();
        m.set_opacity(0.4);
        m.set_alpha_test(0.5);
        assert_eq!(shade_fragment(&m, at(0.0)), None);

        m.set_opacity(0.5);
        assert!(shade_fragment(&m, at(0.0)).is_some());
    }

    // ── dash ──────────────────────────────────────────────────────────────

    #[test]
    fn dash_switches_off_at_duty_boundary() {
        let mut m = MeshLineMaterial::new();
        m.set_dash_array(0.5);
        m.set_dash_ratio(0.5);
        assert_eq!(alpha(&m, 0.0), 1.0);
        assert_eq!(alpha(&m, 0.2), 1.0);
        assert_eq!(alpha(&m, 0.25), 0.0);
        assert_eq!(alpha(&m, 0.4), 0.0);
        assert_eq!(alpha(&m, 0.5), 1.0);
    }

    #[test]
    fn dash_offset_shifts_pattern() {
        let mut m = MeshLineMaterial::new();
        m.set_dash_array(0.5);
        m.set_dash_offset(0.25);
        assert_eq!(alpha(&m, 0.0), 0.0);
        assert_eq!(alpha(&m, 0.3), 1.0);
    }

    #[test]
    fn floored_mod_is_positive_for_negative_input() {
        assert!((floored_mod(-0.1, 0.5) - 0.4).abs() < 1e-6);
    }

    // ── visibility ────────────────────────────────────────────────────────

    #[test]
    fn visibility_hides_past_cutoff() {
        let mut m = MeshLineMaterial::new();
        m.set_visibility(0.5);
        assert_eq!(alpha(&m, 0.5), 1.0);
        assert_eq!(alpha(&m, 0.6), 0.0);
    }

    #[test]
    fn zero_visibility_keeps_only_head() {
        let mut m = MeshLineMaterial::new();
        m.set_visibility(0.0);
        assert_eq!(alpha(&m, 0.0), 1.0);
        assert_eq!(alpha(&m, 0.01), 0.0);
    }
}
