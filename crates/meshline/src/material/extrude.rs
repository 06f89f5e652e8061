//! CPU rendition of the extrusion vertex stage.
//!
//! Mirrors `vs_main` in `shaders/meshline.wgsl` step for step so the ribbon
//! placement can be checked without a GPU.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::geometry::{channel, BufferGeometry};

use super::MeshLineMaterial;

/// Per-vertex attributes consumed by the vertex stage.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VertexInput {
    pub position: Vec3,
    pub previous: Vec3,
    pub next: Vec3,
    pub side: f32,
    pub width: f32,
}

impl VertexInput {
    /// Reads vertex `i` out of a processed ribbon. `None` if a channel is missing
    /// or `i` is out of range.
    pub fn from_geometry(geometry: &BufferGeometry, i: usize) -> Option<Self> {
        let vec3 = |name: &str| -> Option<Vec3> {
            let a = geometry.attribute(name)?;
            a.item(i).map(Vec3::from_slice)
        };
        let scalar = |name: &str| -> Option<f32> {
            geometry.attribute(name)?.item(i).map(|s| s[0])
        };
        Some(Self {
            position: vec3(channel::POSITION)?,
            previous: vec3(channel::PREVIOUS)?,
            next: vec3(channel::NEXT)?,
            side: scalar(channel::SIDE)?,
            width: scalar(channel::WIDTH)?,
        })
    }
}

/// Clip-space position to aspect-corrected NDC.
#[inline]
fn fix(clip: Vec4, aspect: f32) -> Vec2 {
    let mut p = Vec2::new(clip.x, clip.y) / clip.w;
    p.x *= aspect;
    p
}

/// Screen-space tangent at `current`.
///
/// Coincident neighbours at the ends fall back to the one-sided direction.
/// Interior duplicates normalize a zero vector and yield NaN, as the shader does.
pub fn direction(previous: Vec2, current: Vec2, next: Vec2) -> Vec2 {
    if next == current {
        (current - previous).normalize()
    } else if previous == current {
        (next - current).normalize()
    } else {
        let d1 = (current - previous).normalize();
        let d2 = (next - current).normalize();
        (d1 + d2).normalize()
    }
}

/// Computes the clip-space position of one ribbon vertex.
///
/// `model_view_projection` is projection · view · model.
pub fn extrude_vertex(
    material: &MeshLineMaterial,
    model_view_projection: &Mat4,
    projection: &Mat4,
    v: &VertexInput,
) -> Vec4 {
    let resolution = material.resolution();
    let aspect = resolution.x / resolution.y;

    let mut clip = *model_view_projection * v.position.extend(1.0);
    let prev_clip = *model_view_projection * v.previous.extend(1.0);
    let next_clip = *model_view_projection * v.next.extend(1.0);

    let current = fix(clip, aspect);
    let dir = direction(fix(prev_clip, aspect), current, fix(next_clip, aspect));

    let w = material.line_width() * v.width;
    let mut normal = Vec2::new(-dir.y, dir.x) * (0.5 * w);

    if !material.size_attenuation() {
        normal *= clip.w;
        // Row vector times matrix: one dot product per column.
        let r = Vec4::new(resolution.x, resolution.y, 0.0, 1.0);
        normal /= Vec2::new(r.dot(projection.x_axis), r.dot(projection.y_axis));
    }

    clip.x += normal.x * v.side;
    clip.y += normal.y * v.side;
    clip
}

/// Runs the vertex stage over every vertex of a processed ribbon.
pub fn extrude_geometry(
    material: &MeshLineMaterial,
    geometry: &BufferGeometry,
    model_view_projection: &Mat4,
    projection: &Mat4,
) -> Vec<Vec4> {
    (0..geometry.vertex_count())
        .filter_map(|i| VertexInput::from_geometry(geometry, i))
        .map(|v| extrude_vertex(material, model_view_projection, projection, &v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MeshLineGeometry;

    const EPS: f32 = 1e-5;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).abs().max_element() < EPS
    }

    fn input(position: Vec3, previous: Vec3, next: Vec3, side: f32) -> VertexInput {
        VertexInput { position, previous, next, side, width: 1.0 }
    }

    fn attenuated(line_width: f32) -> MeshLineMaterial {
        let mut m = MeshLineMaterial::new();
        m.set_line_width(line_width);
        m.set_size_attenuation(true);
        m
    }

    // ── direction ─────────────────────────────────────────────────────────

    #[test]
    fn end_points_use_one_sided_direction() {
        let a = Vec2::ZERO;
        let b = Vec2::new(2.0, 0.0);
        assert!(approx(direction(a, b, b), Vec2::X));
        assert!(approx(direction(a, a, b), Vec2::X));
    }

    #[test]
    fn interior_duplicate_is_nan() {
        let a = Vec2::ZERO;
        let b = Vec2::new(1.0, 0.0);
        // prev != current, next != current, but the segments cancel out.
        assert!(direction(b, a, b).is_nan());
    }

    // ── extrusion ─────────────────────────────────────────────────────────

    #[test]
    fn straight_segment_offsets_along_normal() {
        let m = attenuated(2.0);
        let v = input(Vec3::ZERO, Vec3::ZERO, Vec3::X, 1.0);
        let clip = extrude_vertex(&m, &Mat4::IDENTITY, &Mat4::IDENTITY, &v);
        assert!(approx(clip.truncate().truncate(), Vec2::new(0.0, 1.0)));

        let v = VertexInput { side: -1.0, ..v };
        let clip = extrude_vertex(&m, &Mat4::IDENTITY, &Mat4::IDENTITY, &v);
        assert!(approx(clip.truncate().truncate(), Vec2::new(0.0, -1.0)));
    }

    #[test]
    fn corner_uses_miter_direction() {
        let m = attenuated(2.0);
        let v = input(Vec3::X, Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0), 1.0);
        let clip = extrude_vertex(&m, &Mat4::IDENTITY, &Mat4::IDENTITY, &v);
        let h = std::f32::consts::FRAC_1_SQRT_2;
        assert!(approx(clip.truncate().truncate(), Vec2::new(1.0 - h, h)));
    }

    #[test]
    fn width_scales_offset() {
        let m = attenuated(2.0);
        let v = VertexInput { width: 0.5, ..input(Vec3::ZERO, Vec3::ZERO, Vec3::X, 1.0) };
        let clip = extrude_vertex(&m, &Mat4::IDENTITY, &Mat4::IDENTITY, &v);
        assert!((clip.y - 0.5).abs() < EPS);
    }

    #[test]
    fn constant_width_ignores_depth() {
        let mut m = MeshLineMaterial::new();
        m.set_line_width(10.0);
        m.set_resolution(Vec2::new(800.0, 600.0));
        let projection = Mat4::perspective_rh(1.0, 800.0 / 600.0, 0.1, 100.0);

        let ndc_offset = |z: f32| {
            let p = Vec3::new(0.0, 0.0, z);
            let v = input(p, p, p + Vec3::X, 1.0);
            let clip = extrude_vertex(&m, &projection, &projection, &v);
            let centre = projection * p.extend(1.0);
            (clip.y - centre.y) / clip.w
        };

        let near = ndc_offset(-5.0);
        let far = ndc_offset(-10.0);
        assert!(near > 0.0);
        assert!((near - far).abs() < EPS);
    }

    #[test]
    fn attenuated_width_shrinks_with_depth() {
        let mut m = attenuated(1.0);
        m.set_resolution(Vec2::new(800.0, 600.0));
        let projection = Mat4::perspective_rh(1.0, 800.0 / 600.0, 0.1, 100.0);

        let ndc_offset = |z: f32| {
            let p = Vec3::new(0.0, 0.0, z);
            let v = input(p, p, p + Vec3::X, 1.0);
            let clip = extrude_vertex(&m, &projection, &projection, &v);
            (clip.y - (projection * p.extend(1.0)).y) / clip.w
        };

        assert!(ndc_offset(-5.0) > ndc_offset(-10.0));
    }

    #[test]
    fn extrudes_whole_ribbon() {
        let geometry = MeshLineGeometry::from_points(vec![0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0], None)
            .expect("valid path");
        let m = attenuated(1.0);
        let out = extrude_geometry(&m, geometry.geometry(), &Mat4::IDENTITY, &Mat4::IDENTITY);
        assert_eq!(out.len(), 4);
        assert!((out[0].y - 0.5).abs() < EPS);
        assert!((out[1].y + 0.5).abs() < EPS);
        assert!((out[2].x - 1.0).abs() < EPS);
    }
}
