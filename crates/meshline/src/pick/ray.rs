use glam::{Mat4, Vec3};

use crate::geometry::Sphere;

/// Half-line `origin + t * direction`, `t >= 0`. `direction` is unit length.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Closest approach between a ray and a segment.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SegmentApproach {
    pub distance_sq: f32,
    pub point_on_ray: Vec3,
    pub point_on_segment: Vec3,
}

impl Default for Ray {
    fn default() -> Self {
        Self { origin: Vec3::ZERO, direction: Vec3::NEG_Z }
    }
}

impl Ray {
    /// Creates a ray; `direction` is normalized.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction: direction.normalize_or_zero() }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Transforms the ray by an affine matrix, renormalizing the direction.
    pub fn transformed(&self, m: &Mat4) -> Self {
        Self::new(m.transform_point3(self.origin), m.transform_vector3(self.direction))
    }

    /// Whether the ray passes within the sphere (entirely behind the origin misses).
    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        let to_center = sphere.center - self.origin;
        let tca = to_center.dot(self.direction);
        let d2 = to_center.length_squared() - tca * tca;
        let r2 = sphere.radius * sphere.radius;
        if d2 > r2 {
            return false;
        }
        let thc = (r2 - d2).sqrt();
        tca + thc >= 0.0
    }

    /// Squared distance between the ray and the segment `v0..v1`, with the two
    /// closest points.
    pub fn distance_sq_to_segment(&self, v0: Vec3, v1: Vec3) -> SegmentApproach {
        let seg_center = (v0 + v1) * 0.5;
        let seg_dir = (v1 - v0).normalize_or_zero();
        let diff = self.origin - seg_center;

        let seg_extent = v0.distance(v1) * 0.5;
        let a01 = -self.direction.dot(seg_dir);
        let b0 = diff.dot(self.direction);
        let b1 = -diff.dot(seg_dir);
        let c = diff.length_squared();
        let det = (1.0 - a01 * a01).abs();

        let clamp_seg = |s: f32| s.max(-seg_extent).min(seg_extent);

        let (s0, s1, sqr_dist);
        if det > 0.0 {
            // Ray and segment are not parallel.
            let mut r0 = a01 * b1 - b0;
            let mut r1 = a01 * b0 - b1;
            let ext_det = seg_extent * det;

            if r0 >= 0.0 {
                if r1 >= -ext_det {
                    if r1 <= ext_det {
                        // Interior of both.
                        let inv = 1.0 / det;
                        r0 *= inv;
                        r1 *= inv;
                        s0 = r0;
                        s1 = r1;
                        sqr_dist = r0 * (r0 + a01 * r1 + 2.0 * b0) + r1 * (a01 * r0 + r1 + 2.0 * b1) + c;
                    } else {
                        s1 = seg_extent;
                        s0 = (-(a01 * s1 + b0)).max(0.0);
                        sqr_dist = -s0 * s0 + s1 * (s1 + 2.0 * b1) + c;
                    }
                } else {
                    s1 = -seg_extent;
                    s0 = (-(a01 * s1 + b0)).max(0.0);
                    sqr_dist = -s0 * s0 + s1 * (s1 + 2.0 * b1) + c;
                }
            } else if r1 <= -ext_det {
                s0 = (-(-a01 * seg_extent + b0)).max(0.0);
                s1 = if s0 > 0.0 { -seg_extent } else { clamp_seg(-b1) };
                sqr_dist = -s0 * s0 + s1 * (s1 + 2.0 * b1) + c;
            } else if r1 <= ext_det {
                s0 = 0.0;
                s1 = clamp_seg(-b1);
                sqr_dist = s1 * (s1 + 2.0 * b1) + c;
            } else {
                s0 = (-(a01 * seg_extent + b0)).max(0.0);
                s1 = if s0 > 0.0 { seg_extent } else { clamp_seg(-b1) };
                sqr_dist = -s0 * s0 + s1 * (s1 + 2.0 * b1) + c;
            }
        } else {
            // Parallel.
            s1 = if a01 > 0.0 { -seg_extent } else { seg_extent };
            s0 = (-(a01 * s1 + b0)).max(0.0);
            sqr_dist = -s0 * s0 + s1 * (s1 + 2.0 * b1) + c;
        }

        SegmentApproach {
            distance_sq: sqr_dist,
            point_on_ray: self.at(s0),
            point_on_segment: seg_center + seg_dir * s1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn down_from(origin: Vec3) -> Ray {
        Ray::new(origin, Vec3::NEG_Z)
    }

    // ── segment distance ──────────────────────────────────────────────────

    #[test]
    fn crossing_segment_interior() {
        let ray = down_from(Vec3::new(0.5, 2.0, 10.0));
        let hit = ray.distance_sq_to_segment(Vec3::ZERO, Vec3::X);
        assert!((hit.distance_sq - 4.0).abs() < EPS);
        assert!((hit.point_on_segment - Vec3::new(0.5, 0.0, 0.0)).length() < EPS);
        assert!((hit.point_on_ray - Vec3::new(0.5, 2.0, 0.0)).length() < EPS);
    }

    #[test]
    fn beyond_segment_end_clamps() {
        let ray = down_from(Vec3::new(3.0, 0.0, 10.0));
        let hit = ray.distance_sq_to_segment(Vec3::ZERO, Vec3::X);
        assert!((hit.distance_sq - 4.0).abs() < EPS);
        assert!((hit.point_on_segment - Vec3::X).length() < EPS);
    }

    #[test]
    fn segment_behind_origin_measures_from_origin() {
        let ray = Ray::new(Vec3::new(0.5, 0.0, 1.0), Vec3::Z);
        let hit = ray.distance_sq_to_segment(Vec3::ZERO, Vec3::X);
        assert!((hit.distance_sq - 1.0).abs() < EPS);
        assert!((hit.point_on_ray - ray.origin).length() < EPS);
    }

    #[test]
    fn parallel_segment() {
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        let hit = ray.distance_sq_to_segment(Vec3::new(2.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 0.0));
        assert!((hit.distance_sq - 1.0).abs() < EPS);
    }

    // ── sphere / transform ────────────────────────────────────────────────

    #[test]
    fn sphere_hit_and_miss() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0);
        assert!(down_from(Vec3::new(0.5, 0.0, 5.0)).intersects_sphere(&sphere));
        assert!(!down_from(Vec3::new(2.0, 0.0, 5.0)).intersects_sphere(&sphere));
        assert!(!Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z).intersects_sphere(&sphere));
    }

    #[test]
    fn transform_moves_origin_and_keeps_unit_direction() {
        let m = Mat4::from_scale(Vec3::splat(2.0)) * Mat4::from_translation(Vec3::X);
        let r = down_from(Vec3::ZERO).transformed(&m);
        assert!((r.origin - Vec3::new(2.0, 0.0, 0.0)).length() < EPS);
        assert!((r.direction.length() - 1.0).abs() < EPS);
    }
}
