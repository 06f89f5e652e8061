use glam::{Mat4, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An inverted box; expanding it by any point yields that point.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Bounds of a flat xyz array. Returns `None` for an empty array.
    pub fn from_positions(positions: &[f32]) -> Option<Self> {
        if positions.len() < 3 {
            return None;
        }
        let mut aabb = Self::EMPTY;
        for p in positions.chunks_exact(3) {
            aabb.expand(Vec3::new(p[0], p[1], p[2]));
        }
        Some(aabb)
    }

    #[inline]
    pub fn expand(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }
}

/// Bounding sphere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    #[inline]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere centred on the bounding box of `positions`, with radius reaching the
    /// farthest point.
    pub fn from_positions(positions: &[f32]) -> Option<Self> {
        let center = Aabb::from_positions(positions)?.center();
        let max_dist_sq = positions
            .chunks_exact(3)
            .map(|p| center.distance_squared(Vec3::new(p[0], p[1], p[2])))
            .fold(0.0f32, f32::max);
        Some(Self::new(center, max_dist_sq.sqrt()))
    }

    /// Transforms the sphere by `m`. The radius scales by the largest axis scale.
    pub fn transformed(&self, m: &Mat4) -> Self {
        let max_scale_sq = m
            .x_axis
            .truncate()
            .length_squared()
            .max(m.y_axis.truncate().length_squared())
            .max(m.z_axis.truncate().length_squared());
        Self::new(m.transform_point3(self.center), self.radius * max_scale_sq.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_from_positions() {
        let aabb = Aabb::from_positions(&[0.0, 1.0, 2.0, -1.0, 3.0, 0.5]).unwrap();
        assert_eq!(aabb.min, Vec3::new(-1.0, 1.0, 0.5));
        assert_eq!(aabb.max, Vec3::new(0.0, 3.0, 2.0));
    }

    #[test]
    fn aabb_empty_positions_is_none() {
        assert!(Aabb::from_positions(&[]).is_none());
        assert!(Aabb::EMPTY.is_empty());
    }

    #[test]
    fn sphere_covers_all_points() {
        let s = Sphere::from_positions(&[0.0, 0.0, 0.0, 4.0, 0.0, 0.0]).unwrap();
        assert_eq!(s.center, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(s.radius, 2.0);
    }

    #[test]
    fn sphere_transform_scales_radius() {
        let s = Sphere::new(Vec3::ZERO, 1.0);
        let m = Mat4::from_scale_rotation_translation(
            Vec3::new(1.0, 3.0, 2.0),
            glam::Quat::IDENTITY,
            Vec3::new(5.0, 0.0, 0.0),
        );
        let t = s.transformed(&m);
        assert_eq!(t.center, Vec3::new(5.0, 0.0, 0.0));
        assert!((t.radius - 3.0).abs() < 1e-6);
    }
}
