use glam::{Mat4, Vec2, Vec3};

use super::Ray;

/// One ray hit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Intersection {
    /// World-space distance from the ray origin to the closest point on the ray.
    pub distance: f32,
    /// World-space point on the hit segment.
    pub point: Vec3,
    /// Segment index along the path.
    pub index: usize,
    /// Position of the hit object in the slice given to
    /// [`Raycaster::intersect_objects`]; 0 otherwise.
    pub object: usize,
}

/// Anything that can be hit-tested by a [`Raycaster`].
pub trait Raycast {
    /// Appends this object's hits to `intersects`.
    fn raycast(&self, raycaster: &Raycaster, intersects: &mut Vec<Intersection>);
}

/// World ray with a distance window and a line pick tolerance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Raycaster {
    pub ray: Ray,
    pub near: f32,
    pub far: f32,
    /// Extra world-space slack added to half the line width.
    pub line_threshold: f32,
}

impl Default for Raycaster {
    fn default() -> Self {
        Self {
            ray: Ray::default(),
            near: 0.0,
            far: f32::INFINITY,
            line_threshold: 1.0,
        }
    }
}

impl Raycaster {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { ray: Ray::new(origin, direction), ..Default::default() }
    }

    /// Ray through a point in normalized device coordinates (`[-1, 1]`, +Y up).
    ///
    /// Works for perspective and orthographic projections using the `[0, 1]`
    /// depth range of `glam`'s `*_rh` / `*_lh` constructors.
    pub fn from_screen(ndc: Vec2, view: &Mat4, projection: &Mat4) -> Self {
        let inverse = (*projection * *view).inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        Self::new(near, far - near)
    }

    /// Hits of a single object, nearest first.
    pub fn intersect_object(&self, object: &dyn Raycast) -> Vec<Intersection> {
        let mut hits = Vec::new();
        object.raycast(self, &mut hits);
        sort_by_distance(&mut hits);
        hits
    }

    /// Hits of all `objects`, nearest first. `Intersection::object` is the slice
    /// position of the hit object.
    pub fn intersect_objects(&self, objects: &[&dyn Raycast]) -> Vec<Intersection> {
        let mut hits = Vec::new();
        for (i, object) in objects.iter().enumerate() {
            let start = hits.len();
            object.raycast(self, &mut hits);
            for hit in &mut hits[start..] {
                hit.object = i;
            }
        }
        sort_by_distance(&mut hits);
        hits
    }
}

fn sort_by_distance(hits: &mut [Intersection]) {
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}
