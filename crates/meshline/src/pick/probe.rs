use glam::Vec3;

use crate::geometry::channel;
use crate::mesh::MeshLine;

use super::{Intersection, Raycaster};

/// Indices per path segment (two triangles).
const SEGMENT_STRIDE: usize = 6;

/// Hit-tests a mesh line against `raycaster`, appending at most one hit.
///
/// Segments are visited in path order and the first one within
/// `line_threshold + line_width * width / 2` of the ray wins, even if a later
/// segment is nearer to the ray origin.
pub fn mesh_line_raycast(line: &MeshLine, raycaster: &Raycaster, intersects: &mut Vec<Intersection>) {
    let geometry = line.geometry.geometry();
    let Some(sphere) = geometry.bounding_sphere() else { return };
    if !raycaster.ray.intersects_sphere(&sphere.transformed(&line.matrix_world)) {
        return;
    }

    if line.matrix_world.determinant() == 0.0 {
        log::debug!("mesh line pick skipped: singular world matrix");
        return;
    }
    let local_ray = raycaster.ray.transformed(&line.matrix_world.inverse());

    let Some(index) = geometry.index() else { return };
    let Some(positions) = geometry.attribute(channel::POSITION) else { return };
    let widths = geometry.attribute(channel::WIDTH).map_or(&[][..], |a| a.array.as_slice());

    for (segment, tris) in index.array.chunks_exact(SEGMENT_STRIDE).enumerate() {
        // First triangle is (2j, 2j+1, 2j+2): its first and last vertices lie on
        // consecutive path points.
        let (Some(start), Some(end)) = (positions.item(tris[0] as usize), positions.item(tris[2] as usize))
        else {
            continue;
        };

        let width = widths.get(segment).copied().unwrap_or(1.0);
        let precision = raycaster.line_threshold + line.material.line_width() * width / 2.0;

        let approach = local_ray.distance_sq_to_segment(Vec3::from_slice(start), Vec3::from_slice(end));
        if approach.distance_sq > precision * precision {
            continue;
        }

        let on_ray = line.matrix_world.transform_point3(approach.point_on_ray);
        let distance = raycaster.ray.origin.distance(on_ray);
        if distance < raycaster.near || distance > raycaster.far {
            continue;
        }

        intersects.push(Intersection {
            distance,
            point: line.matrix_world.transform_point3(approach.point_on_segment),
            index: segment,
            object: 0,
        });
        break;
    }
}

#[cfg(test)]
mod tests {
    use glam::Mat4;

    use super::*;
    use crate::geometry::MeshLineGeometry;
    use crate::material::MeshLineMaterial;
    use crate::pick::Raycast;

    const EPS: f32 = 1e-4;

    fn straight_line(line_width: f32) -> MeshLine {
        let points: Vec<Vec3> = (0..5).map(|i| Vec3::new(i as f32 * 10.0, 0.0, 0.0)).collect();
        let geometry = MeshLineGeometry::from_points(points, None).expect("valid path");
        let mut material = MeshLineMaterial::new();
        material.set_line_width(line_width);
        MeshLine::new(geometry, material)
    }

    fn cast(line: &MeshLine, raycaster: &Raycaster) -> Vec<Intersection> {
        let mut hits = Vec::new();
        mesh_line_raycast(line, raycaster, &mut hits);
        hits
    }

    fn down_at(x: f32) -> Raycaster {
        Raycaster { line_threshold: 0.0, ..Raycaster::new(Vec3::new(x, 0.0, 10.0), Vec3::NEG_Z) }
    }

    // ── hits ──────────────────────────────────────────────────────────────

    #[test]
    fn ray_through_middle_segment() {
        let line = straight_line(2.0);
        let hits = cast(&line, &down_at(25.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 2);
        assert!((hits[0].distance - 10.0).abs() < EPS);
        assert!((hits[0].point - Vec3::new(25.0, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn width_sets_tolerance() {
        let line = straight_line(2.0);
        let off_axis = |y: f32| Raycaster {
            line_threshold: 0.0,
            ..Raycaster::new(Vec3::new(25.0, y, 10.0), Vec3::NEG_Z)
        };
        assert_eq!(cast(&line, &off_axis(0.9)).len(), 1);
        assert!(cast(&line, &off_axis(1.1)).is_empty());
    }

    #[test]
    fn threshold_widens_tolerance() {
        let line = straight_line(2.0);
        let r = Raycaster {
            line_threshold: 0.5,
            ..Raycaster::new(Vec3::new(25.0, 1.4, 10.0), Vec3::NEG_Z)
        };
        assert_eq!(cast(&line, &r).len(), 1);
    }

    #[test]
    fn first_segment_in_path_order_wins() {
        let line = straight_line(2.0);
        // Grazes the shared point of segments 1 and 2.
        let hits = cast(&line, &down_at(20.0));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 1);
    }

    // ── rejection ─────────────────────────────────────────────────────────

    #[test]
    fn miss_outside_bounding_sphere() {
        let line = straight_line(2.0);
        assert!(cast(&line, &down_at(100.0)).is_empty());
    }

    #[test]
    fn far_limit_rejects() {
        let line = straight_line(2.0);
        let r = Raycaster { far: 5.0, ..down_at(25.0) };
        assert!(cast(&line, &r).is_empty());
        let r = Raycaster { near: 11.0, ..down_at(25.0) };
        assert!(cast(&line, &r).is_empty());
    }

    // ── world transform ───────────────────────────────────────────────────

    #[test]
    fn world_matrix_moves_line() {
        let mut line = straight_line(2.0);
        line.matrix_world = Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0));
        assert!(cast(&line, &down_at(25.0)).is_empty());

        let r = Raycaster { line_threshold: 0.0, ..Raycaster::new(Vec3::new(25.0, 5.0, 10.0), Vec3::NEG_Z) };
        let hits = cast(&line, &r);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].point - Vec3::new(25.0, 5.0, 0.0)).length() < EPS);
    }

    #[test]
    fn disabled_pick_never_hits() {
        let mut line = straight_line(2.0);
        line.pick = None;
        let r = down_at(25.0);
        let mut hits = Vec::new();
        line.raycast(&r, &mut hits);
        assert!(hits.is_empty());
        assert_eq!(r.intersect_object(&straight_line(2.0)).len(), 1);
    }
}
