use std::fmt;
use std::sync::Arc;

use glam::Vec3;

use super::attribute::{BufferAttribute, IndexBuffer};
use super::buffer::{channel, BufferGeometry};
use super::copy;
use super::error::{AdvanceError, InvalidInputError};
use super::points::PointsInput;

/// Per-point width multiplier, called with the normalized position `t` in `[0, 1]`.
pub type WidthFn = Arc<dyn Fn(f32) -> f32 + Send + Sync>;

/// Scalars per point pair in the 3-component channels (2 vertices x xyz).
const PAIR_STRIDE: usize = 6;

/// Ribbon builder: owns a path and derives the quad-strip attribute channels from it.
///
/// Every path point becomes two vertices (`side = +1` and `side = -1`) sharing the same
/// `position`. The actual offset is computed in the vertex shader from `previous` /
/// `next`, so the channels stay valid under any camera.
///
/// Channel layout for `L` points:
///
/// | channel    | item | length  |
/// |------------|------|---------|
/// | `position` | 3    | 6L      |
/// | `previous` | 3    | 6L      |
/// | `next`     | 3    | 6L      |
/// | `side`     | 1    | 2L      |
/// | `width`    | 1    | 2L      |
/// | `uv`       | 2    | 4L      |
/// | `counters` | 1    | 2L      |
/// | index      | -    | 6(L-1)  |
#[derive(Default, Clone)]
pub struct MeshLineGeometry {
    geometry: BufferGeometry,

    positions: Vec<f32>,
    previous: Vec<f32>,
    next: Vec<f32>,
    side: Vec<f32>,
    width: Vec<f32>,
    uvs: Vec<f32>,
    counters: Vec<f32>,
    indices: Vec<u32>,

    width_fn: Option<WidthFn>,

    /// Raw input of the last accepted `set_points`, kept for read-back.
    points: PointsInput,
    /// Source geometry of the last accepted `set_geometry`.
    source_geometry: Option<BufferGeometry>,
}

impl fmt::Debug for MeshLineGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeshLineGeometry")
            .field("point_count", &self.point_count())
            .field("has_width_fn", &self.width_fn.is_some())
            .field("geometry", &self.geometry)
            .finish()
    }
}

impl MeshLineGeometry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a geometry from `points` in one step.
    pub fn from_points(
        points: impl Into<PointsInput>,
        width_fn: Option<WidthFn>,
    ) -> Result<Self, InvalidInputError> {
        let mut line = Self::new();
        line.set_points(points, width_fn)?;
        Ok(line)
    }

    /// Replaces the path and rebuilds every channel.
    ///
    /// On error nothing changes: the previous path, width function and buffers stay.
    pub fn set_points(
        &mut self,
        points: impl Into<PointsInput>,
        width_fn: Option<WidthFn>,
    ) -> Result<(), InvalidInputError> {
        let input = points.into();
        let path = match read_path(&input) {
            Ok(path) => path,
            Err(e) => {
                log::warn!("{e}");
                return Err(e);
            }
        };

        self.points = input;
        self.source_geometry = None;
        self.width_fn = width_fn;
        self.load_path(&path);
        self.process();
        Ok(())
    }

    /// Replaces the path, keeping the current width function.
    pub fn update_points(&mut self, points: impl Into<PointsInput>) -> Result<(), InvalidInputError> {
        let width_fn = self.width_fn.clone();
        self.set_points(points, width_fn)
    }

    /// Uses the `position` channel of an existing geometry as the path.
    pub fn set_geometry(
        &mut self,
        source: &BufferGeometry,
        width_fn: Option<WidthFn>,
    ) -> Result<(), InvalidInputError> {
        let positions = match source.attribute(channel::POSITION) {
            Some(attr) if attr.item_size == 3 => attr.array.clone(),
            Some(attr) => {
                let e = InvalidInputError::unrecognized(format!(
                    "position channel has item size {}, expected 3",
                    attr.item_size
                ));
                log::warn!("{e}");
                return Err(e);
            }
            None => {
                let e = InvalidInputError::unrecognized("geometry has no position channel");
                log::warn!("{e}");
                return Err(e);
            }
        };

        self.set_points(PointsInput::Flat(positions), width_fn)?;
        self.source_geometry = Some(source.clone());
        Ok(())
    }

    /// Replaces the width function and rebuilds the channels.
    pub fn set_width_fn(&mut self, width_fn: Option<WidthFn>) {
        self.width_fn = width_fn;
        self.process();
    }

    /// Rebuilds all derived channels, the index and the bounds from the current path.
    ///
    /// Channels whose length is unchanged are overwritten in place and marked dirty;
    /// others are reallocated.
    pub fn process(&mut self) {
        let l = self.point_count();
        if l < 2 {
            return;
        }

        self.previous.clear();
        self.next.clear();
        self.side.clear();
        self.width.clear();
        self.uvs.clear();
        self.indices.clear();

        // Closed loops borrow the neighbour across the seam so the join is mitered.
        let first_prev = if self.compare_points(0, l - 1) { self.point(l - 2) } else { self.point(0) };
        push_pair(&mut self.previous, first_prev);

        let denom = (l - 1) as f32;
        for j in 0..l {
            let t = j as f32 / denom;

            self.side.extend_from_slice(&[1.0, -1.0]);

            let w = self.width_fn.as_ref().map_or(1.0, |f| f(t));
            self.width.extend_from_slice(&[w, w]);

            self.uvs.extend_from_slice(&[t, 0.0, t, 1.0]);

            let p = self.point(j);
            if j < l - 1 {
                push_pair(&mut self.previous, p);

                let n = (j * 2) as u32;
                self.indices.extend_from_slice(&[n, n + 1, n + 2, n + 2, n + 1, n + 3]);
            }
            if j > 0 {
                push_pair(&mut self.next, p);
            }
        }

        let last_next = if self.compare_points(l - 1, 0) { self.point(1) } else { self.point(l - 1) };
        push_pair(&mut self.next, last_next);

        let previous_vertices = self.geometry.vertex_count();
        if previous_vertices != l * 2 {
            log::debug!(
                "mesh line channels reallocated: {} -> {} vertices",
                previous_vertices,
                l * 2
            );
        }

        let g = &mut self.geometry;
        write_channel(g, channel::POSITION, &self.positions, 3);
        write_channel(g, channel::PREVIOUS, &self.previous, 3);
        write_channel(g, channel::NEXT, &self.next, 3);
        write_channel(g, channel::SIDE, &self.side, 1);
        write_channel(g, channel::WIDTH, &self.width, 1);
        write_channel(g, channel::UV, &self.uvs, 2);
        write_channel(g, channel::COUNTERS, &self.counters, 1);
        match g.index_mut() {
            Some(index) if index.len() == self.indices.len() => index.copy_array(&self.indices),
            _ => g.set_index(IndexBuffer::new(self.indices.clone())),
        }

        g.compute_bounding_sphere();
        g.compute_bounding_box();
    }

    /// Appends `point` and drops the oldest one, keeping the vertex count.
    ///
    /// Only `position`, `previous` and `next` change; `width`, `uv`, `counters` and
    /// the index stay as they are, so this suits fixed-length trails. Runs in
    /// O(vertex count) without allocating.
    pub fn advance(&mut self, point: Vec3) -> Result<(), AdvanceError> {
        let len = self.geometry.attribute(channel::POSITION).map_or(0, |a| a.array.len());
        let ready = len >= PAIR_STRIDE * 2
            && [channel::PREVIOUS, channel::NEXT].iter().all(|name| {
                self.geometry.attribute(name).is_some_and(|a| a.array.len() == len)
            });
        if !ready {
            return Err(AdvanceError::NotProcessed);
        }

        let tail = [point.x, point.y, point.z, point.x, point.y, point.z];
        let g = &mut self.geometry;

        let mut positions = match g.attribute_mut(channel::POSITION) {
            Some(attr) => std::mem::take(&mut attr.array),
            None => return Err(AdvanceError::NotProcessed),
        };

        if let Some(previous) = g.attribute_mut(channel::PREVIOUS) {
            previous.copy_array(&positions);
        }

        copy::shift_left(&mut positions, PAIR_STRIDE);
        let last_pair = len / PAIR_STRIDE - 1;
        copy::write_item(&mut positions, last_pair, &tail);

        if let Some(next) = g.attribute_mut(channel::NEXT) {
            copy::copy_into(&positions, PAIR_STRIDE, &mut next.array, 0, len - PAIR_STRIDE);
            copy::write_item(&mut next.array, last_pair, &tail);
            next.mark_needs_update();
        }

        if self.positions.len() == len {
            self.positions.copy_from_slice(&positions);
        }

        if let Some(position) = g.attribute_mut(channel::POSITION) {
            position.array = positions;
            position.mark_needs_update();
        }

        g.compute_bounding_sphere();
        g.compute_bounding_box();
        Ok(())
    }

    /// Exact equality of the positions of point pairs `a` and `b`.
    #[inline]
    pub fn compare_points(&self, a: usize, b: usize) -> bool {
        self.point(a) == self.point(b)
    }

    /// Position of point `a` (its first vertex).
    #[inline]
    pub fn point(&self, a: usize) -> Vec3 {
        let i = a * PAIR_STRIDE;
        Vec3::new(self.positions[i], self.positions[i + 1], self.positions[i + 2])
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.positions.len() / PAIR_STRIDE
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.point_count() * 2
    }

    #[inline]
    pub fn geometry(&self) -> &BufferGeometry {
        &self.geometry
    }

    /// Raw input of the last accepted `set_points`.
    #[inline]
    pub fn points(&self) -> &PointsInput {
        &self.points
    }

    #[inline]
    pub fn source_geometry(&self) -> Option<&BufferGeometry> {
        self.source_geometry.as_ref()
    }

    #[inline]
    pub fn width_fn(&self) -> Option<&WidthFn> {
        self.width_fn.as_ref()
    }

    fn load_path(&mut self, path: &[Vec3]) {
        self.positions.clear();
        self.counters.clear();
        let denom = (path.len() - 1) as f32;
        for (j, p) in path.iter().enumerate() {
            let c = j as f32 / denom;
            push_pair(&mut self.positions, *p);
            self.counters.extend_from_slice(&[c, c]);
        }
    }
}

fn read_path(input: &PointsInput) -> Result<Vec<Vec3>, InvalidInputError> {
    let path = input.to_points()?;
    if path.len() < 2 {
        return Err(InvalidInputError::too_few_points(path.len()));
    }
    Ok(path)
}

#[inline]
fn push_pair(dst: &mut Vec<f32>, p: Vec3) {
    dst.extend_from_slice(&[p.x, p.y, p.z, p.x, p.y, p.z]);
}

fn write_channel(geometry: &mut BufferGeometry, name: &str, data: &[f32], item_size: usize) {
    match geometry.attribute_mut(name) {
        Some(attr) if attr.array.len() == data.len() => attr.copy_array(data),
        _ => geometry.set_attribute(name, BufferAttribute::new(data.to_vec(), item_size)),
    }
}
