//! Streaming-trail demo.
//!
//! Grows a tapered, dashed trail along a Lissajous curve by advancing the ribbon
//! one point per frame, draws every frame offscreen when a GPU adapter is
//! available, then picks the trail with a ray through the screen centre.

use std::sync::Arc;

use anyhow::{Context, Result};
use glam::{Vec2, Vec3};
use meshline::device::{GpuInit, HeadlessGpu};
use meshline::logging::{init_logging, LoggingConfig};
use meshline::material::extrude_geometry;
use meshline::paint::Color;
use meshline::render::{Camera, MeshLineRenderer};
use meshline::{MaterialOptions, MeshLine, MeshLineGeometry, MeshLineMaterial, Raycaster, WidthFn};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const TRAIL_POINTS: usize = 64;
const FRAMES: usize = 240;

/// Head of the trail at time `t` (seconds).
fn lissajous(t: f32) -> Vec3 {
    Vec3::new((t * 1.3).sin() * 4.0, (t * 2.1).sin() * 3.0, (t * 0.7).cos())
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let dt = 1.0 / 60.0;
    let initial: Vec<Vec3> = (0..TRAIL_POINTS).map(|i| lissajous(i as f32 * dt)).collect();

    // Thin tail, full-width head.
    let taper: WidthFn = Arc::new(|t: f32| t);
    let geometry = MeshLineGeometry::from_points(initial, Some(taper))
        .context("initial trail is not a valid path")?;

    let material = MeshLineMaterial::with_options(MaterialOptions {
        line_width: Some(12.0),
        color: Some(Color::from_hex(0x3fa7ff)),
        resolution: Some(Vec2::new(WIDTH as f32, HEIGHT as f32)),
        gradient: Some([Color::from_hex(0x1a2a6c), Color::from_hex(0xfdbb2d)]),
        use_gradient: Some(true),
        dash_array: Some(0.1),
        dash_ratio: Some(0.3),
        ..Default::default()
    });

    let mut line = MeshLine::new(geometry, material);
    let camera = Camera::perspective(
        0.9,
        WIDTH as f32 / HEIGHT as f32,
        0.1,
        100.0,
        Vec3::new(0.0, 0.0, 12.0),
        Vec3::ZERO,
    );

    let gpu = match HeadlessGpu::new_blocking(WIDTH, HEIGHT, GpuInit::default()) {
        Ok(gpu) => Some(gpu),
        Err(e) => {
            log::warn!("no GPU available ({e:#}); running without drawing");
            None
        }
    };
    let mut renderer = MeshLineRenderer::new();

    for frame in 0..FRAMES {
        let t = (TRAIL_POINTS + frame) as f32 * dt;
        line.geometry.advance(lissajous(t))?;
        line.material.set_dash_offset(-(frame as f32) * 0.005);

        if let Some(gpu) = gpu.as_ref() {
            let mut gpu_frame = gpu.begin_frame(wgpu::Color::BLACK);
            {
                let ctx = gpu.render_ctx();
                let mut target = gpu.target(&mut gpu_frame);
                renderer.render(&ctx, &mut target, &line, &camera);
            }
            gpu.submit(gpu_frame);
        }

        if frame % 60 == 0 {
            log::info!("frame {frame}: head at {:?}", line.geometry.point(TRAIL_POINTS - 1));
        }
    }

    // Screen-space footprint from the CPU vertex stage.
    let mvp = camera.model_view_projection(&line.matrix_world);
    let clip = extrude_geometry(&line.material, line.geometry.geometry(), &mvp, &camera.projection);
    let (lo, hi) = clip
        .iter()
        .map(|c| Vec2::new(c.x, c.y) / c.w)
        .fold((Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)), |(lo, hi), p| (lo.min(p), hi.max(p)));
    log::info!("ribbon covers NDC {lo:?}..{hi:?} over {} vertices", clip.len());

    // Pick tolerance uses `line_width` in world units, so with a pixel-sized width
    // the first segment near the ray wins, not necessarily the head.
    let head = line.geometry.point(TRAIL_POINTS - 1);
    let head_ndc = mvp.project_point3(head);
    let raycaster = Raycaster {
        line_threshold: 0.05,
        ..Raycaster::from_screen(Vec2::new(head_ndc.x, head_ndc.y), &camera.view, &camera.projection)
    };
    match raycaster.intersect_object(&line).first() {
        Some(hit) => log::info!(
            "pick at head: segment {} at distance {:.3}, point {:?}",
            hit.index,
            hit.distance,
            hit.point
        ),
        None => log::info!("pick at head: no hit"),
    }

    let centre = Raycaster::from_screen(Vec2::ZERO, &camera.view, &camera.projection);
    let hits = centre.intersect_object(&line);
    log::info!("pick at screen centre: {} hit(s)", hits.len());

    Ok(())
}
