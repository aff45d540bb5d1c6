//! Pixel scheduling.
//!
//! [`render_pixels`] evaluates a shading closure for every pixel of an
//! `nx × ny` raster and returns the colors in row-major order. The
//! closure is called exactly once per pixel. How the calls are spread
//! over threads is chosen by [`Threads`]:
//!
//! - `Serial` runs on the calling thread.
//! - `Stream` hands the pixel range to rayon's global pool.
//! - `Fixed(n)` and `Auto` spawn scoped workers that claim pixels from a
//!   shared atomic cursor. A worker that panics records the first error
//!   and the others stop after their current pixel.
//!
//! Workers keep their results locally; colors are scattered into the
//! output only after every worker has joined.

use crate::error::{RenderError, Result};
use lumen_math::Color;
use rayon::prelude::*;
use std::any::Any;
use std::num::NonZeroUsize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Cores left free in [`Threads::Auto`] mode.
pub const SPARE_CORES: usize = 2;

/// Thread mode of the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Threads {
    /// `max(1, cores − SPARE_CORES)` workers.
    Auto,
    /// Rayon parallel iterator.
    Stream,
    /// Calling thread only.
    #[default]
    Serial,
    /// Exactly this many workers.
    Fixed(NonZeroUsize),
}

impl Threads {
    /// Decode the numeric form: −2 auto, −1 stream, 0 serial, n ≥ 1 workers.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            -2 => Ok(Threads::Auto),
            -1 => Ok(Threads::Stream),
            0 => Ok(Threads::Serial),
            n => usize::try_from(n)
                .ok()
                .and_then(NonZeroUsize::new)
                .map(Threads::Fixed)
                .ok_or_else(|| {
                    RenderError::InvalidConfig(format!("thread count must be -2 or more, got {n}"))
                }),
        }
    }

    /// Number of scoped workers for `Auto` and `Fixed`, 1 otherwise.
    pub fn workers(&self) -> usize {
        match self {
            Threads::Auto => std::thread::available_parallelism()
                .map(|n| n.get().saturating_sub(SPARE_CORES).max(1))
                .unwrap_or(1),
            Threads::Fixed(n) => n.get(),
            Threads::Stream | Threads::Serial => 1,
        }
    }
}

/// Completed-pixel counter that logs at percentage intervals.
struct Progress {
    total: usize,
    interval: f64,
    done: AtomicUsize,
    reported: AtomicUsize,
}

impl Progress {
    fn new(total: usize, interval: f64) -> Self {
        Self {
            total,
            interval,
            done: AtomicUsize::new(0),
            reported: AtomicUsize::new(0),
        }
    }

    fn tick(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if !(self.interval > 0.0) {
            return;
        }
        let percent = done as f64 * 100.0 / self.total as f64;
        let bucket = (percent / self.interval).floor() as usize;
        if bucket > self.reported.fetch_max(bucket, Ordering::Relaxed) {
            log::info!("rendered {:.0}%", bucket as f64 * self.interval);
        }
    }
}

/// Evaluate `shade(column, row)` for every pixel; row-major result.
pub fn render_pixels<F>(
    nx: usize,
    ny: usize,
    threads: Threads,
    progress_interval: f64,
    shade: F,
) -> Result<Vec<Color>>
where
    F: Fn(usize, usize) -> Color + Sync,
{
    let total = nx * ny;
    let progress = Progress::new(total, progress_interval);
    let pixel = |i: usize| {
        let c = shade(i % nx, i / nx);
        progress.tick();
        c
    };

    match threads {
        Threads::Serial => Ok((0..total).map(pixel).collect()),
        Threads::Stream => catch_unwind(AssertUnwindSafe(|| {
            (0..total).into_par_iter().map(pixel).collect::<Vec<_>>()
        }))
        .map_err(|payload| {
            let message = panic_message(payload.as_ref());
            log::error!("render worker panicked: {message}");
            RenderError::WorkerPanicked(message)
        }),
        Threads::Auto | Threads::Fixed(_) => scoped(total, threads.workers(), &pixel),
    }
}

fn scoped<P>(total: usize, workers: usize, pixel: &P) -> Result<Vec<Color>>
where
    P: Fn(usize) -> Color + Sync,
{
    let cursor = AtomicUsize::new(0);
    let stop = AtomicBool::new(false);
    let first_error: Mutex<Option<RenderError>> = Mutex::new(None);

    let worker = |id: usize| {
        let mut local = Vec::new();
        while !stop.load(Ordering::Relaxed) {
            let i = cursor.fetch_add(1, Ordering::Relaxed);
            if i >= total {
                break;
            }
            match catch_unwind(AssertUnwindSafe(|| pixel(i))) {
                Ok(c) => local.push((i, c)),
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    log::error!("render worker {id} panicked at pixel {i}: {message}");
                    let mut slot = first_error.lock().unwrap_or_else(|e| e.into_inner());
                    slot.get_or_insert(RenderError::WorkerPanicked(message));
                    stop.store(true, Ordering::Relaxed);
                    break;
                }
            }
        }
        local
    };

    let joined: Result<Vec<Vec<(usize, Color)>>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..workers).map(|id| s.spawn(move || worker(id))).collect();
        handles
            .into_iter()
            .map(|h| {
                h.join()
                    .map_err(|payload| RenderError::WorkerPanicked(panic_message(payload.as_ref())))
            })
            .collect()
    });

    if let Some(err) = first_error.into_inner().unwrap_or_else(|e| e.into_inner()) {
        return Err(err);
    }
    let parts = joined?;

    let mut out = vec![Color::BLACK; total];
    for (i, c) in parts.into_iter().flatten() {
        out[i] = c;
    }
    Ok(out)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ViewPlane;
    use crate::scene::Scene;
    use crate::tracer::{RayTracer, SampleKey, TraceRay};
    use lumen_geom::{Geometry, GlossyBeam, Material, Polygon, Sphere};
    use lumen_math::{Point3, Vec3};

    fn gradient(col: usize, row: usize) -> Color {
        Color::new(col as f64, row as f64, (col * row) as f64)
    }

    #[test]
    fn test_thread_codes() {
        assert_eq!(Threads::from_code(-2).unwrap(), Threads::Auto);
        assert_eq!(Threads::from_code(-1).unwrap(), Threads::Stream);
        assert_eq!(Threads::from_code(0).unwrap(), Threads::Serial);
        assert_eq!(
            Threads::from_code(3).unwrap(),
            Threads::Fixed(NonZeroUsize::new(3).unwrap())
        );
        assert!(matches!(Threads::from_code(-3), Err(RenderError::InvalidConfig(_))));
        assert!(Threads::Auto.workers() >= 1);
        assert_eq!(Threads::default(), Threads::Serial);
    }

    #[test]
    fn test_every_mode_fills_row_major() {
        let modes = [
            Threads::Serial,
            Threads::Stream,
            Threads::Auto,
            Threads::Fixed(NonZeroUsize::new(3).unwrap()),
        ];
        for mode in modes {
            let pixels = render_pixels(7, 5, mode, 10.0, gradient).unwrap();
            assert_eq!(pixels.len(), 35);
            for (i, c) in pixels.iter().enumerate() {
                assert_eq!(*c, gradient(i % 7, i / 7), "{mode:?} pixel {i}");
            }
        }
    }

    #[test]
    fn test_each_pixel_shaded_once() {
        let calls = AtomicUsize::new(0);
        render_pixels(16, 16, Threads::Fixed(NonZeroUsize::new(4).unwrap()), 0.0, |_, _| {
            calls.fetch_add(1, Ordering::Relaxed);
            Color::BLACK
        })
        .unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 256);
    }

    #[test]
    fn test_worker_panic_reported() {
        let shade = |col: usize, row: usize| {
            if col == 3 && row == 2 {
                panic!("bad pixel");
            }
            Color::BLACK
        };
        let fixed = render_pixels(8, 8, Threads::Fixed(NonZeroUsize::new(2).unwrap()), 0.0, shade);
        match fixed {
            Err(RenderError::WorkerPanicked(msg)) => assert!(msg.contains("bad pixel")),
            other => panic!("expected WorkerPanicked, got {other:?}"),
        }
        assert!(matches!(
            render_pixels(8, 8, Threads::Stream, 0.0, shade),
            Err(RenderError::WorkerPanicked(_))
        ));
    }

    #[test]
    fn test_render_is_deterministic() {
        let glossy = GlossyBeam::new(6, 2.0, 0.5).unwrap();
        let mut scene = Scene::new("glossy floor")
            .with_geometry(
                Geometry::new(
                    Polygon::new(vec![
                        Point3::new(-20.0, -2.0, 10.0),
                        Point3::new(20.0, -2.0, 10.0),
                        Point3::new(20.0, -2.0, -40.0),
                        Point3::new(-20.0, -2.0, -40.0),
                    ])
                    .unwrap(),
                )
                .with_material(Material::new().with_kd(0.3).with_kr(0.6).with_glossy(glossy)),
            )
            .with_geometry(
                Geometry::new(Sphere::new(Point3::new(0.0, 0.0, -10.0), 2.0).unwrap())
                    .with_emission(Color::new(30.0, 120.0, 200.0)),
            )
            .with_light(crate::light::PointLight::new(Color::WHITE, Point3::new(0.0, 10.0, 0.0)));
        scene.build_grid().unwrap();
        let tracer = RayTracer::new(&scene);
        let view = ViewPlane::new(Point3::origin(), -Vec3::z(), Vec3::y(), 2.0, 2.0, 1.0).unwrap();
        let shade = |col: usize, row: usize| {
            tracer.trace_ray(
                &view.construct_ray(24, 24, col, row),
                SampleKey::pixel(col as u32, row as u32),
            )
        };

        let serial = render_pixels(24, 24, Threads::Serial, 0.0, shade).unwrap();
        let fixed =
            render_pixels(24, 24, Threads::Fixed(NonZeroUsize::new(4).unwrap()), 0.0, shade).unwrap();
        let stream = render_pixels(24, 24, Threads::Stream, 0.0, shade).unwrap();
        assert_eq!(serial, fixed);
        assert_eq!(serial, stream);
        assert!(serial.iter().any(|c| !c.is_black()));
    }
}
