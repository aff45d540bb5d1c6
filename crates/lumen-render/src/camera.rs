//! Pinhole camera: view plane geometry, builder and render loop.

use crate::config::CameraConfig;
use crate::error::{RenderError, Result};
use crate::render::{render_pixels, Threads};
use crate::sink::ImageSink;
use crate::tracer::{SampleKey, TraceRay};
use lumen_geom::{GeometryError, Ray};
use lumen_math::{align_zero, cross, is_zero, rotate_about_axis, try_normalize, Color, Dir3, Point3, Vec3};
use std::time::Instant;

/// Eye position, orientation and view plane extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPlane {
    /// Eye position.
    pub location: Point3,
    /// Viewing direction.
    pub to: Dir3,
    /// Up direction, orthogonal to `to`.
    pub up: Dir3,
    /// Right direction, `to × up` unless flipped.
    pub right: Dir3,
    /// View plane width.
    pub width: f64,
    /// View plane height.
    pub height: f64,
    /// Eye to view plane distance.
    pub distance: f64,
}

impl ViewPlane {
    /// Validated view plane with `right = to × up`.
    pub fn new(
        location: Point3,
        to: Vec3,
        up: Vec3,
        width: f64,
        height: f64,
        distance: f64,
    ) -> Result<Self> {
        let (to, up) = orthonormal_pair(to, up)?;
        let view = Self {
            location,
            to,
            up,
            right: Dir3::new_normalize(to.cross(up.as_ref())),
            width,
            height,
            distance,
        };
        view.check_extent()?;
        Ok(view)
    }

    fn check_extent(&self) -> Result<()> {
        if !(self.width > 0.0) {
            return Err(RenderError::ConfigMissing("view plane width"));
        }
        if !(self.height > 0.0) {
            return Err(RenderError::ConfigMissing("view plane height"));
        }
        if !(self.distance > 0.0) {
            return Err(RenderError::ConfigMissing("view plane distance"));
        }
        Ok(())
    }

    /// Primary ray through the center of pixel `(j, i)` of an `nx × ny`
    /// raster. Column 0 is on the left, row 0 at the top.
    pub fn construct_ray(&self, nx: usize, ny: usize, j: usize, i: usize) -> Ray {
        let pc = self.location + self.to.as_ref() * self.distance;
        let rx = self.width / nx as f64;
        let ry = self.height / ny as f64;
        let xj = (j as f64 - (nx as f64 - 1.0) / 2.0) * rx;
        let yi = -(i as f64 - (ny as f64 - 1.0) / 2.0) * ry;

        let mut pij = pc;
        if !is_zero(xj) {
            pij += self.right.as_ref() * xj;
        }
        if !is_zero(yi) {
            pij += self.up.as_ref() * yi;
        }
        Ray::new(self.location, Dir3::new_normalize(pij - self.location))
    }
}

fn orthonormal_pair(to: Vec3, up: Vec3) -> Result<(Dir3, Dir3)> {
    let to = try_normalize(to)
        .map_err(|_| RenderError::InvalidConfig("view direction is zero".into()))?;
    let up =
        try_normalize(up).map_err(|_| RenderError::InvalidConfig("up direction is zero".into()))?;
    if align_zero(to.dot(up.as_ref())) != 0.0 {
        return Err(RenderError::InvalidConfig(
            "view and up directions are not orthogonal".into(),
        ));
    }
    Ok((to, up))
}

/// A camera ready to render into its sink.
pub struct Camera<'a> {
    view: ViewPlane,
    sink: &'a mut dyn ImageSink,
    tracer: &'a dyn TraceRay,
    threads: Threads,
    progress_interval: f64,
}

impl<'a> Camera<'a> {
    /// Start building a camera.
    pub fn builder() -> CameraBuilder<'a> {
        CameraBuilder::default()
    }

    /// View plane geometry.
    pub fn view(&self) -> &ViewPlane {
        &self.view
    }

    /// Primary ray of pixel `(j, i)` at the sink's resolution.
    pub fn construct_ray(&self, j: usize, i: usize) -> Ray {
        self.view
            .construct_ray(self.sink.width(), self.sink.height(), j, i)
    }

    /// Trace every pixel and write the colors to the sink.
    pub fn render_image(&mut self) -> Result<&mut Self> {
        let (nx, ny) = (self.sink.width(), self.sink.height());
        let view = self.view;
        let tracer = self.tracer;
        log::info!("rendering {nx}x{ny} pixels ({:?})", self.threads);
        let started = Instant::now();

        let pixels = render_pixels(nx, ny, self.threads, self.progress_interval, |col, row| {
            tracer.trace_ray(
                &view.construct_ray(nx, ny, col, row),
                SampleKey::pixel(col as u32, row as u32),
            )
        })?;
        for (i, color) in pixels.into_iter().enumerate() {
            self.sink.write_pixel(i % nx, i / nx, color);
        }

        log::info!("rendered in {:.2?}", started.elapsed());
        Ok(self)
    }

    /// Paint every `interval`-th row and column with `color`.
    pub fn print_grid(&mut self, interval: usize, color: Color) -> &mut Self {
        if interval == 0 {
            return self;
        }
        let (nx, ny) = (self.sink.width(), self.sink.height());
        for row in 0..ny {
            for col in 0..nx {
                if row % interval == 0 || col % interval == 0 {
                    self.sink.write_pixel(col, row, color);
                }
            }
        }
        self
    }

    /// Flush the sink.
    pub fn write_to_image(&mut self) -> Result<()> {
        self.sink.flush()
    }
}

/// Step-by-step camera configuration.
///
/// Orientation operations apply in call order; `build` checks that
/// everything required is present.
pub struct CameraBuilder<'a> {
    location: Point3,
    to: Dir3,
    up: Dir3,
    flipped: bool,
    width: f64,
    height: f64,
    distance: f64,
    sink: Option<&'a mut dyn ImageSink>,
    tracer: Option<&'a dyn TraceRay>,
    threads: Threads,
    progress_interval: f64,
}

impl Default for CameraBuilder<'_> {
    fn default() -> Self {
        Self {
            location: Point3::origin(),
            to: -Vec3::z_axis(),
            up: Vec3::y_axis(),
            flipped: false,
            width: 0.0,
            height: 0.0,
            distance: 0.0,
            sink: None,
            tracer: None,
            threads: Threads::Serial,
            progress_interval: 0.0,
        }
    }
}

impl<'a> CameraBuilder<'a> {
    /// Builder set up from a config section. The sink and tracer still
    /// have to be supplied.
    pub fn from_config(config: &CameraConfig) -> Result<Self> {
        let mut builder = Self::default()
            .location(config.location)
            .direction(config.to, config.up)?;
        if let Some(target) = config.look_at {
            builder = builder.look_at(target)?;
        }
        if config.rotate_degrees != 0.0 {
            builder = builder.rotate(config.rotate_degrees);
        }
        if config.flip {
            builder = builder.flip();
        }
        Ok(builder
            .view_plane_size(config.width, config.height)
            .view_plane_distance(config.distance)
            .threads_code(config.threads)?
            .progress_interval(config.progress_interval))
    }

    /// Eye position.
    pub fn location(mut self, location: Point3) -> Self {
        self.location = location;
        self
    }

    /// Viewing and up directions; they must be orthogonal.
    pub fn direction(mut self, to: Vec3, up: Vec3) -> Result<Self> {
        (self.to, self.up) = orthonormal_pair(to, up)?;
        Ok(self)
    }

    /// Aim at `target` from the current location.
    ///
    /// Up becomes the projection of the world Y axis onto the view plane,
    /// or of the Z axis when looking straight up or down.
    pub fn look_at(mut self, target: Point3) -> Result<Self> {
        let to = try_normalize(target - self.location)
            .map_err(|_| RenderError::InvalidConfig("look-at target equals location".into()))?;
        let side = cross(to.as_ref(), &Vec3::y())
            .or_else(|_| cross(to.as_ref(), &Vec3::z()))
            .map_err(GeometryError::from)?;
        self.up = cross(side.as_ref(), to.as_ref()).map_err(GeometryError::from)?;
        self.to = to;
        Ok(self)
    }

    /// Roll the up direction about the viewing direction.
    pub fn rotate(mut self, degrees: f64) -> Self {
        let up = rotate_about_axis(self.up.as_ref(), &self.to, degrees.to_radians());
        self.up = Dir3::new_normalize(up);
        self
    }

    /// Mirror the image horizontally.
    pub fn flip(mut self) -> Self {
        self.flipped = !self.flipped;
        self
    }

    /// View plane width and height.
    pub fn view_plane_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Eye to view plane distance.
    pub fn view_plane_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Pixel destination.
    pub fn image_writer(mut self, sink: &'a mut dyn ImageSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Color source.
    pub fn ray_tracer(mut self, tracer: &'a dyn TraceRay) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Thread mode.
    pub fn threads(mut self, threads: Threads) -> Self {
        self.threads = threads;
        self
    }

    /// Thread mode from its numeric code; see [`Threads::from_code`].
    pub fn threads_code(self, code: i32) -> Result<Self> {
        Ok(self.threads(Threads::from_code(code)?))
    }

    /// Progress log interval in percent; 0 disables.
    pub fn progress_interval(mut self, percent: f64) -> Self {
        self.progress_interval = percent.max(0.0);
        self
    }

    /// Finish the camera.
    pub fn build(self) -> Result<Camera<'a>> {
        let sink = self.sink.ok_or(RenderError::ConfigMissing("image writer"))?;
        let tracer = self.tracer.ok_or(RenderError::ConfigMissing("ray tracer"))?;
        if align_zero(self.to.dot(self.up.as_ref())) != 0.0 {
            return Err(RenderError::InvalidConfig(
                "view and up directions are not orthogonal".into(),
            ));
        }
        let right = Dir3::new_normalize(self.to.cross(self.up.as_ref()));
        let view = ViewPlane {
            location: self.location,
            to: self.to,
            up: self.up,
            right: if self.flipped { -right } else { right },
            width: self.width,
            height: self.height,
            distance: self.distance,
        };
        view.check_extent()?;
        Ok(Camera {
            view,
            sink,
            tracer,
            threads: self.threads,
            progress_interval: self.progress_interval,
        })
    }
}
