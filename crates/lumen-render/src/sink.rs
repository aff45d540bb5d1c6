//! Raster outputs for rendered pixels.

use crate::config::ImageConfig;
use crate::error::Result;
use image::{Rgb, RgbImage};
use lumen_math::Color;
use std::path::{Path, PathBuf};

/// Destination of rendered pixels.
///
/// Colors arrive unclamped; implementations map them to their own range.
pub trait ImageSink {
    /// Horizontal resolution.
    fn width(&self) -> usize;
    /// Vertical resolution.
    fn height(&self) -> usize;
    /// Store the color of pixel `(column, row)`. Out-of-range pixels are
    /// ignored.
    fn write_pixel(&mut self, column: usize, row: usize, color: Color);
    /// Persist the image.
    fn flush(&mut self) -> Result<()>;
}

/// In-memory raster of unclamped colors.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    /// Black buffer of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
        }
    }

    /// Color of a pixel, `None` out of range.
    pub fn pixel(&self, column: usize, row: usize) -> Option<Color> {
        (column < self.width && row < self.height).then(|| self.pixels[row * self.width + column])
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }
}

impl ImageSink for FrameBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn write_pixel(&mut self, column: usize, row: usize, color: Color) {
        if column < self.width && row < self.height {
            self.pixels[row * self.width + column] = color;
        }
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// 8-bit RGB image saved as `<output_dir>/<name>.png`.
pub struct ImageWriter {
    name: String,
    output_dir: PathBuf,
    image: RgbImage,
}

impl ImageWriter {
    /// Writer targeting `images/<name>.png`.
    pub fn new(name: impl Into<String>, width: usize, height: usize) -> Self {
        Self {
            name: name.into(),
            output_dir: PathBuf::from("images"),
            image: RgbImage::new(width as u32, height as u32),
        }
    }

    /// Writer sized and named from an image config.
    pub fn from_config(config: &ImageConfig) -> Self {
        Self::new(config.name.clone(), config.width_px, config.height_px)
            .with_output_dir(&config.output_dir)
    }

    /// Change the output directory.
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Path the image is saved to.
    pub fn path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.png", self.name))
    }
}

impl ImageSink for ImageWriter {
    fn width(&self) -> usize {
        self.image.width() as usize
    }

    fn height(&self) -> usize {
        self.image.height() as usize
    }

    fn write_pixel(&mut self, column: usize, row: usize, color: Color) {
        if column < self.width() && row < self.height() {
            self.image
                .put_pixel(column as u32, row as u32, Rgb(color.to_rgb8()));
        }
    }

    fn flush(&mut self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.path();
        self.image.save(&path)?;
        log::info!("wrote {}", path.display());
        Ok(())
    }
}
