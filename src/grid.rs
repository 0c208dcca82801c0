use image::RgbaImage;
use palette::{Srgba, cast};

use crate::color::Color;
use crate::error::{QuantizeError, Result};

/// A row-major `width × height` grid of pixel colors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelGrid {
    /// Build a grid from row-major pixels. A zero-area grid is allowed here;
    /// the clusterer is the one that rejects it.
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(QuantizeError::invalid_argument(
                "pixels",
                format!(
                    "expected {expected} pixels for a {width}x{height} grid, got {}",
                    pixels.len()
                ),
            ));
        }
        Ok(Self { width, height, pixels })
    }

    /// Grid of a single repeated color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Color) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self { width, height, pixels }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Pixel at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// A grid with these dimensions holding `pixels` instead.
    pub(crate) fn with_pixels(&self, pixels: Vec<Color>) -> Self {
        debug_assert_eq!(pixels.len(), self.pixels.len());
        Self {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    pub fn from_rgba_image(img: &RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let colors: &[Srgba<u8>] = cast::from_component_slice(img.as_raw().as_slice());
        Self {
            width,
            height,
            pixels: colors.iter().map(|&c| Color::from(c)).collect(),
        }
    }

    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        let colors: Vec<Srgba<u8>> = self.pixels.iter().map(|&c| c.into()).collect();
        RgbaImage::from_raw(self.width, self.height, cast::into_component_vec(colors))
            .ok_or_else(|| QuantizeError::invalid_argument("grid", "failed to rebuild image buffer"))
    }
}
