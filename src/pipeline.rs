use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::debug;

use crate::cluster::{ClusterConfig, cluster};
use crate::color::Color;
use crate::error::{QuantizeError, Result};
use crate::grid::PixelGrid;
use crate::rank::{ColorDetail, rank};

/// Everything produced for one image.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub quantized: RgbaImage,
    pub centroids: Vec<Color>,
    pub colors: Vec<ColorDetail>,
}

/// Decode `input`, quantize it to `config.k` colors and rank the result.
pub fn analyze_bytes(input: &[u8], config: &ClusterConfig, top_n: usize) -> Result<Analysis> {
    let img = image::load_from_memory(input).map_err(QuantizeError::Decode)?;
    analyze_image(&img, config, top_n)
}

pub fn analyze_image(img: &DynamicImage, config: &ClusterConfig, top_n: usize) -> Result<Analysis> {
    let grid = PixelGrid::from_rgba_image(&img.to_rgba8());
    debug!(width = grid.width(), height = grid.height(), k = config.k, "quantizing image");

    let clustering = cluster(&grid, config)?;
    let colors = rank(&clustering.quantized, top_n);

    Ok(Analysis {
        quantized: clustering.quantized.to_rgba_image()?,
        centroids: clustering.centroids,
        colors,
    })
}

/// PNG-encode an RGBA image.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buf);
        img.write_to(&mut cursor, ImageFormat::Png)
            .map_err(QuantizeError::Encode)?;
    }
    Ok(buf)
}
