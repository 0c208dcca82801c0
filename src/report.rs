//! Report rendering: console lines, JSON, HTML and the quantized image file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{QuantizeError, Result};
use crate::rank::ColorDetail;

const QUANTIZED_SUFFIX: &str = "_quantized";
const JPEG_QUALITY: u8 = 100;

/// How a color is written in console output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "native-bin", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    #[default]
    Hex,
    Rgb,
}

impl ColorFormat {
    pub fn render(self, detail: &ColorDetail) -> &str {
        match self {
            ColorFormat::Hex => &detail.hex,
            ColorFormat::Rgb => &detail.rgba,
        }
    }
}

/// Ranked colors of one source image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageReport {
    /// Source path.
    pub id: String,
    /// Path of the saved quantized image.
    pub quantized: String,
    pub colors: Vec<ColorDetail>,
}

impl ImageReport {
    pub fn lines(&self, format: ColorFormat) -> Vec<String> {
        self.colors
            .iter()
            .map(|c| format!("Color: {}, {:.2}%", format.render(c), c.percentage))
            .collect()
    }
}

/// `photo.png` -> `photo_quantized.jpg`, next to the source.
pub fn quantized_path(source: &Path) -> PathBuf {
    let stem = source.file_stem().unwrap_or_default().to_string_lossy();
    source.with_file_name(format!("{stem}{QUANTIZED_SUFFIX}.jpg"))
}

pub fn is_quantized_output(path: &Path) -> bool {
    path.file_stem()
        .is_some_and(|s| s.to_string_lossy().ends_with(QUANTIZED_SUFFIX))
}

/// Write `img` as a maximum-quality JPEG next to `source`. Alpha is dropped.
pub fn save_quantized(source: &Path, img: &RgbaImage) -> Result<PathBuf> {
    let out_path = quantized_path(source);
    let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
    let mut writer = BufWriter::new(File::create(&out_path)?);
    JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(QuantizeError::Encode)?;
    writer.flush()?;
    info!(path = %out_path.display(), "quantized image saved");
    Ok(out_path)
}

pub fn write_json(path: &Path, reports: &[ImageReport]) -> Result<()> {
    let json = serde_json::to_string_pretty(reports)?;
    fs::write(path, json)?;
    info!(path = %path.display(), "JSON report written");
    Ok(())
}

pub fn write_html(path: &Path, reports: &[ImageReport]) -> Result<()> {
    fs::write(path, render_html(reports))?;
    info!(path = %path.display(), "HTML report written");
    Ok(())
}

pub fn render_html(reports: &[ImageReport]) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Dominant colors</title>\n\
         <style>\n\
         body { font-family: sans-serif; }\n\
         .swatch { display: inline-block; width: 120px; margin: 4px; text-align: center; }\n\
         .chip { height: 60px; border: 1px solid #ccc; }\n\
         </style>\n</head>\n<body>\n",
    );
    for report in reports {
        html.push_str(&format!(
            "<section>\n<h2>{}</h2>\n<p>Quantized: {}</p>\n<div>\n",
            escape(&report.id),
            escape(&report.quantized)
        ));
        for c in &report.colors {
            html.push_str(&format!(
                "<div class=\"swatch\"><div class=\"chip\" style=\"background: {hex}\"></div>{hex}<br>{pct:.2}%</div>\n",
                hex = c.hex,
                pct = c.percentage
            ));
        }
        html.push_str("</div>\n</section>\n");
    }
    html.push_str("</body>\n</html>\n");
    html
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
