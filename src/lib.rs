//! Dominant color extraction by k-means color quantization.
//!
//! An image is reduced to `k` representative colors with a fixed number of
//! k-means refinement passes in RGB space, then the colors of the quantized
//! image are ranked by frequency.
//!
//! ```
//! use dominant_colors_wasm::{Color, ClusterConfig, PixelGrid, cluster, rank};
//!
//! let red = Color::rgb(255, 0, 0);
//! let blue = Color::rgb(0, 0, 255);
//! let grid = PixelGrid::new(2, 2, vec![red, red, red, blue])?;
//!
//! let clustering = cluster(&grid, &ClusterConfig::new(2, 10).with_seed(7))?;
//! let ranked = rank(&clustering.quantized, 0);
//! assert!(ranked.len() <= 2);
//! # Ok::<(), dominant_colors_wasm::QuantizeError>(())
//! ```

pub mod cluster;
pub mod color;
pub mod error;
pub mod grid;
pub mod pipeline;
pub mod rank;
pub mod report;
pub mod wasm;

pub use cluster::{
    ClusterConfig, Clustering, cluster, cluster_from_centroids, cluster_with_rng, nearest_centroid,
};
pub use color::Color;
pub use error::{QuantizeError, Result};
pub use grid::PixelGrid;
pub use pipeline::{Analysis, analyze_bytes, analyze_image, encode_png};
pub use rank::{ColorDetail, rank, tally};
pub use report::{ColorFormat, ImageReport};
