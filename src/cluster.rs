//! K-means color clustering over a [`PixelGrid`].
//!
//! A run samples `k` initial centroids from random grid positions, then
//! alternates two phases a fixed number of times:
//!
//! 1. **Assignment**: every pixel goes to the centroid with the smallest
//!    squared RGB distance, ties going to the lowest cluster index. Rows are
//!    processed in parallel against a read-only centroid slice.
//! 2. **Update**: every cluster's centroid becomes the integer-truncated mean
//!    of its pixels. Channel sums are gathered in one parallel pass over the
//!    pixels, then each cluster is recentered by a single worker. An empty
//!    cluster keeps its previous centroid.
//!
//! After the last update a final assignment pass produces the quantized grid.
//! Quantized pixels are the centroid colors exactly, alpha included: a
//! centroid carries the alpha of the pixel it was seeded from.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::color::Color;
use crate::error::{QuantizeError, Result};
use crate::grid::PixelGrid;

pub const DEFAULT_CLUSTERS: usize = 16;
pub const DEFAULT_ITERATIONS: usize = 10;

/// Parameters of one clustering run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Number of clusters.
    pub k: usize,
    /// Refinement passes. `0` keeps the random initial centroids.
    pub iterations: usize,
    /// Seed for centroid sampling. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Opt-in early exit: stop once no centroid moved by more than this
    /// squared RGB distance during an iteration.
    pub tolerance: Option<u32>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_CLUSTERS,
            iterations: DEFAULT_ITERATIONS,
            seed: None,
            tolerance: None,
        }
    }
}

impl ClusterConfig {
    pub fn new(k: usize, iterations: usize) -> Self {
        Self {
            k,
            iterations,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_tolerance(mut self, tolerance: u32) -> Self {
        self.tolerance = Some(tolerance);
        self
    }
}

/// Result of a clustering run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clustering {
    /// Same dimensions as the input; every pixel replaced by its centroid.
    pub quantized: PixelGrid,
    /// The `k` final centroids, indexed by cluster.
    pub centroids: Vec<Color>,
    /// Pixels mapped to each centroid by the final assignment.
    pub populations: Vec<usize>,
    /// Refinement passes actually run.
    pub iterations: usize,
}

/// Channel sums and pixel count gathered for one cluster in one pass.
#[derive(Clone, Copy, Debug, Default)]
struct Accumulator {
    sum: [u64; 3],
    count: u64,
}

impl Accumulator {
    #[inline(always)]
    fn absorb(&mut self, color: &Color) {
        self.sum[0] += color.r as u64;
        self.sum[1] += color.g as u64;
        self.sum[2] += color.b as u64;
        self.count += 1;
    }

    fn merge(&mut self, other: &Accumulator) {
        for (mine, theirs) in self.sum.iter_mut().zip(other.sum) {
            *mine += theirs;
        }
        self.count += other.count;
    }
}

#[derive(Clone, Copy, Debug)]
struct Cluster {
    centroid: Color,
    acc: Accumulator,
}

impl Cluster {
    fn new(centroid: Color) -> Self {
        Self {
            centroid,
            acc: Accumulator::default(),
        }
    }

    /// Move the centroid to the truncated mean of the accumulated pixels and
    /// return how far it moved (squared). Empty clusters stay put. The
    /// centroid keeps the alpha of the pixel it was seeded from.
    fn recenter(&mut self) -> u32 {
        let Accumulator { sum, count } = self.acc;
        if count == 0 {
            return 0;
        }
        // Each channel mean of u8 values is at most 255.
        let next = Color::new(
            (sum[0] / count) as u8,
            (sum[1] / count) as u8,
            (sum[2] / count) as u8,
            self.centroid.a,
        );
        let shift = self.centroid.distance_squared(&next);
        self.centroid = next;
        shift
    }
}

/// Index of the centroid closest to `color`; the first one wins a tie.
#[inline(always)]
pub fn nearest_centroid(color: &Color, centroids: &[Color]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = u32::MAX;
    for (idx, c) in centroids.iter().enumerate() {
        let dist = color.distance_squared(c);
        if dist < best_dist {
            best_dist = dist;
            best_idx = idx;
        }
    }
    best_idx
}

/// Cluster `grid` into `config.k` colors.
///
/// Initial centroids come from a [`StdRng`] seeded with `config.seed`, or
/// from the OS when no seed is given.
pub fn cluster(grid: &PixelGrid, config: &ClusterConfig) -> Result<Clustering> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    cluster_with_rng(grid, config, &mut rng)
}

/// Same as [`cluster`] but draws the initial centroids from `rng`.
/// `config.seed` is ignored.
pub fn cluster_with_rng<R: Rng + ?Sized>(
    grid: &PixelGrid,
    config: &ClusterConfig,
    rng: &mut R,
) -> Result<Clustering> {
    validate(grid, config.k)?;
    let initial = sample_centroids(grid, config.k, rng);
    Ok(refine(grid, initial, config.iterations, config.tolerance))
}

/// Run the fixed-iteration refinement from caller-chosen initial centroids.
/// The number of clusters is `initial.len()`.
pub fn cluster_from_centroids(
    grid: &PixelGrid,
    initial: &[Color],
    iterations: usize,
) -> Result<Clustering> {
    validate(grid, initial.len())?;
    Ok(refine(grid, initial.to_vec(), iterations, None))
}

fn validate(grid: &PixelGrid, k: usize) -> Result<()> {
    if k == 0 {
        return Err(QuantizeError::invalid_argument("k", "must be at least 1"));
    }
    if grid.is_empty() {
        return Err(QuantizeError::invalid_argument(
            "grid",
            format!("{}x{} grid has no pixels", grid.width(), grid.height()),
        ));
    }
    if k > grid.len() {
        return Err(QuantizeError::invalid_argument(
            "k",
            format!("{k} clusters requested for {} pixels", grid.len()),
        ));
    }
    Ok(())
}

/// Uniform positions, with replacement: duplicate centroids are allowed.
fn sample_centroids<R: Rng + ?Sized>(grid: &PixelGrid, k: usize, rng: &mut R) -> Vec<Color> {
    (0..k)
        .map(|_| {
            let x = rng.random_range(0..grid.width());
            let y = rng.random_range(0..grid.height());
            grid.pixels()[y as usize * grid.width() as usize + x as usize]
        })
        .collect()
}

fn refine(
    grid: &PixelGrid,
    initial: Vec<Color>,
    iterations: usize,
    tolerance: Option<u32>,
) -> Clustering {
    let mut clusters: Vec<Cluster> = initial.into_iter().map(Cluster::new).collect();
    let mut centroids: Vec<Color> = clusters.iter().map(|c| c.centroid).collect();
    let mut assignments = vec![0usize; grid.len()];
    let mut ran = 0;

    for iteration in 0..iterations {
        assign(grid, &centroids, &mut assignments);
        let max_shift = update(grid, &assignments, &mut clusters);
        centroids.clear();
        centroids.extend(clusters.iter().map(|c| c.centroid));
        ran += 1;

        let empty = clusters.iter().filter(|c| c.acc.count == 0).count();
        debug!(iteration, max_shift, empty, "k-means iteration");

        if tolerance.is_some_and(|t| max_shift <= t) {
            debug!(iteration, "centroids settled, stopping early");
            break;
        }
    }

    assign(grid, &centroids, &mut assignments);

    let mut populations = vec![0usize; centroids.len()];
    let mut quantized = Vec::with_capacity(grid.len());
    for &owner in &assignments {
        populations[owner] += 1;
        quantized.push(centroids[owner]);
    }

    info!(
        k = centroids.len(),
        iterations = ran,
        pixels = grid.len(),
        "clustering finished"
    );

    Clustering {
        quantized: grid.with_pixels(quantized),
        centroids,
        populations,
        iterations: ran,
    }
}

/// Assignment phase: one row per work unit, centroids read-only.
fn assign(grid: &PixelGrid, centroids: &[Color], assignments: &mut [usize]) {
    let width = grid.width() as usize;
    assignments
        .par_chunks_mut(width)
        .zip(grid.pixels().par_chunks(width))
        .for_each(|(out, row)| {
            for (slot, pixel) in out.iter_mut().zip(row) {
                *slot = nearest_centroid(pixel, centroids);
            }
        });
}

/// Update phase: pixels are folded into per-worker accumulators indexed by
/// owner, the partial sums are reduced, then each cluster is recentered by a
/// single worker. Returns the largest squared centroid shift.
fn update(grid: &PixelGrid, assignments: &[usize], clusters: &mut [Cluster]) -> u32 {
    let k = clusters.len();
    let totals = grid
        .pixels()
        .par_iter()
        .zip(assignments.par_iter())
        .fold(
            || vec![Accumulator::default(); k],
            |mut partial, (pixel, &owner)| {
                partial[owner].absorb(pixel);
                partial
            },
        )
        .reduce(
            || vec![Accumulator::default(); k],
            |mut merged, partial| {
                for (m, p) in merged.iter_mut().zip(&partial) {
                    m.merge(p);
                }
                merged
            },
        );

    clusters
        .par_iter_mut()
        .zip(totals)
        .map(|(cluster, acc)| {
            cluster.acc = acc;
            cluster.recenter()
        })
        .max()
        .unwrap_or(0)
}
