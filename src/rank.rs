//! Frequency ranking of the colors in a (quantized) grid.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::grid::PixelGrid;

/// One ranked color and its share of the image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorDetail {
    #[serde(skip)]
    pub color: Color,
    pub rgba: String,
    pub hex: String,
    /// Percent of all pixels, rounded to two decimals.
    pub percentage: f64,
}

impl ColorDetail {
    fn new(color: Color, count: usize, total: usize) -> Self {
        Self {
            color,
            rgba: color.to_rgba_string(),
            hex: color.to_hex(),
            percentage: percentage(count, total),
        }
    }
}

/// `count / total` as a percentage rounded half away from zero to two
/// decimals. Multiplies before dividing so that exact shares such as
/// 1/800 stay exact (0.125 -> 0.13).
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 * 100.0 / total as f64;
    (raw * 100.0).round() / 100.0
}

/// Count every distinct color, ordered by descending count. Equal counts
/// keep the order in which the colors first appear (row-major).
pub fn tally(grid: &PixelGrid) -> Vec<(Color, usize)> {
    let counts = grid
        .pixels()
        .par_iter()
        .enumerate()
        .fold(HashMap::new, |mut counts: HashMap<Color, (usize, usize)>, (idx, color)| {
            let entry = counts.entry(*color).or_insert((0, idx));
            entry.0 += 1;
            counts
        })
        .reduce(HashMap::new, |mut merged, partial| {
            for (color, (count, first)) in partial {
                let entry = merged.entry(color).or_insert((0, first));
                entry.0 += count;
                entry.1 = entry.1.min(first);
            }
            merged
        });

    let mut sorted: Vec<(Color, usize, usize)> = counts
        .into_iter()
        .map(|(color, (count, first))| (color, count, first))
        .collect();
    sorted.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    sorted.into_iter().map(|(color, count, _)| (color, count)).collect()
}

/// The `top_n` most frequent colors of `grid`. `top_n == 0`, or a value past
/// the number of distinct colors, returns every color. An empty grid yields
/// an empty list.
pub fn rank(grid: &PixelGrid, top_n: usize) -> Vec<ColorDetail> {
    let total = grid.len();
    let mut ranked = tally(grid);
    if top_n > 0 && top_n < ranked.len() {
        ranked.truncate(top_n);
    }
    ranked
        .into_iter()
        .map(|(color, count)| ColorDetail::new(color, count, total))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);
    const TEAL: Color = Color::rgb(0, 127, 127);

    #[test]
    fn halves_are_reported_in_first_seen_order() {
        let grid = PixelGrid::new(2, 2, vec![RED, RED, TEAL, TEAL]).unwrap();
        let ranked = rank(&grid, 2);
        let summary: Vec<(&str, f64)> =
            ranked.iter().map(|d| (d.hex.as_str(), d.percentage)).collect();
        assert_eq!(summary, vec![("#ff0000", 50.0), ("#007f7f", 50.0)]);
        assert_eq!(ranked[0].color, RED);
        assert_eq!(ranked[1].rgba, "rgba(0, 127, 127, 255)");
    }

    #[test]
    fn tie_order_follows_first_occurrence() {
        let grid = PixelGrid::new(4, 1, vec![TEAL, RED, RED, TEAL]).unwrap();
        let ranked = rank(&grid, 0);
        assert_eq!(ranked[0].color, TEAL);
        assert_eq!(ranked[1].color, RED);
    }

    #[test]
    fn most_frequent_first() {
        let blue = Color::rgb(0, 0, 255);
        let grid = PixelGrid::new(6, 1, vec![blue, RED, RED, TEAL, RED, TEAL]).unwrap();
        let counts = tally(&grid);
        assert_eq!(counts, vec![(RED, 3), (TEAL, 2), (blue, 1)]);
    }

    #[test]
    fn top_n_zero_or_too_large_returns_everything() {
        let grid = PixelGrid::new(3, 1, vec![RED, TEAL, Color::rgb(1, 1, 1)]).unwrap();
        assert_eq!(rank(&grid, 0).len(), 3);
        assert_eq!(rank(&grid, 10).len(), 3);
        assert_eq!(rank(&grid, 2).len(), 2);
    }

    #[test]
    fn empty_grid_yields_nothing() {
        let grid = PixelGrid::new(0, 0, Vec::new()).unwrap();
        assert!(rank(&grid, 0).is_empty());
        assert!(rank(&grid, 5).is_empty());
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(percentage(1, 800), 0.13);
        assert_eq!(percentage(799, 800), 99.88);
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(0, 0), 0.0);

        let mut pixels = vec![RED; 799];
        pixels.push(TEAL);
        let grid = PixelGrid::new(40, 20, pixels).unwrap();
        let ranked = rank(&grid, 0);
        assert_eq!(ranked[0].percentage, 99.88);
        assert_eq!(ranked[1].percentage, 0.13);
    }

    #[test]
    fn full_ranking_sums_to_one_hundred() {
        let grid = PixelGrid::from_fn(7, 3, |x, y| Color::rgb((x % 3) as u8, (y % 2) as u8, 0));
        let ranked = rank(&grid, 0);
        let sum: f64 = ranked.iter().map(|d| d.percentage).sum();
        assert!((sum - 100.0).abs() <= 0.01 * ranked.len() as f64);
    }

    #[test]
    fn alpha_distinguishes_colors() {
        let grid = PixelGrid::new(2, 1, vec![RED, RED.with_alpha(0)]).unwrap();
        assert_eq!(tally(&grid).len(), 2);
    }
}
