//! End-to-end checks of clustering followed by ranking.

use std::collections::HashSet;

use dominant_colors_wasm::{
    Color, ClusterConfig, PixelGrid, QuantizeError, cluster, cluster_from_centroids, rank,
};

const RED: Color = Color::rgb(255, 0, 0);
const GREEN: Color = Color::rgb(0, 255, 0);
const BLUE: Color = Color::rgb(0, 0, 255);

fn gradient(width: u32, height: u32) -> PixelGrid {
    PixelGrid::from_fn(width, height, |x, y| {
        Color::rgb((x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, ((x + y) % 256) as u8)
    })
}

#[test]
fn red_green_blue_scenario() {
    let grid = PixelGrid::new(2, 2, vec![RED, RED, GREEN, BLUE]).unwrap();
    let clustering = cluster_from_centroids(&grid, &[GREEN, RED], 1).unwrap();
    assert_eq!(clustering.centroids, vec![Color::rgb(0, 127, 127), RED]);

    let ranked = rank(&clustering.quantized, 2);
    let summary: Vec<(String, f64)> = ranked.into_iter().map(|d| (d.hex, d.percentage)).collect();
    assert_eq!(
        summary,
        vec![("#ff0000".to_string(), 50.0), ("#007f7f".to_string(), 50.0)]
    );
}

#[test]
fn same_seed_same_output() {
    let grid = gradient(40, 30);
    let config = ClusterConfig::new(8, 10).with_seed(1234);
    let first = cluster(&grid, &config).unwrap();
    let second = cluster(&grid, &config).unwrap();
    assert_eq!(first.quantized, second.quantized);
    assert_eq!(first.centroids, second.centroids);
    assert_eq!(rank(&first.quantized, 0), rank(&second.quantized, 0));
}

#[test]
fn quantized_ranking_is_bounded_and_complete() {
    let grid = gradient(50, 20);
    for k in [1, 3, 16] {
        let clustering = cluster(&grid, &ClusterConfig::new(k, 10).with_seed(k as u64)).unwrap();
        let distinct: HashSet<Color> = clustering.quantized.pixels().iter().copied().collect();
        assert!(distinct.len() <= k);
        assert_eq!(clustering.populations.iter().sum::<usize>(), grid.len());

        let ranked = rank(&clustering.quantized, 0);
        assert_eq!(ranked.len(), distinct.len());
        let sum: f64 = ranked.iter().map(|d| d.percentage).sum();
        assert!((sum - 100.0).abs() <= 0.01 * ranked.len() as f64);
    }
}

#[test]
fn single_color_image_collapses_to_one_entry() {
    let grid = PixelGrid::filled(10, 10, BLUE);
    let clustering = cluster(&grid, &ClusterConfig::new(4, 10).with_seed(3)).unwrap();
    assert!(clustering.centroids.iter().all(|c| *c == BLUE));

    let ranked = rank(&clustering.quantized, 5);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].hex, "#0000ff");
    assert_eq!(ranked[0].percentage, 100.0);
}

#[test]
fn empty_inputs() {
    let empty = PixelGrid::new(0, 0, Vec::new()).unwrap();
    let err = cluster(&empty, &ClusterConfig::new(1, 10)).unwrap_err();
    assert!(matches!(err, QuantizeError::InvalidArgument { .. }));
    assert!(rank(&empty, 0).is_empty());

    let grid = PixelGrid::new(3, 1, vec![RED, GREEN, BLUE]).unwrap();
    assert_eq!(rank(&grid, 0).len(), 3);
}
