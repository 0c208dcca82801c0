use criterion::{Criterion, black_box, criterion_group, criterion_main};
use dominant_colors_wasm::{Color, ClusterConfig, PixelGrid, cluster, rank};

fn noise(width: u32, height: u32) -> PixelGrid {
    PixelGrid::from_fn(width, height, |x, y| {
        let v = x.wrapping_mul(2_654_435_761).wrapping_add(y.wrapping_mul(40_503));
        Color::rgb(v as u8, (v >> 8) as u8, (v >> 16) as u8)
    })
}

fn benchmark_quantize(c: &mut Criterion) {
    let grid = noise(256, 256);
    let config = ClusterConfig::default().with_seed(0);

    c.bench_function("cluster_256x256_k16", |b| {
        b.iter(|| cluster(black_box(&grid), black_box(&config)))
    });

    let quantized = cluster(&grid, &config).expect("valid input").quantized;
    c.bench_function("rank_256x256", |b| b.iter(|| rank(black_box(&quantized), 16)));
}

criterion_group!(benches, benchmark_quantize);
criterion_main!(benches);
