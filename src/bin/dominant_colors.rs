use anyhow::{Context, Result, bail};
use clap::Parser;
use dominant_colors_wasm::report::{is_quantized_output, save_quantized, write_html, write_json};
use dominant_colors_wasm::{ClusterConfig, ColorFormat, ImageReport, analyze_bytes};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, error, info, warn};

const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Find the dominant colors of images via k-means color quantization.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Image file or directory to analyse (directories are walked recursively)
    input: PathBuf,

    /// Number of prominent colors to report (0 = all)
    #[arg(short = 'n', long, default_value_t = 16)]
    num_colors: usize,

    /// Color value format for console output
    #[arg(short = 'f', long, value_enum, default_value_t = ColorFormat::Hex)]
    format: ColorFormat,

    /// Number of k-means clusters
    #[arg(short = 'k', long, default_value_t = 16)]
    clusters: usize,

    /// Number of k-means refinement passes
    #[arg(short, long, default_value_t = 10)]
    iterations: usize,

    /// Seed for centroid initialization (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop refining once no centroid moves more than this squared distance
    #[arg(long)]
    tolerance: Option<u32>,

    /// JSON report path
    #[arg(long, default_value = "output.json")]
    json: PathBuf,

    /// HTML report path
    #[arg(long, default_value = "output.html")]
    html: PathBuf,

    /// Log every k-means iteration
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = ClusterConfig {
        k: args.clusters,
        iterations: args.iterations,
        seed: args.seed,
        tolerance: args.tolerance,
    };

    let files = collect_images(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    if files.is_empty() {
        bail!("no PNG or JPEG images found under {}", args.input.display());
    }

    let mut reports = Vec::with_capacity(files.len());
    for path in &files {
        println!("Analysing file: {}...", path.display());
        match process_image(path, &config, args.num_colors) {
            Ok(report) => reports.push(report),
            Err(e) => error!(path = %path.display(), "skipping image: {e:#}"),
        }
    }

    for report in &reports {
        println!("{}", report.id);
        for line in report.lines(args.format) {
            println!("{line}");
        }
    }

    write_json(&args.json, &reports).context("writing JSON report")?;
    write_html(&args.html, &reports).context("writing HTML report")?;

    info!(images = reports.len(), failed = files.len() - reports.len(), "color analysis completed");
    Ok(())
}

fn process_image(path: &Path, config: &ClusterConfig, num_colors: usize) -> Result<ImageReport> {
    let bytes = fs::read(path)?;
    let analysis = analyze_bytes(&bytes, config, num_colors).context("quantization failed")?;
    let quantized = save_quantized(path, &analysis.quantized).context("saving quantized image")?;

    Ok(ImageReport {
        id: path.display().to_string(),
        quantized: quantized.display().to_string(),
        colors: analysis.colors,
    })
}

fn collect_images(input: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if input.is_dir() {
        walk(input, &mut files)?;
    } else if is_supported(input) {
        files.push(input.to_path_buf());
    } else {
        bail!("unsupported image file format: {}", input.display());
    }
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk(&path, files)?;
        } else if is_quantized_output(&path) {
            debug!(path = %path.display(), "skipping earlier output");
        } else if is_supported(&path) {
            files.push(path);
        } else {
            warn!(path = %path.display(), "unsupported image file format");
        }
    }
    Ok(())
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_png_and_jpeg_are_supported() {
        assert!(is_supported(Path::new("a/photo.PNG")));
        assert!(is_supported(Path::new("photo.jpeg")));
        assert!(is_supported(Path::new("photo.Jpg")));
        assert!(!is_supported(Path::new("photo.gif")));
        assert!(!is_supported(Path::new("photo")));
    }

    #[test]
    fn single_unsupported_file_is_rejected() {
        let err = collect_images(Path::new("does/not/matter.bmp")).unwrap_err();
        assert!(err.to_string().contains("unsupported image file format"));

        let files = collect_images(Path::new("photo.png")).unwrap();
        assert_eq!(files, vec![PathBuf::from("photo.png")]);
    }
}
