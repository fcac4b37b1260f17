use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chroma_quant::{QuantizedImage, Quantizer, QuantizerOptions};
use palettize::codec;

/// Reduce an opaque PNG to a learned colour palette with perceptual
/// error-diffusion dithering.
///
/// The palette is learned online from a sampled fraction of the pixels;
/// up to 256 colours the result is written as an indexed PNG, beyond
/// that as truecolour.
#[derive(Parser, Debug)]
#[command(name = "palettize", version)]
struct Cli {
    /// Maximum number of palette colours (1-256 writes an indexed PNG,
    /// larger values stay truecolour)
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    max_colors: u32,

    /// Percentage of the image to learn from (0-100)
    #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
    learning_portion: u8,

    /// Difference threshold percentage: how far apart two colours must
    /// be to count as unique (1-100)
    #[arg(value_parser = percent_value)]
    difference_threshold: f64,

    /// Sameness threshold percentage: how close two palette colours must
    /// be to be merged when capacity runs out (1-100)
    #[arg(value_parser = percent_value)]
    sameness_threshold: f64,

    /// Colour learning rate (0 < rate <= 1)
    #[arg(value_parser = rate_value)]
    learning_rate: f64,

    /// Path to the input PNG
    input: PathBuf,

    /// Path to the output PNG
    output: PathBuf,

    /// Fix the sampling shuffle seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn percent_value(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if (1.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("`{s}` is not in the range 1 to 100"))
    }
}

fn rate_value(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(format!("`{s}` is not in the range (0, 1]"))
    }
}

fn main() {
    // Malformed invocations are answered with the usage text and a clean
    // exit; only processing failures use the error path.
    let cli = Cli::try_parse().unwrap_or_else(|err| {
        let _ = err.print();
        std::process::exit(0);
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palettize=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let (pixels, width, height) = codec::read_rgb(&cli.input)?;
    tracing::info!(width, height, "image decoded");

    let options = QuantizerOptions {
        max_colors: cli.max_colors as usize,
        learning_portion: cli.learning_portion,
        difference_threshold: cli.difference_threshold,
        sameness_threshold: cli.sameness_threshold,
        learning_rate: cli.learning_rate,
        seed: cli.seed,
    };

    let mut quantizer = Quantizer::new(options);
    let started = Instant::now();
    let samples = quantizer.train(&pixels);
    tracing::info!(
        samples,
        colours = quantizer.palette_len(),
        elapsed = ?started.elapsed(),
        "palette learned"
    );

    let started = Instant::now();
    let result = quantizer.render(&pixels, width, height)?;
    tracing::info!(elapsed = ?started.elapsed(), "dithering done");

    match result {
        QuantizedImage::TrueColor {
            pixels,
            width,
            height,
        } => {
            tracing::info!("writing truecolour output");
            codec::write_rgb(&cli.output, &pixels, width, height)?;
        }
        QuantizedImage::Indexed {
            indices,
            palette,
            width,
            height,
        } => {
            tracing::info!(palette = palette.len(), "writing indexed output");
            codec::write_indexed(&cli.output, &indices, &palette, width, height)?;
        }
    }
    Ok(())
}
