//! gaussblur - Gaussian blur for binary PPM images.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use gaussblur::{blur_with, ppm, BlurParams, BoundaryPolicy};
use log::info;
use serde::Serialize;

/// Blur a binary PPM (P6) image with a separable Gaussian kernel.
#[derive(Parser, Debug)]
#[command(name = "gaussblur")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXIT CODES:
    0 - Success
    1 - Failed to read, blur or write the image
    2 - Usage error")]
struct Cli {
    /// Kernel radius (0 leaves the image unchanged, at most 1000)
    #[arg(value_name = "RADIUS", allow_negative_numbers = true)]
    radius: i64,

    /// Input PPM file
    #[arg(value_name = "INFILE")]
    input: PathBuf,

    /// Output PPM file
    #[arg(value_name = "OUTFILE")]
    output: PathBuf,

    /// Worker threads per pass
    #[arg(value_name = "THREADS", allow_negative_numbers = true)]
    threads: i64,

    /// How taps beyond the image border are treated: skip or clamp
    #[arg(long, default_value = "skip")]
    boundary: BoundaryPolicy,

    /// Print a JSON summary of the run to stdout
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    input: &'a str,
    output: &'a str,
    width: usize,
    height: usize,
    params: BlurParams,
    elapsed_ms: f64,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("gaussblur: {message}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let params = BlurParams::new()
        .with_radius(cli.radius)
        .with_threads(cli.threads)
        .with_boundary(cli.boundary);

    let image = ppm::read(&cli.input).map_err(|e| format!("reading: {e}"))?;
    let (width, height) = (image.width(), image.height());

    let start = Instant::now();
    let blurred = blur_with(image, &params).map_err(|e| e.to_string())?;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!("blurred {width}x{height} in {elapsed_ms:.3} ms");

    ppm::write(&blurred, &cli.output).map_err(|e| format!("writing: {e}"))?;

    if cli.json {
        let (input, output) = (cli.input.to_string_lossy(), cli.output.to_string_lossy());
        let report = Report {
            input: &input,
            output: &output,
            width,
            height,
            params,
            elapsed_ms,
        };
        let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{json}");
    }
    Ok(())
}
