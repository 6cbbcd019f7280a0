use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use webp_convert::config::{ConversionConfig, NamingScheme, ResizeFilter};
use webp_convert::pipeline;

#[derive(Parser, Debug)]
#[command(
    name = "webp-convert",
    version,
    about = "Convert .jpg and .png files to .webp, fixing EXIF rotation and optionally resizing"
)]
struct Cli {
    /// The input directory path
    #[arg(short, long, value_name = "DIR")]
    input: PathBuf,

    /// The output directory path (created if missing)
    #[arg(short, long, value_name = "DIR")]
    output: PathBuf,

    /// The quality of the output image, 0-100
    #[arg(short, long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(0..=100))]
    quality: u8,

    /// Resize to this width, keeping the aspect ratio (0 disables resizing)
    #[arg(short, long, value_name = "PX", default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=16383))]
    width: u32,

    /// Name outputs `{name}.webp` instead of `{name}_q{quality}_{width}x{height}.webp`
    #[arg(long)]
    plain_names: bool,

    /// Resampling filter: nearest, triangle, catmull-rom, gaussian, lanczos3
    #[arg(long, value_name = "NAME", default_value = "catmull-rom")]
    filter: ResizeFilter,

    /// Convert in memory and report, without writing any files
    #[arg(long)]
    dry_run: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let config = ConversionConfig {
        naming: if cli.plain_names {
            NamingScheme::Plain
        } else {
            NamingScheme::Tagged
        },
        filter: cli.filter,
        dry_run: cli.dry_run,
        ..ConversionConfig::new(cli.quality, cli.width)?
    };

    if config.dry_run {
        log::info!("DRY RUN — no files will be written");
    }
    if config.resizes() {
        log::info!("Resizing to {}px wide ({})", config.target_width, config.filter);
    }

    let results = pipeline::convert_dir(&cli.input, &cli.output, &config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    let bytes: usize = results.iter().map(|r| r.bytes).sum();
    log::info!(
        "Done: {} image(s) converted to {} ({} bytes)",
        results.len(),
        cli.output.display(),
        bytes
    );

    Ok(())
}
