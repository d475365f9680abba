use clap::{Parser, Subcommand};
use image_resizer::config::{self, DEFAULT_CONFIG_FILE};
use image_resizer::imaging::{CropMode, CropRatio, ResizeOptions, Resizer};
use image_resizer::output;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Options that override the configured resize defaults for one call.
#[derive(clap::Args, Clone)]
struct ResizeArgs {
    /// Image file to resize
    path: PathBuf,

    /// Where to write the result (default: overwrite the source)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum output width in pixels (0 = unconstrained)
    #[arg(long)]
    max_width: Option<u32>,

    /// Maximum output height in pixels (0 = unconstrained)
    #[arg(long)]
    max_height: Option<u32>,

    /// Output quality, 0-100
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=100))]
    quality: Option<u32>,

    /// Center-crop to an aspect ratio first, e.g. 4:3
    #[arg(long, value_name = "W:H", conflicts_with = "crop_zoom")]
    crop_ratio: Option<CropRatio>,

    /// Crop to the bounding box ratio so the output fills it
    #[arg(long)]
    crop_zoom: bool,

    /// Re-encode images even if they already fit
    #[arg(long)]
    keep_small: bool,

    /// Delete the source after writing the output elsewhere
    #[arg(long)]
    delete_source: bool,

    /// Largest decoded pixel buffer allowed, in bytes
    #[arg(long)]
    max_decode_bytes: Option<u64>,
}

impl ResizeArgs {
    fn to_options(&self) -> ResizeOptions {
        let crop = match (self.crop_ratio, self.crop_zoom) {
            (Some(ratio), _) => Some(CropMode::Ratio(ratio)),
            (None, true) => Some(CropMode::Zoom),
            (None, false) => None,
        };
        ResizeOptions {
            max_width: self.max_width,
            max_height: self.max_height,
            quality: self.quality,
            crop,
            ignore_small_images: self.keep_small.then_some(false),
            delete_source: self.delete_source.then_some(true),
            output: self.output.clone(),
            max_decode_bytes: self.max_decode_bytes,
        }
    }
}

#[derive(Parser)]
#[command(name = "image-resizer")]
#[command(about = "Fit, crop and sharpen images within maximum bounds")]
#[command(long_about = "\
Fit, crop and sharpen images within maximum bounds

Images are scaled to fit inside --max-width x --max-height while keeping
their aspect ratio. Images that already fit are copied unchanged unless
--keep-small is given.

Format handling:
  JPEG (and other formats)  re-encoded as JPEG at --quality, sharpened
  PNG                       re-encoded as PNG, compression round(10 - quality/10)
  GIF                       converted to PNG, same compression mapping

Defaults come from image-resizer.toml; run 'image-resizer gen-config' to
print a documented one.")]
#[command(version)]
struct Cli {
    /// Config file with resize defaults
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Log resize decisions (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize one image
    Resize(ResizeArgs),
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Resize(args) => {
            let resizer_config = config::load_config(&cli.config)?;
            let resizer = Resizer::new(resizer_config);
            let outcome = resizer.resize_image(&args.path, &args.to_options())?;
            output::print_outcome(&args.path, &outcome);
            if !outcome.succeeded() {
                std::process::exit(1);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the global subscriber; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
