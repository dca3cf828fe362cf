use clap::Parser;
use image2ico::{AlphaMode, EncodeOptions, FrameSpec, IconEncoder};
use std::fs;
use std::path::PathBuf;
use std::process;

//===========================================================================//

/// Converts an image file (PNG, BMP, ...) into an ICO file.
#[derive(Parser)]
#[command(name = "image2ico", version)]
struct Cli {
    /// The image file to convert
    source: PathBuf,

    /// Sets output path
    #[arg(short, long, value_name = "PATH", default_value = "out.ico")]
    output: PathBuf,

    /// Adds a frame size, as WIDTHxHEIGHT or SIZE (may be repeated;
    /// defaults to 16, 24, 32, 48 and 256)
    #[arg(short, long = "size", value_name = "SIZE")]
    sizes: Vec<FrameSpec>,

    /// Makes every frame fully opaque
    #[arg(long)]
    remove_alpha: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(error) = run(&cli) {
        eprintln!("Error: {}", error);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), image2ico::Error> {
    let mut options = EncodeOptions::default();
    if !cli.sizes.is_empty() {
        options = options.with_sizes(cli.sizes.iter().cloned());
    }
    if cli.remove_alpha {
        options = options.with_alpha(AlphaMode::Remove);
    }
    let source = image2ico::open(&cli.source)?;
    let data = IconEncoder::new(options).encode(&source)?;
    fs::write(&cli.output, &data)?;
    println!("Created {} ({} bytes)", cli.output.display(), data.len());
    Ok(())
}

//===========================================================================//
