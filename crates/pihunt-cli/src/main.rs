use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod report;

#[derive(Parser)]
#[command(name = "pihunt")]
#[command(about = "Searches the hexadecimal digits of π for small images")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan π's digits for the closest match to an image
    Search {
        /// Image to hunt for (small, with few distinct colors)
        image: PathBuf,

        /// Take the N most common colors instead of merging color families
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(3..=6))]
        limit_colors: Option<u8>,

        /// Where the best-so-far image is written
        #[arg(long, default_value = "found.png")]
        checkpoint: PathBuf,
    },

    /// Check that a found image's bytes really are π at a digit position
    Verify {
        /// Hexadecimal digit to start with (1 = first after the decimal
        /// point, so a reported offset of N verifies at N+1)
        start: u64,

        /// Palette-indexed image as produced by search
        image: PathBuf,
    },

    /// Render what π's digits look like at a digit position
    Render {
        /// 1-indexed fractional digit position to start from
        start: u64,

        /// Reference image supplying dimensions and colors
        image: PathBuf,

        /// Where the rendered image is written
        #[arg(long, default_value = "rendered.png")]
        output: PathBuf,
    },

    /// Tile the digits around a found image into one large collage
    Haystack {
        /// Palette-indexed image as produced by search
        image: PathBuf,

        /// Where the collage is written
        #[arg(long, default_value = "haystack.png")]
        output: PathBuf,

        /// How many digits to search before giving up
        #[arg(long, default_value_t = pihunt_core::HAYSTACK_DIGITS)]
        max_digits: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("pihunt=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Search {
            image,
            limit_colors,
            checkpoint,
        } => commands::search::run(&image, limit_colors, &checkpoint),
        Command::Verify { start, image } => commands::verify::run(&image, start),
        Command::Render {
            start,
            image,
            output,
        } => commands::render::run(&image, start, &output),
        Command::Haystack {
            image,
            output,
            max_digits,
        } => commands::haystack::run(&image, &output, max_digits),
    }
}
