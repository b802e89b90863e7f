//! Search command: scan the fractional hex digits of π for an image.

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use pihunt_core::{
    ApiSource, CheckpointFile, ColorCensus, ColorFamily, DigitSource, HEX_FILE, HexFileSource,
    InterruptGate, MAX_FAMILIES, Pattern, Searcher, TargetImage, Termination, ZIP_FILE,
    ZipDigitSource, limit_colors, quantize, write_recolored,
};
use tracing::{info, warn};

use crate::report::{self, ConsoleObserver};

pub fn run(image: &Path, limit: Option<u8>, checkpoint: &Path) -> Result<()> {
    let target =
        TargetImage::open(image).with_context(|| format!("failed to open {}", image.display()))?;
    let (width, height) = target.dimensions();
    let census = target.census();
    info!(
        "{} is {width}x{height} with {} distinct colors",
        image.display(),
        census.distinct()
    );

    let families = pick_families(&census, limit)?;
    if census.distinct() > families.len() {
        // Show what will actually be hunted for.
        let preview = preview_path(checkpoint);
        write_recolored(&target, &families, &preview)?;
        println!("Saving color-limited preview as {}", preview.display());
    }

    println!("Selected {} colors for the pattern.", families.len());
    let pattern = Pattern::build(target.pixels(), width, height, &families);
    print_family_summary(&pattern, &families);
    println!("Pattern of colors to try to match:");
    for row in pattern.rows() {
        let line: String = row.iter().map(|&i| char::from(b'0' + i)).collect();
        println!("{line}");
    }

    let mut source = open_source()?;
    let gate = Arc::new(InterruptGate::new());
    register_signals(Arc::clone(&gate))?;

    let mut sink = CheckpointFile::new(checkpoint);
    let mut observer = ConsoleObserver::default();
    println!("{}", report::HEADLINE);
    let outcome =
        Searcher::new(&pattern, &families).run(source.as_mut(), &mut sink, &mut observer, &gate)?;
    println!();

    match &outcome.best {
        Some(best) => {
            match outcome.termination {
                Termination::ExactMatch => println!("Success at {}", best.offset),
                Termination::StreamExhausted => println!(
                    "Digit stream exhausted after {} digits.",
                    report::group_digits(outcome.nibbles as i64)
                ),
                Termination::Interrupted => println!(
                    "Interrupted after {} digits.",
                    report::group_digits(outcome.nibbles as i64)
                ),
            }
            println!("Best result is saved as {}.", checkpoint.display());
            println!("{}", report::citation(best.offset, pattern.len()));
        }
        None => println!(
            "No full window was scored in {} digits; nothing to report.",
            report::group_digits(outcome.nibbles as i64)
        ),
    }
    Ok(())
}

/// Resolve the families to hunt for: few-color images keep every color,
/// `--limit-colors` takes the most common N, anything else goes through
/// the family reduction.
fn pick_families(census: &ColorCensus, limit: Option<u8>) -> Result<Vec<ColorFamily>> {
    if census.distinct() <= MAX_FAMILIES {
        if limit.is_some() {
            warn!(
                "image already has {} distinct colors, ignoring --limit-colors",
                census.distinct()
            );
        }
        return Ok(quantize(census)?);
    }
    match limit {
        Some(n) => Ok(limit_colors(census, n as usize)?),
        None => Ok(quantize(census)?),
    }
}

/// Per-family pixel counts, most used first.
fn print_family_summary(pattern: &Pattern, families: &[ColorFamily]) {
    let usage = pattern.family_usage(families.len());
    let mut order: Vec<usize> = (0..families.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(usage[i]));
    for (rank, &i) in order.iter().filter(|&&i| usage[i] > 0).enumerate() {
        println!("{:2}. {}, {:3}", rank + 1, families[i].color, usage[i]);
    }
}

/// The recolored preview lands next to the checkpoint, so both artifacts
/// of a run end up in the same directory.
fn preview_path(checkpoint: &Path) -> PathBuf {
    checkpoint.with_file_name("newtarget.png")
}

/// Local digit file if present, then the zip archive, then the remote API.
fn open_source() -> Result<Box<dyn DigitSource>> {
    if Path::new(HEX_FILE).exists() {
        info!("reading digits from {HEX_FILE}");
        return Ok(Box::new(HexFileSource::open(Path::new(HEX_FILE))?));
    }
    if Path::new(ZIP_FILE).exists() {
        info!("reading digits from {ZIP_FILE}");
        return Ok(Box::new(ZipDigitSource::open(Path::new(ZIP_FILE))?));
    }
    info!("no local digit file found, streaming from the pi.delivery API");
    Ok(Box::new(ApiSource::new()))
}

/// First Ctrl-C or termination signal trips the gate and lets the loop
/// finish its step; a second signal kills the process outright.
fn register_signals(gate: Arc<InterruptGate>) -> Result<()> {
    ctrlc::set_handler(move || {
        if gate.trip() {
            eprintln!("\nKilled.");
            process::exit(130);
        }
        eprintln!("\nStopping after the current step; a second signal kills.");
    })?;
    Ok(())
}
