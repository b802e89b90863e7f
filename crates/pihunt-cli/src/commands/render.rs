//! Render command: what π's digits look like at a given position.

use std::path::Path;

use anyhow::{Context, Result};
use pihunt_core::{TargetImage, decode_pairs, fetch_digits, render_window};

/// Fetch one window's worth of digits at the 1-indexed fractional
/// position `start` and write them as a palette-indexed image, with the
/// palette fitted so it resembles the reference image as closely as the
/// bytes allow.
pub fn run(image: &Path, start: u64, output: &Path) -> Result<()> {
    let reference =
        TargetImage::open(image).with_context(|| format!("failed to open {}", image.display()))?;
    let digits = fetch_digits(start, reference.num_pixels() * 2)?;
    let bytes = decode_pairs(digits.as_bytes())?;

    let rendered = render_window(&reference, bytes);
    rendered.write(output)?;
    println!("Wrote {}", output.display());
    Ok(())
}
