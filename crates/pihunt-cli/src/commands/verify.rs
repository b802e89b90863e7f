//! Verify command: check a found image's bytes against π's digits.

use std::path::Path;

use anyhow::{Context, Result};
use pihunt_core::{IndexedImage, fetch_digits};

/// Fetch the digit range starting at the 1-indexed fractional position
/// `start` and compare it to the image's pixel bytes. Both hex strings are
/// printed so a mismatch can be eyeballed.
pub fn run(image: &Path, start: u64) -> Result<()> {
    let found = IndexedImage::read(image)
        .with_context(|| format!("failed to read {}", image.display()))?;
    let pixdata = found.to_hex();
    let digits = fetch_digits(start, pixdata.len())?;

    println!("{pixdata}");
    println!("{digits}");
    if pixdata == digits {
        println!("Verified: the image is π starting at digit {start}.");
    } else {
        println!("Mismatch: the image is not π starting at digit {start}.");
    }
    Ok(())
}
