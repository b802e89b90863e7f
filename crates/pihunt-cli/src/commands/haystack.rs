//! Haystack command: tile the digits surrounding a found image.

use std::path::Path;

use anyhow::{Context, Result, bail};
use pihunt_core::{
    DigitSource, HEX_FILE, HexFileSource, IndexedImage, ZIP_FILE, ZipDigitSource, compose,
};
use tracing::info;

use crate::report;

/// Find the image's bytes in the local digit file and write a collage of
/// the surrounding digit windows, with the needle aligned on its own tile.
pub fn run(image: &Path, output: &Path, max_digits: usize) -> Result<()> {
    let needle = IndexedImage::read(image)
        .with_context(|| format!("failed to read {}", image.display()))?;

    let mut source = open_local_source()?;
    let haystack = compose(&needle, source.as_mut(), max_digits)?;
    haystack.image.write(output)?;

    let (cols, rows) = haystack.grid;
    println!(
        "Found the image at the {} fractional digit of π.",
        report::ordinal(haystack.offset as i64 + 1)
    );
    println!("Wrote a {cols}x{rows} tile collage to {}.", output.display());
    Ok(())
}

/// The collage wants on the order of 10^8 digits, so only the local file
/// sources are supported here.
fn open_local_source() -> Result<Box<dyn DigitSource>> {
    if Path::new(HEX_FILE).exists() {
        info!("reading digits from {HEX_FILE}");
        return Ok(Box::new(HexFileSource::open(Path::new(HEX_FILE))?));
    }
    if Path::new(ZIP_FILE).exists() {
        info!("reading digits from {ZIP_FILE}");
        return Ok(Box::new(ZipDigitSource::open(Path::new(ZIP_FILE))?));
    }
    bail!("either {HEX_FILE} or {ZIP_FILE} must be present in the working directory");
}
