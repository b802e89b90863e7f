//! # pihunt-core
//!
//! Core library for the pihunt image searcher.
//!
//! This crate provides:
//! - Color census, family clustering and pattern construction
//! - A byte-windowed scan over the fractional hexadecimal digits of π
//! - Contingency-table scoring with mismatch and muddle counts
//! - Digit sources (hex file, zip archive, pi.delivery API)
//! - Indexed-image checkpoints and haystack collages

pub mod color;
pub mod error;
pub mod haystack;
pub mod interrupt;
pub mod pattern;
pub mod quantize;
pub mod raster;
pub mod score;
pub mod search;
pub mod source;
pub mod window;

pub use color::{ColorCensus, ColorMix, Rgb};
pub use error::{Error, Result};
pub use haystack::{HAYSTACK_DIGITS, Haystack, compose};
pub use interrupt::InterruptGate;
pub use pattern::Pattern;
pub use quantize::{ColorFamily, MAX_FAMILIES, MIN_FAMILIES, limit_colors, quantize};
pub use raster::{CheckpointFile, IndexedImage, TargetImage, render_window, write_recolored};
pub use score::{JointHistogram, Score};
pub use search::{
    BestResult, BestTracker, CheckpointSink, PROGRESS_INTERVAL, SearchObserver, SearchOutcome,
    Searcher, Termination,
};
pub use source::{
    ApiSource, DigitSource, HEX_FILE, HexFileSource, ZIP_FILE, ZipDigitSource, decode_pairs,
    fetch_digits, hex_string, nibble_value,
};
