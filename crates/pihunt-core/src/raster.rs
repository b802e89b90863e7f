//! Image glue: loading the RGB target, and reading/writing the
//! palette-indexed images the search produces.
//!
//! Checkpoints are PNGs with an explicit 256-entry palette and 8-bit
//! indices. The pixel bytes ARE the π bytes, so encode and decode must
//! preserve indices exactly — no quantizing writer is allowed here.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::color::{self, ColorCensus, ColorMix, Rgb};
use crate::error::{Error, Result};
use crate::quantize::ColorFamily;
use crate::search::CheckpointSink;

/// The target image decoded to plain RGB, row-major.
#[derive(Debug, Clone)]
pub struct TargetImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl TargetImage {
    pub fn open(path: &Path) -> Result<Self> {
        let decoded = image::open(path)?.to_rgb8();
        let (width, height) = decoded.dimensions();
        let pixels = decoded
            .pixels()
            .map(|p| Rgb::new(p.0[0], p.0[1], p.0[2]))
            .collect();
        debug!("loaded {} as {}x{}", path.display(), width, height);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgb>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn num_pixels(&self) -> usize {
        self.pixels.len()
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn census(&self) -> ColorCensus {
        let mut census = ColorCensus::new();
        for &pixel in &self.pixels {
            census.tally(pixel);
        }
        census
    }
}

/// A palette-indexed raster: one byte per pixel plus an RGB palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: u32,
    height: u32,
    palette: Vec<Rgb>,
    data: Vec<u8>,
}

impl IndexedImage {
    pub fn new(width: u32, height: u32, palette: Vec<Rgb>, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width * height) as usize);
        Self {
            width,
            height,
            palette,
            data,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn num_pixels(&self) -> usize {
        self.data.len()
    }

    pub fn palette(&self) -> &[Rgb] {
        &self.palette
    }

    /// Pixel bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The pixel bytes as lowercase hex, the form they take in the digit
    /// stream.
    pub fn to_hex(&self) -> String {
        crate::source::hex_string(&self.data)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut encoder = png::Encoder::new(BufWriter::new(file), self.width, self.height);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        let mut flat = Vec::with_capacity(self.palette.len() * 3);
        for color in &self.palette {
            flat.extend_from_slice(&[color.r, color.g, color.b]);
        }
        encoder.set_palette(flat);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.data)?;
        writer.finish()?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mut decoder = png::Decoder::new(BufReader::new(file));
        // No expansion: the indices themselves are the payload.
        decoder.set_transformations(png::Transformations::IDENTITY);
        let mut reader = decoder.read_info()?;
        let info = reader.info();
        if info.color_type != png::ColorType::Indexed || info.bit_depth != png::BitDepth::Eight {
            return Err(Error::NotIndexed(path.display().to_string()));
        }
        let Some(palette_bytes) = info.palette.clone() else {
            return Err(Error::NotIndexed(path.display().to_string()));
        };
        let (width, height) = (info.width, info.height);
        let palette = palette_bytes
            .chunks_exact(3)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        let mut data = vec![0u8; reader.output_buffer_size()];
        let frame = reader.next_frame(&mut data)?;
        data.truncate(frame.buffer_size());
        Ok(Self {
            width,
            height,
            palette,
            data,
        })
    }
}

/// Checkpoint sink that rewrites one file in place on every improvement.
#[derive(Debug)]
pub struct CheckpointFile {
    path: PathBuf,
}

impl CheckpointFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CheckpointSink for CheckpointFile {
    fn write(&mut self, checkpoint: &IndexedImage) -> Result<()> {
        checkpoint.write(&self.path)
    }
}

/// Write a true-color copy of the target with every pixel replaced by its
/// nearest family color, so the user can see what will be searched for.
pub fn write_recolored(target: &TargetImage, families: &[ColorFamily], path: &Path) -> Result<()> {
    let palette: Vec<Rgb> = families.iter().map(|f| f.color).collect();
    let (width, height) = target.dimensions();
    let mut out = image::RgbImage::new(width, height);
    for (&pixel, slot) in target.pixels().iter().zip(out.pixels_mut()) {
        let family = palette[color::nearest(pixel, &palette)];
        *slot = image::Rgb([family.r, family.g, family.b]);
    }
    out.save(path)?;
    Ok(())
}

/// Build the palette-indexed rendition of `bytes` that looks as close to
/// `target` as a byte→color mapping allows: each byte value gets the
/// weighted average of the true colors it lands on.
pub fn render_window(target: &TargetImage, bytes: Vec<u8>) -> IndexedImage {
    debug_assert_eq!(bytes.len(), target.num_pixels());
    let mut mixes = vec![ColorMix::new(); 256];
    for (&byte, &pixel) in bytes.iter().zip(target.pixels()) {
        mixes[byte as usize].add(pixel, 1);
    }
    let palette = mixes.iter().map(|mix| mix.average()).collect();
    let (width, height) = target.dimensions();
    IndexedImage::new(width, height, palette, bytes)
}
