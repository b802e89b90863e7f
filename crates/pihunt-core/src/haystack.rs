//! Locates a needle image's bytes in the digit stream and tiles the
//! surrounding digits into one large indexed image.

use memchr::memmem;
use tracing::debug;

use crate::error::{Error, Result};
use crate::raster::IndexedImage;
use crate::source::{self, DigitSource};

/// Digits pulled from the source when no explicit cap is given.
pub const HAYSTACK_DIGITS: usize = 100_000_000;

#[derive(Debug)]
pub struct Haystack {
    /// Tiled image; the needle occupies exactly one tile.
    pub image: IndexedImage,
    /// Fractional digit position (0-based) where the needle begins.
    pub offset: usize,
    /// Tile grid as (columns, rows).
    pub grid: (usize, usize),
}

/// Search the stream for the needle's hex bytes and assemble a roughly
/// square collage of same-sized tiles cut from the digits around it.
///
/// The cut point is chosen so tile boundaries land on the needle's own
/// frame: the needle appears as one intact tile, every other tile shows
/// the digits that happen to surround it.
pub fn compose(
    needle: &IndexedImage,
    source: &mut dyn DigitSource,
    max_digits: usize,
) -> Result<Haystack> {
    let (width, height) = needle.dimensions();
    let numpix = needle.num_pixels();
    let numhex = numpix * 2;
    let needle_hex = needle.to_hex();

    let digits = collect_digits(source, max_digits)?;
    let index = memmem::find(&digits, needle_hex.as_bytes()).ok_or(Error::NeedleNotFound {
        searched: digits.len(),
    })?;
    debug!("needle found at digit {index} of {}", digits.len());

    let cut = index % numhex;
    let usable = (digits.len() - cut) / numhex * numhex;
    let bytes = source::decode_pairs(&digits[cut..cut + usable])?;
    let tiles: Vec<&[u8]> = bytes.chunks_exact(numpix).collect();

    let (cols, rows) = grid_for(bytes.len(), width as usize, height as usize, tiles.len());
    let width = width as usize;
    let height = height as usize;
    let mut data = Vec::with_capacity(cols * rows * numpix);
    for row in 0..rows {
        for line in 0..height {
            for col in 0..cols {
                let tile = tiles[cols * row + col];
                data.extend_from_slice(&tile[line * width..(line + 1) * width]);
            }
        }
    }

    let image = IndexedImage::new(
        (width * cols) as u32,
        (height * rows) as u32,
        needle.palette().to_vec(),
        data,
    );
    Ok(Haystack {
        image,
        offset: index,
        grid: (cols, rows),
    })
}

/// A grid close to square in pixels, never larger than the tile supply.
fn grid_for(num_bytes: usize, width: usize, height: usize, tiles: usize) -> (usize, usize) {
    let cols = ((num_bytes as f64).sqrt() / width as f64).round_ties_even() as usize;
    let cols = cols.clamp(1, tiles);
    let rows = ((num_bytes as f64 / (cols * width) as f64).round_ties_even() as usize) / height;
    let rows = rows.clamp(1, tiles / cols);
    (cols, rows)
}

fn collect_digits(source: &mut dyn DigitSource, max_digits: usize) -> Result<Vec<u8>> {
    let mut digits = Vec::new();
    while digits.len() < max_digits {
        let Some(batch) = source.next_batch()? else {
            break;
        };
        digits.extend_from_slice(&batch);
    }
    digits.truncate(max_digits);
    Ok(digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::source::MemorySource;

    fn needle() -> IndexedImage {
        let mut palette = vec![Rgb::BLACK; 256];
        palette[0xde] = Rgb::new(200, 0, 0);
        palette[0xad] = Rgb::new(0, 200, 0);
        palette[0xbe] = Rgb::new(0, 0, 200);
        palette[0xef] = Rgb::new(200, 200, 0);
        IndexedImage::new(2, 2, palette, vec![0xde, 0xad, 0xbe, 0xef])
    }

    #[test]
    fn test_haystack_tiles_align_with_the_needle() {
        let digits = format!("{}deadbeef{}", "0".repeat(13), "0".repeat(43));
        assert_eq!(digits.len(), 64);
        let mut source = MemorySource::new(&digits);
        let haystack = compose(&needle(), &mut source, 64).unwrap();

        assert_eq!(haystack.offset, 13);
        assert_eq!(haystack.grid, (3, 2));
        assert_eq!(haystack.image.dimensions(), (6, 4));
        // The needle lands intact in the middle tile of the first row.
        let data = haystack.image.data();
        assert_eq!(&data[0..6], &[0, 0, 0xde, 0xad, 0, 0]);
        assert_eq!(&data[6..12], &[0, 0, 0xbe, 0xef, 0, 0]);
        assert!(data[12..].iter().all(|&b| b == 0));
        // The needle's palette carries over unchanged.
        assert_eq!(haystack.image.palette()[0xde], Rgb::new(200, 0, 0));
        assert_eq!(haystack.image.palette()[0x00], Rgb::BLACK);
    }

    #[test]
    fn test_needle_at_the_head_claims_tile_zero() {
        let digits = format!("deadbeef{}", "0".repeat(24));
        let mut source = MemorySource::new(&digits);
        let haystack = compose(&needle(), &mut source, 32).unwrap();

        assert_eq!(haystack.offset, 0);
        assert_eq!(haystack.grid, (2, 2));
        let data = haystack.image.data();
        assert_eq!(&data[0..2], &[0xde, 0xad]);
        assert_eq!(&data[2..4], &[0, 0]);
    }

    #[test]
    fn test_missing_needle_reports_digits_searched() {
        let zeros = "0".repeat(40);
        let mut source = MemorySource::new(&zeros);
        let err = compose(&needle(), &mut source, 40).unwrap_err();

        assert!(matches!(err, Error::NeedleNotFound { searched: 40 }));
    }

    #[test]
    fn test_digit_cap_bounds_the_search() {
        // The needle sits past the cap, so it is never seen.
        let digits = format!("{}deadbeef", "0".repeat(20));
        let mut source = MemorySource::new(&digits);
        let err = compose(&needle(), &mut source, 16).unwrap_err();

        assert!(matches!(err, Error::NeedleNotFound { searched: 16 }));
    }
}
