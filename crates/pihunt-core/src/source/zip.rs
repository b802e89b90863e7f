use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::source::{DigitSource, HEX_FILE, HexFileSource};

/// Streams digits out of the zipped billion-digit download.
///
/// The archive must contain exactly one entry, the conventional hex file.
/// It is decompressed once into an unlinked temp file and then read like
/// a plain digit file, so the scan never seeks inside compressed data.
#[derive(Debug)]
pub struct ZipDigitSource {
    inner: HexFileSource,
}

impl ZipDigitSource {
    pub fn open(path: &Path) -> Result<Self> {
        let mut archive = ZipArchive::new(File::open(path)?)?;
        if archive.len() != 1 {
            return Err(Error::SourceFormat(format!(
                "{}: expected exactly one entry named {}, found {} entries",
                path.display(),
                HEX_FILE,
                archive.len()
            )));
        }
        let mut entry = archive.by_index(0)?;
        if entry.name() != HEX_FILE {
            return Err(Error::SourceFormat(format!(
                "{}: expected the single entry to be named {}, found {:?}",
                path.display(),
                HEX_FILE,
                entry.name()
            )));
        }
        debug!(
            "decompressing {} ({} bytes) from {}",
            entry.name(),
            entry.size(),
            path.display()
        );
        let mut spill = tempfile::tempfile()?;
        std::io::copy(&mut entry, &mut spill)?;
        spill.seek(SeekFrom::Start(0))?;
        Ok(Self {
            inner: HexFileSource::from_file(spill)?,
        })
    }
}

impl DigitSource for ZipDigitSource {
    fn next_batch(&mut self) -> Result<Option<Vec<u8>>> {
        self.inner.next_batch()
    }
}
