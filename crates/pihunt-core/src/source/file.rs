use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::source::DigitSource;

/// Digits per batch. The billion-digit file comes back in ~100 pulls.
const FILE_BATCH: usize = 10_000_000;

/// Streams a local hex-digit file laid out like `pi_hex_1b.txt`: the two
/// bytes "3." followed by the fractional digits.
#[derive(Debug)]
pub struct HexFileSource {
    file: File,
}

impl HexFileSource {
    pub fn open(path: &Path) -> Result<Self> {
        debug!("reading digits from {}", path.display());
        Self::from_file(File::open(path)?)
    }

    /// Wrap an already-open file positioned at the start. Also used for
    /// the decompressed spill of a zip source.
    pub(crate) fn from_file(mut file: File) -> Result<Self> {
        let mut prefix = [0u8; 2];
        file.read_exact(&mut prefix).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                Error::SourceFormat("digit file is shorter than the \"3.\" prefix".into())
            } else {
                Error::Io(e)
            }
        })?;
        if &prefix != b"3." {
            return Err(Error::SourceFormat(format!(
                "digit file starts with {:?} instead of \"3.\"",
                String::from_utf8_lossy(&prefix)
            )));
        }
        Ok(Self { file })
    }
}

impl DigitSource for HexFileSource {
    fn next_batch(&mut self) -> Result<Option<Vec<u8>>> {
        loop {
            let mut batch = vec![0u8; FILE_BATCH];
            let read = self.file.read(&mut batch)?;
            if read == 0 {
                return Ok(None);
            }
            batch.truncate(read);
            // A trailing newline must not reach the dribbler.
            batch.retain(|b| !b.is_ascii_whitespace());
            if !batch.is_empty() {
                return Ok(Some(batch));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn source_for(contents: &[u8]) -> (TempDir, Result<HexFileSource>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digits.txt");
        std::fs::write(&path, contents).unwrap();
        let source = HexFileSource::open(&path);
        (dir, source)
    }

    #[test]
    fn test_skips_prefix_and_strips_whitespace() {
        let (_dir, source) = source_for(b"3.243f6a88\n");
        let mut source = source.unwrap();
        assert_eq!(source.next_batch().unwrap(), Some(b"243f6a88".to_vec()));
        assert_eq!(source.next_batch().unwrap(), None);
    }

    #[test]
    fn test_rejects_wrong_prefix() {
        let (_dir, source) = source_for(b"1.41421356");
        assert!(matches!(source.unwrap_err(), Error::SourceFormat(_)));
    }

    #[test]
    fn test_rejects_truncated_file() {
        let (_dir, source) = source_for(b"3");
        assert!(matches!(source.unwrap_err(), Error::SourceFormat(_)));
    }

    #[test]
    fn test_empty_digits_exhaust_immediately() {
        let (_dir, source) = source_for(b"3.\n");
        let mut source = source.unwrap();
        assert_eq!(source.next_batch().unwrap(), None);
    }
}
