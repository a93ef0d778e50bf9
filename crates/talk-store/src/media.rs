//! Whole-file reads and writes for audio clips and images.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Read an entire audio or image file into memory.
pub fn read_media_file(path: &Path) -> StoreResult<Vec<u8>> {
    let bytes = fs::read(path).map_err(|e| StoreError::io(path, e))?;
    debug!(path = %path.display(), len = bytes.len(), "read media file");
    Ok(bytes)
}

/// Drain a reader (e.g. a bundled resource stream) into a byte buffer.
pub fn read_media<R: Read>(mut reader: R) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Write media bytes out to a standalone file.
pub fn write_media_file(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    fs::write(path, bytes).map_err(|e| StoreError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp3");
        write_media_file(&path, &[0xFF, 0xFB, 0x90]).unwrap();
        assert_eq!(read_media_file(&path).unwrap(), vec![0xFF, 0xFB, 0x90]);
    }

    #[test]
    fn missing_file_is_io_error_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.mp3");
        match read_media_file(&path).unwrap_err() {
            StoreError::Io { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reader_is_drained() {
        let data = vec![7u8; 5000];
        assert_eq!(read_media(data.as_slice()).unwrap(), data);
    }
}
