//! Whole-file byte buffers for model artifacts.

use crate::core::errors::{PredError, PredResult};
use std::path::{Path, PathBuf};

/// The full contents of one file, read eagerly.
///
/// The buffer is owned and immutable. Dropping it releases the bytes; when
/// it is handed to the engine the engine keeps its own copy.
#[derive(Debug, Clone)]
pub struct RawFileBuffer {
    path: PathBuf,
    data: Vec<u8>,
}

impl RawFileBuffer {
    /// Reads the whole file at `path`.
    ///
    /// # Errors
    ///
    /// `PredError::FileNotFound` if the file does not exist, `PredError::Io`
    /// for any other read failure.
    pub fn open(path: impl AsRef<Path>) -> PredResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| PredError::from_io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_exact_bytes() {
        let payload: Vec<u8> = (0u8..=255).chain([0, 0, 7]).collect();
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&payload).unwrap();

        let buffer = RawFileBuffer::open(file.path()).unwrap();
        assert_eq!(buffer.len(), payload.len());
        assert_eq!(buffer.as_bytes(), payload.as_slice());
        assert_eq!(buffer.path(), file.path());
    }

    #[test]
    fn test_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let buffer = RawFileBuffer::open(file.path()).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let result = RawFileBuffer::open("/nonexistent/model.params");
        assert!(matches!(result, Err(PredError::FileNotFound { .. })));
    }
}
