use crate::error::PpaReportError;
use crate::spreadsheet::SpreadsheetError;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::path::Path;

/// Signature of an OLE compound file. Encrypted OOXML packages are wrapped in one.
const COMPOUND_FILE_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Buffered reader over a local workbook file.
///
/// The file handle lives exactly as long as the reader, so dropping the reader
/// (on success or on any error path) closes the file.
pub(crate) struct SourceReader {
    inner: BufReader<File>,
}

impl SourceReader {
    /// Opens a workbook file.
    ///
    /// # Errors
    /// `SourceNotFound` when the path does not exist, checked before the file is opened.
    pub(crate) fn open(path: &Path) -> Result<SourceReader, PpaReportError> {
        ensure_source_exists(path)?;
        let file = File::open(path)?;
        Ok(SourceReader {
            inner: BufReader::new(file),
        })
    }

    /// Returns true if the content starts with a compound file header, which for an
    /// `.xlsx` name means a password protected package. The read position is restored.
    pub(crate) fn is_compound_file(&mut self) -> Result<bool, PpaReportError> {
        let mut signature = [0u8; 8];
        let position = self.inner.stream_position()?;
        let matched = match self.inner.read_exact(&mut signature) {
            Ok(()) => signature == COMPOUND_FILE_SIGNATURE,
            Err(error) if error.kind() == std::io::ErrorKind::UnexpectedEof => false,
            Err(error) => Err(error)?,
        };
        self.inner.seek(SeekFrom::Start(position))?;
        Ok(matched)
    }
}

/// Fails with `SourceNotFound` unless `path` exists.
pub(crate) fn ensure_source_exists(path: &Path) -> Result<(), SpreadsheetError> {
    if path.exists() {
        Ok(())
    } else {
        Err(SpreadsheetError::SourceNotFound(path.display().to_string()))
    }
}

impl Read for SourceReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for SourceReader {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.inner.seek(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_local_file() {
        // Cargo.toml exists in the package root during tests
        let result = SourceReader::open(Path::new("Cargo.toml"));
        assert!(result.is_ok(), "Failed to open local file: {:?}", result.err());
    }

    #[test]
    fn test_missing_file_is_source_not_found() {
        let result = SourceReader::open(Path::new("non_existent_file.xlsx"));
        match result {
            Err(PpaReportError::SpreadsheetError(SpreadsheetError::SourceNotFound(name))) => {
                assert_eq!(name, "non_existent_file.xlsx")
            }
            other => panic!("Expected SourceNotFound, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_detects_compound_file_signature() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("locked.xlsx");
        let mut file = File::create(&path).unwrap();
        file.write_all(&COMPOUND_FILE_SIGNATURE).unwrap();
        file.write_all(&[0u8; 16]).unwrap();
        drop(file);

        let mut reader = SourceReader::open(&path).unwrap();
        assert!(reader.is_compound_file().unwrap());
        // Position restored for the next reader
        let mut first = [0u8; 1];
        reader.read_exact(&mut first).unwrap();
        assert_eq!(first[0], 0xD0);
    }

    #[test]
    fn test_short_file_is_not_compound() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("tiny.xlsx");
        File::create(&path).unwrap().write_all(b"PK").unwrap();

        let mut reader = SourceReader::open(&path).unwrap();
        assert!(!reader.is_compound_file().unwrap());
    }
}
