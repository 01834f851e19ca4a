//! Word list sources.
//!
//! A [`WordSource`] hands the loader raw records, one per line, and can be
//! replayed from the start on every call. Records are validated with
//! [`parse_record`] before they reach the index.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::error::{Error, RecordError, Result};

/// A finite, restartable sequence of raw word records.
pub trait WordSource {
    /// Calls `f` once per record, in order.
    fn visit(&self, f: &mut dyn FnMut(&[u8])) -> Result<()>;
}

/// Validates one raw record and returns the word it carries.
///
/// A single trailing `\r` is stripped first, so CRLF word lists load the
/// same as LF ones.
pub fn parse_record(raw: &[u8], max_len: usize) -> Result<&str, RecordError> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    if raw.is_empty() {
        return Err(RecordError::Empty);
    }
    if raw.len() > max_len {
        return Err(RecordError::TooLong {
            len: raw.len(),
            max: max_len,
        });
    }
    std::str::from_utf8(raw).map_err(|_| RecordError::NotUtf8)
}

/// Splits `text` on `\n`. A trailing newline does not produce an extra
/// empty record.
fn visit_lines(text: &[u8], f: &mut dyn FnMut(&[u8])) {
    let mut rest = text;
    while !rest.is_empty() {
        match rest.iter().position(|&b| b == b'\n') {
            Some(i) => {
                f(&rest[..i]);
                rest = &rest[i + 1..];
            }
            None => {
                f(rest);
                break;
            }
        }
    }
}

// =============================================================================
// File
// =============================================================================

/// A newline-separated word list on disk, memory-mapped on each visit.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WordSource for FileSource {
    fn visit(&self, f: &mut dyn FnMut(&[u8])) -> Result<()> {
        let file = File::open(&self.path).map_err(|e| Error::source_unavailable(&self.path, e))?;
        let len = file
            .metadata()
            .map_err(|e| Error::source_unavailable(&self.path, e))?
            .len();
        if len == 0 {
            return Ok(());
        }

        // SAFETY: the mapping is read-only and dropped before returning.
        // Concurrent truncation of the file by another process is outside
        // what this loader defends against.
        let map = unsafe { Mmap::map(&file) }.map_err(|e| Error::source_unavailable(&self.path, e))?;
        visit_lines(&map, f);
        Ok(())
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// A newline-separated word list already in memory.
#[derive(Debug, Clone, Copy)]
pub struct TextSource<'a>(pub &'a [u8]);

impl<'a> TextSource<'a> {
    pub fn new(text: &'a (impl AsRef<[u8]> + ?Sized)) -> Self {
        Self(text.as_ref())
    }
}

impl WordSource for TextSource<'_> {
    fn visit(&self, f: &mut dyn FnMut(&[u8])) -> Result<()> {
        visit_lines(self.0, f);
        Ok(())
    }
}

impl<S: AsRef<str>> WordSource for [S] {
    fn visit(&self, f: &mut dyn FnMut(&[u8])) -> Result<()> {
        for word in self {
            f(word.as_ref().as_bytes());
        }
        Ok(())
    }
}

impl<S: AsRef<str>, const N: usize> WordSource for [S; N] {
    fn visit(&self, f: &mut dyn FnMut(&[u8])) -> Result<()> {
        self.as_slice().visit(f)
    }
}

impl<S: AsRef<str>> WordSource for Vec<S> {
    fn visit(&self, f: &mut dyn FnMut(&[u8])) -> Result<()> {
        self.as_slice().visit(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn collect(source: &(impl WordSource + ?Sized)) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        source.visit(&mut |r| out.push(r.to_vec())).unwrap();
        out
    }

    #[test]
    fn test_parse_record() {
        assert_eq!(parse_record(b"apple", 45), Ok("apple"));
        assert_eq!(parse_record(b"apple\r", 45), Ok("apple"));
        assert_eq!(parse_record(b"", 45), Err(RecordError::Empty));
        assert_eq!(parse_record(b"\r", 45), Err(RecordError::Empty));
        assert_eq!(
            parse_record(b"abcdef", 5),
            Err(RecordError::TooLong { len: 6, max: 5 })
        );
        // The carriage return does not count against the limit.
        assert_eq!(parse_record(b"abcde\r", 5), Ok("abcde"));
        assert_eq!(parse_record(&[0xff, 0xfe], 45), Err(RecordError::NotUtf8));
    }

    #[test]
    fn test_text_lines() {
        let src = TextSource::new("apple\nBanana\r\n\ncherry\n");
        assert_eq!(
            collect(&src),
            vec![
                b"apple".to_vec(),
                b"Banana\r".to_vec(),
                b"".to_vec(),
                b"cherry".to_vec()
            ]
        );
        // Last record without a terminator still counts.
        assert_eq!(collect(&TextSource::new("a\nb")).len(), 2);
        assert!(collect(&TextSource::new("")).is_empty());
    }

    #[test]
    fn test_slice_sources() {
        let words = ["a", "b", "c"];
        assert_eq!(collect(&words).len(), 3);
        assert_eq!(collect(&words[..2]).len(), 2);
        let owned: Vec<String> = vec!["x".into()];
        assert_eq!(collect(&owned), vec![b"x".to_vec()]);
    }

    #[test]
    fn test_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"one\r\ntwo\r\nthree\r\n").unwrap();
        file.flush().unwrap();

        let src = FileSource::new(file.path());
        let records = collect(&src);
        assert_eq!(records.len(), 3);
        assert_eq!(parse_record(&records[1], 45), Ok("two"));
        // Restartable.
        assert_eq!(collect(&src), records);
    }

    #[test]
    fn test_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(collect(&FileSource::new(file.path())).is_empty());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = FileSource::new(dir.path().join("missing.txt"));
        let err = src.visit(&mut |_| {}).unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable { .. }));
    }
}
