// Chunk: docs/chunks/file_persistence - Reading and writing documents

//! Documents on disk.
//!
//! The persisted form is the buffer's lines joined with `\n`, UTF-8, with no
//! newline added at the end. A file that ended with a newline opens with a
//! trailing empty line, so open-then-save reproduces it byte for byte.
//!
//! Writes go to a uniquely named temporary sibling first and are renamed
//! into place, so concurrent writers never share a temporary file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;
use quill_buffer::LineBuffer;
use tempfile::NamedTempFile;

use crate::core_event::DocId;
use crate::error::EditorError;

/// Reads `path` into a buffer.
pub fn read_buffer(path: &Path) -> Result<LineBuffer, EditorError> {
    let bytes = fs::read(path).map_err(|e| EditorError::io(path, e))?;
    let text = String::from_utf8(bytes).map_err(|_| EditorError::InvalidUtf8 {
        path: path.to_path_buf(),
    })?;
    Ok(LineBuffer::from_text(&text))
}

/// Writes `text` to `path` atomically.
pub fn write_text(path: &Path, text: &str) -> Result<(), EditorError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| EditorError::io(dir, e))?;
    temp.write_all(text.as_bytes())
        .map_err(|e| EditorError::io(temp.path(), e))?;
    // A failed persist drops the temp file, which removes it.
    temp.persist(path).map_err(|e| EditorError::io(path, e.error))?;
    info!("saved {} ({} bytes)", path.display(), text.len());
    Ok(())
}

/// A document's text captured at dispatch time, ready to be written from
/// another thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSnapshot {
    pub doc_id: DocId,
    pub path: PathBuf,
    pub text: String,
    pub version: u64,
}

impl SaveSnapshot {
    /// Writes the snapshot. Concurrent saves of the same path are
    /// last-writer-wins; each lands whole.
    pub fn write(&self) -> Result<(), EditorError> {
        write_text(&self.path, &self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        for content in ["", "one", "one\n", "a\r\nb\r\n", "\n\n", "tab\there\nλ"] {
            fs::write(&path, content).unwrap();
            let buffer = read_buffer(&path).unwrap();
            write_text(&path, &buffer.text()).unwrap();
            assert_eq!(fs::read_to_string(&path).unwrap(), content);
        }
    }

    #[test]
    fn test_trailing_newline_is_an_empty_last_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "x\n").unwrap();
        let buffer = read_buffer(&path).unwrap();
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line_string(1), "");
    }

    #[test]
    fn test_invalid_utf8_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bin");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(read_buffer(&path), Err(EditorError::InvalidUtf8 { .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = read_buffer(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, EditorError::Io { .. }));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        write_text(&path, "hi").unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("a.txt")]);
    }

    #[test]
    fn test_snapshot_write_keeps_its_document() {
        let dir = TempDir::new().unwrap();
        let doc: DocId = 7;
        let snapshot = SaveSnapshot {
            doc_id: doc,
            path: dir.path().join("a.txt"),
            text: "saved".into(),
            version: 3,
        };
        snapshot.write().unwrap();
        assert_eq!(fs::read_to_string(&snapshot.path).unwrap(), "saved");
        assert_eq!(snapshot.doc_id, doc);
    }

    #[test]
    fn test_concurrent_writes_to_one_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        let contents: Vec<String> = (0..8).map(|i| format!("writer {i}\n").repeat(200)).collect();
        let barrier = std::sync::Arc::new(std::sync::Barrier::new(contents.len()));

        let handles: Vec<_> = contents
            .iter()
            .cloned()
            .map(|text| {
                let path = path.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    write_text(&path, &text)
                })
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap().is_ok());
        }

        let on_disk = fs::read_to_string(&path).unwrap();
        assert!(contents.contains(&on_disk));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
