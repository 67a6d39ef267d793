//! Reading raw lines from stdin and files
//!
//! Regular files are memory mapped and split in place; stdin is read to the end
//! first. Either way every record must be UTF-8 text before it reaches the store.

use crate::error::{KwicContext, KwicError, KwicResult};
use log::debug;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Name used for stdin in diagnostics
pub const STDIN_NAME: &str = "-";

/// Reads records separated by a terminator byte
#[derive(Debug, Clone, Copy)]
pub struct InputReader {
    terminator: u8,
}

impl Default for InputReader {
    fn default() -> Self {
        Self::new(b'\n')
    }
}

impl InputReader {
    pub fn new(terminator: u8) -> Self {
        Self { terminator }
    }

    /// Read every named source in order, `-` (or no names at all) meaning stdin
    pub fn read_all(&self, files: &[String]) -> KwicResult<Vec<String>> {
        if files.is_empty() {
            return self.read_stdin();
        }

        let mut lines = Vec::new();
        for file in files {
            let mut records = if file == STDIN_NAME {
                self.read_stdin()?
            } else {
                self.read_file(Path::new(file))?
            };
            debug!("read {} records from {file}", records.len());
            lines.append(&mut records);
        }
        Ok(lines)
    }

    pub fn read_stdin(&self) -> KwicResult<Vec<String>> {
        let stdin = io::stdin();
        self.read_from(stdin.lock(), STDIN_NAME)
    }

    /// Read an arbitrary stream to the end and split it into records
    pub fn read_from<R: Read>(&self, mut reader: R, source_name: &str) -> KwicResult<Vec<String>> {
        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .with_context(|| format!("reading {source_name}"))?;
        self.split_records(&buffer, source_name)
    }

    /// Memory map `path` and split it into records.
    ///
    /// Anything that is not a regular file is streamed to the end instead.
    pub fn read_file(&self, path: &Path) -> KwicResult<Vec<String>> {
        let name = path.display().to_string();
        let file = File::open(path).with_file_context(&name)?;
        let metadata = file.metadata().with_file_context(&name)?;
        if metadata.is_dir() {
            return Err(KwicError::is_directory(&name));
        }
        // Pipes, character devices and process substitutions report no length
        if !metadata.is_file() {
            return self.read_from(file, &name);
        }
        if metadata.len() == 0 {
            return Ok(Vec::new());
        }

        // SAFETY: the mapping is read-only and dropped before this function returns;
        // the file is not modified by this process while it is mapped.
        let mmap = unsafe { Mmap::map(&file) }.with_file_context(&name)?;
        self.split_records(&mmap, &name)
    }

    /// Split raw bytes on the terminator, dropping a trailing `\r` from each record.
    ///
    /// A final record without a terminator is kept. Records that are not UTF-8
    /// fail with [`KwicError::MalformedLine`] carrying the 1-based record number.
    pub fn split_records(&self, data: &[u8], source_name: &str) -> KwicResult<Vec<String>> {
        let mut records: Vec<&[u8]> = data.split(|&b| b == self.terminator).collect();
        if records.last().is_some_and(|last| last.is_empty()) {
            records.pop();
        }

        records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                let record = record.strip_suffix(b"\r").unwrap_or(record);
                std::str::from_utf8(record)
                    .map(str::to_owned)
                    .map_err(|_| KwicError::malformed_line(source_name, i + 1))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_split_records() {
        let reader = InputReader::default();
        let records = reader
            .split_records(b"hello world\r\ni am yoda\n\nlast", "test")
            .expect("valid text");
        assert_eq!(records, vec!["hello world", "i am yoda", "", "last"]);
    }

    #[test]
    fn test_zero_terminated_records() {
        let reader = InputReader::new(b'\0');
        let records = reader
            .split_records(b"one\ntwo\0three\0", "test")
            .expect("valid text");
        assert_eq!(records, vec!["one\ntwo", "three"]);
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let reader = InputReader::default();
        match reader.split_records(b"fine\nbad \xff byte\n", "input.txt") {
            Err(KwicError::MalformedLine { source_name, line }) => {
                assert_eq!(source_name, "input.txt");
                assert_eq!(line, 2);
            }
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn test_read_from_stream() {
        let reader = InputReader::default();
        let records = reader
            .read_from(&b"alpha\nbeta\n"[..], "stream")
            .expect("valid stream");
        assert_eq!(records, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_read_files_in_order() -> KwicResult<()> {
        let temp_dir = TempDir::new()?;
        let first = temp_dir.path().join("first.txt");
        let second = temp_dir.path().join("second.txt");
        let empty = temp_dir.path().join("empty.txt");
        fs::write(&first, "hello world\n")?;
        fs::write(&second, "i am yoda")?;
        fs::write(&empty, "")?;

        let files = vec![
            first.to_string_lossy().to_string(),
            empty.to_string_lossy().to_string(),
            second.to_string_lossy().to_string(),
        ];
        let lines = InputReader::default().read_all(&files)?;
        assert_eq!(lines, vec!["hello world", "i am yoda"]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_read_named_pipe() -> KwicResult<()> {
        use std::ffi::CString;
        use std::io::Write;
        use std::os::unix::ffi::OsStrExt;
        use std::thread;

        let temp_dir = TempDir::new()?;
        let fifo = temp_dir.path().join("lines.fifo");
        let c_path = CString::new(fifo.as_os_str().as_bytes())
            .expect("temp path has no interior NUL");
        // SAFETY: c_path is a valid NUL-terminated path for the duration of the call
        let rc = unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) };
        assert_eq!(rc, 0, "mkfifo failed: {}", io::Error::last_os_error());

        let writer_path = fifo.clone();
        let writer = thread::spawn(move || -> io::Result<()> {
            let mut pipe = fs::OpenOptions::new().write(true).open(writer_path)?;
            pipe.write_all(b"hello world\ni am yoda\n")
        });

        let files = vec![fifo.to_string_lossy().to_string()];
        let lines = InputReader::default().read_all(&files)?;
        writer.join().expect("writer thread panicked")?;

        assert_eq!(lines, vec!["hello world", "i am yoda"]);
        Ok(())
    }

    #[test]
    fn test_missing_file_and_directory() -> KwicResult<()> {
        let temp_dir = TempDir::new()?;
        let reader = InputReader::default();

        let missing = temp_dir.path().join("missing.txt");
        assert!(matches!(
            reader.read_file(&missing),
            Err(KwicError::FileNotFound { .. })
        ));
        assert!(matches!(
            reader.read_file(temp_dir.path()),
            Err(KwicError::IsDirectory { .. })
        ));
        Ok(())
    }
}
