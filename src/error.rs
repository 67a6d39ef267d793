//! Error handling for the KWIC index generator

use std::io;
use thiserror::Error;

/// Custom error type for index operations
#[derive(Error, Debug)]
pub enum KwicError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Permission denied: {file}")]
    PermissionDenied { file: String },

    #[error("No such file or directory: {file}")]
    FileNotFound { file: String },

    #[error("Is a directory: {file}")]
    IsDirectory { file: String },

    #[error("{what} index {index} out of range (len {len})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{source_name}:{line}: line is not valid UTF-8 text")]
    MalformedLine { source_name: String, line: usize },

    #[error("Conflicting options: {message}")]
    ConflictingOptions { message: String },

    #[error("Thread pool error: {message}")]
    ThreadPool { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },
}

impl KwicError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            KwicError::PermissionDenied { .. }
            | KwicError::FileNotFound { .. }
            | KwicError::IsDirectory { .. }
            | KwicError::Io(_) => crate::IO_FAILURE,

            _ => crate::EXIT_FAILURE,
        }
    }

    /// Line index past the end of the store
    pub fn line_out_of_range(index: usize, len: usize) -> Self {
        KwicError::OutOfRange {
            what: "line",
            index,
            len,
        }
    }

    /// Start offset past the end of its line
    pub fn offset_out_of_range(index: usize, len: usize) -> Self {
        KwicError::OutOfRange {
            what: "shift offset",
            index,
            len,
        }
    }

    pub fn malformed_line(source_name: &str, line: usize) -> Self {
        KwicError::MalformedLine {
            source_name: source_name.to_string(),
            line,
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(file: &str) -> Self {
        KwicError::PermissionDenied {
            file: file.to_string(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(file: &str) -> Self {
        KwicError::FileNotFound {
            file: file.to_string(),
        }
    }

    /// Create an is directory error
    pub fn is_directory(file: &str) -> Self {
        KwicError::IsDirectory {
            file: file.to_string(),
        }
    }

    /// Create a conflicting options error
    pub fn conflicting_options(message: &str) -> Self {
        KwicError::ConflictingOptions {
            message: message.to_string(),
        }
    }

    /// Create a thread pool error
    pub fn thread_pool(message: &str) -> Self {
        KwicError::ThreadPool {
            message: message.to_string(),
        }
    }

    /// Create a parse error
    pub fn parse(message: &str) -> Self {
        KwicError::Parse {
            message: message.to_string(),
        }
    }
}

/// Result type for index operations
pub type KwicResult<T> = Result<T, KwicError>;

/// Context trait for attaching file names to I/O failures
pub trait KwicContext<T> {
    fn with_context<F>(self, f: F) -> KwicResult<T>
    where
        F: FnOnce() -> String;

    fn with_file_context(self, filename: &str) -> KwicResult<T>;
}

impl<T> KwicContext<T> for Result<T, io::Error> {
    fn with_context<F>(self, f: F) -> KwicResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|io_err| {
            KwicError::Io(io::Error::new(
                io_err.kind(),
                format!("{}: {}", f(), io_err),
            ))
        })
    }

    fn with_file_context(self, filename: &str) -> KwicResult<T> {
        self.map_err(|io_err| match io_err.kind() {
            io::ErrorKind::PermissionDenied => KwicError::permission_denied(filename),
            io::ErrorKind::NotFound => KwicError::file_not_found(filename),
            _ => KwicError::Io(io::Error::new(
                io_err.kind(),
                format!("{}: {}", filename, io_err),
            )),
        })
    }
}
