//! Configuration management for index runs

use crate::error::{KwicError, KwicResult};

/// Upper bound on worker threads accepted from the command line
pub const MAX_THREADS: usize = 1024;

/// Main configuration structure for an index run
#[derive(Debug, Clone, Default)]
pub struct KwicConfig {
    /// Files to read from (if not specified, use stdin)
    pub input_files: Vec<String>,
    /// Output file path
    pub output_file: Option<String>,
    /// Use zero bytes as line terminators instead of newlines
    pub zero_terminated: bool,
    /// Number of worker threads for shifting and sorting
    pub parallel_threads: Option<usize>,
    /// Debug mode (verbose logging)
    pub debug: bool,
}

impl KwicConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set input files
    pub fn with_input_files(mut self, files: Vec<String>) -> Self {
        self.input_files = files;
        self
    }

    /// Set output file
    pub fn with_output_file(mut self, output_file: Option<String>) -> Self {
        self.output_file = output_file;
        self
    }

    /// Enable zero-terminated lines
    pub fn with_zero_terminated(mut self, zero_terminated: bool) -> Self {
        self.zero_terminated = zero_terminated;
        self
    }

    /// Set parallel threads
    pub fn with_parallel_threads(mut self, threads: Option<usize>) -> Self {
        self.parallel_threads = threads;
        self
    }

    /// Parse a thread count as given to `--parallel`
    pub fn set_parallel_threads_from_string(&mut self, threads: &str) -> KwicResult<()> {
        let threads = threads
            .trim()
            .parse::<usize>()
            .map_err(|_| KwicError::parse(&format!("invalid thread count: {threads}")))?;
        self.parallel_threads = Some(threads);
        Ok(())
    }

    /// Validate configuration for consistency
    pub fn validate(&self) -> KwicResult<()> {
        if let Some(threads) = self.parallel_threads {
            if threads == 0 {
                return Err(KwicError::thread_pool("thread count must be positive"));
            }
            if threads > MAX_THREADS {
                return Err(KwicError::thread_pool(&format!(
                    "too many threads (maximum {MAX_THREADS})"
                )));
            }
        }

        if self.input_files.iter().filter(|f| f.as_str() == "-").count() > 1 {
            return Err(KwicError::conflicting_options(
                "standard input may only be read once",
            ));
        }

        Ok(())
    }

    /// Check if reading from stdin
    pub fn reading_from_stdin(&self) -> bool {
        self.input_files.is_empty() || (self.input_files.len() == 1 && self.input_files[0] == "-")
    }

    /// Check if writing to stdout
    pub fn writing_to_stdout(&self) -> bool {
        self.output_file.is_none()
    }

    /// Byte that ends each input record and each output line
    pub fn line_terminator(&self) -> u8 {
        if self.zero_terminated {
            b'\0'
        } else {
            b'\n'
        }
    }

    /// Get effective thread count
    pub fn effective_thread_count(&self) -> usize {
        self.parallel_threads.unwrap_or_else(num_cpus::get)
    }
}

/// Builder pattern for creating configurations
pub struct KwicConfigBuilder {
    config: KwicConfig,
}

impl KwicConfigBuilder {
    /// Start building a new configuration
    pub fn new() -> Self {
        Self {
            config: KwicConfig::default(),
        }
    }

    /// Add an input file
    pub fn input_file(mut self, file: String) -> Self {
        self.config.input_files.push(file);
        self
    }

    /// Set output file
    pub fn output_file(mut self, file: String) -> Self {
        self.config.output_file = Some(file);
        self
    }

    /// Enable zero-terminated lines
    pub fn zero_terminated(mut self) -> Self {
        self.config.zero_terminated = true;
        self
    }

    /// Set worker thread count
    pub fn parallel_threads(mut self, threads: usize) -> Self {
        self.config.parallel_threads = Some(threads);
        self
    }

    /// Enable debug logging
    pub fn debug(mut self) -> Self {
        self.config.debug = true;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> KwicResult<KwicConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for KwicConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
