//! Key-Word-In-Context index generator
//!
//! Every line of input is split into words, every circular shift of those
//! words is generated, and the shifts are listed alphabetically by their
//! leading word so each word can be scanned in context.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

pub mod error;
pub mod config;

// Index stages
pub mod store;
pub mod shift;
pub mod alphabetizer;
pub mod render;
pub mod pipeline;

// I/O collaborators
pub mod input;
pub mod output;

// Re-export commonly used types
pub use error::{KwicError, KwicResult};
pub use config::{KwicConfig, KwicConfigBuilder};
pub use pipeline::{Pipeline, Stage};
pub use shift::Shift;
pub use store::LineStore;

/// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const IO_FAILURE: i32 = 2;

/// Read the configured input, build the index and write it out
pub fn run(config: &KwicConfig) -> KwicResult<i32> {
    config.validate()?;

    let lines = input::InputReader::new(config.line_terminator()).read_all(&config.input_files)?;
    log::debug!("read {} input records", lines.len());

    let threads = config.effective_thread_count();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| KwicError::thread_pool(&e.to_string()))?;

    let written = pool.install(|| -> KwicResult<usize> {
        let mut pipeline = Pipeline::new(threads);
        let mut output = output::OutputWriter::open(config)?;
        pipeline.run(&lines, &mut output)?;
        let written = output.written();
        output.into_inner()?;
        Ok(written)
    })?;
    log::info!("wrote {written} index lines using {threads} threads");

    Ok(EXIT_SUCCESS)
}
