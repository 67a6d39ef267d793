use crate::config::KwicConfig;
use crate::error::{KwicContext, KwicResult};
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Buffered destination for rendered index lines
pub struct OutputWriter<W: Write> {
    writer: W,
    terminator: u8,
    written: usize,
}

impl OutputWriter<Box<dyn Write>> {
    /// Open the configured destination: the output file if set, stdout otherwise
    pub fn open(config: &KwicConfig) -> KwicResult<Self> {
        let writer: Box<dyn Write> = if let Some(output_file) = &config.output_file {
            Box::new(BufWriter::new(
                File::create(output_file).with_file_context(output_file)?,
            ))
        } else {
            Box::new(BufWriter::new(io::stdout()))
        };
        Ok(Self::new(writer, config.line_terminator()))
    }
}

impl<W: Write> OutputWriter<W> {
    pub fn new(writer: W, terminator: u8) -> Self {
        Self {
            writer,
            terminator,
            written: 0,
        }
    }

    /// Write one line followed by the terminator
    pub fn write_line(&mut self, line: &str) -> KwicResult<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(&[self.terminator])?;
        self.written += 1;
        Ok(())
    }

    /// Lines written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(mut self) -> KwicResult<W> {
        self.writer
            .flush()
            .with_context(|| "flushing output".to_string())?;
        Ok(self.writer)
    }
}
