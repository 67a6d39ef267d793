//! Sequencing of the index stages
//!
//! The pipeline owns no ordering or formatting logic. It feeds raw lines into
//! a fresh [`LineStore`], hands the store to each stage in turn and only writes
//! output once every line has rendered, so a failure leaves the output empty.

use crate::alphabetizer::Alphabetizer;
use crate::error::KwicResult;
use crate::output::OutputWriter;
use crate::render::Renderer;
use crate::shift::ShiftGenerator;
use crate::store::LineStore;
use log::{debug, info};
use std::fmt;
use std::io::Write;

/// Progress of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Empty,
    Loaded,
    Shifted,
    Sorted,
    Rendered,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Empty => "empty",
            Stage::Loaded => "loaded",
            Stage::Shifted => "shifted",
            Stage::Sorted => "sorted",
            Stage::Rendered => "rendered",
            Stage::Done => "done",
        };
        write!(f, "{name}")
    }
}

/// Store -> shifts -> sorted shifts -> rendered lines
#[derive(Debug)]
pub struct Pipeline {
    generator: ShiftGenerator,
    alphabetizer: Alphabetizer,
    renderer: Renderer,
    stage: Stage,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Pipeline {
    /// Pipeline whose shifting and sorting may use up to `threads` workers
    pub fn new(threads: usize) -> Self {
        Self {
            generator: ShiftGenerator::new(threads),
            alphabetizer: Alphabetizer::new(threads),
            renderer: Renderer::new(),
            stage: Stage::Empty,
        }
    }

    /// Stage reached by the most recent run
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Build the full index for `lines` and return it rendered, in order
    pub fn index<I, S>(&mut self, lines: I) -> KwicResult<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.advance(Stage::Empty);

        let mut store = LineStore::new();
        store.extend(lines);
        self.advance(Stage::Loaded);
        if store.is_empty() {
            info!("no non-blank input lines; index is empty");
        } else {
            debug!(
                "stored {} lines with {} words",
                store.len(),
                store.word_count()
            );
        }

        let shifts = self.generator.generate(&store);
        self.advance(Stage::Shifted);

        let sorted = self.alphabetizer.sort(&shifts, &store)?;
        self.advance(Stage::Sorted);

        let rendered = self.renderer.render_all(&sorted, &store)?;
        self.advance(Stage::Rendered);
        Ok(rendered)
    }

    /// Index `lines` and write every rendered line to `output`.
    ///
    /// Returns the number of lines written. Nothing is written if any stage fails.
    pub fn run<I, S, W>(&mut self, lines: I, output: &mut OutputWriter<W>) -> KwicResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        W: Write,
    {
        let rendered = self.index(lines)?;
        for line in &rendered {
            output.write_line(line)?;
        }
        self.advance(Stage::Done);
        Ok(rendered.len())
    }

    fn advance(&mut self, stage: Stage) {
        debug!("pipeline stage: {} -> {stage}", self.stage);
        self.stage = stage;
    }
}
