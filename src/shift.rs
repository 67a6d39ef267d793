use crate::store::LineStore;
use log::debug;
use rayon::prelude::*;

/// Below this many words the parallel path costs more than it saves
pub const PARALLEL_THRESHOLD: usize = 8192;

/// One circular shift: a line in the store and the word it starts at.
///
/// Shifts copy no text. Ordering on `Shift` itself is by line, then offset,
/// which is exactly the tie-break the alphabetizer needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Shift {
    line_index: usize,
    start_offset: usize,
}

impl Shift {
    pub fn new(line_index: usize, start_offset: usize) -> Self {
        Self {
            line_index,
            start_offset,
        }
    }

    pub fn line_index(&self) -> usize {
        self.line_index
    }

    pub fn start_offset(&self) -> usize {
        self.start_offset
    }
}

/// Produces every circular shift of every stored line
#[derive(Debug, Clone, Copy)]
pub struct ShiftGenerator {
    threads: usize,
}

impl Default for ShiftGenerator {
    fn default() -> Self {
        Self::sequential()
    }
}

impl ShiftGenerator {
    /// Generator allowed to spread work over `threads` workers
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
        }
    }

    pub fn sequential() -> Self {
        Self { threads: 1 }
    }

    /// All `(line, offset)` pairs, grouped by line in store order.
    ///
    /// A line of `n` words yields exactly `n` shifts, one per offset.
    pub fn generate(&self, store: &LineStore) -> Vec<Shift> {
        let words = store.word_count();
        if self.threads > 1 && words >= PARALLEL_THRESHOLD {
            debug!("generating shifts for {words} words in parallel");
            let lengths: Vec<usize> = store.lines().map(|line| line.len()).collect();
            return lengths
                .par_iter()
                .enumerate()
                .flat_map_iter(|(line_index, &len)| Self::shifts_of(line_index, len))
                .collect();
        }

        let mut shifts = Vec::with_capacity(words);
        for (line_index, line) in store.lines().enumerate() {
            shifts.extend(Self::shifts_of(line_index, line.len()));
        }
        shifts
    }

    fn shifts_of(line_index: usize, len: usize) -> impl Iterator<Item = Shift> {
        (0..len).map(move |start_offset| Shift::new(line_index, start_offset))
    }
}
