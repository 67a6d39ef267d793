//! Packed line storage
//!
//! Every stored word lives in a single text buffer. A span table records where
//! each word starts and ends, and each line owns a contiguous range of that
//! table. Callers only ever see [`Line`] and [`Word`] views, so the layout can
//! change without touching the shifting, sorting or rendering stages.

use crate::error::{KwicError, KwicResult};
use crate::shift::Shift;
use std::cmp::Ordering;
use std::fmt;
use std::iter::Chain;
use std::ops::Range;
use std::slice;

/// Byte range of one word inside the packed text buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
}

/// Ordered collection of non-empty lines, split into words
#[derive(Debug, Clone, Default)]
pub struct LineStore {
    text: String,
    spans: Vec<Span>,
    lines: Vec<Range<usize>>,
}

impl LineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `raw` on whitespace and append it as a new line.
    ///
    /// Blank and whitespace-only input is ignored. Returns whether a line was stored.
    pub fn add(&mut self, raw: &str) -> bool {
        let first_span = self.spans.len();
        for word in raw.split_whitespace() {
            let start = self.text.len();
            self.text.push_str(word);
            self.spans.push(Span {
                start,
                end: self.text.len(),
            });
        }

        if self.spans.len() == first_span {
            return false;
        }
        self.lines.push(first_span..self.spans.len());
        true
    }

    /// Add every line in order
    pub fn extend<I, S>(&mut self, raw_lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for raw in raw_lines {
            self.add(raw.as_ref());
        }
    }

    /// Number of stored lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of words across all lines
    pub fn word_count(&self) -> usize {
        self.spans.len()
    }

    /// Line at `index`
    pub fn get(&self, index: usize) -> KwicResult<Line<'_>> {
        let range = self
            .lines
            .get(index)
            .ok_or_else(|| KwicError::line_out_of_range(index, self.lines.len()))?;
        Ok(Line {
            text: &self.text,
            spans: &self.spans[range.clone()],
        })
    }

    /// All stored lines, in insertion order
    pub fn lines(&self) -> impl ExactSizeIterator<Item = Line<'_>> + '_ {
        self.lines.iter().map(move |range| Line {
            text: &self.text,
            spans: &self.spans[range.clone()],
        })
    }

    /// Resolve a shift to the rotated word sequence it describes
    pub fn rotation(&self, shift: Shift) -> KwicResult<Rotation<'_>> {
        self.get(shift.line_index())?.rotate(shift.start_offset())
    }
}

/// Borrowed view of one stored line
#[derive(Clone, Copy)]
pub struct Line<'a> {
    text: &'a str,
    spans: &'a [Span],
}

impl<'a> Line<'a> {
    /// Number of words; never zero for a stored line
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn word(&self, index: usize) -> Option<Word<'a>> {
        self.spans.get(index).map(|span| self.word_at(span))
    }

    pub fn words(&self) -> Words<'a> {
        Words {
            text: self.text,
            spans: self.spans.iter(),
        }
    }

    /// Circular shift of this line starting at word `start`
    pub fn rotate(&self, start: usize) -> KwicResult<Rotation<'a>> {
        if start >= self.spans.len() {
            return Err(KwicError::offset_out_of_range(start, self.spans.len()));
        }
        Ok(Rotation { line: *self, start })
    }

    fn word_at(&self, span: &Span) -> Word<'a> {
        let text = self.text;
        Word(&text[span.start..span.end])
    }
}

impl fmt::Debug for Line<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.words()).finish()
    }
}

/// Iterator over the words of a line
#[derive(Clone)]
pub struct Words<'a> {
    text: &'a str,
    spans: slice::Iter<'a, Span>,
}

impl<'a> Iterator for Words<'a> {
    type Item = Word<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.text;
        self.spans
            .next()
            .map(|span| Word(&text[span.start..span.end]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.spans.size_hint()
    }
}

impl ExactSizeIterator for Words<'_> {}

/// A line read from a chosen start word, wrapping around to the beginning
#[derive(Clone, Copy)]
pub struct Rotation<'a> {
    line: Line<'a>,
    start: usize,
}

impl<'a> Rotation<'a> {
    pub fn start_offset(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    /// Words in rotated order: `start..n` followed by `0..start`
    pub fn words(&self) -> Chain<Words<'a>, Words<'a>> {
        let Line { text, spans } = self.line;
        let (head, tail) = spans.split_at(self.start);
        Words {
            text,
            spans: tail.iter(),
        }
        .chain(Words {
            text,
            spans: head.iter(),
        })
    }
}

impl fmt::Debug for Rotation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.words()).finish()
    }
}

/// A single whitespace-free token with its original casing.
///
/// Equality and ordering fold each character to lowercase first, so `Apple`
/// and `apple` compare equal while rendering still sees the stored text.
#[derive(Clone, Copy)]
pub struct Word<'a>(&'a str);

impl<'a> Word<'a> {
    pub fn as_str(&self) -> &'a str {
        self.0
    }

    /// Lowercase form used as the sort key
    pub fn folded(&self) -> String {
        fold_case(self.0)
    }
}

impl PartialEq for Word<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Word<'_> {}

impl PartialOrd for Word<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Word<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        folded_chars(self.0).cmp(folded_chars(other.0))
    }
}

impl fmt::Debug for Word<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.0, f)
    }
}

impl fmt::Display for Word<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Per-codepoint lowercase fold, no context-sensitive mappings
pub(crate) fn fold_case(s: &str) -> String {
    if s.is_ascii() {
        return s.to_ascii_lowercase();
    }
    folded_chars(s).collect()
}

fn folded_chars(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}
