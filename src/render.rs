use crate::error::KwicResult;
use crate::shift::Shift;
use crate::store::LineStore;
use itertools::Itertools;

/// Turns a shift back into a display line
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Rotated words joined by single spaces, with the first character uppercased.
    ///
    /// Only that one character changes case; the rest of the first word and
    /// every later word keep their stored casing. No terminator is appended.
    pub fn render(&self, shift: Shift, store: &LineStore) -> KwicResult<String> {
        let rotation = store.rotation(shift)?;
        let joined = rotation.words().map(|word| word.as_str()).join(" ");
        Ok(capitalize_first(&joined))
    }

    /// Render every shift in order; the first failure aborts the batch
    pub fn render_all(&self, shifts: &[Shift], store: &LineStore) -> KwicResult<Vec<String>> {
        shifts
            .iter()
            .map(|&shift| self.render(shift, store))
            .collect()
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(text.len() + 2);
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}
