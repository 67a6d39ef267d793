//! Alphabetical ordering of circular shifts
//!
//! Shifts are ordered word by word on their case-folded rotation. Two shifts
//! whose rotations fold to the same words fall back to line index and then
//! start offset, so the order is total and any sort algorithm, stable or not,
//! sequential or parallel, lands on the same sequence.

use crate::error::{KwicError, KwicResult};
use crate::shift::{Shift, PARALLEL_THRESHOLD};
use crate::store::{Line, LineStore};
use log::debug;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Sorts shifts into KWIC order
#[derive(Debug, Clone, Copy)]
pub struct Alphabetizer {
    threads: usize,
}

impl Default for Alphabetizer {
    fn default() -> Self {
        Self::sequential()
    }
}

impl Alphabetizer {
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
        }
    }

    pub fn sequential() -> Self {
        Self { threads: 1 }
    }

    /// Return `shifts` in alphabetical order as a new vector.
    ///
    /// Neither the input slice nor the store is modified. Every shift is checked
    /// against the store before sorting; one bad shift fails the whole call.
    pub fn sort(&self, shifts: &[Shift], store: &LineStore) -> KwicResult<Vec<Shift>> {
        let keys = self.prepare(store);
        for &shift in shifts {
            keys.validate(shift)?;
        }

        let mut sorted = shifts.to_vec();
        if self.use_parallel(sorted.len()) {
            debug!("sorting {} shifts in parallel", sorted.len());
            sorted.par_sort_unstable_by(|a, b| keys.compare(*a, *b));
        } else {
            sorted.sort_unstable_by(|a, b| keys.compare(*a, *b));
        }
        Ok(sorted)
    }

    /// Fold every stored word once so comparisons never allocate
    pub fn prepare(&self, store: &LineStore) -> SortKeys {
        let fold = |line: Line<'_>| -> Vec<String> {
            line.words().map(|word| word.folded()).collect()
        };

        let lines: Vec<Vec<String>> = if self.use_parallel(store.word_count()) {
            let views: Vec<Line<'_>> = store.lines().collect();
            views.into_par_iter().map(fold).collect()
        } else {
            store.lines().map(fold).collect()
        };
        SortKeys { lines }
    }

    fn use_parallel(&self, len: usize) -> bool {
        self.threads > 1 && len >= PARALLEL_THRESHOLD
    }
}

/// Case-folded words of every stored line, indexed by line then word
#[derive(Debug, Clone)]
pub struct SortKeys {
    lines: Vec<Vec<String>>,
}

impl SortKeys {
    /// Check that `shift` names an existing line and word
    pub fn validate(&self, shift: Shift) -> KwicResult<()> {
        let line = self
            .lines
            .get(shift.line_index())
            .ok_or_else(|| KwicError::line_out_of_range(shift.line_index(), self.lines.len()))?;
        if shift.start_offset() >= line.len() {
            return Err(KwicError::offset_out_of_range(
                shift.start_offset(),
                line.len(),
            ));
        }
        Ok(())
    }

    /// Total order on shifts.
    ///
    /// Rotations compare word by word; a rotation that runs out of words first
    /// sorts first. Equal rotations are ordered by line index, then offset.
    ///
    /// # Panics
    ///
    /// Panics if either shift fails [`SortKeys::validate`].
    pub fn compare(&self, a: Shift, b: Shift) -> Ordering {
        self.rotation(a)
            .cmp(self.rotation(b))
            .then_with(|| a.cmp(&b))
    }

    fn rotation(&self, shift: Shift) -> impl Iterator<Item = &str> {
        let (head, tail) = self.lines[shift.line_index()].split_at(shift.start_offset());
        tail.iter().chain(head).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shift::ShiftGenerator;
    use rand::seq::SliceRandom;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn store_of(lines: &[&str]) -> LineStore {
        let mut store = LineStore::new();
        store.extend(lines);
        store
    }

    fn sorted(store: &LineStore) -> Vec<Shift> {
        let shifts = ShiftGenerator::sequential().generate(store);
        Alphabetizer::sequential()
            .sort(&shifts, store)
            .expect("generated shifts are valid")
    }

    /// Brute force oracle: materialize each folded rotation and sort the tuples
    fn reference_order(store: &LineStore) -> Vec<Shift> {
        let mut keyed: Vec<(Vec<String>, Shift)> = ShiftGenerator::sequential()
            .generate(store)
            .into_iter()
            .map(|shift| {
                let words = store
                    .rotation(shift)
                    .expect("valid shift")
                    .words()
                    .map(|w| w.as_str().to_lowercase())
                    .collect();
                (words, shift)
            })
            .collect();
        keyed.sort();
        keyed.into_iter().map(|(_, shift)| shift).collect()
    }

    #[test]
    fn test_scenario_order() {
        let store = store_of(&["hello world", "i am yoda"]);
        assert_eq!(
            sorted(&store),
            vec![
                Shift::new(1, 1), // am yoda i
                Shift::new(0, 0), // hello world
                Shift::new(1, 0), // i am yoda
                Shift::new(0, 1), // world hello
                Shift::new(1, 2), // yoda i am
            ]
        );
    }

    #[test]
    fn test_identical_rotations_break_ties_by_offset() {
        let store = store_of(&["a a"]);
        assert_eq!(sorted(&store), vec![Shift::new(0, 0), Shift::new(0, 1)]);
    }

    #[test]
    fn test_identical_lines_break_ties_by_line_index() {
        let store = store_of(&["Same words", "same WORDS"]);
        assert_eq!(
            sorted(&store),
            vec![
                Shift::new(0, 0),
                Shift::new(1, 0),
                Shift::new(0, 1),
                Shift::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_case_is_ignored_at_each_word() {
        let store = store_of(&["apple Zoo", "Apple bar"]);
        let keys = Alphabetizer::sequential().prepare(&store);
        // first words tie once folded, the second word decides
        assert_eq!(
            keys.compare(Shift::new(1, 0), Shift::new(0, 0)),
            Ordering::Less
        );
        assert_eq!(
            sorted(&store),
            vec![
                Shift::new(1, 0), // Apple bar
                Shift::new(0, 0), // apple Zoo
                Shift::new(1, 1), // bar Apple
                Shift::new(0, 1), // Zoo apple
            ]
        );
    }

    #[test]
    fn test_shorter_prefix_sorts_first() {
        let store = store_of(&["red fish", "red"]);
        let keys = Alphabetizer::sequential().prepare(&store);
        assert_eq!(
            keys.compare(Shift::new(1, 0), Shift::new(0, 0)),
            Ordering::Less
        );
        assert_eq!(
            sorted(&store),
            vec![Shift::new(0, 1), Shift::new(1, 0), Shift::new(0, 0)]
        );
    }

    #[test]
    fn test_punctuation_is_significant() {
        let store = store_of(&["end.", "end"]);
        assert_eq!(sorted(&store), vec![Shift::new(1, 0), Shift::new(0, 0)]);
    }

    #[test]
    fn test_compare_is_total() {
        let store = store_of(&["b a", "A b", "a a", "c"]);
        let keys = Alphabetizer::sequential().prepare(&store);
        let shifts = ShiftGenerator::sequential().generate(&store);

        for &a in &shifts {
            for &b in &shifts {
                let forward = keys.compare(a, b);
                assert_eq!(forward, keys.compare(b, a).reverse());
                assert_eq!(forward == Ordering::Equal, a == b);
            }
        }
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let store = store_of(&[
            "The quick brown fox",
            "jumps over the lazy dog",
            "THE END",
            "fox fox Fox",
        ]);
        let expected = sorted(&store);
        let mut shifts = ShiftGenerator::sequential().generate(&store);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            shifts.shuffle(&mut rng);
            let result = Alphabetizer::sequential()
                .sort(&shifts, &store)
                .expect("valid shifts");
            assert_eq!(result, expected);
        }
        assert_eq!(expected, reference_order(&store));
    }

    #[test]
    fn test_sort_leaves_input_untouched() {
        let store = store_of(&["zeta alpha"]);
        let shifts = vec![Shift::new(0, 0), Shift::new(0, 1)];
        let result = Alphabetizer::sequential()
            .sort(&shifts, &store)
            .expect("valid shifts");

        assert_eq!(shifts, vec![Shift::new(0, 0), Shift::new(0, 1)]);
        assert_eq!(result, vec![Shift::new(0, 1), Shift::new(0, 0)]);
    }

    #[test]
    fn test_invalid_shift_is_rejected() {
        let store = store_of(&["one two"]);
        let shifts = vec![Shift::new(0, 0), Shift::new(0, 2)];

        assert!(matches!(
            Alphabetizer::sequential().sort(&shifts, &store),
            Err(KwicError::OutOfRange { index: 2, len: 2, .. })
        ));
        assert!(matches!(
            Alphabetizer::sequential().sort(&[Shift::new(3, 0)], &store),
            Err(KwicError::OutOfRange { what: "line", .. })
        ));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let lines: Vec<String> = (0..3000)
            .map(|i| format!("Item{} shared {} Tail", i % 97, i % 13))
            .collect();
        let mut store = LineStore::new();
        store.extend(&lines);
        let shifts = ShiftGenerator::sequential().generate(&store);
        assert!(shifts.len() >= PARALLEL_THRESHOLD);

        let sequential = Alphabetizer::sequential()
            .sort(&shifts, &store)
            .expect("valid shifts");
        let parallel = Alphabetizer::new(4)
            .sort(&shifts, &store)
            .expect("valid shifts");
        assert_eq!(sequential, parallel);
    }
}
