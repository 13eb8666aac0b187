//! The interpreter's memory tape.
//!
//! Cells are signed 8-bit values. The tape starts empty and only ever grows to
//! the right; reads past the materialized end see zero without allocating.

/// A growable tape of signed byte cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<i8>,
}

impl Tape {
    pub fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Value at `i`, or 0 beyond the materialized length.
    pub fn get(&self, i: usize) -> i8 {
        self.cells.get(i).copied().unwrap_or(0)
    }

    /// Write `v` at `i`, zero-filling any cells between the old end and `i`.
    pub fn set(&mut self, i: usize, v: i8) {
        if i >= self.cells.len() {
            self.cells.resize(i + 1, 0);
        }
        self.cells[i] = v;
    }

    /// Add one with two's-complement wraparound. Returns the new value.
    pub fn increment(&mut self, i: usize) -> i8 {
        let v = self.get(i).wrapping_add(1);
        self.set(i, v);
        v
    }

    /// Subtract one with two's-complement wraparound. Returns the new value.
    pub fn decrement(&mut self, i: usize) -> i8 {
        let v = self.get(i).wrapping_sub(1);
        self.set(i, v);
        v
    }

    /// Materialized length: the high-water mark of written cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_tape_reads_zero_without_growing() {
        let tape = Tape::new();
        assert_eq!(tape.get(0), 0);
        assert_eq!(tape.get(10_000), 0);
        assert_eq!(tape.len(), 0);
    }

    #[test]
    fn set_extends_with_zeroed_intermediate_cells() {
        let mut tape = Tape::new();
        tape.set(5, 42);
        assert_eq!(tape.len(), 6);
        for i in 0..5 {
            assert_eq!(tape.get(i), 0);
        }
        assert_eq!(tape.get(5), 42);
    }

    #[test]
    fn set_inside_materialized_range_does_not_grow() {
        let mut tape = Tape::new();
        tape.set(3, 1);
        tape.set(1, -7);
        assert_eq!(tape.len(), 4);
        assert_eq!(tape.get(1), -7);
    }

    #[test]
    fn increment_wraps_at_max() {
        let mut tape = Tape::new();
        tape.set(0, 127);
        assert_eq!(tape.increment(0), -128);
    }

    #[test]
    fn decrement_wraps_at_min() {
        let mut tape = Tape::new();
        tape.set(0, -128);
        assert_eq!(tape.decrement(0), 127);
    }

    #[test]
    fn two_hundred_fifty_six_increments_is_identity() {
        for start in i8::MIN..=i8::MAX {
            let mut tape = Tape::new();
            tape.set(0, start);
            for _ in 0..256 {
                tape.increment(0);
            }
            assert_eq!(tape.get(0), start);
        }
    }
}
