//! Bitset of cells that have not been bombed yet.

use crate::core::Move;

/// One bit per linear cell index; set means the move is still available.
///
/// Bits only ever go from set to clear.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvailableMoves {
    words: Vec<u64>,
    len: usize,
    remaining: usize,
}

impl AvailableMoves {
    /// All `len` moves available.
    pub fn full(len: usize) -> Self {
        let mut words = vec![u64::MAX; len.div_ceil(64)];
        let tail = len % 64;
        if tail != 0 {
            if let Some(last) = words.last_mut() {
                *last = (1u64 << tail) - 1;
            }
        }
        Self {
            words,
            len,
            remaining: len,
        }
    }

    /// Total number of cells tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the board has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of moves still available.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Check whether `mv` is in bounds and not yet consumed.
    #[must_use]
    pub fn contains(&self, mv: Move) -> bool {
        let i = mv.index();
        i < self.len && self.words[i / 64] & (1u64 << (i % 64)) != 0
    }

    /// Clear the bit for `mv`. Returns `false` if it was already clear or
    /// out of bounds.
    pub fn consume(&mut self, mv: Move) -> bool {
        if !self.contains(mv) {
            return false;
        }
        let i = mv.index();
        self.words[i / 64] &= !(1u64 << (i % 64));
        self.remaining -= 1;
        true
    }

    /// Iterate over available moves in index order.
    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        (0..self.len).map(Move::new).filter(|&mv| self.contains(mv))
    }

    /// 1.0 for available cells, 0.0 for consumed ones.
    #[must_use]
    pub fn to_mask(&self) -> Vec<f32> {
        (0..self.len)
            .map(|i| if self.contains(Move::new(i)) { 1.0 } else { 0.0 })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full() {
        let moves = AvailableMoves::full(70);
        assert_eq!(moves.len(), 70);
        assert_eq!(moves.remaining(), 70);
        assert!(moves.contains(Move::new(0)));
        assert!(moves.contains(Move::new(69)));
        assert!(!moves.contains(Move::new(70)));
        assert_eq!(moves.iter().count(), 70);
    }

    #[test]
    fn test_consume_once() {
        let mut moves = AvailableMoves::full(10);
        assert!(moves.consume(Move::new(3)));
        assert!(!moves.contains(Move::new(3)));
        assert_eq!(moves.remaining(), 9);

        assert!(!moves.consume(Move::new(3)));
        assert!(!moves.consume(Move::new(10)));
        assert_eq!(moves.remaining(), 9);
    }

    #[test]
    fn test_mask() {
        let mut moves = AvailableMoves::full(4);
        moves.consume(Move::new(1));
        assert_eq!(moves.to_mask(), vec![1.0, 0.0, 1.0, 1.0]);
        assert_eq!(moves.iter().collect::<Vec<_>>(), vec![Move(0), Move(2), Move(3)]);
    }

    #[test]
    fn test_word_boundary() {
        let moves = AvailableMoves::full(64);
        assert_eq!(moves.iter().count(), 64);
        assert!(!moves.contains(Move::new(64)));
    }
}
