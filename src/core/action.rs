//! Move representation: a linear cell index on the board.
//!
//! A move is the only action in Battleship: bomb one cell. Cells are
//! addressed row-major, so `index = row * width + col`. The same index space
//! is used for policy outputs and availability masks.

use serde::{Deserialize, Serialize};

/// A bombardment target, as a linear row-major cell index.
///
/// ## Example
///
/// ```
/// use battleship_rl::core::Move;
///
/// let mv = Move::from_coords(2, 3, 6);
/// assert_eq!(mv.index(), 15);
/// assert_eq!(mv.coords(6), (2, 3));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Move(pub usize);

impl Move {
    /// Create a move from a raw linear index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Create a move from (row, col) on a board of the given width.
    #[must_use]
    pub const fn from_coords(row: usize, col: usize, width: usize) -> Self {
        Self(row * width + col)
    }

    /// Get the raw linear index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Split into (row, col) on a board of the given width.
    #[must_use]
    pub const fn coords(self, width: usize) -> (usize, usize) {
        (self.0 / width, self.0 % width)
    }

    /// Row on a board of the given width.
    #[must_use]
    pub const fn row(self, width: usize) -> usize {
        self.0 / width
    }

    /// Column on a board of the given width.
    #[must_use]
    pub const fn col(self, width: usize) -> usize {
        self.0 % width
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Move({})", self.0)
    }
}

/// Ship orientation on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Ship extends to the right (increasing column).
    Horizontal,
    /// Ship extends downward (increasing row).
    Vertical,
}

/// Anchor cell plus orientation of a placed ship.
///
/// The anchor is the top-left cell; the ship occupies `length` cells
/// extending along `orientation`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub orientation: Orientation,
}

impl Placement {
    /// Create a new placement.
    #[must_use]
    pub const fn new(row: usize, col: usize, orientation: Orientation) -> Self {
        Self { row, col, orientation }
    }

    /// Horizontal placement anchored at (row, col).
    #[must_use]
    pub const fn horizontal(row: usize, col: usize) -> Self {
        Self::new(row, col, Orientation::Horizontal)
    }

    /// Vertical placement anchored at (row, col).
    #[must_use]
    pub const fn vertical(row: usize, col: usize) -> Self {
        Self::new(row, col, Orientation::Vertical)
    }

    /// Check that a ship of `length` fits inside a `height` x `width` board.
    #[must_use]
    pub fn fits(&self, length: usize, height: usize, width: usize) -> bool {
        if length == 0 || self.row >= height || self.col >= width {
            return false;
        }
        match self.orientation {
            Orientation::Horizontal => self.col + length <= width,
            Orientation::Vertical => self.row + length <= height,
        }
    }

    /// Iterate over the (row, col) cells covered by a ship of `length`.
    ///
    /// Callers must check [`Placement::fits`] first.
    pub fn cells(&self, length: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..length).map(move |k| match self.orientation {
            Orientation::Horizontal => (self.row, self.col + k),
            Orientation::Vertical => (self.row + k, self.col),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_coords() {
        let mv = Move::from_coords(3, 1, 5);
        assert_eq!(mv.index(), 16);
        assert_eq!(mv.row(5), 3);
        assert_eq!(mv.col(5), 1);
        assert_eq!(mv.coords(5), (3, 1));
    }

    #[test]
    fn test_move_display() {
        assert_eq!(format!("{}", Move::new(7)), "Move(7)");
    }

    #[test]
    fn test_placement_fits() {
        assert!(Placement::horizontal(0, 3).fits(3, 6, 6));
        assert!(!Placement::horizontal(0, 4).fits(3, 6, 6));
        assert!(Placement::vertical(3, 0).fits(3, 6, 6));
        assert!(!Placement::vertical(4, 0).fits(3, 6, 6));
        assert!(!Placement::vertical(0, 6).fits(1, 6, 6));
        assert!(!Placement::vertical(0, 0).fits(0, 6, 6));
    }

    #[test]
    fn test_placement_cells() {
        let h: Vec<_> = Placement::horizontal(1, 2).cells(3).collect();
        assert_eq!(h, vec![(1, 2), (1, 3), (1, 4)]);

        let v: Vec<_> = Placement::vertical(1, 2).cells(2).collect();
        assert_eq!(v, vec![(1, 2), (2, 2)]);
    }
}
