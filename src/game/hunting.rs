//! Hunting heuristic: after a hit, target the wounded ship's neighbors.
//!
//! ## States
//!
//! - **Idle**: no hits on an unsunk ship; defer to the policy
//! - **Tracking**: at least one hit, axis unknown; try all four neighbors
//! - **Directed**: two colinear hits fixed the axis; try the two cells
//!   along it
//!
//! A sink returns the strategy to Idle. Misses never change state.

use smallvec::SmallVec;

use super::available::AvailableMoves;
use crate::core::Move;

/// Axis inferred from consecutive hits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Unknown,
    Horizontal,
    Vertical,
}

/// Coarse state of the strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HuntPhase {
    Idle,
    Tracking,
    Directed,
}

/// Up to four follow-up targets.
pub type Targets = SmallVec<[Move; 4]>;

/// Stateful follow-up targeting, owned by a [`Board`](super::Board).
#[derive(Clone, Debug)]
pub struct HuntingStrategy {
    height: usize,
    width: usize,
    history: SmallVec<[Move; 8]>,
    direction: Direction,
}

impl HuntingStrategy {
    /// Create an idle strategy for a `height` x `width` board.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            history: SmallVec::new(),
            direction: Direction::Unknown,
        }
    }

    /// Clear history and direction in place.
    pub fn reset(&mut self) {
        self.history.clear();
        self.direction = Direction::Unknown;
    }

    /// Hits recorded on the current unsunk ship, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn phase(&self) -> HuntPhase {
        if self.history.is_empty() {
            HuntPhase::Idle
        } else if self.direction == Direction::Unknown {
            HuntPhase::Tracking
        } else {
            HuntPhase::Directed
        }
    }

    /// Candidate follow-up moves, or `None` if the caller should fall back
    /// to the policy.
    ///
    /// Candidates are neighbors of the most recent hit, restricted to the
    /// inferred axis once known, in the order left, right, up, down.
    #[must_use]
    pub fn propose_targets(&self, available: &AvailableMoves) -> Option<Targets> {
        let last = *self.history.last()?;
        let (row, col) = last.coords(self.width);

        let horizontal = self.direction != Direction::Vertical;
        let vertical = self.direction != Direction::Horizontal;

        let mut targets = Targets::new();
        if horizontal {
            if col > 0 {
                targets.push(Move::new(last.index() - 1));
            }
            if col + 1 < self.width {
                targets.push(Move::new(last.index() + 1));
            }
        }
        if vertical {
            if row > 0 {
                targets.push(Move::new(last.index() - self.width));
            }
            if row + 1 < self.height {
                targets.push(Move::new(last.index() + self.width));
            }
        }
        targets.retain(|mv| available.contains(*mv));

        if targets.is_empty() {
            None
        } else {
            Some(targets)
        }
    }

    /// Record the outcome of a resolved move.
    pub fn update(&mut self, mv: Move, hit: bool, sunk: bool) {
        if sunk {
            self.reset();
            return;
        }
        if !hit {
            return;
        }

        self.history.push(mv);
        if let [.., prev, last] = self.history[..] {
            let (r1, c1) = prev.coords(self.width);
            let (r2, c2) = last.coords(self.width);
            if r1 == r2 {
                self.direction = Direction::Horizontal;
            } else if c1 == c2 {
                self.direction = Direction::Vertical;
            }
            // Non-colinear hits cannot come from one straight ship; keep
            // whatever axis was already inferred.
        }
    }
}
