//! Battleship rules: boards, the hunting heuristic, and the turn controller.
//!
//! - `Board` owns ground truth, the observed view, and availability, and
//!   resolves bombardments
//! - `HuntingStrategy` proposes follow-up targets after a hit
//! - `Game` picks each move (explicit, hunt, policy, or exploration) and
//!   applies it

mod available;
mod board;
#[allow(clippy::module_inception)]
mod game;
mod hunting;

pub use available::AvailableMoves;
pub use board::{Board, CellView, Resolution, ShipInstance};
pub use game::{Game, MoveSource, Turn};
pub use hunting::{Direction, HuntPhase, HuntingStrategy, Targets};
