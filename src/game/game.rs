//! Turn controller: resolve each turn to a concrete move and apply it.

use tracing::trace;

use super::board::Board;
use crate::core::{BattleshipError, BoardConfig, GameRng, Move};
use crate::nn::{EncodedState, Policy};

/// Record of one applied move.
#[derive(Clone, Debug, PartialEq)]
pub struct Turn {
    /// Encoded board state before the move.
    pub state: EncodedState,
    pub mv: Move,
    pub hit: bool,
    pub sunk: bool,
}

/// How a move was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveSource {
    /// Supplied by the caller (human play).
    Explicit,
    /// Proposed by the hunting heuristic.
    Hunt,
    /// Arg-max of the policy's masked prediction.
    Policy,
    /// Uniformly random exploration.
    Explore,
}

/// One match against a single board.
///
/// The game owns its board and RNG; the policy is borrowed per call so a
/// single policy can drive many games.
#[derive(Clone, Debug)]
pub struct Game {
    config: BoardConfig,
    board: Board,
    rng: GameRng,
}

impl Game {
    /// Create a game with a freshly placed board.
    pub fn new(config: BoardConfig, seed: u64) -> Result<Self, BattleshipError> {
        Self::with_rng(config, GameRng::new(seed))
    }

    /// Create a game that places its board and selects moves with `rng`,
    /// e.g. a fork of a match-level RNG.
    pub fn with_rng(config: BoardConfig, mut rng: GameRng) -> Result<Self, BattleshipError> {
        let board = Board::new(&config, &mut rng)?;
        Ok(Self { config, board, rng })
    }

    /// Create a game around an existing board (e.g. a fixed layout).
    pub fn with_board(config: BoardConfig, board: Board, seed: u64) -> Self {
        Self {
            config,
            board,
            rng: GameRng::new(seed),
        }
    }

    /// Replace the board with a fresh random layout for the next episode.
    pub fn reset(&mut self) -> Result<(), BattleshipError> {
        self.board = Board::new(&self.config, &mut self.rng)?;
        Ok(())
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Play one turn.
    ///
    /// Returns `Ok(None)` once every ship is sunk. An explicit move is used
    /// as given and must be in bounds and unconsumed. Otherwise the hunting
    /// heuristic is consulted first, then the policy under epsilon-greedy.
    pub fn take_move<P: Policy + ?Sized>(
        &mut self,
        policy: &P,
        explicit: Option<Move>,
    ) -> Result<Option<Turn>, BattleshipError> {
        if self.board.is_finished() {
            return Ok(None);
        }
        let state = self.board.encode();

        let (mv, source) = match explicit {
            Some(mv) => (mv, MoveSource::Explicit),
            None => self.select_move(policy, &state)?,
        };

        let resolution = self.board.resolve(mv)?;
        trace!(%mv, ?source, hit = resolution.hit, "turn taken");

        Ok(Some(Turn {
            state,
            mv,
            hit: resolution.hit,
            sunk: resolution.sunk,
        }))
    }

    fn select_move<P: Policy + ?Sized>(
        &mut self,
        policy: &P,
        state: &EncodedState,
    ) -> Result<(Move, MoveSource), BattleshipError> {
        if let Some(targets) = self.board.hunting().propose_targets(self.board.available()) {
            if let Some(&mv) = self.rng.choose(&targets) {
                return Ok((mv, MoveSource::Hunt));
            }
        }

        if self.rng.gen_f64() >= policy.epsilon() {
            let probs = policy.predict(state);
            if let Some(mv) = masked_argmax(&probs, &self.board.available_moves()) {
                return Ok((mv, MoveSource::Policy));
            }
        }

        let moves = self.board.available_moves();
        // Unreachable while the board is unfinished: every ship has an
        // unconsumed cell.
        let mv = self.rng.choose(&moves).copied().ok_or(BattleshipError::InvalidLayout(
            "no available moves on an unfinished board".into(),
        ))?;
        Ok((mv, MoveSource::Explore))
    }
}

/// Highest-probability available move; ties go to the lowest index.
///
/// Missing entries count as zero and non-finite entries are skipped.
fn masked_argmax(probs: &[f32], available: &[Move]) -> Option<Move> {
    let mut best: Option<(Move, f32)> = None;
    for &mv in available {
        let p = probs.get(mv.index()).copied().unwrap_or(0.0);
        if !p.is_finite() {
            continue;
        }
        if best.map_or(true, |(_, bp)| p > bp) {
            best = Some((mv, p));
        }
    }
    best.map(|(mv, _)| mv)
}
