//! Board: ship layout, observed view, and bombardment resolution.
//!
//! Each cell is a single record holding ground truth (which ship, if any),
//! what the shooter has observed, and the numeric signal fed to the policy,
//! so the three can never drift apart.

use std::fmt;

use tracing::debug;

use super::available::AvailableMoves;
use super::hunting::HuntingStrategy;
use crate::core::{
    BattleshipError, BoardConfig, GameRng, InvalidMoveReason, Move, Orientation, Placement,
    ShipSpec,
};
use crate::nn::EncodedState;

/// What the shooter sees in a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CellView {
    #[default]
    Unknown,
    Miss,
    /// Hit on a ship that is still afloat.
    Hit,
    /// Cell of a sunk ship, shown with that ship's symbol.
    Sunk(char),
}

impl CellView {
    /// Display symbol: `-` unknown, `X` miss, `O` hit, ship symbol if sunk.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            CellView::Unknown => '-',
            CellView::Miss => 'X',
            CellView::Hit => 'O',
            CellView::Sunk(symbol) => symbol,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Cell {
    /// Catalog index of the ship occupying this cell.
    ship: Option<usize>,
    view: CellView,
    /// 0 unresolved, +1 hit, -1 miss.
    signal: i8,
}

/// A placed ship and how much of it is left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShipInstance {
    pub symbol: char,
    pub length: usize,
    pub remaining: usize,
}

impl ShipInstance {
    fn new(spec: &ShipSpec) -> Self {
        Self {
            symbol: spec.symbol,
            length: spec.length,
            remaining: spec.length,
        }
    }

    #[must_use]
    pub fn is_sunk(&self) -> bool {
        self.remaining == 0
    }
}

/// Outcome of a resolved move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub hit: bool,
    pub sunk: bool,
}

/// One player's board for one match.
#[derive(Clone, Debug)]
pub struct Board {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
    ships: Vec<ShipInstance>,
    available: AvailableMoves,
    hunting: HuntingStrategy,
}

impl Board {
    fn empty(config: &BoardConfig) -> Self {
        let size = config.board_size();
        Self {
            height: config.height,
            width: config.width,
            cells: vec![Cell::default(); size],
            ships: config.ships.iter().map(ShipInstance::new).collect(),
            available: AvailableMoves::full(size),
            hunting: HuntingStrategy::new(config.height, config.width),
        }
    }

    /// Create a board with a uniformly random feasible layout.
    ///
    /// Fails with [`BattleshipError::Placement`] if some ship has no room.
    pub fn new(config: &BoardConfig, rng: &mut GameRng) -> Result<Self, BattleshipError> {
        let mut board = Self::empty(config);
        board.place(config, rng)?;
        Ok(board)
    }

    /// Create a board from explicit placements, one per catalog ship.
    pub fn with_layout(
        config: &BoardConfig,
        placements: &[Placement],
    ) -> Result<Self, BattleshipError> {
        if placements.len() != config.ships.len() {
            return Err(BattleshipError::InvalidLayout(format!(
                "expected {} placements, got {}",
                config.ships.len(),
                placements.len()
            )));
        }
        let mut board = Self::empty(config);
        for (index, (spec, placement)) in config.ships.iter().zip(placements).enumerate() {
            if !board.is_free(spec.length, placement) {
                return Err(BattleshipError::InvalidLayout(format!(
                    "ship '{}' at {:?} is out of bounds or overlaps",
                    spec.symbol, placement
                )));
            }
            board.put_ship(index, spec.length, placement);
        }
        Ok(board)
    }

    fn place(&mut self, config: &BoardConfig, rng: &mut GameRng) -> Result<(), BattleshipError> {
        for (index, spec) in config.ships.iter().enumerate() {
            let candidates = self.candidate_placements(spec.length);
            let placement = rng.choose(&candidates).ok_or(BattleshipError::Placement {
                symbol: spec.symbol,
                length: spec.length,
            })?;
            self.put_ship(index, spec.length, placement);
        }
        Ok(())
    }

    /// Every horizontal and vertical run of `length` empty in-bounds cells.
    #[must_use]
    pub fn candidate_placements(&self, length: usize) -> Vec<Placement> {
        let mut candidates = Vec::new();
        for row in 0..self.height {
            for col in 0..self.width {
                for orientation in [Orientation::Horizontal, Orientation::Vertical] {
                    let placement = Placement::new(row, col, orientation);
                    if self.is_free(length, &placement) {
                        candidates.push(placement);
                    }
                }
            }
        }
        candidates
    }

    fn is_free(&self, length: usize, placement: &Placement) -> bool {
        placement.fits(length, self.height, self.width)
            && placement
                .cells(length)
                .all(|(r, c)| self.cells[r * self.width + c].ship.is_none())
    }

    fn put_ship(&mut self, index: usize, length: usize, placement: &Placement) {
        for (r, c) in placement.cells(length) {
            self.cells[r * self.width + c].ship = Some(index);
        }
    }

    /// Bomb a cell.
    ///
    /// The move must be in bounds and not yet consumed; otherwise
    /// [`BattleshipError::InvalidMove`] is returned and the board is left
    /// untouched.
    pub fn resolve(&mut self, mv: Move) -> Result<Resolution, BattleshipError> {
        let index = mv.index();
        if index >= self.cells.len() {
            return Err(BattleshipError::InvalidMove {
                index,
                reason: InvalidMoveReason::OutOfBounds,
            });
        }
        if !self.available.consume(mv) {
            return Err(BattleshipError::InvalidMove {
                index,
                reason: InvalidMoveReason::AlreadyConsumed,
            });
        }

        let resolution = match self.cells[index].ship {
            Some(ship_index) => {
                self.cells[index].signal = 1;
                let ship = &mut self.ships[ship_index];
                ship.remaining -= 1;
                let sunk = ship.remaining == 0;
                if sunk {
                    let symbol = ship.symbol;
                    for cell in self.cells.iter_mut().filter(|c| c.ship == Some(ship_index)) {
                        cell.view = CellView::Sunk(symbol);
                    }
                    debug!(%mv, ship = %symbol, "ship sunk");
                } else {
                    self.cells[index].view = CellView::Hit;
                }
                Resolution { hit: true, sunk }
            }
            None => {
                self.cells[index].signal = -1;
                self.cells[index].view = CellView::Miss;
                Resolution {
                    hit: false,
                    sunk: false,
                }
            }
        };
        debug!(%mv, hit = resolution.hit, sunk = resolution.sunk, "move resolved");

        self.hunting.update(mv, resolution.hit, resolution.sunk);
        Ok(resolution)
    }

    /// True once every ship is sunk.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.ships.iter().all(ShipInstance::is_sunk)
    }

    /// Encode the current state for the policy. Recomputed on every call.
    #[must_use]
    pub fn encode(&self) -> EncodedState {
        let size = self.size();
        let mut tensor = Vec::with_capacity(size * (self.ships.len() + 1));
        tensor.extend(self.cells.iter().map(|c| f32::from(c.signal)));
        for ship in &self.ships {
            let afloat = if ship.is_sunk() { 0.0 } else { 1.0 };
            tensor.extend(std::iter::repeat(afloat).take(size));
        }
        EncodedState::new(tensor, vec![self.ships.len() + 1, self.height, self.width])
    }

    /// Cells not yet bombed.
    #[must_use]
    pub fn available(&self) -> &AvailableMoves {
        &self.available
    }

    /// Policy-facing availability mask (1.0 available, 0.0 consumed).
    #[must_use]
    pub fn available_mask(&self) -> Vec<f32> {
        self.available.to_mask()
    }

    /// Available moves in index order.
    #[must_use]
    pub fn available_moves(&self) -> Vec<Move> {
        self.available.iter().collect()
    }

    /// The hunting strategy tracking hits on this board.
    #[must_use]
    pub fn hunting(&self) -> &HuntingStrategy {
        &self.hunting
    }

    /// Ship instances in catalog order.
    #[must_use]
    pub fn ships(&self) -> &[ShipInstance] {
        &self.ships
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of cells.
    #[must_use]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Sum of all ship lengths.
    #[must_use]
    pub fn total_ship_cells(&self) -> usize {
        self.ships.iter().map(|s| s.length).sum()
    }

    fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.height && col < self.width {
            self.cells.get(row * self.width + col)
        } else {
            None
        }
    }

    /// Observed view of a cell.
    #[must_use]
    pub fn view(&self, row: usize, col: usize) -> Option<CellView> {
        self.cell(row, col).map(|c| c.view)
    }

    /// Ground truth: symbol of the ship occupying a cell.
    #[must_use]
    pub fn ship_at(&self, row: usize, col: usize) -> Option<char> {
        let ship = self.cell(row, col)?.ship?;
        self.ships.get(ship).map(|s| s.symbol)
    }

    /// Numeric signal of a cell.
    #[must_use]
    pub fn signal(&self, row: usize, col: usize) -> Option<i8> {
        self.cell(row, col).map(|c| c.signal)
    }

    /// Observed view as text: a column header, then one line per row.
    #[must_use]
    pub fn view_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.height + 1);
        let header: Vec<String> = (0..self.width).map(|c| c.to_string()).collect();
        lines.push(format!("  {}", header.join(" ")));
        for (r, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            let symbols: Vec<String> = row.iter().map(|c| c.view.symbol().to_string()).collect();
            lines.push(format!("{} {}", r, symbols.join(" ")));
        }
        lines
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.view_lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::HuntPhase;

    fn two_ship_config() -> BoardConfig {
        BoardConfig::new(4, 4).with_ships(vec![ShipSpec::new('@', 3), ShipSpec::new('#', 2)])
    }

    fn fixed_board() -> Board {
        // @ @ @ -
        // - - - -
        // # - - -
        // # - - -
        Board::with_layout(
            &two_ship_config(),
            &[Placement::horizontal(0, 0), Placement::vertical(2, 0)],
        )
        .unwrap()
    }

    #[test]
    fn test_random_layout_counts() {
        let config = two_ship_config();
        let mut rng = GameRng::new(42);
        let board = Board::new(&config, &mut rng).unwrap();

        let occupied = board.cells.iter().filter(|c| c.ship.is_some()).count();
        assert_eq!(occupied, 5);
        assert_eq!(board.total_ship_cells(), 5);
        assert!(!board.is_finished());
    }

    #[test]
    fn test_placement_deterministic() {
        let config = two_ship_config();
        let a = Board::new(&config, &mut GameRng::new(7)).unwrap();
        let b = Board::new(&config, &mut GameRng::new(7)).unwrap();
        for r in 0..4 {
            for c in 0..4 {
                assert_eq!(a.ship_at(r, c), b.ship_at(r, c));
            }
        }
    }

    #[test]
    fn test_candidate_placements_count() {
        let board = Board::empty(&BoardConfig::new(3, 3));
        // 3 rows x 2 horizontal anchors + 3 cols x 2 vertical anchors
        assert_eq!(board.candidate_placements(2).len(), 12);
        assert_eq!(board.candidate_placements(4).len(), 0);
    }

    #[test]
    fn test_placement_error_when_no_room() {
        let config = BoardConfig::new(2, 2).with_ships(vec![ShipSpec::new('A', 3)]);
        let err = Board::new(&config, &mut GameRng::new(1)).unwrap_err();
        assert_eq!(
            err,
            BattleshipError::Placement {
                symbol: 'A',
                length: 3
            }
        );
    }

    #[test]
    fn test_placement_error_when_earlier_ships_fill_board() {
        let config = BoardConfig::new(1, 4)
            .with_ships(vec![ShipSpec::new('A', 2), ShipSpec::new('B', 2), ShipSpec::new('C', 1)]);
        let err = Board::new(&config, &mut GameRng::new(3)).unwrap_err();
        assert!(matches!(err, BattleshipError::Placement { .. }));
    }

    #[test]
    fn test_with_layout_rejects_overlap() {
        let err = Board::with_layout(
            &two_ship_config(),
            &[Placement::horizontal(0, 0), Placement::vertical(0, 1)],
        )
        .unwrap_err();
        assert!(matches!(err, BattleshipError::InvalidLayout(_)));
    }

    #[test]
    fn test_with_layout_rejects_out_of_bounds_and_count() {
        let config = two_ship_config();
        assert!(Board::with_layout(
            &config,
            &[Placement::horizontal(0, 2), Placement::vertical(2, 0)]
        )
        .is_err());
        assert!(Board::with_layout(&config, &[Placement::horizontal(0, 0)]).is_err());
    }

    #[test]
    fn test_resolve_miss() {
        let mut board = fixed_board();
        let res = board.resolve(Move::from_coords(1, 1, 4)).unwrap();

        assert_eq!(res, Resolution { hit: false, sunk: false });
        assert_eq!(board.view(1, 1), Some(CellView::Miss));
        assert_eq!(board.signal(1, 1), Some(-1));
        assert!(!board.available().contains(Move::from_coords(1, 1, 4)));
        assert_eq!(board.hunting().phase(), HuntPhase::Idle);
    }

    #[test]
    fn test_resolve_hit_not_sunk() {
        let mut board = fixed_board();
        let res = board.resolve(Move::from_coords(0, 1, 4)).unwrap();

        assert_eq!(res, Resolution { hit: true, sunk: false });
        assert_eq!(board.view(0, 1), Some(CellView::Hit));
        assert_eq!(board.signal(0, 1), Some(1));
        assert_eq!(board.ships()[0].remaining, 2);
        assert_eq!(board.hunting().history(), &[Move::from_coords(0, 1, 4)]);
    }

    #[test]
    fn test_sink_marks_ship_symbol() {
        let mut board = fixed_board();
        board.resolve(Move::from_coords(2, 0, 4)).unwrap();
        let res = board.resolve(Move::from_coords(3, 0, 4)).unwrap();

        assert_eq!(res, Resolution { hit: true, sunk: true });
        assert_eq!(board.view(2, 0), Some(CellView::Sunk('#')));
        assert_eq!(board.view(3, 0), Some(CellView::Sunk('#')));
        assert!(board.ships()[1].is_sunk());
        assert_eq!(board.hunting().phase(), HuntPhase::Idle);
        assert!(!board.is_finished());

        for col in 0..3 {
            board.resolve(Move::from_coords(0, col, 4)).unwrap();
        }
        assert!(board.is_finished());
        assert_eq!(board.view(0, 0), Some(CellView::Sunk('@')));
    }

    #[test]
    fn test_hunting_history_shared_across_ships() {
        let mut board = fixed_board();
        board.resolve(Move::from_coords(0, 1, 4)).unwrap();
        board.resolve(Move::from_coords(2, 0, 4)).unwrap();

        // Hits on '@' and '#' share one history; the pair is not colinear.
        assert_eq!(
            board.hunting().history(),
            &[Move::from_coords(0, 1, 4), Move::from_coords(2, 0, 4)]
        );
        assert_eq!(board.hunting().phase(), HuntPhase::Tracking);

        // Sinking '#' clears the whole history, including the '@' hit.
        let res = board.resolve(Move::from_coords(3, 0, 4)).unwrap();
        assert!(res.sunk);
        assert!(board.hunting().history().is_empty());
        assert_eq!(board.hunting().phase(), HuntPhase::Idle);
        assert_eq!(board.ships()[0].remaining, 2);
        assert_eq!(board.view(0, 1), Some(CellView::Hit));
    }

    #[test]
    fn test_resolve_consumed_move_leaves_board_unchanged() {
        let mut board = fixed_board();
        board.resolve(Move::from_coords(0, 0, 4)).unwrap();

        let encoded = board.encode();
        let remaining = board.available().remaining();
        let history = board.hunting().history().to_vec();

        let err = board.resolve(Move::from_coords(0, 0, 4)).unwrap_err();
        assert_eq!(
            err,
            BattleshipError::InvalidMove {
                index: 0,
                reason: InvalidMoveReason::AlreadyConsumed
            }
        );
        assert_eq!(board.encode(), encoded);
        assert_eq!(board.available().remaining(), remaining);
        assert_eq!(board.hunting().history(), history.as_slice());
        assert_eq!(board.ships()[0].remaining, 2);
    }

    #[test]
    fn test_resolve_out_of_bounds() {
        let mut board = fixed_board();
        let err = board.resolve(Move::new(16)).unwrap_err();
        assert!(matches!(
            err,
            BattleshipError::InvalidMove {
                reason: InvalidMoveReason::OutOfBounds,
                ..
            }
        ));
        assert_eq!(board.available().remaining(), 16);
    }

    #[test]
    fn test_encode_layout() {
        let mut board = fixed_board();
        board.resolve(Move::from_coords(0, 0, 4)).unwrap();
        board.resolve(Move::from_coords(1, 0, 4)).unwrap();
        board.resolve(Move::from_coords(2, 0, 4)).unwrap();
        board.resolve(Move::from_coords(3, 0, 4)).unwrap();

        let encoded = board.encode();
        assert_eq!(encoded.len(), 16 * 3);
        assert_eq!(encoded.shape, vec![3, 4, 4]);

        let signal = encoded.plane(0).unwrap();
        assert_eq!(signal[0], 1.0);
        assert_eq!(signal[4], -1.0);
        assert_eq!(signal[8], 1.0);
        assert_eq!(signal[12], 1.0);
        assert_eq!(signal[1], 0.0);

        // '@' still afloat, '#' sunk.
        assert!(encoded.plane(1).unwrap().iter().all(|&v| v == 1.0));
        assert!(encoded.plane(2).unwrap().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_available_mask() {
        let mut board = fixed_board();
        board.resolve(Move::new(5)).unwrap();
        let mask = board.available_mask();
        assert_eq!(mask.len(), 16);
        assert_eq!(mask[5], 0.0);
        assert_eq!(mask.iter().sum::<f32>(), 15.0);
        assert_eq!(board.available_moves().len(), 15);
    }

    #[test]
    fn test_view_lines() {
        let mut board = fixed_board();
        board.resolve(Move::from_coords(1, 1, 4)).unwrap();
        board.resolve(Move::from_coords(0, 2, 4)).unwrap();

        let lines = board.view_lines();
        assert_eq!(lines[0], "  0 1 2 3");
        assert_eq!(lines[1], "0 - - O -");
        assert_eq!(lines[2], "1 - X - -");
        assert_eq!(board.to_string().lines().count(), 5);
    }
}
