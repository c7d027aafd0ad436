//! Property tests over random layouts and self-play.

use battleship_rl::core::{BoardConfig, GameRng, ShipSpec};
use battleship_rl::game::{Board, Game};
use battleship_rl::nn::UniformPolicy;
use battleship_rl::training::shape_rewards;
use proptest::prelude::*;

fn catalog() -> impl Strategy<Value = Vec<ShipSpec>> {
    prop::collection::vec(1usize..=4, 1..=3).prop_map(|lengths| {
        lengths
            .into_iter()
            .zip(['@', '#', '%'])
            .map(|(length, symbol)| ShipSpec::new(symbol, length))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_placement_covers_exact_cells(
        height in 6usize..=8,
        width in 6usize..=8,
        ships in catalog(),
        seed in any::<u64>(),
    ) {
        let config = BoardConfig::new(height, width).with_ships(ships);
        let board = Board::new(&config, &mut GameRng::new(seed)).unwrap();

        let mut per_ship = vec![0usize; config.ships.len()];
        for r in 0..height {
            for c in 0..width {
                if let Some(symbol) = board.ship_at(r, c) {
                    let index = config.ships.iter().position(|s| s.symbol == symbol).unwrap();
                    per_ship[index] += 1;
                }
            }
        }
        for (spec, count) in config.ships.iter().zip(&per_ship) {
            prop_assert_eq!(spec.length, *count);
        }
    }

    #[test]
    fn prop_self_play_never_repeats(seed in any::<u64>()) {
        let config = BoardConfig::default();
        let policy = UniformPolicy::new(config.board_size());
        let mut game = Game::new(config.clone(), seed).unwrap();

        let mut seen = vec![false; config.board_size()];
        while let Some(turn) = game.take_move(&policy, None).unwrap() {
            prop_assert!(!seen[turn.mv.index()]);
            seen[turn.mv.index()] = true;
        }
        prop_assert!(game.board().is_finished());
    }

    #[test]
    fn prop_rewards_finite_and_sized(
        hits in prop::collection::vec(any::<bool>(), 0..40),
        gamma in 0.05f64..0.95,
    ) {
        let total = hits.iter().filter(|&&h| h).count();
        let rewards = shape_rewards(&hits, total, 36, gamma);
        prop_assert_eq!(rewards.len(), hits.len());
        prop_assert!(rewards.iter().all(|r| r.is_finite()));
    }
}
