use battleship_rl::core::{BoardConfig, GameRng};
use battleship_rl::game::{Board, Game};
use battleship_rl::nn::{SoftmaxPolicy, UniformPolicy};
use battleship_rl::training::{shape_rewards, Trainer, TrainingConfig};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::hint::black_box;

fn bench_placement(c: &mut Criterion) {
    let config = BoardConfig::default();
    c.bench_function("board/place_6x6", |b| {
        let mut rng = GameRng::new(1);
        b.iter(|| black_box(Board::new(&config, &mut rng)))
    });
}

fn bench_episode(c: &mut Criterion) {
    let config = BoardConfig::default();
    let uniform = UniformPolicy::new(config.board_size());
    let softmax = SoftmaxPolicy::for_board(&config);

    c.bench_function("episode/uniform", |b| {
        b.iter_batched(
            || Game::new(config.clone(), 7).ok(),
            |game| {
                let mut moves = 0usize;
                if let Some(mut game) = game {
                    while let Ok(Some(_)) = game.take_move(&uniform, None) {
                        moves += 1;
                    }
                }
                black_box(moves)
            },
            BatchSize::SmallInput,
        )
    });
    c.bench_function("episode/softmax", |b| {
        b.iter_batched(
            || Game::new(config.clone(), 7).ok(),
            |game| {
                let mut moves = 0usize;
                if let Some(mut game) = game {
                    while let Ok(Some(_)) = game.take_move(&softmax, None) {
                        moves += 1;
                    }
                }
                black_box(moves)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_rewards(c: &mut Criterion) {
    let hits: Vec<bool> = (0..100).map(|i| i % 5 == 0).collect();
    c.bench_function("rewards/shape_100", |b| {
        b.iter(|| black_box(shape_rewards(black_box(&hits), 20, 100, 0.5)))
    });
}

fn bench_train_episode(c: &mut Criterion) {
    let config = TrainingConfig::default().with_seed(3);
    let policy = SoftmaxPolicy::for_board(&config.board);
    let Ok(mut trainer) = Trainer::new(config, policy) else {
        return;
    };
    c.bench_function("trainer/train_episode", |b| {
        b.iter(|| black_box(trainer.train_episode().ok()))
    });
}

criterion_group!(
    benches,
    bench_placement,
    bench_episode,
    bench_rewards,
    bench_train_episode
);
criterion_main!(benches);
