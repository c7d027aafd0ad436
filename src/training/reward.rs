//! Baseline-subtracted discounted rewards.
//!
//! At step `i` the expected hit rate of a blind shot is
//! `remaining ship cells / remaining cells`. Each step's advantage is the
//! actual hit (0 or 1) minus that baseline, and the return at step `i` is
//! the discounted sum of advantages from `i` onward:
//!
//! ```text
//! weighted_i = (hit_i - ship_left_i / cells_left_i) * gamma^i
//! reward_i   = gamma^-i * sum_{j >= i} weighted_j
//! ```
//!
//! A hit late in the game, when most remaining cells hold ships, earns
//! little; an early hit against long odds earns a lot.

/// Compute per-step shaped rewards for one episode.
///
/// `hits[i]` is whether move `i` hit a ship. `gamma` should lie in (0, 1).
///
/// When `cells_left_i` is zero (only possible if the episode ran past the
/// board size) the weighted term falls back to the raw hit flag.
///
/// ```
/// use battleship_rl::training::shape_rewards;
///
/// let rewards = shape_rewards(&[false, true, true], 2, 4, 0.5);
/// assert!((rewards[0] + 0.208333).abs() < 1e-5);
/// assert!((rewards[1] - 0.583333).abs() < 1e-5);
/// assert!((rewards[2] - 0.5).abs() < 1e-9);
/// ```
#[must_use]
pub fn shape_rewards(
    hits: &[bool],
    total_ship_cells: usize,
    board_size: usize,
    gamma: f64,
) -> Vec<f64> {
    // gamma^-i * weighted_i, which stays O(1) instead of underflowing.
    let mut hits_so_far = 0usize;
    let advantages: Vec<f64> = hits
        .iter()
        .enumerate()
        .map(|(i, &hit)| {
            let h = if hit { 1.0 } else { 0.0 };
            let cells_left = board_size as f64 - i as f64;
            let ships_left = total_ship_cells as f64 - hits_so_far as f64;
            if hit {
                hits_so_far += 1;
            }
            if cells_left > 0.0 {
                h - ships_left / cells_left
            } else {
                h * gamma.powi(-(i as i32))
            }
        })
        .collect();

    // reward_i = advantage_i + gamma * reward_{i+1}
    let mut rewards = vec![0.0; advantages.len()];
    let mut carry = 0.0;
    for (i, adv) in advantages.iter().enumerate().rev() {
        carry = adv + gamma * carry;
        rewards[i] = carry;
    }
    rewards
}
