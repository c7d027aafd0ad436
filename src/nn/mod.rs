//! Policy integration.
//!
//! ## Overview
//!
//! - **Traits**: `Policy` is the only interface the engine needs from a model
//! - **Encoding**: `EncodedState`, produced by `Board::encode`
//! - **Baselines**: `UniformPolicy` (always explore), `SoftmaxPolicy`
//!   (linear softmax trained by weighted cross-entropy)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use battleship_rl::nn::{Policy, SoftmaxPolicy, load_or_default};
//!
//! let mut policy = SoftmaxPolicy::for_board(&config);
//! load_or_default(&mut policy, Path::new("models/policy.bin"));
//!
//! let probs = policy.predict(&board.encode());
//! ```

pub mod softmax;
pub mod traits;

pub use softmax::{EpsilonSchedule, SoftmaxPolicy};
pub use traits::{load_or_default, EncodedState, Policy, UniformPolicy};
