// src/simulation/random.rs

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Builds the generator owned by a single simulation run.
///
/// Each run gets its own instance, so concurrent runs never share state and
/// a recorded seed replays a run bit for bit.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draws a fresh seed for a caller that did not supply one.
pub fn fresh_seed() -> u64 {
    rand::thread_rng().next_u64()
}
