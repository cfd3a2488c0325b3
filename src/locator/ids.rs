//! Fresh-id generation by rejection sampling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws bounded before id-space exhaustion is treated as fatal.
const MAX_DRAWS: u32 = 4096;

/// Instance-owned source of unused 32-bit ids.
///
/// Each engine owns its source so deep copies stay independent and seeded
/// instances replay the same id sequence. Rejection sampling retries until
/// a draw is neither reserved nor in use; the loop is bounded so an
/// exhausted id space surfaces as a panic instead of silently handing out
/// a colliding fallback.
#[derive(Debug, Clone)]
pub struct IdSource {
    rng: StdRng,
}

impl IdSource {
    /// Source seeded from entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Source with a fixed seed; draws replay deterministically.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws an id that is not `reserved` and for which `in_use` is false.
    ///
    /// Panics after a bounded number of rejected draws; that many
    /// collisions means the caller has effectively exhausted the id space,
    /// which is a contract violation rather than a recoverable state.
    pub fn fresh_id<F>(&mut self, reserved: u32, in_use: F) -> u32
    where
        F: Fn(u32) -> bool,
    {
        for _ in 0..MAX_DRAWS {
            let id: u32 = self.rng.gen();
            if id != reserved && !in_use(id) {
                return id;
            }
        }
        panic!("id space exhausted after {} draws", MAX_DRAWS);
    }
}
