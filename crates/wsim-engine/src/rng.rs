//! RNG as a capability, not global state.
//!
//! Every resolution call takes a `&mut dyn Rng` rather than reaching for
//! `rand::thread_rng()` internally. Seeded variants back deterministic
//! tests and replay; unseeded variants back normal play. Call sites never
//! know which backs a given call.

use rand::{Rng as _, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A d6-oriented dice capability. `roll_d6` is the primitive every other
/// method is built from.
pub trait Rng {
    fn roll_d6(&mut self) -> u32;

    fn roll_2d6(&mut self) -> (u32, u32) {
        (self.roll_d6(), self.roll_d6())
    }

    fn roll_dice(&mut self, n: u32) -> Vec<u32> {
        (0..n).map(|_| self.roll_d6()).collect()
    }
}

/// Deterministic and reproducible across runs given the same seed.
/// Backed by `ChaCha8Rng` — same PRNG the teacher workspace uses for its
/// own simulation engine.
pub struct SeededRng {
    inner: ChaCha8Rng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Rng for SeededRng {
    fn roll_d6(&mut self) -> u32 {
        self.inner.gen_range(1..=6)
    }
}

/// Backed by OS entropy. Used for normal gameplay.
pub struct UnseededRng {
    inner: rand::rngs::ThreadRng,
}

impl UnseededRng {
    pub fn new() -> Self {
        Self {
            inner: rand::thread_rng(),
        }
    }
}

impl Default for UnseededRng {
    fn default() -> Self {
        Self::new()
    }
}

impl Rng for UnseededRng {
    fn roll_d6(&mut self) -> u32 {
        self.inner.gen_range(1..=6)
    }
}
