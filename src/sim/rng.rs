//! Seeded pseudo-random generator
//!
//! Park-Miller linear congruential recurrence (multiplier 16807, modulus
//! 2^31 - 1). Every stream is fully determined by its integer seed, with no
//! global state, so identical seeds reproduce identical sequences across
//! platforms and runtimes. All procedural generation in this crate draws from
//! an instance of this generator.

use serde::{Deserialize, Serialize};

const MULTIPLIER: u64 = 16807;
const MODULUS: u64 = 2_147_483_647; // 2^31 - 1, a Mersenne prime

/// Deterministic LCG stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create a generator from any integer seed.
    ///
    /// The seed is folded into [1, modulus - 1]; zero maps to 1 because the
    /// recurrence has a fixed point at zero.
    pub fn new(seed: i64) -> Self {
        let folded = seed.rem_euclid(MODULUS as i64) as u32;
        Self {
            state: if folded == 0 { 1 } else { folded },
        }
    }

    /// Next value in [0, 1)
    pub fn next(&mut self) -> f64 {
        self.state = ((u64::from(self.state) * MULTIPLIER) % MODULUS) as u32;
        f64::from(self.state - 1) / (MODULUS - 1) as f64
    }

    /// Uniform float in [min, max)
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next() * (max - min)
    }

    /// Uniform integer in [min, max], inclusive on both ends
    pub fn int(&mut self, min: i32, max: i32) -> i32 {
        (f64::from(min) + self.next() * f64::from(max - min + 1)).floor() as i32
    }
}
