//! Seedable uniform index source.

use std::sync::Mutex;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::traits::RandomSource;

/// [`RandomSource`] over a `SmallRng`.
pub struct SeededRandom {
    rng: Mutex<SmallRng>,
}

impl SeededRandom {
    /// Reproducible sequence for a given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    /// Seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self {
            rng: Mutex::new(SmallRng::from_os_rng()),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick(&self, upper: usize) -> usize {
        debug_assert!(upper > 0, "pick from an empty range");
        if upper <= 1 {
            return 0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.random_range(0..upper)
    }
}
