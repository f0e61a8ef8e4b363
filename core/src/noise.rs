//! noise.rs
//! Seedable source of binary noise pixels.
//!
//! Filler pixels carry no information; they only need to be independent
//! and uniform over {0, 255}. Not cryptographically strong, and it does
//! not need to be. Seeding makes encoder output reproducible in tests.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::constants::{BITS_PER_BYTE, PIXEL_OFF, PIXEL_ON};
use crate::utils::{bit_at, ceil_div};

/// One random bit per pixel, drawn from any `RngCore`.
#[derive(Debug, Clone)]
pub struct NoiseSource<R: RngCore = StdRng> {
    rng: R,
    scratch: Vec<u8>,
}

impl NoiseSource<StdRng> {
    /// Deterministic source for reproducible output.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from the OS.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: RngCore> NoiseSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng, scratch: Vec::new() }
    }

    /// Overwrite every pixel with 0 or 255, each independently.
    pub fn fill(&mut self, pixels: &mut [u8]) {
        let need = ceil_div(pixels.len() as u64, BITS_PER_BYTE as u64) as usize;
        self.scratch.resize(need, 0);
        self.rng.fill_bytes(&mut self.scratch);

        for (i, px) in pixels.iter_mut().enumerate() {
            *px = if bit_at(&self.scratch, i) == 1 { PIXEL_ON } else { PIXEL_OFF };
        }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}
