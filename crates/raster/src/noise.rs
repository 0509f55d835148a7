//! Deterministic noise and per-glyph seeding.
//!
//! Every random-looking decision in a render is derived from an explicit `seed_base`
//! and the glyph's position in the document, so a render is reproducible pixel for
//! pixel when the seed is fixed.

use rand::SeedableRng;
use rand::rngs::StdRng;

const GOLDEN: u64 = 0x9E37_79B9_7F4A_7C15;

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(GOLDEN);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Maps an integer seed to a reproducible value in `[-1, 1)`.
pub fn noise(seed: u64) -> f32 {
    let bits = splitmix64(seed) >> 40;
    (bits as f32 / (1u64 << 24) as f32) * 2.0 - 1.0
}

/// Smoothly interpolated value noise along one axis; integer lattice points take
/// `noise` values and are blended with a smoothstep in between.
pub fn value_noise(x: f32, seed: u64) -> f32 {
    let cell = x.floor();
    let t = x - cell;
    let lattice = |i: f32| noise(seed ^ splitmix64((i as i64) as u64));
    let (a, b) = (lattice(cell), lattice(cell + 1.0));
    let s = t * t * (3.0 - 2.0 * t);
    a + (b - a) * s
}

/// Mixes `value` into `seed`.
pub fn mix(seed: u64, value: u64) -> u64 {
    splitmix64(seed ^ value.wrapping_mul(GOLDEN))
}

/// Seed for one document page, shared by preview and export so both draw the same
/// hand.
pub fn page_seed(seed_base: u64, page_index: usize) -> u64 {
    mix(seed_base, page_index as u64)
}

/// Position of one glyph in the document, the key for all of its variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphSeed {
    pub page: usize,
    pub paragraph: usize,
    pub word: usize,
    pub ch: usize,
}

impl GlyphSeed {
    pub fn derive(&self, seed_base: u64) -> u64 {
        [self.page, self.paragraph, self.word, self.ch]
            .into_iter()
            .fold(seed_base, |acc, v| mix(acc, v as u64))
    }

    pub fn rng(&self, seed_base: u64) -> StdRng {
        StdRng::seed_from_u64(self.derive(seed_base))
    }
}
