use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const REGION_SALT: (i64, i64, i64) = (11887, 11987, 11903);
const CHUNK_SALT: (i64, i64, i64) = (10607, 10613, 10627);

#[inline]
fn salted(seed: i64, salt: (i64, i64, i64), x: i32, z: i32) -> i64 {
    seed.wrapping_add(salt.0)
        .wrapping_add((x as i64).wrapping_mul(salt.1))
        .wrapping_add((z as i64).wrapping_mul(salt.2))
}

/// Seed for a region whose origin chunk is `(base_cx, base_cz)`.
#[inline]
pub fn region_seed(world_seed: i64, base_cx: i32, base_cz: i32) -> i64 {
    salted(world_seed, REGION_SALT, base_cx, base_cz)
}

/// Seed for the per-chunk stream used while rendering chunk `(cx, cz)`.
#[inline]
pub fn chunk_seed(world_seed: i64, cx: i32, cz: i32) -> i64 {
    salted(world_seed, CHUNK_SALT, cx, cz)
}

/// Deterministic random sequence. Two streams built from the same seed
/// yield the same draws in the same order.
#[derive(Clone, Debug)]
pub struct SeededStream {
    rng: ChaCha8Rng,
}

impl SeededStream {
    pub fn new(seed: i64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed as u64),
        }
    }

    /// Uniform integer in `[0, bound)`. A non-positive bound yields 0 and
    /// consumes nothing.
    #[inline]
    pub fn next_int(&mut self, bound: i32) -> i32 {
        if bound <= 0 {
            return 0;
        }
        self.rng.gen_range(0..bound)
    }

    /// Uniform float in `[0, 1)`.
    #[inline]
    pub fn next_float(&mut self) -> f32 {
        self.rng.gen_range(0.0f32..1.0)
    }

    /// `min + next_int(max - min)`: the usual half-open config range.
    #[inline]
    pub fn range(&mut self, min: i32, max: i32) -> i32 {
        min + self.next_int(max - min)
    }

    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_float() < p
    }
}
