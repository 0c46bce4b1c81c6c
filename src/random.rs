//! Random source construction.
//!
//! Algorithms never reach for a thread-local generator; they take an
//! explicit `&mut R: Rng`. Runners that own their loop build one here.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a seeded generator, or a freshly seeded one when `seed` is `None`.
pub fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::random()),
    }
}

/// Derives an independent worker seed from a master seed (splitmix64 step).
#[cfg_attr(not(feature = "parallel"), allow(dead_code))]
pub(crate) fn derive_seed(master: u64, worker: usize) -> u64 {
    let mut z = master.wrapping_add((worker as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
