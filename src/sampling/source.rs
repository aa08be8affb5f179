//! Injected randomness for samplers
//!
//! Samplers never touch a global generator. They draw through
//! [`RandomSource`], which every [`rand::RngCore`] implements, so tests can
//! inject a seeded generator and production code an OS-seeded one.

use crate::traits::Error;
use rand::RngCore;

/// Source of uniformly distributed integers
pub trait RandomSource {
    /// Draw an integer uniformly from `[0, bound)`
    ///
    /// Returns [`Error::EmptyRange`] if `bound` is zero and
    /// [`Error::RandomSource`] if the underlying generator fails.
    fn next_below(&mut self, bound: u64) -> Result<u64, Error>;
}

impl<R: RngCore + ?Sized> RandomSource for R {
    fn next_below(&mut self, bound: u64) -> Result<u64, Error> {
        if bound == 0 {
            return Err(Error::EmptyRange);
        }

        // Rejection sampling to eliminate modulo bias.
        // threshold = 2^64 % bound (using wrapping_neg trick)
        let threshold = bound.wrapping_neg() % bound;
        let mut buf = [0u8; 8];
        loop {
            self.try_fill_bytes(&mut buf).map_err(Error::random_source)?;
            let r = u64::from_le_bytes(buf);
            if r >= threshold {
                return Ok(r % bound);
            }
        }
    }
}

/// SplitMix64 finalizer, used to derive independent per-partition seeds
#[inline]
pub(crate) fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
