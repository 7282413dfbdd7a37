//! Seeded xorshift32 random source
//!
//! Same seed, same sequence, on every platform. The generator is a plain
//! 13/7/17 xorshift over `u32` so existing seeds keep producing the same
//! locks.

use std::num::NonZeroU32;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::LockError;

/// Seed used when zero is handed to a path that must not fail
pub const FALLBACK_SEED: u32 = 0x9E37_79B9;

/// A validated, nonzero session seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(NonZeroU32);

impl Seed {
    /// Accept a seed, rejecting zero
    pub fn new(value: u32) -> Result<Self, LockError> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or(LockError::InvalidSeed(value))
    }

    /// Accept a seed, remapping zero to [`FALLBACK_SEED`]
    pub fn or_fallback(value: u32) -> Self {
        match Self::new(value) {
            Ok(seed) => seed,
            Err(err) => {
                log::warn!("{err}, using fallback seed {FALLBACK_SEED}");
                Self(NonZeroU32::new(FALLBACK_SEED).unwrap_or(NonZeroU32::MIN))
            }
        }
    }

    /// Fresh seed from OS-backed entropy (not reproducible)
    pub fn random() -> Self {
        loop {
            if let Some(value) = NonZeroU32::new(rand::random::<u32>()) {
                return Self(value);
            }
        }
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fresh nonzero seed as a raw integer
pub fn random_seed() -> u32 {
    Seed::random().get()
}

/// xorshift32 generator state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    pub fn new(seed: Seed) -> Self {
        Self { state: seed.get() }
    }

    /// Advance and return the next raw value
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform float in `[0, 1)`
    #[inline]
    pub fn next_unit(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// `min + next % (max - min)`, or `min` for an empty range.
    ///
    /// The modulo bias is kept on purpose: changing the formula would change
    /// the lock produced by every previously shared seed.
    pub fn rand_int_range(&mut self, min: u32, max: u32) -> u32 {
        if min == max {
            return min;
        }
        min + self.next_u32() % max.wrapping_sub(min)
    }

    /// `floor(next_unit() * n)`, the index draw used by shuffles and pattern picks
    #[inline]
    pub fn index_below(&mut self, n: usize) -> usize {
        (self.next_unit() * n as f64) as usize
    }
}

impl RngCore for XorShift32 {
    fn next_u32(&mut self) -> u32 {
        XorShift32::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(XorShift32::next_u32(self));
        let lo = u64::from(XorShift32::next_u32(self));
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = XorShift32::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
