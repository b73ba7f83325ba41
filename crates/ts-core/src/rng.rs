//! Deterministic RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each road segment gets its own `SmallRng` seeded by:
//!
//!   seed = refresh_seed XOR (segment_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive segment ids across the seed space.  Vehicles on
//! a segment therefore depend only on the refresh seed and that segment, so
//! sequential and parallel generation produce identical output.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::SegmentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── SegmentRng ────────────────────────────────────────────────────────────────

/// Per-segment deterministic RNG used by the entity generator.
pub struct SegmentRng(SmallRng);

impl SegmentRng {
    pub fn new(refresh_seed: u64, segment: SegmentId) -> Self {
        let seed = refresh_seed ^ (segment.0 as u64).wrapping_mul(MIXING_CONSTANT);
        SegmentRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

// ── ScalerRng ─────────────────────────────────────────────────────────────────

/// Refresh-level RNG for global passes (synthetic grid, RSU status).
///
/// Used only on the refresh path, which runs single-threaded.
pub struct ScalerRng(SmallRng);

impl ScalerRng {
    pub fn new(seed: u64) -> Self {
        ScalerRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed for refresh number `epoch`, derived without consuming state so the
    /// same `(seed, epoch)` pair always yields the same refresh.
    pub fn epoch_seed(seed: u64, epoch: u64) -> u64 {
        seed ^ epoch.wrapping_add(1).wrapping_mul(MIXING_CONSTANT)
    }

    /// Derive a child RNG with a different seed offset.
    pub fn child(&mut self, offset: u64) -> ScalerRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        ScalerRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
