//! Deterministic random number generation
//!
//! Every generation stage draws from its own stream, derived from the master
//! seed and a stream id. Per-entity work (one city's growth) gets a sub-stream
//! keyed by the entity index, so results do not depend on processing order.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Stream identifier
pub type StreamId = u32;

pub const CITY_PLACEMENT_STREAM: StreamId = 1;
pub const CITY_GROWTH_STREAM: StreamId = 2;
pub const ROAD_STREAM: StreamId = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RngManager {
    master_seed: u64,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self { master_seed: seed }
    }

    /// Fresh generator for a whole stage
    pub fn stream(&self, stream: StreamId) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.derive_seed(stream, 0))
    }

    /// Fresh generator for a single entity within a stage
    pub fn entity_stream(&self, stream: StreamId, entity: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.derive_seed(stream, entity.wrapping_add(1)))
    }

    fn derive_seed(&self, stream: StreamId, entity: u64) -> u64 {
        let mut seed = self.master_seed;
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        seed ^= (stream as u64).wrapping_mul(1103515245);
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        seed ^= entity.wrapping_mul(48271);
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        seed
    }
}

impl Default for RngManager {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Helper sampling operations shared by the generators
pub trait RngExt {
    /// Uniform point inside a disk of `radius`, returned as `(dx, dy)`
    fn point_in_disk(&mut self, radius: f64) -> (f64, f64);
}

impl<R: Rng> RngExt for R {
    fn point_in_disk(&mut self, radius: f64) -> (f64, f64) {
        let r = radius * self.gen::<f64>().sqrt();
        let theta = self.gen::<f64>() * TAU;
        (r * theta.cos(), r * theta.sin())
    }
}
