//! Injected randomness for synthetic data.

use canopy_core::models::{DateWindow, GeoBounds, IndexType};
use chrono::Datelike;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Where synthetic providers draw their randomness from.
///
/// A seeded source derives one generator per call from the seed and the
/// call's inputs, so identical calls produce identical output regardless of
/// call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSource {
    Seeded(u64),
    Entropy,
}

impl SeedSource {
    pub fn from_option(seed: Option<u64>) -> Self {
        seed.map(SeedSource::Seeded).unwrap_or(SeedSource::Entropy)
    }

    pub fn is_deterministic(&self) -> bool {
        matches!(self, SeedSource::Seeded(_))
    }

    /// Generator for one call identified by `key`
    pub fn rng_for(&self, key: &CallKey<'_>) -> StdRng {
        match self {
            SeedSource::Seeded(seed) => StdRng::seed_from_u64(seed ^ key.fingerprint()),
            SeedSource::Entropy => StdRng::from_entropy(),
        }
    }
}

/// Inputs that identify a synthetic call
#[derive(Debug, Clone, Copy)]
pub struct CallKey<'a> {
    pub provider: &'a str,
    pub operation: &'a str,
    pub bounds: &'a GeoBounds,
    pub window: &'a DateWindow,
    pub index: Option<IndexType>,
}

impl CallKey<'_> {
    /// FNV-1a over a fixed little-endian encoding of the key, stable across
    /// builds and platforms
    pub fn fingerprint(&self) -> u64 {
        let mut hash = Fnv1a::new();
        hash.write_str(self.provider);
        hash.write_str(self.operation);
        for coordinate in self.bounds.as_array() {
            hash.write(&coordinate.to_bits().to_le_bytes());
        }
        for day in [self.window.start(), self.window.end()] {
            hash.write(&day.num_days_from_ce().to_le_bytes());
        }
        match self.index {
            Some(index) => {
                hash.write(&[1]);
                hash.write_str(index.as_str());
            }
            None => hash.write(&[0]),
        }
        hash.finish()
    }
}

struct Fnv1a(u64);

impl Fnv1a {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    fn new() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 ^= u64::from(*byte);
            self.0 = self.0.wrapping_mul(Self::PRIME);
        }
    }

    // 0xff never occurs in UTF-8, so it terminates strings unambiguously
    fn write_str(&mut self, value: &str) {
        self.write(value.as_bytes());
        self.write(&[0xff]);
    }

    fn finish(&self) -> u64 {
        self.0
    }
}
