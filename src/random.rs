//! Module providing the seeded random selection used by every table of a document

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Seed used when the caller does not provide one
pub const DEFAULT_SEED: u64 = 67889;

/// Seeded pseudo-random provider.
///
/// One instance is created per document and passed by reference through all of its tables,
/// so the draws of a later table continue the sequence of the earlier ones.
#[derive(Debug, Clone)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// An integer drawn uniformly from `[low, high)`, rendered as a string
    pub fn uniform_int(&mut self, low: i64, high: i64) -> Result<String, String> {
        if low >= high {
            return Err(format!(
                "range start {low} must be less than range end {high}"
            ));
        }
        Ok(self.rng.gen_range(low..high).to_string())
    }

    /// True with probability `weight / 100`
    pub fn select(&mut self, weight: u8) -> Result<bool, String> {
        if weight > 100 {
            return Err(format!("weight must be between 0 and 100, not {weight}"));
        }
        let draw: u8 = self.rng.gen_range(0..100);
        Ok(draw < weight)
    }

    /// One element of `items`, chosen uniformly
    pub fn choose_one<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, String> {
        if items.is_empty() {
            return Err("cannot choose from an empty list".to_string());
        }
        let position = self.rng.gen_range(0..items.len());
        Ok(&items[position])
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
