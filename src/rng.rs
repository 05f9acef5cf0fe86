//! Seeded pseudo-random stream for template parameters (Mulberry32).
//!
//! Not cryptographic and never touches system entropy: the same seed always
//! yields the same sequence, which is what makes templates reproducible.
//! `Mulberry32` is a `rand::RngCore`, so templates draw through `rand::Rng`
//! (`gen_range`) and `SliceRandom` (`choose`, `shuffle`).

use rand::seq::SliceRandom;
use rand::{Error, Rng, RngCore, SeedableRng};

#[derive(Clone, Debug)]
pub struct Mulberry32 {
  state: u32,
}

impl Mulberry32 {
  pub fn new(seed: u32) -> Self {
    Self { state: seed }
  }

  /// Next value in [0, 1).
  pub fn next_f64(&mut self) -> f64 {
    self.next_u32() as f64 / 4_294_967_296.0
  }
}

impl RngCore for Mulberry32 {
  fn next_u32(&mut self) -> u32 {
    self.state = self.state.wrapping_add(0x6D2B_79F5);
    let mut t = self.state;
    t = (t ^ (t >> 15)).wrapping_mul(t | 1);
    t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
    t ^ (t >> 14)
  }

  fn next_u64(&mut self) -> u64 {
    let lo = u64::from(self.next_u32());
    let hi = u64::from(self.next_u32());
    (hi << 32) | lo
  }

  fn fill_bytes(&mut self, dest: &mut [u8]) {
    for chunk in dest.chunks_mut(4) {
      let bytes = self.next_u32().to_le_bytes();
      chunk.copy_from_slice(&bytes[..chunk.len()]);
    }
  }

  fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
    self.fill_bytes(dest);
    Ok(())
  }
}

impl SeedableRng for Mulberry32 {
  type Seed = [u8; 4];

  fn from_seed(seed: Self::Seed) -> Self {
    Self::new(u32::from_le_bytes(seed))
  }
}

/// Uniform integer in [lo, hi] that is a multiple of `step`.
pub fn stepped<R: Rng + ?Sized>(rng: &mut R, lo: i64, hi: i64, step: i64) -> i64 {
  let step = step.max(1);
  let (lo, hi) = (lo / step, hi / step);
  if hi <= lo {
    return lo * step;
  }
  rng.gen_range(lo..=hi) * step
}

/// `choose` over a constant table; an empty table yields the default value.
pub fn pick<T: Copy + Default, R: Rng + ?Sized>(rng: &mut R, table: &[T]) -> T {
  table.choose(rng).copied().unwrap_or_default()
}

/// Derive an independent stream from a base seed (used for shuffle and jitter
/// so they do not replay the template's own parameter draws).
pub fn derive_seed(seed: u32, salt: u32) -> u32 {
  let mut h = seed ^ salt.wrapping_mul(0x9E37_79B9);
  h = (h ^ (h >> 16)).wrapping_mul(0x85EB_CA6B);
  h = (h ^ (h >> 13)).wrapping_mul(0xC2B2_AE35);
  h ^ (h >> 16)
}
