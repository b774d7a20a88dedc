//! Gameplay randomness.
//!
//! A small sequential LCG (not crypto secure) so word picks, spawn jitter and
//! particle scatter are cheap and, under test, deterministic. Seeded from
//! `performance.now()` by default; the `rng` feature swaps in browser entropy.

pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from the wall clock, the way the browser build starts a session.
    pub fn from_clock(now_ms: f64) -> Self {
        Self::new(now_ms.to_bits() ^ 0x5DEECE66D)
    }

    #[cfg(feature = "rng")]
    pub fn from_entropy() -> Self {
        let mut buf = [0u8; 8];
        match getrandom::getrandom(&mut buf) {
            Ok(()) => Self::new(u64::from_le_bytes(buf)),
            Err(_) => Self::from_clock(crate::performance_now()),
        }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(1664525)
            .wrapping_add(1013904223);
        (self.state >> 16) as u32
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Uniform in [lo, hi).
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.next_u32() as usize % len
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Lcg::new(42);
        let mut b = Lcg::new(42);
        for _ in 0..32 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn next_f64_stays_in_unit_interval() {
        let mut rng = Lcg::new(7);
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "{v} out of [0,1)");
        }
    }

    #[test]
    fn range_respects_bounds() {
        let mut rng = Lcg::new(99);
        for _ in 0..1000 {
            let v = rng.range(0.8, 1.2);
            assert!((0.8..1.2).contains(&v), "{v} out of [0.8,1.2)");
        }
    }

    #[test]
    fn index_stays_in_bounds_and_handles_empty() {
        let mut rng = Lcg::new(3);
        for _ in 0..1000 {
            assert!(rng.index(11) < 11);
        }
        assert_eq!(rng.index(0), 0);
    }
}
