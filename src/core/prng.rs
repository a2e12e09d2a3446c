// Minimal PRNG (no external crates).
//
// This is NOT cryptographically secure.
// It is used only for k-means seeding so a fixed seed gives a reproducible fit.

#[derive(Debug, Clone)]
pub struct Prng {
    state: u64,
}

impl Prng {
    pub fn new(seed: u64) -> Self {
        // Avoid a zero state.
        let seed = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state: seed }
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        // xorshift64*
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform in [0,1) with 53 bits of precision.
    #[inline]
    pub fn next_f64_01(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    #[inline]
    pub fn gen_range_usize(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        let span = (high - low) as u64;
        low + (self.next_u64() % span) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = Prng::new(7);
        let mut b = Prng::new(7);
        for _ in 0..32 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn zero_seed_is_not_stuck() {
        let mut p = Prng::new(0);
        let first = p.next_u32();
        let second = p.next_u32();
        assert_ne!(first, second);
    }

    #[test]
    fn ranges_stay_in_bounds() {
        let mut p = Prng::new(42);
        for _ in 0..1000 {
            let f = p.next_f64_01();
            assert!((0.0..1.0).contains(&f));
            let i = p.gen_range_usize(3, 9);
            assert!((3..9).contains(&i));
        }
        assert_eq!(p.gen_range_usize(5, 5), 5);
    }
}
