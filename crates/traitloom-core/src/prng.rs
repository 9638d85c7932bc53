//! Deterministic pseudo-random source
//!
//! Mulberry32: a 32-bit state advanced by a constant and mixed with
//! multiply/xor/shift. Fast, tiny, and fully reproducible from a seed. It is
//! not suitable for anything that needs unpredictability.

/// Seeded Mulberry32 generator
#[derive(Debug, Clone)]
pub struct Prng {
    state: u32,
}

impl Prng {
    /// Create a generator from a 32-bit seed
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next float in `[0, 1)`
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }

    /// Integer in the inclusive range `[min, max]`
    ///
    /// Returns `min` when `max < min`.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            // A draw is consumed either way so call sites stay aligned.
            self.next();
            return min;
        }
        let span = (max - min + 1) as f64;
        min + (self.next() * span).floor() as i64
    }

    /// Index in `[0, len)`; `len` must be non-zero
    pub fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        self.next_int(0, len as i64 - 1) as usize
    }

    /// Roll against a percentage in `0..=100`
    pub fn chance(&mut self, percent: f64) -> bool {
        self.next() * 100.0 < percent
    }

    /// Uniformly pick one element
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_index(items.len());
        items.get(idx)
    }

    /// Fisher-Yates shuffle, walking from the end
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_int(0, i as i64) as usize;
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Prng::new(12345);
        let mut b = Prng::new(12345);

        for _ in 0..1000 {
            assert_eq!(a.next().to_bits(), b.next().to_bits());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = Prng::new(1);
        let mut b = Prng::new(2);

        let diverged = (0..10).any(|_| a.next() != b.next());
        assert!(diverged);
    }

    #[test]
    fn test_known_first_value() {
        // Mulberry32(0): state becomes 0x6D2B79F5 on the first draw.
        let mut rng = Prng::new(0);
        let v = rng.next();
        assert!((v - 0.266_429_208_684_712_65).abs() < 1e-12);
    }

    #[test]
    fn test_next_in_unit_interval() {
        let mut rng = Prng::new(99);
        for _ in 0..10_000 {
            let v = rng.next();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_next_int_bounds() {
        let mut rng = Prng::new(7);
        let mut seen = [false; 5];

        for _ in 0..1000 {
            let v = rng.next_int(3, 7);
            assert!((3..=7).contains(&v));
            seen[(v - 3) as usize] = true;
        }

        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_next_int_degenerate_range() {
        let mut rng = Prng::new(7);
        assert_eq!(rng.next_int(4, 4), 4);
        assert_eq!(rng.next_int(9, 2), 9);
    }

    #[test]
    fn test_pick_empty() {
        let mut rng = Prng::new(1);
        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());
    }

    #[test]
    fn test_shuffle_is_permutation_and_deterministic() {
        let mut a: Vec<u32> = (0..50).collect();
        let mut b = a.clone();

        Prng::new(42).shuffle(&mut a);
        Prng::new(42).shuffle(&mut b);
        assert_eq!(a, b);

        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
        assert_ne!(a, sorted);
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = Prng::new(5);
        for _ in 0..100 {
            assert!(rng.chance(100.0));
            assert!(!rng.chance(0.0));
        }
    }
}
