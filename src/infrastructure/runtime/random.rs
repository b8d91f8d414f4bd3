//! Random sources for simulated outcomes

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Uniform index into a collection of `len` items. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize {
        let idx = (self.next_f64() * len as f64).floor() as usize;
        idx.min(len.saturating_sub(1))
    }
}

#[derive(Debug)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Seeded when `seed` is given, otherwise from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl RandomSource for StdRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of draws, then repeats `fallback`.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback: 0.0,
        }
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn push(&mut self, value: f64) {
        self.values.push_back(value);
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        self.values.pop_front().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_replays_then_falls_back() {
        let mut random = ScriptedRandom::new([0.1, 0.9]).with_fallback(0.5);
        assert_eq!(random.next_f64(), 0.1);
        assert_eq!(random.next_f64(), 0.9);
        assert_eq!(random.next_f64(), 0.5);
    }

    #[test]
    fn test_pick_stays_in_bounds() {
        let mut random = ScriptedRandom::new([0.0, 0.999_999, 0.5]);
        assert_eq!(random.pick(5), 0);
        assert_eq!(random.pick(5), 4);
        assert_eq!(random.pick(5), 2);
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let mut a = StdRandom::new(Some(7));
        let mut b = StdRandom::new(Some(7));
        for _ in 0..5 {
            let value = a.next_f64();
            assert!((0.0..1.0).contains(&value));
            assert_eq!(value, b.next_f64());
        }
    }
}
