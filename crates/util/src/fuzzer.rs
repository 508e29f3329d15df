use rand::{rngs::OsRng, Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Seeded generator of random test inputs for the utilities in this crate.
///
/// Uses the xoshiro256** PRNG so that a failing run can be reproduced from
/// its seed.
///
/// # Examples
///
/// ```
/// use aux_util::fuzzer::Fuzzer;
///
/// let mut fuzzer = Fuzzer::new(Some([7u8; 32]));
/// let ranges = fuzzer.random_ranges(5, 0, 100, 10);
/// assert_eq!(ranges.len(), 5);
/// assert!(ranges.iter().all(|&(lo, hi)| 0 <= lo && lo <= hi && hi <= 100));
/// ```
pub struct Fuzzer {
    /// The seed used to initialize the PRNG.
    pub seed: [u8; 32],
    rng: Xoshiro256StarStar,
}

impl Fuzzer {
    /// Creates a fuzzer with an optional seed.
    ///
    /// Without a seed a random one is drawn from `OsRng`.
    pub fn new(seed: Option<[u8; 32]>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            let mut bytes = [0u8; 32];
            OsRng.fill_bytes(&mut bytes);
            bytes
        });

        Self {
            seed,
            rng: Xoshiro256StarStar::from_seed(seed),
        }
    }

    /// Creates a fuzzer whose seed is derived from a single number.
    pub fn from_u64(seed: u64) -> Self {
        let mut bytes = [0u8; 32];
        for chunk in bytes.chunks_exact_mut(8) {
            chunk.copy_from_slice(&seed.to_le_bytes());
        }
        Self::new(Some(bytes))
    }

    /// Random integer in `[min, max]`.
    pub fn random_int(&mut self, min: i64, max: i64) -> i64 {
        self.rng.gen_range(min..=max)
    }

    /// Random index in `[0, len)`.
    pub fn random_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    pub fn random_bool(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability)
    }

    /// Picks a random element of a non-empty slice.
    pub fn pick<'a, T>(&mut self, elements: &'a [T]) -> &'a T {
        let idx = self.random_index(elements.len());
        &elements[idx]
    }

    /// `count` random closed ranges inside `[min, max]`, each at most
    /// `max_len` points long. Ranges may overlap and come in any order.
    pub fn random_ranges(
        &mut self,
        count: usize,
        min: i64,
        max: i64,
        max_len: i64,
    ) -> Vec<(i64, i64)> {
        (0..count)
            .map(|_| {
                let lo = self.random_int(min, max);
                let hi = lo.saturating_add(self.random_int(0, max_len.max(1) - 1)).min(max);
                (lo, hi)
            })
            .collect()
    }

    /// `count` random bit indices below `limit`, possibly repeated.
    pub fn random_indices(&mut self, count: usize, limit: usize) -> Vec<usize> {
        (0..count).map(|_| self.random_index(limit)).collect()
    }

    /// A random sequence of `len` small integers drawn from `[0, alphabet)`.
    pub fn random_sequence(&mut self, len: usize, alphabet: i64) -> Vec<i64> {
        (0..len).map(|_| self.random_int(0, alphabet - 1)).collect()
    }
}
