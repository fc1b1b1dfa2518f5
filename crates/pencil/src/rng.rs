//! Seeded random source for sketch perturbation.
//!
//! Every sketched shape owns its own `RandomSource`, created from an integer
//! seed right before generation. The same seed always yields the same
//! wobble, so outlines can be regenerated on every redraw without flicker.

/// A fast, deterministic pseudo-random number generator.
///
/// Uses a Linear Congruential Generator (LCG) with the Knuth MMIX
/// multiplier and increment. Statistical quality is far beyond what a
/// ±2° jitter needs, and the sequence is stable across platforms.
///
/// # Example
/// ```
/// use pencil::rng::RandomSource;
///
/// let mut random = RandomSource::new(12345);
/// let jitter = random.next_int(1, 3); // 1 or 2
/// assert!((1..3).contains(&jitter));
/// ```
#[derive(Debug, Clone)]
pub struct RandomSource {
    state: u64,
}

impl RandomSource {
    /// Create a new source with the given seed.
    ///
    /// The same seed will always produce the same sequence of numbers.
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { state: seed.wrapping_add(1) }
    }

    /// Get the next raw u64 value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Get a random f64 in the range [0, 1).
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        // High bits of an LCG are the well-mixed ones
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Get a random integer in the half-open range [from, until).
    ///
    /// Returns `from` when the range is empty.
    #[inline]
    pub fn next_int(&mut self, from: i32, until: i32) -> i32 {
        if until <= from {
            return from;
        }
        let span = (until as i64 - from as i64) as f64;
        let offset = (self.next_f64() * span) as i64;
        (from as i64 + offset) as i32
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new(0)
    }
}
