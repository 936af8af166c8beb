//! RNG oracle for deterministic random placement.
//!
//! The oracle is stateless: it maps a seed to a value. The stage keeps a
//! draw counter and derives a fresh seed for every draw with
//! [`compute_seed`], so replaying the same calls on a stage built with the
//! same configured seed reproduces every placement.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must produce the same value given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Derives the seed for one draw from the stage seed and its draw counter.
///
/// `context` separates independent streams (tile sampling vs group sizing)
/// that happen to share a draw number.
pub fn compute_seed(stage_seed: u64, draw: u64, context: u32) -> u64 {
    let mut hash = stage_seed;
    hash ^= draw.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// Sequential view over a stateless [`RngOracle`].
pub struct RngStream<'a> {
    oracle: &'a dyn RngOracle,
    seed: u64,
    draws: u64,
    context: u32,
}

impl<'a> RngStream<'a> {
    pub fn new(oracle: &'a dyn RngOracle, seed: u64, draws: u64, context: u32) -> Self {
        Self {
            oracle,
            seed,
            draws,
            context,
        }
    }

    /// Total draws taken so far, including those before this stream existed.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn next_u32(&mut self) -> u32 {
        let value = self
            .oracle
            .next_u32(compute_seed(self.seed, self.draws, self.context));
        self.draws = self.draws.wrapping_add(1);
        value
    }

    /// Uniform value in `0..bound`; `0` when `bound` is zero.
    pub fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.next_u32() % bound
    }

    /// Triangular distribution over `center - spread ..= center + spread`,
    /// peaking at `center`.
    pub fn triangle(&mut self, center: i32, spread: u32) -> i32 {
        let spread = spread.min(i32::MAX as u32 - 1);
        let up = self.below(spread + 1) as i32;
        let down = self.below(spread + 1) as i32;
        center + up - down
    }

    /// Picks one element uniformly; `None` for an empty slice.
    pub fn pick<'s, T>(&mut self, items: &'s [T]) -> Option<&'s T> {
        if items.is_empty() {
            return None;
        }
        let index = self.below(u32::try_from(items.len()).unwrap_or(u32::MAX));
        items.get(index as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_is_deterministic() {
        assert_eq!(PcgRng.next_u32(42), PcgRng.next_u32(42));
        assert_ne!(PcgRng.next_u32(42), PcgRng.next_u32(43));
    }

    #[test]
    fn stream_replays_from_draw_counter() {
        let mut first = RngStream::new(&PcgRng, 7, 0, 0);
        let a: Vec<_> = (0..4).map(|_| first.next_u32()).collect();
        assert_eq!(first.draws(), 4);

        let mut resumed = RngStream::new(&PcgRng, 7, 2, 0);
        assert_eq!(resumed.next_u32(), a[2]);
        assert_eq!(resumed.next_u32(), a[3]);
    }

    #[test]
    fn triangle_stays_within_spread() {
        let mut stream = RngStream::new(&PcgRng, 99, 0, 1);
        for _ in 0..500 {
            let value = stream.triangle(4, 2);
            assert!((2..=6).contains(&value));
        }
        assert_eq!(stream.triangle(3, 0), 3);
    }
}
