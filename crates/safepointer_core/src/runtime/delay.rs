//! Delay sources for deferred actions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Upper bound (exclusive) of the self-destruct delay, in milliseconds.
pub const DEFAULT_MAX_DELAY_MS: u64 = 3_000;

/// Produces the delay for the next deferred action.
pub trait DelaySource {
    fn next_delay_ms(&mut self) -> u64;
}

/// Uniform pseudo-random delay in `[0, max_ms)`.
#[derive(Debug, Clone)]
pub struct RandomDelay {
    rng: StdRng,
    max_ms: u64,
}

impl RandomDelay {
    /// Entropy-seeded source.
    pub fn new(max_ms: u64) -> Result<Self, DelayError> {
        Self::build(StdRng::from_entropy(), max_ms)
    }

    /// Deterministic source for reproducible runs.
    pub fn seeded(seed: u64, max_ms: u64) -> Result<Self, DelayError> {
        Self::build(StdRng::seed_from_u64(seed), max_ms)
    }

    fn build(rng: StdRng, max_ms: u64) -> Result<Self, DelayError> {
        if max_ms == 0 {
            return Err(DelayError::EmptyRange);
        }
        Ok(Self { rng, max_ms })
    }
}

impl DelaySource for RandomDelay {
    fn next_delay_ms(&mut self) -> u64 {
        self.rng.gen_range(0..self.max_ms)
    }
}

/// Always returns the same delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay(pub u64);

impl DelaySource for FixedDelay {
    fn next_delay_ms(&mut self) -> u64 {
        self.0
    }
}

/// Delay source construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelayError {
    EmptyRange,
}

impl Display for DelayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRange => write!(f, "delay range is empty; max delay must be > 0"),
        }
    }
}

impl Error for DelayError {}

#[cfg(test)]
mod tests {
    use super::{DelayError, DelaySource, FixedDelay, RandomDelay, DEFAULT_MAX_DELAY_MS};

    #[test]
    fn random_delay_stays_in_range() {
        let mut source =
            RandomDelay::seeded(7, DEFAULT_MAX_DELAY_MS).expect("non-empty range should build");
        for _ in 0..1_000 {
            assert!(source.next_delay_ms() < DEFAULT_MAX_DELAY_MS);
        }
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let mut left = RandomDelay::seeded(42, 3_000).expect("left source");
        let mut right = RandomDelay::seeded(42, 3_000).expect("right source");
        for _ in 0..16 {
            assert_eq!(left.next_delay_ms(), right.next_delay_ms());
        }
    }

    #[test]
    fn zero_max_is_rejected() {
        let err = RandomDelay::new(0).expect_err("empty range must fail");
        assert_eq!(err, DelayError::EmptyRange);
    }

    #[test]
    fn fixed_delay_repeats() {
        let mut source = FixedDelay(250);
        assert_eq!(source.next_delay_ms(), 250);
        assert_eq!(source.next_delay_ms(), 250);
    }
}
