//! Hashcash engine
//!
//! Owns the random source used for both challenge generation and solving.

use crate::domain::services;
use crate::domain::value_objects::{Challenge, Difficulty, NONCE_SIZE, Solution};
use crate::error::{PowError, PowResult};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use std::time::{Duration, Instant};

/// Limits on the work [`Hashcash::solve`] may spend: a number of candidates
/// and, optionally, a wall-clock duration. Whichever runs out first ends the
/// search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveBudget {
    max_attempts: u64,
    time_limit: Option<Duration>,
}

impl SolveBudget {
    /// `for_difficulty` allows `2^SAFETY_FACTOR_LOG2` times the expected work.
    pub const SAFETY_FACTOR_LOG2: u32 = 4;

    /// Ceiling on the attempts `for_difficulty` derives: `2^32`, on the order
    /// of an hour of single-core hashing.
    pub const MAX_ATTEMPTS: u64 = 1 << 32;

    /// Attempts between two reads of the clock.
    const CLOCK_CHECK_INTERVAL: u64 = 4096;

    pub const fn attempts(max_attempts: u64) -> Self {
        Self {
            max_attempts,
            time_limit: None,
        }
    }

    /// `16 * 2^difficulty` attempts, capped at [`Self::MAX_ATTEMPTS`].
    ///
    /// A random search at difficulty `d` succeeds per attempt with probability
    /// `2^-d`, so below the cap an honest solver exhausts this budget with
    /// probability under `e^-16`. From difficulty 28 on the cap applies.
    pub const fn for_difficulty(difficulty: Difficulty) -> Self {
        let shift = difficulty.bits() as u32 + Self::SAFETY_FACTOR_LOG2;
        let max_attempts = if shift >= Self::MAX_ATTEMPTS.trailing_zeros() {
            Self::MAX_ATTEMPTS
        } else {
            1u64 << shift
        };
        Self::attempts(max_attempts)
    }

    /// Also stop once `limit` has elapsed since the search started.
    pub const fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub const fn max_attempts(&self) -> u64 {
        self.max_attempts
    }

    pub const fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }
}

/// Hashcash-style proof of work over SHA-256.
///
/// The random source is seeded once at construction and advanced by every
/// generated challenge and every solve attempt. Engines are independent: two
/// engines never observe each other's draws.
#[derive(Debug)]
pub struct Hashcash {
    random: StdRng,
}

impl Hashcash {
    /// Engine seeded from the operating system.
    pub fn new() -> Self {
        Self {
            random: StdRng::from_os_rng(),
        }
    }

    /// Deterministic engine, for reproducible tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            random: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw a fresh challenge.
    ///
    /// Uniqueness is probabilistic only.
    pub fn generate_challenge(&mut self) -> Challenge {
        Challenge::from_bytes(self.next_nonce())
    }

    pub fn validate_solution(
        &self,
        challenge: &Challenge,
        solution: &Solution,
        difficulty: Difficulty,
    ) -> bool {
        services::validate_solution(challenge, solution, difficulty)
    }

    /// Sample random candidates until one satisfies `difficulty`.
    ///
    /// # Errors
    ///
    /// Returns [`PowError::SolveExhausted`] once `budget` runs out, carrying
    /// the number of attempts actually made.
    pub fn solve(
        &mut self,
        challenge: &Challenge,
        difficulty: Difficulty,
        budget: SolveBudget,
    ) -> PowResult<Solution> {
        let deadline = budget.time_limit().map(|limit| Instant::now() + limit);
        let mut attempts = 0;

        while attempts < budget.max_attempts() {
            attempts += 1;
            let candidate = Solution::from_bytes(self.next_nonce());
            if services::validate_solution(challenge, &candidate, difficulty) {
                tracing::debug!(attempts, %difficulty, "PoW solution found");
                return Ok(candidate);
            }
            if attempts % SolveBudget::CLOCK_CHECK_INTERVAL == 0
                && deadline.is_some_and(|deadline| Instant::now() >= deadline)
            {
                tracing::debug!(attempts, %difficulty, "PoW solve time limit reached");
                break;
            }
        }

        Err(PowError::SolveExhausted {
            attempts,
            difficulty: difficulty.bits(),
        })
    }

    fn next_nonce(&mut self) -> [u8; NONCE_SIZE] {
        let mut nonce = [0u8; NONCE_SIZE];
        self.random.fill_bytes(&mut nonce);
        nonce
    }
}

impl Default for Hashcash {
    fn default() -> Self {
        Self::new()
    }
}
