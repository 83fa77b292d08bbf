//! PoW (Proof of Work) Engine
//!
//! Hashcash-style challenge/response primitive:
//! - `domain/` - Value objects and the pure validation service
//! - `application/` - The seeded [`Hashcash`] engine (challenge generation, solving)
//!
//! ## Security Model
//! - Validation is a pure function of (challenge, solution, difficulty) and costs
//!   exactly one SHA-256 regardless of how long the solution took to find
//! - Each engine owns its random source; engines never share state
//! - Solving is always bounded by a [`SolveBudget`]

pub mod application;
pub mod domain;
pub mod error;

pub use application::engine::{Hashcash, SolveBudget};
pub use domain::services::{
    compute_pow_hash, count_leading_zero_bits, meets_difficulty, validate_solution,
};
pub use domain::value_objects::{Challenge, Difficulty, NONCE_SIZE, Solution};
pub use error::{PowError, PowResult};

#[cfg(test)]
mod tests;
