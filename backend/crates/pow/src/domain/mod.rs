//! Domain Layer - Business logic and value objects
//!
//! This layer contains:
//! - Value objects (Challenge, Solution, Difficulty)
//! - Domain services (PoW verification logic)

pub mod services;
pub mod value_objects;
