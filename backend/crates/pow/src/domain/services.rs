//! Domain Services
//!
//! Pure domain logic for PoW verification.

use crate::domain::value_objects::{Challenge, Difficulty, Solution};
use platform::crypto::sha256_concat;

/// Count leading zero bits in a SHA-256 hash
pub fn count_leading_zero_bits(hash: &[u8; 32]) -> u16 {
    let mut count = 0u16;
    for &byte in hash {
        if byte == 0 {
            count += 8;
        } else {
            count += byte.leading_zeros() as u16;
            break;
        }
    }
    count
}

/// Verify that a hash meets the difficulty requirement
///
/// The first `difficulty / 8` bytes must be `0x00` and, when
/// `difficulty % 8 > 0`, the top `difficulty % 8` bits of the next byte must
/// be zero. Bits past that are unconstrained.
pub fn meets_difficulty(hash: &[u8; 32], difficulty: Difficulty) -> bool {
    let full_zero_bytes = difficulty.full_zero_bytes();
    let remaining_bits = difficulty.remaining_bits();

    let Some(prefix) = hash.get(..full_zero_bytes) else {
        return false;
    };
    if prefix.iter().any(|&byte| byte != 0) {
        return false;
    }

    if remaining_bits == 0 {
        return true;
    }

    let mask = 0xFFu8 << (8 - remaining_bits);
    match hash.get(full_zero_bytes) {
        Some(&byte) => byte & mask == 0,
        None => false,
    }
}

/// Compute SHA-256 of `challenge || solution`
pub fn compute_pow_hash(challenge: &Challenge, solution: &Solution) -> [u8; 32] {
    sha256_concat(&[challenge.as_bytes(), solution.as_bytes()])
}

/// Verify a PoW solution
pub fn validate_solution(challenge: &Challenge, solution: &Solution, difficulty: Difficulty) -> bool {
    let hash = compute_pow_hash(challenge, solution);
    meets_difficulty(&hash, difficulty)
}
