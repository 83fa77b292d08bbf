//! Domain Value Objects
//!
//! Immutable value types for the PoW domain.

/// Size in bytes of both a challenge and a solution.
pub const NONCE_SIZE: usize = 8;

/// Server-issued random nonce. Carries no meaning beyond being fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Challenge([u8; NONCE_SIZE]);

impl Challenge {
    pub const fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }
}

impl From<[u8; NONCE_SIZE]> for Challenge {
    fn from(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }
}

/// Client-chosen nonce submitted as proof of work for a [`Challenge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Solution([u8; NONCE_SIZE]);

impl Solution {
    pub const fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }
}

impl From<[u8; NONCE_SIZE]> for Solution {
    fn from(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }
}

/// Difficulty level for PoW: required leading zero bits of
/// `SHA-256(challenge || solution)`.
///
/// Every `u8` is a valid difficulty. `0` accepts any solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Difficulty(u8);

impl Difficulty {
    pub const DEFAULT: Difficulty = Difficulty(20);
    pub const ZERO: Difficulty = Difficulty(0);
    /// Above this, expected solve time is impractical for commodity clients.
    pub const MAX_PRACTICAL: u8 = 32;

    pub const fn new(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Number of hash bytes that must be exactly `0x00`.
    pub const fn full_zero_bytes(&self) -> usize {
        (self.0 / 8) as usize
    }

    /// Number of leading bits that must be zero in the byte following the
    /// full zero bytes.
    pub const fn remaining_bits(&self) -> u8 {
        self.0 % 8
    }

    pub const fn is_practical(&self) -> bool {
        self.0 <= Self::MAX_PRACTICAL
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u8> for Difficulty {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> Self {
        d.0
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
