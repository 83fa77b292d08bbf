//! Unit tests for PoW crate

#[cfg(test)]
mod validation_tests {
    use crate::domain::services::*;
    use crate::domain::value_objects::*;
    use proptest::prelude::*;

    /// Bit-by-bit reference: true iff the first `difficulty` bits of `hash`
    /// are all zero.
    fn leading_bits_are_zero(hash: &[u8; 32], difficulty: u8) -> bool {
        (0..difficulty as usize).all(|bit| hash[bit / 8] & (0x80 >> (bit % 8)) == 0)
    }

    fn zero_leading_bits(mut hash: [u8; 32], bits: usize) -> [u8; 32] {
        for bit in 0..bits.min(256) {
            hash[bit / 8] &= !(0x80 >> (bit % 8));
        }
        hash
    }

    proptest! {
        #[test]
        fn validation_matches_bit_oracle(
            challenge in any::<[u8; 8]>(),
            solution in any::<[u8; 8]>(),
            difficulty in 0u8..64,
        ) {
            let challenge = Challenge::from_bytes(challenge);
            let solution = Solution::from_bytes(solution);
            let hash = platform::crypto::sha256_concat(&[challenge.as_bytes(), solution.as_bytes()]);

            prop_assert_eq!(
                validate_solution(&challenge, &solution, Difficulty::new(difficulty)),
                leading_bits_are_zero(&hash, difficulty)
            );
        }

        #[test]
        fn difficulty_check_matches_bit_oracle(
            hash in any::<[u8; 32]>(),
            zeroed in 0usize..80,
            difficulty in any::<u8>(),
        ) {
            // Random hashes almost never start with zero bits, so force a prefix
            let hash = zero_leading_bits(hash, zeroed);
            prop_assert_eq!(
                meets_difficulty(&hash, Difficulty::new(difficulty)),
                leading_bits_are_zero(&hash, difficulty)
            );
        }

        #[test]
        fn zero_difficulty_accepts_everything(
            challenge in any::<[u8; 8]>(),
            solution in any::<[u8; 8]>(),
        ) {
            prop_assert!(validate_solution(
                &Challenge::from_bytes(challenge),
                &Solution::from_bytes(solution),
                Difficulty::ZERO,
            ));
        }
    }

    #[test]
    fn test_zero_difficulty_edge_values() {
        for bytes in [[0x00; 8], [0xFF; 8], [0x80, 0, 0, 0, 0, 0, 0, 1]] {
            assert!(validate_solution(
                &Challenge::from_bytes(bytes),
                &Solution::from_bytes(bytes),
                Difficulty::ZERO
            ));
        }
    }
}

#[cfg(test)]
mod engine_tests {
    use crate::application::engine::*;
    use crate::domain::value_objects::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_challenge_no_duplicates() {
        let mut engine = Hashcash::new();
        let mut seen = HashSet::with_capacity(10_000);
        for _ in 0..10_000 {
            assert!(seen.insert(engine.generate_challenge()), "duplicate challenge");
        }
    }

    #[test]
    fn test_solve_low_difficulties() {
        let mut engine = Hashcash::new();
        for bits in [0u8, 4, 8, 12] {
            let difficulty = Difficulty::new(bits);
            let challenge = engine.generate_challenge();
            let solution = engine
                .solve(&challenge, difficulty, SolveBudget::for_difficulty(difficulty))
                .unwrap();
            assert!(
                engine.validate_solution(&challenge, &solution, difficulty),
                "difficulty {bits}"
            );
        }
    }

    #[test]
    fn test_solution_is_bound_to_its_challenge() {
        let mut engine = Hashcash::with_seed(3);
        let difficulty = Difficulty::new(16);
        let challenge = engine.generate_challenge();
        let solution = engine
            .solve(&challenge, difficulty, SolveBudget::for_difficulty(difficulty))
            .unwrap();

        // A different challenge accepts the same solution only by chance (2^-16);
        // across several challenges that chance compounds to nothing.
        let others: Vec<_> = (0..8).map(|_| engine.generate_challenge()).collect();
        let reused = others
            .iter()
            .filter(|other| engine.validate_solution(other, &solution, difficulty))
            .count();
        assert!(reused < 8);
    }

    #[test]
    fn test_all_ones_solution_rejected() {
        let mut engine = Hashcash::with_seed(20);
        let challenge = engine.generate_challenge();
        let invalid = Solution::from_bytes([0xFF; NONCE_SIZE]);
        assert!(!engine.validate_solution(&challenge, &invalid, Difficulty::new(20)));
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::*;
    use kernel::error::{app_error::AppError, kind::ErrorKind};

    #[test]
    fn test_error_kind() {
        let err = PowError::SolveExhausted {
            attempts: 10,
            difficulty: 40,
        };
        assert_eq!(err.kind(), ErrorKind::Exhausted);
        assert!(err.to_string().contains("10 attempts"));
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = PowError::SolveExhausted {
            attempts: 1,
            difficulty: 1,
        }
        .into();
        assert_eq!(app.kind(), ErrorKind::Exhausted);
        assert!(app.action().is_some());
    }
}
