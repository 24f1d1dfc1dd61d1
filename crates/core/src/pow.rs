//! Proof-of-work target checks.

use crate::hash::Hash;

/// Highest meaningful difficulty: every hex character of a SHA-256 digest.
pub const MAX_DIFFICULTY: usize = 64;

/// Check whether the first `difficulty` hex characters of `hash` are `'0'`.
pub fn meets_difficulty(hash: &Hash, difficulty: usize) -> bool {
    hash.leading_zero_nibbles() >= difficulty
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_difficulty_always_met() {
        let hash = Hash::from_bytes([0xff; 32]);
        assert!(meets_difficulty(&hash, 0));
    }

    #[test]
    fn test_partial_nibble() {
        let mut bytes = [0xffu8; 32];
        bytes[0] = 0x00;
        bytes[1] = 0x0f;
        let hash = Hash::from_bytes(bytes);

        assert!(meets_difficulty(&hash, 3));
        assert!(!meets_difficulty(&hash, 4));
    }

    #[test]
    fn test_max_difficulty() {
        assert!(meets_difficulty(&Hash::ZERO, MAX_DIFFICULTY));
        assert!(!meets_difficulty(&Hash::ZERO, MAX_DIFFICULTY + 1));
    }
}
