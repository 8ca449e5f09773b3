//! Cryptographic utilities for phone-number hashing and invite codes.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Alphabet used for circle invite codes.
const INVITE_CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of a circle invite code.
pub const INVITE_CODE_LEN: usize = 6;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hashes a phone number for privacy-preserving contact matching.
///
/// All non-digit characters are stripped before hashing, so
/// "+1 (555) 123-4567" and "15551234567" produce the same hash.
pub fn hash_phone_number(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    sha256_hex(&digits)
}

/// Generates a random 6-character invite code from `[A-Z0-9]`.
pub fn generate_invite_code() -> String {
    let mut rng = rand::thread_rng();
    (0..INVITE_CODE_LEN)
        .map(|_| INVITE_CODE_CHARS[rng.gen_range(0..INVITE_CODE_CHARS.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        let hash = sha256_hex("test");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_sha256_hex_empty_string() {
        let hash = sha256_hex("");
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_hex_deterministic() {
        assert_eq!(sha256_hex("same_input"), sha256_hex("same_input"));
    }

    #[test]
    fn test_hash_phone_number_strips_formatting() {
        let a = hash_phone_number("+1 (555) 123-4567");
        let b = hash_phone_number("15551234567");
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_phone_number_different_numbers() {
        let a = hash_phone_number("15551234567");
        let b = hash_phone_number("15551234568");
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_phone_number_is_hex() {
        let hash = hash_phone_number("5551234567");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_invite_code_length() {
        assert_eq!(generate_invite_code().len(), INVITE_CODE_LEN);
    }

    #[test]
    fn test_generate_invite_code_alphabet() {
        for _ in 0..100 {
            let code = generate_invite_code();
            assert!(code
                .bytes()
                .all(|b| INVITE_CODE_CHARS.contains(&b)));
        }
    }

    #[test]
    fn test_generate_invite_code_varies() {
        // Collisions over 50 draws from a 36^6 space would be spectacular.
        let codes: std::collections::HashSet<String> =
            (0..50).map(|_| generate_invite_code()).collect();
        assert!(codes.len() > 1);
    }
}
