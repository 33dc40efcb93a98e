//! Random token generation and digest helpers.
//!
//! Password-reset tokens are random hex strings; only their SHA-256 digest
//! is persisted, so a leaked database row cannot be replayed as a token.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generates a random token of `bytes` entropy, hex encoded (2 chars/byte).
pub fn random_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

/// Generates a short referral code (8 random bytes, hex encoded).
pub fn referral_code() -> String {
    random_token(8)
}

/// Computes the SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_token_length() {
        assert_eq!(random_token(32).len(), 64);
        assert_eq!(random_token(8).len(), 16);
    }

    #[test]
    fn test_random_token_unique() {
        assert_ne!(random_token(32), random_token(32));
    }

    #[test]
    fn test_random_token_is_hex() {
        let token = random_token(16);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_referral_code_length() {
        assert_eq!(referral_code().len(), 16);
    }

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
    fn test_sha256_hex_deterministic() {
        assert_eq!(sha256_hex("same_input"), sha256_hex("same_input"));
        assert_ne!(sha256_hex("input1"), sha256_hex("input2"));
    }
}
