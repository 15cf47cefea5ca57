//! Password hashing collaborator.

use md5::Md5;
use sha2::{Digest, Sha256};

/// Deterministic, pure credential transform.
#[cfg_attr(test, mockall::automock)]
pub trait Hasher: Send + Sync {
    /// Hashes `value` with `salt`.
    fn hash(&self, value: &str, salt: &str) -> String;
}

/// Hex-encoded MD5 of `value` followed by `salt`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Hasher;

impl Hasher for Md5Hasher {
    fn hash(&self, value: &str, salt: &str) -> String {
        let mut hasher = Md5::new();
        hasher.update(value.as_bytes());
        hasher.update(salt.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Hex-encoded SHA-256 of `value` followed by `salt`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn hash(&self, value: &str, salt: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        hasher.update(salt.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_hasher_known_digest() {
        // md5("password" + "salt") == md5("passwordsalt")
        assert_eq!(
            Md5Hasher.hash("password", "salt"),
            "b305cadbb3bce54f3aa59c64fec00dea"
        );
    }

    #[test]
    fn test_md5_hasher_is_deterministic() {
        assert_eq!(Md5Hasher.hash("a", "b"), Md5Hasher.hash("a", "b"));
        assert_ne!(Md5Hasher.hash("a", "b"), Md5Hasher.hash("a", "c"));
    }

    #[test]
    fn test_sha256_hasher_known_digest() {
        // sha256("passwordsalt")
        assert_eq!(
            Sha256Hasher.hash("password", "salt"),
            "7a37b85c8918eac19a9089c0fa5a2ab4dce3f90528dcdeec108b23ddf3607b99"
        );
        assert_ne!(Sha256Hasher.hash("a", "b"), Md5Hasher.hash("a", "b"));
    }
}
