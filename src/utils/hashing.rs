//! SHA-256 digests for cache keys and session identifiers

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the exact bytes given.
pub fn sha256_hex(content: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_ref());
    format!("{:x}", hasher.finalize())
}

/// First `len` hex characters of the SHA-256 digest.
pub fn short_digest(content: impl AsRef<[u8]>, len: usize) -> String {
    let mut digest = sha256_hex(content);
    digest.truncate(len);
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_matches_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn short_digest_is_prefix() {
        let full = sha256_hex("/home/user/project");
        assert_eq!(short_digest("/home/user/project", 8), full[..8]);
    }
}
