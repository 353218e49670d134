//! Hashing utilities.
//!
//! Deterministic, explicitly parameterized. The adapter hashes source files;
//! the core only hashes artifact bytes (the slice digest recorded into
//! `metadata.json`). No implicit defaults: callers choose the algorithm.

use sha2::{Digest, Sha256};

use crate::errors::{SliceError, SliceResult};

/// Hash algorithm identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlg {
    Sha256,
}

impl HashAlg {
    pub fn parse(s: &str) -> SliceResult<Self> {
        match s {
            "sha256" => Ok(Self::Sha256),
            _ => Err(SliceError::invalid_argument(format!(
                "unsupported hash algorithm: {s}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

/// Hash raw bytes with the selected algorithm.
pub fn hash_bytes(alg: HashAlg, bytes: &[u8]) -> Vec<u8> {
    match alg {
        HashAlg::Sha256 => {
            let mut h = Sha256::new();
            h.update(bytes);
            h.finalize().to_vec()
        }
    }
}

/// Sha-256 of raw bytes as lowercase hex.
pub fn hash_bytes_hex(bytes: &[u8]) -> String {
    hex::encode(hash_bytes(HashAlg::Sha256, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_stable() {
        assert_eq!(hash_bytes_hex(b"abc"), hash_bytes_hex(b"abc"));
        assert_ne!(hash_bytes_hex(b"abc"), hash_bytes_hex(b"abd"));
    }

    #[test]
    fn known_vector() {
        assert_eq!(
            hash_bytes_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn parse_rejects_unknown_algorithm() {
        assert!(HashAlg::parse("md5").is_err());
        assert_eq!(HashAlg::parse("sha256").unwrap(), HashAlg::Sha256);
    }
}
