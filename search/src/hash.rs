//! Canonical hashing with domain separation.
//!
//! Every digest in the search layer is `sha256(domain || data)` rendered as
//! `"sha256:<hex>"`. Domain prefixes are null-terminated so no prefix is a
//! prefix of another.

use sha2::{Digest, Sha256};

/// Domain prefix for candidate identity fingerprints.
pub const DOMAIN_CANDIDATE: &[u8] = b"BRICKWORK::CANDIDATE::V1\0";

/// Domain prefix for the per-iteration frontier order digest.
pub const DOMAIN_FRONTIER_ORDER: &[u8] = b"BRICKWORK::FRONTIER_ORDER::V1\0";

/// Domain prefix for the whole-trace digest.
pub const DOMAIN_SEARCH_TRACE: &[u8] = b"BRICKWORK::SEARCH_TRACE::V1\0";

/// A content-addressed hash, rendered `"sha256:<hex>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(String);

impl ContentHash {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// `sha256(domain || data)` as a [`ContentHash`].
#[must_use]
pub fn canonical_hash(domain: &[u8], data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(data);
    let digest = hex::encode(hasher.finalize());
    ContentHash(format!("sha256:{digest}"))
}
