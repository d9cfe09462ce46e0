//! Password digests
//!
//! Unsalted single-round SHA-256, lowercase hex. Kept byte-compatible with
//! digests already stored by earlier releases.

use sha2::{Digest, Sha256};

/// Digest of `password` as stored in `users.password`
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Recompute the digest of `password` and compare it with `digest`
pub fn verify_password(password: &str, digest: &str) -> bool {
    hash_password(password) == digest
}
