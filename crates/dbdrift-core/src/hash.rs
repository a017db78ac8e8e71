//! Content hashing for executable object bodies

use sha2::{Digest, Sha256};

/// Length of a hex encoded body digest
pub const BODY_HASH_LEN: usize = 64;

/// Hash an executable body (function, trigger, package...) for change detection
///
/// Only the digest is kept in a snapshot, never the body itself. The body is
/// hashed byte for byte, so a whitespace or line-ending edit is a change.
pub fn hash_body(body: &str) -> String {
    hex::encode(Sha256::digest(body.as_bytes()))
}

/// Check that a string looks like a digest produced by [`hash_body`]
pub fn is_valid_body_hash(hash: &str) -> bool {
    hash.len() == BODY_HASH_LEN && hash.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
