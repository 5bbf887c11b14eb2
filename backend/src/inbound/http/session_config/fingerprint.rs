//! Non-secret fingerprint of the session key for startup logs.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// First 8 bytes of the SHA-256 of the signing half of `key`, as lowercase
/// hex.
///
/// # Examples
///
/// ```rust
/// use accounts::inbound::http::session_config::fingerprint::key_fingerprint;
/// use actix_web::cookie::Key;
///
/// let fp = key_fingerprint(&Key::generate());
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
