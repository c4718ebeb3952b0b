//! PKCE (RFC 7636) verifier/challenge pairs and OAuth `state` values.
//!
//! Randomness comes from v4 UUIDs so the same code works in the browser
//! (`uuid/js`) and natively without a separate RNG dependency.

#[cfg(test)]
#[path = "pkce_test.rs"]
mod pkce_test;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Verifier kept locally across the redirect plus the challenge sent to the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    #[must_use]
    pub fn generate() -> Self {
        let verifier = generate_code_verifier();
        let challenge = code_challenge(&verifier);
        Self { verifier, challenge }
    }
}

/// Generates a 43-character URL-safe code verifier from 32 random bytes.
#[must_use]
pub fn generate_code_verifier() -> String {
    let mut bytes = [0u8; 32];
    bytes[..16].copy_from_slice(Uuid::new_v4().as_bytes());
    bytes[16..].copy_from_slice(Uuid::new_v4().as_bytes());
    URL_SAFE_NO_PAD.encode(bytes)
}

/// `BASE64URL(SHA256(verifier))`, the S256 challenge method.
#[must_use]
pub fn code_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Opaque anti-CSRF value echoed back by the provider on the callback.
#[must_use]
pub fn generate_state() -> String {
    Uuid::new_v4().simple().to_string()
}
