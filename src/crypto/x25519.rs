//! X25519 scalar multiplication for handshake recovery
//!
//! Only the observer-side operations: deriving a public key from a
//! recovered private scalar and computing shared secrets. Key generation
//! is deliberately absent; every scalar is message-supplied or
//! fixture-supplied.

use x25519_dalek::{PublicKey, StaticSecret};

/// Key length for X25519 (both private and public keys are 32 bytes)
pub const KEY_LEN: usize = 32;

/// Derive the public key (base-point scalar mult) from a private key.
///
/// The scalar is clamped on the way in, matching every deployed
/// implementation.
pub fn public_key(private_key: &[u8; KEY_LEN]) -> [u8; KEY_LEN] {
    let secret = StaticSecret::from(*private_key);
    PublicKey::from(&secret).to_bytes()
}

/// X25519 Diffie-Hellman between a recovered private key and a public key
pub fn dh(private_key: &[u8; KEY_LEN], public_key: &[u8; KEY_LEN]) -> [u8; KEY_LEN] {
    let secret = StaticSecret::from(*private_key);
    let public = PublicKey::from(*public_key);
    secret.diffie_hellman(&public).to_bytes()
}
