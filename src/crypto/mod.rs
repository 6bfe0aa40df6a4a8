//! Cryptographic primitives for handshake recovery
//!
//! - BLAKE2s hashing, keyed MAC, and KDF chain (blake2s)
//! - ChaCha20-Poly1305 AEAD and cipher contexts (aead)
//! - X25519 Diffie-Hellman (x25519)
//! - Noise IKpsk2 chaining state (noise)

pub mod aead;
pub mod blake2s;
pub mod noise;
pub mod x25519;
