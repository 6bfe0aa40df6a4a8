//! Noise_IKpsk2 chaining state for handshake recovery
//!
//! The running (hash, chaining_key) accumulators that bind every prior
//! message byte into later key derivations. Pattern:
//! Noise_IKpsk2_25519_ChaChaPoly_BLAKE2s.

use super::{aead, blake2s};
use crate::error::CryptoError;

/// Noise protocol construction string
pub const CONSTRUCTION: &[u8] = b"Noise_IKpsk2_25519_ChaChaPoly_BLAKE2s";

/// WireGuard identifier string
pub const IDENTIFIER: &[u8] = b"WireGuard v1 zx2c4 Jason@zx2c4.com";

/// Label for mac1 key derivation
pub const LABEL_MAC1: &[u8] = b"mac1----";

/// Hash length (also chaining key length)
pub const HASH_LEN: usize = 32;

/// Transient (hash, chaining_key) accumulator.
///
/// Mutated across exactly two processing calls, then discarded. Each
/// decode attempt must start from a fresh instance.
#[derive(Clone)]
pub struct ChainingState {
    /// Chaining key for key derivation
    pub chaining_key: [u8; HASH_LEN],
    /// Hash accumulator
    pub hash: [u8; HASH_LEN],
}

impl ChainingState {
    /// Initialize from the protocol-identity constants and the responder's
    /// long-term static public key.
    ///
    /// ck = HASH(CONSTRUCTION)
    /// h  = HASH(HASH(ck || IDENTIFIER) || responder_static_public)
    ///
    /// Both parties seed from the responder's static key, so the observer
    /// picks whichever stored key plays "responder" for its role.
    pub fn new(responder_static_public: &[u8; 32]) -> Self {
        let chaining_key = blake2s::hash(CONSTRUCTION);
        let h1 = blake2s::hash_two(&chaining_key, IDENTIFIER);
        Self {
            chaining_key,
            hash: blake2s::hash_two(&h1, responder_static_public),
        }
    }

    /// MixHash: h = HASH(h || data)
    pub fn mix_hash(&mut self, data: &[u8]) {
        self.hash = blake2s::hash_two(&self.hash, data);
    }

    /// Extract-update of the chaining key alone: ck = KDF1(ck, ikm)
    pub fn mix_chain(&mut self, ikm: &[u8]) {
        let [ck] = blake2s::kdf::<1>(&self.chaining_key, ikm);
        self.chaining_key = ck;
    }

    /// MixKey: (ck, k) = KDF2(ck, ikm); returns the derived temporary key
    pub fn mix_key(&mut self, ikm: &[u8]) -> [u8; 32] {
        let [ck, key] = blake2s::kdf::<2>(&self.chaining_key, ikm);
        self.chaining_key = ck;
        key
    }

    /// MixKeyAndHash: (ck, temp_h, k) = KDF3(ck, psk).
    ///
    /// PSK folding. The all-zero PSK is a defined valid value ("no PSK
    /// configured") and is mixed exactly like any other.
    pub fn mix_key_and_hash(&mut self, psk: &[u8; 32]) -> [u8; 32] {
        let [ck, temp_h, key] = blake2s::kdf::<3>(&self.chaining_key, psk);
        self.chaining_key = ck;
        self.mix_hash(&temp_h);
        key
    }

    /// DecryptAndHash: open a handshake field (zero nonce, current hash as
    /// AAD), then mix the ciphertext into the hash.
    pub fn decrypt_and_hash(
        &mut self,
        key: &[u8; 32],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let plaintext = aead::open(key, 0, ciphertext, &self.hash)?;
        self.mix_hash(ciphertext);
        Ok(plaintext)
    }
}

/// Per-direction transport keys expanded from the final chaining key
pub struct TransportKeys {
    /// Key this party sends under
    pub sending: [u8; 32],
    /// Key this party receives under
    pub receiving: [u8; 32],
}

impl TransportKeys {
    /// (initiator_send, responder_send) = KDF2(ck, "")
    ///
    /// The initiator's send key is the responder's receive key and vice
    /// versa; `swap` selects the responder's view.
    pub fn derive(chaining_key: &[u8; 32], swap: bool) -> Self {
        let [t_init, t_resp] = blake2s::kdf::<2>(chaining_key, &[]);
        if swap {
            Self {
                sending: t_resp,
                receiving: t_init,
            }
        } else {
            Self {
                sending: t_init,
                receiving: t_resp,
            }
        }
    }
}

/// mac1 key for messages addressed to the holder of `static_public`:
/// HASH(LABEL_MAC1 || static_public)
pub fn mac1_key(static_public: &[u8; 32]) -> [u8; 32] {
    blake2s::hash_two(LABEL_MAC1, static_public)
}
