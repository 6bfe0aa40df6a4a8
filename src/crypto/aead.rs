//! ChaCha20-Poly1305 AEAD for handshake fields and transport payloads
//!
//! Every encrypted field in the protocol uses the same nonce construction:
//! 4 zero bytes followed by a little-endian 64-bit counter. Handshake
//! fields always use counter 0; transport packets carry their counter in
//! the message header.

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Key, Nonce,
};

use crate::error::CryptoError;

/// Authentication tag length
pub const TAG_LEN: usize = 16;

/// ChaCha20-Poly1305 key length
pub const KEY_LEN: usize = 32;

/// ChaCha20-Poly1305 nonce length
pub const NONCE_LEN: usize = 12;

fn nonce_for(counter: u64) -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    nonce[4..12].copy_from_slice(&counter.to_le_bytes());
    nonce
}

/// Encrypt plaintext, appending the 16-byte tag
pub fn seal(
    key: &[u8; KEY_LEN],
    counter: u64,
    plaintext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    CipherContext::new(key).seal(counter, plaintext, aad)
}

/// Decrypt ciphertext-with-tag. On tag mismatch no plaintext bytes are
/// returned or retained.
pub fn open(
    key: &[u8; KEY_LEN],
    counter: u64,
    ciphertext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    CipherContext::new(key).open(counter, ciphertext, aad)
}

/// AEAD handle bound to one 32-byte key.
///
/// A completed handshake yields two of these, one per direction. Dropping
/// the context releases the keyed state.
pub struct CipherContext {
    cipher: ChaCha20Poly1305,
}

impl CipherContext {
    /// Bind a context to a 32-byte key
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            cipher: ChaCha20Poly1305::new(Key::from_slice(key)),
        }
    }

    /// Encrypt plaintext under this context, appending the tag
    pub fn seal(&self, counter: u64, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let nonce = nonce_for(counter);
        self.cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: plaintext,
                    aad,
                },
            )
            .map_err(|_| CryptoError::Encryption)
    }

    /// Decrypt ciphertext-with-tag under this context.
    ///
    /// The tag comparison is constant-time inside the cipher; a mismatch
    /// yields [`CryptoError::Authentication`] and no plaintext.
    pub fn open(&self, counter: u64, ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if ciphertext.len() < TAG_LEN {
            return Err(CryptoError::Authentication);
        }

        let nonce = nonce_for(counter);
        self.cipher
            .decrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: ciphertext,
                    aad,
                },
            )
            .map_err(|_| CryptoError::Authentication)
    }
}
