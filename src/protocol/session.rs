//! Transport cipher sessions derived from a completed handshake
//!
//! A finished exchange yields one [`CipherSession`] per observed role:
//! two AEAD contexts assigned so the initiator's send key is the
//! responder's receive key and vice versa. The session decrypts captured
//! type-4 transport packets; ordering and replay policy stay with the
//! caller.

use std::fmt;

use crate::crypto::aead::CipherContext;
use crate::crypto::noise::TransportKeys;
use crate::error::Result;
use crate::keys::Role;
use crate::protocol::messages::TransportPacket;

/// The pair of per-direction AEAD contexts for one session.
///
/// Contexts are scoped resources; dropping the session releases both,
/// including on every failure path inside handshake processing (nothing
/// partially built ever escapes).
pub struct CipherSession {
    send: CipherContext,
    recv: CipherContext,
}

impl CipherSession {
    /// Expand transport keys from the final chaining key and bind the
    /// contexts for the given role.
    pub fn from_chaining_key(chaining_key: &[u8; 32], role: Role) -> Self {
        let keys = TransportKeys::derive(chaining_key, role == Role::Responder);
        Self {
            send: CipherContext::new(&keys.sending),
            recv: CipherContext::new(&keys.receiving),
        }
    }

    /// Decrypt a captured transport packet addressed to this side.
    ///
    /// Returns the header counter and the plaintext; a zero-length
    /// plaintext is a keepalive. The counter is reported as-is — replay
    /// checks are an external concern.
    pub fn decrypt_transport(&self, packet: &[u8]) -> Result<(u64, Vec<u8>)> {
        let msg = TransportPacket::parse(packet)?;
        let plaintext = self.recv.open(msg.counter, msg.payload, &[])?;
        Ok((msg.counter, plaintext))
    }

    /// Build a transport packet under this side's sending key.
    ///
    /// The counter is caller-supplied and must be monotonically
    /// increasing per key for the output to be safe to send.
    pub fn encrypt_transport(
        &self,
        receiver_index: u32,
        counter: u64,
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        let ciphertext = self.send.seal(counter, plaintext, &[])?;
        Ok(TransportPacket::build(receiver_index, counter, &ciphertext))
    }
}

/// The contexts hold live keys, so nothing inside is printed.
impl fmt::Debug for CipherSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherSession").finish_non_exhaustive()
    }
}
