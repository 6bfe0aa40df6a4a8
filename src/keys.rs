//! Key material recovered out-of-band for one side of a session
//!
//! Secrets arrive as standard base64 32-byte values. All-zero is a defined
//! valid value meaning "not provided" — the downstream derivation math
//! treats it as a specific input, so it is preserved exactly rather than
//! modeled as an `Option`. Only the sender's static private key is
//! mandatory.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::crypto::{noise, x25519};
use crate::error::KeyError;

/// Which side of the captured handshake the loaded secrets belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Initiator,
    Responder,
}

/// A static Curve25519 keypair, public half derived from the private
#[derive(Clone)]
pub struct StaticKeypair {
    /// Clamped private scalar
    pub private: [u8; 32],
    /// Base-point scalar mult of the private key
    pub public: [u8; 32],
}

/// Per-role bundle of recovered secrets and the mac1 keys derived from
/// them. Immutable once built; safe to share across threads.
#[derive(Clone)]
pub struct KeyMaterial {
    /// This side's static keypair
    pub sender_static: StaticKeypair,
    /// The other side's static public key (all-zero if unknown)
    pub receiver_static_public: [u8; 32],
    /// This side's ephemeral private key for the captured handshake
    pub local_ephemeral: [u8; 32],
    /// Preshared key; all-zero means "no PSK configured" and is still
    /// folded into the handshake as-is
    pub preshared_key: [u8; 32],
    /// Verifies mac1 on messages addressed to this side
    pub sender_mac1_key: [u8; 32],
    /// Verifies mac1 on messages addressed to the other side
    pub receiver_mac1_key: [u8; 32],
}

impl KeyMaterial {
    /// Decode four base64 secrets and derive the dependent keys.
    ///
    /// Fails with an encoding error on bad base64 or a decoded length
    /// other than 32 bytes, and with a derivation error if the mandatory
    /// sender static private key is the all-zero sentinel.
    pub fn from_base64(
        sender_static_priv: &str,
        receiver_static_pub: &str,
        local_ephemeral_priv: &str,
        psk: &str,
    ) -> Result<Self, KeyError> {
        let sender_private = decode_key32(sender_static_priv, "sender static private key")?;
        let receiver_static_public = decode_key32(receiver_static_pub, "receiver static public key")?;
        let local_ephemeral = decode_key32(local_ephemeral_priv, "local ephemeral private key")?;
        let preshared_key = decode_key32(psk, "preshared key")?;

        if sender_private.iter().all(|&b| b == 0) {
            return Err(KeyError::Derivation {
                field: "sender static private key",
            });
        }

        let sender_static = StaticKeypair {
            public: x25519::public_key(&sender_private),
            private: sender_private,
        };

        let sender_mac1_key = noise::mac1_key(&sender_static.public);
        let receiver_mac1_key = noise::mac1_key(&receiver_static_public);

        tracing::debug!(
            "Loaded key material, sender public {:02x?}...",
            &sender_static.public[..4]
        );

        Ok(Self {
            sender_static,
            receiver_static_public,
            local_ephemeral,
            preshared_key,
            sender_mac1_key,
            receiver_mac1_key,
        })
    }

    /// The static public key both parties seed the handshake hash from:
    /// the responder's long-term key, whichever stored key that is for
    /// this role.
    pub fn responder_static_public(&self, role: Role) -> &[u8; 32] {
        match role {
            Role::Initiator => &self.receiver_static_public,
            Role::Responder => &self.sender_static.public,
        }
    }
}

/// Shows only the sender's public key; every private value is redacted.
impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("sender_public", &self.sender_static.public)
            .finish_non_exhaustive()
    }
}

fn decode_key32(encoded: &str, field: &'static str) -> Result<[u8; 32], KeyError> {
    let decoded = BASE64
        .decode(encoded.trim())
        .map_err(|_| KeyError::Base64 { field })?;
    decoded
        .as_slice()
        .try_into()
        .map_err(|_| KeyError::Length {
            field,
            got: decoded.len(),
        })
}
