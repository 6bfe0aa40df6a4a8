//! Noise_IKpsk2 handshake recovery from captured messages
//!
//! Drives the two-message exchange purely as an observer: the ephemeral
//! inputs come from the captured packets and the loaded key material,
//! never from local randomness. Both roles run the identical step
//! sequence; only which stored key plays "local" versus "remote" differs,
//! so processing the same initiation with correctly swapped key material
//! lands on byte-identical (hash, chaining_key).

use tai64::Tai64N;

use crate::crypto::{noise::ChainingState, x25519};
use crate::error::{CryptoError, ProtocolError, Result};
use crate::keys::{KeyMaterial, Role};
use crate::protocol::messages::{HandshakeInitiation, HandshakeResponse};
use crate::protocol::session::CipherSession;

/// TAI64N timestamp recovered from an initiation message:
/// 8-byte TAI64 second count followed by 4-byte nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tai64nTimestamp(pub [u8; 12]);

impl Tai64nTimestamp {
    pub fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// Interpret the raw bytes, if they form a valid TAI64N value
    pub fn to_tai64n(&self) -> Option<Tai64N> {
        Tai64N::from_slice(&self.0).ok()
    }
}

/// Everything recovered from a successfully processed initiation
#[derive(Debug, Clone)]
pub struct InitiationDecode {
    /// Sender index the initiator chose for this session
    pub sender_index: u32,
    /// The initiator's static public key, decrypted out of the message
    pub remote_static: [u8; 32],
    /// Decrypted TAI64N timestamp
    pub timestamp: Tai64nTimestamp,
    /// Post-initiation hash, exposed for cross-role verification
    pub hash: [u8; 32],
    /// Post-initiation chaining key, exposed for cross-role verification
    pub chaining_key: [u8; 32],
}

enum Phase {
    Idle,
    Primed {
        state: ChainingState,
        initiator_ephemeral: [u8; 32],
    },
    Complete,
    Failed,
}

/// One-shot decoder for a single captured handshake.
///
/// Idle -> Primed (initiation processed) -> Complete, with any
/// cryptographic failure moving to Failed and discarding all derived
/// state. Retries need a fresh decoder; partial state is never reused.
/// Truncated input is rejected during parsing, before anything is
/// derived, and leaves the phase as it was: the same decoder may be fed
/// the full packet once the capture delivers it.
pub struct HandshakeDecoder<'k> {
    keys: &'k KeyMaterial,
    role: Role,
    phase: Phase,
}

impl<'k> HandshakeDecoder<'k> {
    pub fn new(keys: &'k KeyMaterial, role: Role) -> Self {
        Self {
            keys,
            role,
            phase: Phase::Idle,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Process a captured 148-byte initiation message.
    ///
    /// Recovers the initiator's static public key and timestamp, and
    /// primes the decoder for the matching response. Truncated input
    /// fails before any cryptographic work and does not change the
    /// phase; an AEAD mismatch fails the decoder and leaves no derived
    /// state behind.
    pub fn process_initiation(&mut self, packet: &[u8]) -> Result<InitiationDecode> {
        let msg = HandshakeInitiation::parse(packet)?;

        match self.decode_initiation(&msg) {
            Ok((state, decode)) => {
                self.phase = Phase::Primed {
                    state,
                    initiator_ephemeral: msg.ephemeral_public,
                };
                Ok(decode)
            }
            Err(err) => {
                self.phase = Phase::Failed;
                Err(err)
            }
        }
    }

    fn decode_initiation(
        &self,
        msg: &HandshakeInitiation,
    ) -> Result<(ChainingState, InitiationDecode)> {
        let keys = self.keys;
        let mut state = ChainingState::new(keys.responder_static_public(self.role));

        // e
        state.mix_hash(&msg.ephemeral_public);
        state.mix_chain(&msg.ephemeral_public);
        tracing::trace!("after e: ck={:02x?}...", &state.chaining_key[..4]);

        // es: the ephemeral/static combination this role can compute
        let dh_es = match self.role {
            Role::Initiator => x25519::dh(&keys.local_ephemeral, &keys.receiver_static_public),
            Role::Responder => x25519::dh(&keys.sender_static.private, &msg.ephemeral_public),
        };
        let key = state.mix_key(&dh_es);

        // s: recover the initiator's static public key
        let remote_static: [u8; 32] = state
            .decrypt_and_hash(&key, &msg.encrypted_static)?
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::Authentication)?;
        tracing::debug!("recovered remote static {:02x?}...", &remote_static[..4]);

        // ss
        let dh_ss = match self.role {
            Role::Initiator => {
                x25519::dh(&keys.sender_static.private, &keys.receiver_static_public)
            }
            Role::Responder => x25519::dh(&keys.sender_static.private, &remote_static),
        };
        let key = state.mix_key(&dh_ss);

        // timestamp
        let timestamp: [u8; 12] = state
            .decrypt_and_hash(&key, &msg.encrypted_timestamp)?
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::Authentication)?;

        let decode = InitiationDecode {
            sender_index: msg.sender_index,
            remote_static,
            timestamp: Tai64nTimestamp(timestamp),
            hash: state.hash,
            chaining_key: state.chaining_key,
        };
        Ok((state, decode))
    }

    /// Process the paired 92-byte response message and derive the
    /// transport cipher contexts.
    ///
    /// Requires a prior successful [`process_initiation`] on this
    /// decoder; anything else is a state misuse, which leaves the
    /// decoder's phase untouched, as does a truncated packet (rejected
    /// before the stored state is consumed). Authentication of the
    /// zero-length confirmation field is the sole success signal. On
    /// cryptographic failure nothing is retained.
    ///
    /// [`process_initiation`]: Self::process_initiation
    pub fn process_response(&mut self, packet: &[u8]) -> Result<CipherSession> {
        let msg = HandshakeResponse::parse(packet)?;

        let (state, initiator_ephemeral) =
            match std::mem::replace(&mut self.phase, Phase::Failed) {
                Phase::Primed {
                    state,
                    initiator_ephemeral,
                } => (state, initiator_ephemeral),
                other => {
                    self.phase = other;
                    return Err(ProtocolError::StateMisuse {
                        reason: "response processed without a matching initiation",
                    }
                    .into());
                }
            };

        // Phase is Failed from here on unless every step succeeds.
        let session = self.decode_response(&msg, state, &initiator_ephemeral)?;
        self.phase = Phase::Complete;
        Ok(session)
    }

    fn decode_response(
        &self,
        msg: &HandshakeResponse,
        mut state: ChainingState,
        initiator_ephemeral: &[u8; 32],
    ) -> Result<CipherSession> {
        let keys = self.keys;

        // e
        state.mix_hash(&msg.ephemeral_public);
        state.mix_chain(&msg.ephemeral_public);

        // ee
        let dh_ee = match self.role {
            Role::Initiator => x25519::dh(&keys.local_ephemeral, &msg.ephemeral_public),
            Role::Responder => x25519::dh(&keys.local_ephemeral, initiator_ephemeral),
        };
        state.mix_key(&dh_ee);

        // se
        let dh_se = match self.role {
            Role::Initiator => x25519::dh(&keys.sender_static.private, &msg.ephemeral_public),
            Role::Responder => x25519::dh(&keys.local_ephemeral, &keys.receiver_static_public),
        };
        state.mix_key(&dh_se);

        // psk: folded even when it is the all-zero sentinel
        let key = state.mix_key_and_hash(&keys.preshared_key);

        // Authenticating the empty payload is the confirmation signal
        state.decrypt_and_hash(&key, &msg.encrypted_empty)?;
        tracing::debug!("handshake confirmed, deriving transport keys");

        Ok(CipherSession::from_chaining_key(
            &state.chaining_key,
            self.role,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

    use crate::protocol::mac::check_mac1;
    use crate::protocol::testdata as fixtures;

    fn initiator_keys() -> KeyMaterial {
        fixtures::initiator_keys()
    }

    fn responder_keys() -> KeyMaterial {
        fixtures::responder_keys()
    }

    #[test]
    fn initiation_recovers_static_and_timestamp_as_initiator() {
        let keys = initiator_keys();
        let mut decoder = HandshakeDecoder::new(&keys, Role::Initiator);

        let decode = decoder.process_initiation(fixtures::INITIATION).unwrap();
        assert_eq!(decode.remote_static, keys.sender_static.public);
        assert_eq!(decode.timestamp.as_bytes(), &fixtures::EXPECTED_TIMESTAMP);
        assert!(decode.timestamp.to_tai64n().is_some());
    }

    #[test]
    fn initiation_recovers_static_and_timestamp_as_responder() {
        let keys = responder_keys();
        let mut decoder = HandshakeDecoder::new(&keys, Role::Responder);

        let decode = decoder.process_initiation(fixtures::INITIATION).unwrap();
        assert_eq!(decode.remote_static, keys.receiver_static_public);
        assert_eq!(decode.timestamp.as_bytes(), &fixtures::EXPECTED_TIMESTAMP);
    }

    #[test]
    fn cross_role_symmetry_of_hash_and_chaining_key() {
        let ikeys = initiator_keys();
        let rkeys = responder_keys();
        let mut initiator = HandshakeDecoder::new(&ikeys, Role::Initiator);
        let mut responder = HandshakeDecoder::new(&rkeys, Role::Responder);

        let a = initiator.process_initiation(fixtures::INITIATION).unwrap();
        let b = responder.process_initiation(fixtures::INITIATION).unwrap();

        assert_eq!(a.hash, b.hash);
        assert_eq!(a.chaining_key, b.chaining_key);
    }

    #[test]
    fn initiation_decode_is_deterministic() {
        let keys = initiator_keys();

        let first = HandshakeDecoder::new(&keys, Role::Initiator)
            .process_initiation(fixtures::INITIATION)
            .unwrap();
        let second = HandshakeDecoder::new(&keys, Role::Initiator)
            .process_initiation(fixtures::INITIATION)
            .unwrap();

        assert_eq!(first.remote_static, second.remote_static);
        assert_eq!(first.timestamp, second.timestamp);
        assert_eq!(first.hash, second.hash);
        assert_eq!(first.chaining_key, second.chaining_key);
    }

    #[test]
    fn full_exchange_yields_sessions_for_both_roles() {
        for (keys, role) in [
            (initiator_keys(), Role::Initiator),
            (responder_keys(), Role::Responder),
        ] {
            let mut decoder = HandshakeDecoder::new(&keys, role);
            decoder.process_initiation(fixtures::INITIATION).unwrap();
            decoder.process_response(fixtures::RESPONSE).unwrap();
        }
    }

    #[test]
    fn derived_sessions_interoperate_across_roles() {
        let ikeys = initiator_keys();
        let rkeys = responder_keys();

        let mut initiator = HandshakeDecoder::new(&ikeys, Role::Initiator);
        initiator.process_initiation(fixtures::INITIATION).unwrap();
        let initiator_session = initiator.process_response(fixtures::RESPONSE).unwrap();

        let mut responder = HandshakeDecoder::new(&rkeys, Role::Responder);
        responder.process_initiation(fixtures::INITIATION).unwrap();
        let responder_session = responder.process_response(fixtures::RESPONSE).unwrap();

        // Initiator-send decrypts under responder-receive and vice versa
        let packet = initiator_session
            .encrypt_transport(7, 0, b"from initiator")
            .unwrap();
        let (counter, plaintext) = responder_session.decrypt_transport(&packet).unwrap();
        assert_eq!(counter, 0);
        assert_eq!(plaintext, b"from initiator");

        let packet = responder_session
            .encrypt_transport(9, 3, b"from responder")
            .unwrap();
        let (counter, plaintext) = initiator_session.decrypt_transport(&packet).unwrap();
        assert_eq!(counter, 3);
        assert_eq!(plaintext, b"from responder");
    }

    #[test]
    fn mac1_checks_pass_in_all_four_directions() {
        let ikeys = initiator_keys();
        let rkeys = responder_keys();

        assert!(check_mac1(fixtures::INITIATION, &ikeys.receiver_mac1_key));
        assert!(check_mac1(fixtures::INITIATION, &rkeys.sender_mac1_key));
        assert!(check_mac1(fixtures::RESPONSE, &rkeys.receiver_mac1_key));
        assert!(check_mac1(fixtures::RESPONSE, &ikeys.sender_mac1_key));
    }

    #[test]
    fn mac1_keys_agree_between_sender_and_receiver() {
        let ikeys = initiator_keys();
        let rkeys = responder_keys();

        assert_eq!(ikeys.sender_mac1_key, rkeys.receiver_mac1_key);
        assert_eq!(ikeys.receiver_mac1_key, rkeys.sender_mac1_key);
    }

    #[test]
    fn tampering_with_any_encrypted_field_fails_that_step() {
        let keys = initiator_keys();

        // encrypted_static: bytes 40..88, encrypted_timestamp: 88..116
        for index in [40usize, 71, 87, 88, 99, 115] {
            let mut packet = fixtures::INITIATION.to_vec();
            packet[index] ^= 0x01;

            let mut decoder = HandshakeDecoder::new(&keys, Role::Initiator);
            let err = decoder.process_initiation(&packet).unwrap_err();
            assert!(
                matches!(
                    err,
                    crate::error::WgPeekError::Crypto(CryptoError::Authentication)
                ),
                "flip at byte {} did not fail authentication",
                index
            );
        }

        // confirmation field of the response: bytes 44..60
        for index in [44usize, 52, 59] {
            let mut packet = fixtures::RESPONSE.to_vec();
            packet[index] ^= 0x01;

            let mut decoder = HandshakeDecoder::new(&keys, Role::Initiator);
            decoder.process_initiation(fixtures::INITIATION).unwrap();
            let err = decoder.process_response(&packet).unwrap_err();
            assert!(matches!(
                err,
                crate::error::WgPeekError::Crypto(CryptoError::Authentication)
            ));
        }
    }

    #[test]
    fn failed_decoder_does_not_accept_a_response() {
        let keys = initiator_keys();
        let mut decoder = HandshakeDecoder::new(&keys, Role::Initiator);

        let mut tampered = fixtures::INITIATION.to_vec();
        tampered[50] ^= 0xff;
        assert!(decoder.process_initiation(&tampered).is_err());

        let err = decoder.process_response(fixtures::RESPONSE).unwrap_err();
        assert!(matches!(
            err,
            crate::error::WgPeekError::Protocol(ProtocolError::StateMisuse { .. })
        ));
    }

    #[test]
    fn response_without_initiation_is_state_misuse() {
        let keys = initiator_keys();
        let mut decoder = HandshakeDecoder::new(&keys, Role::Initiator);

        let err = decoder.process_response(fixtures::RESPONSE).unwrap_err();
        assert!(matches!(
            err,
            crate::error::WgPeekError::Protocol(ProtocolError::StateMisuse { .. })
        ));

        // Misuse must not poison the decoder: the exchange still works
        decoder.process_initiation(fixtures::INITIATION).unwrap();
        decoder.process_response(fixtures::RESPONSE).unwrap();
    }

    #[test]
    fn truncated_messages_fail_before_crypto() {
        let keys = initiator_keys();
        let mut decoder = HandshakeDecoder::new(&keys, Role::Initiator);

        let err = decoder
            .process_initiation(&fixtures::INITIATION[..100])
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::WgPeekError::Protocol(ProtocolError::Truncated { .. })
        ));

        decoder.process_initiation(fixtures::INITIATION).unwrap();
        let err = decoder
            .process_response(&fixtures::RESPONSE[..60])
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::WgPeekError::Protocol(ProtocolError::Truncated { .. })
        ));

        // Nothing was derived, so the decoder stays primed and accepts
        // the complete packet
        decoder.process_response(fixtures::RESPONSE).unwrap();
    }

    #[test]
    fn wrong_secrets_fail_authentication_not_silently() {
        let keys = KeyMaterial::from_base64(
            &BASE64.encode([42u8; 32]),
            "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=",
            "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=",
            "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=",
        )
        .unwrap();

        let mut decoder = HandshakeDecoder::new(&keys, Role::Initiator);
        let err = decoder.process_initiation(fixtures::INITIATION).unwrap_err();
        assert!(matches!(
            err,
            crate::error::WgPeekError::Crypto(CryptoError::Authentication)
        ));
    }
}
