//! mac1 verification over captured handshake messages
//!
//! mac1 covers everything before the two trailing 16-byte MAC fields and
//! proves the sender knew key material derived from the addressee's static
//! public key. A mismatch is a routine outcome when scanning traffic, so
//! it is a `bool`, not an error.

use subtle::ConstantTimeEq;

use crate::crypto::blake2s;

/// Combined length of the trailing mac1 and mac2 fields
const MAC_TRAILER_LEN: usize = 2 * blake2s::MAC_LEN;

/// Verify mac1 on a handshake message.
///
/// Computes the 16-byte keyed hash over `message[..len-32]` and compares
/// it constant-time against the mac1 field at `message[len-32..len-16]`.
/// Messages too short to carry the MAC trailer verify as false.
pub fn check_mac1(message: &[u8], mac1_key: &[u8; 32]) -> bool {
    let Some(covered_len) = message.len().checked_sub(MAC_TRAILER_LEN) else {
        return false;
    };

    let expected = blake2s::mac(mac1_key, &message[..covered_len]);
    let actual = &message[covered_len..covered_len + blake2s::MAC_LEN];

    expected.ct_eq(actual).into()
}
