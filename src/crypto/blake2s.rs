//! BLAKE2s primitives for the WireGuard handshake
//!
//! Hash, keyed MAC, HMAC and the HKDF-style extract/expand chain the
//! protocol derives every secret from.

use blake2::{
    digest::{consts::U16, FixedOutput, Mac as MacTrait, Update},
    Blake2s256, Blake2sMac, Digest,
};
use hmac::SimpleHmac;

/// RFC 2104 HMAC over BLAKE2s-256. WireGuard implementations use the
/// standard HMAC construction despite the whitepaper's keyed-hash notation.
type HmacBlake2s = SimpleHmac<Blake2s256>;

/// Length of BLAKE2s-256 output (hash, chaining key, derived keys)
pub const HASH_LEN: usize = 32;

/// Length of the truncated BLAKE2s MAC used for mac1/mac2
pub const MAC_LEN: usize = 16;

/// BLAKE2s-256 over a single input
pub fn hash(data: &[u8]) -> [u8; HASH_LEN] {
    let mut hasher = Blake2s256::new();
    Digest::update(&mut hasher, data);
    hasher.finalize().into()
}

/// BLAKE2s-256 over two concatenated inputs: HASH(a || b)
pub fn hash_two(a: &[u8], b: &[u8]) -> [u8; HASH_LEN] {
    let mut hasher = Blake2s256::new();
    Digest::update(&mut hasher, a);
    Digest::update(&mut hasher, b);
    hasher.finalize().into()
}

/// Keyed BLAKE2s with 16-byte output, used for mac1 over message prefixes
pub fn mac(key: &[u8; HASH_LEN], data: &[u8]) -> [u8; MAC_LEN] {
    let mut mac = Blake2sMac::<U16>::new_from_slice(key).expect("valid key length");
    MacTrait::update(&mut mac, data);
    mac.finalize_fixed().into()
}

/// HMAC-BLAKE2s, the extract step of the protocol's KDF chain
pub fn hmac(key: &[u8], data: &[u8]) -> [u8; HASH_LEN] {
    let mut mac = HmacBlake2s::new_from_slice(key).expect("HMAC accepts any key length");
    Update::update(&mut mac, data);
    mac.finalize_fixed().into()
}

/// HKDF-style extract-and-expand producing `N` 32-byte outputs.
///
/// temp = HMAC(key, ikm); T1 = HMAC(temp, 0x01); Tn = HMAC(temp, Tn-1 || n).
/// The protocol only ever needs N in 1..=3 (KDF1/KDF2/KDF3).
pub fn kdf<const N: usize>(key: &[u8; HASH_LEN], ikm: &[u8]) -> [[u8; HASH_LEN]; N] {
    let temp = hmac(key, ikm);
    let mut out = [[0u8; HASH_LEN]; N];
    let mut block = [0u8; HASH_LEN + 1];

    for i in 0..N {
        block[HASH_LEN] = (i + 1) as u8;
        out[i] = if i == 0 {
            hmac(&temp, &block[HASH_LEN..])
        } else {
            block[..HASH_LEN].copy_from_slice(&out[i - 1]);
            hmac(&temp, &block)
        };
    }
    out
}
