//! wgpeek - passive WireGuard handshake decryption core
//!
//! Recovers session state from captured WireGuard handshake messages: a
//! from-scratch Noise_IKpsk2 implementation (X25519 chaining, BLAKE2s
//! KDF, ChaCha20-Poly1305, mac1 verification) that, given the
//! static/ephemeral/preshared secrets recovered out-of-band, derives the
//! same transport keys a live peer would — purely by observing wire
//! traffic. No key generation, no peer tables, no timers, no randomness
//! on the decode path.
//!
//! # Usage
//!
//! ```no_run
//! use wgpeek::{HandshakeDecoder, KeyMaterial, Role};
//!
//! fn main() -> wgpeek::Result<()> {
//!     let keys = KeyMaterial::from_base64(
//!         "<static private>",
//!         "<peer static public>",
//!         "<ephemeral private>",
//!         "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=",
//!     )?;
//!
//!     let mut decoder = HandshakeDecoder::new(&keys, Role::Initiator);
//!     let decode = decoder.process_initiation(&captured_initiation())?;
//!     println!("peer static: {:02x?}", decode.remote_static);
//!
//!     let session = decoder.process_response(&captured_response())?;
//!     let (counter, plaintext) = session.decrypt_transport(&captured_data())?;
//!     # drop((counter, plaintext));
//!     Ok(())
//! }
//! # fn captured_initiation() -> Vec<u8> { unimplemented!() }
//! # fn captured_response() -> Vec<u8> { unimplemented!() }
//! # fn captured_data() -> Vec<u8> { unimplemented!() }
//! ```

pub mod crypto;
pub mod error;
pub mod keylog;
pub mod keys;
pub mod protocol;

pub use error::{Result, WgPeekError};
pub use keylog::{KeylogCache, KeylogRecord};
pub use keys::{KeyMaterial, Role};
pub use protocol::{
    check_mac1, CipherSession, HandshakeDecoder, InitiationDecode, Message, Tai64nTimestamp,
};
