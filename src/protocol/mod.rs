//! Protocol-level decoding
//!
//! - Wire formats and type dispatch (messages)
//! - Bounds-checked packet cursor (reader)
//! - mac1 verification (mac)
//! - Handshake recovery state machine (handshake)
//! - Transport cipher sessions (session)

pub mod handshake;
pub mod mac;
pub mod messages;
pub mod reader;
pub mod session;

#[cfg(test)]
pub(crate) mod testdata;

pub use handshake::{HandshakeDecoder, InitiationDecode, Tai64nTimestamp};
pub use mac::check_mac1;
pub use messages::{
    CookieReply, HandshakeInitiation, HandshakeResponse, Message, MessageType, TransportPacket,
};
pub use reader::PacketReader;
pub use session::CipherSession;
