//! WireGuard wire formats as seen on the capture
//!
//! - Type 1: Handshake Initiation (148 bytes)
//! - Type 2: Handshake Response (92 bytes)
//! - Type 3: Cookie Reply (64 bytes, parse-only)
//! - Type 4: Transport Data (16-byte header + encrypted payload)
//!
//! Multi-byte integers are little-endian. Reserved bytes are not
//! validated; an observer must tolerate whatever is on the wire.

use crate::error::ProtocolError;
use crate::protocol::reader::PacketReader;

/// Message type byte
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    HandshakeInitiation = 1,
    HandshakeResponse = 2,
    CookieReply = 3,
    TransportData = 4,
}

impl TryFrom<u8> for MessageType {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::HandshakeInitiation),
            2 => Ok(Self::HandshakeResponse),
            3 => Ok(Self::CookieReply),
            4 => Ok(Self::TransportData),
            _ => Err(ProtocolError::UnknownMessageType { msg_type: value }),
        }
    }
}

/// Type-dispatched view of a captured packet.
///
/// One arm per message type; the type byte selects the layout, nothing
/// dynamic involved.
pub enum Message<'a> {
    Initiation(HandshakeInitiation),
    Response(HandshakeResponse),
    CookieReply(CookieReply),
    Transport(TransportPacket<'a>),
}

impl<'a> Message<'a> {
    /// Parse a packet according to its type byte
    pub fn parse(data: &'a [u8]) -> Result<Self, ProtocolError> {
        let type_byte = *data.first().ok_or(ProtocolError::Truncated {
            needed: 1,
            available: 0,
        })?;

        match MessageType::try_from(type_byte)? {
            MessageType::HandshakeInitiation => {
                HandshakeInitiation::parse(data).map(Message::Initiation)
            }
            MessageType::HandshakeResponse => {
                HandshakeResponse::parse(data).map(Message::Response)
            }
            MessageType::CookieReply => CookieReply::parse(data).map(Message::CookieReply),
            MessageType::TransportData => TransportPacket::parse(data).map(Message::Transport),
        }
    }
}

fn expect_type(reader: &mut PacketReader<'_>, expected: MessageType) -> Result<(), ProtocolError> {
    let got = reader.u8()?;
    if got != expected as u8 {
        return Err(ProtocolError::UnexpectedMessageType {
            expected: expected as u8,
            got,
        });
    }
    reader.take(3)?; // reserved
    Ok(())
}

/// Handshake Initiation (148 bytes)
///
/// ```text
/// type(1) | reserved(3) | sender_index(4) | ephemeral_public(32) |
/// encrypted_static(48) | encrypted_timestamp(28) | mac1(16) | mac2(16)
/// ```
#[derive(Debug, Clone)]
pub struct HandshakeInitiation {
    pub sender_index: u32,
    pub ephemeral_public: [u8; 32],
    pub encrypted_static: [u8; 48], // 32 bytes static + 16 bytes tag
    pub encrypted_timestamp: [u8; 28], // 12 bytes TAI64N + 16 bytes tag
    pub mac1: [u8; 16],
    pub mac2: [u8; 16],
}

impl HandshakeInitiation {
    /// Fixed message size
    pub const SIZE: usize = 148;

    pub fn parse(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut reader = PacketReader::new(data);
        expect_type(&mut reader, MessageType::HandshakeInitiation)?;

        Ok(Self {
            sender_index: reader.u32_le()?,
            ephemeral_public: reader.array()?,
            encrypted_static: reader.array()?,
            encrypted_timestamp: reader.array()?,
            mac1: reader.array()?,
            mac2: reader.array()?,
        })
    }
}

/// Handshake Response (92 bytes)
///
/// ```text
/// type(1) | reserved(3) | sender_index(4) | receiver_index(4) |
/// ephemeral_public(32) | encrypted_empty(16) | mac1(16) | mac2(16)
/// ```
#[derive(Debug, Clone)]
pub struct HandshakeResponse {
    pub sender_index: u32,
    pub receiver_index: u32,
    pub ephemeral_public: [u8; 32],
    pub encrypted_empty: [u8; 16], // 0 bytes ciphertext + 16 bytes tag
    pub mac1: [u8; 16],
    pub mac2: [u8; 16],
}

impl HandshakeResponse {
    /// Fixed message size
    pub const SIZE: usize = 92;

    pub fn parse(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut reader = PacketReader::new(data);
        expect_type(&mut reader, MessageType::HandshakeResponse)?;

        Ok(Self {
            sender_index: reader.u32_le()?,
            receiver_index: reader.u32_le()?,
            ephemeral_public: reader.array()?,
            encrypted_empty: reader.array()?,
            mac1: reader.array()?,
            mac2: reader.array()?,
        })
    }
}

/// Cookie Reply (64 bytes)
///
/// ```text
/// type(1) | reserved(3) | receiver_index(4) | nonce(24) | encrypted_cookie(32)
/// ```
///
/// Recognized but parse-only: the reference behavior supplies no keys for
/// this path, so no decryption is claimed.
#[derive(Debug, Clone)]
pub struct CookieReply {
    pub receiver_index: u32,
    pub nonce: [u8; 24],
    pub encrypted_cookie: [u8; 32], // 16 bytes cookie + 16 bytes tag
}

impl CookieReply {
    /// Fixed message size
    pub const SIZE: usize = 64;

    pub fn parse(data: &[u8]) -> Result<Self, ProtocolError> {
        let mut reader = PacketReader::new(data);
        expect_type(&mut reader, MessageType::CookieReply)?;

        Ok(Self {
            receiver_index: reader.u32_le()?,
            nonce: reader.array()?,
            encrypted_cookie: reader.array()?,
        })
    }
}

/// Transport Data (16-byte header, then ciphertext + tag)
///
/// ```text
/// type(1) | reserved(3) | receiver_index(4) | counter(8) | encrypted_packet(n+16)
/// ```
#[derive(Debug, Clone)]
pub struct TransportPacket<'a> {
    pub receiver_index: u32,
    pub counter: u64,
    /// Ciphertext including the 16-byte tag; a bare tag is a keepalive
    pub payload: &'a [u8],
}

impl<'a> TransportPacket<'a> {
    /// Header size, not counting the encrypted payload
    pub const HEADER_SIZE: usize = 16;

    /// Smallest valid message: header plus the tag of an empty payload
    pub const MIN_SIZE: usize = Self::HEADER_SIZE + 16;

    pub fn parse(data: &'a [u8]) -> Result<Self, ProtocolError> {
        let mut reader = PacketReader::new(data);
        expect_type(&mut reader, MessageType::TransportData)?;

        let receiver_index = reader.u32_le()?;
        let counter = reader.u64_le()?;
        let payload = reader.rest();

        if payload.len() < 16 {
            return Err(ProtocolError::Truncated {
                needed: Self::MIN_SIZE,
                available: data.len(),
            });
        }

        Ok(Self {
            receiver_index,
            counter,
            payload,
        })
    }

    /// Build a complete transport message around an encrypted payload
    pub fn build(receiver_index: u32, counter: u64, encrypted_payload: &[u8]) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::HEADER_SIZE + encrypted_payload.len());

        buf.push(MessageType::TransportData as u8);
        buf.extend_from_slice(&[0, 0, 0]); // reserved
        buf.extend_from_slice(&receiver_index.to_le_bytes());
        buf.extend_from_slice(&counter.to_le_bytes());
        buf.extend_from_slice(encrypted_payload);

        buf
    }
}
