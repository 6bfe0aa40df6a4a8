//! Error types for the wgpeek decryption core
//!
//! Every failure is a returned value; nothing in the core panics or aborts
//! the caller. Authentication failures in particular are expected, frequent
//! outcomes when scanning captures with the wrong secrets.

use thiserror::Error;

/// Main error type for wgpeek operations
#[derive(Error, Debug)]
pub enum WgPeekError {
    /// Key material loading/derivation errors
    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    /// Cryptographic errors
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Wire-format and state-machine errors
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Key-source file errors
    #[error("Keylog error: {0}")]
    Keylog(#[from] KeylogError),
}

/// Errors loading and deriving key material from base64 secrets
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid base64 in {field}")]
    Base64 { field: &'static str },

    #[error("Wrong key length for {field}: expected 32 bytes, got {got}")]
    Length { field: &'static str, got: usize },

    #[error("Scalar derivation rejected for {field}")]
    Derivation { field: &'static str },
}

/// Cryptographic operation errors
#[derive(Error, Debug)]
pub enum CryptoError {
    /// AEAD tag did not verify. No plaintext is produced.
    #[error("Authentication failed: invalid ciphertext or tag")]
    Authentication,

    #[error("Encryption failed")]
    Encryption,
}

/// Wire-format and handshake state errors
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Message shorter than its fixed layout requires. Raised before any
    /// cryptographic work touches the buffer.
    #[error("Message truncated: needed {needed} bytes, only {available} available")]
    Truncated { needed: usize, available: usize },

    #[error("Unknown message type: {msg_type}")]
    UnknownMessageType { msg_type: u8 },

    #[error("Unexpected message type: expected {expected}, got {got}")]
    UnexpectedMessageType { expected: u8, got: u8 },

    /// process_response called without a valid prior process_initiation.
    #[error("Handshake state misuse: {reason}")]
    StateMisuse { reason: &'static str },
}

/// Key-source (keylog) file parsing errors
#[derive(Error, Debug)]
pub enum KeylogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Bad key encoding at line {line}")]
    BadKey { line: usize },
}

/// Result type alias for wgpeek operations
pub type Result<T> = std::result::Result<T, WgPeekError>;
