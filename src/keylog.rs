//! Line-oriented key-source records and their cache
//!
//! The capture-side tooling feeds secrets to the decoder through a small
//! text format, one record per line:
//!
//! ```text
//! # handshake-field keys, tagged by the field they decrypt
//! STAT 15cf47c7 <base64 32-byte key> [<base64 associated data>]
//! TIME 15cf47c7 <base64 32-byte key>
//! EMPT 32fa1aac <base64 32-byte key>
//! DATA 15cf47c7 <base64 32-byte key>
//!
//! # bare transport secrets
//! 15cf47c7 <base64 32-byte key>
//! ```
//!
//! Peer ids are 32-bit hex; blank lines and `#` comments are ignored.
//! Caching is an explicit [`KeylogCache`] owned by the caller and
//! invalidated explicitly on file change — there is no process-wide
//! memoization.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::error::KeylogError;

/// Which encrypted field a tagged key decrypts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// The encrypted-static field of an initiation (`STAT`)
    Static,
    /// The encrypted-timestamp field of an initiation (`TIME`)
    Timestamp,
    /// The encrypted-empty confirmation of a response (`EMPT`)
    Empty,
    /// A transport-data payload (`DATA`)
    Data,
}

impl FieldKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "STAT" => Some(Self::Static),
            "TIME" => Some(Self::Timestamp),
            "EMPT" => Some(Self::Empty),
            "DATA" => Some(Self::Data),
            _ => None,
        }
    }
}

/// One parsed key-source record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeylogRecord {
    /// Tagged per-field key, optionally with the associated data the
    /// field was sealed under
    HandshakeField {
        kind: FieldKind,
        peer_id: u32,
        key: [u8; 32],
        aad: Option<Vec<u8>>,
    },
    /// Bare transport secret for a peer
    TransportSecret { peer_id: u32, key: [u8; 32] },
}

impl KeylogRecord {
    pub fn peer_id(&self) -> u32 {
        match self {
            Self::HandshakeField { peer_id, .. } | Self::TransportSecret { peer_id, .. } => {
                *peer_id
            }
        }
    }
}

/// Parse a whole key-source text
pub fn parse(content: &str) -> Result<Vec<KeylogRecord>, KeylogError> {
    let mut records = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if let Some(record) = parse_line(line, index + 1)? {
            records.push(record);
        }
    }
    Ok(records)
}

fn parse_line(line: &str, line_no: usize) -> Result<Option<KeylogRecord>, KeylogError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();

    // A leading field-kind tag distinguishes the two record shapes
    if let Some(kind) = FieldKind::from_tag(fields[0]) {
        if fields.len() < 3 || fields.len() > 4 {
            return Err(KeylogError::Syntax {
                line: line_no,
                message: format!("expected 'KIND peer_id key [aad]', got {} fields", fields.len()),
            });
        }

        let peer_id = parse_peer_id(fields[1], line_no)?;
        let key = decode_key(fields[2], line_no)?;
        let aad = match fields.get(3) {
            Some(encoded) => Some(
                BASE64
                    .decode(encoded)
                    .map_err(|_| KeylogError::BadKey { line: line_no })?,
            ),
            None => None,
        };

        return Ok(Some(KeylogRecord::HandshakeField {
            kind,
            peer_id,
            key,
            aad,
        }));
    }

    if fields.len() != 2 {
        return Err(KeylogError::Syntax {
            line: line_no,
            message: format!("expected 'peer_id key', got {} fields", fields.len()),
        });
    }

    Ok(Some(KeylogRecord::TransportSecret {
        peer_id: parse_peer_id(fields[0], line_no)?,
        key: decode_key(fields[1], line_no)?,
    }))
}

fn parse_peer_id(text: &str, line_no: usize) -> Result<u32, KeylogError> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    u32::from_str_radix(digits, 16).map_err(|_| KeylogError::Syntax {
        line: line_no,
        message: format!("bad peer id '{}'", text),
    })
}

fn decode_key(encoded: &str, line_no: usize) -> Result<[u8; 32], KeylogError> {
    let decoded = BASE64
        .decode(encoded)
        .map_err(|_| KeylogError::BadKey { line: line_no })?;
    decoded
        .as_slice()
        .try_into()
        .map_err(|_| KeylogError::BadKey { line: line_no })
}

/// Explicit cache mapping key-source path to parsed records.
///
/// The caller owns the cache, passes it by reference into decode calls,
/// and invalidates it when the underlying file changes.
#[derive(Debug, Default)]
pub struct KeylogCache {
    entries: HashMap<PathBuf, Vec<KeylogRecord>>,
}

impl KeylogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read, parse and cache a key-source file, replacing any stale
    /// entry for the same path.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<&[KeylogRecord], KeylogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let records = parse(&content)?;

        tracing::debug!(
            "loaded {} key-source records from {}",
            records.len(),
            path.display()
        );

        let entry = self.entries.entry(path.to_path_buf()).or_default();
        *entry = records;
        Ok(entry.as_slice())
    }

    /// Cached records for a path, if previously loaded
    pub fn get<P: AsRef<Path>>(&self, path: P) -> Option<&[KeylogRecord]> {
        self.entries.get(path.as_ref()).map(Vec::as_slice)
    }

    /// Drop the cached records for a changed file. Returns whether an
    /// entry existed.
    pub fn invalidate<P: AsRef<Path>>(&mut self, path: P) -> bool {
        self.entries.remove(path.as_ref()).is_some()
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
