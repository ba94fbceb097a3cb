//! Record-layer framing: `type(1) || version(2) || length(2) || fragment`.
//!
//! Only the plaintext envelope lives here; record protection is not part of
//! the handshake engine.

use crate::error::{HandshakeError, Result};
use crate::protocol::types::ContentType;

pub const RECORD_HEADER_LEN: usize = 5;

/// Largest plaintext fragment (2^14).
pub const MAX_FRAGMENT_LEN: usize = 16384;

/// Largest fragment accepted on input: 2^14 plus a 2KB allowance for
/// ciphertext expansion.
pub const MAX_WIRE_FRAGMENT_LEN: usize = MAX_FRAGMENT_LEN + 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub content_type: ContentType,
    pub version: u16,
    pub fragment: &'a [u8],
}

/// Splits `payload` into as many records as needed.
pub fn encode_records(content_type: ContentType, version: u16, payload: &[u8]) -> Vec<u8> {
    let chunks = payload.len().div_ceil(MAX_FRAGMENT_LEN).max(1);
    let mut out = Vec::with_capacity(payload.len() + chunks * RECORD_HEADER_LEN);
    // An empty payload still produces one (empty) record.
    let mut pieces: Vec<&[u8]> = payload.chunks(MAX_FRAGMENT_LEN).collect();
    if pieces.is_empty() {
        pieces.push(&[]);
    }
    for piece in pieces {
        out.push(content_type as u8);
        out.extend_from_slice(&version.to_be_bytes());
        out.extend_from_slice(&(piece.len() as u16).to_be_bytes());
        out.extend_from_slice(piece);
    }
    out
}

/// Parses one record from the front of `data`, returning it and the bytes consumed.
pub fn decode_record(data: &[u8]) -> Result<(Record<'_>, usize)> {
    if data.len() < RECORD_HEADER_LEN {
        return Err(HandshakeError::Incomplete {
            needed: RECORD_HEADER_LEN - data.len(),
        });
    }
    let content_type = ContentType::try_from(data[0])?;
    let version = u16::from_be_bytes([data[1], data[2]]);
    let len = u16::from_be_bytes([data[3], data[4]]) as usize;
    if len > MAX_WIRE_FRAGMENT_LEN {
        return Err(HandshakeError::RecordOverflow(len));
    }
    let total = RECORD_HEADER_LEN + len;
    if data.len() < total {
        return Err(HandshakeError::Incomplete {
            needed: total - data.len(),
        });
    }
    Ok((
        Record {
            content_type,
            version,
            fragment: &data[RECORD_HEADER_LEN..total],
        },
        total,
    ))
}
