//! Assembles complete handshake frames out of arbitrarily split input.

use crate::error::{HandshakeError, Result};
use crate::protocol::codec::{self, HEADER_LEN};
use crate::protocol::types::HandshakeType;

/// An owned copy of one complete handshake frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedFrame {
    pub msg_type: HandshakeType,
    raw: Vec<u8>,
}

impl OwnedFrame {
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn body(&self) -> &[u8] {
        &self.raw[HEADER_LEN..]
    }

    pub fn as_frame(&self) -> codec::Frame<'_> {
        codec::Frame {
            msg_type: self.msg_type,
            body: self.body(),
            raw: &self.raw,
        }
    }
}

/// Buffers incoming handshake bytes and hands out whole frames.
///
/// The framer itself keeps no partial state, so this is where input is held
/// until [`codec::decode_frame`] stops reporting `Incomplete`.
///
/// 缓冲传入的握手字节并输出完整的帧。
#[derive(Debug)]
pub struct HandshakeJoiner {
    buf: Vec<u8>,
    max_message_len: usize,
}

impl HandshakeJoiner {
    pub fn new(max_message_len: usize) -> Self {
        Self {
            buf: Vec::new(),
            max_message_len,
        }
    }

    pub fn push(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Number of buffered bytes not yet returned as a frame.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes still needed to complete the frame at the head of the buffer, or
    /// zero if a whole frame (or nothing) is buffered.
    pub fn needed(&self) -> usize {
        match codec::decode_frame(&self.buf) {
            Err(HandshakeError::Incomplete { needed }) if !self.buf.is_empty() => needed,
            _ => 0,
        }
    }

    /// Pops the next complete frame, or `None` if more input is required.
    ///
    /// Oversized declarations are rejected as soon as the header is visible,
    /// before the body is buffered.
    pub fn next_frame(&mut self) -> Result<Option<OwnedFrame>> {
        if let Some(len) = codec::peek_body_len(&self.buf) {
            if len > self.max_message_len {
                return Err(HandshakeError::MessageTooLarge {
                    len,
                    limit: self.max_message_len,
                });
            }
        }
        let (msg_type, consumed) = match codec::decode_frame(&self.buf) {
            Ok((frame, consumed)) => (frame.msg_type, consumed),
            Err(HandshakeError::Incomplete { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        let raw: Vec<u8> = self.buf.drain(..consumed).collect();
        Ok(Some(OwnedFrame { msg_type, raw }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codec::encode_frame;

    #[test]
    fn test_frames_split_across_pushes() {
        let mut wire = encode_frame(HandshakeType::ServerHello, &[1, 2, 3, 4, 5]).unwrap();
        wire.extend(encode_frame(HandshakeType::ServerHelloDone, &[]).unwrap());

        let mut joiner = HandshakeJoiner::new(1024);
        joiner.push(&wire[..3]);
        assert!(joiner.next_frame().unwrap().is_none());
        assert_eq!(joiner.needed(), 1);

        joiner.push(&wire[3..7]);
        assert!(joiner.next_frame().unwrap().is_none());
        assert_eq!(joiner.needed(), 2);

        joiner.push(&wire[7..]);
        let first = joiner.next_frame().unwrap().unwrap();
        assert_eq!(first.msg_type, HandshakeType::ServerHello);
        assert_eq!(first.body(), &[1, 2, 3, 4, 5]);

        let second = joiner.next_frame().unwrap().unwrap();
        assert_eq!(second.msg_type, HandshakeType::ServerHelloDone);
        assert_eq!(second.raw(), &[14, 0, 0, 0]);
        assert!(joiner.is_empty());
        assert!(joiner.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_oversized_declaration_rejected_early() {
        let mut joiner = HandshakeJoiner::new(16);
        joiner.push(&[11, 0, 0, 17]);
        assert!(matches!(
            joiner.next_frame(),
            Err(HandshakeError::MessageTooLarge { len: 17, limit: 16 })
        ));
    }
}
