//! Handshake message framing: `type(1) || uint24_be(length) || body`.
//!
//! The 4-byte header is the SSLv3 / TLS 1.0 wire format and is
//! reproduced byte-for-byte.
//!
//! 握手消息帧：`type(1) || uint24_be(length) || body`。
//! 4 字节头部即 SSLv3 / TLS 1.0 的线路格式，逐字节复现。

use crate::error::{HandshakeError, Result};
use crate::protocol::types::HandshakeType;

/// Size of the handshake header.
pub const HEADER_LEN: usize = 4;

/// Largest body a uint24 length can describe.
pub const MAX_BODY_LEN: usize = 0x00FF_FFFF;

/// A complete frame borrowed from an input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub msg_type: HandshakeType,
    /// The body bytes, without the header.
    pub body: &'a [u8],
    /// The whole frame, header included, exactly as received.
    pub raw: &'a [u8],
}

/// Wraps `body` with the handshake header.
pub fn encode_frame(msg_type: HandshakeType, body: &[u8]) -> Result<Vec<u8>> {
    if body.len() > MAX_BODY_LEN {
        return Err(HandshakeError::MessageTooLarge {
            len: body.len(),
            limit: MAX_BODY_LEN,
        });
    }
    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.push(msg_type as u8);
    push_u24(&mut out, body.len() as u32);
    out.extend_from_slice(body);
    tracing::trace!(?msg_type, len = body.len(), "encoded handshake frame");
    Ok(out)
}

/// Parses one frame from the start of `data`.
///
/// Returns the frame and the number of bytes it occupies. When `data` does not
/// hold a whole frame, returns [`HandshakeError::Incomplete`] with the number of
/// additional bytes needed; nothing is retained between calls.
///
/// 从 `data` 起始处解析一个帧。返回帧及其占用的字节数。
/// 当 `data` 不足一个完整帧时，返回带有所需额外字节数的 [`HandshakeError::Incomplete`]；
/// 调用之间不保留任何状态。
pub fn decode_frame(data: &[u8]) -> Result<(Frame<'_>, usize)> {
    let Some(len) = peek_body_len(data) else {
        return Err(HandshakeError::Incomplete {
            needed: HEADER_LEN - data.len(),
        });
    };
    let msg_type = HandshakeType::try_from(data[0])?;
    let total = HEADER_LEN + len;
    if data.len() < total {
        return Err(HandshakeError::Incomplete {
            needed: total - data.len(),
        });
    }
    tracing::trace!(?msg_type, len, "decoded handshake frame");
    Ok((
        Frame {
            msg_type,
            body: &data[HEADER_LEN..total],
            raw: &data[..total],
        },
        total,
    ))
}

/// Reads the declared body length from a header without requiring the body.
pub(crate) fn peek_body_len(data: &[u8]) -> Option<usize> {
    if data.len() < HEADER_LEN {
        return None;
    }
    Some(((data[1] as usize) << 16) | ((data[2] as usize) << 8) | data[3] as usize)
}

/// A length prefix must hold `len` exactly; it is never truncated.
fn checked_len(len: usize, limit: usize) -> Result<usize> {
    if len > limit {
        return Err(HandshakeError::MessageTooLarge { len, limit });
    }
    Ok(len)
}

fn push_u24(buf: &mut Vec<u8>, val: u32) {
    buf.push((val >> 16) as u8);
    buf.push((val >> 8) as u8);
    buf.push(val as u8);
}

/// A reusable body buffer.
///
/// Bodies are written field by field, then [`HandshakeWriter::finish`] frames
/// them and leaves the writer empty for the next outbound message.
#[derive(Debug, Default)]
pub struct HandshakeWriter {
    buf: Vec<u8>,
}

impl HandshakeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn put_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn put_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    pub fn put_u24(&mut self, v: u32) {
        push_u24(&mut self.buf, v);
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// `opaque<0..2^8-1>`
    pub fn put_vec_u8(&mut self, bytes: &[u8]) -> Result<()> {
        let len = checked_len(bytes.len(), u8::MAX as usize)?;
        self.put_u8(len as u8);
        self.put_bytes(bytes);
        Ok(())
    }

    /// `opaque<0..2^16-1>`
    pub fn put_vec_u16(&mut self, bytes: &[u8]) -> Result<()> {
        let len = checked_len(bytes.len(), u16::MAX as usize)?;
        self.put_u16(len as u16);
        self.put_bytes(bytes);
        Ok(())
    }

    /// `opaque<0..2^24-1>`
    pub fn put_vec_u24(&mut self, bytes: &[u8]) -> Result<()> {
        let len = checked_len(bytes.len(), MAX_BODY_LEN)?;
        self.put_u24(len as u32);
        self.put_bytes(bytes);
        Ok(())
    }

    /// Frames the buffered body and resets the writer.
    ///
    /// On error the buffered body is discarded as well, so a failed message
    /// never leaks into the next one.
    pub fn finish(&mut self, msg_type: HandshakeType) -> Result<Vec<u8>> {
        let body = std::mem::take(&mut self.buf);
        encode_frame(msg_type, &body)
    }

    /// Takes the buffered bytes without a header, for nested vectors.
    pub fn finish_unframed(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    /// Drops any buffered bytes.
    pub fn reset(&mut self) {
        self.buf.clear();
    }
}

/// A bounds-checked cursor over a handshake body.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(HandshakeError::Decode("body truncated"));
        }
        let out = &self.buf[self.offset..self.offset + n];
        self.offset += n;
        Ok(out)
    }

    /// Consumes everything that is left.
    pub fn rest(&mut self) -> &'a [u8] {
        let out = &self.buf[self.offset..];
        self.offset = self.buf.len();
        out
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn u24(&mut self) -> Result<u32> {
        let b = self.take(3)?;
        Ok(((b[0] as u32) << 16) | ((b[1] as u32) << 8) | b[2] as u32)
    }

    pub fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn vec_u8(&mut self) -> Result<&'a [u8]> {
        let len = self.u8()? as usize;
        self.take(len)
    }

    pub fn vec_u16(&mut self) -> Result<&'a [u8]> {
        let len = self.u16()? as usize;
        self.take(len)
    }

    pub fn vec_u24(&mut self) -> Result<&'a [u8]> {
        let len = self.u24()? as usize;
        self.take(len)
    }

    /// Fails if any bytes are left unread.
    pub fn expect_end(&self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(HandshakeError::Decode("trailing bytes after body"))
        }
    }
}
