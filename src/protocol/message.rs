//! The handshake message object model.
//!
//! A [`HandshakeMessage`] wraps one typed body and tracks whether it has been
//! folded into the transcript. Processing is dispatched on the negotiated
//! [`Dialect`] to one of two per-body hooks.
//!
//! 握手消息对象模型。
//!
//! [`HandshakeMessage`] 包装一个类型化的消息体，并跟踪它是否已被并入握手记录。
//! 处理过程根据协商的 [`Dialect`] 分派到消息体的两个钩子之一。

use crate::context::Context;
use crate::error::{HandshakeError, Result};
use crate::protocol::codec::{Frame, HandshakeWriter, Reader};
use crate::protocol::types::{ContentType, Dialect, HandshakeType};

/// A typed handshake body.
pub trait HandshakeBody: Sized {
    const HANDSHAKE_TYPE: HandshakeType;

    /// Writes the body (header excluded). Fails rather than truncate a field
    /// that does not fit its length prefix.
    fn encode(&self, dialect: Dialect, writer: &mut HandshakeWriter) -> Result<()>;

    /// Parses the body (header excluded). Implementations must consume the
    /// whole reader.
    fn decode(dialect: Dialect, reader: &mut Reader<'_>) -> Result<Self>;

    /// Applies a received SSLv3 message to the context.
    fn process_as_ssl3(&mut self, context: &mut Context) -> Result<()>;

    /// Applies a received TLS 1.0 message to the context.
    fn process_as_tls1(&mut self, context: &mut Context) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessageState {
    Writable,
    Committed,
}

#[derive(Debug)]
pub struct HandshakeMessage<B> {
    body: B,
    /// Cached wire encoding, header included.
    wire: Option<Vec<u8>>,
    state: MessageState,
}

impl<B: HandshakeBody> HandshakeMessage<B> {
    /// Wraps an outbound body.
    pub fn new(body: B) -> Self {
        Self {
            body,
            wire: None,
            state: MessageState::Writable,
        }
    }

    /// Builds an inbound message from a received frame.
    ///
    /// The received bytes are kept verbatim; those are what the transcript
    /// sees, never a re-encoding.
    ///
    /// 从收到的帧构建入站消息。收到的字节被逐字保留，握手记录使用的正是这些字节，而不是重新编码的结果。
    pub fn decode(frame: Frame<'_>, context: &Context) -> Result<Self> {
        if frame.msg_type != B::HANDSHAKE_TYPE {
            return Err(HandshakeError::UnexpectedMessage {
                expected: B::HANDSHAKE_TYPE,
                found: Some(frame.msg_type),
            });
        }
        let dialect = context.protocol().dialect()?;
        let mut reader = Reader::new(frame.body);
        let body = B::decode(dialect, &mut reader)?;
        reader.expect_end()?;
        Ok(Self {
            body,
            wire: Some(frame.raw.to_vec()),
            state: MessageState::Writable,
        })
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn into_body(self) -> B {
        self.body
    }

    pub fn handshake_type(&self) -> HandshakeType {
        B::HANDSHAKE_TYPE
    }

    pub fn content_type(&self) -> ContentType {
        ContentType::Handshake
    }

    pub fn is_committed(&self) -> bool {
        self.state == MessageState::Committed
    }

    /// The wire encoding, computed on first use and cached.
    pub fn encode(&mut self, context: &mut Context) -> Result<&[u8]> {
        if self.is_committed() {
            return Err(HandshakeError::InvalidState);
        }
        let wire = match self.wire.take() {
            Some(wire) => wire,
            None => {
                let dialect = context.protocol().dialect()?;
                let writer = context.writer_mut();
                writer.reset();
                if let Err(err) = self.body.encode(dialect, writer) {
                    writer.reset();
                    return Err(err);
                }
                writer.finish(B::HANDSHAKE_TYPE)?
            }
        };
        Ok(self.wire.insert(wire).as_slice())
    }

    /// Runs the version-specific processing for a received message.
    ///
    /// Exactly one of the two hooks runs. Versions without a dialect fail
    /// before either is called.
    ///
    /// 对收到的消息执行特定版本的处理。恰好调用两个钩子之一；没有对应方言的版本在调用任何钩子之前即失败。
    pub fn process(&mut self, context: &mut Context) -> Result<()> {
        let dialect = context.protocol().dialect()?;
        tracing::debug!(msg_type = ?B::HANDSHAKE_TYPE, ?dialect, "processing handshake message");
        match dialect {
            Dialect::Ssl3 => self.body.process_as_ssl3(context),
            Dialect::Tls1 => self.body.process_as_tls1(context),
        }
    }

    /// Folds the message into the transcript.
    ///
    /// Acts once: the first call encodes (if needed), feeds the bytes to the
    /// transcript and returns them for sending. Later calls are no-ops that
    /// return `None`, so a consumed message can never be sent or hashed twice.
    ///
    /// 将消息并入握手记录。只生效一次：首次调用会（在需要时）编码、将字节送入握手记录并返回以供发送。
    /// 之后的调用不做任何事并返回 `None`，因此已消费的消息不会被重复发送或哈希。
    pub fn update(&mut self, context: &mut Context) -> Result<Option<Vec<u8>>> {
        if self.is_committed() {
            return Ok(None);
        }
        self.encode(context)?;
        let wire = self.wire.take().ok_or(HandshakeError::InvalidState)?;
        context.transcript_mut().update(&wire);
        context.set_last_message(B::HANDSHAKE_TYPE);
        self.state = MessageState::Committed;
        tracing::debug!(
            msg_type = ?B::HANDSHAKE_TYPE,
            len = wire.len(),
            transcript_len = context.transcript().len(),
            "committed handshake message to transcript"
        );
        Ok(Some(wire))
    }
}
