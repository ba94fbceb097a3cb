//! Typestate client and server handshake drivers.
//!
//! Each driver consumes the peer's flight (the handshake frames sent before
//! waiting for a reply) and returns its own reply flight together with the
//! driver in its next state.
//!
//! 类型状态的客户端与服务器握手驱动。
//!
//! 每个驱动读取对端的一批消息（对端在等待回复之前发送的握手帧），并返回自己的回复以及处于下一状态的驱动。

pub mod client;
pub mod server;

pub use client::{HandshakeClient, HandshakeClientBuilder, ServerFlight};
pub use server::{ClientHelloOutcome, HandshakeServer, HandshakeServerBuilder};

use crate::context::Context;
use crate::error::{HandshakeError, Result};
use crate::protocol::codec::HEADER_LEN;
use crate::protocol::joiner::{HandshakeJoiner, OwnedFrame};
use crate::protocol::message::{HandshakeBody, HandshakeMessage};

/// Marker type for a missing field in a builder.
///
/// 用于在构建器中标记缺失字段的类型。
#[derive(Debug)]
pub struct Missing;

/// Walks the frames of one received flight.
pub(crate) struct FlightReader {
    joiner: HandshakeJoiner,
}

impl FlightReader {
    pub(crate) fn new(context: &Context, flight: &[u8]) -> Self {
        let mut joiner = HandshakeJoiner::new(context.config().max_message_len);
        joiner.push(flight);
        Self { joiner }
    }

    /// The next frame, or `Incomplete` if the flight ends before one.
    pub(crate) fn next_frame(&mut self) -> Result<OwnedFrame> {
        match self.joiner.next_frame()? {
            Some(frame) => Ok(frame),
            None if self.joiner.is_empty() => Err(HandshakeError::Incomplete { needed: HEADER_LEN }),
            None => Err(HandshakeError::Incomplete {
                needed: self.joiner.needed(),
            }),
        }
    }

    /// Reads the next frame, which must carry a `B`, and applies it.
    pub(crate) fn expect<B: HandshakeBody>(&mut self, context: &mut Context) -> Result<B> {
        let frame = self.next_frame()?;
        accept(&frame, context)
    }

    /// Fails if anything is left after the last expected message.
    pub(crate) fn finish(self) -> Result<()> {
        let left = self.joiner.pending();
        if left > 0 {
            tracing::warn!(left, "unexpected bytes after flight");
            return Err(HandshakeError::TrailingData(left));
        }
        Ok(())
    }
}

/// Decodes, processes and commits one received message.
pub(crate) fn accept<B: HandshakeBody>(frame: &OwnedFrame, context: &mut Context) -> Result<B> {
    let mut message = HandshakeMessage::<B>::decode(frame.as_frame(), context)?;
    message.process(context)?;
    message.update(context)?;
    Ok(message.into_body())
}

/// Commits an outbound message and appends its wire bytes to `flight`.
pub(crate) fn send<B: HandshakeBody>(
    body: B,
    context: &mut Context,
    flight: &mut Vec<u8>,
) -> Result<()> {
    let wire = HandshakeMessage::new(body)
        .update(context)?
        .ok_or(HandshakeError::InvalidState)?;
    flight.extend_from_slice(&wire);
    Ok(())
}
