//! Implements the server side of the handshake state machine.
//! 实现握手协议状态机的服务器端。

use crate::context::Context;
use crate::error::Result;
use crate::protocol::state::{AwaitingClientFinished, AwaitingKeyExchange, Established, Ready};
use crate::session::{SessionState, SharedSessionCache, lock_cache, unix_now};
use std::marker::PhantomData;

mod builder;
mod state_awaiting_client_finished;
mod state_awaiting_key_exchange;
mod state_established;
mod state_ready;

pub use builder::HandshakeServerBuilder;

/// The server-side handshake state machine.
///
/// Generic over the state `State` to enforce the message order at compile
/// time. This ensures that methods can only be called in the correct
/// sequence, for example that a Finished is never checked before the key
/// exchange that produced its master secret.
///
/// 服务器端握手协议状态机。
///
/// 通过泛型状态 `State` 在编译时强制消息顺序。
/// 这确保了方法只能按正确的顺序调用，例如在产生主密钥的密钥交换之前不会校验 Finished。
#[derive(Debug)]
pub struct HandshakeServer<State, E> {
    /// Zero-sized marker to hold the current state.
    ///
    /// 零大小标记，用于持有当前状态。
    state: PhantomData<State>,
    /// Negotiated parameters, transcript and secrets.
    ///
    /// 协商参数、握手记录与密钥。
    context: Context,
    /// Recovers the premaster from ClientKeyExchange.
    ///
    /// 从 ClientKeyExchange 中恢复预主密钥。
    exchange: E,
    /// Sessions this server can resume and stores new ones into.
    /// If not set, every handshake is a full one and no session id is issued.
    ///
    /// 此服务器可恢复并写入新会话的缓存。
    /// 如果未设置，每次握手都是完整握手，且不签发会话 ID。
    session_cache: Option<SharedSessionCache>,
    resumed: bool,
}

/// How the server answered a ClientHello.
///
/// 服务器对 ClientHello 的应答方式。
#[derive(Debug)]
pub enum ClientHelloOutcome<E> {
    /// A full handshake; the server waits for ClientKeyExchange and Finished.
    Full(HandshakeServer<AwaitingKeyExchange, E>),
    /// A cached session is being resumed; the server waits for the client's Finished.
    Resumed(HandshakeServer<AwaitingClientFinished, E>),
}

impl<State, E> HandshakeServer<State, E> {
    /// The handshake context as it stands in this state.
    pub fn context(&self) -> &Context {
        &self.context
    }

    fn transition<Next>(self) -> HandshakeServer<Next, E> {
        HandshakeServer {
            state: PhantomData,
            context: self.context,
            exchange: self.exchange,
            session_cache: self.session_cache,
            resumed: self.resumed,
        }
    }

    /// Stores the negotiated session so a later ClientHello can resume it.
    /// Expired entries are dropped first.
    fn cache_session(&self) -> Result<()> {
        let Some(cache) = &self.session_cache else {
            return Ok(());
        };
        if self.context.session_id().is_empty() {
            return Ok(());
        }
        let state = SessionState::from_context(&self.context)?;
        let now = unix_now()?;
        let mut cache = lock_cache(cache)?;
        let purged = cache.purge_expired(now);
        if purged > 0 {
            tracing::debug!(purged, "dropped expired sessions");
        }
        cache.insert(state);
        Ok(())
    }
}

impl<E> HandshakeServer<Ready, E> {
    pub(crate) fn new(context: Context, exchange: E, session_cache: Option<SharedSessionCache>) -> Self {
        Self {
            state: PhantomData,
            context,
            exchange,
            session_cache,
            resumed: false,
        }
    }
}
