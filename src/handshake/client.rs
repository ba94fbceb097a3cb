//! Implements the client side of the handshake state machine.
//! 实现握手协议状态机的客户端。

use crate::context::Context;
use crate::protocol::state::{AwaitingServerFinished, AwaitingServerHello, Established, Ready};
use crate::session::SessionState;
use std::marker::PhantomData;

mod builder;
mod state_awaiting_server_finished;
mod state_awaiting_server_hello;
mod state_established;
mod state_ready;

pub use builder::HandshakeClientBuilder;

/// The client-side handshake state machine.
///
/// Generic over the state `State` to enforce the message order at compile
/// time. A client that has not seen the server's Finished cannot hand out
/// session state, and a finished client cannot be fed another ServerHello.
///
/// 客户端握手协议状态机。
///
/// 通过泛型状态 `State` 在编译时强制消息顺序。
/// 尚未收到服务器 Finished 的客户端无法导出会话状态，已完成的客户端也无法再处理 ServerHello。
#[derive(Debug)]
pub struct HandshakeClient<State, E> {
    /// Zero-sized marker to hold the current state.
    ///
    /// 零大小标记，用于持有当前状态。
    state: PhantomData<State>,
    /// Negotiated parameters, transcript and secrets.
    ///
    /// 协商参数、握手记录与密钥。
    context: Context,
    /// Protects the premaster for the server.
    ///
    /// 为服务器保护预主密钥。
    exchange: E,
    /// A cached session offered for resumption, if any.
    ///
    /// 用于恢复的已缓存会话（如果有）。
    resumption: Option<SessionState>,
    /// Whether the server accepted the offered session.
    resumed: bool,
}

/// What the server's first flight turned out to be.
///
/// 服务器第一批消息的结果。
#[derive(Debug)]
pub enum ServerFlight<E> {
    /// A full handshake; the client still waits for the server's Finished.
    Full(HandshakeClient<AwaitingServerFinished, E>),
    /// The offered session was resumed and the handshake is complete.
    Resumed(HandshakeClient<Established, E>),
}

impl<State, E> HandshakeClient<State, E> {
    /// The handshake context as it stands in this state.
    pub fn context(&self) -> &Context {
        &self.context
    }

    fn transition<Next>(self) -> HandshakeClient<Next, E> {
        HandshakeClient {
            state: PhantomData,
            context: self.context,
            exchange: self.exchange,
            resumption: self.resumption,
            resumed: self.resumed,
        }
    }
}

impl<E> HandshakeClient<Ready, E> {
    pub(crate) fn new(context: Context, exchange: E, resumption: Option<SessionState>) -> Self {
        Self {
            state: PhantomData,
            context,
            exchange,
            resumption,
            resumed: false,
        }
    }
}

impl<E> HandshakeClient<AwaitingServerHello, E> {
    fn offered_session(&self) -> Option<&SessionState> {
        self.resumption.as_ref()
    }
}
