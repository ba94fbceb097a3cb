use super::{HandshakeClient, Ready};
use crate::config::HandshakeConfig;
use crate::context::Context;
use crate::crypto::PremasterExchange;
use crate::error::Result;
use crate::handshake::Missing;
use crate::protocol::types::Role;
use crate::session::SessionState;

/// A builder for creating a `HandshakeClient`.
///
/// `build` is only available once a key exchange has been supplied.
///
/// 用于创建 `HandshakeClient` 的构建器。
///
/// 只有在提供密钥交换之后才能调用 `build`。
#[derive(Debug)]
pub struct HandshakeClientBuilder<Ex> {
    config: HandshakeConfig,
    exchange: Ex,
    resumption: Option<SessionState>,
}

impl HandshakeClientBuilder<Missing> {
    /// Creates a new `HandshakeClientBuilder` with the default configuration.
    pub fn new() -> Self {
        Self {
            config: HandshakeConfig::default(),
            exchange: Missing,
            resumption: None,
        }
    }
}

impl Default for HandshakeClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ex> HandshakeClientBuilder<Ex> {
    /// Sets the handshake configuration.
    ///
    /// 设置握手配置。
    pub fn config(mut self, config: HandshakeConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the primitive that protects the premaster for the server.
    ///
    /// 设置为服务器保护预主密钥的原语。
    pub fn exchange<E: PremasterExchange>(self, exchange: E) -> HandshakeClientBuilder<E> {
        HandshakeClientBuilder {
            config: self.config,
            exchange,
            resumption: self.resumption,
        }
    }

    /// Offers a session from an earlier handshake for resumption.
    ///
    /// The offer is dropped silently when the session has expired or no
    /// longer fits the configuration; a full handshake follows instead.
    ///
    /// 提供先前握手的会话以供恢复。若会话已过期或不再符合配置，则静默放弃，改为完整握手。
    pub fn resume(mut self, session: SessionState) -> Self {
        self.resumption = Some(session);
        self
    }
}

impl<E: PremasterExchange> HandshakeClientBuilder<E> {
    /// Builds the `HandshakeClient`.
    ///
    /// Returns an error if the configuration cannot be honoured.
    ///
    /// 构建 `HandshakeClient`。如果配置无法满足，则返回错误。
    pub fn build(self) -> Result<HandshakeClient<Ready, E>> {
        self.config.validate()?;
        let context = Context::new(Role::Client, self.config);
        Ok(HandshakeClient::new(context, self.exchange, self.resumption))
    }
}
