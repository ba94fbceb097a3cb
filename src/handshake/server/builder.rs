use super::{HandshakeServer, Ready};
use crate::config::HandshakeConfig;
use crate::context::Context;
use crate::crypto::PremasterExchange;
use crate::error::Result;
use crate::handshake::Missing;
use crate::protocol::types::Role;
use crate::session::SharedSessionCache;

/// A builder for creating a `HandshakeServer`.
///
/// This builder ensures that a key exchange is provided before constructing the server.
///
/// 用于创建 `HandshakeServer` 的构建器。
///
/// 此构建器确保在构造服务器之前提供了密钥交换。
#[derive(Debug)]
pub struct HandshakeServerBuilder<Ex> {
    config: HandshakeConfig,
    exchange: Ex,
    session_cache: Option<SharedSessionCache>,
}

impl HandshakeServerBuilder<Missing> {
    /// Creates a new `HandshakeServerBuilder` with the default configuration.
    pub fn new() -> Self {
        Self {
            config: HandshakeConfig::default(),
            exchange: Missing,
            session_cache: None,
        }
    }
}

impl Default for HandshakeServerBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ex> HandshakeServerBuilder<Ex> {
    /// Sets the handshake configuration, including the certificate chain.
    ///
    /// 设置握手配置（包括证书链）。
    pub fn config(mut self, config: HandshakeConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the primitive that recovers the premaster from ClientKeyExchange.
    ///
    /// 设置从 ClientKeyExchange 中恢复预主密钥的原语。
    pub fn exchange<E: PremasterExchange>(self, exchange: E) -> HandshakeServerBuilder<E> {
        HandshakeServerBuilder {
            config: self.config,
            exchange,
            session_cache: self.session_cache,
        }
    }

    /// Sets the cache used to resume sessions.
    /// If not provided, the server will neither issue session ids nor resume.
    ///
    /// 设置用于会话恢复的缓存。如果不提供，服务器既不签发会话 ID 也不恢复会话。
    pub fn session_cache(mut self, cache: SharedSessionCache) -> Self {
        self.session_cache = Some(cache);
        self
    }
}

impl<E: PremasterExchange> HandshakeServerBuilder<E> {
    /// Builds the `HandshakeServer`.
    ///
    /// This method is only available once a key exchange has been provided.
    ///
    /// 构建 `HandshakeServer`。此方法仅在提供了密钥交换之后可用。
    pub fn build(self) -> Result<HandshakeServer<Ready, E>> {
        self.config.validate()?;
        let context = Context::new(Role::Server, self.config);
        Ok(HandshakeServer::new(context, self.exchange, self.session_cache))
    }
}
