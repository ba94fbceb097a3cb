use super::{AwaitingKeyExchange, Established, HandshakeServer};
use crate::crypto::PremasterExchange;
use crate::crypto::secret::PremasterSecret;
use crate::error::{HandshakeError, Result};
use crate::handshake::{FlightReader, send};
use crate::protocol::messages::{ClientKeyExchange, Finished};
use zeroize::Zeroizing;

impl<E: PremasterExchange> HandshakeServer<AwaitingKeyExchange, E> {
    /// Processes the client's `ClientKeyExchange, Finished` flight.
    ///
    /// The premaster is recovered through the key exchange and must carry the
    /// version the client advertised in its hello. The client's Finished is
    /// verified, the session is cached, and the server's Finished is returned.
    ///
    /// 处理客户端的 `ClientKeyExchange, Finished` 消息。
    ///
    /// 预主密钥通过密钥交换恢复，且必须携带客户端在 hello 中声明的版本。验证客户端的 Finished，
    /// 缓存会话，并返回服务器的 Finished。
    pub fn process_client_key_exchange(
        mut self,
        flight: &[u8],
    ) -> Result<(Vec<u8>, HandshakeServer<Established, E>)> {
        let mut reader = FlightReader::new(&self.context, flight);
        let key_exchange = reader.expect::<ClientKeyExchange>(&mut self.context)?;

        let opened = Zeroizing::new(self.exchange.open(&key_exchange.exchange_keys)?);
        let client_version = self
            .context
            .client_version()
            .ok_or(HandshakeError::InvalidState)?;
        let premaster = PremasterSecret::from_received(&opened, client_version).inspect_err(|_| {
            tracing::warn!(client_version, "premaster rejected");
        })?;
        self.context.derive_master_secret(&premaster)?;

        reader.expect::<Finished>(&mut self.context)?;
        reader.finish()?;

        let mut response = Vec::new();
        send(
            Finished::from_context(&self.context)?,
            &mut self.context,
            &mut response,
        )?;
        self.cache_session()?;
        tracing::debug!(protocol = ?self.context.protocol(), "server handshake established");
        Ok((response, self.transition()))
    }
}
