use super::{AwaitingClientFinished, Established, HandshakeServer};
use crate::crypto::PremasterExchange;
use crate::error::Result;
use crate::handshake::FlightReader;
use crate::protocol::messages::Finished;

impl<E: PremasterExchange> HandshakeServer<AwaitingClientFinished, E> {
    /// Verifies the client's Finished and completes a resumed handshake.
    ///
    /// 验证客户端的 Finished 并完成恢复握手。
    pub fn process_client_finished(mut self, flight: &[u8]) -> Result<HandshakeServer<Established, E>> {
        let mut reader = FlightReader::new(&self.context, flight);
        reader.expect::<Finished>(&mut self.context)?;
        reader.finish()?;
        tracing::debug!(protocol = ?self.context.protocol(), "resumed handshake established");
        Ok(self.transition())
    }
}
