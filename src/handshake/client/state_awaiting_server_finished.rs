use super::{AwaitingServerFinished, Established, HandshakeClient};
use crate::crypto::PremasterExchange;
use crate::error::Result;
use crate::handshake::FlightReader;
use crate::protocol::messages::Finished;

impl<E: PremasterExchange> HandshakeClient<AwaitingServerFinished, E> {
    /// Verifies the server's Finished and completes a full handshake.
    ///
    /// 验证服务器的 Finished 并完成完整握手。
    pub fn process_server_finished(mut self, flight: &[u8]) -> Result<HandshakeClient<Established, E>> {
        let mut reader = FlightReader::new(&self.context, flight);
        reader.expect::<Finished>(&mut self.context)?;
        reader.finish()?;
        tracing::debug!(protocol = ?self.context.protocol(), "client handshake established");
        Ok(self.transition())
    }
}
