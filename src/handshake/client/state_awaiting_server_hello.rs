use super::{AwaitingServerHello, HandshakeClient, ServerFlight};
use crate::crypto::PremasterExchange;
use crate::crypto::secret::{MasterSecret, PremasterSecret};
use crate::error::{HandshakeError, Result};
use crate::handshake::{FlightReader, accept, send};
use crate::protocol::messages::{
    Certificate, ClientKeyExchange, Finished, ServerHello, ServerHelloDone,
};
use crate::protocol::types::HandshakeType;

impl<E: PremasterExchange> HandshakeClient<AwaitingServerHello, E> {
    /// Handles the server's hello flight.
    ///
    /// If the server echoed the offered session id, the flight is
    /// `ServerHello, Finished`; the client verifies the server's Finished,
    /// answers with its own and is done. Otherwise the flight is
    /// `ServerHello, [Certificate], ServerHelloDone`; the client answers with
    /// `ClientKeyExchange, Finished` and waits for the server's Finished.
    ///
    /// 处理服务器的 hello 消息。
    ///
    /// 如果服务器回显了所提供的会话 ID，则消息为 `ServerHello, Finished`；客户端验证服务器的 Finished，
    /// 回复自己的 Finished 后完成握手。否则消息为 `ServerHello, [Certificate], ServerHelloDone`；
    /// 客户端回复 `ClientKeyExchange, Finished` 并等待服务器的 Finished。
    pub fn process_server_flight(mut self, flight: &[u8]) -> Result<(Vec<u8>, ServerFlight<E>)> {
        let mut reader = FlightReader::new(&self.context, flight);
        reader.expect::<ServerHello>(&mut self.context)?;

        if let Some(master) = self.accepted_session()? {
            self.context.set_master_secret(master);
            reader.expect::<Finished>(&mut self.context)?;
            reader.finish()?;

            let mut response = Vec::new();
            send(
                Finished::from_context(&self.context)?,
                &mut self.context,
                &mut response,
            )?;
            self.resumed = true;
            tracing::debug!(protocol = ?self.context.protocol(), "session resumed");
            return Ok((response, ServerFlight::Resumed(self.transition())));
        }
        self.resumption = None;

        let mut frame = reader.next_frame()?;
        if frame.msg_type == HandshakeType::Certificate {
            accept::<Certificate>(&frame, &mut self.context)?;
            frame = reader.next_frame()?;
        }
        accept::<ServerHelloDone>(&frame, &mut self.context)?;
        reader.finish()?;

        let client_version = self
            .context
            .client_version()
            .ok_or(HandshakeError::InvalidState)?;
        let premaster = PremasterSecret::generate(client_version);
        let exchange_keys = self
            .exchange
            .seal(premaster.as_bytes(), self.context.peer_certificates())?;

        let mut response = Vec::new();
        send(
            ClientKeyExchange { exchange_keys },
            &mut self.context,
            &mut response,
        )?;
        self.context.derive_master_secret(&premaster)?;
        send(
            Finished::from_context(&self.context)?,
            &mut self.context,
            &mut response,
        )?;
        tracing::debug!(
            protocol = ?self.context.protocol(),
            suite = ?self.context.cipher_suite(),
            "sent ClientKeyExchange and Finished"
        );
        Ok((response, ServerFlight::Full(self.transition())))
    }

    /// The cached master secret, if the server agreed to resume the offered
    /// session. A resumed session must keep its version and suite.
    fn accepted_session(&self) -> Result<Option<MasterSecret>> {
        let Some(session) = self.offered_session() else {
            return Ok(None);
        };
        if self.context.session_id() != session.session_id.as_slice() {
            return Ok(None);
        }
        if session.protocol != self.context.protocol()
            || Some(session.cipher_suite) != self.context.cipher_suite()
        {
            tracing::warn!("server resumed a session with different parameters");
            return Err(HandshakeError::InvalidMessage);
        }
        session.master_secret().map(Some)
    }
}
