use super::{AwaitingServerHello, HandshakeClient, HandshakeClientBuilder, Ready};
use crate::crypto::PremasterExchange;
use crate::crypto::secret::hello_random;
use crate::error::Result;
use crate::handshake::{Missing, send};
use crate::protocol::messages::{ClientHello, MAX_SESSION_ID_LEN};
use crate::session::{SessionState, unix_now};

impl HandshakeClient<Ready, Missing> {
    /// Creates a new `HandshakeClientBuilder` to construct a `HandshakeClient`.
    ///
    /// 创建一个新的 `HandshakeClientBuilder` 用于构造 `HandshakeClient`。
    pub fn builder() -> HandshakeClientBuilder<Missing> {
        HandshakeClientBuilder::new()
    }
}

impl<E: PremasterExchange> HandshakeClient<Ready, E> {
    /// Starts the handshake by creating the `ClientHello` flight.
    ///
    /// The hello offers the configured maximum version and suites. If a usable
    /// session was supplied to the builder, its id is offered for resumption.
    /// The client then waits for the server's hello flight.
    ///
    /// 通过创建 `ClientHello` 启动握手。
    ///
    /// ClientHello 提供配置的最高版本与密码套件。如果构建器提供了可用的会话，则提供其会话 ID 以请求恢复。
    /// 然后客户端等待服务器的 hello 消息。
    pub fn start_handshake(mut self) -> Result<(Vec<u8>, HandshakeClient<AwaitingServerHello, E>)> {
        self.context.set_client_random(hello_random());
        let suites = self.context.config().cipher_suites.clone();
        self.context.set_offered_cipher_suites(suites);
        let version = self.context.config().max_protocol.wire_version();
        self.context.set_client_version(version);

        self.resumption = match self.resumption.take() {
            Some(session) if self.can_offer(&session)? => {
                self.context.set_session_id(session.session_id.clone());
                Some(session)
            }
            Some(_) => {
                tracing::debug!("cached session is not resumable, starting a full handshake");
                None
            }
            None => None,
        };

        let mut flight = Vec::new();
        send(
            ClientHello::from_context(&self.context),
            &mut self.context,
            &mut flight,
        )?;
        tracing::debug!(
            version,
            resuming = self.resumption.is_some(),
            "sent ClientHello"
        );
        Ok((flight, self.transition()))
    }

    fn can_offer(&self, session: &SessionState) -> Result<bool> {
        let config = self.context.config();
        Ok(!session.session_id.is_empty()
            && session.session_id.len() <= MAX_SESSION_ID_LEN
            && !session.is_expired(unix_now()?)
            && session.protocol >= config.min_protocol
            && session.protocol <= config.max_protocol
            && config.cipher_suites.contains(&session.cipher_suite))
    }
}
