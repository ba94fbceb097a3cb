use super::{ClientHelloOutcome, HandshakeServer, HandshakeServerBuilder, Ready};
use crate::crypto::PremasterExchange;
use crate::crypto::secret::{hello_random, random_bytes};
use crate::error::Result;
use crate::handshake::{FlightReader, Missing, send};
use crate::protocol::messages::{
    Certificate, ClientHello, Finished, MAX_SESSION_ID_LEN, ServerHello, ServerHelloDone,
};
use crate::session::{SessionState, lock_cache, unix_now};

impl HandshakeServer<Ready, Missing> {
    /// Creates a new `HandshakeServerBuilder` to construct a `HandshakeServer`.
    ///
    /// 创建一个新的 `HandshakeServerBuilder` 用于构造 `HandshakeServer`。
    pub fn builder() -> HandshakeServerBuilder<Missing> {
        HandshakeServerBuilder::new()
    }
}

impl<E: PremasterExchange> HandshakeServer<Ready, E> {
    /// Processes the client's hello flight and produces the server's reply.
    ///
    /// If the client offered a cached session that is still valid for the
    /// negotiated version and one of the offered suites, the server resumes it
    /// and replies `ServerHello, Finished`. Otherwise it picks a suite, issues
    /// a fresh session id (when it has a cache) and replies
    /// `ServerHello, [Certificate], ServerHelloDone`.
    ///
    /// 处理客户端的 hello 消息并生成服务器的回复。
    ///
    /// 如果客户端提供的已缓存会话对协商版本和所提供的某个套件仍然有效，服务器将恢复该会话并回复
    /// `ServerHello, Finished`。否则服务器选择一个套件，（在有缓存时）签发新的会话 ID，并回复
    /// `ServerHello, [Certificate], ServerHelloDone`。
    pub fn process_client_hello(
        mut self,
        flight: &[u8],
    ) -> Result<(Vec<u8>, ClientHelloOutcome<E>)> {
        let mut reader = FlightReader::new(&self.context, flight);
        let hello = reader.expect::<ClientHello>(&mut self.context)?;
        reader.finish()?;
        self.context.set_server_random(hello_random());

        let mut response = Vec::new();

        if let Some(session) = self.find_session(&hello)? {
            self.context.set_session_id(session.session_id.clone());
            self.context.set_cipher_suite(session.cipher_suite);
            self.context.set_master_secret(session.master_secret()?);
            send(
                ServerHello::from_context(&self.context)?,
                &mut self.context,
                &mut response,
            )?;
            send(
                Finished::from_context(&self.context)?,
                &mut self.context,
                &mut response,
            )?;
            self.resumed = true;
            tracing::debug!(protocol = ?self.context.protocol(), "resuming cached session");
            return Ok((response, ClientHelloOutcome::Resumed(self.transition())));
        }

        let suite = self.context.select_cipher_suite()?;
        self.context.set_cipher_suite(suite);
        if self.session_cache.is_some() {
            self.context.set_session_id(random_bytes(MAX_SESSION_ID_LEN));
        }

        send(
            ServerHello::from_context(&self.context)?,
            &mut self.context,
            &mut response,
        )?;
        let certificates = self.context.config().certificates.clone();
        if !certificates.is_empty() {
            send(Certificate { certificates }, &mut self.context, &mut response)?;
        }
        send(ServerHelloDone, &mut self.context, &mut response)?;
        tracing::debug!(
            protocol = ?self.context.protocol(),
            ?suite,
            "sent server hello flight"
        );
        Ok((response, ClientHelloOutcome::Full(self.transition())))
    }

    /// A cached session matching the client's offer, if there is one.
    fn find_session(&self, hello: &ClientHello) -> Result<Option<SessionState>> {
        let Some(cache) = &self.session_cache else {
            return Ok(None);
        };
        if hello.session_id.is_empty() {
            return Ok(None);
        }
        let now = unix_now()?;
        let session = lock_cache(cache)?.lookup(&hello.session_id, now);
        Ok(session.filter(|s| {
            s.protocol == self.context.protocol() && hello.cipher_suites.contains(&s.cipher_suite)
        }))
    }
}
