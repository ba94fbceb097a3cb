use super::{Established, HandshakeServer};
use crate::crypto::MasterSecret;
use crate::error::Result;
use crate::protocol::types::{CipherSuite, SecurityProtocol};
use crate::session::SessionState;

impl<E> HandshakeServer<Established, E> {
    pub fn protocol(&self) -> SecurityProtocol {
        self.context.protocol()
    }

    pub fn cipher_suite(&self) -> Option<CipherSuite> {
        self.context.cipher_suite()
    }

    /// Returns the master secret established in this session.
    ///
    /// 返回在此会话中建立的主密钥。
    pub fn master_secret(&self) -> Option<&MasterSecret> {
        self.context.master_secret()
    }

    /// The session id issued or resumed; empty when the server has no cache.
    pub fn session_id(&self) -> &[u8] {
        self.context.session_id()
    }

    pub fn is_resumed(&self) -> bool {
        self.resumed
    }

    pub fn session_state(&self) -> Result<SessionState> {
        SessionState::from_context(&self.context)
    }
}
