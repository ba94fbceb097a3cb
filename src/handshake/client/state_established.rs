use super::{Established, HandshakeClient};
use crate::crypto::MasterSecret;
use crate::error::Result;
use crate::protocol::types::{CipherSuite, SecurityProtocol};
use crate::session::SessionState;

impl<E> HandshakeClient<Established, E> {
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

    pub fn session_id(&self) -> &[u8] {
        self.context.session_id()
    }

    /// Whether this handshake resumed an earlier session.
    pub fn is_resumed(&self) -> bool {
        self.resumed
    }

    /// Exports the session so a later handshake can resume it.
    ///
    /// The application should store this securely and pass it to
    /// [`super::HandshakeClientBuilder::resume`].
    ///
    /// 导出会话以便之后的握手恢复。应用程序应安全地存储它，并传给 `HandshakeClientBuilder::resume`。
    pub fn session_state(&self) -> Result<SessionState> {
        SessionState::from_context(&self.context)
    }
}
