//! Per-connection handshake state threaded through every message.
//!
//! A `Context` lives for exactly one handshake attempt and is mutated by each
//! message in strict wire order. It is not shared between threads.
//!
//! 贯穿每条消息的单连接握手状态。
//!
//! 一个 `Context` 仅存活于一次握手尝试，并按严格的线路顺序被每条消息修改。它不在线程间共享。

use crate::config::HandshakeConfig;
use crate::crypto::finished;
use crate::crypto::secret::{MasterSecret, PremasterSecret, RANDOM_LEN};
use crate::error::{HandshakeError, Result};
use crate::protocol::codec::HandshakeWriter;
use crate::protocol::transcript::TranscriptHasher;
use crate::protocol::types::{CipherSuite, HandshakeType, Role, SecurityProtocol};

#[derive(Debug)]
pub struct Context {
    role: Role,
    config: HandshakeConfig,
    /// Negotiated version; the configured maximum until a hello settles it.
    protocol: SecurityProtocol,
    /// The raw version from ClientHello, which the premaster must repeat.
    client_version: Option<u16>,
    transcript: TranscriptHasher,
    writer: HandshakeWriter,
    client_random: [u8; RANDOM_LEN],
    server_random: [u8; RANDOM_LEN],
    session_id: Vec<u8>,
    offered_cipher_suites: Vec<CipherSuite>,
    cipher_suite: Option<CipherSuite>,
    peer_certificates: Vec<Vec<u8>>,
    master_secret: Option<MasterSecret>,
    last_message: Option<HandshakeType>,
}

impl Context {
    pub fn new(role: Role, config: HandshakeConfig) -> Self {
        let protocol = config.max_protocol;
        Self {
            role,
            config,
            protocol,
            client_version: None,
            transcript: TranscriptHasher::new(),
            writer: HandshakeWriter::new(),
            client_random: [0u8; RANDOM_LEN],
            server_random: [0u8; RANDOM_LEN],
            session_id: Vec::new(),
            offered_cipher_suites: Vec::new(),
            cipher_suite: None,
            peer_certificates: Vec::new(),
            master_secret: None,
            last_message: None,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn config(&self) -> &HandshakeConfig {
        &self.config
    }

    pub fn protocol(&self) -> SecurityProtocol {
        self.protocol
    }

    pub(crate) fn set_protocol(&mut self, protocol: SecurityProtocol) {
        self.protocol = protocol;
    }

    /// Server side: settles the version from the one the client advertised.
    ///
    /// A client offering more than we support is talked down to our maximum;
    /// one offering less than our minimum is refused.
    ///
    /// 服务器端：根据客户端声明的版本确定协议版本。
    pub fn negotiate(&mut self, client_version: u16) -> Result<SecurityProtocol> {
        let max = self.config.max_protocol;
        let chosen = if client_version >= max.wire_version() {
            max
        } else {
            SecurityProtocol::from_wire(client_version)?
        };
        if chosen < self.config.min_protocol {
            return Err(HandshakeError::UnsupportedProtocol(client_version));
        }
        chosen.dialect()?;
        tracing::debug!(client_version, ?chosen, "negotiated protocol");
        self.client_version = Some(client_version);
        self.protocol = chosen;
        Ok(chosen)
    }

    pub fn client_version(&self) -> Option<u16> {
        self.client_version
    }

    pub(crate) fn set_client_version(&mut self, version: u16) {
        self.client_version = Some(version);
    }

    pub fn transcript(&self) -> &TranscriptHasher {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut TranscriptHasher {
        &mut self.transcript
    }

    pub(crate) fn writer_mut(&mut self) -> &mut HandshakeWriter {
        &mut self.writer
    }

    pub fn client_random(&self) -> &[u8; RANDOM_LEN] {
        &self.client_random
    }

    pub(crate) fn set_client_random(&mut self, random: [u8; RANDOM_LEN]) {
        self.client_random = random;
    }

    pub fn server_random(&self) -> &[u8; RANDOM_LEN] {
        &self.server_random
    }

    pub(crate) fn set_server_random(&mut self, random: [u8; RANDOM_LEN]) {
        self.server_random = random;
    }

    pub fn session_id(&self) -> &[u8] {
        &self.session_id
    }

    pub(crate) fn set_session_id(&mut self, id: Vec<u8>) {
        self.session_id = id;
    }

    pub fn offered_cipher_suites(&self) -> &[CipherSuite] {
        &self.offered_cipher_suites
    }

    pub(crate) fn set_offered_cipher_suites(&mut self, suites: Vec<CipherSuite>) {
        self.offered_cipher_suites = suites;
    }

    pub fn cipher_suite(&self) -> Option<CipherSuite> {
        self.cipher_suite
    }

    pub(crate) fn set_cipher_suite(&mut self, suite: CipherSuite) {
        self.cipher_suite = Some(suite);
    }

    /// Server side: the first configured suite the client also offered.
    pub fn select_cipher_suite(&self) -> Result<CipherSuite> {
        self.config
            .cipher_suites
            .iter()
            .copied()
            .find(|s| self.offered_cipher_suites.contains(s))
            .ok_or(HandshakeError::NoCommonCipherSuite)
    }

    pub fn peer_certificates(&self) -> &[Vec<u8>] {
        &self.peer_certificates
    }

    pub(crate) fn set_peer_certificates(&mut self, certificates: Vec<Vec<u8>>) {
        self.peer_certificates = certificates;
    }

    pub fn master_secret(&self) -> Option<&MasterSecret> {
        self.master_secret.as_ref()
    }

    pub(crate) fn set_master_secret(&mut self, master: MasterSecret) {
        self.master_secret = Some(master);
    }

    pub fn last_message(&self) -> Option<HandshakeType> {
        self.last_message
    }

    pub(crate) fn set_last_message(&mut self, msg_type: HandshakeType) {
        self.last_message = Some(msg_type);
    }

    /// Derives and stores the master secret for the negotiated dialect.
    pub fn derive_master_secret(&mut self, premaster: &PremasterSecret) -> Result<()> {
        let dialect = self.protocol.dialect()?;
        let master = finished::master_secret(
            dialect,
            premaster,
            &self.client_random,
            &self.server_random,
        )?;
        self.master_secret = Some(master);
        Ok(())
    }

    /// The verify_data `sender` must put in its Finished message, over the
    /// transcript accumulated so far.
    pub fn verify_data(&self, sender: Role) -> Result<Vec<u8>> {
        let dialect = self.protocol.dialect()?;
        let master = self
            .master_secret
            .as_ref()
            .ok_or(HandshakeError::InvalidState)?;
        finished::verify_data(dialect, &self.transcript, master, sender)
    }
}
