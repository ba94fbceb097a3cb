//! Concrete handshake bodies for the SSLv3 / TLS 1.0 full and abbreviated
//! handshakes.
//!
//! Outbound bodies are built from the context by their constructors; inbound
//! bodies apply themselves to the context through the dialect hooks.
//!
//! SSLv3 / TLS 1.0 完整握手与简化握手的具体消息体。
//! 出站消息体由构造函数根据上下文构建；入站消息体通过方言钩子将自身应用到上下文。

use crate::context::Context;
use crate::crypto::finished::{self, verify_data_len};
use crate::crypto::secret::{RANDOM_LEN, constant_time_eq};
use crate::error::{HandshakeError, Result};
use crate::protocol::codec::{HandshakeWriter, Reader};
use crate::protocol::message::HandshakeBody;
use crate::protocol::types::{CipherSuite, Dialect, HandshakeType, SecurityProtocol};

pub const MAX_SESSION_ID_LEN: usize = 32;
pub const COMPRESSION_NULL: u8 = 0;

fn read_session_id(reader: &mut Reader<'_>) -> Result<Vec<u8>> {
    let id = reader.vec_u8()?;
    if id.len() > MAX_SESSION_ID_LEN {
        return Err(HandshakeError::Decode("session id longer than 32 bytes"));
    }
    Ok(id.to_vec())
}

fn write_session_id(writer: &mut HandshakeWriter, id: &[u8]) -> Result<()> {
    if id.len() > MAX_SESSION_ID_LEN {
        return Err(HandshakeError::Encode("session id longer than 32 bytes"));
    }
    writer.put_vec_u8(id)
}

// ---------------------------------------------------------------------------
// ClientHello
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHello {
    pub client_version: u16,
    pub random: [u8; RANDOM_LEN],
    pub session_id: Vec<u8>,
    pub cipher_suites: Vec<CipherSuite>,
    pub compression_methods: Vec<u8>,
}

impl ClientHello {
    /// The hello a client sends: our highest version, our random, the session
    /// id being offered for resumption (possibly empty) and our suites.
    pub fn from_context(context: &Context) -> Self {
        Self {
            client_version: context.config().max_protocol.wire_version(),
            random: *context.client_random(),
            session_id: context.session_id().to_vec(),
            cipher_suites: context.offered_cipher_suites().to_vec(),
            compression_methods: vec![COMPRESSION_NULL],
        }
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        context.negotiate(self.client_version)?;
        context.set_client_random(self.random);
        context.set_offered_cipher_suites(self.cipher_suites.clone());
        Ok(())
    }
}

impl HandshakeBody for ClientHello {
    const HANDSHAKE_TYPE: HandshakeType = HandshakeType::ClientHello;

    fn encode(&self, _dialect: Dialect, writer: &mut HandshakeWriter) -> Result<()> {
        writer.put_u16(self.client_version);
        writer.put_bytes(&self.random);
        write_session_id(writer, &self.session_id)?;
        let suites: Vec<u8> = self
            .cipher_suites
            .iter()
            .flat_map(|suite| suite.0.to_be_bytes())
            .collect();
        writer.put_vec_u16(&suites)?;
        writer.put_vec_u8(&self.compression_methods)
    }

    fn decode(_dialect: Dialect, reader: &mut Reader<'_>) -> Result<Self> {
        let client_version = reader.u16()?;
        let random = reader.array::<RANDOM_LEN>()?;
        let session_id = read_session_id(reader)?;

        let suites = reader.vec_u16()?;
        if suites.is_empty() || suites.len() % 2 != 0 {
            return Err(HandshakeError::Decode("bad cipher suite list"));
        }
        let cipher_suites = suites
            .chunks_exact(2)
            .map(|c| CipherSuite(u16::from_be_bytes([c[0], c[1]])))
            .collect();

        let compression_methods = reader.vec_u8()?.to_vec();
        if compression_methods.is_empty() {
            return Err(HandshakeError::Decode("empty compression list"));
        }
        if !compression_methods.contains(&COMPRESSION_NULL) {
            return Err(HandshakeError::CompressionUnsupported);
        }

        // Later versions may append data after the compression list; it is
        // ignored here.
        reader.rest();

        Ok(Self {
            client_version,
            random,
            session_id,
            cipher_suites,
            compression_methods,
        })
    }

    fn process_as_ssl3(&mut self, context: &mut Context) -> Result<()> {
        self.apply(context)
    }

    fn process_as_tls1(&mut self, context: &mut Context) -> Result<()> {
        self.apply(context)
    }
}

// ---------------------------------------------------------------------------
// ServerHello
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerHello {
    pub server_version: u16,
    pub random: [u8; RANDOM_LEN],
    pub session_id: Vec<u8>,
    pub cipher_suite: CipherSuite,
    pub compression_method: u8,
}

impl ServerHello {
    /// The hello a server sends once version, suite and session are settled.
    pub fn from_context(context: &Context) -> Result<Self> {
        Ok(Self {
            server_version: context.protocol().wire_version(),
            random: *context.server_random(),
            session_id: context.session_id().to_vec(),
            cipher_suite: context.cipher_suite().ok_or(HandshakeError::InvalidState)?,
            compression_method: COMPRESSION_NULL,
        })
    }

    fn apply(&self, context: &mut Context) -> Result<()> {
        let version = SecurityProtocol::from_wire(self.server_version)?;
        // Until this hello arrives the context carries the version we offered.
        if version > context.protocol() || version < context.config().min_protocol {
            return Err(HandshakeError::UnsupportedProtocol(self.server_version));
        }
        version.dialect()?;

        if !context.offered_cipher_suites().contains(&self.cipher_suite) {
            tracing::warn!(suite = ?self.cipher_suite, "server selected a suite we did not offer");
            return Err(HandshakeError::NoCommonCipherSuite);
        }
        if self.compression_method != COMPRESSION_NULL {
            return Err(HandshakeError::CompressionUnsupported);
        }

        tracing::debug!(?version, suite = ?self.cipher_suite, "server hello accepted");
        context.set_protocol(version);
        context.set_server_random(self.random);
        context.set_session_id(self.session_id.clone());
        context.set_cipher_suite(self.cipher_suite);
        Ok(())
    }
}

impl HandshakeBody for ServerHello {
    const HANDSHAKE_TYPE: HandshakeType = HandshakeType::ServerHello;

    fn encode(&self, _dialect: Dialect, writer: &mut HandshakeWriter) -> Result<()> {
        writer.put_u16(self.server_version);
        writer.put_bytes(&self.random);
        write_session_id(writer, &self.session_id)?;
        writer.put_u16(self.cipher_suite.0);
        writer.put_u8(self.compression_method);
        Ok(())
    }

    fn decode(_dialect: Dialect, reader: &mut Reader<'_>) -> Result<Self> {
        let server_version = reader.u16()?;
        let random = reader.array::<RANDOM_LEN>()?;
        let session_id = read_session_id(reader)?;
        let cipher_suite = CipherSuite(reader.u16()?);
        let compression_method = reader.u8()?;
        reader.rest();
        Ok(Self {
            server_version,
            random,
            session_id,
            cipher_suite,
            compression_method,
        })
    }

    fn process_as_ssl3(&mut self, context: &mut Context) -> Result<()> {
        self.apply(context)
    }

    fn process_as_tls1(&mut self, context: &mut Context) -> Result<()> {
        self.apply(context)
    }
}

// ---------------------------------------------------------------------------
// Certificate
// ---------------------------------------------------------------------------

/// The server's certificate chain. Entries are opaque here; validating them is
/// up to the [`crate::crypto::PremasterExchange`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub certificates: Vec<Vec<u8>>,
}

impl HandshakeBody for Certificate {
    const HANDSHAKE_TYPE: HandshakeType = HandshakeType::Certificate;

    fn encode(&self, _dialect: Dialect, writer: &mut HandshakeWriter) -> Result<()> {
        let mut list = HandshakeWriter::new();
        for cert in &self.certificates {
            list.put_vec_u24(cert)?;
        }
        let list = list.finish_unframed();
        writer.put_vec_u24(&list)
    }

    fn decode(_dialect: Dialect, reader: &mut Reader<'_>) -> Result<Self> {
        let mut list = Reader::new(reader.vec_u24()?);
        let mut certificates = Vec::new();
        while !list.is_empty() {
            let cert = list.vec_u24()?;
            if cert.is_empty() {
                return Err(HandshakeError::Decode("empty certificate entry"));
            }
            certificates.push(cert.to_vec());
        }
        Ok(Self { certificates })
    }

    fn process_as_ssl3(&mut self, context: &mut Context) -> Result<()> {
        context.set_peer_certificates(self.certificates.clone());
        Ok(())
    }

    fn process_as_tls1(&mut self, context: &mut Context) -> Result<()> {
        context.set_peer_certificates(self.certificates.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ServerHelloDone
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerHelloDone;

impl HandshakeBody for ServerHelloDone {
    const HANDSHAKE_TYPE: HandshakeType = HandshakeType::ServerHelloDone;

    fn encode(&self, _dialect: Dialect, _writer: &mut HandshakeWriter) -> Result<()> {
        Ok(())
    }

    fn decode(_dialect: Dialect, _reader: &mut Reader<'_>) -> Result<Self> {
        Ok(ServerHelloDone)
    }

    fn process_as_ssl3(&mut self, _context: &mut Context) -> Result<()> {
        Ok(())
    }

    fn process_as_tls1(&mut self, _context: &mut Context) -> Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ClientKeyExchange
// ---------------------------------------------------------------------------

/// Carries the protected premaster.
///
/// SSLv3 sends the bytes bare; TLS 1.0 prefixes them with a u16 length.
///
/// 携带受保护的预主密钥。SSLv3 直接发送字节；TLS 1.0 在其前加上 u16 长度。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKeyExchange {
    pub exchange_keys: Vec<u8>,
}

impl ClientKeyExchange {
    fn check(&self) -> Result<()> {
        if self.exchange_keys.is_empty() {
            return Err(HandshakeError::Decode("empty key exchange"));
        }
        Ok(())
    }
}

impl HandshakeBody for ClientKeyExchange {
    const HANDSHAKE_TYPE: HandshakeType = HandshakeType::ClientKeyExchange;

    fn encode(&self, dialect: Dialect, writer: &mut HandshakeWriter) -> Result<()> {
        match dialect {
            Dialect::Ssl3 => {
                writer.put_bytes(&self.exchange_keys);
                Ok(())
            }
            Dialect::Tls1 => writer.put_vec_u16(&self.exchange_keys),
        }
    }

    fn decode(dialect: Dialect, reader: &mut Reader<'_>) -> Result<Self> {
        let exchange_keys = match dialect {
            Dialect::Ssl3 => reader.rest(),
            Dialect::Tls1 => reader.vec_u16()?,
        };
        Ok(Self {
            exchange_keys: exchange_keys.to_vec(),
        })
    }

    fn process_as_ssl3(&mut self, _context: &mut Context) -> Result<()> {
        self.check()
    }

    fn process_as_tls1(&mut self, _context: &mut Context) -> Result<()> {
        self.check()
    }
}

// ---------------------------------------------------------------------------
// Finished
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finished {
    pub verify_data: Vec<u8>,
}

impl Finished {
    /// Our own Finished, over the transcript as it stands.
    pub fn from_context(context: &Context) -> Result<Self> {
        Ok(Self {
            verify_data: context.verify_data(context.role())?,
        })
    }

    /// Checks the peer's verify_data against the transcript before this message.
    fn verify(&self, dialect: Dialect, context: &Context) -> Result<()> {
        let master = context
            .master_secret()
            .ok_or(HandshakeError::InvalidState)?;
        let expected = finished::verify_data(
            dialect,
            context.transcript(),
            master,
            context.role().peer(),
        )?;
        if !constant_time_eq(&expected, &self.verify_data) {
            tracing::warn!(?dialect, "peer finished did not match transcript");
            return Err(HandshakeError::FinishedMismatch);
        }
        Ok(())
    }
}

impl HandshakeBody for Finished {
    const HANDSHAKE_TYPE: HandshakeType = HandshakeType::Finished;

    fn encode(&self, _dialect: Dialect, writer: &mut HandshakeWriter) -> Result<()> {
        writer.put_bytes(&self.verify_data);
        Ok(())
    }

    fn decode(dialect: Dialect, reader: &mut Reader<'_>) -> Result<Self> {
        let verify_data = reader.take(verify_data_len(dialect))?.to_vec();
        Ok(Self { verify_data })
    }

    fn process_as_ssl3(&mut self, context: &mut Context) -> Result<()> {
        self.verify(Dialect::Ssl3, context)
    }

    fn process_as_tls1(&mut self, context: &mut Context) -> Result<()> {
        self.verify(Dialect::Tls1, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HandshakeConfig;
    use crate::crypto::secret::PremasterSecret;
    use crate::protocol::codec::decode_frame;
    use crate::protocol::message::HandshakeMessage;
    use crate::protocol::types::Role;

    fn client_context() -> Context {
        let mut ctx = Context::new(Role::Client, HandshakeConfig::default());
        ctx.set_client_random([0x11; RANDOM_LEN]);
        ctx.set_offered_cipher_suites(ctx.config().cipher_suites.clone());
        ctx
    }

    fn server_context() -> Context {
        Context::new(Role::Server, HandshakeConfig::default())
    }

    /// Encodes `body` in `from`, then decodes and processes it in `to`.
    fn deliver<B: HandshakeBody>(body: B, from: &mut Context, to: &mut Context) -> Result<B> {
        let wire = HandshakeMessage::new(body)
            .update(from)?
            .ok_or(HandshakeError::InvalidState)?;
        let (frame, _) = decode_frame(&wire)?;
        let mut msg = HandshakeMessage::<B>::decode(frame, to)?;
        msg.process(to)?;
        msg.update(to)?;
        Ok(msg.into_body())
    }

    #[test]
    fn test_client_hello_wire_layout() {
        let mut ctx = client_context();
        let hello = ClientHello::from_context(&ctx);
        let wire = HandshakeMessage::new(hello).update(&mut ctx).unwrap().unwrap();
        // type, uint24 length = 2 + 32 + 1 + (2 + 8) + (1 + 1) = 47
        assert_eq!(&wire[..4], &[1, 0, 0, 47]);
        assert_eq!(&wire[4..6], &[0x03, 0x01]);
        assert_eq!(&wire[6..38], &[0x11; 32]);
        assert_eq!(wire[38], 0);
        assert_eq!(&wire[39..41], &[0, 8]);
        assert_eq!(&wire[41..43], &[0x00, 0x2F]);
        assert_eq!(&wire[49..], &[1, 0]);
    }

    #[test]
    fn test_oversized_session_id_fails_to_encode() {
        let mut ctx = client_context();
        let mut hello = ClientHello::from_context(&ctx);
        hello.session_id = vec![0xAB; 300];
        assert!(matches!(
            HandshakeMessage::new(hello.clone()).update(&mut ctx),
            Err(HandshakeError::Encode(_))
        ));
        assert!(ctx.transcript().is_empty());

        // 33 bytes fits the u8 prefix but is still not a valid session id.
        hello.session_id = vec![0xAB; MAX_SESSION_ID_LEN + 1];
        assert!(matches!(
            HandshakeMessage::new(hello).update(&mut ctx),
            Err(HandshakeError::Encode(_))
        ));

        // The writer holds nothing from the failed attempts.
        let wire = HandshakeMessage::new(ClientHello::from_context(&ctx))
            .update(&mut ctx)
            .unwrap()
            .unwrap();
        assert_eq!(&wire[..4], &[1, 0, 0, 47]);
    }

    #[test]
    fn test_suite_list_too_long_fails_to_encode() {
        let mut ctx = client_context();
        let mut hello = ClientHello::from_context(&ctx);
        hello.cipher_suites = vec![CipherSuite::RSA_WITH_RC4_128_SHA; 0x8000];
        assert!(matches!(
            HandshakeMessage::new(hello).update(&mut ctx),
            Err(HandshakeError::MessageTooLarge { len: 0x10000, limit: 0xFFFF })
        ));
        assert!(ctx.transcript().is_empty());
    }

    #[test]
    fn test_client_hello_negotiates_on_server() {
        let mut client = client_context();
        let mut server = server_context();
        let hello = deliver(ClientHello::from_context(&client), &mut client, &mut server).unwrap();

        assert_eq!(server.protocol(), SecurityProtocol::Tls1);
        assert_eq!(server.client_random(), &hello.random);
        assert_eq!(server.offered_cipher_suites(), client.offered_cipher_suites());
        assert_eq!(
            server.transcript().messages(),
            client.transcript().messages()
        );
    }

    #[test]
    fn test_client_hello_requires_null_compression() {
        let mut client = client_context();
        let mut hello = ClientHello::from_context(&client);
        hello.compression_methods = vec![1];
        let mut server = server_context();
        assert!(matches!(
            deliver(hello, &mut client, &mut server),
            Err(HandshakeError::CompressionUnsupported)
        ));
    }

    #[test]
    fn test_server_hello_rejects_higher_version() {
        let mut client = client_context();
        client.set_protocol(SecurityProtocol::Ssl3);
        let mut server = server_context();
        server.set_cipher_suite(CipherSuite::RSA_WITH_AES_128_CBC_SHA);
        let hello = ServerHello::from_context(&server).unwrap();
        assert_eq!(hello.server_version, 0x0301);
        assert!(matches!(
            deliver(hello, &mut server, &mut client),
            Err(HandshakeError::UnsupportedProtocol(0x0301))
        ));
    }

    #[test]
    fn test_server_hello_rejects_unoffered_suite() {
        let mut client = client_context();
        let mut server = server_context();
        server.set_cipher_suite(CipherSuite(0x1301));
        let hello = ServerHello::from_context(&server).unwrap();
        assert!(matches!(
            deliver(hello, &mut server, &mut client),
            Err(HandshakeError::NoCommonCipherSuite)
        ));
    }

    #[test]
    fn test_server_hello_settles_client_state() {
        let mut client = client_context();
        let mut server = server_context();
        server.set_protocol(SecurityProtocol::Ssl3);
        server.set_server_random([0x22; RANDOM_LEN]);
        server.set_session_id(vec![9; 32]);
        server.set_cipher_suite(CipherSuite::RSA_WITH_RC4_128_SHA);

        deliver(ServerHello::from_context(&server).unwrap(), &mut server, &mut client).unwrap();
        assert_eq!(client.protocol(), SecurityProtocol::Ssl3);
        assert_eq!(client.server_random(), &[0x22; RANDOM_LEN]);
        assert_eq!(client.session_id(), &[9; 32]);
        assert_eq!(client.cipher_suite(), Some(CipherSuite::RSA_WITH_RC4_128_SHA));
    }

    #[test]
    fn test_certificate_chain_carried() {
        let mut server = server_context();
        let mut client = client_context();
        let chain = vec![vec![0x30, 0x82, 0x01], vec![0x30, 0x03]];
        let body = deliver(
            Certificate {
                certificates: chain.clone(),
            },
            &mut server,
            &mut client,
        )
        .unwrap();
        assert_eq!(body.certificates, chain);
        assert_eq!(client.peer_certificates(), chain.as_slice());
        // 3 (list) + 3 + 3 + 3 + 2
        assert_eq!(server.transcript().len(), 4 + 14);
    }

    #[test]
    fn test_server_hello_done_must_be_empty() {
        let ctx = client_context();
        let wire = [14u8, 0, 0, 1, 0];
        let (frame, _) = decode_frame(&wire).unwrap();
        assert!(matches!(
            HandshakeMessage::<ServerHelloDone>::decode(frame, &ctx),
            Err(HandshakeError::Decode(_))
        ));
    }

    #[test]
    fn test_key_exchange_framing_differs_by_dialect() {
        let keys = vec![0xEE; 5];
        for (protocol, expected_len) in [(SecurityProtocol::Ssl3, 5), (SecurityProtocol::Tls1, 7)] {
            let mut client = client_context();
            client.set_protocol(protocol);
            let mut server = server_context();
            server.set_protocol(protocol);

            let wire = HandshakeMessage::new(ClientKeyExchange {
                exchange_keys: keys.clone(),
            })
            .update(&mut client)
            .unwrap()
            .unwrap();
            assert_eq!(wire.len(), 4 + expected_len);

            let (frame, _) = decode_frame(&wire).unwrap();
            let msg = HandshakeMessage::<ClientKeyExchange>::decode(frame, &server).unwrap();
            assert_eq!(msg.body().exchange_keys, keys);
        }
    }

    #[test]
    fn test_finished_verifies_and_detects_tampering() {
        for protocol in [SecurityProtocol::Ssl3, SecurityProtocol::Tls1] {
            let premaster = PremasterSecret::generate(protocol.wire_version());
            // Both ends must agree on the hello randoms to derive the same master.
            let paired = |mut ctx: Context| {
                ctx.set_client_random([0x11; RANDOM_LEN]);
                ctx.set_server_random([0x22; RANDOM_LEN]);
                ctx.set_protocol(protocol);
                ctx.transcript_mut().update(b"shared handshake prefix");
                ctx.derive_master_secret(&premaster).unwrap();
                ctx
            };
            let mut client = paired(client_context());
            let mut server = paired(server_context());

            let finished = Finished::from_context(&client).unwrap();
            let mut tampered = finished.clone();
            tampered.verify_data[0] ^= 0x01;

            let mut spare_client = paired(client_context());
            let mut spare_server = paired(server_context());

            deliver(finished, &mut client, &mut server).unwrap();
            assert!(matches!(
                deliver(tampered, &mut spare_client, &mut spare_server),
                Err(HandshakeError::FinishedMismatch)
            ));
        }
    }

    #[test]
    fn test_finished_length_depends_on_dialect() {
        let mut ctx = client_context();
        ctx.set_protocol(SecurityProtocol::Ssl3);
        let wire = [20u8, 0, 0, 12, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let (frame, _) = decode_frame(&wire).unwrap();
        assert!(HandshakeMessage::<Finished>::decode(frame, &ctx).is_err());

        ctx.set_protocol(SecurityProtocol::Tls1);
        let msg = HandshakeMessage::<Finished>::decode(frame, &ctx).unwrap();
        assert_eq!(msg.body().verify_data.len(), 12);
    }
}
