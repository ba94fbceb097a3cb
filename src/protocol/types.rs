//! Wire-level enumerations shared by the framer, the messages and the context.
//!
//! 帧编码器、消息和上下文共用的线路层枚举。

use crate::error::{HandshakeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The one-byte tag at the start of every handshake frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HandshakeType {
    HelloRequest = 0,
    ClientHello = 1,
    ServerHello = 2,
    Certificate = 11,
    ServerKeyExchange = 12,
    CertificateRequest = 13,
    ServerHelloDone = 14,
    CertificateVerify = 15,
    ClientKeyExchange = 16,
    Finished = 20,
}

impl TryFrom<u8> for HandshakeType {
    type Error = HandshakeError;

    fn try_from(value: u8) -> Result<Self> {
        Ok(match value {
            0 => HandshakeType::HelloRequest,
            1 => HandshakeType::ClientHello,
            2 => HandshakeType::ServerHello,
            11 => HandshakeType::Certificate,
            12 => HandshakeType::ServerKeyExchange,
            13 => HandshakeType::CertificateRequest,
            14 => HandshakeType::ServerHelloDone,
            15 => HandshakeType::CertificateVerify,
            16 => HandshakeType::ClientKeyExchange,
            20 => HandshakeType::Finished,
            other => return Err(HandshakeError::UnknownHandshakeType(other)),
        })
    }
}

/// Record-layer content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ContentType {
    ChangeCipherSpec = 20,
    Alert = 21,
    Handshake = 22,
    ApplicationData = 23,
}

impl TryFrom<u8> for ContentType {
    type Error = HandshakeError;

    fn try_from(value: u8) -> Result<Self> {
        Ok(match value {
            20 => ContentType::ChangeCipherSpec,
            21 => ContentType::Alert,
            22 => ContentType::Handshake,
            23 => ContentType::ApplicationData,
            other => return Err(HandshakeError::UnknownContentType(other)),
        })
    }
}

/// A protocol version as it appears on the wire.
///
/// Ordering follows the wire value, so `Ssl3 < Tls1`.
///
/// 线路上出现的协议版本。排序遵循线路值，因此 `Ssl3 < Tls1`。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
#[serde(rename_all = "lowercase")]
pub enum SecurityProtocol {
    Ssl2,
    Ssl3,
    Tls1,
    Tls11,
    Tls12,
}

impl SecurityProtocol {
    pub const fn wire_version(self) -> u16 {
        match self {
            SecurityProtocol::Ssl2 => 0x0002,
            SecurityProtocol::Ssl3 => 0x0300,
            SecurityProtocol::Tls1 => 0x0301,
            SecurityProtocol::Tls11 => 0x0302,
            SecurityProtocol::Tls12 => 0x0303,
        }
    }

    pub fn from_wire(version: u16) -> Result<Self> {
        Ok(match version {
            0x0002 => SecurityProtocol::Ssl2,
            0x0300 => SecurityProtocol::Ssl3,
            0x0301 => SecurityProtocol::Tls1,
            0x0302 => SecurityProtocol::Tls11,
            0x0303 => SecurityProtocol::Tls12,
            other => return Err(HandshakeError::UnsupportedProtocol(other)),
        })
    }

    /// Selects the processing path for this version.
    ///
    /// Only SSLv3 and TLS 1.0 have one; everything else fails fast.
    ///
    /// 为该版本选择处理路径。只有 SSLv3 和 TLS 1.0 有对应路径，其余版本立即失败。
    pub fn dialect(self) -> Result<Dialect> {
        match self {
            SecurityProtocol::Ssl3 => Ok(Dialect::Ssl3),
            SecurityProtocol::Tls1 => Ok(Dialect::Tls1),
            other => Err(HandshakeError::UnsupportedProtocol(other.wire_version())),
        }
    }
}

/// The two processing paths the version dispatcher chooses between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Ssl3,
    Tls1,
}

impl Dialect {
    pub const fn protocol(self) -> SecurityProtocol {
        match self {
            Dialect::Ssl3 => SecurityProtocol::Ssl3,
            Dialect::Tls1 => SecurityProtocol::Tls1,
        }
    }
}

/// A cipher suite code. The handshake only negotiates the code; record
/// protection is handled elsewhere.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
#[serde(transparent)]
pub struct CipherSuite(pub u16);

impl CipherSuite {
    pub const RSA_WITH_RC4_128_MD5: CipherSuite = CipherSuite(0x0004);
    pub const RSA_WITH_RC4_128_SHA: CipherSuite = CipherSuite(0x0005);
    pub const RSA_WITH_3DES_EDE_CBC_SHA: CipherSuite = CipherSuite(0x000A);
    pub const RSA_WITH_AES_128_CBC_SHA: CipherSuite = CipherSuite(0x002F);
    pub const RSA_WITH_AES_256_CBC_SHA: CipherSuite = CipherSuite(0x0035);
}

impl fmt::Debug for CipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CipherSuite(0x{:04x})", self.0)
    }
}

/// Which end of the connection a context belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Client,
    Server,
}

impl Role {
    pub const fn peer(self) -> Role {
        match self {
            Role::Client => Role::Server,
            Role::Server => Role::Client,
        }
    }
}
