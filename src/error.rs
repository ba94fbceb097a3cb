use thiserror::Error;

use crate::protocol::types::HandshakeType;

/// An error related to `bincode` serialization or deserialization.
///
/// This is a wrapper around `bincode`'s own error types to provide a more
/// consistent error handling experience within this crate.
///
/// 与 `bincode` 序列化或反序列化相关的错误。
///
/// 这是对 `bincode` 自身错误类型的包装，以便在此 crate 中提供更一致的错误处理体验。
#[derive(Error, Debug)]
pub enum BincodeError {
    /// An error occurred during serialization (encoding).
    ///
    /// 在序列化（编码）过程中发生错误。
    #[error("Encode error: {0}")]
    Enc(#[source] Box<bincode::error::EncodeError>),
    /// An error occurred during deserialization (decoding).
    ///
    /// 在反序列化（解码）过程中发生错误。
    #[error("Decode error: {0}")]
    Dec(#[source] Box<bincode::error::DecodeError>),
}

impl From<bincode::error::EncodeError> for BincodeError {
    fn from(err: bincode::error::EncodeError) -> Self {
        BincodeError::Enc(Box::from(err))
    }
}

impl From<bincode::error::DecodeError> for BincodeError {
    fn from(err: bincode::error::DecodeError) -> Self {
        BincodeError::Dec(Box::from(err))
    }
}

#[derive(Debug, Error)]
pub enum HandshakeError {
    /// The peer (or the local configuration) asked for a protocol version this
    /// engine cannot process. Fatal; there is no fallback at this layer.
    ///
    /// 对端（或本地配置）请求了本引擎无法处理的协议版本。致命错误，此层不做回退。
    #[error("security protocol 0x{0:04x} is not supported")]
    UnsupportedProtocol(u16),

    /// Not enough bytes are buffered to complete a frame. The caller should
    /// buffer at least `needed` more bytes and retry.
    ///
    /// 缓冲的字节不足以构成完整的帧。调用方应至少再缓冲 `needed` 个字节后重试。
    #[error("incomplete frame: {needed} more byte(s) required")]
    Incomplete { needed: usize },

    #[error("malformed handshake body: {0}")]
    Decode(&'static str),

    /// An outbound field does not fit its wire encoding.
    ///
    /// 出站字段无法放入其线路编码。
    #[error("cannot encode handshake body: {0}")]
    Encode(&'static str),

    #[error("unknown handshake type {0}")]
    UnknownHandshakeType(u8),

    #[error("unknown content type {0}")]
    UnknownContentType(u8),

    #[error("handshake message of {len} bytes exceeds the limit of {limit}")]
    MessageTooLarge { len: usize, limit: usize },

    #[error("record of {0} bytes exceeds the maximum record size")]
    RecordOverflow(usize),

    #[error("expected {expected:?} but received {found:?}")]
    UnexpectedMessage {
        expected: HandshakeType,
        found: Option<HandshakeType>,
    },

    /// Bytes followed the last message of a flight.
    ///
    /// 一批消息的最后一条之后仍有多余字节。
    #[error("{0} byte(s) follow the end of the flight")]
    TrailingData(usize),

    #[error("serialization or deserialization failed: {0}")]
    SerializationError(#[from] BincodeError),

    #[error("invalid state transition attempted")]
    InvalidState,

    #[error("received an unexpected or invalid message for the current state")]
    InvalidMessage,

    #[error("no cipher suite in common with the peer")]
    NoCommonCipherSuite,

    #[error("peer selected a compression method other than null")]
    CompressionUnsupported,

    #[error("finished message verification failed")]
    FinishedMismatch,

    #[error("premaster secret is malformed or carries the wrong version")]
    BadPremaster,

    #[error("key exchange failed: {0}")]
    Exchange(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("session cache lock was poisoned")]
    SessionCachePoisoned,

    #[error("invalid MAC key length")]
    InvalidKeyLength(#[from] hmac::digest::InvalidLength),
}

pub type Result<T> = std::result::Result<T, HandshakeError>;
