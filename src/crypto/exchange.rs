use crate::error::Result;

/// Transports the premaster secret from client to server.
///
/// SSLv3 and TLS 1.0 wrap the premaster with the server's public key (RSA) or
/// replace it with a Diffie-Hellman share. The handshake only needs the opaque
/// `exchange_keys` blob in ClientKeyExchange, so the primitive is supplied by
/// the caller.
///
/// 将预主密钥从客户端传输到服务器。
///
/// 握手只需要 ClientKeyExchange 中不透明的 `exchange_keys`，因此具体原语由调用方提供。
pub trait PremasterExchange {
    /// Client side: protects `premaster` for the server identified by
    /// `server_certificates` (the chain from the Certificate message, possibly
    /// empty).
    fn seal(&self, premaster: &[u8], server_certificates: &[Vec<u8>]) -> Result<Vec<u8>>;

    /// Server side: recovers the premaster from `exchange_keys`.
    fn open(&self, exchange_keys: &[u8]) -> Result<Vec<u8>>;
}

impl<T: PremasterExchange + ?Sized> PremasterExchange for &T {
    fn seal(&self, premaster: &[u8], server_certificates: &[Vec<u8>]) -> Result<Vec<u8>> {
        (**self).seal(premaster, server_certificates)
    }

    fn open(&self, exchange_keys: &[u8]) -> Result<Vec<u8>> {
        (**self).open(exchange_keys)
    }
}

impl<T: PremasterExchange + ?Sized> PremasterExchange for Box<T> {
    fn seal(&self, premaster: &[u8], server_certificates: &[Vec<u8>]) -> Result<Vec<u8>> {
        (**self).seal(premaster, server_certificates)
    }

    fn open(&self, exchange_keys: &[u8]) -> Result<Vec<u8>> {
        (**self).open(exchange_keys)
    }
}
