//! Handshake settings shared by both roles.
//!
//! 双方共用的握手设置。

use crate::error::{HandshakeError, Result};
use crate::protocol::types::{CipherSuite, SecurityProtocol};
use serde::{Deserialize, Serialize};

/// Most suites a ClientHello can list: two bytes each under a u16 length.
pub const MAX_CIPHER_SUITES: usize = u16::MAX as usize / 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandshakeConfig {
    /// Lowest version this side will negotiate.
    pub min_protocol: SecurityProtocol,
    /// Highest version this side will offer or accept.
    pub max_protocol: SecurityProtocol,
    /// Offered (client) or accepted (server) suites, most preferred first.
    pub cipher_suites: Vec<CipherSuite>,
    /// Server certificate chain, leaf first, as opaque DER blobs.
    pub certificates: Vec<Vec<u8>>,
    /// Largest handshake body accepted from the peer.
    pub max_message_len: usize,
    /// How long a cached session stays resumable.
    pub session_lifetime_secs: u64,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            min_protocol: SecurityProtocol::Ssl3,
            max_protocol: SecurityProtocol::Tls1,
            cipher_suites: vec![
                CipherSuite::RSA_WITH_AES_128_CBC_SHA,
                CipherSuite::RSA_WITH_AES_256_CBC_SHA,
                CipherSuite::RSA_WITH_3DES_EDE_CBC_SHA,
                CipherSuite::RSA_WITH_RC4_128_SHA,
            ],
            certificates: Vec::new(),
            max_message_len: 0x40000,
            session_lifetime_secs: 180,
        }
    }
}

impl HandshakeConfig {
    /// Checks that the engine can actually honour these settings.
    pub fn validate(&self) -> Result<()> {
        for bound in [self.min_protocol, self.max_protocol] {
            if bound.dialect().is_err() {
                return Err(HandshakeError::InvalidConfig(format!(
                    "{bound:?} cannot be negotiated by this engine"
                )));
            }
        }
        if self.min_protocol > self.max_protocol {
            return Err(HandshakeError::InvalidConfig(
                "min_protocol is above max_protocol".into(),
            ));
        }
        if self.cipher_suites.is_empty() {
            return Err(HandshakeError::InvalidConfig(
                "at least one cipher suite is required".into(),
            ));
        }
        if self.cipher_suites.len() > MAX_CIPHER_SUITES {
            return Err(HandshakeError::InvalidConfig(format!(
                "{} cipher suites exceed the limit of {MAX_CIPHER_SUITES}",
                self.cipher_suites.len()
            )));
        }
        if self.max_message_len == 0 {
            return Err(HandshakeError::InvalidConfig(
                "max_message_len must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        HandshakeConfig::default().validate().unwrap();
    }

    #[test]
    fn test_deserialize_partial_json() {
        let json = r#"{ "max_protocol": "ssl3", "cipher_suites": [47, 5] }"#;
        let config: HandshakeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.max_protocol, SecurityProtocol::Ssl3);
        assert_eq!(config.min_protocol, SecurityProtocol::Ssl3);
        assert_eq!(
            config.cipher_suites,
            vec![
                CipherSuite::RSA_WITH_AES_128_CBC_SHA,
                CipherSuite::RSA_WITH_RC4_128_SHA
            ]
        );
        assert_eq!(config.session_lifetime_secs, 180);
        config.validate().unwrap();
    }

    #[test]
    fn test_rejects_unsupported_bounds() {
        let config = HandshakeConfig {
            max_protocol: SecurityProtocol::Tls12,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(HandshakeError::InvalidConfig(_))
        ));

        let config = HandshakeConfig {
            min_protocol: SecurityProtocol::Tls1,
            max_protocol: SecurityProtocol::Ssl3,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_suite_list_that_overflows_hello() {
        let config = HandshakeConfig {
            cipher_suites: vec![CipherSuite::RSA_WITH_RC4_128_SHA; MAX_CIPHER_SUITES + 1],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(HandshakeError::InvalidConfig(_))
        ));

        let config = HandshakeConfig {
            cipher_suites: vec![CipherSuite::RSA_WITH_RC4_128_SHA; MAX_CIPHER_SUITES],
            ..Default::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_rejects_empty_suites_and_zero_limit() {
        let config = HandshakeConfig {
            cipher_suites: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = HandshakeConfig {
            max_message_len: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
