use crate::error::{HandshakeError, Result};
use rand_core::{OsRng, RngCore};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const MASTER_SECRET_LEN: usize = 48;
pub const PREMASTER_SECRET_LEN: usize = 48;
pub const RANDOM_LEN: usize = 32;

/// The 48-byte master secret of a session. Wiped on drop.
///
/// 会话的 48 字节主密钥。在释放时清零。
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MasterSecret([u8; MASTER_SECRET_LEN]);

impl MasterSecret {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; MASTER_SECRET_LEN] = bytes
            .try_into()
            .map_err(|_| HandshakeError::Decode("master secret must be 48 bytes"))?;
        Ok(Self(arr))
    }

    pub(crate) fn from_array(bytes: [u8; MASTER_SECRET_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSecret(..)")
    }
}

/// The premaster secret the client sends: the advertised client version
/// followed by 46 random bytes. Wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PremasterSecret([u8; PREMASTER_SECRET_LEN]);

impl PremasterSecret {
    pub fn generate(client_version: u16) -> Self {
        let mut bytes = [0u8; PREMASTER_SECRET_LEN];
        bytes[..2].copy_from_slice(&client_version.to_be_bytes());
        OsRng.fill_bytes(&mut bytes[2..]);
        Self(bytes)
    }

    /// Checks a premaster recovered by the server. The embedded version must
    /// equal the version the client advertised in its hello.
    pub fn from_received(bytes: &[u8], client_version: u16) -> Result<Self> {
        let arr: [u8; PREMASTER_SECRET_LEN] =
            bytes.try_into().map_err(|_| HandshakeError::BadPremaster)?;
        if arr[..2] != client_version.to_be_bytes() {
            return Err(HandshakeError::BadPremaster);
        }
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A hello random: 4 bytes of big-endian UNIX time, then 28 random bytes.
pub fn hello_random() -> [u8; RANDOM_LEN] {
    let mut random = [0u8; RANDOM_LEN];
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0);
    random[..4].copy_from_slice(&now.to_be_bytes());
    OsRng.fill_bytes(&mut random[4..]);
    random
}

/// Fresh random bytes, used for server-assigned session ids.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    OsRng.fill_bytes(&mut out);
    out
}

/// Compares two byte strings without an early exit on the first difference.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
