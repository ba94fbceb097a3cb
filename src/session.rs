//! Resumable session state and the server-side session cache.
//!
//! 可恢复的会话状态与服务器端会话缓存。

use crate::context::Context;
use crate::crypto::MasterSecret;
use crate::error::{BincodeError, HandshakeError, Result};
use crate::protocol::types::{CipherSuite, SecurityProtocol};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use zeroize::Zeroize;

/// Everything needed to resume a session with an abbreviated handshake.
///
/// Serialized with `bincode` so an application can persist it between
/// connections. The master secret is wiped when the value is dropped.
///
/// 使用简化握手恢复会话所需的全部信息。
///
/// 使用 `bincode` 序列化，以便应用程序在连接之间持久化。主密钥在值被释放时清零。
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct SessionState {
    pub session_id: Vec<u8>,
    pub protocol: SecurityProtocol,
    pub cipher_suite: CipherSuite,
    master_secret: Vec<u8>,
    /// Seconds since the UNIX epoch after which the session is not resumable.
    pub expiry_timestamp: u64,
}

impl SessionState {
    pub fn new(
        session_id: Vec<u8>,
        protocol: SecurityProtocol,
        cipher_suite: CipherSuite,
        master_secret: &MasterSecret,
        expiry_timestamp: u64,
    ) -> Self {
        Self {
            session_id,
            protocol,
            cipher_suite,
            master_secret: master_secret.as_bytes().to_vec(),
            expiry_timestamp,
        }
    }

    /// Captures a finished handshake, valid for `config.session_lifetime_secs`.
    pub(crate) fn from_context(context: &Context) -> Result<Self> {
        let master = context
            .master_secret()
            .ok_or(HandshakeError::InvalidState)?;
        let suite = context.cipher_suite().ok_or(HandshakeError::InvalidState)?;
        let expiry = SystemTime::now()
            .checked_add(Duration::from_secs(context.config().session_lifetime_secs))
            .ok_or(HandshakeError::InvalidState)?
            .duration_since(UNIX_EPOCH)
            .map_err(|_| HandshakeError::InvalidState)?
            .as_secs();
        Ok(Self::new(
            context.session_id().to_vec(),
            context.protocol(),
            suite,
            master,
            expiry,
        ))
    }

    pub fn master_secret(&self) -> Result<MasterSecret> {
        MasterSecret::from_bytes(&self.master_secret)
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expiry_timestamp
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let bytes = bincode::encode_to_vec(self, bincode::config::standard())
            .map_err(BincodeError::from)?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (state, _) = bincode::decode_from_slice(bytes, bincode::config::standard())
            .map_err(BincodeError::from)?;
        Ok(state)
    }
}

impl Drop for SessionState {
    fn drop(&mut self) {
        self.master_secret.zeroize();
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("session_id", &self.session_id)
            .field("protocol", &self.protocol)
            .field("cipher_suite", &self.cipher_suite)
            .field("expiry_timestamp", &self.expiry_timestamp)
            .finish_non_exhaustive()
    }
}

/// Current UNIX time in seconds.
pub fn unix_now() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| HandshakeError::InvalidState)
}

/// Entries a cache holds unless built with [`SessionCache::with_capacity`].
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Sessions a server is willing to resume, keyed by session id.
///
/// The cache never holds more than its capacity. When full, an insert evicts
/// the entry closest to expiry, so expired sessions always go first.
///
/// 服务器愿意恢复的会话，以会话 ID 为键。缓存条目数从不超过其容量；
/// 缓存已满时，插入会逐出最接近过期的条目，因此已过期的会话总是最先被逐出。
#[derive(Debug)]
pub struct SessionCache {
    sessions: HashMap<Vec<u8>, SessionState>,
    capacity: usize,
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

/// A cache shared by every server handshake on the same listener.
pub type SharedSessionCache = Arc<Mutex<SessionCache>>;

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache holding at most `capacity` sessions. A capacity of zero is
    /// treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn shared() -> SharedSessionCache {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn shared_with_capacity(capacity: usize) -> SharedSessionCache {
        Arc::new(Mutex::new(Self::with_capacity(capacity)))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Stores `state`, replacing any entry with the same id. Empty ids are
    /// not resumable and are ignored.
    pub fn insert(&mut self, state: SessionState) {
        if state.session_id.is_empty() {
            return;
        }
        if self.sessions.len() >= self.capacity && !self.sessions.contains_key(&state.session_id) {
            self.evict_oldest();
        }
        tracing::debug!(id_len = state.session_id.len(), "caching session");
        self.sessions.insert(state.session_id.clone(), state);
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|(_, state)| state.expiry_timestamp)
            .map(|(id, _)| id.clone());
        if let Some(id) = oldest {
            tracing::debug!(capacity = self.capacity, "session cache full, evicting");
            self.sessions.remove(&id);
        }
    }

    /// Returns a copy of a live session. An expired entry is evicted instead.
    pub fn lookup(&mut self, session_id: &[u8], now: u64) -> Option<SessionState> {
        let expired = self.sessions.get(session_id)?.is_expired(now);
        if expired {
            tracing::debug!("evicting expired session on lookup");
            self.sessions.remove(session_id);
            return None;
        }
        self.sessions.get(session_id).cloned()
    }

    pub fn remove(&mut self, session_id: &[u8]) -> Option<SessionState> {
        self.sessions.remove(session_id)
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&mut self, now: u64) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, state| !state.is_expired(now));
        before - self.sessions.len()
    }
}

/// Locks a shared cache, mapping poisoning to a handshake error.
pub fn lock_cache(cache: &SharedSessionCache) -> Result<MutexGuard<'_, SessionCache>> {
    cache.lock().map_err(|_| HandshakeError::SessionCachePoisoned)
}
