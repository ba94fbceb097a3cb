//! Manages the hashing of the handshake transcript.
//!
//! SSLv3 and TLS 1.0 both prove transcript integrity with a pair of digests,
//! MD5 and SHA-1, over every handshake byte exchanged so far. This struct
//! keeps both running states together with a verbatim copy of the bytes so
//! the states can always be rebuilt.
//!
//! 管理握手记录的哈希计算。
//!
//! SSLv3 与 TLS 1.0 都使用 MD5 和 SHA-1 两个摘要覆盖迄今交换的全部握手字节来证明完整性。
//! 此结构体同时保存两个运行状态以及字节的逐字副本，以便随时重建状态。

use md5::{Digest, Md5};
use sha1::Sha1;

/// Digests of a transcript prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscriptDigests {
    pub md5: [u8; 16],
    pub sha1: [u8; 20],
}

impl TranscriptDigests {
    /// `MD5 || SHA1`, the seed TLS 1.0 feeds into its PRF.
    pub fn concat(&self) -> [u8; 36] {
        let mut out = [0u8; 36];
        out[..16].copy_from_slice(&self.md5);
        out[16..].copy_from_slice(&self.sha1);
        out
    }
}

/// Running MD5 + SHA-1 over the handshake, plus the verbatim log.
///
/// Invariant: `md5`, `sha1` and `messages` always cover the same bytes.
#[derive(Debug, Clone)]
pub struct TranscriptHasher {
    md5: Md5,
    sha1: Sha1,
    messages: Vec<u8>,
}

impl TranscriptHasher {
    /// Creates a new, empty transcript.
    pub fn new() -> Self {
        Self {
            md5: Md5::new(),
            sha1: Sha1::new(),
            messages: Vec::new(),
        }
    }

    /// Feeds handshake bytes into both digests and the log.
    ///
    /// Must be called for every handshake message, in wire order.
    ///
    /// 将握手字节送入两个摘要和日志。必须按线路顺序对每条握手消息调用。
    pub fn update(&mut self, bytes: &[u8]) {
        self.md5.update(bytes);
        self.sha1.update(bytes);
        self.messages.extend_from_slice(bytes);
    }

    /// MD5 of everything fed so far. The running state is left untouched.
    pub fn md5_hash(&self) -> [u8; 16] {
        self.md5.clone().finalize().into()
    }

    /// SHA-1 of everything fed so far. The running state is left untouched.
    pub fn sha_hash(&self) -> [u8; 20] {
        self.sha1.clone().finalize().into()
    }

    pub fn digests(&self) -> TranscriptDigests {
        TranscriptDigests {
            md5: self.md5_hash(),
            sha1: self.sha_hash(),
        }
    }

    /// Finalizes both digests, consuming the transcript.
    ///
    /// The hasher cannot be fed after this; keep using [`Self::digests`] when
    /// accumulation must continue.
    ///
    /// 最终确定两个摘要并消耗该记录。此后无法再更新；若需继续累积，请使用 [`Self::digests`]。
    pub fn finish(self) -> TranscriptDigests {
        TranscriptDigests {
            md5: self.md5.finalize().into(),
            sha1: self.sha1.finalize().into(),
        }
    }

    /// Rebuilds both hash states from the verbatim log.
    pub fn reset(&mut self) {
        let mut md5 = Md5::new();
        let mut sha1 = Sha1::new();
        md5.update(&self.messages);
        sha1.update(&self.messages);
        self.md5 = md5;
        self.sha1 = sha1;
    }

    /// Discards all accumulated state and starts a new transcript.
    pub fn clear(&mut self) {
        self.md5 = Md5::new();
        self.sha1 = Sha1::new();
        self.messages.clear();
    }

    /// Clones of the running states, for computations that append further
    /// bytes (such as the SSLv3 sender label) without touching the transcript.
    pub(crate) fn fork(&self) -> (Md5, Sha1) {
        (self.md5.clone(), self.sha1.clone())
    }

    /// The verbatim bytes fed so far.
    pub fn messages(&self) -> &[u8] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for TranscriptHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    #[test]
    fn test_empty_transcript() {
        let t = TranscriptHasher::new();
        assert!(t.is_empty());
        assert_eq!(to_hex(&t.md5_hash()), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(
            to_hex(&t.sha_hash()),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }

    #[test]
    fn test_split_updates_match_single_digest() {
        let mut t = TranscriptHasher::new();
        t.update(&[0x01, 0x02, 0x03]);
        t.update(&[0x04]);
        assert_eq!(to_hex(&t.md5_hash()), "08d6c05a21512a79a1dfeb9d2a8f262f");
        assert_eq!(
            to_hex(&t.sha_hash()),
            "12dada1fff4d4787ade3333147202c3b443e376f"
        );
        assert_eq!(t.messages(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_reading_digests_does_not_disturb_accumulation() {
        let mut t = TranscriptHasher::new();
        t.update(b"hello");
        let first = t.md5_hash();
        assert_eq!(first, t.md5_hash());

        t.update(b" world");
        assert_ne!(first, t.md5_hash());
        let expected: [u8; 16] = Md5::digest(b"hello world").into();
        assert_eq!(t.md5_hash(), expected);
    }

    #[test]
    fn test_reset_replays_log() {
        let mut t = TranscriptHasher::new();
        t.update(b"ClientHello");
        t.update(b"ServerHello");
        t.update(b"ServerHelloDone");
        let before = t.digests();

        t.reset();
        assert_eq!(t.digests(), before);

        let independent: [u8; 16] = Md5::digest(t.messages()).into();
        assert_eq!(t.md5_hash(), independent);
        let independent_sha: [u8; 20] = Sha1::digest(t.messages()).into();
        assert_eq!(t.sha_hash(), independent_sha);

        t.update(b"Finished");
        let mut fresh = TranscriptHasher::new();
        fresh.update(b"ClientHelloServerHelloServerHelloDoneFinished");
        assert_eq!(t.digests(), fresh.digests());
    }

    #[test]
    fn test_order_sensitivity() {
        let mut a = TranscriptHasher::new();
        a.update(b"ClientHello");
        a.update(b"ServerHello");

        let mut b = TranscriptHasher::new();
        b.update(b"ServerHello");
        b.update(b"ClientHello");

        assert_ne!(a.md5_hash(), b.md5_hash());
        assert_ne!(a.sha_hash(), b.sha_hash());
    }

    #[test]
    fn test_clear_starts_over() {
        let mut t = TranscriptHasher::new();
        t.update(b"stale");
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.digests(), TranscriptHasher::new().digests());
    }

    #[test]
    fn test_finish_matches_live_digests() {
        let mut t = TranscriptHasher::new();
        t.update(&[9u8; 100]);
        let live = t.digests();
        let done = t.finish();
        assert_eq!(live, done);
        assert_eq!(&done.concat()[..16], &done.md5);
        assert_eq!(&done.concat()[16..], &done.sha1);
    }
}
