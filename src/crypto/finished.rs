//! Finished `verify_data` and master secret derivation, per dialect.
//!
//! Finished 消息的 `verify_data` 与主密钥派生（按协议方言区分）。

use crate::crypto::prf::prf;
use crate::crypto::secret::{MASTER_SECRET_LEN, MasterSecret, PremasterSecret, RANDOM_LEN};
use crate::error::Result;
use crate::protocol::transcript::TranscriptHasher;
use crate::protocol::types::{Dialect, Role};
use md5::{Digest, Md5};
use sha1::Sha1;

/// SSLv3 Finished is `MD5 || SHA1`.
pub const SSL3_VERIFY_DATA_LEN: usize = 36;
/// TLS 1.0 Finished is the first 12 bytes of the PRF.
pub const TLS1_VERIFY_DATA_LEN: usize = 12;

const SSL3_PAD1: u8 = 0x36;
const SSL3_PAD2: u8 = 0x5C;
const SSL3_MD5_PAD_LEN: usize = 48;
const SSL3_SHA_PAD_LEN: usize = 40;

pub const fn verify_data_len(dialect: Dialect) -> usize {
    match dialect {
        Dialect::Ssl3 => SSL3_VERIFY_DATA_LEN,
        Dialect::Tls1 => TLS1_VERIFY_DATA_LEN,
    }
}

fn ssl3_sender(sender: Role) -> &'static [u8; 4] {
    match sender {
        Role::Client => b"CLNT",
        Role::Server => b"SRVR",
    }
}

fn tls1_label(sender: Role) -> &'static [u8] {
    match sender {
        Role::Client => b"client finished",
        Role::Server => b"server finished",
    }
}

/// Computes the verify_data `sender` puts in its Finished message over the
/// transcript as it stands.
pub fn verify_data(
    dialect: Dialect,
    transcript: &TranscriptHasher,
    master: &MasterSecret,
    sender: Role,
) -> Result<Vec<u8>> {
    match dialect {
        Dialect::Ssl3 => Ok(ssl3_verify_data(transcript, master, sender)),
        Dialect::Tls1 => tls1_verify_data(transcript, master, sender),
    }
}

fn ssl3_verify_data(transcript: &TranscriptHasher, master: &MasterSecret, sender: Role) -> Vec<u8> {
    let ms = master.as_bytes();
    let (mut inner_md5, mut inner_sha) = transcript.fork();

    inner_md5.update(ssl3_sender(sender));
    inner_md5.update(ms);
    inner_md5.update([SSL3_PAD1; SSL3_MD5_PAD_LEN]);
    let inner_md5 = inner_md5.finalize();

    inner_sha.update(ssl3_sender(sender));
    inner_sha.update(ms);
    inner_sha.update([SSL3_PAD1; SSL3_SHA_PAD_LEN]);
    let inner_sha = inner_sha.finalize();

    let mut outer_md5 = Md5::new();
    outer_md5.update(ms);
    outer_md5.update([SSL3_PAD2; SSL3_MD5_PAD_LEN]);
    outer_md5.update(inner_md5);

    let mut outer_sha = Sha1::new();
    outer_sha.update(ms);
    outer_sha.update([SSL3_PAD2; SSL3_SHA_PAD_LEN]);
    outer_sha.update(inner_sha);

    let mut out = Vec::with_capacity(SSL3_VERIFY_DATA_LEN);
    out.extend_from_slice(&outer_md5.finalize());
    out.extend_from_slice(&outer_sha.finalize());
    out
}

fn tls1_verify_data(
    transcript: &TranscriptHasher,
    master: &MasterSecret,
    sender: Role,
) -> Result<Vec<u8>> {
    let seed = transcript.digests().concat();
    let mut out = vec![0u8; TLS1_VERIFY_DATA_LEN];
    prf(master.as_bytes(), tls1_label(sender), &seed, &mut out)?;
    Ok(out)
}

/// Derives the 48-byte master secret from the premaster and both hello randoms.
pub fn master_secret(
    dialect: Dialect,
    premaster: &PremasterSecret,
    client_random: &[u8; RANDOM_LEN],
    server_random: &[u8; RANDOM_LEN],
) -> Result<MasterSecret> {
    let mut out = [0u8; MASTER_SECRET_LEN];
    match dialect {
        Dialect::Ssl3 => {
            let pre = premaster.as_bytes();
            for (i, label) in [&b"A"[..], &b"BB"[..], &b"CCC"[..]].into_iter().enumerate() {
                let mut sha = Sha1::new();
                sha.update(label);
                sha.update(pre);
                sha.update(client_random);
                sha.update(server_random);
                let mut md5 = Md5::new();
                md5.update(pre);
                md5.update(sha.finalize());
                out[i * 16..(i + 1) * 16].copy_from_slice(&md5.finalize());
            }
        }
        Dialect::Tls1 => {
            let mut seed = [0u8; RANDOM_LEN * 2];
            seed[..RANDOM_LEN].copy_from_slice(client_random);
            seed[RANDOM_LEN..].copy_from_slice(server_random);
            prf(premaster.as_bytes(), b"master secret", &seed, &mut out)?;
        }
    }
    let secret = MasterSecret::from_array(out);
    zeroize::Zeroize::zeroize(&mut out);
    Ok(secret)
}
