//! The TLS 1.0 pseudo-random function (RFC 2246 §5).
//!
//! `PRF(secret, label, seed) = P_MD5(S1, label + seed) XOR P_SHA-1(S2, label + seed)`

use crate::error::Result;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use md5::Md5;
use sha1::Sha1;

type HmacMd5 = Hmac<Md5>;
type HmacSha1 = Hmac<Sha1>;

/// Fills `out` with PRF output.
pub fn prf(secret: &[u8], label: &[u8], seed: &[u8], out: &mut [u8]) -> Result<()> {
    let mut label_seed = Vec::with_capacity(label.len() + seed.len());
    label_seed.extend_from_slice(label);
    label_seed.extend_from_slice(seed);

    // S1 and S2 share the middle byte when the secret has odd length.
    let half = secret.len().div_ceil(2);
    let s1 = &secret[..half];
    let s2 = &secret[secret.len() - half..];

    out.fill(0);
    p_hash::<HmacMd5>(s1, &label_seed, out)?;
    p_hash::<HmacSha1>(s2, &label_seed, out)?;
    Ok(())
}

/// XORs `P_hash(secret, seed)` into `out`.
fn p_hash<M: Mac + KeyInit + Clone>(secret: &[u8], seed: &[u8], out: &mut [u8]) -> Result<()> {
    let mac = <M as Mac>::new_from_slice(secret)?;

    // A(1) = HMAC(secret, seed)
    let mut a = {
        let mut m = mac.clone();
        m.update(seed);
        m.finalize().into_bytes()
    };

    let mut offset = 0;
    while offset < out.len() {
        let mut m = mac.clone();
        m.update(&a);
        m.update(seed);
        let block = m.finalize().into_bytes();

        let n = (out.len() - offset).min(block.len());
        for (o, b) in out[offset..offset + n].iter_mut().zip(block.iter()) {
            *o ^= *b;
        }
        offset += n;

        let mut m = mac.clone();
        m.update(&a);
        a = m.finalize().into_bytes();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hmac_md5(key: &[u8], parts: &[&[u8]]) -> Vec<u8> {
        let mut m = <HmacMd5 as Mac>::new_from_slice(key).unwrap();
        for p in parts {
            m.update(p);
        }
        m.finalize().into_bytes().to_vec()
    }

    fn hmac_sha1(key: &[u8], parts: &[&[u8]]) -> Vec<u8> {
        let mut m = <HmacSha1 as Mac>::new_from_slice(key).unwrap();
        for p in parts {
            m.update(p);
        }
        m.finalize().into_bytes().to_vec()
    }

    #[test]
    fn test_first_block_matches_hand_expansion() {
        let secret = [0x0Bu8; 48];
        let label = b"master secret";
        let seed = [0x11u8; 64];
        let mut out = [0u8; 16];
        prf(&secret, label, &seed, &mut out).unwrap();

        let label_seed = [label.as_slice(), seed.as_slice()].concat();
        let s1 = &secret[..24];
        let s2 = &secret[24..];
        let a1_md5 = hmac_md5(s1, &[&label_seed]);
        let p_md5 = hmac_md5(s1, &[&a1_md5, &label_seed]);
        let a1_sha = hmac_sha1(s2, &[&label_seed]);
        let p_sha = hmac_sha1(s2, &[&a1_sha, &label_seed]);

        let expected: Vec<u8> = p_md5.iter().zip(p_sha.iter()).map(|(a, b)| a ^ b).collect();
        assert_eq!(out.as_slice(), &expected[..16]);
    }

    #[test]
    fn test_output_is_prefix_stable() {
        let mut short = [0u8; 12];
        let mut long = [0u8; 104];
        prf(b"secret", b"client finished", b"seed", &mut short).unwrap();
        prf(b"secret", b"client finished", b"seed", &mut long).unwrap();
        assert_eq!(&long[..12], &short);
    }

    #[test]
    fn test_odd_secret_halves_overlap() {
        let mut out = [0u8; 20];
        prf(&[1, 2, 3], b"label", b"seed", &mut out).unwrap();

        let label_seed = b"labelseed";
        let a1_md5 = hmac_md5(&[1, 2], &[label_seed]);
        let p_md5 = hmac_md5(&[1, 2], &[&a1_md5, label_seed]);
        let a1_sha = hmac_sha1(&[2, 3], &[label_seed]);
        let p_sha = hmac_sha1(&[2, 3], &[&a1_sha, label_seed]);
        let expected: Vec<u8> = p_md5.iter().zip(p_sha.iter()).map(|(a, b)| a ^ b).collect();
        assert_eq!(&out[..16], &expected[..16]);
    }

    #[test]
    fn test_labels_separate_outputs() {
        let mut a = [0u8; 12];
        let mut b = [0u8; 12];
        prf(b"k", b"client finished", b"s", &mut a).unwrap();
        prf(b"k", b"server finished", b"s", &mut b).unwrap();
        assert_ne!(a, b);
    }
}
