//! The `"AC2:"`-prefixed HMAC-keystream cipher shared by `encrypter` and
//! `decrypter` (spec §3, §6).
//!
//! `ciphertext = nonce (16 bytes) || body`, `body = plaintext XOR keystream`,
//! `keystream = HMAC-SHA256(key = ASCII(a_{t-1}), msg = nonce)` repeated to
//! cover `plaintext`, `plaintext = "AC2:" || name`. The prefix is the
//! decrypt-side acceptance test: a candidate key "succeeds" only if the
//! decrypted bytes are valid UTF-8 starting with it.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use crate::field::FieldElement;

type HmacSha256 = Hmac<Sha256>;

const MAGIC: &[u8] = b"AC2:";
const NONCE_LEN: usize = 16;

fn keystream(key: &FieldElement, nonce: &[u8], len: usize) -> Vec<u8> {
    let key_bytes = key.to_decimal_string();
    let mut mac = HmacSha256::new_from_slice(key_bytes.as_bytes())
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(nonce);
    let digest = mac.finalize().into_bytes();
    digest.iter().cycle().take(len).copied().collect()
}

/// Encrypt `name` under the threshold-`t` key, producing a hex-encoded
/// `nonce || body` string.
pub fn encrypt_name<R: RngCore>(rng: &mut R, key: &FieldElement, name: &str) -> String {
    let mut nonce = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce);

    let mut plaintext = Vec::with_capacity(MAGIC.len() + name.len());
    plaintext.extend_from_slice(MAGIC);
    plaintext.extend_from_slice(name.as_bytes());

    let ks = keystream(key, &nonce, plaintext.len());
    let body: Vec<u8> = plaintext.iter().zip(ks.iter()).map(|(a, b)| a ^ b).collect();

    let mut out = Vec::with_capacity(NONCE_LEN + body.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&body);
    hex::encode(out)
}

/// Attempt to decrypt `ciphertext_hex` with `key`. Returns `None` on any
/// malformed input, non-UTF-8 output, or missing magic prefix — never
/// panics (spec §4.3.3).
pub fn decrypt_name(key: &FieldElement, ciphertext_hex: &str) -> Option<String> {
    let data = hex::decode(ciphertext_hex).ok()?;
    if data.len() < NONCE_LEN {
        return None;
    }
    let (nonce, body) = data.split_at(NONCE_LEN);

    let ks = keystream(key, nonce, body.len());
    let plaintext: Vec<u8> = body.iter().zip(ks.iter()).map(|(a, b)| a ^ b).collect();

    if !plaintext.starts_with(MAGIC) {
        return None;
    }
    String::from_utf8(plaintext[MAGIC.len()..].to_vec()).ok()
}

/// 16 random bytes, hex-encoded — the decline/non-member noise ciphertext.
pub fn random_ciphertext<R: RngCore>(rng: &mut R) -> String {
    let mut buf = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut buf);
    hex::encode(buf)
}
