//! Opaque authorized-set membership oracle.
//!
//! Stores only `SHA-256(name)` per participant; the input roster is
//! dropped after construction so nothing downstream can recover the raw
//! name list from a `NameHolder`.

use std::collections::HashSet;

use sha2::{Digest, Sha256};
use tracing::debug;

pub struct NameHolder {
    hashes: HashSet<[u8; 32]>,
    group_size: usize,
}

impl NameHolder {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hashes: HashSet<[u8; 32]> = names.into_iter().map(|n| hash_name(n.as_ref())).collect();
        let group_size = hashes.len();
        debug!(group_size, "authorized set initialized");
        NameHolder { hashes, group_size }
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    pub fn is_member(&self, name: &str) -> bool {
        self.hashes.contains(&hash_name(name))
    }
}

fn hash_name(name: &str) -> [u8; 32] {
    let digest = Sha256::digest(name.as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}
