//! `CommitEncrypter`: holds the secret coefficient vector and emits
//! `(ciphertext, points)` commitment records (spec §3, §4.2).

use std::collections::HashSet;

use rand::rngs::ThreadRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, trace};

use crate::ciphertext::{encrypt_name, random_ciphertext};
use crate::field::FieldElement;
use crate::name_holder::NameHolder;
use crate::poly::eval_prefix;

/// Either a non-deterministic CSPRNG (production) or a seeded stream-cipher
/// RNG (reproducible rehydration/tests) — both are cryptographically
/// strong, unlike a plain PRNG, per spec §9's "do not use a
/// non-cryptographic PRNG for coefficients in production".
enum CoeffRng {
    Thread(ThreadRng),
    Seeded(ChaCha20Rng),
}

impl RngCore for CoeffRng {
    fn next_u32(&mut self) -> u32 {
        match self {
            CoeffRng::Thread(r) => r.next_u32(),
            CoeffRng::Seeded(r) => r.next_u32(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match self {
            CoeffRng::Thread(r) => r.next_u64(),
            CoeffRng::Seeded(r) => r.next_u64(),
        }
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        match self {
            CoeffRng::Thread(r) => r.fill_bytes(dest),
            CoeffRng::Seeded(r) => r.fill_bytes(dest),
        }
    }
}

pub struct CommitEncrypter {
    name_holder: NameHolder,
    n: usize,
    min_count: usize,
    coeffs: Vec<FieldElement>,
    used_xs: HashSet<u128>,
    rng: CoeffRng,
}

impl CommitEncrypter {
    /// Production constructor: coefficients drawn from the OS-backed CSPRNG.
    pub fn new(name_holder: NameHolder, min_count: usize) -> Self {
        Self::build(name_holder, min_count, CoeffRng::Thread(rand::rng()))
    }

    /// Deterministic constructor for reproducible tests and restart
    /// rehydration (spec §3 "Lifecycle", §5 "Restart recovery"): the same
    /// 32-byte seed always reconstructs the same coefficient vector.
    pub fn from_seed(name_holder: NameHolder, min_count: usize, seed: [u8; 32]) -> Self {
        Self::build(
            name_holder,
            min_count,
            CoeffRng::Seeded(ChaCha20Rng::from_seed(seed)),
        )
    }

    fn build(name_holder: NameHolder, min_count: usize, mut rng: CoeffRng) -> Self {
        let n = name_holder.group_size();
        let min_count = if n == 0 { 0 } else { min_count.clamp(1, n) };
        let coeffs = (0..n).map(|_| FieldElement::random(&mut rng)).collect();
        debug!(n, min_count, "commit encrypter initialized");
        CommitEncrypter {
            name_holder,
            n,
            min_count,
            coeffs,
            used_xs: HashSet::new(),
            rng,
        }
    }

    /// Replace the set of already-issued x-coordinates, e.g. when
    /// rehydrating from the persisted commitment log (spec §5).
    pub fn set_used_xs<I: IntoIterator<Item = FieldElement>>(&mut self, xs: I) {
        self.used_xs = xs.into_iter().map(FieldElement::to_u128).collect();
    }

    fn unique_x(&mut self) -> FieldElement {
        loop {
            let candidate = FieldElement::random_nonzero(&mut self.rng);
            let raw = candidate.to_u128();
            if self.used_xs.insert(raw) {
                return candidate;
            }
        }
    }

    /// Produce a commitment record for `(name, threshold)`. `threshold =
    /// None` encodes `⊥` ("never"). Non-members and declines both yield an
    /// all-sentinel, indistinguishable-in-shape noise commitment (spec §3
    /// invariants 4-5).
    pub fn commit(
        &mut self,
        name: &str,
        threshold: Option<u32>,
    ) -> (String, Vec<(FieldElement, FieldElement)>) {
        let is_member = self.name_holder.is_member(name);
        if !is_member || threshold.is_none() {
            trace!(is_member, declined = threshold.is_none(), "noise commitment issued");
            let points = vec![(FieldElement::ZERO, FieldElement::ZERO); self.n];
            return (random_ciphertext(&mut self.rng), points);
        }

        let t = (threshold.expect("checked above") as usize).clamp(1, self.n.max(1));
        let key = self.coeffs[t - 1];
        let ciphertext = encrypt_name(&mut self.rng, &key, name);

        let floor = self.min_count.saturating_sub(1).max(t.saturating_sub(1));
        let mut points = Vec::with_capacity(self.n);
        for level in 0..self.n {
            if level < floor {
                points.push((FieldElement::ZERO, FieldElement::ZERO));
            } else {
                let x = self.unique_x();
                let y = eval_prefix(&self.coeffs, level, x);
                points.push((x, y));
            }
        }
        debug!(t, floor, real_points = self.n - floor, "commitment issued");
        (ciphertext, points)
    }
}
