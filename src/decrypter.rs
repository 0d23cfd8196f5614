//! `CommitDecrypter`: accumulates public commitments and iteratively
//! recovers the identities whose threshold condition is met (spec §4.3).

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::ciphertext::decrypt_name;
use crate::field::FieldElement;
use crate::poly::interpolate_coeffs;

const SENTINEL: (FieldElement, FieldElement) = (FieldElement::ZERO, FieldElement::ZERO);

/// Tunable bound on the decryption search (spec §5): an anti-DoS cap, not a
/// correctness bound — when it is hit, the level is simply abandoned and
/// higher levels may still resolve.
#[derive(Clone, Copy, Debug)]
pub struct DecrypterConfig {
    pub max_combinations_per_level: usize,
}

impl Default for DecrypterConfig {
    fn default() -> Self {
        DecrypterConfig {
            max_combinations_per_level: 1_000_000,
        }
    }
}

pub struct CommitDecrypter {
    n: usize,
    config: DecrypterConfig,
    commitments: Vec<(String, Vec<(FieldElement, FieldElement)>)>,
}

impl CommitDecrypter {
    pub fn new(n: usize) -> Self {
        Self::with_config(n, DecrypterConfig::default())
    }

    pub fn with_config(n: usize, config: DecrypterConfig) -> Self {
        CommitDecrypter {
            n,
            config,
            commitments: Vec::new(),
        }
    }

    /// Append a commitment, assigning it the next sequential index — the
    /// only identity a participant has inside the decrypter (spec §5).
    pub fn add_commitment(&mut self, ciphertext: String, points: Vec<(FieldElement, FieldElement)>) {
        self.commitments.push((ciphertext, points));
    }

    /// Pure function of the accumulated commitment list (spec §5). Returns
    /// the sorted list of currently revealable names.
    pub fn decrypt(&self) -> Vec<String> {
        let mut revealed: HashMap<usize, String> = HashMap::new();
        let mut confirmed_t: HashMap<usize, usize> = HashMap::new();

        for k in 1..=self.n {
            let level = k - 1;

            let valid_at_level: Vec<usize> = self
                .commitments
                .iter()
                .enumerate()
                .filter(|(_, (_, pts))| pts[level] != SENTINEL)
                .map(|(idx, _)| idx)
                .collect();

            if valid_at_level.len() < k {
                continue;
            }

            let confirmed: Vec<usize> = valid_at_level
                .iter()
                .copied()
                .filter(|idx| confirmed_t.contains_key(idx))
                .collect();
            let unknown: Vec<usize> = valid_at_level
                .iter()
                .copied()
                .filter(|idx| !confirmed_t.contains_key(idx))
                .collect();

            if confirmed.len() >= k {
                self.try_fast_path(k, level, &confirmed, &unknown, &mut revealed, &mut confirmed_t);
                continue;
            }

            let needed = k - confirmed.len();
            if needed > unknown.len() {
                continue;
            }

            self.try_search_path(
                k,
                level,
                &confirmed,
                &unknown,
                needed,
                &mut revealed,
                &mut confirmed_t,
            );
        }

        let mut names: Vec<String> = revealed.into_values().collect();
        names.sort();
        names
    }

    fn points_at(&self, idx: usize, level: usize) -> (FieldElement, FieldElement) {
        self.commitments[idx].1[level]
    }

    fn try_fast_path(
        &self,
        k: usize,
        level: usize,
        confirmed: &[usize],
        unknown: &[usize],
        revealed: &mut HashMap<usize, String>,
        confirmed_t: &mut HashMap<usize, usize>,
    ) {
        let subset = &confirmed[..k];
        let points: Vec<_> = subset.iter().map(|&idx| self.points_at(idx, level)).collect();
        let Some(coeffs) = interpolate_coeffs(&points) else {
            return;
        };
        let key = coeffs[k - 1];

        for &idx in unknown {
            if let Some(name) = decrypt_name(&key, &self.commitments[idx].0) {
                revealed.insert(idx, name);
                confirmed_t.insert(idx, k);
            }
        }
        trace!(k, revealed_so_far = revealed.len(), "fast path resolved level");
    }

    fn try_search_path(
        &self,
        k: usize,
        level: usize,
        confirmed: &[usize],
        unknown: &[usize],
        needed: usize,
        revealed: &mut HashMap<usize, String>,
        confirmed_t: &mut HashMap<usize, usize>,
    ) {
        let base_points: Vec<_> = confirmed.iter().map(|&idx| self.points_at(idx, level)).collect();

        let mut combo_count = 0usize;
        for subset in Combinations::new(unknown.len(), needed) {
            combo_count += 1;
            if combo_count > self.config.max_combinations_per_level {
                debug!(k, "combination cap exceeded, abandoning level");
                break;
            }

            let candidate_indices: Vec<usize> = subset.iter().map(|&i| unknown[i]).collect();
            let mut points = base_points.clone();
            points.extend(candidate_indices.iter().map(|&idx| self.points_at(idx, level)));

            let Some(coeffs) = interpolate_coeffs(&points) else {
                continue;
            };
            let key = coeffs[k - 1];

            let mut newly_revealed = Vec::new();
            let mut all_match = true;
            for &idx in &candidate_indices {
                match decrypt_name(&key, &self.commitments[idx].0) {
                    Some(name) => newly_revealed.push((idx, name)),
                    None => {
                        all_match = false;
                        break;
                    }
                }
            }
            if !all_match {
                continue;
            }

            for (idx, name) in newly_revealed {
                revealed.insert(idx, name);
                confirmed_t.insert(idx, k);
            }

            let candidate_set: HashSet<usize> = candidate_indices.into_iter().collect();
            for &idx in unknown {
                if candidate_set.contains(&idx) {
                    continue;
                }
                if let Some(name) = decrypt_name(&key, &self.commitments[idx].0) {
                    revealed.insert(idx, name);
                    confirmed_t.insert(idx, k);
                }
            }
            debug!(k, resolved = revealed.len(), "search path resolved level");
            break;
        }
    }
}

/// Lexicographic "next combination" over index vectors, explicit and
/// non-recursive per spec §9 ("do not recurse").
struct Combinations {
    n: usize,
    k: usize,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    fn new(n: usize, k: usize) -> Self {
        if k > n {
            return Combinations {
                n,
                k,
                indices: Vec::new(),
                started: false,
                done: true,
            };
        }
        Combinations {
            n,
            k,
            indices: (0..k).collect(),
            started: false,
            done: false,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            if self.k == 0 {
                self.done = true;
            }
            return Some(self.indices.clone());
        }
        if self.k == 0 {
            self.done = true;
            return None;
        }

        let mut i = self.k;
        while i > 0 {
            i -= 1;
            if self.indices[i] < self.n - self.k + i {
                self.indices[i] += 1;
                for j in (i + 1)..self.k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                return Some(self.indices.clone());
            }
        }
        self.done = true;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encrypter::CommitEncrypter;
    use crate::name_holder::NameHolder;

    fn decrypt_all(names: &[&str], min_count: usize, pledges: &[(&str, Option<u32>)]) -> Vec<String> {
        let holder = NameHolder::new(names.to_vec());
        let n = holder.group_size();
        let mut enc = CommitEncrypter::from_seed(holder, min_count, [1u8; 32]);
        let mut dec = CommitDecrypter::new(n);
        for &(name, threshold) in pledges {
            let (ct, points) = enc.commit(name, threshold);
            dec.add_commitment(ct, points);
        }
        dec.decrypt()
    }

    #[test]
    fn combinations_enumerates_all_k_subsets() {
        let all: Vec<Vec<usize>> = Combinations::new(4, 2).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3],
            ]
        );
    }

    #[test]
    fn combinations_k_greater_than_n_is_empty() {
        assert_eq!(Combinations::new(2, 3).count(), 0);
    }

    #[test]
    fn scenario_all_threshold_one_reveals_everyone() {
        let names = ["A", "B", "C"];
        let result = decrypt_all(
            &names,
            1,
            &[("A", Some(1)), ("B", Some(1)), ("C", Some(1))],
        );
        assert_eq!(result, vec!["A", "B", "C"]);
    }

    #[test]
    fn scenario_staggered_thresholds_reveal_incrementally() {
        let names = ["A", "B", "C"];
        let holder = NameHolder::new(names.to_vec());
        let mut enc = CommitEncrypter::from_seed(holder, 1, [2u8; 32]);
        let mut dec = CommitDecrypter::new(3);

        let (ct_a, pts_a) = enc.commit("A", Some(1));
        dec.add_commitment(ct_a, pts_a);
        assert_eq!(dec.decrypt(), vec!["A"]);

        let (ct_b, pts_b) = enc.commit("B", Some(2));
        dec.add_commitment(ct_b, pts_b);
        assert_eq!(dec.decrypt(), vec!["A", "B"]);
    }

    #[test]
    fn scenario_threshold_not_met_stays_silent() {
        let names = ["A", "B", "C"];
        let result = decrypt_all(&names, 1, &[("A", Some(2)), ("B", Some(3))]);
        assert!(result.is_empty());
    }

    #[test]
    fn scenario_non_member_never_appears() {
        let names = ["A", "B", "C"];
        let holder = NameHolder::new(names.to_vec());
        let n = holder.group_size();
        let mut enc = CommitEncrypter::from_seed(holder, 1, [3u8; 32]);
        let mut dec = CommitDecrypter::new(n);

        let (ct_m, pts_m) = enc.commit("Mallory", Some(1));
        dec.add_commitment(ct_m, pts_m);
        let (ct_a, pts_a) = enc.commit("A", Some(1));
        dec.add_commitment(ct_a, pts_a);
        let (ct_b, pts_b) = enc.commit("B", Some(1));
        dec.add_commitment(ct_b, pts_b);

        assert_eq!(dec.decrypt(), vec!["A", "B"]);
    }

    #[test]
    fn scenario_min_count_floor_masks_thresholds_below_it_permanently() {
        // min_count=3 pushes the noise floor to level index 2 for every
        // member here, since max(min_count-1, t-1) = max(2, 0) = 2. Each
        // level k only attempts the key a_{k-1}, so a member's real key
        // a_{t-1} is only ever tried at k = t. With t = 1 that's k = 1,
        // but level index 0 is below the floor (sentinel) for everyone, so
        // the matching attempt never happens at any k: the floor can mask
        // a threshold below it permanently, not just delay it.
        let names = ["A", "B", "C", "D"];
        let result = decrypt_all(
            &names,
            3,
            &[
                ("A", Some(1)),
                ("B", Some(1)),
                ("C", Some(1)),
                ("D", Some(1)),
            ],
        );
        assert!(result.is_empty());
    }

    #[test]
    fn scenario_min_count_floor_does_not_mask_thresholds_at_or_above_it() {
        let names = ["A", "B", "C", "D"];
        let result = decrypt_all(
            &names,
            3,
            &[
                ("A", Some(3)),
                ("B", Some(3)),
                ("C", Some(3)),
                ("D", Some(3)),
            ],
        );
        assert_eq!(result, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn combination_cap_abandons_a_level_without_blocking_an_unrelated_group() {
        // min_count=3 puts every member's noise floor at level index 2
        // regardless of their own threshold, so P and Q (t=1, real key
        // a_0) sit in the same level-3 candidate pool as X, Y, Z (t=3,
        // real key a_2) without ever decrypting there. Every 3-subset
        // containing P or Q fails, so the only winning subset is {X,Y,Z}
        // itself, which is last in lexicographic order (10th of 10):
        // reaching it needs a cap of at least 10.
        let names = ["P", "Q", "X", "Y", "Z"];
        let holder = NameHolder::new(names.to_vec());
        let mut enc = CommitEncrypter::from_seed(holder, 3, [8u8; 32]);
        let mut log = Vec::new();
        for (name, t) in [
            ("P", Some(1)),
            ("Q", Some(1)),
            ("X", Some(3)),
            ("Y", Some(3)),
            ("Z", Some(3)),
        ] {
            log.push(enc.commit(name, t));
        }

        let tiny_cap = DecrypterConfig {
            max_combinations_per_level: 1,
        };
        let mut capped = CommitDecrypter::with_config(5, tiny_cap);
        for (ct, pts) in &log {
            capped.add_commitment(ct.clone(), pts.clone());
        }
        assert!(capped.decrypt().is_empty());

        let mut uncapped = CommitDecrypter::new(5);
        for (ct, pts) in &log {
            uncapped.add_commitment(ct.clone(), pts.clone());
        }
        assert_eq!(uncapped.decrypt(), vec!["X", "Y", "Z"]);

        // An unrelated, trivially-resolvable group under the same tiny cap
        // still reveals: a single threshold-1 point always recovers the
        // exact key on the first combination tried, so the cap is never in
        // its way.
        let control_names = ["A", "B", "C"];
        let control_holder = NameHolder::new(control_names.to_vec());
        let mut control_enc = CommitEncrypter::from_seed(control_holder, 1, [9u8; 32]);
        let mut control_dec = CommitDecrypter::with_config(3, tiny_cap);
        for name in control_names {
            let (ct, pts) = control_enc.commit(name, Some(1));
            control_dec.add_commitment(ct, pts);
        }
        assert_eq!(control_dec.decrypt(), vec!["A", "B", "C"]);
    }

    #[test]
    fn scenario_decline_never_reveals() {
        let names = ["A", "B"];
        let result = decrypt_all(&names, 1, &[("A", None), ("B", Some(1))]);
        assert_eq!(result, vec!["B"]);
    }

    #[test]
    fn monotonicity_adding_commitments_never_removes_names() {
        let names = ["A", "B", "C"];
        let holder = NameHolder::new(names.to_vec());
        let mut enc = CommitEncrypter::from_seed(holder, 1, [5u8; 32]);
        let mut dec = CommitDecrypter::new(3);

        let mut seen_before: HashSet<String> = HashSet::new();
        for (name, t) in [("A", Some(1)), ("B", Some(1)), ("C", Some(1))] {
            let (ct, pts) = enc.commit(name, t);
            dec.add_commitment(ct, pts);
            let current: HashSet<String> = dec.decrypt().into_iter().collect();
            assert!(seen_before.is_subset(&current));
            seen_before = current;
        }
    }

    #[test]
    fn restart_idempotence_rehydrated_encrypter_matches_prior_log() {
        let names = ["A", "B", "C"];
        let seed = [6u8; 32];

        let holder1 = NameHolder::new(names.to_vec());
        let mut enc1 = CommitEncrypter::from_seed(holder1, 1, seed);
        let mut log = Vec::new();
        for (name, t) in [("A", Some(1)), ("B", Some(2)), ("C", Some(2))] {
            let record = enc1.commit(name, t);
            log.push(record);
        }

        let mut dec_before = CommitDecrypter::new(3);
        for (ct, pts) in &log {
            dec_before.add_commitment(ct.clone(), pts.clone());
        }
        let before = dec_before.decrypt();

        // Simulate restart: fresh Encrypter from the same seed, rehydrated
        // with the x-coordinates already present in the log.
        let holder2 = NameHolder::new(names.to_vec());
        let mut enc2 = CommitEncrypter::from_seed(holder2, 1, seed);
        let used_xs: Vec<FieldElement> = log
            .iter()
            .flat_map(|(_, pts)| pts.iter().filter(|(x, _)| !x.is_zero()).map(|&(x, _)| x))
            .collect();
        enc2.set_used_xs(used_xs);

        let mut dec_after = CommitDecrypter::new(3);
        for (ct, pts) in &log {
            dec_after.add_commitment(ct.clone(), pts.clone());
        }
        let after = dec_after.decrypt();

        assert_eq!(before, after);
    }
}
