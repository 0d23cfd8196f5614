//! Benchmark and demonstration harness for the threshold-revealing
//! commitment protocol: sweeps group size and pledge thresholds, timing
//! commit issuance and reveal separately, the way the crate's other
//! benchmark entry point sweeps participant counts.

use std::time::{Duration, Instant};

use threshold_commit::{CommitDecrypter, CommitEncrypter, NameHolder};

#[derive(Default, Clone, Debug)]
struct Timings {
    commit: Duration,
    decrypt: Duration,
}

fn avg(d: Duration, reps: usize) -> Duration {
    if reps == 0 {
        d
    } else {
        Duration::from_nanos((d.as_nanos() / reps as u128) as u64)
    }
}

fn roster(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("member-{i}")).collect()
}

/// Everyone pledges the same threshold `t`; returns the revealed set and
/// per-phase timings for one run.
fn run_once(n: usize, min_count: usize, t: u32) -> (Timings, Vec<String>) {
    let names = roster(n);
    let holder = NameHolder::new(names.iter().cloned());
    let mut enc = CommitEncrypter::new(holder, min_count);
    let mut dec = CommitDecrypter::new(n);

    let mut tm = Timings::default();
    for name in &names {
        let t0 = Instant::now();
        let (ciphertext, points) = enc.commit(name, Some(t));
        tm.commit += t0.elapsed();
        dec.add_commitment(ciphertext, points);
    }

    let t0 = Instant::now();
    let revealed = dec.decrypt();
    tm.decrypt += t0.elapsed();

    (tm, revealed)
}

fn run_exp(n: usize, min_count: usize, t: u32, reps: usize) {
    let mut sum = Timings::default();
    let mut last_count = 0;

    for _ in 0..reps {
        let (tm, revealed) = run_once(n, min_count, t);
        sum.commit += tm.commit;
        sum.decrypt += tm.decrypt;
        last_count = revealed.len();
    }

    let avg_tm = Timings {
        commit: avg(sum.commit, reps),
        decrypt: avg(sum.decrypt, reps),
    };

    println!(
        "RESULT,n={},min_count={},t={},reps={},revealed={},commit_ms={:.3},decrypt_ms={:.3}",
        n,
        min_count,
        t,
        reps,
        last_count,
        avg_tm.commit.as_secs_f64() * 1e3,
        avg_tm.decrypt.as_secs_f64() * 1e3,
    );
}

fn main() {
    tracing_subscriber::fmt::init();

    let reps = 10;

    for n in [8, 16, 32, 64, 128] {
        for t in [1u32, 2, (n / 2) as u32] {
            run_exp(n, 1, t, reps);
        }
    }

    let n = 64;
    for min_count in [1, 4, 8, 16, 32] {
        run_exp(n, min_count, min_count as u32, reps);
    }

    let names = roster(5);
    let holder = NameHolder::new(names.iter().cloned());
    let mut enc = CommitEncrypter::new(holder, 2);
    let mut dec = CommitDecrypter::new(5);
    for (name, t) in [
        ("member-0", Some(1)),
        ("member-1", Some(1)),
        ("member-2", None),
        ("member-3", Some(3)),
        ("member-4", Some(1)),
    ] {
        let (ciphertext, points) = enc.commit(name, t);
        dec.add_commitment(ciphertext, points);
    }
    println!("revealed so far: {:?}", dec.decrypt());
}
