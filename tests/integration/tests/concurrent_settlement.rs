//! Integration test: racing callers against one ledger.
//!
//! Settlements on the same record and duplicate initiations run from many
//! threads at once; exactly one of each may commit.

use std::sync::{Arc, Barrier};
use std::thread;

use hashlock_crypto::sign_instant_refund;
use hashlock_escrow::EscrowError;
use hashlock_integration_tests::{secret_pair, Harness, START};

const THREADS: usize = 8;

#[test]
fn test_racing_settlements_commit_once() {
    let h = Harness::default();
    let (secret, hash) = secret_pair(1);
    let id = h.engine.initiate(h.request(hash, 100, START + 5)).unwrap().swap_id;
    let consent = sign_instant_refund(&id, &h.bob);

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let engine = h.engine.clone();
            let barrier = barrier.clone();
            let secret = secret.clone();
            let consent = consent.clone();
            thread::spawn(move || {
                barrier.wait();
                if i % 2 == 0 {
                    engine.redeem(&id, &secret)
                } else {
                    engine.instant_refund(&id, &consent)
                }
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|t| t.join().unwrap()).collect();
    let committed = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(committed, 1);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(err, &EscrowError::NotFound(id));
    }

    // Whoever won, the 100 tokens went to exactly one side.
    assert_eq!(h.escrowed(), 0);
    assert_eq!(h.balance(&h.alice) + h.balance(&h.bob), 2_000);
    assert_eq!(h.log.for_swap(&id).len(), 2);
}

#[test]
fn test_racing_duplicate_initiations() {
    let h = Harness::default();
    let (_, hash) = secret_pair(1);
    let request = h.request(hash, 10, START + 5);

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let engine = h.engine.clone();
            let barrier = barrier.clone();
            let request = request.clone();
            thread::spawn(move || {
                barrier.wait();
                engine.initiate(request)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|t| t.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(matches!(err, EscrowError::AlreadyExists(_)));
    }
    assert_eq!(h.escrowed(), 10);
    assert_eq!(h.balance(&h.alice), 990);
}

#[test]
fn test_independent_swaps_settle_in_parallel() {
    let h = Harness::default();
    let ids: Vec<_> = (0..THREADS as u8)
        .map(|i| {
            let (secret, hash) = secret_pair(i + 1);
            let id = h
                .engine
                .initiate(h.request(hash, 5, START + 5))
                .unwrap()
                .swap_id;
            (id, secret)
        })
        .collect();
    assert_eq!(h.escrowed(), 5 * THREADS as u64);

    let handles: Vec<_> = ids
        .into_iter()
        .map(|(id, secret)| {
            let engine = h.engine.clone();
            thread::spawn(move || engine.redeem(&id, &secret))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert_eq!(h.escrowed(), 0);
    assert_eq!(h.balance(&h.bob), 1_000 + 5 * THREADS as u64);
    assert_eq!(h.secrets.len(), THREADS);

    let sequences: Vec<u64> = h.log.records().iter().map(|r| r.sequence).collect();
    assert!(sequences.windows(2).all(|w| w[1] == w[0] + 1));
}
