//! Integration test: identifier reuse after settlement.

use hashlock_core::IdReusePolicy;
use hashlock_crypto::sign_instant_refund;
use hashlock_escrow::EscrowError;
use hashlock_integration_tests::{secret_pair, Harness, START};

#[test]
fn test_reinitiate_allowed_after_settlement_by_default() {
    let h = Harness::default();
    let (secret, hash) = secret_pair(1);
    let request = h.request(hash, 10, START + 2);

    let id = h.engine.initiate(request.clone()).unwrap().swap_id;
    h.engine.redeem(&id, &secret).unwrap();

    let again = h.engine.initiate(request).unwrap();
    assert_eq!(again.swap_id, id);
    assert_eq!(h.escrowed(), 10);
    assert!(h.settlements.get(&id).is_none());
}

#[test]
fn test_reinitiate_forbidden_after_settlement() {
    let h = Harness::with_reuse(IdReusePolicy::Forbid);
    let (secret, hash) = secret_pair(1);
    let request = h.request(hash, 10, START + 2);

    let id = h.engine.initiate(request.clone()).unwrap().swap_id;
    h.engine.redeem(&id, &secret).unwrap();
    assert!(h.engine.is_retired(&id).unwrap());

    let alice = h.balance(&h.alice);
    for _ in 0..2 {
        assert_eq!(
            h.engine.initiate(request.clone()),
            Err(EscrowError::Retired(id))
        );
    }
    assert_eq!(h.balance(&h.alice), alice);
    assert_eq!(h.escrowed(), 0);
}

#[test]
fn test_every_settlement_retires_under_forbid() {
    let h = Harness::with_reuse(IdReusePolicy::Forbid);
    let (_, hash) = secret_pair(1);

    let refunded = h.engine.initiate(h.request(hash, 1, START + 1)).unwrap().swap_id;
    let cancelled = h.engine.initiate(h.request(hash, 2, START + 1)).unwrap().swap_id;
    h.engine
        .instant_refund(&cancelled, &sign_instant_refund(&cancelled, &h.bob))
        .unwrap();
    h.clock.set(START + 1);
    h.engine.refund(&refunded).unwrap();

    assert!(h.engine.is_retired(&refunded).unwrap());
    assert!(h.engine.is_retired(&cancelled).unwrap());
}

#[test]
fn test_pending_duplicate_is_already_exists_under_both_policies() {
    for policy in [IdReusePolicy::AllowAfterSettlement, IdReusePolicy::Forbid] {
        let h = Harness::with_reuse(policy);
        let (_, hash) = secret_pair(1);
        let request = h.request(hash, 10, START + 2);
        let id = h.engine.initiate(request.clone()).unwrap().swap_id;

        assert_eq!(
            h.engine.initiate(request),
            Err(EscrowError::AlreadyExists(id))
        );
        assert_eq!(h.escrowed(), 10);
    }
}
