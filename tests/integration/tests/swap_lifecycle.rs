//! Integration test: swap lifecycle across core, crypto and escrow.
//!
//! Drives the engine through initiate, redeem, refund and instant refund and
//! checks balances, the journal and the derived indices after each step.

use hashlock_core::{HashAlgorithm, InitiateRequest, Settlement, SwapEvent, SwapParams};
use hashlock_crypto::{commitment, generate_secret, sign_instant_refund, KeyPair};
use hashlock_escrow::EscrowError;
use hashlock_integration_tests::{secret_pair, Harness, MINT, START};

// =========================================================================
// Redeem path
// =========================================================================

#[test]
fn test_redeem_with_random_secret() {
    let h = Harness::default();
    let secret = generate_secret();
    let hash = commitment(HashAlgorithm::Sha256, &secret);
    let timelock = h.engine.deadline_after(2).unwrap();
    assert_eq!(timelock, START + 2);

    let receipt = h.engine.initiate(h.request(hash, 10, timelock)).unwrap();
    assert_eq!(h.balance(&h.alice), 990);
    assert_eq!(h.escrowed(), 10);

    h.engine.redeem(&receipt.swap_id, &secret).unwrap();
    assert_eq!(h.balance(&h.bob), 1_010);
    assert_eq!(h.escrowed(), 0);
    assert!(matches!(
        h.engine.find(&receipt.swap_id),
        Err(EscrowError::NotFound(_))
    ));

    // Redemption publishes the preimage for the counter-leg.
    assert_eq!(h.secrets.lookup(&hash), Some(secret));
    assert_eq!(
        h.settlements.get(&receipt.swap_id).unwrap().settlement,
        Settlement::Redeemed
    );
}

#[test]
fn test_swap_id_matches_derivation() {
    let h = Harness::default();
    let (_, hash) = secret_pair(1);
    let receipt = h.engine.initiate(h.request(hash, 10, START + 5)).unwrap();

    let params = SwapParams {
        mint: MINT,
        redeemer: h.bob.address(),
        initiator: h.alice.address(),
        secret_hash: hash,
        amount: 10,
        timelock: START + 5,
    };
    assert_eq!(receipt.swap_id, params.id());
}

#[test]
fn test_wrong_secret_changes_nothing() {
    let h = Harness::default();
    let (_, hash) = secret_pair(1);
    let (wrong, _) = secret_pair(2);
    let id = h.engine.initiate(h.request(hash, 10, START + 5)).unwrap().swap_id;
    let events_before = h.log.len();

    let err = h.engine.redeem(&id, &wrong).unwrap_err();
    assert_eq!(err, EscrowError::InvalidSecret(id));
    assert_eq!(h.escrowed(), 10);
    assert_eq!(h.balance(&h.bob), 1_000);
    assert_eq!(h.log.len(), events_before);
    assert!(h.engine.find(&id).is_ok());
}

#[test]
fn test_blake3_commitment() {
    let h = Harness::new(hashlock_core::EscrowConfig {
        hash_algorithm: HashAlgorithm::Blake3,
        ..Default::default()
    });
    let (secret, _) = secret_pair(3);
    let hash = commitment(HashAlgorithm::Blake3, &secret);
    let id = h.engine.initiate(h.request(hash, 10, START + 5)).unwrap().swap_id;

    assert_eq!(h.engine.find(&id).unwrap().hash_algorithm, HashAlgorithm::Blake3);
    h.engine.redeem(&id, &secret).unwrap();
    assert_eq!(h.balance(&h.bob), 1_010);
}

// =========================================================================
// Refund paths
// =========================================================================

#[test]
fn test_refund_only_after_timelock() {
    let h = Harness::default();
    let (secret, hash) = secret_pair(1);
    let id = h.engine.initiate(h.request(hash, 25, START + 2)).unwrap().swap_id;

    h.clock.set(START + 1);
    assert!(matches!(
        h.engine.refund(&id),
        Err(EscrowError::TimelockNotExpired { .. })
    ));

    // At the deadline redeem is closed and refund is open.
    h.clock.set(START + 2);
    assert!(matches!(
        h.engine.redeem(&id, &secret),
        Err(EscrowError::Expired { .. })
    ));
    h.engine.refund(&id).unwrap();
    assert_eq!(h.balance(&h.alice), 1_000);
    assert_eq!(h.escrowed(), 0);
    assert!(h.secrets.is_empty());
}

#[test]
fn test_instant_refund_needs_redeemer_consent() {
    let h = Harness::default();
    let (_, hash) = secret_pair(1);
    let id = h.engine.initiate(h.request(hash, 40, START + 100)).unwrap().swap_id;

    let outsider = KeyPair::from_seed(&[0x33; 32]);
    for signer in [&h.alice, &outsider] {
        let err = h
            .engine
            .instant_refund(&id, &sign_instant_refund(&id, signer))
            .unwrap_err();
        assert!(matches!(err, EscrowError::Authorization(_)));
    }
    assert_eq!(h.escrowed(), 40);

    h.engine
        .instant_refund(&id, &sign_instant_refund(&id, &h.bob))
        .unwrap();
    assert_eq!(h.balance(&h.alice), 1_000);
    assert_eq!(
        h.settlements.get(&id).unwrap().settlement,
        Settlement::InstantRefunded
    );
}

#[test]
fn test_instant_refund_without_consent_fails_after_deadline() {
    let h = Harness::default();
    let (_, hash) = secret_pair(1);
    let timelock = START + 3;
    let id = h.engine.initiate(h.request(hash, 40, timelock)).unwrap().swap_id;
    h.clock.set(timelock + 50);

    let outsider = KeyPair::from_seed(&[0x33; 32]);
    for signer in [&h.alice, &outsider] {
        let err = h
            .engine
            .instant_refund(&id, &sign_instant_refund(&id, signer))
            .unwrap_err();
        assert!(matches!(err, EscrowError::Authorization(_)));
    }
    assert_eq!(h.escrowed(), 40);
    assert_eq!(h.balance(&h.alice), 960);

    // The ordinary refund path is still open.
    h.engine.refund(&id).unwrap();
    assert_eq!(h.balance(&h.alice), 1_000);
}

#[test]
fn test_consent_is_bound_to_one_swap() {
    let h = Harness::default();
    let (_, hash) = secret_pair(1);
    let first = h.engine.initiate(h.request(hash, 10, START + 10)).unwrap().swap_id;
    let second = h.engine.initiate(h.request(hash, 11, START + 10)).unwrap().swap_id;

    let consent = sign_instant_refund(&first, &h.bob);
    assert!(matches!(
        h.engine.instant_refund(&second, &consent),
        Err(EscrowError::Authorization(_))
    ));
    h.engine.instant_refund(&first, &consent).unwrap();
}

// =========================================================================
// Closed swaps and funding
// =========================================================================

#[test]
fn test_second_settlement_is_not_found() {
    let h = Harness::default();
    let (secret, hash) = secret_pair(1);
    let id = h.engine.initiate(h.request(hash, 10, START + 2)).unwrap().swap_id;
    h.engine.redeem(&id, &secret).unwrap();

    let alice = h.balance(&h.alice);
    let bob = h.balance(&h.bob);

    h.clock.set(START + 10);
    assert_eq!(h.engine.redeem(&id, &secret), Err(EscrowError::NotFound(id)));
    assert_eq!(h.engine.refund(&id), Err(EscrowError::NotFound(id)));
    assert_eq!(
        h.engine.instant_refund(&id, &sign_instant_refund(&id, &h.bob)),
        Err(EscrowError::NotFound(id))
    );
    assert_eq!(h.balance(&h.alice), alice);
    assert_eq!(h.balance(&h.bob), bob);
}

#[test]
fn test_relayer_funds_swap() {
    let h = Harness::default();
    let relayer = KeyPair::from_seed(&[0x44; 32]);
    h.engine
        .store()
        .fund(&relayer.address(), &MINT, 50)
        .unwrap();

    let (_, hash) = secret_pair(1);
    let request = InitiateRequest::builder()
        .mint(MINT)
        .funder(relayer.address())
        .initiator(h.alice.address())
        .redeemer(h.bob.address())
        .secret_hash(hash)
        .amount(30)
        .timelock(START + 2)
        .build()
        .unwrap();
    let id = h.engine.initiate(request).unwrap().swap_id;

    assert_eq!(h.balance(&relayer), 20);
    assert_eq!(h.balance(&h.alice), 1_000);

    // Refunds go to the initiator, not the funder.
    h.clock.set(START + 2);
    h.engine.refund(&id).unwrap();
    assert_eq!(h.balance(&h.alice), 1_030);
    assert_eq!(h.balance(&relayer), 20);
}

#[test]
fn test_journal_records_lifecycle() {
    let h = Harness::default();
    let (secret, hash) = secret_pair(1);
    let id = h.engine.initiate(h.request(hash, 10, START + 2)).unwrap().swap_id;
    h.engine.redeem(&id, &secret).unwrap();

    let records = h.log.for_swap(&id);
    assert_eq!(records.len(), 2);
    assert!(records[0].sequence < records[1].sequence);
    assert!(matches!(records[0].event, SwapEvent::Initiated { amount: 10, .. }));
    match &records[1].event {
        SwapEvent::Redeemed { secret: revealed, redeemer, .. } => {
            assert_eq!(revealed, &secret);
            assert_eq!(redeemer, &h.bob.address());
        }
        other => panic!("unexpected event: {:?}", other),
    }

    let json = serde_json::to_value(&records[1]).unwrap();
    assert_eq!(json["event"]["type"], "redeemed");
}
