//! End-to-end custody flows over the shared service, mirroring how a funded
//! multi-owner vault is actually operated: fund, propose, gather
//! confirmations, execute, audit.

use covault_ledger::{CustodyService, InMemoryTreasury, LedgerConfig, TransactionLedger};
use covault_types::{Amount, Destination, OwnerId, VaultError};
use std::sync::Arc;
use std::time::Duration;

fn owner(name: &str) -> OwnerId {
    OwnerId::new(name)
}

fn two_of_three() -> LedgerConfig {
    LedgerConfig::new(
        vec![owner("owner-1"), owner("owner-2"), owner("owner-3")],
        2,
    )
}

#[tokio::test]
async fn requires_confirmations_before_execution() {
    let treasury = Arc::new(InMemoryTreasury::with_balance(Amount::new(1_000)));
    let service = CustodyService::new(two_of_three(), treasury.clone()).unwrap();

    let id = service
        .submit(
            &owner("owner-1"),
            Destination::new("recipient"),
            Amount::new(400),
            vec![],
        )
        .await
        .unwrap();
    assert_eq!(id.0, 0);

    service.confirm(&owner("owner-1"), id).await.unwrap();

    // One confirmation is not quorum.
    let early = service.execute(&owner("owner-1"), id).await;
    assert!(matches!(
        early,
        Err(VaultError::InsufficientConfirmations { .. })
    ));

    service.confirm(&owner("owner-2"), id).await.unwrap();
    service.execute(&owner("owner-1"), id).await.unwrap();

    let payouts = treasury.payouts().await;
    assert_eq!(payouts.len(), 1);
    assert_eq!(payouts[0].destination, Destination::new("recipient"));
    assert_eq!(payouts[0].amount, Amount::new(400));
    assert_eq!(treasury.balance().await, Amount::new(600));

    // Cannot execute twice.
    let again = service.execute(&owner("owner-1"), id).await;
    assert!(matches!(again, Err(VaultError::AlreadyExecuted(_))));
    assert_eq!(treasury.payouts().await.len(), 1);
}

#[tokio::test]
async fn allows_revoke_and_reconfirm() {
    let treasury = Arc::new(InMemoryTreasury::with_balance(Amount::new(1_000)));
    let service = CustodyService::new(two_of_three(), treasury.clone()).unwrap();

    let id = service
        .submit(
            &owner("owner-1"),
            Destination::new("recipient"),
            Amount::new(200),
            vec![],
        )
        .await
        .unwrap();

    service.confirm(&owner("owner-1"), id).await.unwrap();
    service.revoke(&owner("owner-1"), id).await.unwrap();

    // Re-confirming after a revoke is allowed; net effect is one confirmation.
    service.confirm(&owner("owner-1"), id).await.unwrap();
    assert_eq!(
        service.transaction(id).await.unwrap().confirmation_count(),
        1
    );

    // Still short of quorum.
    let result = service.execute(&owner("owner-1"), id).await;
    assert!(matches!(
        result,
        Err(VaultError::InsufficientConfirmations { .. })
    ));
    assert!(treasury.payouts().await.is_empty());
}

#[tokio::test]
async fn rejects_non_owners_without_state_change() {
    let treasury = Arc::new(InMemoryTreasury::with_balance(Amount::new(1_000)));
    let service = CustodyService::new(two_of_three(), treasury).unwrap();

    let result = service
        .submit(
            &owner("outsider"),
            Destination::new("recipient"),
            Amount::zero(),
            vec![],
        )
        .await;
    assert!(matches!(result, Err(VaultError::NotAuthorized(_))));
    assert_eq!(service.transaction_count().await, 0);

    // The same caller is rejected from every other operation too.
    let id = service
        .submit(
            &owner("owner-1"),
            Destination::new("recipient"),
            Amount::new(100),
            vec![],
        )
        .await
        .unwrap();
    assert!(matches!(
        service.confirm(&owner("outsider"), id).await,
        Err(VaultError::NotAuthorized(_))
    ));
    assert!(matches!(
        service.revoke(&owner("outsider"), id).await,
        Err(VaultError::NotAuthorized(_))
    ));
    assert!(matches!(
        service.execute(&owner("outsider"), id).await,
        Err(VaultError::NotAuthorized(_))
    ));
    assert_eq!(
        service.transaction(id).await.unwrap().confirmation_count(),
        0
    );
}

#[tokio::test]
async fn ids_stay_sequential_across_mixed_outcomes() {
    let treasury = Arc::new(InMemoryTreasury::with_balance(Amount::new(10_000)));
    let service = CustodyService::new(two_of_three(), treasury).unwrap();

    for expected in 0..4u64 {
        let id = service
            .submit(
                &owner("owner-2"),
                Destination::new("recipient"),
                Amount::new(10),
                vec![],
            )
            .await
            .unwrap();
        assert_eq!(id.0, expected);
    }
    assert_eq!(service.transaction_count().await, 4);
}

#[tokio::test]
async fn snapshot_survives_a_service_restart() {
    let treasury = Arc::new(InMemoryTreasury::with_balance(Amount::new(1_000)));
    let service = CustodyService::new(two_of_three(), treasury.clone()).unwrap();

    let id = service
        .submit(
            &owner("owner-1"),
            Destination::new("recipient"),
            Amount::new(400),
            vec![1, 2, 3],
        )
        .await
        .unwrap();
    service.confirm(&owner("owner-1"), id).await.unwrap();
    service.confirm(&owner("owner-2"), id).await.unwrap();

    // Persist, "restart", and pick up where we left off.
    let json = service.snapshot().await.to_json().unwrap();
    let restored = TransactionLedger::restore(
        covault_ledger::LedgerSnapshot::from_json(&json).unwrap(),
    )
    .unwrap();
    let revived = CustodyService::from_ledger(restored, treasury.clone(), Duration::from_secs(30));

    let tx = revived.transaction(id).await.unwrap();
    assert_eq!(tx.payload, vec![1, 2, 3]);
    assert_eq!(tx.confirmation_count(), 2);
    assert!(!tx.executed);

    revived.execute(&owner("owner-3"), id).await.unwrap();
    assert_eq!(treasury.payouts().await.len(), 1);
}

#[tokio::test]
async fn underfunded_vault_surfaces_disbursement_failure() {
    let treasury = Arc::new(InMemoryTreasury::with_balance(Amount::new(100)));
    let service = CustodyService::new(two_of_three(), treasury.clone()).unwrap();

    let id = service
        .submit(
            &owner("owner-1"),
            Destination::new("recipient"),
            Amount::new(400),
            vec![],
        )
        .await
        .unwrap();
    service.confirm(&owner("owner-1"), id).await.unwrap();
    service.confirm(&owner("owner-2"), id).await.unwrap();

    let result = service.execute(&owner("owner-1"), id).await;
    assert!(matches!(result, Err(VaultError::DisbursementFailed { .. })));

    // The record stays executed; a retry cannot double-spend once the vault
    // is topped up.
    treasury.deposit(Amount::new(1_000)).await;
    let retry = service.execute(&owner("owner-1"), id).await;
    assert!(matches!(retry, Err(VaultError::AlreadyExecuted(_))));
    assert!(treasury.payouts().await.is_empty());
}
