//! Shared custody service: the serialization boundary around one ledger.
//!
//! Each public operation takes the coarse lock, runs to completion, and
//! releases it; no two operations interleave their reads and writes of the
//! same record. Fine-grained per-transaction locking is deliberately absent:
//! `execute` must see `confirmations` and `executed` as one consistent
//! snapshot.

use crate::config::LedgerConfig;
use crate::disburse::{DisburseError, Disburser};
use crate::ledger::TransactionLedger;
use crate::snapshot::LedgerSnapshot;
use async_trait::async_trait;
use covault_registry::OwnerRegistry;
use covault_types::{
    Amount, Destination, OwnerId, Transaction, TransactionId, VaultReceipt, VaultResult,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Thread-safe handle to one ledger plus its disbursement rail.
#[derive(Clone)]
pub struct CustodyService {
    ledger: Arc<Mutex<TransactionLedger>>,
    disburser: Arc<dyn Disburser>,
    disburse_timeout: Duration,
}

impl CustodyService {
    /// Build a service from configuration. Fails with `InvalidConfiguration`
    /// if the owner set or quorum is unusable.
    pub fn new(config: LedgerConfig, disburser: Arc<dyn Disburser>) -> VaultResult<Self> {
        let registry = OwnerRegistry::new(config.owners.clone(), config.quorum)?;
        Ok(Self {
            ledger: Arc::new(Mutex::new(TransactionLedger::new(registry))),
            disburser,
            disburse_timeout: config.disburse_timeout(),
        })
    }

    /// Wrap an existing ledger (e.g. one restored from a snapshot).
    pub fn from_ledger(
        ledger: TransactionLedger,
        disburser: Arc<dyn Disburser>,
        disburse_timeout: Duration,
    ) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
            disburser,
            disburse_timeout,
        }
    }

    pub async fn submit(
        &self,
        caller: &OwnerId,
        destination: Destination,
        amount: Amount,
        payload: Vec<u8>,
    ) -> VaultResult<TransactionId> {
        self.ledger
            .lock()
            .await
            .submit(caller, destination, amount, payload)
    }

    pub async fn confirm(&self, caller: &OwnerId, id: TransactionId) -> VaultResult<()> {
        self.ledger.lock().await.confirm(caller, id)
    }

    pub async fn revoke(&self, caller: &OwnerId, id: TransactionId) -> VaultResult<()> {
        self.ledger.lock().await.revoke(caller, id)
    }

    /// Execute under the coarse lock, with the disbursement attempt bounded
    /// by the configured timeout.
    pub async fn execute(&self, caller: &OwnerId, id: TransactionId) -> VaultResult<()> {
        let timed = TimedDisburser {
            inner: Arc::clone(&self.disburser),
            timeout: self.disburse_timeout,
        };
        self.ledger.lock().await.execute(caller, id, &timed).await
    }

    // --- Read path ---

    pub async fn transaction(&self, id: TransactionId) -> Option<Transaction> {
        self.ledger.lock().await.transaction(id).cloned()
    }

    pub async fn transactions(&self) -> Vec<Transaction> {
        self.ledger.lock().await.transactions().to_vec()
    }

    pub async fn transaction_count(&self) -> usize {
        self.ledger.lock().await.len()
    }

    pub async fn owners(&self) -> Vec<OwnerId> {
        self.ledger
            .lock()
            .await
            .registry()
            .owners()
            .iter()
            .cloned()
            .collect()
    }

    pub async fn quorum(&self) -> usize {
        self.ledger.lock().await.registry().quorum()
    }

    pub async fn is_owner(&self, principal: &OwnerId) -> bool {
        self.ledger.lock().await.registry().is_owner(principal)
    }

    pub async fn receipts(&self) -> Vec<VaultReceipt> {
        self.ledger.lock().await.journal().receipts().to_vec()
    }

    pub async fn snapshot(&self) -> LedgerSnapshot {
        self.ledger.lock().await.snapshot()
    }
}

/// Bounds a disbursement attempt; expiry reads as rail failure.
struct TimedDisburser {
    inner: Arc<dyn Disburser>,
    timeout: Duration,
}

#[async_trait]
impl Disburser for TimedDisburser {
    async fn disburse(
        &self,
        destination: &Destination,
        amount: Amount,
        payload: &[u8],
    ) -> Result<(), DisburseError> {
        match tokio::time::timeout(self.timeout, self.inner.disburse(destination, amount, payload))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(DisburseError::Unavailable(format!(
                "no answer within {:?}",
                self.timeout
            ))),
        }
    }
}
