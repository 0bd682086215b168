//! Transaction Ledger - the custody lifecycle engine.
//!
//! The ledger owns the ordered collection of transaction records and gates
//! every transition through the owner registry. Operations assume exclusive
//! access for their full duration; `CustodyService` provides that boundary
//! on multi-threaded runtimes.

use crate::disburse::Disburser;
use covault_registry::OwnerRegistry;
use covault_types::{
    Amount, Destination, OwnerId, ReceiptJournal, ReceiptKind, Transaction, TransactionId,
    VaultError, VaultReceipt, VaultResult,
};
use tracing::{debug, info, warn};

/// The ordered transaction collection plus its authorization boundary.
pub struct TransactionLedger {
    pub(crate) registry: OwnerRegistry,
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) journal: ReceiptJournal,
}

impl TransactionLedger {
    pub fn new(registry: OwnerRegistry) -> Self {
        Self {
            registry,
            transactions: Vec::new(),
            journal: ReceiptJournal::new(),
        }
    }

    /// Propose a disbursement. Only owners may submit; the submitter is not
    /// auto-confirmed. Returns the assigned sequence id.
    pub fn submit(
        &mut self,
        caller: &OwnerId,
        destination: Destination,
        amount: Amount,
        payload: Vec<u8>,
    ) -> VaultResult<TransactionId> {
        self.registry.authorize(caller)?;

        let id = TransactionId::new(self.transactions.len() as u64);
        let transaction = Transaction::new(id, destination, amount, payload, caller.clone());

        info!(
            transaction = %id,
            submitter = %caller,
            destination = %transaction.destination,
            amount = %amount,
            "Transaction submitted"
        );

        self.journal.record(VaultReceipt::new(
            ReceiptKind::Submitted,
            caller.clone(),
            id,
            format!("proposed {} to {}", amount, transaction.destination),
        ));

        self.transactions.push(transaction);
        Ok(id)
    }

    /// Record the caller's confirmation on a pending transaction.
    ///
    /// Re-confirming without an intervening revoke is rejected with
    /// `AlreadyConfirmed`, not silently ignored.
    pub fn confirm(&mut self, caller: &OwnerId, id: TransactionId) -> VaultResult<()> {
        self.registry.authorize(caller)?;

        let quorum = self.registry.quorum();
        let transaction = self
            .transactions
            .get_mut(id.index())
            .ok_or(VaultError::NotFound(id))?;

        if transaction.executed {
            return Err(VaultError::AlreadyExecuted(id));
        }
        if !transaction.record_confirmation(caller.clone()) {
            return Err(VaultError::AlreadyConfirmed {
                owner: caller.clone(),
                transaction: id,
            });
        }

        let confirmed = transaction.confirmation_count();
        debug!(
            transaction = %id,
            owner = %caller,
            confirmations = confirmed,
            "Confirmation recorded"
        );
        if confirmed >= quorum {
            info!(transaction = %id, confirmations = confirmed, quorum, "Quorum met");
        }

        self.journal.record(VaultReceipt::new(
            ReceiptKind::Confirmed,
            caller.clone(),
            id,
            format!("confirmation {confirmed} of {quorum} required"),
        ));

        Ok(())
    }

    /// Withdraw the caller's confirmation.
    ///
    /// Permitted even after execution: the disbursement is done, but the
    /// audit answer to "who stands behind this transaction" stays honest.
    pub fn revoke(&mut self, caller: &OwnerId, id: TransactionId) -> VaultResult<()> {
        self.registry.authorize(caller)?;

        let transaction = self
            .transactions
            .get_mut(id.index())
            .ok_or(VaultError::NotFound(id))?;

        if !transaction.clear_confirmation(caller) {
            return Err(VaultError::NotConfirmed {
                owner: caller.clone(),
                transaction: id,
            });
        }

        if transaction.executed {
            warn!(
                transaction = %id,
                owner = %caller,
                "Confirmation revoked after execution; completed disbursement is unaffected"
            );
        } else {
            debug!(
                transaction = %id,
                owner = %caller,
                confirmations = transaction.confirmation_count(),
                "Confirmation revoked"
            );
        }

        self.journal.record(VaultReceipt::new(
            ReceiptKind::Revoked,
            caller.clone(),
            id,
            "confirmation withdrawn",
        ));

        Ok(())
    }

    /// Execute a transaction that has reached quorum, disbursing through the
    /// given collaborator. Any owner may trigger execution; the executor need
    /// not be a confirmer.
    ///
    /// The record is marked executed strictly before the external call, so a
    /// reentrant `execute` for the same id observes `AlreadyExecuted` and can
    /// never cause a second payout. For the same reason the mark is NOT
    /// rolled back when disbursement fails; the failure surfaces as
    /// `DisbursementFailed` for off-band remediation.
    pub async fn execute(
        &mut self,
        caller: &OwnerId,
        id: TransactionId,
        disburser: &dyn Disburser,
    ) -> VaultResult<()> {
        self.registry.authorize(caller)?;

        let quorum = self.registry.quorum();
        let transaction = self
            .transactions
            .get_mut(id.index())
            .ok_or(VaultError::NotFound(id))?;

        if transaction.executed {
            return Err(VaultError::AlreadyExecuted(id));
        }
        let confirmed = transaction.confirmation_count();
        if !self.registry.quorum_satisfied(confirmed) {
            return Err(VaultError::InsufficientConfirmations {
                transaction: id,
                confirmed,
                required: quorum,
            });
        }

        transaction.mark_executed();
        let destination = transaction.destination.clone();
        let amount = transaction.amount;
        let payload = transaction.payload.clone();

        info!(
            transaction = %id,
            executor = %caller,
            destination = %destination,
            amount = %amount,
            confirmations = confirmed,
            "Transaction executed; disbursing"
        );
        self.journal.record(VaultReceipt::new(
            ReceiptKind::Executed,
            caller.clone(),
            id,
            format!("executed with {confirmed} confirmations"),
        ));

        match disburser.disburse(&destination, amount, &payload).await {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!(
                    transaction = %id,
                    destination = %destination,
                    amount = %amount,
                    error = %err,
                    "Disbursement failed; transaction stays executed"
                );
                self.journal.record(VaultReceipt::new(
                    ReceiptKind::DisbursementFailed,
                    caller.clone(),
                    id,
                    err.to_string(),
                ));
                Err(VaultError::DisbursementFailed {
                    transaction: id,
                    reason: err.to_string(),
                })
            }
        }
    }

    // --- Query methods ---

    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.get(id.index())
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn registry(&self) -> &OwnerRegistry {
        &self.registry
    }

    pub fn journal(&self) -> &ReceiptJournal {
        &self.journal
    }

    /// Transactions still awaiting execution.
    pub fn pending(&self) -> Vec<&Transaction> {
        self.transactions.iter().filter(|tx| !tx.executed).collect()
    }

    /// Transactions already disbursed (or marked so after a failed attempt).
    pub fn executed(&self) -> Vec<&Transaction> {
        self.transactions.iter().filter(|tx| tx.executed).collect()
    }
}
