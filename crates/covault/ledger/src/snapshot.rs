//! Snapshot persistence for the ledger's observable state.
//!
//! A snapshot captures everything an external caller may query: the owner
//! set, the quorum, every transaction record, and the receipt journal.
//! Restoring re-verifies the structural invariants instead of trusting the
//! bytes, so a corrupted or hand-edited snapshot fails loudly rather than
//! loading into an inconsistent ledger.

use crate::ledger::TransactionLedger;
use covault_registry::OwnerRegistry;
use covault_types::{OwnerId, ReceiptJournal, Transaction, VaultError, VaultResult};
use serde::{Deserialize, Serialize};

/// Serialized form of one ledger.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub owners: Vec<OwnerId>,
    pub quorum: usize,
    pub transactions: Vec<Transaction>,
    pub journal: ReceiptJournal,
}

impl LedgerSnapshot {
    pub fn to_json(&self) -> VaultResult<String> {
        serde_json::to_string_pretty(self).map_err(|err| VaultError::Snapshot(err.to_string()))
    }

    pub fn from_json(json: &str) -> VaultResult<Self> {
        serde_json::from_str(json).map_err(|err| VaultError::Snapshot(err.to_string()))
    }
}

impl TransactionLedger {
    /// Capture the full observable state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            owners: self.registry.owners().iter().cloned().collect(),
            quorum: self.registry.quorum(),
            transactions: self.transactions.clone(),
            journal: self.journal.clone(),
        }
    }

    /// Rebuild a ledger from a snapshot, re-verifying invariants.
    ///
    /// Ids must be dense and in submission order, every confirmation must
    /// reference a registry owner, and executed records must carry their
    /// execution timestamp.
    pub fn restore(snapshot: LedgerSnapshot) -> VaultResult<Self> {
        let registry = OwnerRegistry::new(snapshot.owners, snapshot.quorum)?;

        for (position, transaction) in snapshot.transactions.iter().enumerate() {
            if transaction.id.index() != position {
                return Err(VaultError::Snapshot(format!(
                    "id gap at position {} (found {})",
                    position, transaction.id
                )));
            }
            for confirmer in &transaction.confirmations {
                if !registry.is_owner(confirmer) {
                    return Err(VaultError::Snapshot(format!(
                        "{} confirmed by non-owner {}",
                        transaction.id, confirmer
                    )));
                }
            }
            if transaction.executed && transaction.executed_at.is_none() {
                return Err(VaultError::Snapshot(format!(
                    "{} is executed but has no execution timestamp",
                    transaction.id
                )));
            }
            if !transaction.executed && transaction.executed_at.is_some() {
                return Err(VaultError::Snapshot(format!(
                    "{} is pending but carries an execution timestamp",
                    transaction.id
                )));
            }
        }

        Ok(Self {
            registry,
            transactions: snapshot.transactions,
            journal: snapshot.journal,
        })
    }
}
