//! Audit receipts for custody operations.
//!
//! Every accepted state transition produces a receipt. The journal is
//! append-only; revoking a confirmation adds a receipt rather than erasing
//! the one it undoes, so the full history of who stood behind a transaction
//! stays reconstructible.

use crate::id::{OwnerId, TransactionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of transition a receipt records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptKind {
    Submitted,
    Confirmed,
    Revoked,
    Executed,
    DisbursementFailed,
}

/// One audit fact: who did what to which transaction, and when.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VaultReceipt {
    pub kind: ReceiptKind,
    /// The owner whose action produced this receipt
    pub actor: OwnerId,
    pub transaction: TransactionId,
    /// Human-readable summary
    pub detail: String,
    pub recorded_at: DateTime<Utc>,
}

impl VaultReceipt {
    pub fn new(
        kind: ReceiptKind,
        actor: OwnerId,
        transaction: TransactionId,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            actor,
            transaction,
            detail: detail.into(),
            recorded_at: Utc::now(),
        }
    }
}

/// Append-only receipt log for one ledger.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReceiptJournal {
    receipts: Vec<VaultReceipt>,
}

impl ReceiptJournal {
    pub fn new() -> Self {
        Self {
            receipts: Vec::new(),
        }
    }

    pub fn record(&mut self, receipt: VaultReceipt) {
        self.receipts.push(receipt);
    }

    pub fn receipts(&self) -> &[VaultReceipt] {
        &self.receipts
    }

    /// All receipts touching one transaction, in recording order.
    pub fn for_transaction(&self, id: TransactionId) -> Vec<&VaultReceipt> {
        self.receipts
            .iter()
            .filter(|receipt| receipt.transaction == id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }
}
