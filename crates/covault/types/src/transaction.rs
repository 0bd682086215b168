//! The transaction record: a proposed disbursement and its confirmation state.
//!
//! Records are append-only audit facts. They are created by submission, gain
//! and lose confirmations while pending, become executed exactly once, and
//! are never deleted.

use crate::id::{Amount, Destination, OwnerId, TransactionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A proposed disbursement of custodied value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sequence number, equal to the record's position in submission order
    pub id: TransactionId,
    /// Recipient of the disbursement
    pub destination: Destination,
    /// Value to disburse
    pub amount: Amount,
    /// Opaque bytes forwarded to the disbursement collaborator
    pub payload: Vec<u8>,
    /// Set exactly once, never reverts to false
    pub executed: bool,
    /// Owners currently standing behind the transaction
    pub confirmations: BTreeSet<OwnerId>,
    /// Which owner proposed it
    pub submitted_by: OwnerId,
    /// When it was proposed
    pub submitted_at: DateTime<Utc>,
    /// When it was executed, if it has been
    pub executed_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Create a fresh pending record. The submitter is NOT auto-confirmed;
    /// submission and confirmation are independent acts.
    pub fn new(
        id: TransactionId,
        destination: Destination,
        amount: Amount,
        payload: Vec<u8>,
        submitted_by: OwnerId,
    ) -> Self {
        Self {
            id,
            destination,
            amount,
            payload,
            executed: false,
            confirmations: BTreeSet::new(),
            submitted_by,
            submitted_at: Utc::now(),
            executed_at: None,
        }
    }

    pub fn confirmation_count(&self) -> usize {
        self.confirmations.len()
    }

    pub fn is_confirmed_by(&self, owner: &OwnerId) -> bool {
        self.confirmations.contains(owner)
    }

    /// Record an owner's confirmation. Returns false if it was already present.
    pub fn record_confirmation(&mut self, owner: OwnerId) -> bool {
        self.confirmations.insert(owner)
    }

    /// Remove an owner's confirmation. Returns false if it was not present.
    pub fn clear_confirmation(&mut self, owner: &OwnerId) -> bool {
        self.confirmations.remove(owner)
    }

    /// Flip the record into its terminal executed state.
    pub fn mark_executed(&mut self) {
        self.executed = true;
        self.executed_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction::new(
            TransactionId::new(0),
            Destination::new("recipient"),
            Amount::new(400),
            vec![],
            OwnerId::new("owner-1"),
        )
    }

    #[test]
    fn starts_pending_and_unconfirmed() {
        let tx = sample();
        assert!(!tx.executed);
        assert_eq!(tx.confirmation_count(), 0);
        assert!(!tx.is_confirmed_by(&OwnerId::new("owner-1")));
    }

    #[test]
    fn confirmation_set_has_set_semantics() {
        let mut tx = sample();
        assert!(tx.record_confirmation(OwnerId::new("owner-1")));
        assert!(!tx.record_confirmation(OwnerId::new("owner-1")));
        assert_eq!(tx.confirmation_count(), 1);

        assert!(tx.clear_confirmation(&OwnerId::new("owner-1")));
        assert!(!tx.clear_confirmation(&OwnerId::new("owner-1")));
        assert_eq!(tx.confirmation_count(), 0);
    }

    #[test]
    fn mark_executed_stamps_the_record() {
        let mut tx = sample();
        tx.mark_executed();
        assert!(tx.executed);
        assert!(tx.executed_at.is_some());
    }
}
