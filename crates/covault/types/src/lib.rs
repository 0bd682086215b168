//! Covault domain types.
//!
//! These are data definitions only: owner and transaction identities, the
//! transaction record itself, audit receipts, and the error taxonomy. The
//! lifecycle rules that gate mutation live in `covault-ledger`.

#![deny(unsafe_code)]

pub mod error;
pub mod id;
pub mod journal;
pub mod transaction;

pub use error::{VaultError, VaultResult};
pub use id::{Amount, Destination, OwnerId, TransactionId};
pub use journal::{ReceiptJournal, ReceiptKind, VaultReceipt};
pub use transaction::Transaction;
