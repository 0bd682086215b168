use crate::id::{OwnerId, TransactionId};
use thiserror::Error;

/// Errors from the custody engine.
///
/// Every operation reports its failure synchronously through one of these
/// variants; nothing is swallowed and nothing is retried by the engine
/// itself.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Construction-time failure: the engine cannot start.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("caller {0} is not an owner")]
    NotAuthorized(OwnerId),

    #[error("transaction not found: {0}")]
    NotFound(TransactionId),

    #[error("{0} has already executed")]
    AlreadyExecuted(TransactionId),

    #[error("owner {owner} has already confirmed {transaction}")]
    AlreadyConfirmed {
        owner: OwnerId,
        transaction: TransactionId,
    },

    #[error("owner {owner} has not confirmed {transaction}")]
    NotConfirmed {
        owner: OwnerId,
        transaction: TransactionId,
    },

    #[error("{transaction} has {confirmed} of {required} required confirmations")]
    InsufficientConfirmations {
        transaction: TransactionId,
        confirmed: usize,
        required: usize,
    },

    /// The external disbursement collaborator reported failure or timed out.
    /// The transaction stays executed; remediation is off-band.
    #[error("disbursement failed for {transaction}: {reason}")]
    DisbursementFailed {
        transaction: TransactionId,
        reason: String,
    },

    /// A persisted snapshot failed integrity verification on restore.
    #[error("snapshot integrity error: {0}")]
    Snapshot(String),
}

pub type VaultResult<T> = Result<T, VaultError>;
