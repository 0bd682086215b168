//! Pluggable disbursement collaborator.
//!
//! The engine treats value transfer as an opaque capability: either the
//! transfer happens or the collaborator reports failure, with no partial
//! outcomes. Implementations map executed transactions to external rails.

use async_trait::async_trait;
use covault_types::{Amount, Destination};
use thiserror::Error;
use tokio::sync::Mutex;

/// Failure reported by a disbursement rail.
#[derive(Debug, Error)]
pub enum DisburseError {
    /// The rail refused the transfer (e.g. insufficient custodied funds).
    #[error("disbursement rejected: {0}")]
    Rejected(String),

    /// The rail could not be reached or did not answer in time.
    #[error("disbursement rail unavailable: {0}")]
    Unavailable(String),
}

/// One-shot, atomic value transfer capability.
#[async_trait]
pub trait Disburser: Send + Sync {
    async fn disburse(
        &self,
        destination: &Destination,
        amount: Amount,
        payload: &[u8],
    ) -> Result<(), DisburseError>;
}

/// A completed payout, kept for inspection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payout {
    pub destination: Destination,
    pub amount: Amount,
}

/// In-memory treasury: holds a funded balance and pays out of it.
///
/// This is the reference collaborator used in tests and demos. It refuses
/// disbursements that exceed the custodied balance, so quorum approval alone
/// never conjures value the vault does not hold.
#[derive(Debug, Default)]
pub struct InMemoryTreasury {
    state: Mutex<TreasuryState>,
}

#[derive(Debug, Default)]
struct TreasuryState {
    balance: Amount,
    payouts: Vec<Payout>,
}

impl InMemoryTreasury {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the treasury already funded.
    pub fn with_balance(balance: Amount) -> Self {
        Self {
            state: Mutex::new(TreasuryState {
                balance,
                payouts: Vec::new(),
            }),
        }
    }

    /// Fund the treasury.
    pub async fn deposit(&self, amount: Amount) {
        let mut state = self.state.lock().await;
        state.balance = state.balance.saturating_add(amount);
    }

    pub async fn balance(&self) -> Amount {
        self.state.lock().await.balance
    }

    /// Every payout this treasury has made, in order.
    pub async fn payouts(&self) -> Vec<Payout> {
        self.state.lock().await.payouts.clone()
    }
}

#[async_trait]
impl Disburser for InMemoryTreasury {
    async fn disburse(
        &self,
        destination: &Destination,
        amount: Amount,
        _payload: &[u8],
    ) -> Result<(), DisburseError> {
        let mut state = self.state.lock().await;
        if state.balance < amount {
            return Err(DisburseError::Rejected(format!(
                "insufficient funds: balance {} < amount {}",
                state.balance, amount
            )));
        }
        state.balance = state.balance.saturating_sub(amount);
        state.payouts.push(Payout {
            destination: destination.clone(),
            amount,
        });
        Ok(())
    }
}
