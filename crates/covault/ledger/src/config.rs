//! Service configuration.

use covault_types::OwnerId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_DISBURSE_TIMEOUT_SECS: u64 = 30;

/// Construction-time configuration for a custody service.
///
/// The owner set and quorum are immutable for the service's lifetime; there
/// is no reconfiguration path.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub owners: Vec<OwnerId>,
    pub quorum: usize,
    /// Upper bound on a single disbursement attempt. Expiry is treated as
    /// disbursement failure.
    #[serde(default = "default_disburse_timeout_secs")]
    pub disburse_timeout_secs: u64,
}

fn default_disburse_timeout_secs() -> u64 {
    DEFAULT_DISBURSE_TIMEOUT_SECS
}

impl LedgerConfig {
    pub fn new(owners: Vec<OwnerId>, quorum: usize) -> Self {
        Self {
            owners,
            quorum,
            disburse_timeout_secs: DEFAULT_DISBURSE_TIMEOUT_SECS,
        }
    }

    pub fn with_disburse_timeout(mut self, timeout: Duration) -> Self {
        self.disburse_timeout_secs = timeout.as_secs();
        self
    }

    pub fn disburse_timeout(&self) -> Duration {
        Duration::from_secs(self.disburse_timeout_secs)
    }
}
