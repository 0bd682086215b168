//! Owner Registry - the authorization boundary of the vault.
//!
//! The registry holds the set of owners and the quorum threshold, fixed at
//! construction. It answers two questions and nothing else: is this
//! principal an owner, and does this confirmation count satisfy quorum.
//! Because it is immutable after construction it may be shared and read
//! concurrently without synchronization.

#![deny(unsafe_code)]

use covault_types::{OwnerId, VaultError, VaultResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Immutable owner set plus quorum threshold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRegistry {
    owners: BTreeSet<OwnerId>,
    quorum: usize,
}

impl OwnerRegistry {
    /// Validate and freeze the owner configuration.
    ///
    /// Fails with `InvalidConfiguration` if the owner list is empty, contains
    /// a duplicate, or the quorum falls outside `1..=owners.len()`.
    pub fn new(owners: impl IntoIterator<Item = OwnerId>, quorum: usize) -> VaultResult<Self> {
        let mut set = BTreeSet::new();
        for owner in owners {
            if !set.insert(owner.clone()) {
                return Err(VaultError::InvalidConfiguration(format!(
                    "duplicate owner: {owner}"
                )));
            }
        }

        if set.is_empty() {
            return Err(VaultError::InvalidConfiguration(
                "owner set is empty".to_string(),
            ));
        }
        if quorum < 1 || quorum > set.len() {
            return Err(VaultError::InvalidConfiguration(format!(
                "quorum {} outside 1..={}",
                quorum,
                set.len()
            )));
        }

        Ok(Self { owners: set, quorum })
    }

    /// Pure membership lookup.
    pub fn is_owner(&self, principal: &OwnerId) -> bool {
        self.owners.contains(principal)
    }

    /// Gate helper: `Ok` for owners, `NotAuthorized` for anyone else.
    pub fn authorize(&self, caller: &OwnerId) -> VaultResult<()> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(VaultError::NotAuthorized(caller.clone()))
        }
    }

    /// Does `count` distinct confirmations meet the threshold?
    pub fn quorum_satisfied(&self, count: usize) -> bool {
        count >= self.quorum
    }

    pub fn quorum(&self) -> usize {
        self.quorum
    }

    pub fn owners(&self) -> &BTreeSet<OwnerId> {
        &self.owners
    }

    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }
}
