//! Covault transaction ledger.
//!
//! This crate enforces the custody lifecycle: owners submit disbursement
//! proposals, confirm or revoke their assent while a proposal is pending,
//! and execute once a quorum of distinct confirmations is standing. Every
//! transition is authorized against the owner registry, logged, and
//! receipted; execution invokes a pluggable disbursement collaborator and is
//! guarded against reentrancy by marking the record executed before the
//! external call.

#![deny(unsafe_code)]

pub mod config;
pub mod disburse;
pub mod ledger;
pub mod service;
pub mod snapshot;

pub use config::LedgerConfig;
pub use disburse::{DisburseError, Disburser, InMemoryTreasury, Payout};
pub use ledger::TransactionLedger;
pub use service::CustodyService;
pub use snapshot::LedgerSnapshot;
