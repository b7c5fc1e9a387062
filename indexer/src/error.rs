use corvid_store::StoreError;
use corvid_types::{OutputPoint, PaymentAddress, TxPoint};
use std::fmt;
use thiserror::Error;

/// Which of the two index maps an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Spend,
    Output,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Spend => write!(f, "spend"),
            EntryKind::Output => write!(f, "output"),
        }
    }
}

/// Errors from the transaction indexer.
///
/// `DuplicateEntry` and `MissingEntry` are invariant violations: they mean a
/// transaction was indexed twice, or deindexed without having been indexed.
/// They are not recoverable: once one is returned the index no longer
/// matches the pool it claims to describe, and callers must not retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("duplicate {kind} entry for address {address} at point {point}")]
    DuplicateEntry {
        kind: EntryKind,
        address: PaymentAddress,
        point: TxPoint,
    },

    #[error("no {kind} entry for address {address} at point {point}")]
    MissingEntry {
        kind: EntryKind,
        address: PaymentAddress,
        point: TxPoint,
    },

    #[error("indexer task has shut down")]
    Shutdown,
}

/// Errors from the combined-history fetch.
///
/// `Store` is an upstream failure and is the only recoverable variant. The
/// two spend variants are consistency violations between the unconfirmed
/// pool and the confirmed store; the merged view cannot be trusted and the
/// call must not be retried.
#[derive(Debug, Clone, Error)]
pub enum HistoryError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("index error: {0}")]
    Index(#[from] IndexError),

    #[error("unconfirmed spend {spend} references output {previous_output}, which is not in history")]
    SpendTargetMissing {
        spend: TxPoint,
        previous_output: OutputPoint,
    },

    #[error("unconfirmed spend {spend} references output {previous_output}, which is already spent")]
    SpendTargetAlreadySpent {
        spend: TxPoint,
        previous_output: OutputPoint,
    },
}
