//! Payment address type, the key for all per-address indexes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A payment address derived from a locking script.
///
/// Opaque 20-byte payload (a hash of the script's public key material).
/// Equality and hashing are total and stable, which the address-keyed
/// multimaps in the indexer rely on.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaymentAddress([u8; 20]);

impl PaymentAddress {
    pub fn new(payload: [u8; 20]) -> Self {
        Self(payload)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Debug for PaymentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PaymentAddress({})", crate::hash::hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for PaymentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::hash::hex::encode(&self.0))
    }
}
