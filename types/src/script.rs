//! Opaque locking-script bytes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw locking script, carried on every transaction input and output.
///
/// The script is opaque to the index machinery; address extraction is the
/// only interpretation performed, and that lives behind the
/// `AddressExtractor` trait in the indexer crate.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Script(Vec<u8>);

impl Script {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({} bytes)", self.0.len())
    }
}
