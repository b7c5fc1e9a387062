//! Transaction points: (hash, slot) coordinates of inputs and outputs.

use crate::TxHash;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A (transaction hash, slot index) pair locating one input or output.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TxPoint {
    pub hash: TxHash,
    pub index: u32,
}

/// A point naming a transaction output.
pub type OutputPoint = TxPoint;
/// A point naming a transaction input.
pub type InputPoint = TxPoint;

impl TxPoint {
    /// Sentinel point meaning "no spend": zero hash, maximum index.
    pub const NULL: Self = Self {
        hash: TxHash::ZERO,
        index: u32::MAX,
    };

    pub fn new(hash: TxHash, index: u32) -> Self {
        Self { hash, index }
    }

    /// Whether this is the "no spend" sentinel.
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }
}

impl fmt::Debug for TxPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "TxPoint(null)")
        } else {
            write!(f, "TxPoint({:?}:{})", self.hash, self.index)
        }
    }
}

impl fmt::Display for TxPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hash, self.index)
    }
}
