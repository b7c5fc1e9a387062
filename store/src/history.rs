//! Confirmed transaction history storage trait.

use crate::StoreError;
use corvid_types::{InputPoint, OutputPoint, PaymentAddress, TxPoint, MAX_HEIGHT, UNCONFIRMED_HEIGHT};
use serde::{Deserialize, Serialize};

/// One entry in an address's activity view: an output and, once consumed,
/// the spend that consumed it.
///
/// Sentinels: `spend == TxPoint::NULL` together with `spend_height ==
/// MAX_HEIGHT` means "not yet spent"; an `output_height` or `spend_height`
/// of zero marks activity that is still in the unconfirmed pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub output: OutputPoint,
    pub output_height: u64,
    pub value: u64,
    pub spend: InputPoint,
    pub spend_height: u64,
}

impl HistoryRow {
    /// A confirmed, not-yet-spent output.
    pub fn unspent(output: OutputPoint, output_height: u64, value: u64) -> Self {
        Self {
            output,
            output_height,
            value,
            spend: TxPoint::NULL,
            spend_height: MAX_HEIGHT,
        }
    }

    /// Whether a spend has been attached to this row.
    pub fn is_spent(&self) -> bool {
        !self.spend.is_null()
    }

    /// Whether the output itself has been confirmed at some height.
    pub fn is_confirmed(&self) -> bool {
        self.output_height != UNCONFIRMED_HEIGHT
    }
}

/// Trait for querying an address's confirmed transaction history.
///
/// Rows are returned oldest-first. An address with no history yields an
/// empty list, never an error.
pub trait HistoryStore: Send + Sync {
    /// Fetch all confirmed history rows for `address` whose output height is
    /// at least `from_height`.
    fn fetch_history(
        &self,
        address: &PaymentAddress,
        from_height: u64,
    ) -> Result<Vec<HistoryRow>, StoreError>;
}
