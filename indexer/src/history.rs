//! Combined confirmed + unconfirmed address history.
//!
//! Confirmed rows come from the history store; unconfirmed activity comes
//! from the [`TransactionIndexer`]. The merge appends unconfirmed outputs as
//! fresh rows first, then attaches unconfirmed spends to the rows they
//! consume. A spend record only carries its previous output's coordinates,
//! so that output must already be present as a row.

use crate::error::HistoryError;
use crate::indexer::{AddressActivity, TransactionIndexer};
use corvid_store::{HistoryRow, HistoryStore};
use corvid_types::{PaymentAddress, TxPoint, MAX_HEIGHT, UNCONFIRMED_HEIGHT};

/// Fetch an address's full activity view: confirmed history rows at or
/// above `from_height`, merged with the current unconfirmed index.
///
/// Confirmed rows come first, then one row per unconfirmed output, in
/// insertion order; no sort is imposed. A store failure is propagated
/// without consulting the indexer.
pub async fn fetch_combined_history<S: HistoryStore>(
    store: &S,
    indexer: &TransactionIndexer,
    address: &PaymentAddress,
    from_height: u64,
) -> Result<Vec<HistoryRow>, HistoryError> {
    let mut rows = store.fetch_history(address, from_height)?;
    let activity = indexer.query(address).await?;
    tracing::debug!(
        %address,
        confirmed = rows.len(),
        outputs = activity.outputs.len(),
        spends = activity.spends.len(),
        "merging unconfirmed activity into history"
    );
    merge_unconfirmed(&mut rows, &activity)?;
    Ok(rows)
}

/// Merge unconfirmed activity into `rows` in place: outputs first, then
/// spends.
fn merge_unconfirmed(
    rows: &mut Vec<HistoryRow>,
    activity: &AddressActivity,
) -> Result<(), HistoryError> {
    for output in &activity.outputs {
        // An unconfirmed output coinciding with a confirmed row means the
        // pool and the store have drifted apart. Fatal in debug builds,
        // logged and tolerated in release.
        if rows.iter().any(|row| row.output == output.point) {
            debug_assert!(
                false,
                "unconfirmed output {} already present in confirmed history",
                output.point
            );
            tracing::warn!(
                point = %output.point,
                "unconfirmed output already present in confirmed history"
            );
        }
        rows.push(HistoryRow {
            output: output.point,
            output_height: UNCONFIRMED_HEIGHT,
            value: output.value,
            spend: TxPoint::NULL,
            spend_height: MAX_HEIGHT,
        });
    }
    for spend in &activity.spends {
        let row = rows
            .iter_mut()
            .find(|row| row.output == spend.previous_output)
            .ok_or(HistoryError::SpendTargetMissing {
                spend: spend.point,
                previous_output: spend.previous_output,
            })?;
        if row.is_spent() || row.spend_height != MAX_HEIGHT {
            return Err(HistoryError::SpendTargetAlreadySpent {
                spend: spend.point,
                previous_output: spend.previous_output,
            });
        }
        row.spend = spend.point;
        row.spend_height = UNCONFIRMED_HEIGHT;
    }
    Ok(())
}
