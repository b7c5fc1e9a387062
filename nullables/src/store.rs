//! Nullable history store: thread-safe in-memory storage for testing.

use corvid_store::{HistoryRow, HistoryStore, StoreError};
use corvid_types::PaymentAddress;
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory confirmed-history store for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullHistoryStore {
    rows: Mutex<HashMap<PaymentAddress, Vec<HistoryRow>>>,
    scripted_failure: Mutex<Option<StoreError>>,
}

impl NullHistoryStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            scripted_failure: Mutex::new(None),
        }
    }

    /// Seed a confirmed history row for an address.
    pub fn add_row(&self, address: &PaymentAddress, row: HistoryRow) {
        self.rows
            .lock()
            .unwrap()
            .entry(*address)
            .or_default()
            .push(row);
    }

    /// Script the next `fetch_history` call to fail with `error`.
    pub fn fail_next(&self, error: StoreError) {
        *self.scripted_failure.lock().unwrap() = Some(error);
    }
}

impl Default for NullHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for NullHistoryStore {
    fn fetch_history(
        &self,
        address: &PaymentAddress,
        from_height: u64,
    ) -> Result<Vec<HistoryRow>, StoreError> {
        if let Some(error) = self.scripted_failure.lock().unwrap().take() {
            return Err(error);
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(address)
            .map(|rows| {
                rows.iter()
                    .filter(|row| row.output_height >= from_height)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
