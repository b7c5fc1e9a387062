//! Abstract storage traits for the corvid node.
//!
//! Every storage backend (on-disk, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.

pub mod error;
pub mod history;

pub use error::StoreError;
pub use history::{HistoryRow, HistoryStore};
