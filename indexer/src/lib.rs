//! Unconfirmed transaction index and combined address history.
//!
//! The mempool's view of per-address activity: a serialized, address-keyed
//! index of not-yet-confirmed spends and outputs ([`TransactionIndexer`]),
//! plus the merge that stitches that view together with confirmed history
//! from a [`corvid_store::HistoryStore`] ([`fetch_combined_history`]).
//!
//! The indexer is an actor: one spawned task owns both index maps, all
//! operations travel to it as messages and execute in arrival order, so no
//! query ever observes a half-applied index or deindex.

pub mod error;
pub mod extract;
pub mod history;
pub mod indexer;

pub use error::{EntryKind, HistoryError, IndexError};
pub use extract::{AddressExtractor, StandardScripts};
pub use history::fetch_combined_history;
pub use indexer::{AddressActivity, OutputInfo, SpendInfo, TransactionIndexer};
