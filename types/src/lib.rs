//! Fundamental types for the corvid node.
//!
//! This crate defines the core value types shared across every other crate in
//! the workspace: transaction hashes, payment addresses, scripts, transaction
//! points, and the transaction structure itself.

pub mod address;
pub mod hash;
pub mod point;
pub mod script;
pub mod transaction;

pub use address::PaymentAddress;
pub use hash::TxHash;
pub use point::{InputPoint, OutputPoint, TxPoint};
pub use script::Script;
pub use transaction::{Transaction, TxInput, TxOutput};

/// Sentinel height meaning "not yet confirmed" (for a spend) or
/// "no confirmation recorded".
pub const MAX_HEIGHT: u64 = u64::MAX;

/// Height recorded for entries that live only in the unconfirmed pool.
pub const UNCONFIRMED_HEIGHT: u64 = 0;
