//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies are abstracted behind traits; this crate provides
//! test-friendly implementations that return deterministic values, can be
//! controlled programmatically, and never touch the filesystem or network.
//!
//! Usage: swap real implementations for nullables in tests.

pub mod store;

pub use store::NullHistoryStore;
