//! Durable, human-editable audit ledger for selection sets.
//!
//! The ledger is a table of one row per grouping identity, persisted as a
//! delimited text file. This crate provides:
//! - [`LedgerStore`]: the in-memory table with upsert/remove/snapshot access
//! - deterministic CSV save (core columns first, extensions alphabetical,
//!   rows ordered by set name)
//! - schema detection and migration of the legacy `Key`-based format
//! - [`GuardedLedger`]: a view that keeps retired legacy columns out of the ledger
//!
//! Invalid identities are filtered, never reported as errors. Only write
//! failures during save surface to callers.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod error;
pub mod guard;
mod persist;
mod row;
pub mod schema;
mod store;

pub use error::{LedgerError, LedgerResult};
pub use guard::{is_banned_column, GuardedLedger, BANNED_HEADERS};
pub use persist::read_headers_or_defaults;
pub use row::LedgerRow;
pub use schema::LedgerSchema;
pub use store::LedgerStore;

pub use setaudit_types::columns;
