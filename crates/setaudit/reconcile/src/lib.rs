//! Reconciliation of live selection sets against the audit ledger.
//!
//! A pass reads the full live snapshot and the full ledger snapshot, plans
//! every row change in memory, then applies the plan. Operator decisions
//! (`IgnoreFlag`, `IgnoreReason`) are read but never written.
//!
//! ## Example
//!
//! ```rust
//! use setaudit_ledger::LedgerStore;
//! use setaudit_reconcile::Reconciler;
//! use setaudit_types::{LiveGrouping, SystemClock};
//!
//! let live = vec![LiveGrouping::new(
//!     "3f2504e0-4f89-11d3-9a0c-0305e82c3301-000a1b2c",
//!     "Kitchen",
//!     vec![101, 102, 103],
//! )];
//!
//! let outcome = Reconciler::new(SystemClock).reconcile(&live, &LedgerStore::new());
//! assert_eq!(outcome.report.valid, 1);
//! ```

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod classify;
mod engine;
mod report;

pub use classify::{classify, Classification};
pub use engine::{reconcile, PlannedOp, ReconcileOutcome, ReconcilePlan, Reconciler};
pub use report::ReconcileReport;
