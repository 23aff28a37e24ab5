//! Shared vocabulary for the selection set audit ledger.
//!
//! This crate provides:
//! - the live grouping snapshot observed from the host model
//! - the audit status state machine values and ambiguity notes
//! - ledger column names, canonical core order, and the identity validity predicate
//! - the injected clock used to stamp `AuditDate`

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod clock;
pub mod columns;
pub mod grouping;
pub mod status;

pub use clock::{format_audit_timestamp, parse_audit_timestamp, Clock, FixedClock, SystemClock};
pub use columns::{is_valid_id, CORE_COLUMNS, MIN_ID_LEN};
pub use grouping::LiveGrouping;
pub use status::{AmbiguityNote, AuditStatus, UnknownStatus};
