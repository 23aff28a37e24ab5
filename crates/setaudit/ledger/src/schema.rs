//! Ledger schema detection and legacy migration.
//!
//! The schema is resolved once from the header row. Legacy rows are rewritten
//! into the current shape while decoding, so nothing downstream of load ever
//! sees the legacy layout.

use std::collections::BTreeMap;

use setaudit_hash::legacy_set_id;
use setaudit_types::columns::{AUDIT_DATE, AUDIT_STATUS, MEMBERS_HASH, SET_ID, SET_NAME};

use crate::guard::is_banned_column;

/// Legacy identity column, holding the set name.
pub const LEGACY_KEY: &str = "Key";
pub const LEGACY_CURRENT_HASH: &str = "CurrentHash";
pub const LEGACY_DATE: &str = "Date";
pub const LEGACY_STATUS: &str = "Status";
/// Dropped on every load, never migrated.
pub const LEGACY_EXPORT_DATE: &str = "Export Date";

// Legacy column -> current column, copied only when non-blank.
const LEGACY_FIELD_MAP: [(&str, &str); 3] = [
    (LEGACY_CURRENT_HASH, MEMBERS_HASH),
    (LEGACY_DATE, AUDIT_DATE),
    (LEGACY_STATUS, AUDIT_STATUS),
];

/// Layout of a persisted ledger file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerSchema {
    /// Pre-v2 layout identified by `Key` (set name) with no `SetId` column.
    Legacy,
    /// Current layout keyed by `SetId`.
    Current,
}

impl LedgerSchema {
    /// A file is legacy exactly when no header is named `SetId`.
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Self {
        if headers
            .iter()
            .any(|h| h.as_ref().trim().eq_ignore_ascii_case(SET_ID))
        {
            LedgerSchema::Current
        } else {
            LedgerSchema::Legacy
        }
    }

    /// Headers this schema contributes to the in-memory column set.
    pub(crate) fn retained_headers<'a>(&self, headers: &'a [String]) -> Vec<&'a str> {
        headers
            .iter()
            .map(|h| h.as_str())
            .filter(|h| !h.is_empty())
            .filter(|h| match self {
                LedgerSchema::Current => !h.eq_ignore_ascii_case(LEGACY_EXPORT_DATE),
                LedgerSchema::Legacy => !is_banned_column(h),
            })
            .collect()
    }

    /// Decode one data record into current-schema fields.
    ///
    /// Returns `None` for records that carry no grouping (blank legacy `Key`).
    /// Identity validity is checked by the caller.
    pub(crate) fn decode(
        &self,
        headers: &[String],
        cells: &[String],
    ) -> Option<BTreeMap<String, String>> {
        let mut fields: BTreeMap<String, String> = BTreeMap::new();
        for (header, cell) in headers.iter().zip(cells) {
            if header.is_empty() || header.eq_ignore_ascii_case(LEGACY_EXPORT_DATE) {
                continue;
            }
            // Headers differing only in case name one column; the leftmost wins.
            if fields.keys().any(|k| k.eq_ignore_ascii_case(header)) {
                continue;
            }
            fields.insert(header.clone(), cell.clone());
        }

        match self {
            LedgerSchema::Current => Some(fields),
            LedgerSchema::Legacy => migrate_legacy(fields),
        }
    }
}

/// Headers that repeat an earlier header ignoring case.
pub(crate) fn shadowed_headers(headers: &[String]) -> Vec<&str> {
    headers
        .iter()
        .enumerate()
        .filter(|(i, h)| {
            !h.is_empty() && headers[..*i].iter().any(|prev| prev.eq_ignore_ascii_case(h))
        })
        .map(|(_, h)| h.as_str())
        .collect()
}

fn take_ci(fields: &BTreeMap<String, String>, column: &str) -> Option<String> {
    fields
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(column))
        .map(|(_, v)| v.clone())
}

/// Rewrite a legacy row into the current schema.
///
/// The synthetic identity is derived from the `Key` so a later pass can
/// retire the row once the grouping is tracked under its real identity.
fn migrate_legacy(legacy: BTreeMap<String, String>) -> Option<BTreeMap<String, String>> {
    let set_name = take_ci(&legacy, LEGACY_KEY).filter(|k| !k.trim().is_empty())?;

    let mut fields: BTreeMap<String, String> = legacy
        .iter()
        .filter(|(k, _)| !is_banned_column(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    fields.insert(SET_ID.to_string(), legacy_set_id(&set_name));
    fields.insert(SET_NAME.to_string(), set_name);

    for (from, to) in LEGACY_FIELD_MAP {
        if let Some(value) = take_ci(&legacy, from).filter(|v| !v.trim().is_empty()) {
            fields.insert(to.to_string(), value);
        }
    }

    Some(fields)
}
