use std::collections::BTreeMap;

use setaudit_types::columns::{is_core_column, SET_ID, SET_NAME};
use setaudit_types::{is_valid_id, CORE_COLUMNS};
use tracing::debug;

use crate::row::LedgerRow;

/// In-memory audit ledger keyed by grouping identity.
///
/// Identity matching ignores case. The column set only grows; core columns are
/// always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerStore {
    columns: Vec<String>,
    rows: BTreeMap<String, LedgerRow>,
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

fn row_key(set_id: &str) -> String {
    set_id.to_lowercase()
}

impl LedgerStore {
    /// Empty ledger seeded with the core columns.
    pub fn new() -> Self {
        Self {
            columns: CORE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, set_id: &str) -> bool {
        self.rows.contains_key(&row_key(set_id))
    }

    /// Register columns. Additive and idempotent; blank names are skipped.
    pub fn ensure_columns<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.ensure_column(name.as_ref());
        }
    }

    /// Register one column and return the spelling the ledger uses for it.
    pub(crate) fn ensure_column(&mut self, name: &str) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        if let Some(existing) = self.canonical_column(name) {
            return Some(existing.to_string());
        }
        self.columns.push(name.to_string());
        Some(name.to_string())
    }

    fn canonical_column(&self, name: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    /// Current columns in save order: core columns canonically, then extension
    /// columns alphabetically ignoring case.
    pub fn headers(&self) -> Vec<String> {
        let mut extra: Vec<&String> = self
            .columns
            .iter()
            .filter(|c| !is_core_column(c))
            .collect();
        extra.sort_by_key(|c| c.to_lowercase());

        CORE_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(extra.into_iter().cloned())
            .collect()
    }

    /// Create or merge a row.
    ///
    /// Only the supplied fields change. Returns `false` without touching the
    /// ledger when `set_id` fails the identity validity predicate against the
    /// supplied `SetName`. A supplied `SetId` field is ignored; the key is the
    /// identity.
    pub fn upsert<I, K, V>(&mut self, set_id: &str, values: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values: Vec<(String, String)> = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let supplied_name = values
            .iter()
            .find(|(k, _)| k.trim().eq_ignore_ascii_case(SET_NAME))
            .map(|(_, v)| v.as_str());

        if !is_valid_id(set_id, supplied_name) {
            debug!(set_id = %set_id, "Rejected upsert with invalid set id");
            return false;
        }

        let mut resolved = Vec::with_capacity(values.len());
        for (column, value) in values {
            if column.trim().eq_ignore_ascii_case(SET_ID) {
                continue;
            }
            if let Some(column) = self.ensure_column(&column) {
                resolved.push((column, value));
            }
        }

        let row = self
            .rows
            .entry(row_key(set_id))
            .or_insert_with(|| LedgerRow::with_id(set_id));
        for (column, value) in resolved {
            row.set(&column, value);
        }
        true
    }

    /// Delete a row. Returns whether one was removed.
    pub fn remove(&mut self, set_id: &str) -> bool {
        if set_id.trim().is_empty() {
            return false;
        }
        self.rows.remove(&row_key(set_id)).is_some()
    }

    /// Copy of one row.
    pub fn get_row(&self, set_id: &str) -> Option<LedgerRow> {
        self.rows.get(&row_key(set_id)).cloned()
    }

    /// Copies of all rows.
    pub fn rows(&self) -> Vec<LedgerRow> {
        self.rows.values().cloned().collect()
    }

    /// Identities of all rows, as first recorded.
    pub fn set_ids(&self) -> Vec<String> {
        self.rows.values().map(|r| r.set_id().to_string()).collect()
    }

    /// Rows ordered for persistence: by set name ignoring case.
    pub(crate) fn rows_in_save_order(&self) -> Vec<&LedgerRow> {
        let mut rows: Vec<&LedgerRow> = self.rows.values().collect();
        rows.sort_by_key(|r| r.set_name().to_lowercase());
        rows
    }

    /// Insert a fully decoded row from a ledger file.
    ///
    /// Applies the identity filter; the first row wins on duplicate identities.
    pub(crate) fn insert_loaded(&mut self, fields: BTreeMap<String, String>) -> LoadOutcome {
        let row = LedgerRow::from_fields(fields);
        let set_name = row.get(SET_NAME);
        if !is_valid_id(row.set_id(), set_name) {
            return LoadOutcome::InvalidId;
        }
        let key = row_key(row.set_id());
        if self.rows.contains_key(&key) {
            return LoadOutcome::Duplicate;
        }
        self.rows.insert(key, row);
        LoadOutcome::Inserted
    }

    /// Copy of this ledger without the columns `excluded` selects.
    pub(crate) fn without_columns(&self, excluded: impl Fn(&str) -> bool) -> LedgerStore {
        let mut copy = self.clone();
        copy.columns.retain(|c| is_core_column(c) || !excluded(c.as_str()));
        for row in copy.rows.values_mut() {
            row.retain_columns(|c| is_core_column(c) || !excluded(c));
        }
        copy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadOutcome {
    Inserted,
    InvalidId,
    Duplicate,
}
