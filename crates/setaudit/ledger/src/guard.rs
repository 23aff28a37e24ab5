//! Guard against retired legacy columns re-entering the ledger.

use std::path::Path;

use tracing::warn;

use crate::error::LedgerResult;
use crate::row::LedgerRow;
use crate::store::LedgerStore;

/// Column names from the pre-v2 ledger that must not be written again.
pub const BANNED_HEADERS: [&str; 11] = [
    "Key",
    "Status",
    "Date",
    "Export Date",
    "Members",
    "CurrentHash",
    "AnnoHash",
    "MemberIds",
    "Before",
    "PlusAdded",
    "MinusRemoved",
];

pub fn is_banned_column(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && BANNED_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name))
}

/// View over a [`LedgerStore`] that strips banned legacy columns from every
/// read and write.
pub struct GuardedLedger<'a> {
    inner: &'a mut LedgerStore,
}

impl<'a> GuardedLedger<'a> {
    pub fn wrap(inner: &'a mut LedgerStore) -> Self {
        Self { inner }
    }

    pub fn headers(&self) -> Vec<String> {
        self.inner
            .headers()
            .into_iter()
            .filter(|h| !is_banned_column(h))
            .collect()
    }

    pub fn get_row(&self, set_id: &str) -> Option<LedgerRow> {
        self.inner.get_row(set_id).map(strip_row)
    }

    pub fn rows(&self) -> Vec<LedgerRow> {
        self.inner.rows().into_iter().map(strip_row).collect()
    }

    pub fn ensure_columns<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().to_string())
            .filter(|n| !is_banned_column(n))
            .collect();
        self.inner.ensure_columns(allowed);
    }

    /// Upsert with banned columns removed from `values`.
    pub fn upsert<I, K, V>(&mut self, set_id: &str, values: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let (allowed, blocked): (Vec<(String, String)>, Vec<(String, String)>) = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .partition(|(k, _)| !is_banned_column(k));

        if !blocked.is_empty() {
            let blocked: Vec<&str> = blocked.iter().map(|(k, _)| k.as_str()).collect();
            warn!(set_id = %set_id, blocked = ?blocked, "Blocked legacy columns on upsert");
        }
        self.inner.upsert(set_id, allowed)
    }

    pub fn remove(&mut self, set_id: &str) -> bool {
        self.inner.remove(set_id)
    }

    /// Save without any banned columns the underlying store may carry.
    pub fn save(&self, path: &Path) -> LedgerResult<()> {
        self.inner.without_columns(is_banned_column).save(path)
    }
}

fn strip_row(mut row: LedgerRow) -> LedgerRow {
    row.retain_columns(|c| !is_banned_column(c));
    row
}
