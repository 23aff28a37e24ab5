use std::collections::BTreeMap;

use setaudit_types::columns::{
    AMBIGUITY_NOTE, AUDIT_DATE, AUDIT_STATUS, IGNORE_FLAG, IGNORE_REASON, MEMBERS_HASH,
    MEMBER_COUNT, SET_ID, SET_NAME,
};
use setaudit_types::AuditStatus;

/// Snapshot of one ledger row.
///
/// Rows handed out by [`crate::LedgerStore`] are copies; changing the ledger
/// goes through `upsert`/`remove`. Column lookups ignore case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerRow {
    fields: BTreeMap<String, String>,
}

impl LedgerRow {
    pub(crate) fn with_id(set_id: &str) -> Self {
        let mut row = Self::default();
        row.fields.insert(SET_ID.to_string(), set_id.to_string());
        row
    }

    pub(crate) fn from_fields(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    /// Set a field, reusing an existing key that matches ignoring case.
    pub(crate) fn set(&mut self, column: &str, value: String) {
        let key = self
            .fields
            .keys()
            .find(|k| k.eq_ignore_ascii_case(column))
            .cloned()
            .unwrap_or_else(|| column.to_string());
        self.fields.insert(key, value);
    }

    pub(crate) fn retain_columns(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.fields.retain(|k, _| keep(k));
    }

    /// Raw cell value, if the row carries the column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(column))
            .map(|(_, v)| v.as_str())
    }

    /// Cell value or empty string.
    pub fn cell(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn set_id(&self) -> &str {
        self.cell(SET_ID)
    }

    pub fn set_name(&self) -> &str {
        self.cell(SET_NAME)
    }

    pub fn member_count(&self) -> Option<u64> {
        self.get(MEMBER_COUNT).and_then(|v| v.trim().parse().ok())
    }

    pub fn members_hash(&self) -> &str {
        self.cell(MEMBERS_HASH)
    }

    pub fn audit_date(&self) -> &str {
        self.cell(AUDIT_DATE)
    }

    /// Parsed status; `None` when blank or unrecognised.
    pub fn audit_status(&self) -> Option<AuditStatus> {
        self.get(AUDIT_STATUS).and_then(|v| v.parse().ok())
    }

    /// Operator-set ignore flag. Only the literal `true` (any case) counts.
    pub fn ignore_flag(&self) -> bool {
        self.get(IGNORE_FLAG)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn ignore_reason(&self) -> &str {
        self.cell(IGNORE_REASON)
    }

    pub fn ambiguity_note(&self) -> &str {
        self.cell(AMBIGUITY_NOTE)
    }
}
