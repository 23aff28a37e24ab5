use std::collections::BTreeMap;

use serde::Serialize;
use setaudit_types::AuditStatus;

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// `AuditDate` stamped on every row touched by the pass.
    pub audited_at: String,

    pub valid: usize,
    pub ambiguous: usize,
    pub ignored: usize,
    pub deleted: usize,

    /// Ledger rows whose grouping is missing from the live model.
    pub deleted_ids: Vec<String>,

    /// Legacy synthetic rows retired because the grouping is now tracked by
    /// its real identity.
    pub legacy_removed: Vec<String>,

    /// Live groupings whose identity failed validation and were not recorded.
    pub rejected_ids: Vec<String>,

    /// Element id to owning set name, drawn from `Valid` groupings only.
    /// The first grouping in enumeration order claims an element.
    pub element_assignments: BTreeMap<i64, String>,
}

impl ReconcileReport {
    pub(crate) fn record(&mut self, status: AuditStatus) {
        match status {
            AuditStatus::Valid => self.valid += 1,
            AuditStatus::Ambiguous => self.ambiguous += 1,
            AuditStatus::Ignored => self.ignored += 1,
            AuditStatus::Deleted => self.deleted += 1,
        }
    }

    /// Number of ledger rows classified by the pass.
    pub fn total(&self) -> usize {
        self.valid + self.ambiguous + self.ignored + self.deleted
    }

    /// Whether an operator should look at the ledger.
    pub fn requires_attention(&self) -> bool {
        self.ambiguous > 0 || self.deleted > 0 || !self.rejected_ids.is_empty()
    }

    pub fn count(&self, status: AuditStatus) -> usize {
        match status {
            AuditStatus::Valid => self.valid,
            AuditStatus::Ambiguous => self.ambiguous,
            AuditStatus::Ignored => self.ignored,
            AuditStatus::Deleted => self.deleted,
        }
    }
}
