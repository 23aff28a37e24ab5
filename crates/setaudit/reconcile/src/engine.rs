//! Reconciliation pass: plan every ledger change, then apply.

use std::collections::{HashMap, HashSet};

use setaudit_hash::{legacy_set_id, membership_hash};
use setaudit_ledger::columns::{
    AMBIGUITY_NOTE, AUDIT_DATE, AUDIT_STATUS, MEMBERS_HASH, MEMBER_COUNT, SET_NAME,
};
use setaudit_ledger::LedgerStore;
use setaudit_types::{
    format_audit_timestamp, is_valid_id, AmbiguityNote, AuditStatus, Clock, LiveGrouping,
    SystemClock,
};
use tracing::{debug, info, instrument, warn};

use crate::classify::classify;
use crate::report::ReconcileReport;

/// One ledger mutation produced by planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedOp {
    Upsert {
        set_id: String,
        values: Vec<(String, String)>,
    },
    Remove {
        set_id: String,
    },
}

/// Every mutation of a pass, computed before any is applied.
#[derive(Debug, Clone, Default)]
pub struct ReconcilePlan {
    pub ops: Vec<PlannedOp>,
    pub report: ReconcileReport,
}

impl ReconcilePlan {
    /// Apply the planned mutations in order.
    pub fn apply(self, store: &mut LedgerStore) -> ReconcileReport {
        for op in self.ops {
            match op {
                PlannedOp::Upsert { set_id, values } => {
                    store.upsert(&set_id, values);
                }
                PlannedOp::Remove { set_id } => {
                    store.remove(&set_id);
                }
            }
        }
        self.report
    }
}

/// Updated ledger and pass summary.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub store: LedgerStore,
    pub report: ReconcileReport,
}

/// Reconciliation engine with an injected clock.
#[derive(Debug, Clone, Default)]
pub struct Reconciler<C = SystemClock> {
    clock: C,
}

fn identity_key(id: &str) -> String {
    id.to_lowercase()
}

fn name_key(name: &str) -> String {
    name.to_lowercase()
}

impl<C: Clock> Reconciler<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Compute every ledger change for one pass without touching the ledger.
    pub fn plan(&self, live: &[LiveGrouping], prior: &LedgerStore) -> ReconcilePlan {
        let audited_at = format_audit_timestamp(self.clock.now());
        let mut plan = ReconcilePlan {
            ops: Vec::new(),
            report: ReconcileReport {
                audited_at: audited_at.clone(),
                ..Default::default()
            },
        };

        let mut groupings_per_name: HashMap<String, usize> = HashMap::new();
        for grouping in live {
            *groupings_per_name.entry(name_key(&grouping.name)).or_default() += 1;
        }

        let mut live_ids: HashSet<String> = HashSet::with_capacity(live.len());
        let mut retired: HashSet<String> = HashSet::new();

        for grouping in live {
            if !live_ids.insert(identity_key(&grouping.id)) {
                warn!(set_id = %grouping.id, "Live model enumerated the same set twice");
            }

            if !is_valid_id(&grouping.id, Some(&grouping.name)) {
                debug!(set_id = %grouping.id, set_name = %grouping.name, "Skipping set with invalid id");
                plan.report.rejected_ids.push(grouping.id.clone());
                continue;
            }

            let member_count = grouping.member_count();
            let members_hash = membership_hash(grouping.member_ids.iter().copied());
            let ignored = prior
                .get_row(&grouping.id)
                .map(|row| row.ignore_flag())
                .unwrap_or(false);
            let duplicate_name = groupings_per_name
                .get(&name_key(&grouping.name))
                .is_some_and(|count| *count > 1);

            let classification = classify(ignored, duplicate_name, member_count);
            debug!(
                set_id = %grouping.id,
                status = %classification.status,
                members = member_count,
                "Classified set"
            );

            plan.ops.push(PlannedOp::Upsert {
                set_id: grouping.id.clone(),
                values: vec![
                    (SET_NAME.to_string(), grouping.name.clone()),
                    (MEMBER_COUNT.to_string(), member_count.to_string()),
                    (MEMBERS_HASH.to_string(), members_hash),
                    (AUDIT_DATE.to_string(), audited_at.clone()),
                    (
                        AUDIT_STATUS.to_string(),
                        classification.status.as_str().to_string(),
                    ),
                    (
                        AMBIGUITY_NOTE.to_string(),
                        AmbiguityNote::cell(classification.note).to_string(),
                    ),
                ],
            });
            plan.report.record(classification.status);

            if classification.status == AuditStatus::Valid {
                for element in grouping.member_ids.iter().copied().filter(|id| *id != 0) {
                    plan.report
                        .element_assignments
                        .entry(element)
                        .or_insert_with(|| grouping.name.clone());
                }
            }

            let legacy_id = legacy_set_id(&grouping.name);
            if prior.contains(&legacy_id) && retired.insert(identity_key(&legacy_id)) {
                debug!(set_id = %grouping.id, legacy_id = %legacy_id, "Retiring legacy row");
                plan.ops.push(PlannedOp::Remove {
                    set_id: legacy_id.clone(),
                });
                plan.report.legacy_removed.push(legacy_id);
            }
        }

        for row in prior.rows() {
            let key = identity_key(row.set_id());
            if live_ids.contains(&key) || retired.contains(&key) {
                continue;
            }
            debug!(set_id = %row.set_id(), "Set missing in model");
            plan.ops.push(PlannedOp::Upsert {
                set_id: row.set_id().to_string(),
                values: vec![
                    (
                        AUDIT_STATUS.to_string(),
                        AuditStatus::Deleted.as_str().to_string(),
                    ),
                    (
                        AMBIGUITY_NOTE.to_string(),
                        AmbiguityNote::MissingInModel.as_str().to_string(),
                    ),
                    (AUDIT_DATE.to_string(), audited_at.clone()),
                ],
            });
            plan.report.record(AuditStatus::Deleted);
            plan.report.deleted_ids.push(row.set_id().to_string());
        }

        plan
    }

    /// Run a pass against `store` in place.
    #[instrument(skip_all, fields(live = live.len(), rows = store.len()))]
    pub fn reconcile_in_place(
        &self,
        live: &[LiveGrouping],
        store: &mut LedgerStore,
    ) -> ReconcileReport {
        let report = self.plan(live, store).apply(store);
        info!(
            valid = report.valid,
            ambiguous = report.ambiguous,
            ignored = report.ignored,
            deleted = report.deleted,
            legacy_removed = report.legacy_removed.len(),
            rejected = report.rejected_ids.len(),
            "Reconciliation completed"
        );
        report
    }

    /// Run a pass over snapshots, returning the updated ledger.
    pub fn reconcile(&self, live: &[LiveGrouping], prior: &LedgerStore) -> ReconcileOutcome {
        let mut store = prior.clone();
        let report = self.reconcile_in_place(live, &mut store);
        ReconcileOutcome { store, report }
    }
}

/// Run one pass with the given clock.
pub fn reconcile(live: &[LiveGrouping], prior: &LedgerStore, clock: &dyn Clock) -> ReconcileOutcome {
    Reconciler::new(clock).reconcile(live, prior)
}
