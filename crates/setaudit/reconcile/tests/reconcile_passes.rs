use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use setaudit_hash::{legacy_set_id, membership_hash};
use setaudit_ledger::columns::{IGNORE_FLAG, IGNORE_REASON, SET_NAME};
use setaudit_ledger::LedgerStore;
use setaudit_reconcile::Reconciler;
use setaudit_types::{AuditStatus, FixedClock, LiveGrouping};

const KITCHEN: &str = "3f2504e0-4f89-11d3-9a0c-0305e82c3301-000a1b2c";
const PANTRY: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7-000a1b2d";
const BATH: &str = "16fd2706-8baf-433b-82eb-8c7fada847da-000a1b2e";

fn at(hour: u32) -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap())
}

fn status(store: &LedgerStore, id: &str) -> Option<AuditStatus> {
    store.get_row(id).and_then(|row| row.audit_status())
}

#[test]
fn first_pass_records_every_live_set() {
    let live = vec![
        LiveGrouping::new(KITCHEN, "Kitchen", vec![103, 101, 102]),
        LiveGrouping::new(PANTRY, "Pantry", vec![7]),
    ];
    let outcome = Reconciler::new(at(9)).reconcile(&live, &LedgerStore::new());

    assert_eq!(outcome.store.len(), 2);
    assert_eq!(outcome.report.valid, 2);
    assert!(!outcome.report.requires_attention());

    let kitchen = outcome.store.get_row(KITCHEN).unwrap();
    assert_eq!(kitchen.set_name(), "Kitchen");
    assert_eq!(kitchen.member_count(), Some(3));
    assert_eq!(kitchen.members_hash(), membership_hash([101, 102, 103]));
    assert_eq!(kitchen.audit_date(), "2024-05-01T09:00:00Z");
    assert_eq!(kitchen.ambiguity_note(), "");
}

#[test]
fn shared_names_mark_both_sets_ambiguous() {
    let live = vec![
        LiveGrouping::new(KITCHEN, "Kitchen", vec![1]),
        LiveGrouping::new(PANTRY, "Kitchen", vec![2]),
    ];
    let outcome = Reconciler::new(at(9)).reconcile(&live, &LedgerStore::new());

    for id in [KITCHEN, PANTRY] {
        let row = outcome.store.get_row(id).unwrap();
        assert_eq!(row.audit_status(), Some(AuditStatus::Ambiguous));
        assert_eq!(row.ambiguity_note(), "Duplicate SetName");
    }
    assert!(outcome.report.element_assignments.is_empty());
}

#[test]
fn empty_set_is_ambiguous() {
    let live = vec![LiveGrouping::new(BATH, "Bath", vec![])];
    let outcome = Reconciler::new(at(9)).reconcile(&live, &LedgerStore::new());

    let row = outcome.store.get_row(BATH).unwrap();
    assert_eq!(row.audit_status(), Some(AuditStatus::Ambiguous));
    assert_eq!(row.ambiguity_note(), "Empty set");
    assert_eq!(row.member_count(), Some(0));
    assert_eq!(row.members_hash(), membership_hash(Vec::<i64>::new()));
}

#[test]
fn missing_sets_are_marked_deleted_and_keep_operator_fields() {
    let mut prior = LedgerStore::new();
    prior.upsert(
        PANTRY,
        [
            (SET_NAME, "Pantry"),
            (IGNORE_FLAG, "true"),
            (IGNORE_REASON, "kept for phase 2"),
        ],
    );

    let live = vec![LiveGrouping::new(KITCHEN, "Kitchen", vec![1])];
    let outcome = Reconciler::new(at(10)).reconcile(&live, &prior);

    let row = outcome.store.get_row(PANTRY).unwrap();
    assert_eq!(row.audit_status(), Some(AuditStatus::Deleted));
    assert_eq!(row.ambiguity_note(), "Set missing in model");
    assert_eq!(row.audit_date(), "2024-05-01T10:00:00Z");
    assert!(row.ignore_flag());
    assert_eq!(row.ignore_reason(), "kept for phase 2");
    assert_eq!(outcome.report.deleted_ids, vec![PANTRY.to_string()]);
    assert!(outcome.report.requires_attention());
}

#[test]
fn ignore_flag_is_sticky_across_passes() {
    let mut prior = LedgerStore::new();
    prior.upsert(KITCHEN, [(SET_NAME, "Kitchen"), (IGNORE_FLAG, "TRUE")]);

    let live = vec![LiveGrouping::new(KITCHEN, "Kitchen", vec![1, 2])];
    let reconciler = Reconciler::new(at(9));
    let first = reconciler.reconcile(&live, &prior);
    let second = reconciler.reconcile(&live, &first.store);

    let row = second.store.get_row(KITCHEN).unwrap();
    assert_eq!(row.audit_status(), Some(AuditStatus::Ignored));
    assert_eq!(row.get(IGNORE_FLAG), Some("TRUE"));
    assert_eq!(second.report.ignored, 1);
}

#[test]
fn ignored_duplicate_keeps_its_note() {
    let mut prior = LedgerStore::new();
    prior.upsert(KITCHEN, [(SET_NAME, "Kitchen"), (IGNORE_FLAG, "true")]);

    let live = vec![
        LiveGrouping::new(KITCHEN, "Kitchen", vec![1]),
        LiveGrouping::new(PANTRY, "Kitchen", vec![2]),
    ];
    let outcome = Reconciler::new(at(9)).reconcile(&live, &prior);

    let row = outcome.store.get_row(KITCHEN).unwrap();
    assert_eq!(row.audit_status(), Some(AuditStatus::Ignored));
    assert_eq!(row.ambiguity_note(), "Duplicate SetName");
    assert_eq!(status(&outcome.store, PANTRY), Some(AuditStatus::Ambiguous));
}

#[test]
fn returning_set_becomes_valid_again() {
    let live = vec![LiveGrouping::new(KITCHEN, "Kitchen", vec![1])];
    let reconciler = Reconciler::new(at(9));

    let first = reconciler.reconcile(&live, &LedgerStore::new());
    let gone = reconciler.reconcile(&[], &first.store);
    assert_eq!(status(&gone.store, KITCHEN), Some(AuditStatus::Deleted));

    let back = reconciler.reconcile(&live, &gone.store);
    let row = back.store.get_row(KITCHEN).unwrap();
    assert_eq!(row.audit_status(), Some(AuditStatus::Valid));
    assert_eq!(row.ambiguity_note(), "");
}

#[test]
fn legacy_row_is_retired_when_real_identity_appears() {
    let legacy_id = legacy_set_id("Kitchen");
    let mut prior = LedgerStore::new();
    assert!(prior.upsert(&legacy_id, [(SET_NAME, "Kitchen")]));

    let live = vec![LiveGrouping::new(KITCHEN, "Kitchen", vec![1])];
    let outcome = Reconciler::new(at(9)).reconcile(&live, &prior);

    assert!(!outcome.store.contains(&legacy_id));
    assert!(outcome.store.contains(KITCHEN));
    assert_eq!(outcome.report.legacy_removed, vec![legacy_id]);
    assert_eq!(outcome.report.deleted, 0);
}

#[test]
fn unmatched_legacy_row_is_marked_deleted() {
    let legacy_id = legacy_set_id("Old Laundry");
    let mut prior = LedgerStore::new();
    prior.upsert(&legacy_id, [(SET_NAME, "Old Laundry")]);

    let live = vec![LiveGrouping::new(KITCHEN, "Kitchen", vec![1])];
    let outcome = Reconciler::new(at(9)).reconcile(&live, &prior);

    assert_eq!(status(&outcome.store, &legacy_id), Some(AuditStatus::Deleted));
    assert!(outcome.report.legacy_removed.is_empty());
}

#[test]
fn rejected_grouping_keeps_legacy_row() {
    let legacy_id = legacy_set_id("Kitchen");
    let mut prior = LedgerStore::new();
    prior.upsert(&legacy_id, [(SET_NAME, "Kitchen")]);

    let live = vec![LiveGrouping::new("short-id", "Kitchen", vec![1])];
    let outcome = Reconciler::new(at(9)).reconcile(&live, &prior);

    assert!(outcome.store.contains(&legacy_id));
    assert_eq!(outcome.report.rejected_ids, vec!["short-id".to_string()]);
}

#[test]
fn extension_columns_survive_a_pass() {
    let mut prior = LedgerStore::new();
    prior.upsert(KITCHEN, [(SET_NAME, "Kitchen"), ("Phase", "2")]);

    let live = vec![LiveGrouping::new(KITCHEN, "Kitchen Renamed", vec![4])];
    let outcome = Reconciler::new(at(9)).reconcile(&live, &prior);

    let row = outcome.store.get_row(KITCHEN).unwrap();
    assert_eq!(row.get("Phase"), Some("2"));
    assert_eq!(row.set_name(), "Kitchen Renamed");
    assert!(outcome.store.headers().iter().any(|h| h == "Phase"));
}

#[test]
fn report_serializes_for_collaborators() {
    let live = vec![LiveGrouping::new(KITCHEN, "Kitchen", vec![5])];
    let outcome = Reconciler::new(at(9)).reconcile(&live, &LedgerStore::new());

    let json = serde_json::to_value(&outcome.report).unwrap();
    assert_eq!(json["valid"], 1);
    assert_eq!(json["audited_at"], "2024-05-01T09:00:00Z");
    assert_eq!(json["element_assignments"]["5"], "Kitchen");
}

fn live_strategy() -> impl Strategy<Value = Vec<LiveGrouping>> {
    let ids = [KITCHEN, PANTRY, BATH];
    proptest::collection::vec(
        (
            prop::sample::select(vec!["Kitchen", "Pantry", "kitchen", "Bath"]),
            proptest::collection::vec(-50i64..50, 0..6),
        ),
        0..=3,
    )
    .prop_map(move |entries| {
        entries
            .into_iter()
            .zip(ids)
            .map(|((name, members), id)| LiveGrouping::new(id, name, members))
            .collect()
    })
}

proptest! {
    #[test]
    fn second_pass_changes_only_audit_dates(live in live_strategy()) {
        let first = Reconciler::new(at(9)).reconcile(&live, &LedgerStore::new());
        let later = FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap() + Duration::hours(3));
        let second = Reconciler::new(later).reconcile(&live, &first.store);

        prop_assert_eq!(first.store.set_ids(), second.store.set_ids());
        for (a, b) in first.store.rows().iter().zip(second.store.rows().iter()) {
            prop_assert_eq!(a.set_name(), b.set_name());
            prop_assert_eq!(a.member_count(), b.member_count());
            prop_assert_eq!(a.members_hash(), b.members_hash());
            prop_assert_eq!(a.audit_status(), b.audit_status());
            prop_assert_eq!(a.ambiguity_note(), b.ambiguity_note());
            prop_assert_eq!(b.audit_date(), "2024-05-01T12:00:00Z");
        }
        prop_assert_eq!(first.report.total(), second.report.total());
    }
}
