use std::fs;

use chrono::{TimeZone, Utc};
use setaudit_ledger::LedgerStore;
use setaudit_reconcile::Reconciler;
use setaudit_types::{AuditStatus, FixedClock, LiveGrouping};
use tempfile::TempDir;

const KITCHEN: &str = "3f2504e0-4f89-11d3-9a0c-0305e82c3301-000a1b2c";

fn clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap())
}

#[test]
fn legacy_file_is_migrated_reconciled_and_saved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.csv");
    fs::write(
        &path,
        "Key,CurrentHash,Date,Status,Export Date,Phase\n\
         Kitchen,ABC,3/1/24 10:15,Valid,3/1/24,2\n\
         Old Laundry,DEF,3/1/24 10:15,Valid,3/1/24,1\n",
    )
    .unwrap();

    let prior = LedgerStore::try_load(&path).unwrap();
    assert_eq!(prior.len(), 2);

    let live = vec![LiveGrouping::new(KITCHEN, "Kitchen", vec![11, 10])];
    let outcome = Reconciler::new(clock()).reconcile(&live, &prior);
    assert_eq!(outcome.report.legacy_removed.len(), 1);
    assert_eq!(outcome.report.deleted, 1);

    outcome.store.save(&path).unwrap();
    let reloaded = LedgerStore::try_load(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let header = text.lines().next().unwrap();
    assert!(header.starts_with("SetId,SetName,MemberCount,MembersHash,AuditDate"));
    assert!(!header.contains("Export Date"));
    assert!(!header.contains("CurrentHash"));
    assert!(header.ends_with(",Phase"));

    let kitchen = reloaded.get_row(KITCHEN).unwrap();
    assert_eq!(kitchen.audit_status(), Some(AuditStatus::Valid));
    assert_eq!(kitchen.member_count(), Some(2));

    let laundry = reloaded
        .rows()
        .into_iter()
        .find(|row| row.set_name() == "Old Laundry")
        .unwrap();
    assert_eq!(laundry.audit_status(), Some(AuditStatus::Deleted));
    assert_eq!(laundry.get("Phase"), Some("1"));
}

#[test]
fn reconciling_a_missing_file_creates_it() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("ledger.csv");

    let prior = LedgerStore::load(&path);
    let live = vec![LiveGrouping::new(KITCHEN, "Kitchen", vec![1])];
    let outcome = Reconciler::new(clock()).reconcile(&live, &prior);
    outcome.store.save(&path).unwrap();

    let reloaded = LedgerStore::load(&path);
    assert_eq!(reloaded.headers(), outcome.store.headers());
    let row = reloaded.get_row(KITCHEN).unwrap();
    assert_eq!(row.audit_status(), Some(AuditStatus::Valid));
    assert_eq!(row.audit_date(), "2024-05-01T09:00:00Z");
    assert!(!row.ignore_flag());
}
