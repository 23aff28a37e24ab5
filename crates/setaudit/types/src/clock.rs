//! Clock collaborator and audit timestamp formats.
//!
//! Reconciliation never reads the wall clock directly; callers inject a
//! [`Clock`] so passes stay deterministic under test.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Source of the current UTC time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Render an `AuditDate` cell: ISO-8601, second precision, trailing `Z`.
pub fn format_audit_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// Pre-v2 ledgers wrote local "MM/dd/yy HH:mm" stamps.
const LEGACY_FORMATS: [&str; 4] = [
    "%m/%d/%y %H:%M",
    "%-m/%-d/%y %H:%M",
    "%m/%d/%Y %H:%M",
    "%-m/%-d/%Y %H:%M",
];

/// Parse an `AuditDate` cell written by either schema.
///
/// Legacy stamps carry no zone and are read as UTC.
pub fn parse_audit_timestamp(cell: &str) -> Option<DateTime<Utc>> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(at.with_timezone(&Utc));
    }
    LEGACY_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn formats_with_trailing_z() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format_audit_timestamp(at), "2024-03-09T07:05:01Z");
    }

    #[test]
    fn fixed_clock_is_stable() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = FixedClock::new(at);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn parses_current_and_legacy_stamps() {
        let current = parse_audit_timestamp("2024-03-09T07:05:01Z").unwrap();
        assert_eq!(current.hour(), 7);

        let legacy = parse_audit_timestamp("03/09/24 14:30").unwrap();
        assert_eq!((legacy.year(), legacy.month(), legacy.day()), (2024, 3, 9));
        assert_eq!(legacy.minute(), 30);

        let long_year = parse_audit_timestamp("12/31/2023 23:59").unwrap();
        assert_eq!(long_year.year(), 2023);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_audit_timestamp("").is_none());
        assert!(parse_audit_timestamp("yesterday").is_none());
    }
}
