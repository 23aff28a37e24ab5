//! Ledger column names and the identity validity predicate.

pub const SET_ID: &str = "SetId";
pub const SET_NAME: &str = "SetName";
pub const MEMBER_COUNT: &str = "MemberCount";
pub const MEMBERS_HASH: &str = "MembersHash";
pub const AUDIT_DATE: &str = "AuditDate";
pub const AUDIT_STATUS: &str = "AuditStatus";
pub const IGNORE_FLAG: &str = "IgnoreFlag";
pub const IGNORE_REASON: &str = "IgnoreReason";
pub const AMBIGUITY_NOTE: &str = "AmbiguityNote";

/// Core columns in canonical save order. Extension columns follow these.
pub const CORE_COLUMNS: [&str; 9] = [
    SET_ID,
    SET_NAME,
    MEMBER_COUNT,
    MEMBERS_HASH,
    AUDIT_DATE,
    AUDIT_STATUS,
    IGNORE_FLAG,
    IGNORE_REASON,
    AMBIGUITY_NOTE,
];

/// Shortest identity accepted as a stable grouping id.
pub const MIN_ID_LEN: usize = 20;

/// Returns true if `name` is one of the core columns (case-insensitive).
pub fn is_core_column(name: &str) -> bool {
    CORE_COLUMNS.iter().any(|c| c.eq_ignore_ascii_case(name))
}

/// Identity validity predicate.
///
/// Rejects ids that are blank, shorter than [`MIN_ID_LEN`] characters, lack a
/// hyphen, or equal the display name ignoring case. This keeps display names
/// and bare hashes from being persisted as stable identities.
pub fn is_valid_id(id: &str, name: Option<&str>) -> bool {
    if id.trim().is_empty() {
        return false;
    }
    if id.chars().count() < MIN_ID_LEN {
        return false;
    }
    if !id.contains('-') {
        return false;
    }
    match name {
        Some(name) if !name.is_empty() => id.to_lowercase() != name.to_lowercase(),
        _ => true,
    }
}
