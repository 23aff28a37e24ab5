use setaudit_types::{AmbiguityNote, AuditStatus};

/// Status and note for one live grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub status: AuditStatus,
    pub note: Option<AmbiguityNote>,
}

/// Classify a live grouping.
///
/// The ignore flag wins over ambiguity for the status, but the note still
/// records why the grouping would be ambiguous. A duplicate name takes
/// precedence over an empty member set.
pub fn classify(ignored: bool, duplicate_name: bool, member_count: usize) -> Classification {
    let empty_set = member_count == 0;

    let status = if ignored {
        AuditStatus::Ignored
    } else if duplicate_name || empty_set {
        AuditStatus::Ambiguous
    } else {
        AuditStatus::Valid
    };

    let note = if duplicate_name {
        Some(AmbiguityNote::DuplicateSetName)
    } else if empty_set {
        Some(AmbiguityNote::EmptySet)
    } else {
        None
    };

    Classification { status, note }
}
