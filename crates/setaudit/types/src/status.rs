//! Audit status state machine values and ambiguity notes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Health status recorded for every ledger row.
///
/// `Ignored` is entered and left only through an operator edit of `IgnoreFlag`.
/// `Deleted` is entered when a previously seen grouping disappears from the model.
/// No state is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditStatus {
    Valid,
    Ambiguous,
    Ignored,
    Deleted,
}

impl AuditStatus {
    pub const ALL: [AuditStatus; 4] = [
        AuditStatus::Valid,
        AuditStatus::Ambiguous,
        AuditStatus::Ignored,
        AuditStatus::Deleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Valid => "Valid",
            AuditStatus::Ambiguous => "Ambiguous",
            AuditStatus::Ignored => "Ignored",
            AuditStatus::Deleted => "Deleted",
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a ledger cell holds an unrecognised status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown audit status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for AuditStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        AuditStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Explanation recorded next to an `Ambiguous` or `Deleted` status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmbiguityNote {
    /// More than one live grouping shares the name.
    DuplicateSetName,
    /// The grouping has no members.
    EmptySet,
    /// The grouping is no longer present in the live model.
    MissingInModel,
}

impl AmbiguityNote {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmbiguityNote::DuplicateSetName => "Duplicate SetName",
            AmbiguityNote::EmptySet => "Empty set",
            AmbiguityNote::MissingInModel => "Set missing in model",
        }
    }

    /// Ledger cell text for an optional note; no note is an empty cell.
    pub fn cell(note: Option<AmbiguityNote>) -> &'static str {
        note.map(|n| n.as_str()).unwrap_or("")
    }
}

impl fmt::Display for AmbiguityNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
