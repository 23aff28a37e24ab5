//! Live grouping snapshot as enumerated from the host model.

use serde::{Deserialize, Serialize};

/// One selection set observed in the live model during a reconciliation pass.
///
/// The model owns groupings; the ledger only observes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveGrouping {
    /// Stable host identity (a Revit-style unique id).
    pub id: String,

    /// Display name. Mutable and not guaranteed unique.
    pub name: String,

    /// Member element ids. May be empty.
    #[serde(default)]
    pub member_ids: Vec<i64>,
}

impl LiveGrouping {
    /// Create a new live grouping snapshot.
    pub fn new(id: impl Into<String>, name: impl Into<String>, member_ids: Vec<i64>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            member_ids,
        }
    }

    pub fn member_count(&self) -> usize {
        self.member_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }
}
