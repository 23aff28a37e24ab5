//! Operator ignore decisions
//!
//! These commands are the only writers of `IgnoreFlag` and `IgnoreReason`.

use colored::Colorize;
use setaudit_ledger::columns::{IGNORE_FLAG, IGNORE_REASON};
use setaudit_ledger::GuardedLedger;
use tracing::info;

use super::open_ledger_for_write;
use crate::config::LedgerConfig;
use crate::error::{CliError, CliResult};

/// Mark a set as ignored, or clear the mark.
pub fn execute(
    set_id: &str,
    ignored: bool,
    reason: Option<String>,
    ledger: &LedgerConfig,
) -> CliResult<()> {
    let mut store = open_ledger_for_write(ledger)?;
    let mut view = GuardedLedger::wrap(&mut store);

    let Some(row) = view.get_row(set_id) else {
        return Err(CliError::NotFound(format!("Set {} is not in the ledger", set_id)));
    };

    let flag = if ignored { "true" } else { "false" };
    let reason = if ignored { reason.unwrap_or_default() } else { String::new() };
    view.upsert(
        row.set_id(),
        [(IGNORE_FLAG, flag.to_string()), (IGNORE_REASON, reason)],
    );
    view.save(&ledger.path)?;

    info!(set_id = %row.set_id(), ignored, "Updated ignore decision");
    let verb = if ignored { "Ignoring" } else { "No longer ignoring" };
    println!("{} {} {}", "✓".green(), verb, row.set_name().bold());
    Ok(())
}
