//! Subcommand implementations

pub mod hash;
pub mod ignore;
pub mod ledger;
pub mod sync;

use colored::{ColoredString, Colorize};
use setaudit_ledger::LedgerStore;
use setaudit_types::AuditStatus;

use crate::config::LedgerConfig;
use crate::error::CliResult;

/// Open the configured ledger, honouring `strict_load`.
pub(crate) fn open_ledger(config: &LedgerConfig) -> CliResult<LedgerStore> {
    if config.strict_load {
        Ok(LedgerStore::try_load(&config.path)?)
    } else {
        Ok(LedgerStore::load(&config.path))
    }
}

/// Open the configured ledger for a command that saves it back.
///
/// Always strict: a ledger that exists but cannot be read is an error, so it
/// is never replaced by an empty one.
pub(crate) fn open_ledger_for_write(config: &LedgerConfig) -> CliResult<LedgerStore> {
    Ok(LedgerStore::try_load(&config.path)?)
}

pub(crate) fn status_label(status: Option<AuditStatus>) -> ColoredString {
    match status {
        Some(AuditStatus::Valid) => "Valid".green(),
        Some(AuditStatus::Ambiguous) => "Ambiguous".yellow(),
        Some(AuditStatus::Ignored) => "Ignored".dimmed(),
        Some(AuditStatus::Deleted) => "Deleted".red(),
        None => "-".dimmed(),
    }
}
