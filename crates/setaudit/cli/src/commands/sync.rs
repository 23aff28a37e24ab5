//! Reconciliation pass command

use std::fs;
use std::io::Read;
use std::path::Path;

use clap::Args;
use colored::Colorize;
use setaudit_reconcile::{ReconcileReport, Reconciler};
use setaudit_types::{AuditStatus, LiveGrouping, SystemClock};
use tracing::info;

use super::{open_ledger, open_ledger_for_write};
use crate::config::LedgerConfig;
use crate::error::{CliError, CliResult};
use crate::output::{print_structured, OutputFormat};

/// Arguments for `setaudit sync`
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Live grouping snapshot (JSON array of {id, name, member_ids}); `-` reads stdin
    #[arg(long)]
    pub live: String,

    /// Compute the pass without saving the ledger
    #[arg(long)]
    pub dry_run: bool,
}

/// Parse a live snapshot document.
pub fn parse_snapshot(text: &str) -> CliResult<Vec<LiveGrouping>> {
    serde_json::from_str(text).map_err(|e| CliError::Snapshot(e.to_string()))
}

fn read_snapshot(source: &str) -> CliResult<Vec<LiveGrouping>> {
    let text = if source == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        text
    } else {
        fs::read_to_string(Path::new(source))
            .map_err(|e| CliError::Snapshot(format!("{}: {}", source, e)))?
    };
    parse_snapshot(&text)
}

/// Execute a reconciliation pass.
pub fn execute(args: SyncArgs, ledger: &LedgerConfig, format: OutputFormat) -> CliResult<()> {
    let live = read_snapshot(&args.live)?;
    let prior = if args.dry_run {
        open_ledger(ledger)?
    } else {
        open_ledger_for_write(ledger)?
    };
    let reconciler = Reconciler::new(SystemClock);

    let report = if args.dry_run {
        let plan = reconciler.plan(&live, &prior);
        info!(ops = plan.ops.len(), "Dry run; ledger not saved");
        plan.report
    } else {
        let outcome = reconciler.reconcile(&live, &prior);
        outcome.store.save(&ledger.path)?;
        outcome.report
    };

    if !print_structured(&report, format)? {
        print_report(&report, &ledger.path, args.dry_run);
    }
    Ok(())
}

fn print_report(report: &ReconcileReport, path: &Path, dry_run: bool) {
    let title = if dry_run {
        "Reconciliation (dry run)"
    } else {
        "Reconciliation"
    };
    println!("{}", title.bold().cyan());
    println!("{}", "=".repeat(60));
    println!("  {:<12} {}", "Ledger:", path.display());
    println!("  {:<12} {}", "Audited at:", report.audited_at);
    for status in AuditStatus::ALL {
        let count = report.count(status).to_string();
        let count = match status {
            AuditStatus::Valid => count.green(),
            AuditStatus::Ambiguous => count.yellow(),
            AuditStatus::Ignored => count.dimmed(),
            AuditStatus::Deleted => count.red(),
        };
        println!("  {:<12} {}", format!("{}:", status), count);
    }

    for id in &report.deleted_ids {
        println!("    {} {}", "missing".red(), id);
    }
    for id in &report.legacy_removed {
        println!("    {} {}", "retired".dimmed(), id);
    }
    for id in &report.rejected_ids {
        println!("    {} {}", "rejected".yellow(), id);
    }

    println!();
    if report.requires_attention() {
        println!("{}: review ambiguous or missing sets", "Attention".bold().yellow());
    } else {
        println!("{} Ledger is clean", "✓".green());
    }
}
