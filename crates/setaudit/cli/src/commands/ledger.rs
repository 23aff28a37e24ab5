//! Ledger inspection and maintenance commands

use std::collections::BTreeMap;

use colored::Colorize;
use setaudit_ledger::{read_headers_or_defaults, GuardedLedger, LedgerRow};
use chrono::{DateTime, Utc};
use setaudit_types::{parse_audit_timestamp, AuditStatus, Clock, SystemClock};
use tracing::info;

use super::{open_ledger, open_ledger_for_write, status_label};
use crate::config::LedgerConfig;
use crate::error::{CliError, CliResult};
use crate::output::{print_structured, OutputFormat};

fn row_fields(row: &LedgerRow) -> BTreeMap<String, String> {
    row.fields()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Time since an `AuditDate` cell, coarsest unit only. `None` for blank or
/// unparsable cells.
fn audit_age(cell: &str, now: DateTime<Utc>) -> Option<String> {
    let elapsed = now.signed_duration_since(parse_audit_timestamp(cell)?);
    let age = if elapsed.num_days() > 0 {
        format!("{}d ago", elapsed.num_days())
    } else if elapsed.num_hours() > 0 {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed.num_minutes() > 0 {
        format!("{}m ago", elapsed.num_minutes())
    } else {
        "just now".to_string()
    };
    Some(age)
}

/// Print ledger rows, optionally filtered by status.
pub fn show(status: Option<String>, ledger: &LedgerConfig, format: OutputFormat) -> CliResult<()> {
    let filter = status
        .map(|s| {
            s.parse::<AuditStatus>()
                .map_err(|e| CliError::InvalidArgument(e.to_string()))
        })
        .transpose()?;

    let mut store = open_ledger(ledger)?;
    let view = GuardedLedger::wrap(&mut store);
    let rows: Vec<LedgerRow> = view
        .rows()
        .into_iter()
        .filter(|row| filter.map_or(true, |f| row.audit_status() == Some(f)))
        .collect();

    let structured: Vec<BTreeMap<String, String>> = rows.iter().map(row_fields).collect();
    if print_structured(&structured, format)? {
        return Ok(());
    }

    if rows.is_empty() {
        println!("{}", "No ledger rows found.".dimmed());
        return Ok(());
    }

    let now = SystemClock.now();
    println!("{}", "Selection Sets".bold().cyan());
    println!("{}", "=".repeat(80));
    for row in &rows {
        let mut line = format!(
            "  {:<10} {} {}",
            status_label(row.audit_status()),
            row.set_name().bold(),
            format!("({} members)", row.member_count().unwrap_or(0)).dimmed()
        );
        if !row.ambiguity_note().is_empty() {
            line.push_str(&format!(" {}", row.ambiguity_note().yellow()));
        }
        if let Some(age) = audit_age(row.audit_date(), now) {
            line.push_str(&format!(" {}", format!("audited {}", age).dimmed()));
        }
        if row.ignore_flag() && !row.ignore_reason().is_empty() {
            line.push_str(&format!(" {}", format!("[{}]", row.ignore_reason()).dimmed()));
        }
        println!("{}", line);
        println!("      {}", row.set_id().dimmed());
    }
    println!();
    println!("Total: {} set(s)", rows.len());
    Ok(())
}

/// Print the ledger header row, or the core columns when there is none.
pub fn headers(ledger: &LedgerConfig, format: OutputFormat) -> CliResult<()> {
    let headers = read_headers_or_defaults(&ledger.path);
    if !print_structured(&headers, format)? {
        for header in headers {
            println!("{}", header);
        }
    }
    Ok(())
}

/// Load the ledger, upgrading a legacy file, and save it in place.
pub fn migrate(ledger: &LedgerConfig, format: OutputFormat) -> CliResult<()> {
    let store = open_ledger_for_write(ledger)?;
    store.save(&ledger.path)?;
    info!(path = %ledger.path.display(), rows = store.len(), "Ledger rewritten in current schema");

    let headers = store.headers();
    if !print_structured(&headers, format)? {
        println!(
            "{} Rewrote {} with {} row(s)",
            "✓".green(),
            ledger.path.display(),
            store.len()
        );
    }
    Ok(())
}
