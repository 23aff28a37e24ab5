//! Membership hash command

use serde::Serialize;
use setaudit_hash::membership_hash;

use crate::error::CliResult;
use crate::output::{print_structured, OutputFormat};

#[derive(Serialize)]
struct HashInfo {
    member_count: usize,
    members_hash: String,
}

/// Print the membership hash of an element id list.
pub fn execute(ids: Vec<i64>, format: OutputFormat) -> CliResult<()> {
    let info = HashInfo {
        member_count: ids.len(),
        members_hash: membership_hash(ids),
    };
    if !print_structured(&info, format)? {
        println!("{}", info.members_hash);
    }
    Ok(())
}
