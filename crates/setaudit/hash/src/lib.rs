//! Membership fingerprints for selection sets.
//!
//! A membership hash is the FNV-1a 64-bit digest of the member ids sorted
//! ascending and joined with `;`, rendered as 16 uppercase hex digits. It is a
//! cheap change detector, not a cryptographic commitment.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

const FNV_OFFSET_BASIS: u64 = 14_695_981_039_346_656_037;
const FNV_PRIME: u64 = 1_099_511_628_211;

/// Prefix hashed together with a set name to derive legacy synthetic ids.
pub const LEGACY_KEY_PREFIX: &str = "legacy:";

/// Prefix of synthetic ids assigned to rows migrated from the legacy schema.
pub const LEGACY_ID_PREFIX: &str = "legacy-";

/// Raw FNV-1a 64-bit over a byte slice.
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

/// String-mode digest: FNV-1a 64-bit over the UTF-8 bytes, as 16 uppercase hex digits.
pub fn fnv1a64_hex(input: &str) -> String {
    format!("{:016X}", fnv1a64(input.as_bytes()))
}

/// Membership hash of an unordered collection of element ids.
///
/// Invariant under permutation of the input.
pub fn membership_hash<I>(member_ids: I) -> String
where
    I: IntoIterator<Item = i64>,
{
    let mut ids: Vec<i64> = member_ids.into_iter().collect();
    ids.sort_unstable();
    let joined = ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(";");
    fnv1a64_hex(&joined)
}

/// Synthetic ledger id for a grouping known only by its legacy `Key` (set name).
///
/// Shaped to satisfy the identity validity predicate so migrated history survives
/// the post-load filter: `legacy-` followed by the digest of `legacy:<name>`.
pub fn legacy_set_id(set_name: &str) -> String {
    format!(
        "{}{}",
        LEGACY_ID_PREFIX,
        fnv1a64_hex(&format!("{}{}", LEGACY_KEY_PREFIX, set_name))
    )
}
