//! Delimited-text persistence for the ledger.

use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use setaudit_types::CORE_COLUMNS;
use tracing::{debug, info, instrument, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::schema::{shadowed_headers, LedgerSchema};
use crate::store::{LedgerStore, LoadOutcome};

const BOM: char = '\u{feff}';

fn decode_cells(record: &csv::ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|cell| String::from_utf8_lossy(cell).into_owned())
        .collect()
}

fn is_blank_record(cells: &[String]) -> bool {
    cells.iter().all(|c| c.trim().is_empty())
}

fn reader_for<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source)
}

fn parse_headers(cells: Vec<String>) -> Vec<String> {
    cells
        .into_iter()
        .map(|h| h.trim_start_matches(BOM).trim().to_string())
        .collect()
}

#[derive(Debug, Default)]
struct LoadStats {
    loaded: usize,
    skipped: usize,
    invalid: usize,
    duplicate: usize,
    undecodable: usize,
}

impl LedgerStore {
    /// Load a ledger, treating every read failure as an empty ledger.
    ///
    /// A missing or empty file yields an empty store with the core columns.
    /// Legacy files are migrated in memory.
    pub fn load(path: &Path) -> LedgerStore {
        match Self::try_load(path) {
            Ok(store) => store,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unreadable ledger, starting empty");
                LedgerStore::new()
            }
        }
    }

    /// Load a ledger, surfacing I/O failures other than a missing file.
    pub fn try_load(path: &Path) -> LedgerResult<LedgerStore> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No ledger file, starting empty");
                return Ok(LedgerStore::new());
            }
            Err(e) => return Err(LedgerError::io(path, e)),
        };
        Self::from_reader(bytes.as_slice())
    }

    /// Parse a ledger from any byte source.
    pub fn from_reader<R: Read>(source: R) -> LedgerResult<LedgerStore> {
        let mut store = LedgerStore::new();
        let mut reader = reader_for(source);
        let mut records = reader.byte_records();

        let headers = loop {
            match records.next() {
                None => return Ok(store),
                Some(record) => {
                    let cells = decode_cells(&record?);
                    if !is_blank_record(&cells) {
                        break parse_headers(cells);
                    }
                }
            }
        };

        let shadowed = shadowed_headers(&headers);
        if !shadowed.is_empty() {
            warn!(columns = ?shadowed, "Ledger header repeats columns ignoring case; kept leftmost");
        }

        let schema = LedgerSchema::detect(&headers);
        store.ensure_columns(schema.retained_headers(&headers));

        let mut stats = LoadStats::default();
        for record in records {
            let cells = match record {
                Ok(record) => decode_cells(&record),
                Err(e) => {
                    warn!(error = %e, "Skipping undecodable ledger record");
                    stats.undecodable += 1;
                    continue;
                }
            };
            if is_blank_record(&cells) {
                continue;
            }
            let Some(fields) = schema.decode(&headers, &cells) else {
                stats.skipped += 1;
                continue;
            };
            match store.insert_loaded(fields) {
                LoadOutcome::Inserted => stats.loaded += 1,
                LoadOutcome::InvalidId => stats.invalid += 1,
                LoadOutcome::Duplicate => stats.duplicate += 1,
            }
        }

        if stats.duplicate > 0 {
            warn!(duplicates = stats.duplicate, "Ledger repeats set ids; kept first occurrence");
        }

        match schema {
            LedgerSchema::Legacy => info!(
                migrated = stats.loaded,
                skipped = stats.skipped,
                invalid = stats.invalid,
                "Migrated legacy ledger"
            ),
            LedgerSchema::Current => debug!(
                rows = stats.loaded,
                invalid = stats.invalid,
                undecodable = stats.undecodable,
                "Loaded ledger"
            ),
        }

        Ok(store)
    }

    /// Write the ledger in canonical form to any sink.
    pub fn to_writer<W: Write>(&self, sink: W) -> LedgerResult<()> {
        let headers = self.headers();
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(sink);

        writer.write_record(&headers)?;
        for row in self.rows_in_save_order() {
            writer.write_record(headers.iter().map(|h| row.cell(h)))?;
        }
        writer
            .flush()
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;
        Ok(())
    }

    /// Persist the ledger.
    ///
    /// Creates the parent directory if needed and replaces the file atomically
    /// (write `.tmp`, then rename). Write failures propagate.
    #[instrument(skip(self, path), fields(path = %path.display(), rows = self.len()))]
    pub fn save(&self, path: &Path) -> LedgerResult<()> {
        let mut buffer = Vec::new();
        self.to_writer(&mut buffer)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| LedgerError::io(parent, e))?;
        }

        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, &buffer).map_err(|e| LedgerError::io(&tmp_path, e))?;
        fs::rename(&tmp_path, path).map_err(|e| LedgerError::io(path, e))?;

        debug!("Ledger saved");
        Ok(())
    }
}

/// Header row of a ledger file, or the core columns when the file is absent,
/// empty, or unreadable.
pub fn read_headers_or_defaults(path: &Path) -> Vec<String> {
    let defaults = || -> Vec<String> { CORE_COLUMNS.iter().map(|c| c.to_string()).collect() };

    let Ok(file) = fs::File::open(path) else {
        return defaults();
    };
    let mut reader = reader_for(file);
    for record in reader.byte_records() {
        let Ok(record) = record else {
            return defaults();
        };
        let cells = decode_cells(&record);
        if is_blank_record(&cells) {
            continue;
        }
        return parse_headers(cells)
            .into_iter()
            .filter(|h| !h.is_empty())
            .collect();
    }
    defaults()
}
