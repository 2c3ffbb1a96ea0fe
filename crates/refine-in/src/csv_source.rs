//! Local CSV ticket source
//!
//! Expects a header row with at least `id`, `summary`, `description`,
//! `reporter` and `account_id`. A `key` column is used when `id` is empty.
//! An optional `present_fields` column lists the populated fields per row;
//! without it the set is computed from the row itself.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use refine_core::data_model::fields;
use refine_core::{RefineError, Ticket};

use crate::source::TicketSource;

pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read tickets from any CSV reader
    pub fn read_from<R: std::io::Read>(reader: R) -> Result<Vec<Ticket>, RefineError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| RefineError::SourceError(format!("Failed to read CSV header: {}", e)))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut tickets = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                RefineError::SourceError(format!("Failed to read CSV row {}: {}", row + 1, e))
            })?;

            let mut raw: BTreeMap<String, String> = headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| (header.clone(), value.to_string()))
                .collect();

            let present = raw
                .remove(fields::PRESENT_FIELDS)
                .map(|value| parse_present_fields(&value).into_iter().collect());

            tickets.push(Ticket::from_raw(raw, present));
        }

        Ok(tickets)
    }
}

impl TicketSource for CsvSource {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn fetch(&self) -> Result<Vec<Ticket>, RefineError> {
        let file = std::fs::File::open(&self.path).map_err(|e| {
            RefineError::SourceError(format!("Failed to open {}: {}", self.path.display(), e))
        })?;
        Self::read_from(file)
    }
}

/// Parse a `present_fields` cell.
///
/// Accepts list text as written by data tools (`['summary', 'description']`)
/// as well as plain `summary;description` or `summary,description`.
pub fn parse_present_fields(value: &str) -> Vec<String> {
    value
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split([',', ';'])
        .map(|name| name.trim().trim_matches(|c: char| c == '\'' || c == '"').trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
