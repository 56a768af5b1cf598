use crate::domain::models::row::{InvalidReason, RowClass, RowRecord, classify_row};
use crate::inbound::file::CsvRowIterator;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRow {
    pub record: RowRecord,
    pub reason: InvalidReason,
}

#[derive(Debug, Default)]
pub struct IngestResult {
    pub valid: Vec<RowRecord>,
    pub invalid: Vec<InvalidRow>,
}

impl IngestResult {
    pub fn total_rows(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }
}

/// Streams the deck file row by row and classifies each row independently.
/// A decode error anywhere in the stream aborts the whole ingest; rows that
/// merely fail classification land in the invalid list and the stream
/// continues.
pub fn ingest_deck_file(path: &Path) -> anyhow::Result<IngestResult> {
    collect_rows(CsvRowIterator::from_path(path)?)
}

pub fn collect_rows<R: std::io::Read>(rows: CsvRowIterator<R>) -> anyhow::Result<IngestResult> {
    let mut result = IngestResult::default();
    for row in rows {
        let record = row?;
        match classify_row(&record) {
            RowClass::Valid => result.valid.push(record),
            RowClass::Invalid(reason) => result.invalid.push(InvalidRow { record, reason }),
        }
    }
    Ok(result)
}
