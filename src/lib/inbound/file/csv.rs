use crate::domain::models::row::RowRecord;
use anyhow::Context;
use csv::ReaderBuilder;
use std::path::Path;

/// Streams a deck file one row at a time, pairing each field with its header
/// column name. The reader is flexible about field counts so a short or long
/// row reaches classification instead of failing the stream; a field past
/// the header row is named by its 1-based position.
pub struct CsvRowIterator<R: std::io::Read> {
    records: csv::StringRecordsIntoIter<R>,
    headers: Vec<String>,
    file_name: String,
    line: u64,
}

impl CsvRowIterator<std::fs::File> {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown file")
            .to_string();
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open deck file: {}", file_name))?;
        Self::from_reader(file, file_name)
    }
}

impl<R: std::io::Read> CsvRowIterator<R> {
    pub fn from_reader(reader: R, file_name: impl Into<String>) -> anyhow::Result<Self> {
        let file_name = file_name.into();
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr
            .headers()
            .with_context(|| format!("failed to read header row of {}", file_name))?
            .iter()
            .map(str::to_owned)
            .collect();
        Ok(Self {
            records: rdr.into_records(),
            headers,
            file_name,
            line: 0,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl<R: std::io::Read> Iterator for CsvRowIterator<R> {
    type Item = anyhow::Result<RowRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.records.next()? {
            Ok(record) => {
                self.line += 1;
                let columns = record
                    .iter()
                    .enumerate()
                    .map(|(idx, value)| {
                        let name = self
                            .headers
                            .get(idx)
                            .cloned()
                            .unwrap_or_else(|| (idx + 1).to_string());
                        (name, value.to_string())
                    })
                    .collect();
                Some(Ok(RowRecord::new(self.line, columns)))
            }
            Err(e) => Some(Err(anyhow::anyhow!(
                "failed to decode row {} of {}: {}",
                self.line + 1,
                self.file_name,
                e
            ))),
        }
    }
}
