//! Identifier ingestion
//!
//! Every reader trims identifiers and drops blank ones. None of them fail on an
//! empty result; the normalizer rejects empty batches.

use crate::error::{Error, Result};
use crate::types::Identifier;
use std::io::Read;
use std::path::Path;

/// Parse newline-delimited text, one identifier per line
pub fn identifiers_from_lines(text: &str) -> Vec<Identifier> {
    text.lines().filter_map(Identifier::parse).collect()
}

/// Parse a list of raw strings, skipping blank entries
pub fn identifiers_from_list<I, S>(items: I) -> Vec<Identifier>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .filter_map(|item| Identifier::parse(item.as_ref()))
        .collect()
}

/// Parse a JSON array of identifier strings; `null` and blank entries are skipped
pub fn identifiers_from_json(body: &[u8]) -> Result<Vec<Identifier>> {
    let items: Vec<Option<String>> = serde_json::from_slice(body)
        .map_err(|e| Error::InvalidInput(format!("expected a JSON array of strings: {e}")))?;
    Ok(identifiers_from_list(items.into_iter().flatten()))
}

/// Decode an uploaded text blob (UTF-8, optional BOM) into identifiers
pub fn identifiers_from_upload(bytes: &[u8]) -> Result<Vec<Identifier>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::InvalidInput(format!("uploaded file is not valid UTF-8: {e}")))?;
    Ok(identifiers_from_lines(text.trim_start_matches('\u{feff}')))
}

/// A CSV input document kept whole, so its columns can be written back out
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvTable {
    /// Header row as read (a leading BOM is dropped)
    pub headers: Vec<String>,
    /// Data rows in file order
    pub rows: Vec<CsvTableRow>,
}

/// One data row of a [`CsvTable`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvTableRow {
    /// Identifier from the selected column, or None when that cell is blank
    pub identifier: Option<Identifier>,
    /// Every field of the row, padded or cut to the header length
    pub fields: Vec<String>,
}

impl CsvTable {
    /// Parse a CSV document with a header row, taking identifiers from `column`
    ///
    /// Rows whose identifier cell is blank are kept; they are not looked up.
    pub fn from_reader<R: Read>(reader: R, column: &str) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    h.trim_start_matches('\u{feff}').to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        let index = headers.iter().position(|h| h == column).ok_or_else(|| {
            Error::InvalidInput(format!(
                "column '{column}' not found in CSV header [{}]",
                headers.join(", ")
            ))
        })?;

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
            fields.resize(headers.len(), String::new());

            rows.push(CsvTableRow {
                identifier: Identifier::parse(&fields[index]),
                fields,
            });
        }

        Ok(Self { headers, rows })
    }

    /// Identifiers of the rows that have one, in file order
    pub fn identifiers(&self) -> Vec<Identifier> {
        self.rows
            .iter()
            .filter_map(|row| row.identifier.clone())
            .collect()
    }
}

/// Read newline-delimited identifiers from a file
pub async fn read_identifier_file(path: &Path) -> Result<Vec<Identifier>> {
    let bytes = tokio::fs::read(path).await?;
    let identifiers = identifiers_from_upload(&bytes)?;

    tracing::info!(
        path = %path.display(),
        count = identifiers.len(),
        "Read identifiers"
    );
    Ok(identifiers)
}

/// Read a CSV file whose `column` holds the identifiers
pub async fn read_csv_table(path: &Path, column: &str) -> Result<CsvTable> {
    let bytes = tokio::fs::read(path).await?;
    let table = CsvTable::from_reader(bytes.as_slice(), column)?;

    tracing::info!(
        path = %path.display(),
        column,
        rows = table.rows.len(),
        "Read CSV table"
    );
    Ok(table)
}
