//! CSV serialization of normalized batches

use crate::error::{Error, Result};
use crate::input::CsvTable;
use crate::types::{NormalizedBatch, OutputRow};
use std::io::Write;

/// Header prefix of the image columns (`image_url_1`, `image_url_2`, ...)
pub const IMAGE_COLUMN_PREFIX: &str = "image_url_";

/// Header row: the identifier column followed by `width` image columns
pub fn header(id_column: &str, width: usize) -> Vec<String> {
    std::iter::once(id_column.to_string())
        .chain(image_headers(width))
        .collect()
}

fn image_headers(width: usize) -> impl Iterator<Item = String> {
    (1..=width).map(|i| format!("{IMAGE_COLUMN_PREFIX}{i}"))
}

/// Write `rows` as CSV with exactly `1 + width` fields per record
///
/// Rows with fewer slots are padded with empty fields and rows with more are
/// cut, so the output is rectangular even for hand-built rows.
pub fn write_csv<W: Write>(
    writer: W,
    rows: &[OutputRow],
    width: usize,
    id_column: &str,
) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(header(id_column, width))?;

    for row in rows {
        let slots = (0..width).map(|i| row.images.get(i).map(String::as_str).unwrap_or(""));
        csv_writer.write_record(std::iter::once(row.id.as_str()).chain(slots))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Serialize rows into an in-memory CSV document
///
/// Nothing is returned unless the whole document was written.
pub fn to_csv_bytes(rows: &[OutputRow], width: usize, id_column: &str) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, rows, width, id_column)?;
    Ok(buffer)
}

impl NormalizedBatch {
    /// Serialize this batch as a CSV document
    pub fn to_csv(&self, id_column: &str) -> Result<Vec<u8>> {
        to_csv_bytes(&self.rows, self.width, id_column)
    }
}

/// Write `table` back out with `width` image columns appended to every row
///
/// `batch` must come from normalizing `table.identifiers()`: its rows are
/// matched, in order, to the table rows that carry an identifier. Rows with a
/// blank identifier get empty image cells.
pub fn write_enriched_csv<W: Write>(
    writer: W,
    table: &CsvTable,
    batch: &NormalizedBatch,
) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    let width = batch.width;
    csv_writer.write_record(table.headers.iter().cloned().chain(image_headers(width)))?;

    let mut normalized = batch.rows.iter();
    for row in &table.rows {
        let images: &[String] = match &row.identifier {
            Some(identifier) => {
                let output = normalized.next().filter(|o| &o.id == identifier).ok_or_else(|| {
                    Error::Other(format!("no normalized row for identifier '{identifier}'"))
                })?;
                &output.images
            }
            None => &[],
        };

        let slots = (0..width).map(|i| images.get(i).map(String::as_str).unwrap_or(""));
        csv_writer.write_record(row.fields.iter().map(String::as_str).chain(slots))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Serialize an enriched table into an in-memory CSV document
pub fn to_enriched_csv_bytes(table: &CsvTable, batch: &NormalizedBatch) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_enriched_csv(&mut buffer, table, batch)?;
    Ok(buffer)
}
