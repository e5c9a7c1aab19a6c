//! CSV decoding
//!
//! Raw bytes are first split into rows with the `csv` crate, then rows are
//! mapped positionally onto [`Envio`] fields. The mapping is lenient: short
//! rows yield empty strings for the missing columns and never fail.

use crate::domain::{Envio, Result};

/// Expected header columns, in positional order
pub const CSV_COLUMNS: [&str; 4] = ["id_envio", "cliente", "direccion", "estado"];

/// Parses raw CSV bytes into rows of string cells
///
/// Rows may have differing lengths. Blank lines are skipped by the reader.
///
/// # Errors
///
/// Returns [`EcoError::MalformedCsv`](crate::domain::EcoError::MalformedCsv)
/// if the payload is not valid UTF-8 CSV.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Maps CSV rows onto shipment records
///
/// Row 0 is the header and is discarded. Columns 0..3 map to
/// `id, customer, address, status`; cells are trimmed and missing cells become
/// empty strings. File order is preserved and duplicates are kept.
///
/// # Examples
///
/// ```
/// use ecologistics::core::codec::decode_csv;
///
/// let rows = vec![
///     vec!["id_envio".to_string(), "cliente".into(), "direccion".into(), "estado".into()],
///     vec!["S2".to_string(), "Bob".into()],
/// ];
/// let envios = decode_csv(&rows);
/// assert_eq!(envios.len(), 1);
/// assert_eq!(envios[0].customer, "Bob");
/// assert_eq!(envios[0].status, "");
/// ```
pub fn decode_csv(rows: &[Vec<String>]) -> Vec<Envio> {
    rows.iter()
        .skip(1)
        .map(|row| Envio::new(cell(row, 0), cell(row, 1), cell(row, 2), cell(row, 3)))
        .collect()
}

fn cell(row: &[String], idx: usize) -> String {
    row.get(idx)
        .map(|c| c.trim().to_string())
        .unwrap_or_default()
}
