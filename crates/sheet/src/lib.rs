//! Header-keyed CSV sheets.
//!
//! The first record of a sheet names the columns; every following record becomes a [`Row`]
//! mapping column name to cell text.
use std::{
    collections::HashMap,
    fs::{self, File},
    io::Read,
    path::Path,
};

use log::debug;
use thiserror::Error;

/// One record of a sheet, keyed by column name
pub type Row = HashMap<String, String>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("couldn't read sheet: {}", .0)]
    CsvError(#[from] csv::Error),

    #[error("sheet has no header row")]
    NoHeader,

    #[error("io error: {}", .0)]
    IOError(#[from] std::io::Error),

    #[error("sheet text was not valid UTF-8")]
    NotUtf8(#[from] std::string::FromUtf8Error),
}

const BOM: char = '\u{feff}';

/// Parse a sheet. Short records leave their missing cells out of the row, extra cells are
/// dropped. Only unreadable input is an error.
pub fn parse<R: Read>(reader: R) -> Result<Vec<Row>, Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches(BOM).trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(Error::NoHeader);
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .filter(|(h, _)| !h.is_empty())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        rows.push(row);
    }

    debug!("parsed {} rows with columns {:?}", rows.len(), headers);
    Ok(rows)
}

/// Parse the sheet in the given file
pub fn parse_path(path: impl AsRef<Path>) -> Result<Vec<Row>, Error> {
    parse(File::open(path)?)
}

/// Write rows out with the given columns, in that order. Cells a row doesn't have are left
/// empty.
pub fn serialize<S: AsRef<str>>(fields: &[S], rows: &[Row]) -> Result<String, Error> {
    let mut wtr = csv::WriterBuilder::new().from_writer(Vec::new());

    wtr.write_record(fields.iter().map(|f| f.as_ref()))?;
    for row in rows {
        wtr.write_record(
            fields
                .iter()
                .map(|f| row.get(f.as_ref()).map(String::as_str).unwrap_or("")),
        )?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| Error::IOError(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Save sheet text to a file, making its directory if needed.
pub fn save(text: &str, path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    debug!("saved {} bytes to {}", text.len(), path.display());
    Ok(())
}
