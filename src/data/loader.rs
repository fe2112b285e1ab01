use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;

use super::model::{Dataset, Value, COUNTER_COLUMNS, DATE, TIME, TIMESTAMP_FORMAT};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Knobs for [`load_reader`] and friends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Log one line per column name that had surrounding whitespace stripped.
    pub verbose: bool,
    /// Field delimiter, `,` by default.
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            delimiter: b',',
        }
    }
}

impl LoadOptions {
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a turnstile file from disk.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Dataset> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("loading {}", path.display());
    load_reader(file, options)
}

pub fn load_str(text: &str, options: &LoadOptions) -> Result<Dataset> {
    load_reader(text.as_bytes(), options)
}

/// Parse delimited text into a [`Dataset`].
///
/// Layout: one header row, then data rows. Column names are trimmed. `DATE`
/// and `TIME` are required; they are joined and parsed with
/// [`TIMESTAMP_FORMAT`] into the `TIME` column, and `DATE` is dropped.
/// `ENTRIES`/`EXITS` are parsed as non-negative integers. Every other column
/// is kept as text, with empty fields loaded as [`Value::Null`].
pub fn load_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers = normalize_headers(reader.headers()?, options.verbose);
    // Names must be unique before DATE is dropped, or a second DATE survives.
    Dataset::new(headers.iter().map(String::as_str))?;

    let date_idx = position(&headers, DATE)?;
    let time_idx = position(&headers, TIME)?;
    let counter_idx: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| COUNTER_COLUMNS.contains(&h.as_str()))
        .map(|(i, _)| i)
        .collect();

    let mut dataset = Dataset::new(
        headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_idx)
            .map(|(_, h)| h.clone()),
    )?;

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let mut row = Vec::with_capacity(headers.len() - 1);

        for (col_idx, field) in record.iter().enumerate() {
            if col_idx == date_idx {
                continue;
            }
            let value = if col_idx == time_idx {
                let date = record.get(date_idx).unwrap_or("");
                parse_timestamp(date, field, row_no)?
            } else if counter_idx.contains(&col_idx) {
                parse_counter(field, &headers[col_idx], row_no)?
            } else if field.is_empty() {
                Value::Null
            } else {
                Value::Text(field.to_string())
            };
            row.push(value);
        }

        dataset.push_row(row)?;
    }

    log::debug!("loaded {} rows across {} columns", dataset.len(), dataset.columns().len());
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn normalize_headers(raw: &csv::StringRecord, verbose: bool) -> Vec<String> {
    raw.iter()
        .map(|h| {
            let trimmed = h.trim();
            if trimmed != h && verbose {
                log::info!("strip whitespace from column '{trimmed}'");
            }
            trimmed.to_string()
        })
        .collect()
}

fn position(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| Error::MissingColumn(name.to_string()))
}

fn parse_timestamp(date: &str, time: &str, row: usize) -> Result<Value> {
    let combined = format!("{date} {time}");
    NaiveDateTime::parse_from_str(&combined, TIMESTAMP_FORMAT)
        .map(Value::Timestamp)
        .map_err(|source| Error::Timestamp {
            row,
            value: combined,
            source,
        })
}

fn parse_counter(field: &str, column: &str, row: usize) -> Result<Value> {
    match field.trim().parse::<i64>() {
        Ok(n) if n >= 0 => Ok(Value::Integer(n)),
        _ => Err(Error::Counter {
            row,
            column: column.to_string(),
            value: field.to_string(),
        }),
    }
}
