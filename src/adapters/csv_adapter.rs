//! CSV price reader and label writer.
//!
//! Input files are named `<SYMBOL>.csv` and carry a `date` column
//! (`YYYY-MM-DD`), a `close` column and an optional `volatility` column.
//! Columns are located by header name, case-insensitively. Empty and `NaN`
//! cells read as undefined; infinite values are rejected.

use crate::domain::error::TribarError;
use crate::domain::label::LabelRecord;
use crate::domain::time_series::TimeSeries;
use crate::ports::data_port::{DataPort, PriceData};
use crate::ports::label_port::LabelPort;
use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    pub fn read_file(path: &Path) -> Result<PriceData, TribarError> {
        let content = fs::read_to_string(path).map_err(|e| TribarError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        parse_prices(&content).map_err(|e| match e {
            TribarError::Data { reason } => TribarError::Data {
                reason: format!("{}: {}", path.display(), reason),
            },
            other => other,
        })
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn parse_cell(value: Option<&str>, column: &str, line: u64) -> Result<Option<f64>, TribarError> {
    let raw = value.map(str::trim).unwrap_or("");
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let value = raw.parse::<f64>().map_err(|e| TribarError::Data {
        reason: format!("invalid {} value {:?} on line {}: {}", column, raw, line, e),
    })?;
    if !value.is_finite() {
        return Err(TribarError::Data {
            reason: format!("non-finite {} value {:?} on line {}", column, raw, line),
        });
    }
    Ok(Some(value))
}

pub fn parse_prices(content: &str) -> Result<PriceData, TribarError> {
    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let headers = rdr
        .headers()
        .map_err(|e| TribarError::Data {
            reason: format!("CSV header error: {}", e),
        })?
        .clone();

    let date_idx = column_index(&headers, "date").ok_or_else(|| TribarError::Data {
        reason: "missing date column".into(),
    })?;
    let close_idx = column_index(&headers, "close").ok_or_else(|| TribarError::Data {
        reason: "missing close column".into(),
    })?;
    let vol_idx = column_index(&headers, "volatility");

    let mut dates = Vec::new();
    let mut closes = Vec::new();
    let mut vols = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| TribarError::Data {
            reason: format!("CSV parse error: {}", e),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let date_str = record.get(date_idx).ok_or_else(|| TribarError::Data {
            reason: format!("missing date on line {}", line),
        })?;
        let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
            TribarError::Data {
                reason: format!("invalid date {:?} on line {}: {}", date_str, line, e),
            }
        })?;

        dates.push(date);
        closes.push(parse_cell(record.get(close_idx), "close", line)?);
        if let Some(idx) = vol_idx {
            vols.push(parse_cell(record.get(idx), "volatility", line)?);
        }
    }

    let volatility = match vol_idx {
        Some(_) => Some(TimeSeries::new(dates.clone(), vols)?),
        None => None,
    };
    let prices = TimeSeries::new(dates, closes)?;

    Ok(PriceData { prices, volatility })
}

impl DataPort for CsvAdapter {
    fn fetch_series(&self, symbol: &str) -> Result<PriceData, TribarError> {
        let path = self.csv_path(symbol);
        log::debug!("reading {}", path.display());
        Self::read_file(&path)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TribarError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| TribarError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| TribarError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

/// Writes `symbol,date,label,realized_return,hit_time,barrier` rows. The
/// label column holds the signed class (1 / 0 / -1); undefined rows have
/// empty label, return, hit time and barrier cells.
pub struct CsvLabelWriter<W: Write> {
    writer: csv::Writer<W>,
    header_written: bool,
}

impl<W: Write> CsvLabelWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
            header_written: false,
        }
    }

    pub fn into_inner(self) -> Result<W, TribarError> {
        self.writer.into_inner().map_err(|e| TribarError::Io(e.into_error()))
    }
}

fn csv_error(e: csv::Error) -> TribarError {
    TribarError::Data {
        reason: format!("CSV write error: {}", e),
    }
}

impl<W: Write> LabelPort for CsvLabelWriter<W> {
    fn write(&mut self, symbol: &str, records: &[LabelRecord]) -> Result<(), TribarError> {
        if !self.header_written {
            self.writer
                .write_record([
                    "symbol",
                    "date",
                    "label",
                    "realized_return",
                    "hit_time",
                    "barrier",
                ])
                .map_err(csv_error)?;
            self.header_written = true;
        }

        for record in records {
            let date = record.timestamp.format("%Y-%m-%d").to_string();
            let row = match record.outcome {
                Some(o) => [
                    symbol.to_string(),
                    date,
                    o.label.as_signed().to_string(),
                    o.realized_return.to_string(),
                    o.hit_time.format("%Y-%m-%d").to_string(),
                    o.barrier.to_string(),
                ],
                None => [
                    symbol.to_string(),
                    date,
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                ],
            };
            self.writer.write_record(&row).map_err(csv_error)?;
        }

        self.writer.flush()?;
        Ok(())
    }
}
