#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use tribar::domain::error::TribarError;
use tribar::domain::label::LabelRecord;
use tribar::domain::time_series::TimeSeries;
use tribar::ports::data_port::{DataPort, PriceData};
use tribar::ports::label_port::LabelPort;

pub struct MockDataPort {
    pub data: HashMap<String, PriceData>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, symbol: &str, data: PriceData) -> Self {
        self.data.insert(symbol.to_string(), data);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(&self, symbol: &str) -> Result<PriceData, TribarError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TribarError::Data {
                reason: reason.clone(),
            });
        }
        self.data
            .get(symbol)
            .cloned()
            .ok_or_else(|| TribarError::Data {
                reason: format!("no data for {}", symbol),
            })
    }

    fn list_symbols(&self) -> Result<Vec<String>, TribarError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

/// Collects written records per symbol.
#[derive(Default)]
pub struct MemorySink {
    pub written: Vec<(String, Vec<LabelRecord>)>,
}

impl LabelPort for MemorySink {
    fn write(&mut self, symbol: &str, records: &[LabelRecord]) -> Result<(), TribarError> {
        self.written.push((symbol.to_string(), records.to_vec()));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive calendar days starting at `start`.
pub fn daily_dates(start: &str, count: usize) -> Vec<NaiveDate> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect()
}

pub fn make_series(start: &str, values: &[Option<f64>]) -> TimeSeries<Option<f64>> {
    TimeSeries::new(daily_dates(start, values.len()), values.to_vec()).unwrap()
}

pub fn make_prices(start: &str, closes: &[f64]) -> TimeSeries<Option<f64>> {
    let values: Vec<Option<f64>> = closes.iter().map(|&c| Some(c)).collect();
    make_series(start, &values)
}

/// The eight-bar series with a one-bar volatility warm-up.
pub fn reference_data() -> PriceData {
    let prices = make_prices(
        "2024-01-01",
        &[100.0, 101.0, 103.0, 108.0, 112.0, 95.0, 90.0, 85.0],
    );
    let mut vol = vec![Some(0.01); 8];
    vol[0] = None;
    PriceData {
        prices,
        volatility: Some(make_series("2024-01-01", &vol)),
    }
}

/// A saw-tooth close series long enough to exercise the rolling volatility.
pub fn generate_closes(count: usize, start_price: f64) -> Vec<f64> {
    (0..count)
        .map(|i| start_price + ((i * 7) % 11) as f64 - 5.0 + i as f64 * 0.1)
        .collect()
}
