//! Price data access port trait.

use crate::domain::error::TribarError;
use crate::domain::time_series::TimeSeries;

/// Close prices for one symbol, with an upstream volatility estimate when the
/// source provides one. Both series share the same timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceData {
    pub prices: TimeSeries<Option<f64>>,
    pub volatility: Option<TimeSeries<Option<f64>>>,
}

pub trait DataPort {
    fn fetch_series(&self, symbol: &str) -> Result<PriceData, TribarError>;

    fn list_symbols(&self) -> Result<Vec<String>, TribarError>;
}
