//! Rolling volatility of daily returns.
//!
//! RET[i] = (C[i] - C[i-1]) / C[i-1]
//! VOL(n)[i] = sample standard deviation (n-1 denominator) of RET[i-n+1..=i]
//! Warmup: first n rows are undefined (one for the return, n-1 for the window).
//! Any undefined return inside a window makes that row undefined.

use crate::domain::error::TribarError;
use crate::domain::time_series::TimeSeries;

pub fn daily_returns(prices: &TimeSeries<Option<f64>>) -> Vec<Option<f64>> {
    let values = prices.values();
    let mut returns = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        let ret = if i == 0 {
            None
        } else {
            match (values[i - 1], values[i]) {
                (Some(prev), Some(cur)) if prev != 0.0 => Some((cur - prev) / prev),
                _ => None,
            }
        };
        returns.push(ret.filter(|r| r.is_finite()));
    }
    returns
}

pub fn rolling_volatility(
    prices: &TimeSeries<Option<f64>>,
    window: usize,
) -> Result<TimeSeries<Option<f64>>, TribarError> {
    if window < 2 {
        return Err(TribarError::InvalidConfig {
            field: "volatility_window".to_string(),
            reason: "must be at least 2".to_string(),
        });
    }

    let returns = daily_returns(prices);
    let mut values = Vec::with_capacity(returns.len());

    for i in 0..returns.len() {
        let value = if i + 1 >= window {
            sample_stddev(&returns[i + 1 - window..=i])
        } else {
            None
        };
        values.push(value);
    }

    TimeSeries::new(prices.timestamps().to_vec(), values)
}

fn sample_stddev(window: &[Option<f64>]) -> Option<f64> {
    let defined: Vec<f64> = window.iter().copied().collect::<Option<Vec<_>>>()?;
    let n = defined.len() as f64;
    let mean = defined.iter().sum::<f64>() / n;
    let variance = defined
        .iter()
        .map(|r| {
            let diff = r - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1.0);
    Some(variance.sqrt())
}
