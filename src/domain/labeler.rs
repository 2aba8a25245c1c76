//! Triple-barrier labeling.
//!
//! For each entry position the forward window of `holding_period` bars is
//! scanned for the first close at or above the profit target and, separately,
//! the first close at or below the stop loss. The earlier touch wins; on equal
//! offsets the stop loss wins. If neither barrier is touched the row exits at
//! the vertical barrier with the return of the last close in the window.
//!
//! The last `holding_period` rows never have a full window and are always
//! undefined, as are rows whose volatility is missing or zero.

use crate::domain::barrier::{BarrierConfig, Barriers};
use crate::domain::error::TribarError;
use crate::domain::label::{Barrier, Label, LabelRecord, Outcome};
use crate::domain::time_series::TimeSeries;
use rayon::prelude::*;

/// Labels every position of `prices`, sequentially.
///
/// Output has the same length and timestamps as `prices`.
pub fn label_series(
    prices: &TimeSeries<Option<f64>>,
    volatility: &TimeSeries<Option<f64>>,
    config: &BarrierConfig,
) -> Result<Vec<LabelRecord>, TribarError> {
    check_inputs(prices, volatility, config)?;
    let records = (0..prices.len())
        .map(|i| label_position(prices, volatility, config, i))
        .collect::<Result<Vec<_>, _>>()?;
    log_result(&records, config);
    Ok(records)
}

/// Same as [`label_series`], with positions evaluated on the rayon pool.
pub fn label_series_par(
    prices: &TimeSeries<Option<f64>>,
    volatility: &TimeSeries<Option<f64>>,
    config: &BarrierConfig,
) -> Result<Vec<LabelRecord>, TribarError> {
    check_inputs(prices, volatility, config)?;
    let records = (0..prices.len())
        .into_par_iter()
        .map(|i| label_position(prices, volatility, config, i))
        .collect::<Result<Vec<_>, _>>()?;
    log_result(&records, config);
    Ok(records)
}

fn check_inputs(
    prices: &TimeSeries<Option<f64>>,
    volatility: &TimeSeries<Option<f64>>,
    config: &BarrierConfig,
) -> Result<(), TribarError> {
    config.validate()?;
    prices.check_aligned(volatility)
}

fn log_result(records: &[LabelRecord], config: &BarrierConfig) {
    let defined = records.iter().filter(|r| r.is_defined()).count();
    log::debug!(
        "labeled {} rows ({} defined) with holding_period={} profit_mult={} stop_mult={}",
        records.len(),
        defined,
        config.holding_period,
        config.profit_mult,
        config.stop_mult
    );
}

fn defined_value(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn label_position(
    prices: &TimeSeries<Option<f64>>,
    volatility: &TimeSeries<Option<f64>>,
    config: &BarrierConfig,
    i: usize,
) -> Result<LabelRecord, TribarError> {
    let timestamps = prices.timestamps();
    let entry_time = timestamps[i];
    let hp = config.holding_period;

    if hp >= prices.len() - i {
        return Ok(LabelRecord::undefined(entry_time));
    }

    let entry_price = defined_value(prices.values()[i]);
    let vol = defined_value(volatility.values()[i]);
    let (entry_price, vol) = match (entry_price, vol) {
        (Some(p), Some(v)) if v != 0.0 => (p, v),
        _ => return Ok(LabelRecord::undefined(entry_time)),
    };

    let barriers = Barriers::compute(config, entry_price, vol, entry_time)?;
    let window = &prices.values()[i + 1..=i + hp];

    let profit_hit = first_offset(window, |p| p >= barriers.profit_target);
    let loss_hit = first_offset(window, |p| p <= barriers.stop_loss);

    let hit_at = |offset: usize| timestamps[i + 1 + offset];
    let profit = |offset: usize| Outcome {
        label: Label::Oversold,
        realized_return: (barriers.profit_target - entry_price) / entry_price,
        hit_time: hit_at(offset),
        barrier: Barrier::Upper,
    };
    let loss = |offset: usize| Outcome {
        label: Label::Overbought,
        realized_return: (barriers.stop_loss - entry_price) / entry_price,
        hit_time: hit_at(offset),
        barrier: Barrier::Lower,
    };

    let outcome = match (profit_hit, loss_hit) {
        (Some(p), Some(l)) if p < l => profit(p),
        (Some(_), Some(l)) => loss(l),
        (Some(p), None) => profit(p),
        (None, Some(l)) => loss(l),
        (None, None) => {
            let Some(exit_price) = window.last().copied().and_then(defined_value) else {
                return Ok(LabelRecord::undefined(entry_time));
            };
            let realized_return = (exit_price - entry_price) / entry_price;
            Outcome {
                label: time_limit_label(realized_return, config),
                realized_return,
                hit_time: barriers.vertical,
                barrier: Barrier::Vertical,
            }
        }
    };

    Ok(LabelRecord::defined(entry_time, outcome))
}

/// Offset of the first defined price in `window` satisfying `touched`.
fn first_offset(window: &[Option<f64>], touched: impl Fn(f64) -> bool) -> Option<usize> {
    window
        .iter()
        .position(|p| matches!(p, Some(price) if touched(*price)))
}

fn time_limit_label(realized_return: f64, config: &BarrierConfig) -> Label {
    if !config.apply_min_ret_threshold || realized_return.abs() < config.min_ret_threshold {
        Label::Neutral
    } else if realized_return > 0.0 {
        Label::Oversold
    } else {
        Label::Overbought
    }
}
