//! Barrier configuration and per-row barrier levels.

use crate::domain::error::TribarError;
use chrono::{Days, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarrierConfig {
    /// Forward window in bars, and the vertical barrier offset in calendar days.
    pub holding_period: usize,
    pub profit_mult: f64,
    pub stop_mult: f64,
    pub min_ret_threshold: f64,
    /// Reclassify time-limit exits by `min_ret_threshold`. Off unless set.
    pub apply_min_ret_threshold: bool,
}

impl BarrierConfig {
    pub fn new(holding_period: usize, profit_mult: f64, stop_mult: f64) -> Self {
        Self {
            holding_period,
            profit_mult,
            stop_mult,
            min_ret_threshold: 0.0,
            apply_min_ret_threshold: false,
        }
    }

    pub fn with_min_ret_threshold(mut self, threshold: f64) -> Self {
        self.min_ret_threshold = threshold;
        self.apply_min_ret_threshold = true;
        self
    }

    pub fn validate(&self) -> Result<(), TribarError> {
        if self.holding_period == 0 {
            return Err(invalid("holding_period", "must be at least 1"));
        }
        if !(self.profit_mult.is_finite() && self.profit_mult > 0.0) {
            return Err(invalid("profit_mult", "must be a positive number"));
        }
        if !(self.stop_mult.is_finite() && self.stop_mult > 0.0) {
            return Err(invalid("stop_mult", "must be a positive number"));
        }
        if !(self.min_ret_threshold.is_finite() && self.min_ret_threshold >= 0.0) {
            return Err(invalid("min_ret_threshold", "must be a non-negative number"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> TribarError {
    TribarError::InvalidConfig {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// The three exit conditions for a single entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barriers {
    pub profit_target: f64,
    pub stop_loss: f64,
    pub vertical: NaiveDate,
}

impl Barriers {
    /// profit = entry * (1 + profit_mult * vol), stop = entry * (1 - stop_mult * vol),
    /// vertical = entry_time + holding_period calendar days.
    pub fn compute(
        config: &BarrierConfig,
        entry_price: f64,
        vol: f64,
        entry_time: NaiveDate,
    ) -> Result<Self, TribarError> {
        let vertical = entry_time
            .checked_add_days(Days::new(config.holding_period as u64))
            .ok_or_else(|| TribarError::InvalidInput {
                reason: format!(
                    "vertical barrier overflows the calendar: {} + {} days",
                    entry_time, config.holding_period
                ),
            })?;
        Ok(Self {
            profit_target: entry_price * (1.0 + config.profit_mult * vol),
            stop_loss: entry_price * (1.0 - config.stop_mult * vol),
            vertical,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn validate_accepts_positive_values() {
        assert!(BarrierConfig::new(3, 2.0, 2.0).validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_holding_period() {
        let err = BarrierConfig::new(0, 2.0, 2.0).validate().unwrap_err();
        assert!(matches!(err, TribarError::InvalidConfig { field, .. } if field == "holding_period"));
    }

    #[test]
    fn validate_rejects_non_positive_multipliers() {
        let err = BarrierConfig::new(3, 0.0, 2.0).validate().unwrap_err();
        assert!(matches!(err, TribarError::InvalidConfig { field, .. } if field == "profit_mult"));

        let err = BarrierConfig::new(3, 2.0, -1.0).validate().unwrap_err();
        assert!(matches!(err, TribarError::InvalidConfig { field, .. } if field == "stop_mult"));

        let err = BarrierConfig::new(3, f64::NAN, 2.0).validate().unwrap_err();
        assert!(matches!(err, TribarError::InvalidConfig { field, .. } if field == "profit_mult"));
    }

    #[test]
    fn validate_rejects_negative_threshold() {
        let config = BarrierConfig::new(3, 2.0, 2.0).with_min_ret_threshold(-0.01);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, TribarError::InvalidConfig { field, .. } if field == "min_ret_threshold"));
    }

    #[test]
    fn threshold_disabled_by_default() {
        let config = BarrierConfig::new(3, 2.0, 2.0);
        assert!(!config.apply_min_ret_threshold);
        assert!(config.with_min_ret_threshold(0.01).apply_min_ret_threshold);
    }

    #[test]
    fn compute_levels() {
        let config = BarrierConfig::new(3, 2.0, 2.0);
        let entry = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let barriers = Barriers::compute(&config, 101.0, 0.01, entry).unwrap();

        assert_relative_eq!(barriers.profit_target, 103.02, epsilon = 1e-9);
        assert_relative_eq!(barriers.stop_loss, 98.98, epsilon = 1e-9);
        assert_eq!(barriers.vertical, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn vertical_barrier_crosses_month_end() {
        let config = BarrierConfig::new(7, 1.0, 1.0);
        let entry = NaiveDate::from_ymd_opt(2024, 2, 26).unwrap();
        let barriers = Barriers::compute(&config, 50.0, 0.02, entry).unwrap();
        assert_eq!(barriers.vertical, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }

    #[test]
    fn vertical_barrier_overflow_is_invalid_input() {
        let config = BarrierConfig::new(5, 1.0, 1.0);
        let err = Barriers::compute(&config, 50.0, 0.02, NaiveDate::MAX).unwrap_err();
        assert!(matches!(err, TribarError::InvalidInput { .. }));
    }
}
