//! Configuration validation.
//!
//! Validates the `[labeling]` section before any price data is read.

use crate::domain::error::TribarError;
use crate::ports::config_port::ConfigPort;

const SECTION: &str = "labeling";

pub fn validate_labeling_config(config: &dyn ConfigPort) -> Result<(), TribarError> {
    validate_holding_period(config)?;
    validate_multiplier(config, "profit_mult")?;
    validate_multiplier(config, "stop_mult")?;
    validate_min_ret_threshold(config)?;
    validate_apply_threshold(config)?;
    validate_volatility_window(config)?;
    Ok(())
}

fn invalid(key: &str, reason: &str) -> TribarError {
    TribarError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Parses a present value; `Ok(None)` when the key is absent.
fn parse_present<T: std::str::FromStr>(
    config: &dyn ConfigPort,
    key: &str,
    expected: &str,
) -> Result<Option<T>, TribarError> {
    match config.get_string(SECTION, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| invalid(key, &format!("expected {}, got {:?}", expected, raw))),
    }
}

fn validate_holding_period(config: &dyn ConfigPort) -> Result<(), TribarError> {
    if let Some(value) = parse_present::<i64>(config, "holding_period", "an integer")? {
        if value < 1 {
            return Err(invalid("holding_period", "holding_period must be at least 1"));
        }
    }
    Ok(())
}

fn validate_multiplier(config: &dyn ConfigPort, key: &str) -> Result<(), TribarError> {
    if let Some(value) = parse_present::<f64>(config, key, "a number")? {
        if !(value.is_finite() && value > 0.0) {
            return Err(invalid(key, &format!("{} must be positive", key)));
        }
    }
    Ok(())
}

fn validate_min_ret_threshold(config: &dyn ConfigPort) -> Result<(), TribarError> {
    if let Some(value) = parse_present::<f64>(config, "min_ret_threshold", "a number")? {
        if !(value.is_finite() && value >= 0.0) {
            return Err(invalid(
                "min_ret_threshold",
                "min_ret_threshold must be non-negative",
            ));
        }
    }
    Ok(())
}

fn validate_apply_threshold(config: &dyn ConfigPort) -> Result<(), TribarError> {
    match config.get_string(SECTION, "apply_min_ret_threshold") {
        None => Ok(()),
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "false" | "no" | "0" => Ok(()),
            _ => Err(invalid(
                "apply_min_ret_threshold",
                &format!("expected a boolean, got {:?}", raw),
            )),
        },
    }
}

fn validate_volatility_window(config: &dyn ConfigPort) -> Result<(), TribarError> {
    if let Some(value) = parse_present::<i64>(config, "volatility_window", "an integer")? {
        if value < 2 {
            return Err(invalid(
                "volatility_window",
                "volatility_window must be at least 2",
            ));
        }
    }
    Ok(())
}
