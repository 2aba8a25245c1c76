//! Core domain types and logic.

pub mod time_series;
pub mod label;
pub mod barrier;
pub mod labeler;
pub mod volatility;
pub mod summary;
pub mod config_validation;
pub mod error;
