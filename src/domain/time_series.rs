//! Date-indexed series.
//!
//! A `TimeSeries<T>` holds parallel timestamp and value vectors. Timestamps
//! are strictly increasing and are assumed to form a gap-free daily grid.

use crate::domain::error::TribarError;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<T> {
    timestamps: Vec<NaiveDate>,
    values: Vec<T>,
}

impl<T> TimeSeries<T> {
    /// Builds a series, rejecting mismatched lengths and timestamps that are
    /// not strictly increasing.
    pub fn new(timestamps: Vec<NaiveDate>, values: Vec<T>) -> Result<Self, TribarError> {
        if timestamps.len() != values.len() {
            return Err(TribarError::InvalidInput {
                reason: format!(
                    "{} timestamps but {} values",
                    timestamps.len(),
                    values.len()
                ),
            });
        }
        if let Some(pos) = timestamps.windows(2).position(|w| w[0] >= w[1]) {
            return Err(TribarError::InvalidInput {
                reason: format!(
                    "timestamps not strictly increasing at position {}: {} then {}",
                    pos + 1,
                    timestamps[pos],
                    timestamps[pos + 1]
                ),
            });
        }
        Ok(Self { timestamps, values })
    }

    pub fn from_pairs<I>(pairs: I) -> Result<Self, TribarError>
    where
        I: IntoIterator<Item = (NaiveDate, T)>,
    {
        let (timestamps, values) = pairs.into_iter().unzip();
        Self::new(timestamps, values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDate] {
        &self.timestamps
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &T)> {
        self.timestamps.iter().copied().zip(self.values.iter())
    }

    /// Ensures `other` covers exactly the same timestamps, position by position.
    pub fn check_aligned<U>(&self, other: &TimeSeries<U>) -> Result<(), TribarError> {
        if self.len() != other.len() {
            return Err(TribarError::InvalidInput {
                reason: format!(
                    "series length mismatch: {} vs {}",
                    self.len(),
                    other.len()
                ),
            });
        }
        if let Some(pos) = self
            .timestamps
            .iter()
            .zip(&other.timestamps)
            .position(|(a, b)| a != b)
        {
            return Err(TribarError::InvalidInput {
                reason: format!(
                    "timestamp mismatch at position {}: {} vs {}",
                    pos, self.timestamps[pos], other.timestamps[pos]
                ),
            });
        }
        Ok(())
    }
}
