//! Label records produced by the triple-barrier labeler.

use chrono::NaiveDate;
use std::fmt;

/// Outcome class of a labeled row.
///
/// The names follow the downstream model's convention: `Oversold` is assigned
/// when the upper (profit) barrier is touched first and `Overbought` when the
/// lower (stop) barrier is touched first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Oversold,
    Neutral,
    Overbought,
}

impl Label {
    /// +1 / 0 / -1 class value used by the model training stage.
    pub fn as_signed(self) -> i8 {
        match self {
            Label::Oversold => 1,
            Label::Neutral => 0,
            Label::Overbought => -1,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Oversold => write!(f, "oversold"),
            Label::Neutral => write!(f, "neutral"),
            Label::Overbought => write!(f, "overbought"),
        }
    }
}

/// Which exit condition resolved the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Barrier {
    Upper,
    Lower,
    Vertical,
}

impl fmt::Display for Barrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Barrier::Upper => write!(f, "upper"),
            Barrier::Lower => write!(f, "lower"),
            Barrier::Vertical => write!(f, "vertical"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub label: Label,
    pub realized_return: f64,
    pub hit_time: NaiveDate,
    pub barrier: Barrier,
}

/// One output row. `outcome` is `None` for warm-up rows, rows without a full
/// forward window, and rows whose exit price is missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelRecord {
    pub timestamp: NaiveDate,
    pub outcome: Option<Outcome>,
}

impl LabelRecord {
    pub fn undefined(timestamp: NaiveDate) -> Self {
        Self {
            timestamp,
            outcome: None,
        }
    }

    pub fn defined(timestamp: NaiveDate, outcome: Outcome) -> Self {
        Self {
            timestamp,
            outcome: Some(outcome),
        }
    }

    pub fn is_defined(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn label(&self) -> Option<Label> {
        self.outcome.map(|o| o.label)
    }

    pub fn realized_return(&self) -> Option<f64> {
        self.outcome.map(|o| o.realized_return)
    }

    pub fn hit_time(&self) -> Option<NaiveDate> {
        self.outcome.map(|o| o.hit_time)
    }

    pub fn barrier(&self) -> Option<Barrier> {
        self.outcome.map(|o| o.barrier)
    }
}
