//! Label output port trait.

use crate::domain::error::TribarError;
use crate::domain::label::LabelRecord;

/// Port for writing a labeled series. Implementations must keep every record,
/// in input order.
pub trait LabelPort {
    fn write(&mut self, symbol: &str, records: &[LabelRecord]) -> Result<(), TribarError>;
}
