use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Duplicate date {1} in the price series for '{0}'")]
    DuplicateDate(String, NaiveDate),

    #[error("Column '{0}' has {1} values but the date index has {2}")]
    ColumnLengthMismatch(String, usize, usize),
}
