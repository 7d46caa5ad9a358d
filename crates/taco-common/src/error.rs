use thiserror::Error;

/// Errors raised when constructing a [`crate::Range`] from raw coordinates.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("range must be ordered so the start is above/left of the end ({start_row},{start_col}):({end_row},{end_col})")]
    Unordered {
        start_row: u32,
        start_col: u32,
        end_row: u32,
        end_col: u32,
    },
    #[error("coordinate {value} exceeds the largest supported index {max}")]
    OutOfBounds { value: u32, max: u32 },
}

/// Errors produced while parsing A1-style references.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("empty reference")]
    Empty,
    #[error("invalid column letters in `{0}`")]
    Column(String),
    #[error("invalid row number in `{0}`")]
    Row(String),
    #[error("row and column numbers are 1-based in `{0}`")]
    ZeroIndex(String),
    #[error("more than one `:` in `{0}`")]
    TooManyParts(String),
    #[error(transparent)]
    Range(#[from] RangeError),
}
