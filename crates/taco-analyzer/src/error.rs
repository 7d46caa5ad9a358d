use taco_common::AddressError;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AnalyzerError {
    #[error("unknown sheet `{0}`")]
    UnknownSheet(String),
    /// Input the graph cannot represent, such as a precedent on another sheet.
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),
    #[error(transparent)]
    Address(#[from] AddressError),
}
