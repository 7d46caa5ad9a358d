//! Workbook-level analysis on top of [`taco_graph`].
//!
//! Callers describe each sheet's formulas as `(dependent cell, precedent
//! ranges)` in a [`WorkbookData`]; [`SheetAnalyzer`] builds one compressed
//! graph per sheet and reports dependents and compression statistics.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod sheet_data;

pub use analyzer::{MostDependents, SheetAnalyzer};
pub use config::{AnalyzerConfig, DepOrder};
pub use error::AnalyzerError;
pub use sheet_data::{CellContent, SheetData, WorkbookData};
