//! Compressed spreadsheet dependency graph.
//!
//! Regular families of cell-to-cell references (a column of formulas each
//! reading the row beside it, running totals, strided lookups) are stored as
//! one range-to-range edge tagged with a [`PatternType`], while queries and
//! deletions still behave as on the uncompressed per-cell graph.

pub mod classify;
pub mod config;
pub mod graph;
pub mod index;
pub mod interval_tree;
pub mod partition;
pub mod pattern;
pub mod traits;

#[cfg(test)]
mod tests;

pub use classify::CompressionOutcome;
pub use config::TacoConfig;
pub use graph::{CompressStats, PatternCount, TacoGraph};
pub use index::{RangeIndex, SpatialIndex};
pub use pattern::{AnnotatedRange, Edge, EdgeMeta, PatternType};
pub use taco_common::{Direction, Offset, Range, SheetId};
pub use traits::DependencyGraph;
