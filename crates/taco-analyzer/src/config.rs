#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use taco_graph::TacoConfig;

/// Order in which a sheet's formulas are replayed into its graph.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DepOrder {
    /// Column by column, top to bottom. Fill-down columns arrive contiguously.
    #[default]
    ColumnWise,
    /// Row by row, left to right.
    RowWise,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub graph: TacoConfig,

    /// Compress only formulas whose precedents all sit in the formula's own
    /// row, and only along columns. Other formulas are stored uncompressed.
    pub in_row_compression: bool,

    pub order: DepOrder,
}

impl AnalyzerConfig {
    pub fn with_graph(mut self, graph: TacoConfig) -> Self {
        self.graph = graph;
        self
    }

    pub fn with_in_row_compression(mut self, enabled: bool) -> Self {
        self.in_row_compression = enabled;
        self
    }

    pub fn with_order(mut self, order: DepOrder) -> Self {
        self.order = order;
        self
    }
}
