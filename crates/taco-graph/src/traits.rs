use taco_common::Range;

use crate::graph::TacoGraph;
use crate::index::SpatialIndex;

/// Operations a dependency graph offers to the analysis layer.
pub trait DependencyGraph {
    fn add(&mut self, prec: Range, dep: Range);

    fn add_batch(&mut self, edges: &[(Range, Range)]);

    /// Disjoint ranges that transitively depend on `query`.
    fn get_dependents(&self, query: &Range) -> Vec<Range>;

    /// Drop every precedent of the single cell `cell`.
    fn clear_dependents(&mut self, cell: &Range);

    fn num_edges(&self) -> usize;

    fn num_vertices(&self) -> usize;

    /// Human-readable pattern histogram; not meant for parsing.
    fn compress_info(&self) -> String;
}

impl<I: SpatialIndex> DependencyGraph for TacoGraph<I> {
    fn add(&mut self, prec: Range, dep: Range) {
        TacoGraph::add(self, prec, dep)
    }

    fn add_batch(&mut self, edges: &[(Range, Range)]) {
        TacoGraph::add_batch(self, edges)
    }

    fn get_dependents(&self, query: &Range) -> Vec<Range> {
        TacoGraph::get_dependents(self, query)
    }

    fn clear_dependents(&mut self, cell: &Range) {
        TacoGraph::clear_dependents(self, cell)
    }

    fn num_edges(&self) -> usize {
        TacoGraph::num_edges(self)
    }

    fn num_vertices(&self) -> usize {
        TacoGraph::num_vertices(self)
    }

    fn compress_info(&self) -> String {
        TacoGraph::compress_info(self)
    }
}
