use smallvec::SmallVec;
use taco_common::Range;

use super::TacoGraph;
use crate::index::SpatialIndex;
use crate::pattern::{Edge, on_grid, project_precedents, snap_to_grid};

impl<I: SpatialIndex> TacoGraph<I> {
    /// Forget every precedent of `cell`, keeping the rest of each edge that
    /// covered it.
    ///
    /// Remainders that shrink to one cell go back through [`Self::add`] so
    /// they can merge with a neighbour; longer remainders keep their meta.
    ///
    /// # Panics
    /// If `cell` is not a single cell, or a patterned stored dependent is not
    /// a strip.
    pub fn clear_dependents(&mut self, cell: &Range) {
        assert!(cell.is_cell(), "clear_dependents expects a single cell, got {cell}");
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("clear_dependents", cell = %cell).entered();

        while let Some(edge) = self.edge_covering(cell) {
            self.split_around(edge, cell);
        }
    }

    /// First stored edge whose dependent side includes `cell`.
    fn edge_covering(&self, cell: &Range) -> Option<Edge> {
        for key in self.index.query(cell) {
            let Some(precs) = self.dep_to_precs.get(&key) else {
                continue;
            };
            if let Some(found) = precs
                .iter()
                .find(|p| on_grid(&key, p.meta.pattern.stride(), cell))
            {
                return Some(Edge::new(found.range, key, found.meta));
            }
        }
        None
    }

    fn split_around(&mut self, edge: Edge, cell: &Range) {
        let pieces: SmallVec<[Range; 4]> = if edge.meta.pattern.is_fixed() {
            edge.dep.subtract(cell)
        } else {
            assert!(
                edge.dep.is_one_dimensional(),
                "patterned dependent {} is not a strip",
                edge.dep
            );
            let stride = edge.meta.pattern.stride();
            edge.dep
                .subtract(cell)
                .iter()
                .filter_map(|piece| snap_to_grid(&edge.dep, stride, piece))
                .collect()
        };

        self.remove_edge(&edge);
        for piece in pieces {
            let Some(prec_part) = project_precedents(&edge.prec, &edge.dep, &edge.meta, &piece) else {
                continue;
            };
            if piece.is_cell() {
                self.add(prec_part, piece);
            } else {
                self.insert_edge(prec_part, piece, edge.meta);
            }
        }
    }
}
