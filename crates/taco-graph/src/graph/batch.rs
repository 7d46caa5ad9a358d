use taco_common::Range;

use super::TacoGraph;
use crate::classify::{CompressionOutcome, classify_any};
use crate::index::SpatialIndex;
use crate::partition::SetPartitions;
use crate::pattern::{Edge, EdgeMeta, compute_offsets};

impl<I: SpatialIndex> TacoGraph<I> {
    /// Insert a batch of pairs known to belong together, using the fewest
    /// compressed edges any partition of the batch allows.
    ///
    /// Group counts are tried from one upwards and, for each, every partition
    /// into that many groups; the first partition whose groups all fold into a
    /// single edge is stored as is, without looking at existing edges.
    /// Batches larger than `max_batch_size` go through [`Self::add`] one pair
    /// at a time.
    pub fn add_batch(&mut self, edges: &[(Range, Range)]) {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("add_batch", edges = edges.len()).entered();

        if edges.is_empty() {
            return;
        }
        if !self.config.compression {
            for &(prec, dep) in edges {
                self.insert_edge(prec, dep, EdgeMeta::single());
            }
            return;
        }
        if edges.len() > self.config.max_batch_size {
            for &(prec, dep) in edges {
                self.add(prec, dep);
            }
            return;
        }

        for groups in 1..=edges.len() {
            for assignment in SetPartitions::new(edges.len(), groups) {
                if let Some(folded) = self.fold_partition(edges, &assignment, groups) {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(groups, "batch folded");
                    for edge in folded {
                        self.insert_edge(edge.prec, edge.dep, edge.meta);
                    }
                    return;
                }
            }
        }
    }

    fn fold_partition(
        &self,
        edges: &[(Range, Range)],
        assignment: &[usize],
        groups: usize,
    ) -> Option<Vec<Edge>> {
        let mut buckets: Vec<Vec<(Range, Range)>> = vec![Vec::new(); groups];
        for (edge, &block) in edges.iter().zip(assignment) {
            buckets[block].push(*edge);
        }
        buckets
            .into_iter()
            .map(|group| self.fold_group(group))
            .collect()
    }

    /// Fold a group into one edge, visiting pairs in dependent order so a
    /// strip grows from one end.
    fn fold_group(&self, mut group: Vec<(Range, Range)>) -> Option<Edge> {
        group.sort_by_key(|&(prec, dep)| (dep, prec));
        let mut pairs = group.into_iter();
        let (prec, dep) = pairs.next()?;
        let mut acc = Edge::single(prec, dep);
        for (prec, dep) in pairs {
            match classify_any(&prec, &dep, &acc, &self.config) {
                CompressionOutcome::Duplicate => {}
                CompressionOutcome::NotCompressible => return None,
                CompressionOutcome::Compressible { pattern, .. } => {
                    let merged_prec = acc.prec.bounding_box(&prec);
                    let merged_dep = acc.dep.bounding_box(&dep);
                    acc = Edge::new(
                        merged_prec,
                        merged_dep,
                        compute_offsets(&merged_prec, &merged_dep, pattern),
                    );
                }
            }
        }
        Some(acc)
    }
}
