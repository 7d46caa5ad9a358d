use std::collections::VecDeque;

use taco_common::Range;

use super::TacoGraph;
use crate::index::SpatialIndex;
use crate::pattern::project_dependents;

/// Disjoint ranges found so far plus an index over them.
struct Found<I> {
    ranges: Vec<Range>,
    index: I,
}

impl<I: SpatialIndex> Found<I> {
    fn new() -> Self {
        Self {
            ranges: Vec::new(),
            index: I::default(),
        }
    }

    /// Record the part of `candidate` not seen yet and return it.
    fn insert_uncovered(&mut self, candidate: Range) -> Vec<Range> {
        let mut pieces = vec![candidate];
        for covered in self.index.query(&candidate) {
            pieces = pieces
                .into_iter()
                .flat_map(|p| p.subtract(&covered))
                .collect();
            if pieces.is_empty() {
                break;
            }
        }
        for piece in &pieces {
            self.index.insert(*piece);
            self.ranges.push(*piece);
        }
        pieces
    }
}

impl<I: SpatialIndex> TacoGraph<I> {
    /// Every cell that transitively depends on some cell of `query`.
    ///
    /// The result is a set of disjoint ranges in discovery order. `query`
    /// itself is only included where it depends on itself through a cycle.
    pub fn get_dependents(&self, query: &Range) -> Vec<Range> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("get_dependents", query = %query).entered();

        let mut found = Found::<I>::new();
        let mut queue = VecDeque::from([*query]);
        while let Some(current) = queue.pop_front() {
            for stored in self.index.query(&current) {
                let Some(deps) = self.prec_to_deps.get(&stored) else {
                    continue;
                };
                let Some(hit) = current.overlap(&stored) else {
                    continue;
                };
                for neighbour in deps {
                    for reached in project_dependents(&stored, &neighbour.range, &neighbour.meta, &hit) {
                        queue.extend(found.insert_uncovered(reached));
                    }
                }
            }
        }
        found.ranges
    }

    /// Total number of cells returned by [`Self::get_dependents`].
    pub fn count_dependent_cells(&self, query: &Range) -> u64 {
        self.get_dependents(query).iter().map(Range::cell_count).sum()
    }
}
