//! Rectangle index over the ranges that currently take part in an edge.

use rustc_hash::FxHashMap;
use taco_common::{Range, SheetId};

use crate::interval_tree::IntervalTree;

/// Overlap index the graph is generic over.
///
/// Ranges are stored as a multiset: a range inserted twice stays visible until
/// it has been removed twice.
pub trait SpatialIndex: Default {
    fn insert(&mut self, range: Range);

    /// Remove one occurrence; `false` if the range was not stored.
    fn remove(&mut self, range: &Range) -> bool;

    /// Distinct stored ranges overlapping `probe`, in ascending `Range` order.
    fn query(&self, probe: &Range) -> Vec<Range>;

    fn contains(&self, range: &Range) -> bool;

    /// Number of distinct stored ranges.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-sheet interval trees keyed by row span, filtered on columns at query
/// time.
#[derive(Debug, Clone, Default)]
pub struct RangeIndex {
    sheets: FxHashMap<SheetId, IntervalTree<Range>>,
}

impl RangeIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpatialIndex for RangeIndex {
    fn insert(&mut self, range: Range) {
        self.sheets
            .entry(range.sheet())
            .or_default()
            .insert(range.start_row(), range.end_row(), range);
    }

    fn remove(&mut self, range: &Range) -> bool {
        let Some(tree) = self.sheets.get_mut(&range.sheet()) else {
            return false;
        };
        let removed = tree
            .remove(range.start_row(), range.end_row(), range)
            .is_some();
        if tree.is_empty() {
            self.sheets.remove(&range.sheet());
        }
        removed
    }

    fn query(&self, probe: &Range) -> Vec<Range> {
        let Some(tree) = self.sheets.get(&probe.sheet()) else {
            return Vec::new();
        };
        let mut hits: Vec<Range> = tree
            .query(probe.start_row(), probe.end_row())
            .into_iter()
            .filter(|(_, _, r)| r.overlaps(probe))
            .map(|(_, _, r)| *r)
            .collect();
        hits.sort_unstable();
        hits
    }

    fn contains(&self, range: &Range) -> bool {
        self.sheets
            .get(&range.sheet())
            .is_some_and(|t| t.contains(range.start_row(), range.end_row(), range))
    }

    fn len(&self) -> usize {
        self.sheets.values().map(IntervalTree::len).sum()
    }
}
