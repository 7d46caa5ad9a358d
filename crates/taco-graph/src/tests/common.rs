//! Common test helpers
use std::collections::BTreeSet;

use taco_common::Range;
use taco_common::address::parse_range;

use crate::graph::TacoGraph;
use crate::index::SpatialIndex;
use crate::pattern::PatternType;

pub fn r(text: &str) -> Range {
    parse_range(0, text).unwrap()
}

/// Cells covered by a set of disjoint ranges, as A1 strings.
pub fn cells(ranges: &[Range]) -> BTreeSet<String> {
    ranges
        .iter()
        .flat_map(|r| r.cells())
        .map(|c| c.to_string())
        .collect()
}

pub fn dependents<I: SpatialIndex>(graph: &TacoGraph<I>, query: &str) -> BTreeSet<String> {
    cells(&graph.get_dependents(&r(query)))
}

pub fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Stored edges as `(prec, dep, pattern)`, sorted for stable comparison.
pub fn edge_list<I: SpatialIndex>(graph: &TacoGraph<I>) -> Vec<(String, String, PatternType)> {
    let mut edges: Vec<_> = graph
        .edges()
        .map(|e| (e.prec.to_string(), e.dep.to_string(), e.meta.pattern))
        .collect();
    edges.sort();
    edges
}

/// Add `prec -> dep` for every `(prec, dep)` A1 pair.
pub fn add_all<I: SpatialIndex>(graph: &mut TacoGraph<I>, pairs: &[(&str, &str)]) {
    for (prec, dep) in pairs {
        graph.add(r(prec), r(dep));
    }
}

/// `C_i = f(B_i)` for i in 1..=n, inserted one at a time.
pub fn sliding_column(n: u32) -> TacoGraph {
    let mut graph = TacoGraph::new();
    for row in 0..n {
        graph.add(Range::cell(0, row, 1), Range::cell(0, row, 2));
    }
    graph
}
