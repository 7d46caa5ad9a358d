//! Compressed dependency graph.
//!
//! Each stored edge maps a precedent range to a dependent range under an
//! [`EdgeMeta`]; the per-cell graph it stands for is recovered through the
//! window functions in [`crate::pattern`].

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};
use taco_common::{Direction, Range};

use crate::classify::{CompressionOutcome, classify, classify_gap};
use crate::config::TacoConfig;
use crate::index::{RangeIndex, SpatialIndex};
use crate::pattern::{AnnotatedRange, Edge, EdgeMeta, PatternType, compute_offsets};

mod batch;
mod clear;
mod query;

/// What `add` decided to do with a new pair.
enum Placement {
    Implied,
    Merge {
        cand: Edge,
        pattern: PatternType,
    },
    Fresh,
}

#[derive(Debug, Clone)]
pub struct TacoGraph<I: SpatialIndex = RangeIndex> {
    prec_to_deps: FxHashMap<Range, Vec<AnnotatedRange>>,
    dep_to_precs: FxHashMap<Range, Vec<AnnotatedRange>>,
    index: I,
    config: TacoConfig,
}

impl<I: SpatialIndex> Default for TacoGraph<I> {
    fn default() -> Self {
        Self::with_index_config(TacoConfig::default())
    }
}

impl TacoGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TacoConfig) -> Self {
        Self::with_index_config(config)
    }
}

impl<I: SpatialIndex> TacoGraph<I> {
    /// Graph backed by a custom [`SpatialIndex`].
    pub fn with_index_config(config: TacoConfig) -> Self {
        Self {
            prec_to_deps: FxHashMap::default(),
            dep_to_precs: FxHashMap::default(),
            index: I::default(),
            config,
        }
    }

    pub fn config(&self) -> &TacoConfig {
        &self.config
    }

    /// Toggle merging for subsequent insertions.
    pub fn set_compression(&mut self, enabled: bool) {
        self.config.compression = enabled;
    }

    pub fn set_in_row_only(&mut self, enabled: bool) {
        self.config.in_row_only = enabled;
    }

    /// Record that `dep` reads every cell of `prec`.
    ///
    /// With compression on, the pair is folded into at most one existing edge;
    /// an already implied pair leaves the graph untouched.
    pub fn add(&mut self, prec: Range, dep: Range) {
        if !self.config.compression {
            self.insert_edge(prec, dep, EdgeMeta::single());
            return;
        }
        match self.placement(&prec, &dep) {
            Placement::Implied => {}
            Placement::Merge { cand, pattern } => {
                self.remove_edge(&cand);
                let merged_prec = cand.prec.bounding_box(&prec);
                let merged_dep = cand.dep.bounding_box(&dep);
                let meta = compute_offsets(&merged_prec, &merged_dep, pattern);
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    prec = %merged_prec,
                    dep = %merged_dep,
                    pattern = pattern.label(),
                    "merged edge"
                );
                self.insert_edge(merged_prec, merged_dep, meta);
            }
            Placement::Fresh => {
                self.insert_edge(prec, dep, EdgeMeta::single());
            }
        }
    }

    /// Pick the stored edge the pair should join.
    ///
    /// An implying candidate wins outright; otherwise the smallest
    /// `(direction, pattern)` among plain merges, and only when there is none
    /// the first gap size that yields a merge.
    fn placement(&self, prec: &Range, dep: &Range) -> Placement {
        let mut best: Option<(Direction, PatternType, Edge)> = None;
        for cand in self.candidates(dep, 1, true) {
            match classify(prec, dep, &cand, self.config.in_row_only) {
                CompressionOutcome::Duplicate => return Placement::Implied,
                CompressionOutcome::NotCompressible => {}
                CompressionOutcome::Compressible { direction, pattern } => {
                    keep_min(&mut best, (direction, pattern, cand));
                }
            }
        }

        if best.is_none() {
            for gap in self.config.gap_sizes() {
                let stride = PatternType::Gap(gap).stride();
                for cand in self.candidates(dep, stride, false) {
                    if let CompressionOutcome::Compressible { direction, pattern } =
                        classify_gap(prec, dep, &cand, gap, self.config.in_row_only)
                    {
                        keep_min(&mut best, (direction, pattern, cand));
                    }
                }
                if best.is_some() {
                    break;
                }
            }
        }

        match best {
            Some((_, pattern, cand)) => Placement::Merge { cand, pattern },
            None => Placement::Fresh,
        }
    }

    /// Stored edges whose dependent range overlaps `dep` (when asked) or sits
    /// `step` cells away from it, in index order.
    fn candidates(&self, dep: &Range, step: u32, with_overlap: bool) -> Vec<Edge> {
        let mut keys: Vec<Range> = Vec::new();
        if with_overlap {
            keys.extend(self.index.query(dep));
        }
        for direction in Direction::ALL {
            if let Some(probe) = dep.shifted(direction, step) {
                keys.extend(self.index.query(&probe));
            }
        }
        keys.sort_unstable();
        keys.dedup();

        let mut out = Vec::new();
        for key in keys {
            if !with_overlap && key.adjacency_direction(dep, step).is_none() {
                continue;
            }
            if let Some(precs) = self.dep_to_precs.get(&key) {
                out.extend(precs.iter().map(|p| Edge::new(p.range, key, p.meta)));
            }
        }
        out
    }

    /// Store an edge verbatim. Returns `false` if the identical edge exists.
    pub(crate) fn insert_edge(&mut self, prec: Range, dep: Range, meta: EdgeMeta) -> bool {
        let deps = self.prec_to_deps.entry(prec).or_default();
        let forward = AnnotatedRange { range: dep, meta };
        if deps.contains(&forward) {
            return false;
        }
        deps.push(forward);
        self.dep_to_precs
            .entry(dep)
            .or_default()
            .push(AnnotatedRange { range: prec, meta });
        self.index.insert(prec);
        self.index.insert(dep);
        true
    }

    /// Drop a stored edge from both maps and the index.
    pub(crate) fn remove_edge(&mut self, edge: &Edge) -> bool {
        let Some(deps) = self.prec_to_deps.get_mut(&edge.prec) else {
            return false;
        };
        let Some(pos) = deps
            .iter()
            .position(|a| a.range == edge.dep && a.meta == edge.meta)
        else {
            return false;
        };
        deps.remove(pos);
        if deps.is_empty() {
            self.prec_to_deps.remove(&edge.prec);
        }

        if let Some(precs) = self.dep_to_precs.get_mut(&edge.dep) {
            if let Some(pos) = precs
                .iter()
                .position(|a| a.range == edge.prec && a.meta == edge.meta)
            {
                precs.remove(pos);
            }
            if precs.is_empty() {
                self.dep_to_precs.remove(&edge.dep);
            }
        }
        self.index.remove(&edge.prec);
        self.index.remove(&edge.dep);
        true
    }

    /// Number of stored (compressed) edges.
    pub fn num_edges(&self) -> usize {
        self.dep_to_precs.values().map(Vec::len).sum()
    }

    /// Distinct ranges taking part in any stored edge.
    pub fn num_vertices(&self) -> usize {
        self.prec_to_deps
            .keys()
            .chain(self.dep_to_precs.keys())
            .collect::<FxHashSet<_>>()
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.prec_to_deps.is_empty()
    }

    /// Every stored edge, in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.prec_to_deps.iter().flat_map(|(prec, deps)| {
            deps.iter()
                .map(move |a| Edge::new(*prec, a.range, a.meta))
        })
    }

    /// Stored edges whose dependent range is exactly `dep`.
    pub fn edges_into(&self, dep: &Range) -> Vec<Edge> {
        self.dep_to_precs
            .get(dep)
            .map(|precs| {
                precs
                    .iter()
                    .map(|a| Edge::new(a.range, *dep, a.meta))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Pattern histogram, e.g. `RR:2,RRGap:1,NoType:3`.
    ///
    /// Gap sizes share one `RRGap` bucket; empty graphs give an empty string.
    pub fn compress_info(&self) -> String {
        let mut buckets: Vec<(&'static str, usize)> = Vec::new();
        for (pattern, count) in self.compress_stats().patterns {
            match buckets.last_mut() {
                Some((label, total)) if *label == pattern.label() => *total += count.edges,
                _ => buckets.push((pattern.label(), count.edges)),
            }
        }
        buckets
            .iter()
            .map(|(label, count)| format!("{label}:{count}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn compress_stats(&self) -> CompressStats {
        let mut stats = CompressStats::default();
        for edge in self.edges() {
            let slot = stats.patterns.entry(edge.meta.pattern).or_default();
            slot.edges += 1;
            slot.implied_edges += edge.implied_edge_count();
        }
        stats
    }
}

fn keep_min(best: &mut Option<(Direction, PatternType, Edge)>, next: (Direction, PatternType, Edge)) {
    let better = match best {
        Some((dir, pattern, _)) => (next.0, next.1) < (*dir, *pattern),
        None => true,
    };
    if better {
        *best = Some(next);
    }
}

/// Stored and implied edge counts for one pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternCount {
    /// Compressed edges stored with this pattern.
    pub edges: usize,
    /// Per-cell edges those compressed edges stand for.
    pub implied_edges: u64,
}

/// Per-pattern summary of a graph, ordered by pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressStats {
    pub patterns: BTreeMap<PatternType, PatternCount>,
}

impl CompressStats {
    pub fn merge(&mut self, other: &CompressStats) {
        for (pattern, count) in &other.patterns {
            let slot = self.patterns.entry(*pattern).or_default();
            slot.edges += count.edges;
            slot.implied_edges += count.implied_edges;
        }
    }

    pub fn total_edges(&self) -> usize {
        self.patterns.values().map(|c| c.edges).sum()
    }

    pub fn total_implied_edges(&self) -> u64 {
        self.patterns.values().map(|c| c.implied_edges).sum()
    }
}
