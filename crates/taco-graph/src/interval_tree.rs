use std::collections::BTreeMap;

use smallvec::SmallVec;

/// Interval index over one axis, used for row spans of stored ranges.
///
/// ## Design decisions:
///
/// 1. **Multiset values** - one range takes part in several edges, so each
///    value carries an insertion count and disappears on its last removal
/// 2. **Short spans dominate** - most stored ranges are cells or short strips,
///    so the widest span seen bounds how far left a query has to look
/// 3. **Small value sets** - each interval maps to a handful of values, kept
///    inline in a `SmallVec`
///
/// Nodes live in a `BTreeMap` keyed by the low endpoint; a query walks the
/// lows in `[q_low - max_span, q_high]` and keeps intervals whose high end
/// reaches `q_low`.
#[derive(Debug, Clone)]
struct IntervalNode<T> {
    high: u32,
    values: SmallVec<[(T, u32); 2]>,
}

#[derive(Debug, Clone)]
pub struct IntervalTree<T: Clone + Eq> {
    map: BTreeMap<u32, Vec<IntervalNode<T>>>,
    /// Distinct `(interval, value)` pairs.
    size: usize,
    /// Widest `high - low` ever inserted. Never shrinks.
    max_span: u32,
}

impl<T: Clone + Eq> Default for IntervalTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq> IntervalTree<T> {
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
            size: 0,
            max_span: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Insert one occurrence of `value` on `[low, high]`.
    ///
    /// Returns `true` when the value was not stored on this interval before.
    pub fn insert(&mut self, low: u32, high: u32, value: T) -> bool {
        debug_assert!(low <= high);
        self.max_span = self.max_span.max(high - low);
        let entries = self.map.entry(low).or_default();
        let node = match entries.iter().position(|n| n.high == high) {
            Some(i) => &mut entries[i],
            None => {
                entries.push(IntervalNode {
                    high,
                    values: SmallVec::new(),
                });
                let last = entries.len() - 1;
                &mut entries[last]
            }
        };

        if let Some(slot) = node.values.iter_mut().find(|(v, _)| *v == value) {
            slot.1 += 1;
            false
        } else {
            node.values.push((value, 1));
            self.size += 1;
            true
        }
    }

    /// Remove one occurrence of `value` from `[low, high]`.
    ///
    /// Returns the number of occurrences left, or `None` if the value was not
    /// stored there.
    pub fn remove(&mut self, low: u32, high: u32, value: &T) -> Option<u32> {
        let nodes = self.map.get_mut(&low)?;
        let node_idx = nodes.iter().position(|n| n.high == high)?;
        let node = &mut nodes[node_idx];
        let slot_idx = node.values.iter().position(|(v, _)| v == value)?;

        node.values[slot_idx].1 -= 1;
        let remaining = node.values[slot_idx].1;
        if remaining == 0 {
            node.values.swap_remove(slot_idx);
            self.size -= 1;
            if node.values.is_empty() {
                nodes.swap_remove(node_idx);
            }
            if nodes.is_empty() {
                self.map.remove(&low);
            }
        }
        Some(remaining)
    }

    pub fn contains(&self, low: u32, high: u32, value: &T) -> bool {
        self.map.get(&low).is_some_and(|nodes| {
            nodes
                .iter()
                .any(|n| n.high == high && n.values.iter().any(|(v, _)| v == value))
        })
    }

    /// Every stored value whose interval overlaps `[q_low, q_high]`, once per
    /// value regardless of its occurrence count.
    pub fn query(&self, q_low: u32, q_high: u32) -> Vec<(u32, u32, &T)> {
        let mut results = Vec::new();
        if q_low > q_high {
            return results;
        }
        let floor = q_low.saturating_sub(self.max_span);
        for (&low, nodes) in self.map.range(floor..=q_high) {
            for node in nodes {
                if node.high >= q_low {
                    results.extend(node.values.iter().map(|(v, _)| (low, node.high, v)));
                }
            }
        }
        results
    }
}
