//! Pattern types carried by compressed edges and the window arithmetic that
//! turns one stored edge back into the per-cell edges it stands for.
//!
//! For an edge `prec -> dep` let `s = dep.start - prec.start` and
//! `e = dep.end - prec.end`. Each dependent cell `d` reads a window `W(d)`:
//!
//! | pattern        | `W(d)`                 |
//! |----------------|------------------------|
//! | RR, chain, gap | `[d - s, d - e]`       |
//! | RF             | `[prec.start, d - e]`  |
//! | FR             | `[d - s, prec.end]`    |
//! | FF, none       | `prec`                 |
//!
//! Gap edges only cover the cells of `dep` at `dep.start + k * (gap + 1)`.

use smallvec::{SmallVec, smallvec};
use taco_common::{Offset, Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geometric transform shared by every per-cell edge of a compressed edge.
///
/// Variant order is the tie-break order used when several merges apply.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PatternType {
    /// Relative-relative where every dependent reads its neighbour in the
    /// same strip (`C2 = C1 + 1`, `C3 = C2 + 1`, ...).
    Chain,
    /// Whole window slides with the dependent.
    RelativeRelative,
    /// Start anchored, end tracks the dependent (running totals).
    RelativeFixed,
    /// Start tracks the dependent, end anchored.
    FixedRelative,
    /// Every dependent reads the same precedent.
    FixedFixed,
    /// Relative-relative over every `gap + 1`-th cell of the strip.
    Gap(u8),
    /// A single uncompressed edge.
    NoType,
}

impl PatternType {
    pub const fn label(self) -> &'static str {
        match self {
            PatternType::Chain => "RRChain",
            PatternType::RelativeRelative => "RR",
            PatternType::RelativeFixed => "RF",
            PatternType::FixedRelative => "FR",
            PatternType::FixedFixed => "FF",
            PatternType::Gap(_) => "RRGap",
            PatternType::NoType => "NoType",
        }
    }

    pub const fn gap(self) -> Option<u8> {
        match self {
            PatternType::Gap(g) => Some(g),
            _ => None,
        }
    }

    pub const fn is_gap(self) -> bool {
        matches!(self, PatternType::Gap(_))
    }

    /// Distance between consecutive dependents along the strip.
    pub const fn stride(self) -> u32 {
        match self {
            PatternType::Gap(g) => g as u32 + 1,
            _ => 1,
        }
    }

    /// Every dependent reads the whole precedent range.
    pub const fn is_fixed(self) -> bool {
        matches!(self, PatternType::FixedFixed | PatternType::NoType)
    }
}

/// Pattern plus the tracked corner offsets of a stored edge.
///
/// Untracked corners hold [`Offset::NONE`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeMeta {
    pub pattern: PatternType,
    pub start_offset: Offset,
    pub end_offset: Offset,
}

impl EdgeMeta {
    pub const fn new(pattern: PatternType, start_offset: Offset, end_offset: Offset) -> Self {
        Self {
            pattern,
            start_offset,
            end_offset,
        }
    }

    /// Meta of a freshly inserted, uncompressed edge.
    pub const fn single() -> Self {
        Self::new(PatternType::NoType, Offset::NONE, Offset::NONE)
    }
}

/// Neighbour entry of the adjacency maps.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnnotatedRange {
    pub range: Range,
    pub meta: EdgeMeta,
}

/// A stored compressed edge.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub prec: Range,
    pub dep: Range,
    pub meta: EdgeMeta,
}

impl Edge {
    pub const fn new(prec: Range, dep: Range, meta: EdgeMeta) -> Self {
        Self { prec, dep, meta }
    }

    pub const fn single(prec: Range, dep: Range) -> Self {
        Self::new(prec, dep, EdgeMeta::single())
    }

    /// Precedent window read by dependent cell `cell`.
    pub fn window(&self, cell: &Range) -> Option<Range> {
        project_precedents(&self.prec, &self.dep, &self.meta, cell)
    }

    /// Number of per-cell `(precedent, dependent)` pairs this edge implies.
    pub fn implied_edge_count(&self) -> u64 {
        if self.meta.pattern.is_fixed() {
            return self.prec.cell_count() * self.dep.cell_count();
        }
        self.dep
            .cells()
            .filter(|c| on_grid(&self.dep, self.meta.pattern.stride(), c))
            .filter_map(|c| self.window(&c))
            .map(|w| w.cell_count())
            .sum()
    }
}

/// `(dep.start - prec.start, dep.end - prec.end)` of a precedent/dependent pair.
pub fn pair_offsets(prec: &Range, dep: &Range) -> (Offset, Offset) {
    (
        dep.start_corner() - prec.start_corner(),
        dep.end_corner() - prec.end_corner(),
    )
}

/// Meta for a merged edge: record the corners `pattern` tracks.
pub fn compute_offsets(prec: &Range, dep: &Range, pattern: PatternType) -> EdgeMeta {
    let (s, e) = pair_offsets(prec, dep);
    let (start, end) = match pattern {
        PatternType::Chain | PatternType::RelativeRelative | PatternType::Gap(_) => (s, e),
        PatternType::RelativeFixed => (Offset::NONE, e),
        PatternType::FixedRelative => (s, Offset::NONE),
        PatternType::FixedFixed | PatternType::NoType => (Offset::NONE, Offset::NONE),
    };
    EdgeMeta::new(pattern, start, end)
}

/// Intersect the signed box `[start, end]` with `bounds`.
fn clamp(start: Offset, end: Offset, bounds: &Range) -> Option<Range> {
    Range::from_corners(
        bounds.sheet(),
        start.max(bounds.start_corner()),
        end.min(bounds.end_corner()),
    )
}

/// Dependents of `dep` reached from `hit`, a sub-range of `prec`.
///
/// Chain edges return the transitive closure along the chain, since every
/// cell of the chain after the first reached one reads its predecessor.
pub fn project_dependents(
    prec: &Range,
    dep: &Range,
    meta: &EdgeMeta,
    hit: &Range,
) -> SmallVec<[Range; 1]> {
    debug_assert!(prec.subsumes(hit));
    let s = meta.start_offset;
    let e = meta.end_offset;
    let projected = match meta.pattern {
        PatternType::RelativeRelative => clamp(hit.start_corner() + e, hit.end_corner() + s, dep),
        PatternType::Chain => {
            if s.row + s.col > 0 {
                clamp(hit.start_corner() + s, dep.end_corner(), dep)
            } else {
                clamp(dep.start_corner(), hit.end_corner() + s, dep)
            }
        }
        PatternType::RelativeFixed => clamp(hit.start_corner() + e, dep.end_corner(), dep),
        PatternType::FixedRelative => clamp(dep.start_corner(), hit.end_corner() + s, dep),
        PatternType::FixedFixed | PatternType::NoType => Some(*dep),
        PatternType::Gap(_) => {
            return match clamp(hit.start_corner() + e, hit.end_corner() + s, dep) {
                Some(span) => grid_cells(dep, meta.pattern.stride(), &span),
                None => SmallVec::new(),
            };
        }
    };
    projected.into_iter().collect()
}

/// Bounding box of the windows of every cell in `part`, a sub-range of `dep`.
pub fn project_precedents(
    prec: &Range,
    dep: &Range,
    meta: &EdgeMeta,
    part: &Range,
) -> Option<Range> {
    debug_assert!(dep.subsumes(part));
    let s = meta.start_offset;
    let e = meta.end_offset;
    match meta.pattern {
        PatternType::Chain | PatternType::RelativeRelative | PatternType::Gap(_) => {
            clamp(part.start_corner() - s, part.end_corner() - e, prec)
        }
        PatternType::RelativeFixed => clamp(prec.start_corner(), part.end_corner() - e, prec),
        PatternType::FixedRelative => clamp(part.start_corner() - s, prec.end_corner(), prec),
        PatternType::FixedFixed | PatternType::NoType => Some(*prec),
    }
}

/// Whether `cell` is one of the dependents `dep` stands for at `stride`.
pub fn on_grid(dep: &Range, stride: u32, cell: &Range) -> bool {
    dep.subsumes(cell)
        && (cell.start_row() - dep.start_row()) % stride == 0
        && (cell.start_col() - dep.start_col()) % stride == 0
}

/// Shrink `piece` (inside the strip `dep`) to its first and last cell on the
/// `stride` grid anchored at `dep.start`.
pub fn snap_to_grid(dep: &Range, stride: u32, piece: &Range) -> Option<Range> {
    if stride == 1 {
        return Some(*piece);
    }
    let snap = |anchor: u32, lo: u32, hi: u32| -> Option<(u32, u32)> {
        let first = anchor + (lo - anchor).div_ceil(stride) * stride;
        let last = anchor + (hi - anchor) / stride * stride;
        (first <= last).then_some((first, last))
    };
    if dep.height() > 1 {
        let (first, last) = snap(dep.start_row(), piece.start_row(), piece.end_row())?;
        Range::new(piece.sheet(), first, piece.start_col(), last, piece.end_col()).ok()
    } else {
        let (first, last) = snap(dep.start_col(), piece.start_col(), piece.end_col())?;
        Range::new(piece.sheet(), piece.start_row(), first, piece.end_row(), last).ok()
    }
}

/// On-grid cells of the strip `dep` inside `span`.
fn grid_cells(dep: &Range, stride: u32, span: &Range) -> SmallVec<[Range; 1]> {
    if dep.is_cell() {
        return smallvec![*span];
    }
    let Some(snapped) = snap_to_grid(dep, stride, span) else {
        return SmallVec::new();
    };
    let sheet = dep.sheet();
    if dep.height() > 1 {
        (snapped.start_row()..=snapped.end_row())
            .step_by(stride as usize)
            .map(|row| Range::cell(sheet, row, snapped.start_col()))
            .collect()
    } else {
        (snapped.start_col()..=snapped.end_col())
            .step_by(stride as usize)
            .map(|col| Range::cell(sheet, snapped.start_row(), col))
            .collect()
    }
}
