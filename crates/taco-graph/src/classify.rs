//! Decides whether a new `(prec, dep)` pair can be folded into a stored edge.
//!
//! All functions are pure: they look at one candidate edge at a time and
//! leave candidate selection to the graph.

use taco_common::{Direction, Range};

use crate::config::TacoConfig;
use crate::pattern::{Edge, PatternType, on_grid, pair_offsets};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompressionOutcome {
    /// The candidate already implies every per-cell edge of the new pair.
    Duplicate,
    NotCompressible,
    /// Merge by growing the candidate towards `direction`.
    Compressible {
        direction: Direction,
        pattern: PatternType,
    },
}

/// The candidate implies every per-cell edge of `(new_prec, new_dep)`.
///
/// Windows are monotone along a strip, so the windows shared by every cell of
/// `new_dep` are the overlap of its first and last cell's windows.
pub fn is_implied(new_prec: &Range, new_dep: &Range, cand: &Edge) -> bool {
    if !cand.dep.subsumes(new_dep) {
        return false;
    }
    if cand.meta.pattern.is_gap()
        && !(new_dep.is_cell() && on_grid(&cand.dep, cand.meta.pattern.stride(), new_dep))
    {
        return false;
    }
    let (Some(first), Some(last)) = (
        cand.window(&new_dep.start_cell()),
        cand.window(&new_dep.end_cell()),
    ) else {
        return false;
    };
    first
        .overlap(&last)
        .is_some_and(|shared| shared.subsumes(new_prec))
}

/// Plain (stride 1) classification against one candidate.
pub fn classify(new_prec: &Range, new_dep: &Range, cand: &Edge, in_row_only: bool) -> CompressionOutcome {
    if is_implied(new_prec, new_dep, cand) {
        return CompressionOutcome::Duplicate;
    }
    let Some(direction) = new_dep.adjacency_direction(&cand.dep, 1) else {
        return CompressionOutcome::NotCompressible;
    };
    if in_row_only && direction.is_horizontal() {
        return CompressionOutcome::NotCompressible;
    }
    if cand.meta.pattern.is_gap() {
        return CompressionOutcome::NotCompressible;
    }
    match plain_pattern(new_prec, new_dep, cand, direction) {
        Some(pattern) if compatible(new_dep, cand, pattern) => {
            CompressionOutcome::Compressible { direction, pattern }
        }
        _ => CompressionOutcome::NotCompressible,
    }
}

/// Classification at stride `gap + 1`.
///
/// Gap merges never infer a transform: the new pair's offsets must equal the
/// candidate's, and only single-cell dependents take part.
pub fn classify_gap(
    new_prec: &Range,
    new_dep: &Range,
    cand: &Edge,
    gap: u8,
    in_row_only: bool,
) -> CompressionOutcome {
    if in_row_only || gap == 0 || !new_dep.is_cell() || new_prec.sheet() != cand.prec.sheet() {
        return CompressionOutcome::NotCompressible;
    }
    let pattern = PatternType::Gap(gap);
    let Some(direction) = new_dep.adjacency_direction(&cand.dep, pattern.stride()) else {
        return CompressionOutcome::NotCompressible;
    };
    let expected = match cand.meta.pattern {
        PatternType::NoType if cand.dep.is_cell() => pair_offsets(&cand.prec, &cand.dep),
        p if p == pattern => (cand.meta.start_offset, cand.meta.end_offset),
        _ => return CompressionOutcome::NotCompressible,
    };
    if pair_offsets(new_prec, new_dep) != expected {
        return CompressionOutcome::NotCompressible;
    }
    CompressionOutcome::Compressible { direction, pattern }
}

/// Plain pass, then every configured gap size in order.
pub fn classify_any(new_prec: &Range, new_dep: &Range, cand: &Edge, config: &TacoConfig) -> CompressionOutcome {
    let plain = classify(new_prec, new_dep, cand, config.in_row_only);
    if plain != CompressionOutcome::NotCompressible {
        return plain;
    }
    config
        .gap_sizes()
        .map(|gap| classify_gap(new_prec, new_dep, cand, gap, config.in_row_only))
        .find(|outcome| *outcome != CompressionOutcome::NotCompressible)
        .unwrap_or(CompressionOutcome::NotCompressible)
}

/// Compare `new_prec` with the window the candidate would read one step past
/// its growth end.
fn plain_pattern(new_prec: &Range, new_dep: &Range, cand: &Edge, direction: Direction) -> Option<PatternType> {
    let growth_cell = if direction.grows_end() {
        cand.dep.end_cell()
    } else {
        cand.dep.start_cell()
    };
    let last = cand.window(&growth_cell)?;
    if last.sheet() != new_prec.sheet() {
        return None;
    }
    let step = direction.unit();
    let (ls, le) = (last.start_corner(), last.end_corner());
    let (ns, ne) = (new_prec.start_corner(), new_prec.end_corner());

    if ns == ls + step && ne == le + step {
        if is_chain(new_prec, new_dep, &last) {
            return Some(PatternType::Chain);
        }
        return Some(PatternType::RelativeRelative);
    }
    if ns == ls && ne == le + step {
        return Some(PatternType::RelativeFixed);
    }
    if ns == ls + step && ne == le {
        return Some(PatternType::FixedRelative);
    }
    if ns == ls && ne == le {
        return Some(PatternType::FixedFixed);
    }
    None
}

/// The new precedent is the dependent's direct neighbour and the candidate's
/// last window sits one more step back along the same line.
fn is_chain(new_prec: &Range, new_dep: &Range, last: &Range) -> bool {
    Direction::ALL.into_iter().any(|toward| {
        new_prec.shifted(toward, 1) == Some(*new_dep)
            && (last.shifted(toward, 1) == Some(*new_prec) || last == new_dep)
    })
}

/// Patterned merges need a single new dependent cell, and a bare edge with a
/// multi-cell dependent already behaves as fixed-fixed.
fn compatible(new_dep: &Range, cand: &Edge, pattern: PatternType) -> bool {
    let cand_is_block = cand.meta.pattern == PatternType::NoType && !cand.dep.is_cell();
    if (!new_dep.is_cell() || cand_is_block) && pattern != PatternType::FixedFixed {
        return false;
    }
    cand.meta.pattern == PatternType::NoType || cand.meta.pattern == pattern
}
