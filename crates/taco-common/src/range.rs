use std::fmt;

use smallvec::{SmallVec, smallvec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::address::format_coords;
use crate::error::RangeError;
use crate::offset::{Direction, Offset};
use crate::sheet::SheetId;

/// Axis-aligned rectangle of cells on one sheet, zero-based and inclusive.
///
/// A range always satisfies `start <= end` on both axes; operations that can
/// produce nothing (a disjoint overlap, a projection that falls off the
/// sheet) return `None` instead of a sentinel rectangle.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Range {
    sheet: SheetId,
    start_row: u32,
    start_col: u32,
    end_row: u32,
    end_col: u32,
}

/// Largest row or column index a [`Range`] built by [`Range::new`] may use.
/// One below `u32::MAX` so `height`, `width` and `end + 1` never overflow.
pub const MAX_COORD: u32 = u32::MAX - 1;

impl Range {
    pub fn new(
        sheet: SheetId,
        start_row: u32,
        start_col: u32,
        end_row: u32,
        end_col: u32,
    ) -> Result<Self, RangeError> {
        if start_row > end_row || start_col > end_col {
            return Err(RangeError::Unordered {
                start_row,
                start_col,
                end_row,
                end_col,
            });
        }
        if let Some(&value) = [start_row, start_col, end_row, end_col]
            .iter()
            .find(|&&v| v > MAX_COORD)
        {
            return Err(RangeError::OutOfBounds {
                value,
                max: MAX_COORD,
            });
        }
        Ok(Self {
            sheet,
            start_row,
            start_col,
            end_row,
            end_col,
        })
    }

    pub const fn cell(sheet: SheetId, row: u32, col: u32) -> Self {
        debug_assert!(row <= MAX_COORD && col <= MAX_COORD);
        Self {
            sheet,
            start_row: row,
            start_col: col,
            end_row: row,
            end_col: col,
        }
    }

    /// Build a range from signed corners, returning `None` when a corner is
    /// negative, out of `u32` range, or the corners are inverted.
    pub fn from_corners(sheet: SheetId, start: Offset, end: Offset) -> Option<Self> {
        let coord = |v: i64| u32::try_from(v).ok();
        let start_row = coord(start.row)?;
        let start_col = coord(start.col)?;
        let end_row = coord(end.row)?;
        let end_col = coord(end.col)?;
        Self::new(sheet, start_row, start_col, end_row, end_col).ok()
    }

    pub const fn sheet(&self) -> SheetId {
        self.sheet
    }
    pub const fn start_row(&self) -> u32 {
        self.start_row
    }
    pub const fn start_col(&self) -> u32 {
        self.start_col
    }
    pub const fn end_row(&self) -> u32 {
        self.end_row
    }
    pub const fn end_col(&self) -> u32 {
        self.end_col
    }

    pub const fn height(&self) -> u32 {
        self.end_row - self.start_row + 1
    }
    pub const fn width(&self) -> u32 {
        self.end_col - self.start_col + 1
    }

    pub const fn cell_count(&self) -> u64 {
        self.height() as u64 * self.width() as u64
    }

    pub const fn is_cell(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }

    /// Single row, single column or single cell.
    pub const fn is_one_dimensional(&self) -> bool {
        self.start_row == self.end_row || self.start_col == self.end_col
    }

    pub const fn start_corner(&self) -> Offset {
        Offset::new(self.start_row as i64, self.start_col as i64)
    }

    pub const fn end_corner(&self) -> Offset {
        Offset::new(self.end_row as i64, self.end_col as i64)
    }

    pub const fn start_cell(&self) -> Range {
        Range::cell(self.sheet, self.start_row, self.start_col)
    }

    pub const fn end_cell(&self) -> Range {
        Range::cell(self.sheet, self.end_row, self.end_col)
    }

    pub fn overlaps(&self, other: &Range) -> bool {
        self.sheet == other.sheet
            && self.start_row <= other.end_row
            && other.start_row <= self.end_row
            && self.start_col <= other.end_col
            && other.start_col <= self.end_col
    }

    /// Intersection of two ranges, if any.
    pub fn overlap(&self, other: &Range) -> Option<Range> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Range {
            sheet: self.sheet,
            start_row: self.start_row.max(other.start_row),
            start_col: self.start_col.max(other.start_col),
            end_row: self.end_row.min(other.end_row),
            end_col: self.end_col.min(other.end_col),
        })
    }

    /// Smallest range covering both. The sheet of `self` is kept.
    pub fn bounding_box(&self, other: &Range) -> Range {
        debug_assert_eq!(self.sheet, other.sheet, "bounding box across sheets");
        Range {
            sheet: self.sheet,
            start_row: self.start_row.min(other.start_row),
            start_col: self.start_col.min(other.start_col),
            end_row: self.end_row.max(other.end_row),
            end_col: self.end_col.max(other.end_col),
        }
    }

    /// `other` lies entirely inside `self`.
    pub fn subsumes(&self, other: &Range) -> bool {
        self.overlap(other).as_ref() == Some(other)
    }

    /// The part of `self` not covered by `other`, as disjoint rectangles.
    ///
    /// Pieces come out as a full-width band above the overlap, a full-width
    /// band below it, then the left and right flanks of the overlap rows.
    pub fn subtract(&self, other: &Range) -> SmallVec<[Range; 4]> {
        let Some(o) = self.overlap(other) else {
            return smallvec![*self];
        };
        let mut out = SmallVec::new();
        let piece = |sr, sc, er, ec| Range {
            sheet: self.sheet,
            start_row: sr,
            start_col: sc,
            end_row: er,
            end_col: ec,
        };
        if o.start_row > self.start_row {
            out.push(piece(self.start_row, self.start_col, o.start_row - 1, self.end_col));
        }
        if o.end_row < self.end_row {
            out.push(piece(o.end_row + 1, self.start_col, self.end_row, self.end_col));
        }
        if o.start_col > self.start_col {
            out.push(piece(o.start_row, self.start_col, o.end_row, o.start_col - 1));
        }
        if o.end_col < self.end_col {
            out.push(piece(o.start_row, o.end_col + 1, o.end_row, self.end_col));
        }
        out
    }

    /// Where `self` sits relative to `other` when the two are exactly `step`
    /// rows or columns apart with matching span on the other axis.
    ///
    /// `Left` means `self` is to the left of `other`, and so on.
    pub fn adjacency_direction(&self, other: &Range, step: u32) -> Option<Direction> {
        if self.sheet != other.sheet || step == 0 {
            return None;
        }
        let step = step as u64;
        if self.start_row == other.start_row && self.end_row == other.end_row {
            if self.end_col as u64 + step == other.start_col as u64 {
                return Some(Direction::Left);
            }
            if other.end_col as u64 + step == self.start_col as u64 {
                return Some(Direction::Right);
            }
        }
        if self.start_col == other.start_col && self.end_col == other.end_col {
            if self.end_row as u64 + step == other.start_row as u64 {
                return Some(Direction::Up);
            }
            if other.end_row as u64 + step == self.start_row as u64 {
                return Some(Direction::Down);
            }
        }
        None
    }

    /// Move both corners by `by`; `None` if the result leaves the sheet.
    pub fn translated(&self, by: Offset) -> Option<Range> {
        Range::from_corners(self.sheet, self.start_corner() + by, self.end_corner() + by)
    }

    pub fn shifted(&self, direction: Direction, step: u32) -> Option<Range> {
        let unit = direction.unit();
        let step = step as i64;
        self.translated(Offset::new(unit.row * step, unit.col * step))
    }

    /// Every cell of the range, row-major.
    pub fn cells(self) -> impl Iterator<Item = Range> {
        (self.start_row..=self.end_row).flat_map(move |row| {
            (self.start_col..=self.end_col).map(move |col| Range::cell(self.sheet, row, col))
        })
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_coords(self.start_row, self.start_col))?;
        if !self.is_cell() {
            write!(f, ":{}", format_coords(self.end_row, self.end_col))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::parse_range;

    fn r(text: &str) -> Range {
        parse_range(0, text).unwrap()
    }

    #[test]
    fn new_rejects_unordered_corners() {
        assert!(Range::new(0, 3, 0, 2, 0).is_err());
        assert!(Range::new(0, 0, 3, 0, 2).is_err());
        assert!(Range::from_corners(0, Offset::new(-1, 0), Offset::new(0, 0)).is_none());
        assert_eq!(
            Range::from_corners(0, Offset::new(1, 1), Offset::new(2, 2)),
            Some(r("B2:C3"))
        );
    }

    #[test]
    fn new_rejects_coordinates_past_the_limit() {
        assert_eq!(
            Range::new(0, 0, 0, u32::MAX, 0),
            Err(RangeError::OutOfBounds {
                value: u32::MAX,
                max: MAX_COORD
            })
        );
        assert!(Range::from_corners(0, Offset::new(0, 0), Offset::new(0, u32::MAX as i64)).is_none());
        let widest = Range::new(0, 0, 0, MAX_COORD, MAX_COORD).unwrap();
        assert_eq!(widest.height(), u32::MAX);
        assert_eq!(widest.cell_count(), u32::MAX as u64 * u32::MAX as u64);
    }

    #[test]
    fn overlap_and_bounding_box() {
        assert_eq!(r("A1:C3").overlap(&r("B2:D4")), Some(r("B2:C3")));
        assert_eq!(r("A1:A3").overlap(&r("B1:B3")), None);
        assert_eq!(r("A1").bounding_box(&r("C5")), r("A1:C5"));
        assert!(r("A1:C3").subsumes(&r("B2")));
        assert!(!r("A1:C3").subsumes(&r("C3:D3")));
        let other_sheet = Range::cell(1, 0, 0);
        assert_eq!(r("A1").overlap(&other_sheet), None);
    }

    #[test]
    fn subtract_strip_gives_flanks() {
        let pieces = r("C1:C10").subtract(&r("C5"));
        assert_eq!(pieces.as_slice(), &[r("C1:C4"), r("C6:C10")]);
        let pieces = r("A2:J2").subtract(&r("D2"));
        assert_eq!(pieces.as_slice(), &[r("A2:C2"), r("E2:J2")]);
        assert!(r("C5").subtract(&r("A1:D9")).is_empty());
        assert_eq!(r("A1:A2").subtract(&r("B1")).as_slice(), &[r("A1:A2")]);
    }

    #[test]
    fn subtract_block_is_disjoint_and_complete() {
        let block = r("A1:E5");
        let hole = r("B2:C4");
        let pieces = block.subtract(&hole);
        assert_eq!(pieces.len(), 4);
        let total: u64 = pieces.iter().map(Range::cell_count).sum();
        assert_eq!(total, block.cell_count() - hole.cell_count());
        for (i, a) in pieces.iter().enumerate() {
            assert!(!a.overlaps(&hole));
            for b in &pieces[i + 1..] {
                assert!(!a.overlaps(b));
            }
        }
    }

    #[test]
    fn adjacency_directions() {
        assert_eq!(r("B1").adjacency_direction(&r("C1"), 1), Some(Direction::Left));
        assert_eq!(r("D1").adjacency_direction(&r("C1"), 1), Some(Direction::Right));
        assert_eq!(r("C1").adjacency_direction(&r("C2:C9"), 1), Some(Direction::Up));
        assert_eq!(r("C10").adjacency_direction(&r("C2:C9"), 1), Some(Direction::Down));
        assert_eq!(r("C11").adjacency_direction(&r("C2:C9"), 2), Some(Direction::Down));
        assert_eq!(r("C11").adjacency_direction(&r("C2:C9"), 1), None);
        assert_eq!(r("D10").adjacency_direction(&r("C2:C9"), 1), None);
        assert_eq!(r("B1:B2").adjacency_direction(&r("C1"), 1), None);
        assert_eq!(r("C5").adjacency_direction(&r("C5"), 1), None);
    }

    #[test]
    fn shifting_off_the_sheet_is_absent() {
        assert_eq!(r("A1").shifted(Direction::Up, 1), None);
        assert_eq!(r("A1").shifted(Direction::Right, 2), Some(r("C1")));
        assert_eq!(r("B2:C3").translated(Offset::new(1, -1)), Some(r("A3:B4")));
    }

    #[test]
    fn cells_and_display() {
        let cells: Vec<String> = r("A1:B2").cells().map(|c| c.to_string()).collect();
        assert_eq!(cells, ["A1", "B1", "A2", "B2"]);
        assert_eq!(r("B1:C1000").to_string(), "B1:C1000");
        assert_eq!(r("B1:C1000").cell_count(), 2000);
        assert!(r("B1:B9").is_one_dimensional());
        assert!(!r("B1:C9").is_one_dimensional());
    }
}
