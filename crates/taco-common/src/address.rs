//! A1-style text helpers for [`Range`].
//!
//! Coordinates are zero-based everywhere in the workspace; A1 text is the
//! only place rows and columns are shown 1-based.

use crate::error::AddressError;
use crate::range::Range;
use crate::sheet::SheetId;

/// Convert a 0-based column index into Excel letters (0 -> "A", 26 -> "AA").
pub fn col_to_letters(mut col: u32) -> String {
    let mut buf = String::new();
    loop {
        buf.push(char::from(b'A' + (col % 26) as u8));
        col /= 26;
        if col == 0 {
            break;
        }
        col -= 1; // letters are 1-based internally
    }
    buf.chars().rev().collect()
}

/// Convert Excel letters back to a 0-based column index.
///
/// Lowercase letters are accepted. Returns `None` for empty input, non-letters
/// or values that do not fit in a `u32`.
pub fn letters_to_col(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut acc: u32 = 0;
    for ch in letters.bytes() {
        let ch = ch.to_ascii_uppercase();
        if !ch.is_ascii_uppercase() {
            return None;
        }
        acc = acc.checked_mul(26)?.checked_add((ch - b'A') as u32 + 1)?;
    }
    Some(acc - 1)
}

/// Parse a single A1 cell (`B3`, `$B$3`) into zero-based `(row, col)`.
pub fn parse_coords(text: &str) -> Result<(u32, u32), AddressError> {
    let cleaned: String = text.trim().chars().filter(|c| *c != '$').collect();
    if cleaned.is_empty() {
        return Err(AddressError::Empty);
    }
    let split = cleaned
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| AddressError::Row(text.to_string()))?;
    let (letters, digits) = cleaned.split_at(split);
    let col = letters_to_col(letters).ok_or_else(|| AddressError::Column(text.to_string()))?;
    let row: u32 = digits
        .parse()
        .map_err(|_| AddressError::Row(text.to_string()))?;
    if row == 0 {
        return Err(AddressError::ZeroIndex(text.to_string()));
    }
    Ok((row - 1, col))
}

/// Parse `B3` into a single-cell range on `sheet`.
pub fn parse_cell(sheet: SheetId, text: &str) -> Result<Range, AddressError> {
    let (row, col) = parse_coords(text)?;
    Ok(Range::cell(sheet, row, col))
}

/// Parse `B1:C3` (or a single cell) into a range on `sheet`.
///
/// Corners may be given in any order; the result is normalised.
pub fn parse_range(sheet: SheetId, text: &str) -> Result<Range, AddressError> {
    let mut parts = text.split(':');
    let first = parts.next().ok_or(AddressError::Empty)?;
    let start = parse_coords(first)?;
    let end = match parts.next() {
        Some(second) => parse_coords(second)?,
        None => start,
    };
    if parts.next().is_some() {
        return Err(AddressError::TooManyParts(text.to_string()));
    }
    let range = Range::new(
        sheet,
        start.0.min(end.0),
        start.1.min(end.1),
        start.0.max(end.0),
        start.1.max(end.1),
    )?;
    Ok(range)
}

/// Format zero-based `(row, col)` as A1 text.
pub fn format_coords(row: u32, col: u32) -> String {
    format!("{}{}", col_to_letters(col), row as u64 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters_round_trip_boundaries() {
        for (col, letters) in [(0, "A"), (25, "Z"), (26, "AA"), (51, "AZ"), (52, "BA"), (701, "ZZ"), (702, "AAA"), (16383, "XFD")] {
            assert_eq!(col_to_letters(col), letters);
            assert_eq!(letters_to_col(letters), Some(col));
        }
        assert_eq!(letters_to_col("xfd"), Some(16383));
        assert_eq!(letters_to_col(""), None);
        assert_eq!(letters_to_col("A1"), None);
    }

    #[test]
    fn parse_cells_and_ranges() {
        assert_eq!(parse_cell(0, "B3").unwrap(), Range::cell(0, 2, 1));
        assert_eq!(parse_cell(1, "$C$10").unwrap(), Range::cell(1, 9, 2));
        let r = parse_range(0, "B1:C3").unwrap();
        assert_eq!((r.start_row(), r.start_col(), r.end_row(), r.end_col()), (0, 1, 2, 2));
        assert_eq!(parse_range(0, "C3:B1").unwrap(), r);
        assert_eq!(parse_range(0, "D4").unwrap(), Range::cell(0, 3, 3));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(parse_cell(0, ""), Err(AddressError::Empty));
        assert!(matches!(parse_cell(0, "B0"), Err(AddressError::ZeroIndex(_))));
        assert!(matches!(parse_cell(0, "12"), Err(AddressError::Column(_))));
        assert!(matches!(parse_cell(0, "BB"), Err(AddressError::Row(_))));
        assert!(matches!(parse_cell(0, "B1x"), Err(AddressError::Row(_))));
        assert!(matches!(parse_range(0, "A1:B2:C3"), Err(AddressError::TooManyParts(_))));
    }

    #[test]
    fn format_matches_parse() {
        assert_eq!(format_coords(0, 0), "A1");
        assert_eq!(format_coords(999, 2), "C1000");
    }
}
