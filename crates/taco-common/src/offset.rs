use std::fmt;
use std::ops::{Add, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Signed `(row, col)` displacement between two range corners.
///
/// Also used for absolute corner positions during projection arithmetic,
/// where intermediate values may fall outside the sheet before being
/// clamped back into a [`crate::Range`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Offset {
    pub row: i64,
    pub col: i64,
}

impl Offset {
    /// Marker for an untracked (fixed) corner.
    pub const NONE: Offset = Offset { row: 0, col: 0 };

    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Componentwise minimum.
    pub fn min(self, other: Offset) -> Offset {
        Offset::new(self.row.min(other.row), self.col.min(other.col))
    }

    /// Componentwise maximum.
    pub fn max(self, other: Offset) -> Offset {
        Offset::new(self.row.max(other.row), self.col.max(other.col))
    }
}

impl Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl Sub for Offset {
    type Output = Offset;

    fn sub(self, rhs: Offset) -> Offset {
        Offset::new(self.row - rhs.row, self.col - rhs.col)
    }
}

impl Neg for Offset {
    type Output = Offset;

    fn neg(self) -> Offset {
        Offset::new(-self.row, -self.col)
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Relative placement of one range next to another.
///
/// The declaration order is significant: it is the stable order used when
/// several merge candidates tie.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// One-step displacement when moving in this direction.
    pub const fn unit(self) -> Offset {
        match self {
            Direction::Left => Offset::new(0, -1),
            Direction::Right => Offset::new(0, 1),
            Direction::Up => Offset::new(-1, 0),
            Direction::Down => Offset::new(1, 0),
        }
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// True when growth in this direction extends a range's end corner.
    pub const fn grows_end(self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}
