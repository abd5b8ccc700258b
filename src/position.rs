use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of rows and columns on the board.
pub const BOARD_SIZE: i8 = 8;

/// A square on the board as a 1-indexed (row, column) pair.
///
/// Row 1 is White's back rank and column 1 is the a-file. Coordinates outside
/// `1..=8` are representable so that move generation can step off the edge
/// and ask [`Position::is_on_board`] afterwards; board lookups treat such
/// positions as empty.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    row: i8,
    column: i8,
}

impl Position {
    #[inline]
    pub const fn new(row: i8, column: i8) -> Self {
        Self { row, column }
    }

    #[inline]
    pub const fn row(self) -> i8 {
        self.row
    }

    #[inline]
    pub const fn column(self) -> i8 {
        self.column
    }

    /// True iff both coordinates are in `1..=8`.
    #[inline]
    pub const fn is_on_board(self) -> bool {
        self.row >= 1 && self.row <= BOARD_SIZE && self.column >= 1 && self.column <= BOARD_SIZE
    }

    /// The position shifted by the given deltas. The result may be off the board.
    #[inline]
    pub const fn offset(self, d_row: i8, d_column: i8) -> Self {
        Self::new(self.row + d_row, self.column + d_column)
    }

    /// Grid index `(row, column)` starting at zero, or `None` when off the board.
    #[inline]
    pub(crate) fn index(self) -> Option<(usize, usize)> {
        self.is_on_board()
            .then(|| ((self.row - 1) as usize, (self.column - 1) as usize))
    }

    /// All 64 valid positions, a1 first, row by row.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=BOARD_SIZE).flat_map(|row| (1..=BOARD_SIZE).map(move |column| Position::new(row, column)))
    }

    /// File letter ('a'-'h') of an on-board position.
    fn file_char(self) -> Option<char> {
        self.is_on_board()
            .then(|| (b'a' + (self.column - 1) as u8) as char)
    }
}

/// Parse coordinate notation like "e4" into a Position.
///
/// This is boundary glue for callers that accept squares as text; the engine
/// itself works on numeric coordinates only.
impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ParsePositionError::WrongLength(s.to_owned()));
        };

        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) {
            return Err(ParsePositionError::BadFile(file));
        }
        let row = rank
            .to_digit(10)
            .filter(|r| (1..=8).contains(r))
            .ok_or(ParsePositionError::BadRank(rank))?;

        Ok(Position::new(row as i8, (file as u8 - b'a' + 1) as i8))
    }
}

/// Display in coordinate notation (e.g., "e4"), or the raw pair when off the board.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.file_char() {
            Some(file) => write!(f, "{}{}", file, self.row),
            None => write!(f, "({}, {})", self.row, self.column),
        }
    }
}

/// Error when parsing coordinate notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParsePositionError {
    #[error("square must be 2 characters (e.g., 'e4'), got '{0}'")]
    WrongLength(String),
    #[error("file must be a-h, got '{0}'")]
    BadFile(char),
    #[error("rank must be 1-8, got '{0}'")]
    BadRank(char),
}
