use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::piece::PieceType;
use crate::position::Position;

/// A request to move whatever stands on `start` to `end`.
///
/// `promotion` names the replacement piece when a pawn reaches the far rank
/// and is `None` for every other move.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub start: Position,
    pub end: Position,
    pub promotion: Option<PieceType>,
}

impl Move {
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self {
            start,
            end,
            promotion: None,
        }
    }

    #[inline]
    pub const fn with_promotion(start: Position, end: Position, promotion: PieceType) -> Self {
        Self {
            start,
            end,
            promotion: Some(promotion),
        }
    }

    /// Column distance travelled, signed (positive towards the h-file).
    #[inline]
    pub(crate) const fn column_delta(&self) -> i8 {
        self.end.column() - self.start.column()
    }

    /// Row distance travelled, signed (positive towards row 8).
    #[inline]
    pub(crate) const fn row_delta(&self) -> i8 {
        self.end.row() - self.start.row()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)?;
        if let Some(promotion) = self.promotion {
            write!(f, " ({promotion:?})")?;
        }
        Ok(())
    }
}
