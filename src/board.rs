use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::chess_move::Move;
use crate::piece::{Color, Piece, PieceType};
use crate::position::{BOARD_SIZE, Position};

const BACK_ROW: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// An 8×8 grid of pieces plus the most recently applied move.
///
/// The board owns its pieces by value, so [`Board::deep_copy`] (or `clone`)
/// produces a board that shares nothing with the original. Lookups outside the
/// grid read as empty and writes outside it are ignored.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct Board {
    squares: [[Option<Piece>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
    last_move: Option<Move>,
}

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// A board set up in the standard opening position.
    pub fn standard() -> Self {
        let mut board = Self::new();
        board.reset_board();
        board
    }

    /// Piece on `position`, if any.
    #[inline]
    pub fn get_piece(&self, position: Position) -> Option<&Piece> {
        let (row, column) = position.index()?;
        self.squares[row][column].as_ref()
    }

    #[inline]
    pub(crate) fn get_piece_mut(&mut self, position: Position) -> Option<&mut Piece> {
        let (row, column) = position.index()?;
        self.squares[row][column].as_mut()
    }

    /// Puts `piece` on `position`, replacing any occupant; `None` clears it.
    pub fn add_piece(&mut self, position: Position, piece: Option<Piece>) {
        let Some((row, column)) = position.index() else {
            return;
        };
        self.squares[row][column] = piece.map(|mut piece| {
            piece.set_position(position);
            piece
        });
    }

    /// Clears `position`, returning what stood there.
    pub fn remove_piece(&mut self, position: Position) -> Option<Piece> {
        let (row, column) = position.index()?;
        self.squares[row][column].take()
    }

    /// Relocates whatever stands on `start` to `end` without checking legality.
    ///
    /// Returns the piece previously on `end`, if any.
    pub fn move_piece(&mut self, start: Position, end: Position) -> Option<Piece> {
        if !end.is_on_board() {
            return None;
        }
        let piece = self.remove_piece(start);
        let captured = self.remove_piece(end);
        self.add_piece(end, piece);
        captured
    }

    /// Clears the board and sets up the standard opening position.
    pub fn reset_board(&mut self) {
        *self = Self::new();

        for (column, kind) in (1..=BOARD_SIZE).zip(BACK_ROW) {
            for color in Color::ALL {
                self.add_piece(
                    Position::new(color.back_row(), column),
                    Some(Piece::new(color, kind)),
                );
                self.add_piece(
                    Position::new(color.pawn_home_row(), column),
                    Some(Piece::new(color, PieceType::Pawn)),
                );
            }
        }
    }

    /// An independent copy of this board, including move history of every
    /// piece and the last move.
    #[inline]
    pub fn deep_copy(&self) -> Board {
        self.clone()
    }

    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    #[inline]
    pub fn set_last_move(&mut self, last_move: Option<Move>) {
        self.last_move = last_move;
    }

    /// All occupied squares with their pieces, a1 first.
    pub fn occupied(&self) -> impl Iterator<Item = (Position, &Piece)> {
        Position::all().filter_map(|position| Some((position, self.get_piece(position)?)))
    }

    /// Squares holding pieces of `color`.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Position, &Piece)> {
        self.occupied().filter(move |(_, piece)| piece.color() == color)
    }

    /// Square of the king of `color`, if it is on the board.
    pub fn king_position(&self, color: Color) -> Option<Position> {
        self.pieces(color)
            .find(|(_, piece)| piece.kind() == PieceType::King)
            .map(|(position, _)| position)
    }

    /// Whether any piece of the opponent of `friendly` attacks `position`.
    pub fn is_position_under_attack(&self, position: Position, friendly: Color) -> bool {
        self.pieces(friendly.opponent())
            .any(|(at, piece)| piece.attacked_squares(self, at).contains(&position))
    }

    /// Pieces of the opponent of `color` attacking its king.
    pub fn checkers(&self, color: Color) -> Vec<Position> {
        let Some(king) = self.king_position(color) else {
            return Vec::new();
        };
        self.pieces(color.opponent())
            .filter(|(at, piece)| piece.attacked_squares(self, *at).contains(&king))
            .map(|(at, _)| at)
            .collect()
    }

    /// Whether the king of `color` is attacked. A board without that king is
    /// never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_position(color)
            .is_some_and(|king| self.is_position_under_attack(king, color))
    }
}

/// Boards are equal when every square holds equal pieces by color and type.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.squares == other.squares
    }
}

impl Eq for Board {}

/// Text diagram, row 8 first, with `.` for empty squares.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (1..=BOARD_SIZE).rev() {
            for column in 1..=BOARD_SIZE {
                let symbol = self
                    .get_piece(Position::new(row, column))
                    .map_or('.', Piece::char);
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
