use log::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::chess_move::Move;
use crate::piece::{Color, Piece, PieceType};
use crate::position::Position;

/// Why a move was rejected. A rejected move never changes the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("no piece at start position {0}")]
    NoPieceAtStart(Position),

    #[error("it is not {piece:?}'s turn, {to_move:?} is to move")]
    WrongTurn { piece: Color, to_move: Color },

    #[error("end position {0} is off the board")]
    OutOfBounds(Position),

    #[error("cannot capture your own piece on {0}")]
    FriendlyCapture(Position),

    #[error("{0} is not a legal move")]
    NotInLegalSet(Move),

    #[error("{0} reaches the last rank and needs a promotion piece")]
    MissingPromotion(Move),

    #[error("cannot castle with {0}: path blocked, king or rook already moved, or square under attack")]
    CastlingBlocked(Move),
}

/// Derived state of the game from the point of view of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// The side to move has legal moves and is not in check.
    InProgress(Color),
    /// The side to move is in check but can get out of it.
    Check(Color),
    /// The given side is checkmated.
    Checkmate(Color),
    /// The side to move has no legal moves and is not in check.
    Stalemate(Color),
}

impl GameStatus {
    #[inline]
    pub fn is_over(self) -> bool {
        matches!(self, GameStatus::Checkmate(_) | GameStatus::Stalemate(_))
    }
}

/// How a legal move changes the board beyond relocating the mover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveShape {
    Standard,
    Castle { rook_from: Position, rook_to: Position },
    EnPassant { captured: Position },
}

impl MoveShape {
    fn of(board: &Board, piece: &Piece, mv: Move) -> Self {
        match piece.kind() {
            PieceType::King if mv.row_delta() == 0 && mv.column_delta().abs() == 2 => {
                let step = mv.column_delta().signum();
                MoveShape::Castle {
                    rook_from: Position::new(mv.start.row(), if step > 0 { 8 } else { 1 }),
                    rook_to: mv.start.offset(0, step),
                }
            }
            PieceType::Pawn if mv.column_delta() != 0 && board.get_piece(mv.end).is_none() => {
                MoveShape::EnPassant {
                    captured: Position::new(mv.start.row(), mv.end.column()),
                }
            }
            _ => MoveShape::Standard,
        }
    }
}

/// Applies a move already known to be legal, with all of its side effects.
fn execute(board: &mut Board, mv: Move) {
    let Some(piece) = board.get_piece(mv.start).copied() else {
        return;
    };

    match MoveShape::of(board, &piece, mv) {
        MoveShape::Castle { rook_from, rook_to } => {
            trace!("castling {mv}, rook {rook_from} -> {rook_to}");
            board.move_piece(mv.start, mv.end);
            mark_moved(board, mv.end);
            board.move_piece(rook_from, rook_to);
            mark_moved(board, rook_to);
        }
        MoveShape::EnPassant { captured } => {
            trace!("en passant {mv}, capturing on {captured}");
            board.remove_piece(captured);
            board.move_piece(mv.start, mv.end);
            mark_moved(board, mv.end);
        }
        MoveShape::Standard => {
            board.move_piece(mv.start, mv.end);
            mark_moved(board, mv.end);
            // A promoted piece starts without history.
            if piece.kind() == PieceType::Pawn
                && mv.end.row() == piece.color().promotion_row()
                && let Some(kind) = mv.promotion
            {
                trace!("promoting on {} to {kind:?}", mv.end);
                board.add_piece(mv.end, Some(Piece::new(piece.color(), kind)));
            }
        }
    }

    board.set_last_move(Some(mv));
}

fn mark_moved(board: &mut Board, position: Position) {
    if let Some(piece) = board.get_piece_mut(position) {
        piece.set_has_moved(true);
    }
}

/// Whether playing `mv` keeps the king of `color` out of check.
///
/// Plays the move on a copy of `board`; the original is never touched.
fn keeps_king_safe(board: &Board, mv: Move, color: Color) -> bool {
    let mut probe = board.deep_copy();
    execute(&mut probe, mv);
    !probe.is_in_check(color)
}

/// A game of chess: the board and the side to move.
///
/// Check, checkmate and stalemate are not stored; they are recomputed from
/// the board on every query.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    side_to_move: Color,
    board: Board,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A new game at the standard starting position, White to move.
    pub fn new() -> Self {
        Self::from_board(Board::standard(), Color::White)
    }

    /// A game continuing from an arbitrary board.
    pub fn from_board(board: Board, side_to_move: Color) -> Self {
        Self {
            side_to_move,
            board,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move.
    #[inline]
    pub fn team_turn(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn set_team_turn(&mut self, color: Color) {
        self.side_to_move = color;
    }

    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.board.last_move()
    }

    /// Legal moves of the piece on `position`, or none if the square is empty.
    ///
    /// Includes castling and filters out every move that would leave the
    /// mover's own king in check.
    pub fn valid_moves(&self, position: Position) -> Vec<Move> {
        let Some(piece) = self.board.get_piece(position) else {
            return Vec::new();
        };

        let mut candidates = piece.piece_moves(&self.board, position);
        if piece.kind() == PieceType::King && !piece.has_moved() {
            candidates.extend(
                [position.offset(0, 2), position.offset(0, -2)]
                    .into_iter()
                    .filter(|&end| piece.is_castling_move(&self.board, position, end))
                    .map(|end| Move::new(position, end)),
            );
        }

        candidates.retain(|&mv| {
            let safe = keeps_king_safe(&self.board, mv, piece.color());
            if !safe {
                trace!("{mv} rejected, leaves {:?} king in check", piece.color());
            }
            safe
        });
        candidates
    }

    /// Legal moves of every piece of `color`.
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        self.board
            .pieces(color)
            .flat_map(|(position, _)| self.valid_moves(position))
            .collect()
    }

    fn has_legal_move(&self, color: Color) -> bool {
        self.board
            .pieces(color)
            .any(|(position, _)| !self.valid_moves(position).is_empty())
    }

    /// Validates and plays `mv` for the side to move.
    ///
    /// On error the game is left exactly as it was.
    pub fn make_move(&mut self, mv: Move) -> Result<(), MoveError> {
        let piece = *self
            .board
            .get_piece(mv.start)
            .ok_or(MoveError::NoPieceAtStart(mv.start))?;

        if piece.color() != self.side_to_move {
            return Err(MoveError::WrongTurn {
                piece: piece.color(),
                to_move: self.side_to_move,
            });
        }
        if !mv.end.is_on_board() {
            return Err(MoveError::OutOfBounds(mv.end));
        }
        if self
            .board
            .get_piece(mv.end)
            .is_some_and(|target| target.color() == piece.color())
        {
            return Err(MoveError::FriendlyCapture(mv.end));
        }
        if piece.kind() == PieceType::King
            && mv.row_delta() == 0
            && mv.column_delta().abs() == 2
            && !piece.is_castling_move(&self.board, mv.start, mv.end)
        {
            return Err(MoveError::CastlingBlocked(mv));
        }

        let legal = self.valid_moves(mv.start);
        if piece.kind() == PieceType::Pawn
            && mv.end.row() == piece.color().promotion_row()
            && mv.promotion.is_none()
            && legal.contains(&Move::with_promotion(mv.start, mv.end, PieceType::Queen))
        {
            return Err(MoveError::MissingPromotion(mv));
        }
        if !legal.contains(&mv) {
            return Err(MoveError::NotInLegalSet(mv));
        }

        debug!("{:?} plays {mv}", self.side_to_move);
        execute(&mut self.board, mv);
        self.side_to_move = self.side_to_move.opponent();
        Ok(())
    }

    /// Whether the king of `color` is attacked.
    #[inline]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.board.is_in_check(color)
    }

    /// In check with no legal move.
    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_legal_move(color)
    }

    /// Not in check and no legal move.
    pub fn is_in_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && !self.has_legal_move(color)
    }

    /// Whether any piece of the opponent of `friendly` attacks `position`.
    #[inline]
    pub fn is_position_under_attack(&self, position: Position, friendly: Color) -> bool {
        self.board.is_position_under_attack(position, friendly)
    }

    /// Check/checkmate/stalemate state of the side to move.
    pub fn status(&self) -> GameStatus {
        let color = self.side_to_move;
        match (self.is_in_check(color), self.has_legal_move(color)) {
            (true, true) => GameStatus::Check(color),
            (true, false) => GameStatus::Checkmate(color),
            (false, true) => GameStatus::InProgress(color),
            (false, false) => GameStatus::Stalemate(color),
        }
    }
}
