use crate::chess_move::Move;
use crate::game_logic::Game;
use crate::piece::PieceType;
use crate::position::Position;

/// Type of visual feedback for an individual square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareFeedback {
    /// Legal destination of the selected piece
    Destination,
    /// Legal destination that captures an opponent piece
    Capture,
    /// Square of the selected piece
    Origin,
    /// King of the side to move, currently in check
    Check,
    /// Piece giving check
    Checker,
}

/// Squares to highlight and how, computed by [`compute_feedback`] and
/// consumed by a [`crate::BoardDisplay`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardFeedback {
    squares: Vec<(Position, SquareFeedback)>,
}

impl BoardFeedback {
    /// Create empty feedback (no highlights)
    #[inline]
    pub const fn new() -> Self {
        Self {
            squares: Vec::new(),
        }
    }

    /// Get all square feedback entries
    #[inline]
    pub fn squares(&self) -> &[(Position, SquareFeedback)] {
        &self.squares
    }

    /// Get feedback for a specific square, if any
    #[inline]
    pub fn get(&self, square: Position) -> Option<SquareFeedback> {
        self.squares
            .iter()
            .find(|(sq, _)| *sq == square)
            .map(|(_, feedback)| *feedback)
    }

    /// Set feedback for a square, replacing any previous entry
    pub fn set(&mut self, square: Position, feedback: SquareFeedback) {
        match self.squares.iter_mut().find(|(sq, _)| *sq == square) {
            Some(entry) => entry.1 = feedback,
            None => self.squares.push((square, feedback)),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }
}

impl From<Vec<(Position, SquareFeedback)>> for BoardFeedback {
    fn from(squares: Vec<(Position, SquareFeedback)>) -> Self {
        Self { squares }
    }
}

/// King in check and the pieces attacking it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInfo {
    pub king_square: Position,
    pub checkers: Vec<Position>,
}

/// Game state information needed to compute feedback
pub trait FeedbackSource {
    /// Legal moves of the piece on `from`
    fn legal_moves_from(&self, from: Position) -> Vec<Move>;

    /// Whether `mv` removes an opponent piece
    fn is_capture(&self, mv: &Move) -> bool;

    /// Check on the side to move, if any
    fn check_info(&self) -> Option<CheckInfo>;
}

impl FeedbackSource for Game {
    fn legal_moves_from(&self, from: Position) -> Vec<Move> {
        self.valid_moves(from)
    }

    fn is_capture(&self, mv: &Move) -> bool {
        let board = self.board();
        if board.get_piece(mv.end).is_some() {
            return true;
        }
        // En passant: a pawn moving diagonally onto an empty square
        board
            .get_piece(mv.start)
            .is_some_and(|piece| piece.kind() == PieceType::Pawn && mv.start.column() != mv.end.column())
    }

    fn check_info(&self) -> Option<CheckInfo> {
        let color = self.team_turn();
        if !self.is_in_check(color) {
            return None;
        }
        Some(CheckInfo {
            king_square: self.board().king_position(color)?,
            checkers: self.board().checkers(color),
        })
    }
}

/// Compute visual feedback for the current game state.
///
/// Check is always shown. With a selected square, its piece's legal
/// destinations are shown on top, captures distinguished from quiet moves.
pub fn compute_feedback(source: &impl FeedbackSource, selected: Option<Position>) -> BoardFeedback {
    let mut feedback = BoardFeedback::new();

    if let Some(check) = source.check_info() {
        feedback.set(check.king_square, SquareFeedback::Check);
        for checker in check.checkers {
            feedback.set(checker, SquareFeedback::Checker);
        }
    }

    if let Some(from) = selected {
        let moves = source.legal_moves_from(from);
        if !moves.is_empty() {
            feedback.set(from, SquareFeedback::Origin);
        }
        for mv in moves {
            feedback.set(mv.end, classify_move(source, &mv));
        }
    }

    feedback
}

/// Classify a move as either a capture or regular destination
fn classify_move(source: &impl FeedbackSource, mv: &Move) -> SquareFeedback {
    if source.is_capture(mv) {
        SquareFeedback::Capture
    } else {
        SquareFeedback::Destination
    }
}
