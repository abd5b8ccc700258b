use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::chess_move::Move;
use crate::position::Position;

/// The two sides of a game.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row direction pawns of this color advance in.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Row holding this color's king and rooks at the start.
    #[inline]
    pub const fn back_row(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => 8,
        }
    }

    /// Row pawns of this color start on and may double-step from.
    #[inline]
    pub const fn pawn_home_row(self) -> i8 {
        match self {
            Color::White => 2,
            Color::Black => 7,
        }
    }

    /// Row on which pawns of this color promote.
    #[inline]
    pub const fn promotion_row(self) -> i8 {
        self.opponent().back_row()
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.opponent()
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
}

impl PieceType {
    /// Piece types a pawn may promote to, strongest first.
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    /// Uppercase letter used in coordinate displays.
    pub const fn char(self) -> char {
        match self {
            PieceType::King => 'K',
            PieceType::Queen => 'Q',
            PieceType::Bishop => 'B',
            PieceType::Knight => 'N',
            PieceType::Rook => 'R',
            PieceType::Pawn => 'P',
        }
    }

    /// Parse a promotion letter (`q`, `r`, `b`, `n`, either case).
    pub fn from_promotion_char(ch: char) -> Option<PieceType> {
        match ch.to_ascii_lowercase() {
            'q' => Some(PieceType::Queen),
            'r' => Some(PieceType::Rook),
            'b' => Some(PieceType::Bishop),
            'n' => Some(PieceType::Knight),
            _ => None,
        }
    }
}

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];
const KING_STEPS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// A chess piece.
///
/// Identity is `(color, kind)`: two pieces compare and hash equal whenever
/// their color and type match. `has_moved` and the cached position are
/// bookkeeping for castling and do not take part in equality.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct Piece {
    color: Color,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    kind: PieceType,
    has_moved: bool,
    position: Position,
}

impl Piece {
    /// A piece that has not moved and is not yet placed on a board.
    pub const fn new(color: Color, kind: PieceType) -> Self {
        Self {
            color,
            kind,
            has_moved: false,
            position: Position::new(0, 0),
        }
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub const fn kind(&self) -> PieceType {
        self.kind
    }

    #[inline]
    pub const fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Where the board last placed this piece.
    #[inline]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub fn set_has_moved(&mut self, has_moved: bool) {
        self.has_moved = has_moved;
    }

    #[inline]
    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Display letter: uppercase for White, lowercase for Black.
    pub fn char(&self) -> char {
        match self.color {
            Color::White => self.kind.char(),
            Color::Black => self.kind.char().to_ascii_lowercase(),
        }
    }

    /// Every move this piece could make from `at`, ignoring whether it leaves
    /// its own king in check. Castling is not included.
    pub fn piece_moves(&self, board: &Board, at: Position) -> Vec<Move> {
        let mut moves = Vec::new();
        match self.kind {
            PieceType::Bishop => self.slide(board, at, &DIAGONALS, &mut moves),
            PieceType::Rook => self.slide(board, at, &ORTHOGONALS, &mut moves),
            PieceType::Queen => {
                self.slide(board, at, &DIAGONALS, &mut moves);
                self.slide(board, at, &ORTHOGONALS, &mut moves);
            }
            PieceType::Knight => self.step(board, at, &KNIGHT_JUMPS, &mut moves),
            PieceType::King => self.step(board, at, &KING_STEPS, &mut moves),
            PieceType::Pawn => self.pawn_moves(board, at, &mut moves),
        }
        moves
    }

    /// Squares this piece standing on `at` attacks.
    ///
    /// Same as the destinations of [`Piece::piece_moves`] except for pawns,
    /// which attack both forward diagonals whether or not anything stands
    /// there and never attack straight ahead.
    pub fn attacked_squares(&self, board: &Board, at: Position) -> Vec<Position> {
        match self.kind {
            PieceType::Pawn => [-1, 1]
                .into_iter()
                .map(|d_column| at.offset(self.color.forward(), d_column))
                .filter(|target| target.is_on_board())
                .collect(),
            _ => self
                .piece_moves(board, at)
                .into_iter()
                .map(|mv| mv.end)
                .collect(),
        }
    }

    /// Whether moving this king from `at` to `end` is a legal castle.
    ///
    /// Requires an unmoved king, a destination two columns away on the same
    /// row, an unmoved rook of the same color in the corner on that side,
    /// empty squares between them, and none of the king's square, the square
    /// it crosses, or `end` under attack.
    pub fn is_castling_move(&self, board: &Board, at: Position, end: Position) -> bool {
        if self.kind != PieceType::King
            || self.has_moved
            || !at.is_on_board()
            || !end.is_on_board()
        {
            return false;
        }

        let start = at;
        let d_column = end.column() - start.column();
        if end.row() != start.row() || d_column.abs() != 2 {
            return false;
        }

        let step = d_column.signum();
        let rook_at = Position::new(start.row(), if step > 0 { 8 } else { 1 });
        let rook_ready = board.get_piece(rook_at).is_some_and(|rook| {
            rook.kind == PieceType::Rook && rook.color == self.color && !rook.has_moved
        });
        if !rook_ready {
            return false;
        }

        let mut between = start.offset(0, step);
        while between != rook_at {
            if board.get_piece(between).is_some() {
                return false;
            }
            between = between.offset(0, step);
        }

        [start, start.offset(0, step), end]
            .into_iter()
            .all(|square| !board.is_position_under_attack(square, self.color))
    }

    fn slide(&self, board: &Board, at: Position, directions: &[(i8, i8)], moves: &mut Vec<Move>) {
        for &(d_row, d_column) in directions {
            let mut target = at.offset(d_row, d_column);
            while target.is_on_board() {
                match board.get_piece(target) {
                    None => moves.push(Move::new(at, target)),
                    Some(other) => {
                        if other.color != self.color {
                            moves.push(Move::new(at, target));
                        }
                        break;
                    }
                }
                target = target.offset(d_row, d_column);
            }
        }
    }

    fn step(&self, board: &Board, at: Position, offsets: &[(i8, i8)], moves: &mut Vec<Move>) {
        moves.extend(
            offsets
                .iter()
                .map(|&(d_row, d_column)| at.offset(d_row, d_column))
                .filter(|target| target.is_on_board())
                .filter(|&target| board.get_piece(target).is_none_or(|other| other.color != self.color))
                .map(|target| Move::new(at, target)),
        );
    }

    fn pawn_moves(&self, board: &Board, at: Position, moves: &mut Vec<Move>) {
        let forward = self.color.forward();

        let one = at.offset(forward, 0);
        if one.is_on_board() && board.get_piece(one).is_none() {
            self.push_pawn_move(at, one, moves);

            let two = at.offset(2 * forward, 0);
            if at.row() == self.color.pawn_home_row() && board.get_piece(two).is_none() {
                moves.push(Move::new(at, two));
            }
        }

        for d_column in [-1, 1] {
            let target = at.offset(forward, d_column);
            if board
                .get_piece(target)
                .is_some_and(|other| other.color != self.color)
            {
                self.push_pawn_move(at, target, moves);
            }
        }

        if let Some(target) = self.en_passant_target(board, at) {
            moves.push(Move::new(at, target));
        }
    }

    /// Pushes `at -> target`, expanded into the four promotions on the far rank.
    fn push_pawn_move(&self, at: Position, target: Position, moves: &mut Vec<Move>) {
        if target.row() == self.color.promotion_row() {
            moves.extend(
                PieceType::PROMOTIONS
                    .into_iter()
                    .map(|kind| Move::with_promotion(at, target, kind)),
            );
        } else {
            moves.push(Move::new(at, target));
        }
    }

    /// Destination of an en passant capture for a pawn on `at`, if the last
    /// move was an enemy pawn double-step landing right beside it.
    fn en_passant_target(&self, board: &Board, at: Position) -> Option<Position> {
        let last = board.last_move()?;
        let victim = board.get_piece(last.end)?;
        if victim.kind != PieceType::Pawn || victim.color == self.color {
            return None;
        }
        if last.row_delta().abs() != 2 || last.column_delta() != 0 {
            return None;
        }
        if last.end.row() != at.row() || (last.end.column() - at.column()).abs() != 1 {
            return None;
        }

        let target = Position::new(at.row() + self.color.forward(), last.end.column());
        (target.is_on_board() && board.get_piece(target).is_none()).then_some(target)
    }
}

impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.color == other.color && self.kind == other.kind
    }
}

impl Eq for Piece {}

impl Hash for Piece {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.color.hash(state);
        self.kind.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn pos(s: &str) -> Position {
        s.parse().expect("test square is invalid")
    }

    fn destinations(board: &Board, at: &str) -> Vec<String> {
        let at = pos(at);
        let piece = board.get_piece(at).expect("no piece on test square");
        let mut ends: Vec<String> = piece
            .piece_moves(board, at)
            .into_iter()
            .map(|mv| mv.end.to_string())
            .collect();
        ends.sort();
        ends
    }

    fn board_with(pieces: &[(&str, Color, PieceType)]) -> Board {
        let mut board = Board::new();
        for &(square, color, kind) in pieces {
            board.add_piece(pos(square), Some(Piece::new(color, kind)));
        }
        board
    }

    #[test]
    fn test_color_helpers() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(Color::Black.opponent(), Color::White);
        assert_eq!(Color::White.promotion_row(), 8);
        assert_eq!(Color::Black.promotion_row(), 1);
        assert_eq!(Color::Black.pawn_home_row(), 7);
    }

    #[test]
    fn test_equality_ignores_history() {
        let mut moved = Piece::new(Color::White, PieceType::Rook);
        moved.set_has_moved(true);
        moved.set_position(pos("a4"));

        assert_eq!(moved, Piece::new(Color::White, PieceType::Rook));
        assert_ne!(moved, Piece::new(Color::Black, PieceType::Rook));
        assert_ne!(moved, Piece::new(Color::White, PieceType::Queen));
    }

    #[test]
    fn test_char() {
        assert_eq!(Piece::new(Color::White, PieceType::Knight).char(), 'N');
        assert_eq!(Piece::new(Color::Black, PieceType::Queen).char(), 'q');
    }

    #[test_case('q', Some(PieceType::Queen))]
    #[test_case('N', Some(PieceType::Knight))]
    #[test_case('k', None; "king is not a promotion")]
    #[test_case('p', None; "pawn is not a promotion")]
    fn test_from_promotion_char(ch: char, expected: Option<PieceType>) {
        assert_eq!(PieceType::from_promotion_char(ch), expected);
    }

    #[test]
    fn test_rook_stops_at_blockers() {
        let board = board_with(&[
            ("d4", Color::White, PieceType::Rook),
            ("d6", Color::Black, PieceType::Pawn),
            ("b4", Color::White, PieceType::Pawn),
        ]);

        assert_eq!(
            destinations(&board, "d4"),
            ["c4", "d1", "d2", "d3", "d5", "d6", "e4", "f4", "g4", "h4"]
        );
    }

    #[test]
    fn test_bishop_in_corner() {
        let board = board_with(&[("a1", Color::Black, PieceType::Bishop)]);
        assert_eq!(
            destinations(&board, "a1"),
            ["b2", "c3", "d4", "e5", "f6", "g7", "h8"]
        );
    }

    #[test]
    fn test_queen_combines_rook_and_bishop() {
        let board = board_with(&[("d4", Color::White, PieceType::Queen)]);
        let queen = board.get_piece(pos("d4")).unwrap();
        assert_eq!(queen.piece_moves(&board, pos("d4")).len(), 27);
    }

    #[test_case("d4", 8)]
    #[test_case("a1", 2; "corner")]
    #[test_case("b1", 3; "edge")]
    fn test_knight_move_count(square: &str, expected: usize) {
        let board = board_with(&[(square, Color::White, PieceType::Knight)]);
        let knight = board.get_piece(pos(square)).unwrap();
        assert_eq!(knight.piece_moves(&board, pos(square)).len(), expected);
    }

    #[test]
    fn test_king_skips_friendly_squares() {
        let board = board_with(&[
            ("e1", Color::White, PieceType::King),
            ("d1", Color::White, PieceType::Queen),
            ("e2", Color::Black, PieceType::Pawn),
        ]);
        assert_eq!(destinations(&board, "e1"), ["d2", "e2", "f1", "f2"]);
    }

    #[test]
    fn test_pawn_single_and_double_step() {
        let board = board_with(&[("e2", Color::White, PieceType::Pawn)]);
        assert_eq!(destinations(&board, "e2"), ["e3", "e4"]);

        let board = board_with(&[("d7", Color::Black, PieceType::Pawn)]);
        assert_eq!(destinations(&board, "d7"), ["d5", "d6"]);
    }

    #[test]
    fn test_pawn_double_step_blocked_by_intermediate_square() {
        let board = board_with(&[
            ("e2", Color::White, PieceType::Pawn),
            ("e3", Color::Black, PieceType::Knight),
        ]);
        assert!(destinations(&board, "e2").is_empty());
    }

    #[test]
    fn test_pawn_double_step_blocked_on_target() {
        let board = board_with(&[
            ("e2", Color::White, PieceType::Pawn),
            ("e4", Color::Black, PieceType::Knight),
        ]);
        assert_eq!(destinations(&board, "e2"), ["e3"]);
    }

    #[test]
    fn test_pawn_captures_only_enemies() {
        let board = board_with(&[
            ("e4", Color::White, PieceType::Pawn),
            ("d5", Color::Black, PieceType::Pawn),
            ("f5", Color::White, PieceType::Pawn),
        ]);
        assert_eq!(destinations(&board, "e4"), ["d5", "e5"]);
    }

    #[test]
    fn test_pawn_promotion_expands_to_four_moves() {
        let board = board_with(&[
            ("b7", Color::White, PieceType::Pawn),
            ("a8", Color::Black, PieceType::Rook),
        ]);
        let pawn = board.get_piece(pos("b7")).unwrap();
        let moves = pawn.piece_moves(&board, pos("b7"));

        assert_eq!(moves.len(), 8);
        assert!(moves.iter().all(|mv| mv.promotion.is_some()));
        for kind in PieceType::PROMOTIONS {
            assert!(moves.contains(&Move::with_promotion(pos("b7"), pos("b8"), kind)));
            assert!(moves.contains(&Move::with_promotion(pos("b7"), pos("a8"), kind)));
        }
    }

    #[test]
    fn test_black_pawn_promotes_on_row_one() {
        let board = board_with(&[("h2", Color::Black, PieceType::Pawn)]);
        let pawn = board.get_piece(pos("h2")).unwrap();
        let moves = pawn.piece_moves(&board, pos("h2"));
        assert_eq!(moves.len(), 4);
        assert!(moves.iter().all(|mv| mv.end == pos("h1")));
    }

    #[test]
    fn test_en_passant_after_double_step() {
        let mut board = board_with(&[
            ("e5", Color::White, PieceType::Pawn),
            ("d7", Color::Black, PieceType::Pawn),
        ]);
        board.move_piece(pos("d7"), pos("d5"));
        board.set_last_move(Some(Move::new(pos("d7"), pos("d5"))));

        assert_eq!(destinations(&board, "e5"), ["d6", "e6"]);
    }

    #[test]
    fn test_no_en_passant_after_single_steps() {
        let mut board = board_with(&[
            ("e5", Color::White, PieceType::Pawn),
            ("d6", Color::Black, PieceType::Pawn),
        ]);
        board.move_piece(pos("d6"), pos("d5"));
        board.set_last_move(Some(Move::new(pos("d6"), pos("d5"))));

        assert_eq!(destinations(&board, "e5"), ["e6"]);
    }

    #[test]
    fn test_no_en_passant_for_non_adjacent_pawn() {
        let mut board = board_with(&[
            ("f5", Color::White, PieceType::Pawn),
            ("d7", Color::Black, PieceType::Pawn),
        ]);
        board.move_piece(pos("d7"), pos("d5"));
        board.set_last_move(Some(Move::new(pos("d7"), pos("d5"))));

        assert_eq!(destinations(&board, "f5"), ["f6"]);
    }

    #[test]
    fn test_pawn_attacks_empty_diagonals() {
        let board = board_with(&[("a7", Color::Black, PieceType::Pawn)]);
        let pawn = board.get_piece(pos("a7")).unwrap();
        assert_eq!(pawn.attacked_squares(&board, pos("a7")), vec![pos("b6")]);
    }

    fn castling_board() -> Board {
        board_with(&[
            ("e1", Color::White, PieceType::King),
            ("a1", Color::White, PieceType::Rook),
            ("h1", Color::White, PieceType::Rook),
            ("e8", Color::Black, PieceType::King),
        ])
    }

    #[test_case("g1", true; "kingside")]
    #[test_case("c1", true; "queenside")]
    #[test_case("f1", false; "one column")]
    #[test_case("g2", false; "wrong row")]
    fn test_castling_destinations(end: &str, expected: bool) {
        let board = castling_board();
        let king = board.get_piece(pos("e1")).unwrap();
        assert_eq!(king.is_castling_move(&board, pos("e1"), pos(end)), expected);
    }

    #[test]
    fn test_castling_requires_unmoved_king() {
        let mut board = castling_board();
        let mut king = *board.get_piece(pos("e1")).unwrap();
        king.set_has_moved(true);
        board.add_piece(pos("e1"), Some(king));

        assert!(!king.is_castling_move(&board, pos("e1"), pos("g1")));
    }

    #[test]
    fn test_castling_requires_unmoved_rook() {
        let mut board = castling_board();
        let mut rook = *board.get_piece(pos("h1")).unwrap();
        rook.set_has_moved(true);
        board.add_piece(pos("h1"), Some(rook));

        let king = board.get_piece(pos("e1")).unwrap();
        assert!(!king.is_castling_move(&board, pos("e1"), pos("g1")));
        assert!(king.is_castling_move(&board, pos("e1"), pos("c1")));
    }

    #[test]
    fn test_castling_requires_empty_path() {
        let mut board = castling_board();
        board.add_piece(pos("b1"), Some(Piece::new(Color::White, PieceType::Knight)));

        let king = board.get_piece(pos("e1")).unwrap();
        assert!(!king.is_castling_move(&board, pos("e1"), pos("c1")));
        assert!(king.is_castling_move(&board, pos("e1"), pos("g1")));
    }

    #[test_case("e4"; "king in check")]
    #[test_case("f4"; "crossing square attacked")]
    #[test_case("g4"; "destination attacked")]
    fn test_castling_through_attack(rook_square: &str) {
        let mut board = castling_board();
        board.add_piece(pos(rook_square), Some(Piece::new(Color::Black, PieceType::Rook)));

        let king = board.get_piece(pos("e1")).unwrap();
        assert!(!king.is_castling_move(&board, pos("e1"), pos("g1")));
    }

    #[test]
    fn test_castling_blocked_by_pawn_attack_on_empty_square() {
        let mut board = castling_board();
        board.add_piece(pos("h2"), Some(Piece::new(Color::Black, PieceType::Pawn)));

        let king = board.get_piece(pos("e1")).unwrap();
        assert!(!king.is_castling_move(&board, pos("e1"), pos("g1")));
    }

    #[test]
    fn test_castling_rejects_foreign_rook() {
        let mut board = castling_board();
        board.add_piece(pos("h1"), Some(Piece::new(Color::Black, PieceType::Rook)));

        let king = board.get_piece(pos("e1")).unwrap();
        assert!(!king.is_castling_move(&board, pos("e1"), pos("g1")));
    }

    #[test]
    fn test_castling_uses_board_square_not_cached_position() {
        let board = castling_board();
        let mut king = *board.get_piece(pos("e1")).unwrap();
        king.set_position(Position::new(1, i8::MIN));

        assert!(king.is_castling_move(&board, pos("e1"), pos("g1")));
        assert!(!king.is_castling_move(&board, Position::new(1, i8::MIN), pos("g1")));
    }

    #[test]
    fn test_non_king_never_castles() {
        let board = castling_board();
        let rook = board.get_piece(pos("a1")).unwrap();
        assert!(!rook.is_castling_move(&board, pos("a1"), pos("c1")));
    }
}
