pub mod board;
pub mod chess_move;
pub mod feedback;
pub mod game_logic;
pub mod piece;
pub mod position;
pub mod session;
pub mod terminal;

pub use board::Board;
pub use chess_move::Move;
pub use game_logic::{Game, GameStatus, MoveError};
pub use piece::{Color, Piece, PieceType};
pub use position::{ParsePositionError, Position};
pub use session::{GameId, GameSession, GameTable, MoveReport, Outcome, SessionError};

/// Trait for displaying a game and its feedback to the player.
///
/// Abstracts over terminal rendering and whatever front end a transport
/// layer drives, providing a uniform interface for the output side of the
/// game loop.
pub trait BoardDisplay {
    /// Error type for display update failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Show the board of `game` with the given feedback state.
    ///
    /// Implementations map [`feedback::SquareFeedback`] variants
    /// to their own output (terminal colors, client highlights, etc.).
    fn show(&mut self, game: &Game, feedback: &feedback::BoardFeedback) -> Result<(), Self::Error>;
}
