use std::io::{self, Write};

use crate::BoardDisplay;
use crate::feedback::{BoardFeedback, SquareFeedback};
use crate::game_logic::Game;
use crate::piece::Piece;
use crate::position::{BOARD_SIZE, Position};

/// Terminal-based board display.
///
/// Renders the board as an 8×8 grid of piece letters, uppercase for White,
/// with ANSI color-coded squares matching the feedback type (destinations,
/// captures, etc.).
#[derive(Debug)]
pub struct TerminalDisplay<W = io::Stdout> {
    out: W,
}

impl TerminalDisplay {
    /// A display writing to stdout.
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalDisplay<W> {
    /// A display writing to `out`.
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Error type for terminal display operations.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("failed to write to terminal: {0}")]
    Io(#[from] io::Error),
}

impl<W: Write> BoardDisplay for TerminalDisplay<W> {
    type Error = DisplayError;

    fn show(&mut self, game: &Game, feedback: &BoardFeedback) -> Result<(), Self::Error> {
        render(&mut self.out, game, feedback)
    }
}

/// Render the board and feedback to any writer.
fn render(w: &mut impl Write, game: &Game, feedback: &BoardFeedback) -> Result<(), DisplayError> {
    for row in (1..=BOARD_SIZE).rev() {
        write!(w, " {row} ")?;
        for column in 1..=BOARD_SIZE {
            let position = Position::new(row, column);
            let symbol = game.board().get_piece(position).map_or('·', Piece::char);
            write!(w, "{}", format_square(symbol, feedback.get(position)))?;
        }
        writeln!(w)?;
    }
    writeln!(w, "    a  b  c  d  e  f  g  h")?;
    w.flush()?;
    Ok(())
}

/// Wrap a square's symbol in the ANSI background for its feedback.
fn format_square(symbol: char, feedback: Option<SquareFeedback>) -> String {
    let background = match feedback {
        Some(SquareFeedback::Destination) => "44",
        Some(SquareFeedback::Capture) => "41",
        Some(SquareFeedback::Origin) => "42",
        Some(SquareFeedback::Check) => "45",
        Some(SquareFeedback::Checker) => "43",
        None => return format!(" {symbol} "),
    };
    format!("\x1b[{background}m {symbol} \x1b[0m")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess_move::Move;
    use crate::feedback::compute_feedback;

    fn pos(s: &str) -> Position {
        s.parse().expect("test square is invalid")
    }

    fn render_to_string(game: &Game, feedback: &BoardFeedback) -> String {
        let mut display = TerminalDisplay::with_writer(Vec::new());
        display
            .show(game, feedback)
            .expect("rendering to buffer should succeed");
        String::from_utf8(display.into_inner()).expect("output should be valid UTF-8")
    }

    fn render_feedback(square: &str, kind: SquareFeedback) -> String {
        let mut feedback = BoardFeedback::new();
        feedback.set(pos(square), kind);
        render_to_string(&Game::new(), &feedback)
    }

    #[test]
    fn show_contains_all_row_labels() {
        let output = render_to_string(&Game::new(), &BoardFeedback::new());

        for row in '1'..='8' {
            assert!(
                output.contains(&format!(" {row} ")),
                "output should contain row label '{row}'"
            );
        }
    }

    #[test]
    fn show_contains_file_labels() {
        let output = render_to_string(&Game::new(), &BoardFeedback::new());

        assert!(
            output.contains("a  b  c  d  e  f  g  h"),
            "output should contain file labels"
        );
    }

    #[test]
    fn show_starting_position_rows() {
        let output = render_to_string(&Game::new(), &BoardFeedback::new());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], " 8  r  n  b  q  k  b  n  r ");
        assert_eq!(lines[4], " 4  ·  ·  ·  ·  ·  ·  ·  · ");
        assert_eq!(lines[7], " 1  R  N  B  Q  K  B  N  R ");
    }

    #[test]
    fn show_reflects_played_moves() {
        let mut game = Game::new();
        game.make_move(Move::new(pos("e2"), pos("e4")))
            .expect("opening move should be legal");

        let output = render_to_string(&game, &BoardFeedback::new());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[4], " 4  ·  ·  ·  ·  P  ·  ·  · ");
        assert_eq!(lines[6], " 2  P  P  P  P  ·  P  P  P ");
    }

    #[test]
    fn show_destination_uses_blue_background() {
        let output = render_feedback("e4", SquareFeedback::Destination);
        assert!(
            output.contains("\x1b[44m · \x1b[0m"),
            "destination should use blue ANSI background"
        );
    }

    #[test]
    fn show_capture_uses_red_background() {
        let output = render_feedback("d7", SquareFeedback::Capture);
        assert!(
            output.contains("\x1b[41m p \x1b[0m"),
            "capture should use red ANSI background"
        );
    }

    #[test]
    fn show_origin_uses_green_background() {
        let output = render_feedback("e2", SquareFeedback::Origin);
        assert!(
            output.contains("\x1b[42m P \x1b[0m"),
            "origin should use green ANSI background"
        );
    }

    #[test]
    fn show_check_uses_magenta_background() {
        let output = render_feedback("e8", SquareFeedback::Check);
        assert!(
            output.contains("\x1b[45m k \x1b[0m"),
            "check should use magenta ANSI background"
        );
    }

    #[test]
    fn show_checker_uses_yellow_background() {
        let output = render_feedback("h5", SquareFeedback::Checker);
        assert!(
            output.contains("\x1b[43m"),
            "checker should use yellow ANSI background"
        );
    }

    #[test]
    fn show_computed_feedback_for_selection() {
        let game = Game::new();
        let output = render_to_string(&game, &compute_feedback(&game, Some(pos("g1"))));

        assert_eq!(output.matches("\x1b[44m").count(), 2, "Nf3 and Nh3");
        assert_eq!(output.matches("\x1b[42m").count(), 1);
    }

    #[test]
    fn empty_feedback_has_no_ansi_codes() {
        let output = render_to_string(&Game::new(), &BoardFeedback::new());

        assert!(
            !output.contains("\x1b["),
            "empty feedback should have no ANSI codes"
        );
    }
}
