use std::io::{self, Write};

use super::TerminalDisplay;
use crate::BoardDisplay;
use crate::chess_move::Move;
use crate::feedback::compute_feedback;
use crate::piece::PieceType;
use crate::position::Position;
use crate::session::{GameSession, MoveReport, Outcome};

/// A line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Move(Move),
    Select(Position),
    Resign,
    Reset,
    Refresh,
    Quit,
}

/// Parse a command line, returning a usage message on bad input.
fn parse_command(input: &str) -> Result<Option<Command>, String> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let Some(&first) = parts.first() else {
        return Ok(None);
    };

    let command = match first {
        "m" => {
            let [_, from, to, rest @ ..] = parts.as_slice() else {
                return Err("Usage: m <from> <to> [q|r|b|n]".to_string());
            };
            let start = parse_square(from)?;
            let end = parse_square(to)?;
            match rest {
                [] => Command::Move(Move::new(start, end)),
                [promo] => Command::Move(Move::with_promotion(start, end, parse_promotion(promo)?)),
                _ => return Err("Usage: m <from> <to> [q|r|b|n]".to_string()),
            }
        }
        "s" => {
            let [_, square] = parts.as_slice() else {
                return Err("Usage: s <square>".to_string());
            };
            Command::Select(parse_square(square)?)
        }
        "resign" => Command::Resign,
        "r" => Command::Reset,
        "p" => Command::Refresh,
        "q" => Command::Quit,
        _ => return Err("Unknown command".to_string()),
    };
    Ok(Some(command))
}

fn parse_square(text: &str) -> Result<Position, String> {
    text.parse().map_err(|e| format!("Invalid square: {e}"))
}

fn parse_promotion(text: &str) -> Result<PieceType, String> {
    let mut chars = text.chars();
    let kind = match (chars.next(), chars.next()) {
        (Some(ch), None) => PieceType::from_promotion_char(ch),
        _ => None,
    };
    kind.ok_or_else(|| format!("Invalid promotion piece: {text}"))
}

/// Clears the screen and moves cursor to top-left.
#[inline]
fn clear_screen() {
    print!("\x1B[2J\x1B[H");
}

/// Runs an interactive two-player game in the terminal.
///
/// Both sides enter moves at the same prompt. Selecting a square highlights
/// the legal moves of the piece standing there.
pub fn run_interactive_terminal() {
    let mut session = GameSession::new();
    let mut display = TerminalDisplay::new();
    let mut selected = None;

    clear_screen();
    draw_interface(&mut display, &session, selected);

    loop {
        print!("> ");
        if let Err(e) = io::stdout().flush() {
            eprintln!("Failed to flush stdout: {}", e);
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                break;
            }
        }

        let command = match parse_command(&input) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            Command::Move(mv) => match session.make_move(mv) {
                Ok(report) => {
                    selected = None;
                    clear_screen();
                    draw_interface(&mut display, &session, selected);
                    println!("\n{}", describe_report(report, mv));
                }
                Err(e) => println!("❌ {e}"),
            },
            Command::Select(square) => {
                selected = Some(square);
                clear_screen();
                draw_interface(&mut display, &session, selected);
            }
            Command::Resign => {
                let color = session.game().team_turn();
                match session.resign(color) {
                    Ok(outcome) => println!("\n🏳️  {}", describe_outcome(outcome)),
                    Err(e) => println!("❌ {e}"),
                }
            }
            Command::Reset => {
                session = GameSession::new();
                selected = None;
                clear_screen();
                draw_interface(&mut display, &session, selected);
                println!("\n🔄 Reset to initial state");
            }
            Command::Refresh => {
                clear_screen();
                draw_interface(&mut display, &session, selected);
            }
            Command::Quit => break,
        }
    }
}

/// Draws the complete interface: help text, side to move and the board.
fn draw_interface(display: &mut TerminalDisplay, session: &GameSession, selected: Option<Position>) {
    println!("♟️  Chess");
    println!();
    println!("Commands: m <from> <to> [q|r|b|n] | s <square> | resign | r (reset) | p (refresh) | q (quit)");
    println!();

    match session.outcome() {
        Some(outcome) => println!("Game over: {}", describe_outcome(outcome)),
        None => println!("{:?} to move", session.game().team_turn()),
    }
    println!();

    let feedback = compute_feedback(session.game(), selected);
    if let Err(e) = display.show(session.game(), &feedback) {
        eprintln!("Failed to draw board: {}", e);
    }
}

fn describe_report(report: MoveReport, mv: Move) -> String {
    match report {
        MoveReport::Continue => format!("✅ {mv}"),
        MoveReport::Check(color) => format!("✅ {mv}, {color:?} is in check"),
        MoveReport::Finished(outcome) => format!("🏁 {mv}, {}", describe_outcome(outcome)),
    }
}

fn describe_outcome(outcome: Outcome) -> String {
    match outcome {
        Outcome::Checkmate { winner } => format!("checkmate, {winner:?} wins"),
        Outcome::Stalemate => "stalemate, draw".to_string(),
        Outcome::Resignation { winner } => format!("{:?} resigns, {winner:?} wins", winner.opponent()),
    }
}
