mod display;
mod interactive;

pub use display::{DisplayError, TerminalDisplay};
pub use interactive::run_interactive_terminal;
