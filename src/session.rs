//! Game sessions: a [`Game`] plus the outcome bookkeeping a server needs
//! around it, and a table that serializes access per game.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use log::{info, warn};

use crate::chess_move::Move;
use crate::game_logic::{Game, GameStatus, MoveError};
use crate::piece::Color;

/// Identifier handed out by [`GameTable`].
pub type GameId = u32;

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    Resignation { winner: Color },
}

impl Outcome {
    /// Winning side, `None` for a draw.
    pub fn winner(self) -> Option<Color> {
        match self {
            Outcome::Checkmate { winner } | Outcome::Resignation { winner } => Some(winner),
            Outcome::Stalemate => None,
        }
    }
}

/// What a successful move did to the game, for notifying players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveReport {
    /// Play goes on normally.
    Continue,
    /// The given side is now in check.
    Check(Color),
    /// The game ended.
    Finished(Outcome),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("the game is already over")]
    GameOver,

    #[error("no game with id {0}")]
    UnknownGame(GameId),

    #[error("game {0} is unavailable after a panic while it was locked")]
    Poisoned(GameId),

    #[error(transparent)]
    Move(#[from] MoveError),
}

/// A game in progress or finished.
///
/// Once an outcome is recorded the session refuses further moves, but the
/// game stays queryable.
#[derive(Debug, Clone, Default)]
pub struct GameSession {
    game: Game,
    outcome: Option<Outcome>,
}

impl GameSession {
    /// A session for a new game at the starting position.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing game, e.g. one restored from storage. A game that is
    /// already decided gets its outcome recorded.
    pub fn from_game(game: Game) -> Self {
        let outcome = decided_outcome(game.status());
        Self { game, outcome }
    }

    #[inline]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Plays `mv` and reports check or the end of the game.
    pub fn make_move(&mut self, mv: Move) -> Result<MoveReport, SessionError> {
        if self.is_game_over() {
            warn!("move {mv} refused, game is over");
            return Err(SessionError::GameOver);
        }

        if let Err(err) = self.game.make_move(mv) {
            warn!("move {mv} rejected: {err}");
            return Err(err.into());
        }

        let status = self.game.status();
        if let Some(outcome) = decided_outcome(status) {
            info!("game over: {outcome:?}");
            self.outcome = Some(outcome);
            return Ok(MoveReport::Finished(outcome));
        }

        Ok(match status {
            GameStatus::Check(color) => MoveReport::Check(color),
            _ => MoveReport::Continue,
        })
    }

    /// Ends the game with `color` giving up.
    pub fn resign(&mut self, color: Color) -> Result<Outcome, SessionError> {
        if self.is_game_over() {
            return Err(SessionError::GameOver);
        }

        let outcome = Outcome::Resignation {
            winner: color.opponent(),
        };
        info!("{color:?} resigns");
        self.outcome = Some(outcome);
        Ok(outcome)
    }
}

fn decided_outcome(status: GameStatus) -> Option<Outcome> {
    match status {
        GameStatus::Checkmate(loser) => Some(Outcome::Checkmate {
            winner: loser.opponent(),
        }),
        GameStatus::Stalemate(_) => Some(Outcome::Stalemate),
        GameStatus::InProgress(_) | GameStatus::Check(_) => None,
    }
}

/// Sessions by id, each behind its own lock.
///
/// Moves on one game are serialized by that game's mutex while unrelated
/// games proceed in parallel; the table lock is held only to look games up.
#[derive(Debug, Default)]
pub struct GameTable {
    next_id: AtomicU32,
    sessions: RwLock<HashMap<GameId, Arc<Mutex<GameSession>>>>,
}

impl GameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new game and returns its id.
    pub fn create(&self) -> GameId {
        self.insert(GameSession::new())
    }

    /// Adds an existing session and returns its id.
    pub fn insert(&self, session: GameSession) -> GameId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sessions.insert(id, Arc::new(Mutex::new(session)));
        id
    }

    pub fn get(&self, id: GameId) -> Option<Arc<Mutex<GameSession>>> {
        let sessions = self
            .sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sessions.get(&id).cloned()
    }

    pub fn remove(&self, id: GameId) -> Option<Arc<Mutex<GameSession>>> {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sessions.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs `f` with exclusive access to game `id`.
    pub fn with_session<R>(
        &self,
        id: GameId,
        f: impl FnOnce(&mut GameSession) -> R,
    ) -> Result<R, SessionError> {
        let session = self.get(id).ok_or(SessionError::UnknownGame(id))?;
        let Ok(mut guard) = session.lock() else {
            return Err(SessionError::Poisoned(id));
        };
        Ok(f(&mut guard))
    }

    /// Plays `mv` in game `id`.
    pub fn make_move(&self, id: GameId, mv: Move) -> Result<MoveReport, SessionError> {
        self.with_session(id, |session| session.make_move(mv))?
    }
}
