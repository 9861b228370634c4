//! Game session: a board plus the notation layer on top of it.
//!
//! [`Game`] decodes SAN and PGN movetext, applies the moves to its board and
//! reports them back as [`MoveRecord`]s. Replaying a movetext is lazy: the
//! returned [`Replay`] applies one move per call to `next()`.

use std::iter::FusedIterator;

use chess_core::Move;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::board::{Board, PositionError};
use crate::movegen::{legal_moves, MoveList};
use crate::pgn::{is_termination_marker, movetext_tokens, write_movetext};
use crate::record::{MoveRecord, PrettyMove};
use crate::rules::GameResult;
use crate::san::{move_to_san, san_to_move, san_to_move_permissive, SanError};

/// Options for decoding moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayOptions {
    /// Fall back to the permissive SAN pass when strict decoding fails.
    pub permissive: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        ReplayOptions { permissive: true }
    }
}

/// Error type for game operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A movetext token is neither a legal move nor a termination marker.
    #[error("invalid PGN move '{token}' at ply {ply}")]
    InvalidPgnMove { ply: usize, token: String },

    #[error("invalid SAN: {0}")]
    InvalidSan(#[from] SanError),

    #[error(transparent)]
    InvalidPosition(#[from] PositionError),

    /// The move is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),
}

/// A chess game session.
///
/// Unlike [`Board`], which only knows moves as generator output, `Game`
/// speaks SAN and PGN and keeps the text each move was read from.
#[derive(Debug, Clone, Default)]
pub struct Game {
    board: Board,
    options: ReplayOptions,
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ReplayOptions) -> Self {
        Game {
            board: Board::startpos(),
            options,
        }
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        Ok(Game {
            board: Board::from_fen(fen)?,
            options: ReplayOptions::default(),
        })
    }

    /// Replaces the position and clears the history.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), GameError> {
        self.board.load(fen)?;
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn options(&self) -> ReplayOptions {
        self.options
    }

    pub fn set_options(&mut self, options: ReplayOptions) {
        self.options = options;
    }

    /// Returns all legal moves in the current position.
    pub fn legal_moves(&self) -> MoveList {
        legal_moves(&self.board)
    }

    /// Number of moves applied since the position was loaded.
    pub fn ply_count(&self) -> usize {
        self.board.history().len()
    }

    fn decode(&self, san: &str) -> Result<Move, SanError> {
        if self.options.permissive {
            san_to_move_permissive(&self.board, san)
        } else {
            san_to_move(&self.board, san)
        }
    }

    /// Makes a move given in SAN notation and returns the decoded move.
    pub fn make_move_san(&mut self, san: &str) -> Result<Move, GameError> {
        let mv = self.decode(san)?;
        self.board.apply_move(&mv, Some(san.trim().to_string()));
        Ok(mv)
    }

    /// Makes a move given in internal format.
    pub fn make_move(&mut self, mv: Move) -> Result<(), GameError> {
        if !self.legal_moves().as_slice().contains(&mv) {
            return Err(GameError::IllegalMove(mv.to_uci()));
        }
        self.board.apply_move(&mv, None);
        Ok(())
    }

    /// Makes a move given in UCI notation (e.g. "e2e4", "e7e8q").
    pub fn make_move_uci(&mut self, uci: &str) -> Result<Move, GameError> {
        let mv = self
            .legal_moves()
            .iter()
            .find(|m| m.to_uci() == uci)
            .copied()
            .ok_or_else(|| GameError::IllegalMove(uci.to_string()))?;
        self.board.apply_move(&mv, None);
        Ok(mv)
    }

    /// Takes back the last move. Returns `None` when there is nothing to
    /// undo.
    pub fn undo(&mut self) -> Option<Move> {
        self.board.undo_move()
    }

    /// Returns the current position as a FEN string.
    pub fn to_fen(&self) -> String {
        self.board.to_fen()
    }

    /// Replays `movetext` from the standard starting position.
    ///
    /// The movetext is tokenised once; moves are decoded and applied as the
    /// returned iterator is advanced. See [`Game::replay`].
    pub fn load_pgn(&mut self, movetext: &str) -> Replay<'_> {
        self.board.reset();
        self.replay(movetext)
    }

    /// Replays `movetext` from the current position.
    ///
    /// Termination markers are skipped. The first token that does not
    /// decode ends the replay with [`GameError::InvalidPgnMove`]; moves
    /// applied before it stay applied. The iterator is single-pass: call
    /// again to replay again.
    pub fn replay(&mut self, movetext: &str) -> Replay<'_> {
        Replay {
            tokens: movetext_tokens(movetext).into_iter(),
            game: self,
            ply: 0,
            done: false,
        }
    }

    /// Every applied move in order, rendered from the history stack.
    pub fn history(&self) -> Vec<PrettyMove> {
        let mut walker = self.board.clone();
        let mut entries = Vec::with_capacity(walker.history().len());
        while let Some(entry) = walker.undo_entry() {
            entries.push(entry);
        }

        entries
            .into_iter()
            .rev()
            .map(|entry| {
                let san = move_to_san(&walker, &entry.mv);
                let pretty = PrettyMove::from_move(&entry.mv, san, entry.text.clone());
                walker.apply_move(&entry.mv, entry.text);
                pretty
            })
            .collect()
    }

    /// PGN movetext of the moves played so far, with the result marker when
    /// the game is over.
    pub fn pgn(&self) -> String {
        let (first_move, black_first) = self
            .board
            .history()
            .first()
            .map(|entry| (entry.fullmove_number, entry.turn == chess_core::Color::Black))
            .unwrap_or((self.board.fullmove_number(), false));
        let sans: Vec<String> = self.history().into_iter().map(|m| m.san).collect();
        let result = self.result().map(GameResult::marker);
        write_movetext(&sans, first_move, black_first, result)
    }

    pub fn is_check(&self) -> bool {
        self.board.is_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.board.is_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.board.is_stalemate()
    }

    pub fn is_draw(&self) -> bool {
        self.board.is_draw()
    }

    pub fn is_game_over(&self) -> bool {
        self.board.is_game_over()
    }

    /// Returns the game result if the game is over.
    pub fn result(&self) -> Option<GameResult> {
        self.board.game_result()
    }
}

/// Lazy replay of a movetext, created by [`Game::load_pgn`] and
/// [`Game::replay`].
#[derive(Debug)]
pub struct Replay<'a> {
    game: &'a mut Game,
    tokens: std::vec::IntoIter<String>,
    ply: usize,
    done: bool,
}

impl Replay<'_> {
    /// The board as of the last yielded record.
    pub fn board(&self) -> &Board {
        &self.game.board
    }

    /// Drives the replay to the end and returns how many moves it applied.
    pub fn finish(self) -> Result<usize, GameError> {
        let mut applied = 0;
        for record in self {
            record?;
            applied += 1;
        }
        Ok(applied)
    }
}

impl Iterator for Replay<'_> {
    type Item = Result<MoveRecord, GameError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let Some(token) = self.tokens.find(|t| !is_termination_marker(t)) else {
            self.done = true;
            return None;
        };
        self.ply += 1;

        let mv = match self.game.decode(&token) {
            Ok(mv) => mv,
            Err(err) => {
                warn!(ply = self.ply, token = %token, error = %err, "aborting PGN replay");
                self.done = true;
                return Some(Err(GameError::InvalidPgnMove {
                    ply: self.ply,
                    token,
                }));
            }
        };

        let board = &mut self.game.board;
        let san = move_to_san(board, &mv);
        board.apply_move(&mv, Some(token.clone()));

        Some(Ok(MoveRecord {
            ply: self.ply,
            mv: PrettyMove::from_move(&mv, san, Some(token)),
            board: board.snapshot(),
        }))
    }
}

impl FusedIterator for Replay<'_> {}
