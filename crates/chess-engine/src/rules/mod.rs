//! Game-ending conditions: check, mate, and the draw rules.

use chess_core::{Color, PieceKind, Square};
use serde::Serialize;

use crate::movegen::{is_king_attacked, legal_moves};
use crate::Board;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw(DrawReason),
}

impl GameResult {
    /// PGN termination marker for this result.
    pub fn marker(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw(_) => "1/2-1/2",
        }
    }
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DrawReason {
    /// No legal moves but not in check.
    Stalemate,
    InsufficientMaterial,
    /// 100 half-moves without a pawn move or capture.
    FiftyMoveRule,
    ThreefoldRepetition,
}

impl Board {
    /// True if the side to move is in check.
    pub fn is_check(&self) -> bool {
        is_king_attacked(self, self.turn)
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_check() && legal_moves(self).is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && legal_moves(self).is_empty()
    }

    /// K v K, K+minor v K, or kings plus bishops that all stand on one
    /// square color.
    pub fn is_insufficient_material(&self) -> bool {
        let mut counts = [0usize; 6];
        let mut total = 0;
        let mut bishop_colors = Vec::new();

        for sq in Square::all() {
            if let Some(piece) = self.get(sq) {
                counts[piece.kind.index()] += 1;
                total += 1;
                if piece.kind == PieceKind::Bishop {
                    bishop_colors.push(sq.is_light());
                }
            }
        }

        let bishops = counts[PieceKind::Bishop.index()];
        let knights = counts[PieceKind::Knight.index()];
        match total {
            2 => true,
            3 => bishops == 1 || knights == 1,
            _ if total == bishops + 2 => {
                bishop_colors.iter().all(|&light| light)
                    || bishop_colors.iter().all(|&light| !light)
            }
            _ => false,
        }
    }

    /// True if the current position has occurred at least three times.
    ///
    /// Positions are compared by placement, turn, castling rights and legal
    /// en passant target. The history stack is walked on a copy of the board.
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetition_count() >= 3
    }

    fn repetition_count(&self) -> usize {
        let current = self.position_key();
        let mut count = 0;
        let mut walker = self.clone();
        loop {
            if walker.position_key() == current {
                count += 1;
            }
            // Nothing before an irreversible move can repeat.
            if walker.halfmove_clock == 0 || walker.undo_move().is_none() {
                break;
            }
        }
        count
    }

    pub fn is_draw(&self) -> bool {
        self.draw_reason().is_some()
    }

    fn draw_reason(&self) -> Option<DrawReason> {
        if self.halfmove_clock >= 100 {
            Some(DrawReason::FiftyMoveRule)
        } else if self.is_stalemate() {
            Some(DrawReason::Stalemate)
        } else if self.is_insufficient_material() {
            Some(DrawReason::InsufficientMaterial)
        } else if self.is_threefold_repetition() {
            Some(DrawReason::ThreefoldRepetition)
        } else {
            None
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.game_result().is_some()
    }

    /// The result if the game is over. Checkmate takes precedence over the
    /// draw rules.
    pub fn game_result(&self) -> Option<GameResult> {
        if self.is_checkmate() {
            return Some(match self.turn {
                Color::White => GameResult::BlackWins,
                Color::Black => GameResult::WhiteWins,
            });
        }
        self.draw_reason().map(GameResult::Draw)
    }
}
