//! Chess rules engine with per-piece identity.
//!
//! This crate provides:
//! - [`Board`] - 0x88 board state with an undo history
//! - Move generation and validation over attack tables
//! - SAN and PGN movetext parsing and generation
//! - [`Game`] - a session that replays PGN and yields per-move records
//!
//! # Piece identity
//!
//! Every piece carries a [`Uas`] symbol naming the starting piece it is
//! (`"NG"` is White's g-file knight). Symbols survive moves, castling,
//! en passant and promotion, so a [`MoveRecord`] can always be traced back
//! to a physical piece.
//!
//! # Example
//!
//! ```
//! use chess_engine::Game;
//!
//! let mut game = Game::new();
//! for record in game.load_pgn("1. e4 e5 2. Nf3 Nc6") {
//!     let record = record.unwrap();
//!     println!("{} {} by {}", record.ply, record.mv.san, record.mv.uas);
//! }
//! assert_eq!(
//!     game.to_fen(),
//!     "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3"
//! );
//! ```

mod board;
mod game;
mod history;
pub mod movegen;
pub mod pgn;
mod record;
pub mod rules;
pub mod san;
pub mod tables;

pub use board::{Board, CastlingRights, PlacementError, PositionError};
pub use chess_core::{
    Captured, Color, FenError, File, Move, MoveFlags, Piece, PieceKind, Rank, Square, Uas,
};
pub use game::{Game, GameError, Replay, ReplayOptions};
pub use history::HistoryEntry;
pub use movegen::{
    generate_moves, is_king_attacked, is_square_attacked, legal_moves, GenOptions, MoveList,
};
pub use record::{BoardSnapshot, MoveRecord, PrettyMove};
pub use rules::{DrawReason, GameResult};
pub use san::{move_to_san, san_to_move, san_to_move_permissive, SanError};
