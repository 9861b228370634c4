//! Core types for chess.
//!
//! This crate provides the fundamental types shared by the rules engine and
//! the replay tool:
//! - [`Piece`], [`PieceKind`] and [`Color`] for piece representation
//! - [`Uas`] for per-piece identities that survive the whole game
//! - [`Square`], [`File`], and [`Rank`] for 0x88 board coordinates
//! - [`Move`] and [`MoveFlags`] for move representation
//! - FEN validation

mod color;
mod fen;
mod mov;
mod piece;
mod square;
mod uas;

pub use color::Color;
pub use fen::{FenError, FenParser};
pub use mov::{Captured, Move, MoveFlags};
pub use piece::{Piece, PieceKind};
pub use square::{File, Rank, Square, Squares};
pub use uas::Uas;
