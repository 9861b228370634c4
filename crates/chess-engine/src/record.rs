//! Per-move records handed to consumers of a replayed game.

use chess_core::{Captured, Color, Move, Piece, PieceKind, Square, Uas};
use serde::{Deserialize, Serialize};

/// The human-readable form of a move: algebraic squares, letter flags and
/// the SAN it was rendered as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrettyMove {
    pub color: Color,
    pub from: Square,
    pub to: Square,
    pub piece: PieceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured: Option<Captured>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceKind>,
    /// Letter codes, see [`MoveFlags::to_code`](chess_core::MoveFlags::to_code).
    pub flags: String,
    pub uas: Uas,
    pub san: String,
    /// Text the move was decoded from, when it came from PGN.
    #[serde(
        rename = "originalString",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original: Option<String>,
    pub from_index: u8,
    pub to_index: u8,
}

impl PrettyMove {
    pub fn from_move(mv: &Move, san: String, original: Option<String>) -> Self {
        PrettyMove {
            color: mv.color,
            from: mv.from,
            to: mv.to,
            piece: mv.kind,
            captured: mv.captured,
            promotion: mv.promotion,
            flags: mv.flags.to_code(),
            uas: mv.uas,
            san,
            original,
            from_index: mv.from.index(),
            to_index: mv.to.index(),
        }
    }
}

/// The 64 squares of a board, rank 8 first, each row from the a-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardSnapshot([[Option<Piece>; 8]; 8]);

impl BoardSnapshot {
    pub fn new(rows: [[Option<Piece>; 8]; 8]) -> Self {
        BoardSnapshot(rows)
    }

    pub fn rows(&self) -> &[[Option<Piece>; 8]; 8] {
        &self.0
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        self.0[7 - square.rank().index() as usize][square.file().index() as usize]
    }

    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.0.iter().flatten().flatten().copied()
    }
}

/// One replayed ply: the move and the board right after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 1-based index of the move within the replay.
    pub ply: usize,
    #[serde(rename = "move")]
    pub mv: PrettyMove,
    pub board: BoardSnapshot,
}
