//! FEN (Forsyth-Edwards Notation) validation and field splitting.

use thiserror::Error;

use crate::{Color, PieceKind};

/// Reasons a FEN string is rejected. Each variant is one independent check.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 space-delimited fields, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid fullmove number: expected a positive integer, got '{0}'")]
    InvalidFullmoveNumber(String),

    #[error("invalid halfmove clock: expected a non-negative integer, got '{0}'")]
    InvalidHalfmoveClock(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid castling rights: '{0}'")]
    InvalidCastlingRights(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid piece placement: expected 8 ranks, got {0}")]
    InvalidRankCount(usize),

    #[error("invalid piece placement: consecutive digits in rank {0}")]
    ConsecutiveDigits(u8),

    #[error("invalid piece placement: unknown piece '{piece}' in rank {rank}")]
    InvalidPiece { piece: char, rank: u8 },

    #[error("invalid piece placement: rank {rank} covers {squares} squares, expected 8")]
    InvalidRankLength { rank: u8, squares: u32 },

    #[error("invalid piece placement: {color} has {count} kings, expected 1")]
    KingCount { color: Color, count: usize },

    #[error("invalid piece placement: pawn on rank {0}")]
    PawnOnBackRank(u8),
}

/// The six validated fields of a FEN string.
///
/// Parsing only validates; building a board from these fields is the
/// engine's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Piece placement, rank 8 first (e.g., "rnbqkbnr/pppppppp/8/...").
    pub piece_placement: String,
    pub active_color: Color,
    /// Castling availability ("KQkq", "-", ...).
    pub castling: String,
    /// En passant target square ("e3") or "-".
    pub en_passant: String,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Validates a FEN string and splits it into fields.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let fullmove_number = parse_counter(parts[5])
            .filter(|n| *n > 0)
            .ok_or_else(|| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;

        let halfmove_clock = parse_counter(parts[4])
            .ok_or_else(|| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;

        Self::validate_en_passant_syntax(parts[3])?;
        Self::validate_castling(parts[2])?;

        let active_color = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        Self::validate_piece_placement(parts[0])?;
        Self::validate_en_passant_side(parts[3], active_color)?;
        Self::validate_kings(parts[0])?;
        Self::validate_pawn_ranks(parts[0])?;

        Ok(FenParser {
            piece_placement: parts[0].to_string(),
            active_color,
            castling: parts[2].to_string(),
            en_passant: parts[3].to_string(),
            halfmove_clock,
            fullmove_number,
        })
    }

    fn validate_en_passant_syntax(ep: &str) -> Result<(), FenError> {
        if ep == "-" {
            return Ok(());
        }
        let bytes = ep.as_bytes();
        if bytes.len() != 2 || !(b'a'..=b'h').contains(&bytes[0]) || !matches!(bytes[1], b'3' | b'6')
        {
            return Err(FenError::InvalidEnPassantSquare(format!(
                "'{}' is not '-' or a rank 3/6 square",
                ep
            )));
        }
        Ok(())
    }

    /// A rank 3 target means White just double-pushed, so Black must be to move.
    fn validate_en_passant_side(ep: &str, active_color: Color) -> Result<(), FenError> {
        let expected = match ep.as_bytes().get(1) {
            Some(b'3') => Color::Black,
            Some(b'6') => Color::White,
            _ => return Ok(()),
        };
        if expected != active_color {
            return Err(FenError::InvalidEnPassantSquare(format!(
                "'{}' is illegal with {} to move",
                ep, active_color
            )));
        }
        Ok(())
    }

    fn validate_castling(castling: &str) -> Result<(), FenError> {
        if castling.chars().any(|c| !"KQkq-".contains(c)) {
            return Err(FenError::InvalidCastlingRights(castling.to_string()));
        }
        Ok(())
    }

    fn validate_piece_placement(placement: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidRankCount(ranks.len()));
        }

        for (i, rank_text) in ranks.iter().enumerate() {
            let rank = 8 - i as u8;
            let mut squares = 0u32;
            let mut previous_was_digit = false;
            for c in rank_text.chars() {
                if let Some(run) = c.to_digit(10) {
                    if previous_was_digit {
                        return Err(FenError::ConsecutiveDigits(rank));
                    }
                    squares += run;
                    previous_was_digit = true;
                } else {
                    if PieceKind::from_fen_char(c).is_none() {
                        return Err(FenError::InvalidPiece { piece: c, rank });
                    }
                    squares += 1;
                    previous_was_digit = false;
                }
            }
            if squares != 8 {
                return Err(FenError::InvalidRankLength { rank, squares });
            }
        }

        Ok(())
    }

    fn validate_kings(placement: &str) -> Result<(), FenError> {
        for (color, letter) in [(Color::White, 'K'), (Color::Black, 'k')] {
            let count = placement.chars().filter(|c| *c == letter).count();
            if count != 1 {
                return Err(FenError::KingCount { color, count });
            }
        }
        Ok(())
    }

    fn validate_pawn_ranks(placement: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        for (index, rank) in [(0usize, 8u8), (7, 1)] {
            if ranks[index].chars().any(|c| c == 'p' || c == 'P') {
                return Err(FenError::PawnOnBackRank(rank));
            }
        }
        Ok(())
    }

    /// Joins the fields back into a FEN string.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.piece_placement,
            self.active_color.to_fen_char(),
            self.castling,
            self.en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

/// Parses a counter made only of ASCII digits.
fn parse_counter(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl Default for FenParser {
    fn default() -> Self {
        FenParser {
            piece_placement: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR".to_string(),
            active_color: Color::White,
            castling: "KQkq".to_string(),
            en_passant: "-".to_string(),
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}
