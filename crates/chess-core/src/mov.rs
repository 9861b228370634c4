//! Move representation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Color, PieceKind, Square, Uas};

/// Bitmask of special move properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MoveFlags(u8);

impl MoveFlags {
    pub const NORMAL: u8 = 1;
    pub const CAPTURE: u8 = 2;
    /// Pawn double push from its starting rank.
    pub const BIG_PAWN: u8 = 4;
    pub const EP_CAPTURE: u8 = 8;
    pub const PROMOTION: u8 = 16;
    pub const KSIDE_CASTLE: u8 = 32;
    pub const QSIDE_CASTLE: u8 = 64;

    /// Flag bits paired with their one-letter codes, in rendering order.
    const CODES: [(u8, char); 7] = [
        (Self::NORMAL, 'n'),
        (Self::CAPTURE, 'c'),
        (Self::BIG_PAWN, 'b'),
        (Self::EP_CAPTURE, 'e'),
        (Self::PROMOTION, 'p'),
        (Self::KSIDE_CASTLE, 'k'),
        (Self::QSIDE_CASTLE, 'q'),
    ];

    #[inline]
    pub const fn new(bits: u8) -> Self {
        MoveFlags(bits & 0x7F)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if any of `bits` is set.
    #[inline]
    pub const fn contains(self, bits: u8) -> bool {
        self.0 & bits != 0
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.contains(Self::CAPTURE | Self::EP_CAPTURE)
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.contains(Self::KSIDE_CASTLE | Self::QSIDE_CASTLE)
    }

    /// Renders the flags as their letter codes, e.g. `"cp"` for a capturing
    /// promotion.
    pub fn to_code(self) -> String {
        Self::CODES
            .iter()
            .filter(|(bit, _)| self.0 & bit != 0)
            .map(|(_, c)| *c)
            .collect()
    }
}

/// The piece removed from the board by a capture.
///
/// Kept on the move so that undo can restore it with its original symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Captured {
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub uas: Uas,
}

/// A fully described move, as produced by the move generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub color: Color,
    pub from: Square,
    pub to: Square,
    /// Type of the moving piece before any promotion.
    pub kind: PieceKind,
    pub uas: Uas,
    pub captured: Option<Captured>,
    pub promotion: Option<PieceKind>,
    pub flags: MoveFlags,
}

impl Move {
    /// A placeholder move, never produced by the generator.
    pub const NULL: Move = Move {
        color: Color::White,
        from: Square::A1,
        to: Square::A1,
        kind: PieceKind::Pawn,
        uas: Uas::home(Color::White, crate::File::A, true),
        captured: None,
        promotion: None,
        flags: MoveFlags(0),
    };

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(&self) -> String {
        match self.promotion {
            Some(kind) => format!("{}{}{}", self.from, self.to, kind.to_char()),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, Rank};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn flag_codes() {
        assert_eq!(MoveFlags::new(MoveFlags::NORMAL).to_code(), "n");
        assert_eq!(MoveFlags::new(MoveFlags::BIG_PAWN).to_code(), "b");
        assert_eq!(
            MoveFlags::new(MoveFlags::CAPTURE | MoveFlags::PROMOTION).to_code(),
            "cp"
        );
        assert_eq!(MoveFlags::new(MoveFlags::QSIDE_CASTLE).to_code(), "q");
    }

    #[test]
    fn capture_covers_en_passant() {
        assert!(MoveFlags::new(MoveFlags::EP_CAPTURE).is_capture());
        assert!(MoveFlags::new(MoveFlags::CAPTURE).is_capture());
        assert!(!MoveFlags::new(MoveFlags::BIG_PAWN).is_capture());
        assert!(MoveFlags::new(MoveFlags::KSIDE_CASTLE).is_castle());
    }

    #[test]
    fn move_uci() {
        let e2 = Square::new(File::E, Rank::R2);
        let m = Move {
            color: Color::White,
            from: e2,
            to: sq("e4"),
            kind: PieceKind::Pawn,
            uas: Uas::at_home_square(e2).unwrap(),
            captured: None,
            promotion: None,
            flags: MoveFlags::new(MoveFlags::BIG_PAWN),
        };
        assert_eq!(m.to_uci(), "e2e4");
        assert_eq!(format!("{}", m), "e2e4");

        let promo = Move {
            from: sq("e7"),
            to: sq("e8"),
            promotion: Some(PieceKind::Queen),
            flags: MoveFlags::new(MoveFlags::PROMOTION),
            ..m
        };
        assert_eq!(promo.to_uci(), "e7e8q");
    }

    #[test]
    fn null_move_is_flagless() {
        assert_eq!(Move::NULL.flags.bits(), 0);
        assert_eq!(Move::NULL.uas.as_str(), "PA");
    }
}
