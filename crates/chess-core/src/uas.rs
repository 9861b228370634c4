//! Unambiguous piece symbols.
//!
//! Each of the 32 pieces of the initial array gets a two-letter symbol made of
//! its piece letter and its starting file: the rook on a1 is `RA`, the pawn on
//! e7 is `pe`. White symbols are upper case, black ones lower case. A piece
//! keeps its symbol until it leaves the board, including through promotion,
//! so statistics can follow one physical piece across a game.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Color, File, PieceKind, Rank, Square};

/// Piece types of the back rank, indexed by file.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

const SYMBOLS: [&str; 32] = [
    "RA", "NB", "BC", "QD", "KE", "BF", "NG", "RH", //
    "PA", "PB", "PC", "PD", "PE", "PF", "PG", "PH", //
    "ra", "nb", "bc", "qd", "ke", "bf", "ng", "rh", //
    "pa", "pb", "pc", "pd", "pe", "pf", "pg", "ph",
];

/// A stable per-piece identity drawn from a fixed 32-symbol alphabet.
///
/// Encoded as `color * 16 + slot`, where slots 0-7 are the back-rank pieces
/// on files a-h and slots 8-15 are the pawns on files a-h.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uas(u8);

impl Uas {
    pub const COUNT: usize = 32;

    /// Symbol of the piece that starts on `file` of the given color's back
    /// rank (`pawn == false`) or pawn rank (`pawn == true`).
    #[inline]
    pub const fn home(color: Color, file: File, pawn: bool) -> Self {
        let slot = (if pawn { 8 } else { 0 }) + file.index();
        Uas(color.index() as u8 * 16 + slot)
    }

    /// Symbol whose home is `square`, if `square` is on a starting rank.
    pub const fn at_home_square(square: Square) -> Option<Self> {
        let file = square.file();
        match square.rank() {
            Rank::R1 => Some(Self::home(Color::White, file, false)),
            Rank::R2 => Some(Self::home(Color::White, file, true)),
            Rank::R7 => Some(Self::home(Color::Black, file, true)),
            Rank::R8 => Some(Self::home(Color::Black, file, false)),
            _ => None,
        }
    }

    /// Creates a symbol from its raw index (0-31).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < Self::COUNT {
            Some(Uas(index))
        } else {
            None
        }
    }

    /// Parses a two-letter symbol such as `RA` or `pe`.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        SYMBOLS
            .iter()
            .position(|s| *s == symbol)
            .map(|index| Uas(index as u8))
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn color(self) -> Color {
        if self.0 < 16 {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Starting file of the piece this symbol was assigned to.
    #[inline]
    pub const fn file(self) -> File {
        File::ALL[(self.0 % 8) as usize]
    }

    #[inline]
    pub const fn is_pawn_symbol(self) -> bool {
        self.0 % 16 >= 8
    }

    /// Piece type that started the game under this symbol.
    pub const fn home_kind(self) -> PieceKind {
        if self.is_pawn_symbol() {
            PieceKind::Pawn
        } else {
            BACK_RANK[(self.0 % 8) as usize]
        }
    }

    /// Square the symbol's piece occupies in the initial array.
    pub const fn home_square(self) -> Square {
        let rank = match (self.color(), self.is_pawn_symbol()) {
            (Color::White, false) => Rank::R1,
            (Color::White, true) => Rank::R2,
            (Color::Black, true) => Rank::R7,
            (Color::Black, false) => Rank::R8,
        };
        Square::new(self.file(), rank)
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        SYMBOLS[self.0 as usize]
    }

    /// All symbols of one color.
    pub fn of_color(color: Color) -> impl Iterator<Item = Uas> {
        let base = color.index() as u8 * 16;
        (base..base + 16).map(Uas)
    }
}

impl fmt::Debug for Uas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uas({})", self.as_str())
    }
}

impl fmt::Display for Uas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Uas {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Uas {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let symbol = String::deserialize(deserializer)?;
        Uas::from_symbol(&symbol)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown piece symbol: {symbol}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_on_a1_is_ra() {
        let uas = Uas::at_home_square(Square::A1).unwrap();
        assert_eq!(uas.as_str(), "RA");
        assert_eq!(uas.home_kind(), PieceKind::Rook);
        assert_eq!(uas.color(), Color::White);
        assert_eq!(uas.home_square(), Square::A1);
    }

    #[test]
    fn black_pawn_symbols_are_lowercase() {
        let e7 = Square::from_algebraic("e7").unwrap();
        let uas = Uas::at_home_square(e7).unwrap();
        assert_eq!(uas.as_str(), "pe");
        assert_eq!(uas.home_kind(), PieceKind::Pawn);
        assert_eq!(uas.color(), Color::Black);
    }

    #[test]
    fn middle_ranks_have_no_home_symbol() {
        assert!(Uas::at_home_square(Square::from_algebraic("e4").unwrap()).is_none());
    }

    #[test]
    fn every_symbol_round_trips_through_its_home_square() {
        for index in 0..Uas::COUNT as u8 {
            let uas = Uas::from_index(index).unwrap();
            assert_eq!(Uas::at_home_square(uas.home_square()), Some(uas));
            assert_eq!(Uas::from_symbol(uas.as_str()), Some(uas));
        }
        assert!(Uas::from_index(32).is_none());
    }

    #[test]
    fn back_rank_kinds() {
        assert_eq!(Uas::from_symbol("QD").unwrap().home_kind(), PieceKind::Queen);
        assert_eq!(Uas::from_symbol("ke").unwrap().home_kind(), PieceKind::King);
        assert_eq!(Uas::from_symbol("ng").unwrap().home_kind(), PieceKind::Knight);
        assert!(Uas::from_symbol("XX").is_none());
    }

    #[test]
    fn of_color_yields_sixteen() {
        assert_eq!(Uas::of_color(Color::White).count(), 16);
        assert!(Uas::of_color(Color::Black).all(|u| u.color() == Color::Black));
    }
}
