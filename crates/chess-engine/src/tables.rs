//! Static lookup tables for the 0x88 board.
//!
//! [`ATTACKS`] and [`RAYS`] are indexed by `attacker - target + 119`. The
//! 0x88 layout makes that difference unique per direction and distance, so
//! one lookup tells whether a piece type can geometrically reach the target
//! and, for sliders, which step walks from the attacker toward it.

use chess_core::PieceKind;

/// Offsets of a knight jump.
pub const KNIGHT_OFFSETS: [i8; 8] = [-18, -33, -31, -14, 18, 33, 31, 14];

/// Diagonal steps.
pub const BISHOP_OFFSETS: [i8; 4] = [-17, -15, 17, 15];

/// Orthogonal steps.
pub const ROOK_OFFSETS: [i8; 4] = [-16, 1, 16, -1];

/// All eight neighbouring steps, used by both kings and queens.
pub const KING_OFFSETS: [i8; 8] = [-17, -16, -15, 1, 17, 16, 15, -1];

/// Number of entries in the difference-indexed tables.
pub const DIFF_SPAN: usize = 240;

/// Bias added to a square difference to index [`ATTACKS`] and [`RAYS`].
pub const DIFF_BIAS: i16 = 119;

/// Piece-type bitmask per square difference.
pub const ATTACKS: [u8; DIFF_SPAN] = compute_attacks();

/// Step from attacker toward target per square difference, 0 if not on a line.
pub const RAYS: [i8; DIFF_SPAN] = compute_rays();

/// Returns the single-step offsets for a non-pawn piece type.
pub const fn offsets(kind: PieceKind) -> &'static [i8] {
    match kind {
        PieceKind::Knight => &KNIGHT_OFFSETS,
        PieceKind::Bishop => &BISHOP_OFFSETS,
        PieceKind::Rook => &ROOK_OFFSETS,
        PieceKind::Queen | PieceKind::King => &KING_OFFSETS,
        PieceKind::Pawn => &[],
    }
}

/// Bit for `kind` in an [`ATTACKS`] entry.
#[inline]
pub const fn kind_mask(kind: PieceKind) -> u8 {
    1 << kind.index()
}

/// Table index for the difference between two 0x88 indices.
#[inline]
pub const fn diff_index(attacker: u8, target: u8) -> usize {
    (attacker as i16 - target as i16 + DIFF_BIAS) as usize
}

const fn slot(offset: i16) -> usize {
    (DIFF_BIAS - offset) as usize
}

const fn compute_attacks() -> [u8; DIFF_SPAN] {
    let mut table = [0u8; DIFF_SPAN];

    // Pawn captures, both colors. Color is checked at lookup time.
    let pawn = kind_mask(PieceKind::Pawn);
    table[slot(15)] |= pawn;
    table[slot(17)] |= pawn;
    table[slot(-15)] |= pawn;
    table[slot(-17)] |= pawn;

    let mut i = 0;
    while i < 8 {
        table[slot(KNIGHT_OFFSETS[i] as i16)] |= kind_mask(PieceKind::Knight);
        table[slot(KING_OFFSETS[i] as i16)] |= kind_mask(PieceKind::King);
        i += 1;
    }

    let mut d = 0;
    while d < 4 {
        let mut k = 1;
        while k <= 7 {
            table[slot(k * BISHOP_OFFSETS[d] as i16)] |=
                kind_mask(PieceKind::Bishop) | kind_mask(PieceKind::Queen);
            table[slot(k * ROOK_OFFSETS[d] as i16)] |=
                kind_mask(PieceKind::Rook) | kind_mask(PieceKind::Queen);
            k += 1;
        }
        d += 1;
    }

    table
}

const fn compute_rays() -> [i8; DIFF_SPAN] {
    let mut table = [0i8; DIFF_SPAN];
    let mut d = 0;
    while d < 8 {
        let step = KING_OFFSETS[d];
        let mut k = 1;
        while k <= 7 {
            table[slot(k * step as i16)] = step;
            k += 1;
        }
        d += 1;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Square;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn reaches(kind: PieceKind, from: &str, to: &str) -> bool {
        ATTACKS[diff_index(sq(from).index(), sq(to).index())] & kind_mask(kind) != 0
    }

    #[test]
    fn knight_geometry() {
        assert!(reaches(PieceKind::Knight, "g1", "f3"));
        assert!(reaches(PieceKind::Knight, "b8", "c6"));
        assert!(!reaches(PieceKind::Knight, "g1", "g3"));
    }

    #[test]
    fn slider_geometry() {
        assert!(reaches(PieceKind::Bishop, "a1", "h8"));
        assert!(reaches(PieceKind::Rook, "a1", "a8"));
        assert!(reaches(PieceKind::Queen, "d1", "h5"));
        assert!(!reaches(PieceKind::Rook, "a1", "b3"));
        assert!(!reaches(PieceKind::Bishop, "a1", "a2"));
    }

    #[test]
    fn king_and_pawn_are_single_step() {
        assert!(reaches(PieceKind::King, "e1", "f2"));
        assert!(!reaches(PieceKind::King, "e1", "g1"));
        assert!(reaches(PieceKind::Pawn, "e4", "d5"));
        assert!(reaches(PieceKind::Pawn, "e5", "d4"));
        assert!(!reaches(PieceKind::Pawn, "e4", "e5"));
    }

    #[test]
    fn rays_point_from_attacker_to_target() {
        assert_eq!(RAYS[diff_index(sq("a1").index(), sq("h8").index())], 17);
        assert_eq!(RAYS[diff_index(sq("h8").index(), sq("a1").index())], -17);
        assert_eq!(RAYS[diff_index(sq("e1").index(), sq("e8").index())], 16);
        assert_eq!(RAYS[diff_index(sq("h4").index(), sq("a4").index())], -1);
        assert_eq!(RAYS[diff_index(sq("g1").index(), sq("f3").index())], 0);
    }

    #[test]
    fn same_square_is_empty() {
        assert_eq!(ATTACKS[DIFF_BIAS as usize], 0);
        assert_eq!(RAYS[DIFF_BIAS as usize], 0);
    }
}
