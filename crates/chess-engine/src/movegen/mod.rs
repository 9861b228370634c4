//! Move generation.
//!
//! Pseudo-legal moves are generated by walking 0x88 offsets. Legality is
//! decided by applying each candidate on a scratch board, checking whether
//! the mover's king is attacked, and undoing it.

pub mod perft;

use crate::tables::{diff_index, kind_mask, offsets, ATTACKS, RAYS};
use crate::Board;
use chess_core::{Captured, Color, Move, MoveFlags, Piece, PieceKind, Square};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of moves in any chess position, pseudo-legal included.
    pub const MAX_MOVES: usize = 256;

    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Restricts what [`generate_moves`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenOptions {
    /// Drop moves that leave the mover's king attacked.
    pub legal: bool,
    /// Only moves of this piece type.
    pub kind: Option<PieceKind>,
    /// Only moves starting on this square.
    pub square: Option<Square>,
}

impl Default for GenOptions {
    fn default() -> Self {
        GenOptions {
            legal: true,
            kind: None,
            square: None,
        }
    }
}

impl GenOptions {
    pub fn pseudo_legal() -> Self {
        GenOptions {
            legal: false,
            ..Self::default()
        }
    }

    pub fn for_kind(kind: PieceKind) -> Self {
        GenOptions {
            kind: Some(kind),
            ..Self::default()
        }
    }
}

/// Generates moves for the side to move.
pub fn generate_moves(board: &Board, options: &GenOptions) -> MoveList {
    let us = board.turn();
    let mut moves = MoveList::new();

    let squares: Box<dyn Iterator<Item = Square>> = match options.square {
        Some(sq) => Box::new(std::iter::once(sq)),
        None => Box::new(Square::all()),
    };

    for from in squares {
        let Some(piece) = board.get(from) else {
            continue;
        };
        if piece.color != us || options.kind.is_some_and(|k| k != piece.kind) {
            continue;
        }
        if piece.kind == PieceKind::Pawn {
            generate_pawn_moves(board, from, piece, &mut moves);
        } else {
            generate_piece_moves(board, from, piece, &mut moves);
        }
    }

    let castling_wanted = options.kind.map_or(true, |k| k == PieceKind::King);
    if castling_wanted {
        if let Some(king) = board.king_square(us) {
            if options.square.map_or(true, |sq| sq == king) {
                generate_castling(board, king, &mut moves);
            }
        }
    }

    if options.legal {
        let mut scratch = board.scratch();
        moves.retain(|m| {
            scratch.apply_move(m, None);
            let safe = !is_king_attacked(&scratch, us);
            scratch.undo_move();
            safe
        });
    }

    moves
}

/// Generates every legal move for the side to move.
pub fn legal_moves(board: &Board) -> MoveList {
    generate_moves(board, &GenOptions::default())
}

/// Pushes a move, expanding pawn moves onto the last rank into the four
/// promotions.
fn add_move(
    board: &Board,
    moves: &mut MoveList,
    from: Square,
    to: Square,
    piece: Piece,
    flags: u8,
) {
    let captured = if flags & MoveFlags::EP_CAPTURE != 0 {
        to.offset(-piece.color.pawn_step()).and_then(|sq| board.get(sq))
    } else {
        board.get(to)
    }
    .map(|p| Captured {
        kind: p.kind,
        uas: p.uas,
    });

    let base = Move {
        color: piece.color,
        from,
        to,
        kind: piece.kind,
        uas: piece.uas,
        captured,
        promotion: None,
        flags: MoveFlags::new(flags),
    };

    if piece.kind == PieceKind::Pawn && to.rank() == piece.color.promotion_rank() {
        for kind in PieceKind::PROMOTIONS {
            moves.push(Move {
                promotion: Some(kind),
                flags: MoveFlags::new(flags | MoveFlags::PROMOTION),
                ..base
            });
        }
    } else {
        moves.push(base);
    }
}

fn generate_pawn_moves(board: &Board, from: Square, pawn: Piece, moves: &mut MoveList) {
    let us = pawn.color;
    let step = us.pawn_step();

    if let Some(single) = from.offset(step).filter(|sq| board.get(*sq).is_none()) {
        add_move(board, moves, from, single, pawn, MoveFlags::NORMAL);

        if from.rank() == us.pawn_rank() {
            if let Some(double) = single.offset(step).filter(|sq| board.get(*sq).is_none()) {
                add_move(board, moves, from, double, pawn, MoveFlags::BIG_PAWN);
            }
        }
    }

    for side in [-1, 1] {
        let Some(to) = from.offset(step + side) else {
            continue;
        };
        match board.get(to) {
            Some(target) if target.color != us => {
                add_move(board, moves, from, to, pawn, MoveFlags::CAPTURE);
            }
            None if board.en_passant() == Some(to) => {
                add_move(board, moves, from, to, pawn, MoveFlags::EP_CAPTURE);
            }
            _ => {}
        }
    }
}

fn generate_piece_moves(board: &Board, from: Square, piece: Piece, moves: &mut MoveList) {
    let slides = piece.kind.is_slider();
    for &offset in offsets(piece.kind) {
        let mut to = from;
        while let Some(next) = to.offset(offset) {
            to = next;
            match board.get(to) {
                None => add_move(board, moves, from, to, piece, MoveFlags::NORMAL),
                Some(target) => {
                    if target.color != piece.color {
                        add_move(board, moves, from, to, piece, MoveFlags::CAPTURE);
                    }
                    break;
                }
            }
            if !slides {
                break;
            }
        }
    }
}

fn generate_castling(board: &Board, king_sq: Square, moves: &mut MoveList) {
    let Some(king) = board.get(king_sq) else {
        return;
    };
    let us = king.color;
    let them = us.opposite();
    let rights = board.castling_rights();
    let empty = |sq: Option<Square>| sq.is_some_and(|sq| board.get(sq).is_none());
    let safe = |sq: Option<Square>| sq.is_some_and(|sq| !is_square_attacked(board, sq, them));

    if rights.can_castle_kingside(us) {
        let f = king_sq.offset(1);
        let g = king_sq.offset(2);
        if empty(f) && empty(g) && safe(Some(king_sq)) && safe(f) && safe(g) {
            if let Some(g) = g {
                add_move(board, moves, king_sq, g, king, MoveFlags::KSIDE_CASTLE);
            }
        }
    }

    if rights.can_castle_queenside(us) {
        let d = king_sq.offset(-1);
        let c = king_sq.offset(-2);
        let b = king_sq.offset(-3);
        if empty(d) && empty(c) && empty(b) && safe(Some(king_sq)) && safe(d) && safe(c) {
            if let Some(c) = c {
                add_move(board, moves, king_sq, c, king, MoveFlags::QSIDE_CASTLE);
            }
        }
    }
}

/// Returns true if any piece of color `by` attacks `target`.
///
/// Reachability comes from the [`ATTACKS`] table; sliders additionally walk
/// the [`RAYS`] step toward the target and fail on the first blocker.
pub fn is_square_attacked(board: &Board, target: Square, by: Color) -> bool {
    for from in Square::all() {
        let Some(piece) = board.get(from) else {
            continue;
        };
        if piece.color != by {
            continue;
        }
        let index = diff_index(from.index(), target.index());
        if ATTACKS[index] & kind_mask(piece.kind) == 0 {
            continue;
        }

        match piece.kind {
            PieceKind::Pawn => {
                // White pawns attack upward, toward higher indices.
                let upward = from.index() < target.index();
                if upward == (by == Color::White) {
                    return true;
                }
            }
            PieceKind::Knight | PieceKind::King => return true,
            _ => {
                let ray = RAYS[index];
                let mut blocked = false;
                let mut cursor = from.offset(ray);
                while let Some(sq) = cursor {
                    if sq == target {
                        break;
                    }
                    if board.get(sq).is_some() {
                        blocked = true;
                        break;
                    }
                    cursor = sq.offset(ray);
                }
                if !blocked {
                    return true;
                }
            }
        }
    }
    false
}

/// Returns true if `color`'s king is attacked. A side without a king is
/// never in check.
pub fn is_king_attacked(board: &Board, color: Color) -> bool {
    board
        .king_square(color)
        .is_some_and(|king| is_square_attacked(board, king, color.opposite()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn ucis(moves: &MoveList) -> Vec<String> {
        let mut out: Vec<String> = moves.iter().map(|m| m.to_uci()).collect();
        out.sort();
        out
    }

    #[test]
    fn startpos_has_20_moves() {
        let moves = legal_moves(&Board::startpos());
        assert_eq!(moves.len(), 20);
        let pawn_moves = moves
            .iter()
            .filter(|m| m.kind == PieceKind::Pawn)
            .count();
        assert_eq!(pawn_moves, 16);
    }

    #[test]
    fn double_push_flagged() {
        let moves = legal_moves(&Board::startpos());
        let e4 = moves.iter().find(|m| m.to_uci() == "e2e4").unwrap();
        assert_eq!(e4.flags.bits(), MoveFlags::BIG_PAWN);
        assert_eq!(e4.uas.as_str(), "PE");
    }

    #[test]
    fn kind_and_square_filters() {
        let board = Board::startpos();
        let knights = generate_moves(&board, &GenOptions::for_kind(PieceKind::Knight));
        assert_eq!(ucis(&knights), ["b1a3", "b1c3", "g1f3", "g1h3"]);

        let options = GenOptions {
            square: Some(Square::G1),
            ..GenOptions::default()
        };
        assert_eq!(ucis(&generate_moves(&board, &options)), ["g1f3", "g1h3"]);
    }

    #[test]
    fn promotions_expand_to_four() {
        let board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let promos: Vec<Move> = generate_moves(&board, &GenOptions::for_kind(PieceKind::Pawn))
            .iter()
            .copied()
            .collect();
        assert_eq!(promos.len(), 4);
        assert_eq!(
            promos.iter().map(|m| m.promotion.unwrap()).collect::<Vec<_>>(),
            PieceKind::PROMOTIONS
        );
        assert!(promos.iter().all(|m| m.flags.contains(MoveFlags::PROMOTION)));
    }

    #[test]
    fn capture_records_victim_symbol() {
        let board =
            Board::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2")
                .unwrap();
        let exd5 = legal_moves(&board)
            .iter()
            .copied()
            .find(|m| m.to_uci() == "e4d5")
            .unwrap();
        assert_eq!(exd5.flags.bits(), MoveFlags::CAPTURE);
        let captured = exd5.captured.unwrap();
        assert_eq!(captured.kind, PieceKind::Pawn);
        assert_eq!(captured.uas.as_str(), "pd");
    }

    #[test]
    fn castling_both_sides() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let moves = generate_moves(&board, &GenOptions::for_kind(PieceKind::King));
        let castles: Vec<String> = moves
            .iter()
            .filter(|m| m.flags.is_castle())
            .map(|m| m.to_uci())
            .collect();
        assert_eq!(castles, ["e1g1", "e1c1"]);
    }

    #[test]
    fn no_castling_through_attack() {
        // Black rook on f8 covers f1.
        let board = Board::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let moves = legal_moves(&board);
        assert!(!moves.iter().any(|m| m.flags.contains(MoveFlags::KSIDE_CASTLE)));
        assert!(moves.iter().any(|m| m.flags.contains(MoveFlags::QSIDE_CASTLE)));
    }

    #[test]
    fn queenside_needs_b_file_empty_but_not_safe() {
        // b1 attacked by the bishop on e4 does not prevent O-O-O.
        let board = Board::from_fen("4k3/8/8/8/4b3/8/8/R3K3 w Q - 0 1").unwrap();
        assert!(legal_moves(&board)
            .iter()
            .any(|m| m.flags.contains(MoveFlags::QSIDE_CASTLE)));

        let blocked = Board::from_fen("4k3/8/8/8/8/8/8/RN2K3 w Q - 0 1").unwrap();
        assert!(!legal_moves(&blocked)
            .iter()
            .any(|m| m.flags.contains(MoveFlags::QSIDE_CASTLE)));
    }

    #[test]
    fn no_castling_out_of_check() {
        let board = Board::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!legal_moves(&board).iter().any(|m| m.flags.is_castle()));
    }

    #[test]
    fn pinned_piece_cannot_move() {
        let board = Board::from_fen("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let options = GenOptions {
            square: Some(sq("e2")),
            ..GenOptions::default()
        };
        assert!(generate_moves(&board, &options).is_empty());
        assert_eq!(
            generate_moves(&board, &GenOptions { legal: false, ..options }).len(),
            6
        );
    }

    #[test]
    fn attack_detection() {
        let board = Board::startpos();
        assert!(is_square_attacked(&board, sq("f3"), Color::White));
        assert!(is_square_attacked(&board, sq("d3"), Color::White));
        assert!(!is_square_attacked(&board, sq("e4"), Color::White));
        assert!(is_square_attacked(&board, sq("f6"), Color::Black));
        assert!(!is_king_attacked(&board, Color::White));
    }

    #[test]
    fn pawns_attack_forward_only() {
        let board = Board::from_fen("4k3/8/8/3p4/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(is_square_attacked(&board, sq("c4"), Color::Black));
        assert!(is_square_attacked(&board, sq("e4"), Color::Black));
        assert!(!is_square_attacked(&board, sq("c6"), Color::Black));
    }

    #[test]
    fn sliders_are_blocked() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R2NK3 w - - 0 1").unwrap();
        assert!(is_square_attacked(&board, sq("a8"), Color::White));
        assert!(is_square_attacked(&board, sq("c1"), Color::White));
        assert!(!is_square_attacked(&board, sq("h1"), Color::White));
    }

    #[test]
    fn en_passant_generated() {
        let board =
            Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
                .unwrap();
        let ep: Vec<Move> = legal_moves(&board)
            .iter()
            .copied()
            .filter(|m| m.flags.contains(MoveFlags::EP_CAPTURE))
            .collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].to_uci(), "e5f6");
        assert_eq!(ep[0].captured.unwrap().uas.as_str(), "pf");
    }
}
