//! Move application and the undo stack.
//!
//! Every applied move pushes a [`HistoryEntry`] holding the scalar state
//! from before the move. Undo pops it and replays the move backwards; there
//! is no other way to revert a move.

use chess_core::{Color, Move, MoveFlags, Piece, PieceKind, Square};

use crate::board::{Board, CastlingRights};

/// State snapshot taken just before a move was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub mv: Move,
    pub kings: [Option<Square>; 2],
    pub turn: Color,
    pub castling: CastlingRights,
    pub ep_square: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    /// Text the move was parsed from, if any.
    pub text: Option<String>,
}

/// Rook relocation for a castling move, as (from, to).
fn castle_rook(mv: &Move) -> Option<(Square, Square)> {
    let kingside = mv.flags.contains(MoveFlags::KSIDE_CASTLE);
    let queenside = mv.flags.contains(MoveFlags::QSIDE_CASTLE);
    match (mv.color, kingside, queenside) {
        (Color::White, true, _) => Some((Square::H1, Square::F1)),
        (Color::White, _, true) => Some((Square::A1, Square::D1)),
        (Color::Black, true, _) => Some((Square::H8, Square::F8)),
        (Color::Black, _, true) => Some((Square::A8, Square::D8)),
        _ => None,
    }
}

/// Square of the pawn removed by an en passant capture.
fn ep_victim(mv: &Move) -> Option<Square> {
    mv.to.offset(-mv.color.pawn_step())
}

impl Board {
    /// Applies a move produced by the generator for this position.
    ///
    /// `text` is kept on the history entry so the move can be reported with
    /// the notation it was read from. Nothing happens if `mv.from` is empty.
    pub fn apply_move(&mut self, mv: &Move, text: Option<String>) {
        let Some(mut piece) = self.get(mv.from) else {
            return;
        };
        let us = mv.color;
        let them = us.opposite();

        self.history.push(HistoryEntry {
            mv: *mv,
            kings: self.kings,
            turn: self.turn,
            castling: self.castling,
            ep_square: self.ep_square,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            text,
        });

        self.squares[mv.from.index() as usize] = None;
        if mv.flags.contains(MoveFlags::EP_CAPTURE) {
            if let Some(victim) = ep_victim(mv) {
                self.squares[victim.index() as usize] = None;
            }
        }
        if let Some(kind) = mv.promotion {
            piece.kind = kind;
        }
        self.squares[mv.to.index() as usize] = Some(piece);

        if piece.kind == PieceKind::King {
            self.kings[us.index()] = Some(mv.to);
            if let Some((rook_from, rook_to)) = castle_rook(mv) {
                let rook = self.squares[rook_from.index() as usize].take();
                self.squares[rook_to.index() as usize] = rook;
            }
            self.castling.remove_color(us);
        }

        // A rook leaving its corner, or anything captured there.
        for square in [mv.from, mv.to] {
            match square {
                Square::A1 => self.castling.remove_queenside(Color::White),
                Square::H1 => self.castling.remove_kingside(Color::White),
                Square::A8 => self.castling.remove_queenside(Color::Black),
                Square::H8 => self.castling.remove_kingside(Color::Black),
                _ => {}
            }
        }

        self.ep_square = if mv.flags.contains(MoveFlags::BIG_PAWN) {
            ep_victim(mv)
        } else {
            None
        };

        if mv.kind == PieceKind::Pawn || mv.flags.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.turn = them;
    }

    /// Reverts the last applied move. Returns `None` when there is no
    /// history.
    pub fn undo_move(&mut self) -> Option<Move> {
        self.undo_entry().map(|entry| entry.mv)
    }

    pub(crate) fn undo_entry(&mut self) -> Option<HistoryEntry> {
        let entry = self.history.pop()?;
        let mv = entry.mv;

        self.kings = entry.kings;
        self.turn = entry.turn;
        self.castling = entry.castling;
        self.ep_square = entry.ep_square;
        self.halfmove_clock = entry.halfmove_clock;
        self.fullmove_number = entry.fullmove_number;

        let moved = self.squares[mv.to.index() as usize].take();
        self.squares[mv.from.index() as usize] =
            moved.map(|piece| Piece::new(piece.color, mv.kind, piece.uas));

        if let Some(captured) = mv.captured {
            let at = if mv.flags.contains(MoveFlags::EP_CAPTURE) {
                ep_victim(&mv)
            } else {
                Some(mv.to)
            };
            if let Some(at) = at {
                self.squares[at.index() as usize] =
                    Some(Piece::new(mv.color.opposite(), captured.kind, captured.uas));
            }
        }

        if let Some((rook_from, rook_to)) = castle_rook(&mv) {
            let rook = self.squares[rook_to.index() as usize].take();
            self.squares[rook_from.index() as usize] = rook;
        }

        Some(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::{generate_moves, GenOptions};

    fn find(board: &Board, uci: &str) -> Move {
        *generate_moves(board, &GenOptions::default())
            .as_slice()
            .iter()
            .find(|m| m.to_uci() == uci)
            .unwrap_or_else(|| panic!("{} is not legal", uci))
    }

    fn play(board: &mut Board, ucis: &[&str]) {
        for uci in ucis {
            let mv = find(board, uci);
            board.apply_move(&mv, None);
        }
    }

    #[test]
    fn double_push_sets_en_passant() {
        let mut board = Board::startpos();
        play(&mut board, &["e2e4"]);
        assert_eq!(
            board.to_fen_unfiltered(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        assert_eq!(board.history().len(), 1);
    }

    #[test]
    fn undo_restores_everything() {
        let mut board = Board::startpos();
        let start = board.clone();
        play(&mut board, &["g1f3", "b8c6", "e2e4"]);
        for _ in 0..3 {
            assert!(board.undo_move().is_some());
        }
        assert_eq!(board, start);
        assert_eq!(board.undo_move(), None);
    }

    #[test]
    fn castling_moves_rook_and_keeps_symbol() {
        let mut board =
            Board::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let rook = board.get(Square::H1).unwrap();
        play(&mut board, &["e1g1"]);
        assert_eq!(board.get(Square::F1), Some(rook));
        assert_eq!(board.get(Square::H1), None);
        assert_eq!(board.king_square(Color::White), Some(Square::G1));
        assert_eq!(board.castling_rights().to_fen(), "kq");

        play(&mut board, &["e8c8"]);
        assert_eq!(board.get(Square::D8).unwrap().uas.as_str(), "ra");
        assert_eq!(board.castling_rights().to_fen(), "-");

        board.undo_move();
        board.undo_move();
        assert_eq!(board.get(Square::H1), Some(rook));
        assert_eq!(board.castling_rights().to_fen(), "KQkq");
    }

    #[test]
    fn capture_on_corner_drops_right() {
        let mut board =
            Board::from_fen("r3k2r/8/8/8/8/8/6b1/R3K2R b KQkq - 0 1").unwrap();
        play(&mut board, &["g2h1"]);
        assert_eq!(board.castling_rights().to_fen(), "Qkq");
    }

    #[test]
    fn promotion_keeps_symbol_and_undo_restores_pawn() {
        let mut board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let pawn = board.get(Square::from_algebraic("a7").unwrap()).unwrap();
        play(&mut board, &["a7a8q"]);
        let queen = board.get(Square::A8).unwrap();
        assert_eq!(queen.kind, PieceKind::Queen);
        assert_eq!(queen.uas, pawn.uas);

        board.undo_move();
        assert_eq!(board.get(Square::from_algebraic("a7").unwrap()), Some(pawn));
        assert_eq!(board.get(Square::A8), None);
    }

    #[test]
    fn en_passant_capture_and_undo() {
        let mut board = Board::startpos();
        play(&mut board, &["e2e4", "a7a6", "e4e5", "d7d5"]);
        let before = board.clone();
        let d5 = Square::from_algebraic("d5").unwrap();
        let victim = board.get(d5).unwrap();

        let mv = find(&board, "e5d6");
        assert!(mv.flags.contains(MoveFlags::EP_CAPTURE));
        assert_eq!(mv.captured.map(|c| c.uas), Some(victim.uas));
        board.apply_move(&mv, Some("exd6".to_string()));
        assert_eq!(board.get(d5), None);
        assert_eq!(board.history().last().unwrap().text.as_deref(), Some("exd6"));

        board.undo_move();
        assert_eq!(board, before);
    }

    #[test]
    fn clocks() {
        let mut board = Board::startpos();
        play(&mut board, &["g1f3", "g8f6"]);
        assert_eq!(board.halfmove_clock(), 2);
        assert_eq!(board.fullmove_number(), 2);
        play(&mut board, &["e2e4"]);
        assert_eq!(board.halfmove_clock(), 0);
    }

    #[test]
    fn fullmove_number_saturates() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 4294967295").unwrap();
        let before = board.clone();
        play(&mut board, &["e8d7"]);
        assert_eq!(board.fullmove_number(), u32::MAX);
        assert_eq!(board.halfmove_clock(), 1);
        board.undo_move();
        assert_eq!(board, before);
    }

    #[test]
    fn halfmove_clock_saturates() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 4294967295 1").unwrap();
        let before = board.clone();
        play(&mut board, &["e1d2"]);
        assert_eq!(board.halfmove_clock(), u32::MAX);
        assert_eq!(board.fullmove_number(), 1);
        board.undo_move();
        assert_eq!(board, before);
    }
}
