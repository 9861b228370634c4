//! Board state on a 0x88 grid.

use chess_core::{
    Color, FenError, FenParser, File, MoveFlags, Piece, PieceKind, Rank, Square, Uas,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::history::HistoryEntry;
use crate::movegen::{generate_moves, GenOptions};
use crate::record::BoardSnapshot;

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Parses the FEN castling field. Characters other than `KQkq` are ignored.
    pub fn from_fen(field: &str) -> Self {
        let mut flags = 0;
        for c in field.chars() {
            flags |= match c {
                'K' => Self::WHITE_KINGSIDE,
                'Q' => Self::WHITE_QUEENSIDE,
                'k' => Self::BLACK_KINGSIDE,
                'q' => Self::BLACK_QUEENSIDE,
                _ => 0,
            };
        }
        CastlingRights(flags)
    }

    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        self.0 & Self::kingside_flag(color) != 0
    }

    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        self.0 & Self::queenside_flag(color) != 0
    }

    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.0 &= !(Self::kingside_flag(color) | Self::queenside_flag(color));
    }

    #[inline]
    pub fn remove_kingside(&mut self, color: Color) {
        self.0 &= !Self::kingside_flag(color);
    }

    #[inline]
    pub fn remove_queenside(&mut self, color: Color) {
        self.0 &= !Self::queenside_flag(color);
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Renders the FEN castling field ("KQkq", "-", ...).
    pub fn to_fen(self) -> String {
        let mut field = String::new();
        for (flag, c) in [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ] {
            if self.0 & flag != 0 {
                field.push(c);
            }
        }
        if field.is_empty() {
            field.push('-');
        }
        field
    }

    const fn kingside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }

    const fn queenside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }
}

/// Errors from loading a position.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error("invalid position: {0}")]
    InvalidFen(#[from] FenError),

    #[error("invalid position: {0} has more than 16 pieces")]
    SymbolsExhausted(Color),
}

/// Reasons [`Board::put`] refuses a placement.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("illegal placement: {color} already has a king on {existing}")]
    DuplicateKing { color: Color, existing: Square },

    #[error("illegal placement: invalid square '{0}'")]
    InvalidSquare(String),

    #[error("illegal placement: symbol {uas} is already on {square}")]
    SymbolInUse { uas: Uas, square: Square },

    #[error("illegal placement: symbol {uas} does not belong to {color}")]
    SymbolColorMismatch { uas: Uas, color: Color },

    #[error("illegal placement: no free symbol left for {0}")]
    SymbolsExhausted(Color),
}

/// A complete, mutable chess position plus its undo history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) squares: [Option<Piece>; Square::SLOTS],
    pub(crate) turn: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) ep_square: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    /// Cached king locations, indexed by color.
    pub(crate) kings: [Option<Square>; 2],
    pub(crate) history: Vec<HistoryEntry>,
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

impl Board {
    /// An empty board with White to move.
    pub fn empty() -> Self {
        Board {
            squares: [None; Square::SLOTS],
            turn: Color::White,
            castling: CastlingRights::NONE,
            ep_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            kings: [None; 2],
            history: Vec::new(),
        }
    }

    /// The standard starting position, every piece on its home symbol.
    pub fn startpos() -> Self {
        let mut board = Self::empty();
        for color in Color::ALL {
            for file in File::ALL {
                let back = Uas::home(color, file, false);
                let pawn = Uas::home(color, file, true);
                board.set(back.home_square(), Piece::new(color, back.home_kind(), back));
                board.set(pawn.home_square(), Piece::new(color, PieceKind::Pawn, pawn));
            }
        }
        board.castling = CastlingRights::ALL;
        board
    }

    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let mut board = Self::empty();
        board.load(fen)?;
        Ok(board)
    }

    /// Replaces the whole position with `fen`. On failure the board is left
    /// untouched.
    pub fn load(&mut self, fen: &str) -> Result<(), PositionError> {
        let board = Self::parse(fen).map_err(|e| {
            debug!(fen, error = %e, "rejected FEN");
            e
        })?;
        *self = board;
        Ok(())
    }

    fn parse(fen: &str) -> Result<Self, PositionError> {
        let fields = FenParser::parse(fen)?;

        let mut placed = Vec::with_capacity(32);
        for (row, rank_text) in fields.piece_placement.split('/').enumerate() {
            let rank = Rank::ALL[7 - row];
            let mut file = 0u8;
            for c in rank_text.chars() {
                if let Some(run) = c.to_digit(10) {
                    file += run as u8;
                } else if let Some((kind, color)) = PieceKind::from_fen_char(c) {
                    if let Some(file) = File::from_index(file) {
                        placed.push((Square::new(file, rank), color, kind));
                    }
                    file += 1;
                }
            }
        }

        let symbols = assign_symbols(&placed)?;
        let mut board = Self::empty();
        for (&(square, color, kind), uas) in placed.iter().zip(symbols) {
            board.set(square, Piece::new(color, kind, uas));
        }

        board.turn = fields.active_color;
        board.castling = CastlingRights::from_fen(&fields.castling);
        board.ep_square = Square::from_algebraic(&fields.en_passant);
        board.halfmove_clock = fields.halfmove_clock;
        board.fullmove_number = fields.fullmove_number;
        board.sanitize();
        Ok(board)
    }

    /// Removes every piece and resets all state, including history.
    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    /// Restores the standard starting position and drops history.
    pub fn reset(&mut self) {
        *self = Self::startpos();
    }

    #[inline]
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.squares[square.index() as usize]
    }

    /// Places `piece` on `square`, replacing whatever stood there.
    ///
    /// Refuses a second king of the same color and a symbol that is already
    /// live on another square. Castling rights and the en passant square are
    /// re-validated afterwards.
    pub fn put(&mut self, piece: Piece, square: Square) -> Result<(), PlacementError> {
        if let Err(e) = self.check_placement(piece, square) {
            warn!(%square, uas = %piece.uas, error = %e, "rejected placement");
            return Err(e);
        }

        if let Some(old) = self.get(square) {
            if old.kind == PieceKind::King {
                self.kings[old.color.index()] = None;
            }
        }
        self.set(square, piece);
        self.sanitize();
        Ok(())
    }

    /// Like [`put`](Self::put), with the square in algebraic notation.
    pub fn put_algebraic(&mut self, piece: Piece, square: &str) -> Result<(), PlacementError> {
        let square = Square::from_algebraic(square).ok_or_else(|| {
            let e = PlacementError::InvalidSquare(square.to_string());
            warn!(error = %e, "rejected placement");
            e
        })?;
        self.put(piece, square)
    }

    /// Places a new piece, picking a free symbol for it the same way
    /// [`load`](Self::load) does.
    pub fn put_new(
        &mut self,
        color: Color,
        kind: PieceKind,
        square: Square,
    ) -> Result<Piece, PlacementError> {
        let mut used = [false; Uas::COUNT];
        for sq in Square::all() {
            if let Some(piece) = self.get(sq) {
                if sq != square {
                    used[piece.uas.index()] = true;
                }
            }
        }
        let uas = pick_symbol(&used, square, color, kind).ok_or_else(|| {
            let e = PlacementError::SymbolsExhausted(color);
            warn!(%square, error = %e, "rejected placement");
            e
        })?;
        let piece = Piece::new(color, kind, uas);
        self.put(piece, square)?;
        Ok(piece)
    }

    fn check_placement(&self, piece: Piece, square: Square) -> Result<(), PlacementError> {
        if piece.uas.color() != piece.color {
            return Err(PlacementError::SymbolColorMismatch {
                uas: piece.uas,
                color: piece.color,
            });
        }
        if piece.kind == PieceKind::King {
            if let Some(existing) = self.kings[piece.color.index()] {
                if existing != square {
                    return Err(PlacementError::DuplicateKing {
                        color: piece.color,
                        existing,
                    });
                }
            }
        }
        if let Some(other) = self.find(piece.uas) {
            if other != square {
                return Err(PlacementError::SymbolInUse {
                    uas: piece.uas,
                    square: other,
                });
            }
        }
        Ok(())
    }

    /// Clears `square`, returning the piece that stood there.
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        let piece = self.squares[square.index() as usize].take()?;
        if piece.kind == PieceKind::King {
            self.kings[piece.color.index()] = None;
        }
        self.sanitize();
        Some(piece)
    }

    /// Square currently holding the piece named `uas`.
    pub fn find(&self, uas: Uas) -> Option<Square> {
        Square::all().find(|&sq| self.get(sq).is_some_and(|p| p.uas == uas))
    }

    /// Raw placement without validation, keeping the king cache current.
    pub(crate) fn set(&mut self, square: Square, piece: Piece) {
        if piece.kind == PieceKind::King {
            self.kings[piece.color.index()] = Some(square);
        }
        self.squares[square.index() as usize] = Some(piece);
    }

    /// Drops castling rights whose king or rook has left home, and an en
    /// passant square that no double push could have produced.
    fn sanitize(&mut self) {
        for color in Color::ALL {
            let back = color.back_rank();
            let king_home = self
                .get(Square::new(File::E, back))
                .is_some_and(|p| p.is(color, PieceKind::King));
            if !king_home {
                self.castling.remove_color(color);
            }
            let [queenside_rook, kingside_rook] = [File::A, File::H].map(|file| {
                self.get(Square::new(file, back))
                    .is_some_and(|p| p.is(color, PieceKind::Rook))
            });
            if !kingside_rook {
                self.castling.remove_kingside(color);
            }
            if !queenside_rook {
                self.castling.remove_queenside(color);
            }
        }

        if let Some(ep) = self.ep_square {
            if !self.ep_structurally_valid(ep) {
                self.ep_square = None;
            }
        }
    }

    fn ep_structurally_valid(&self, ep: Square) -> bool {
        let them = self.turn.opposite();
        let Some(start) = ep.offset(-them.pawn_step()) else {
            return false;
        };
        let pushed = ep.offset(them.pawn_step()).and_then(|sq| self.get(sq));
        start.rank() == them.pawn_rank()
            && pushed.is_some_and(|p| p.is(them, PieceKind::Pawn))
            && self.get(ep).is_none()
            && self.get(start).is_none()
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    /// En passant target left by the last double push, whether or not a
    /// capture onto it is legal.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.ep_square
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.kings[color.index()]
    }

    /// Applied moves not yet undone, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// A copy of the position without history, for speculative moves.
    pub(crate) fn scratch(&self) -> Board {
        Board {
            squares: self.squares,
            turn: self.turn,
            castling: self.castling,
            ep_square: self.ep_square,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            kings: self.kings,
            history: Vec::new(),
        }
    }

    /// True if the side to move has a legal en passant capture.
    fn has_legal_ep_capture(&self) -> bool {
        if self.ep_square.is_none() {
            return false;
        }
        generate_moves(self, &GenOptions::for_kind(PieceKind::Pawn))
            .as_slice()
            .iter()
            .any(|m| m.flags.contains(MoveFlags::EP_CAPTURE))
    }

    /// Serializes the position. The en passant square is only written when a
    /// legal en passant capture exists.
    pub fn to_fen(&self) -> String {
        self.fen_with_ep(self.visible_ep())
    }

    fn visible_ep(&self) -> Option<Square> {
        if self.has_legal_ep_capture() {
            self.ep_square
        } else {
            None
        }
    }

    /// Serializes the position, writing the en passant square after every
    /// double push.
    pub fn to_fen_unfiltered(&self) -> String {
        self.fen_with_ep(self.ep_square)
    }

    fn fen_with_ep(&self, ep: Option<Square>) -> String {
        format!(
            "{} {} {}",
            self.key_with_ep(ep),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    fn key_with_ep(&self, ep: Option<Square>) -> String {
        format!(
            "{} {} {} {}",
            self.placement(),
            self.turn.to_fen_char(),
            self.castling.to_fen(),
            ep.map_or_else(|| "-".to_string(), |sq| sq.to_algebraic())
        )
    }

    fn placement(&self) -> String {
        let mut out = String::with_capacity(72);
        for rank in Rank::ALL.iter().rev() {
            let mut empty = 0;
            for file in File::ALL {
                match self.get(Square::new(file, *rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if *rank != Rank::R1 {
                out.push('/');
            }
        }
        out
    }

    /// Placement, turn, castling and en passant: the fields that identify a
    /// position for repetition purposes.
    pub fn position_key(&self) -> String {
        self.key_with_ep(self.visible_ep())
    }

    /// Copies the 64 squares into an 8x8 grid, rank 8 first.
    pub fn snapshot(&self) -> BoardSnapshot {
        let mut rows = [[None; 8]; 8];
        for sq in Square::all() {
            rows[7 - sq.rank().index() as usize][sq.file().index() as usize] = self.get(sq);
        }
        BoardSnapshot::new(rows)
    }

    /// Text diagram of the board, White at the bottom.
    pub fn ascii(&self) -> String {
        let mut out = String::from("   +------------------------+\n");
        for rank in Rank::ALL.iter().rev() {
            out.push(' ');
            out.push(rank.to_char());
            out.push_str(" |");
            for file in File::ALL {
                let c = self.get(Square::new(file, *rank)).map_or('.', |p| p.to_fen_char());
                out.push(' ');
                out.push(c);
                out.push(' ');
            }
            out.push_str("|\n");
        }
        out.push_str("   +------------------------+\n");
        out.push_str("     a  b  c  d  e  f  g  h");
        out
    }
}

/// Gives every placed piece a symbol.
///
/// Runs four passes so that pieces standing on their home square always win
/// their own symbol before anyone else may claim it: home square, then same
/// kind nearest home file, then a pawn symbol (promoted pieces), then any.
fn assign_symbols(placed: &[(Square, Color, PieceKind)]) -> Result<Vec<Uas>, PositionError> {
    let mut used = [false; Uas::COUNT];
    let mut assigned: Vec<Option<Uas>> = vec![None; placed.len()];

    for (slot, &(square, color, kind)) in assigned.iter_mut().zip(placed) {
        if let Some(uas) = home_symbol(square, color, kind) {
            if !used[uas.index()] {
                used[uas.index()] = true;
                *slot = Some(uas);
            }
        }
    }

    let fallbacks: [fn(Uas, PieceKind) -> bool; 3] = [
        |uas, kind| uas.home_kind() == kind,
        |uas, _| uas.is_pawn_symbol(),
        |_, _| true,
    ];
    for accept in fallbacks {
        for (slot, &(square, color, kind)) in assigned.iter_mut().zip(placed) {
            if slot.is_some() {
                continue;
            }
            if let Some(uas) = nearest_free(&used, square, color, |u| accept(u, kind)) {
                used[uas.index()] = true;
                *slot = Some(uas);
            }
        }
    }

    assigned
        .into_iter()
        .zip(placed)
        .map(|(uas, &(_, color, _))| uas.ok_or(PositionError::SymbolsExhausted(color)))
        .collect()
}

/// Preference order of [`assign_symbols`] for a single piece.
fn pick_symbol(
    used: &[bool; Uas::COUNT],
    square: Square,
    color: Color,
    kind: PieceKind,
) -> Option<Uas> {
    home_symbol(square, color, kind)
        .filter(|uas| !used[uas.index()])
        .or_else(|| nearest_free(used, square, color, |u| u.home_kind() == kind))
        .or_else(|| nearest_free(used, square, color, |u| u.is_pawn_symbol()))
        .or_else(|| nearest_free(used, square, color, |_| true))
}

fn home_symbol(square: Square, color: Color, kind: PieceKind) -> Option<Uas> {
    Uas::at_home_square(square).filter(|uas| uas.color() == color && uas.home_kind() == kind)
}

fn nearest_free(
    used: &[bool; Uas::COUNT],
    square: Square,
    color: Color,
    accept: impl Fn(Uas) -> bool,
) -> Option<Uas> {
    let file = square.file().index() as i8;
    Uas::of_color(color)
        .filter(|uas| !used[uas.index()] && accept(*uas))
        .min_by_key(|uas| ((uas.file().index() as i8 - file).abs(), uas.index()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn uas(s: &str) -> Uas {
        Uas::from_symbol(s).unwrap()
    }

    #[test]
    fn startpos_fen() {
        assert_eq!(Board::startpos().to_fen(), FenParser::STARTPOS);
        assert_eq!(
            Board::from_fen(FenParser::STARTPOS).unwrap(),
            Board::startpos()
        );
    }

    #[test]
    fn startpos_symbols() {
        let board = Board::startpos();
        assert_eq!(board.get(Square::A1).unwrap().uas.as_str(), "RA");
        assert_eq!(board.get(Square::E8).unwrap().uas.as_str(), "ke");
        assert_eq!(board.get(sq("d7")).unwrap().uas.as_str(), "pd");
        assert_eq!(board.king_square(Color::White), Some(Square::E1));
    }

    #[test]
    fn load_assigns_nearest_symbol_of_same_kind() {
        // Knight from b1 on c3, knight on g1 untouched.
        let board =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/2N5/PPPPPPPP/R1BQKBNR b KQkq - 1 1").unwrap();
        assert_eq!(board.get(sq("c3")).unwrap().uas, uas("NB"));
        assert_eq!(board.get(Square::G1).unwrap().uas, uas("NG"));
    }

    #[test]
    fn load_gives_extra_pieces_pawn_symbols() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/QQ2K3 w - - 0 1").unwrap();
        let symbols = [board.get(Square::A1).unwrap().uas, board.get(Square::B1).unwrap().uas];
        assert!(symbols.contains(&uas("QD")));
        assert!(symbols.iter().any(|u| u.is_pawn_symbol()));
        assert_eq!(board.get(Square::E1).unwrap().uas, uas("KE"));
    }

    #[test]
    fn load_rejects_seventeen_pieces() {
        let fen = "4k3/8/8/8/NNNNNNNN/NNNNNNNN/8/4K3 w - - 0 1";
        assert_eq!(
            Board::from_fen(fen),
            Err(PositionError::SymbolsExhausted(Color::White))
        );
    }

    #[test]
    fn failed_load_leaves_board_untouched() {
        let mut board = Board::startpos();
        let before = board.clone();
        assert!(matches!(
            board.load("not a fen"),
            Err(PositionError::InvalidFen(FenError::InvalidPartCount(3)))
        ));
        assert_eq!(board, before);
    }

    #[test]
    fn castling_rights_dropped_without_rook() {
        let board = Board::from_fen("r3k3/8/8/8/8/8/8/4K2R w KQkq - 0 1").unwrap();
        assert_eq!(board.castling_rights().to_fen(), "Kq");
    }

    #[test]
    fn castling_rights_dropped_without_king() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R2K3R w KQkq - 0 1").unwrap();
        assert_eq!(board.castling_rights().to_fen(), "kq");
    }

    #[test]
    fn en_passant_dropped_without_pushed_pawn() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 b - e3 0 1").unwrap();
        assert_eq!(board.en_passant(), None);
    }

    #[test]
    fn en_passant_kept_after_double_push() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let board = Board::from_fen(fen).unwrap();
        assert_eq!(board.en_passant(), Some(sq("e3")));
        assert_eq!(board.to_fen_unfiltered(), fen);
        // No black pawn can take on e3.
        assert!(board.to_fen().contains(" KQkq - 0 1"));
    }

    #[test]
    fn fen_keeps_legal_en_passant() {
        let fen = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3";
        assert_eq!(Board::from_fen(fen).unwrap().to_fen(), fen);
    }

    #[test]
    fn fen_drops_pinned_en_passant() {
        // The e5 pawn is pinned against the king on a5 by the rook on h5.
        let fen = "8/8/8/K2pP2r/8/8/8/7k w - d6 0 1";
        let board = Board::from_fen(fen).unwrap();
        assert_eq!(board.en_passant(), Some(sq("d6")));
        assert_eq!(board.to_fen(), "8/8/8/K2pP2r/8/8/8/7k w - - 0 1");
    }

    #[test]
    fn put_and_remove() {
        let mut board = Board::empty();
        let king = Piece::new(Color::White, PieceKind::King, uas("KE"));
        board.put(king, sq("e4")).unwrap();
        assert_eq!(board.king_square(Color::White), Some(sq("e4")));
        assert_eq!(board.remove(sq("e4")), Some(king));
        assert_eq!(board.king_square(Color::White), None);
        assert_eq!(board.remove(sq("e4")), None);
    }

    #[test]
    fn put_rejects_second_king() {
        let mut board = Board::startpos();
        let before = board.clone();
        let err = board
            .put(Piece::new(Color::White, PieceKind::King, uas("KE")), sq("e4"))
            .unwrap_err();
        assert_eq!(
            err,
            PlacementError::DuplicateKing { color: Color::White, existing: Square::E1 }
        );
        assert_eq!(board, before);
    }

    #[test]
    fn put_rejects_live_symbol() {
        let mut board = Board::startpos();
        let err = board
            .put(Piece::new(Color::White, PieceKind::Rook, uas("RA")), sq("a4"))
            .unwrap_err();
        assert_eq!(err, PlacementError::SymbolInUse { uas: uas("RA"), square: Square::A1 });
    }

    #[test]
    fn put_rejects_foreign_symbol() {
        let mut board = Board::empty();
        let err = board
            .put(Piece::new(Color::Black, PieceKind::Rook, uas("RA")), sq("a4"))
            .unwrap_err();
        assert!(matches!(err, PlacementError::SymbolColorMismatch { .. }));
    }

    #[test]
    fn put_algebraic_rejects_bad_square() {
        let mut board = Board::empty();
        let piece = Piece::new(Color::White, PieceKind::Rook, uas("RA"));
        assert_eq!(
            board.put_algebraic(piece, "z9"),
            Err(PlacementError::InvalidSquare("z9".to_string()))
        );
        assert!(board.put_algebraic(piece, "a1").is_ok());
    }

    #[test]
    fn removing_rook_clears_castling_right() {
        let mut board = Board::startpos();
        board.remove(Square::H1);
        assert_eq!(board.castling_rights().to_fen(), "Qkq");
    }

    #[test]
    fn put_new_picks_free_symbol() {
        let mut board = Board::empty();
        let rook = board.put_new(Color::Black, PieceKind::Rook, Square::H8).unwrap();
        assert_eq!(rook.uas, uas("rh"));
        let second = board.put_new(Color::Black, PieceKind::Rook, sq("h5")).unwrap();
        assert_eq!(second.uas, uas("ra"));
    }

    #[test]
    fn snapshot_is_rank_eight_first() {
        let snap = Board::startpos().snapshot();
        assert_eq!(snap.rows()[0][0].unwrap().uas, uas("ra"));
        assert_eq!(snap.rows()[7][4].unwrap().uas, uas("KE"));
        assert!(snap.rows()[4].iter().all(Option::is_none));
    }

    #[test]
    fn ascii_diagram() {
        let text = Board::startpos().ascii();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], " 8 | r  n  b  q  k  b  n  r |");
        assert_eq!(lines[5], " 4 | .  .  .  .  .  .  .  . |");
        assert_eq!(lines[10], "     a  b  c  d  e  f  g  h");
    }

    #[test]
    fn position_key_has_four_fields() {
        assert_eq!(
            Board::startpos().position_key(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"
        );
    }

    #[test]
    fn position_key_matches_leading_fen_fields() {
        let fens = [
            // e3 is not capturable, so it stays out of the key.
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            "r3k2r/8/8/8/8/8/8/R3K2R b Kq - 7 40",
        ];
        for fen in fens {
            let board = Board::from_fen(fen).unwrap();
            let full = board.to_fen();
            let leading: Vec<&str> = full.split(' ').take(4).collect();
            assert_eq!(board.position_key(), leading.join(" "), "{}", fen);
        }

        let board = Board::from_fen(fens[0]).unwrap();
        assert!(board.position_key().ends_with(" b KQkq -"));
        let board = Board::from_fen(fens[1]).unwrap();
        assert!(board.position_key().ends_with(" w KQkq f6"));
    }

    #[test]
    fn castling_field_may_mix_dash_and_letters() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w K- - 0 1").unwrap();
        assert_eq!(board.castling_rights().to_fen(), "K");
        assert_eq!(board.to_fen(), "r3k2r/8/8/8/8/8/8/R3K2R w K - 0 1");
    }
}
