//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1"
//!
//! Decoding runs a strict pass that renders every legal move and compares
//! it with the input. The permissive pass additionally accepts long
//! algebraic ("Ng1f3", "e2-e4"), a missing capture `x`, and origins that
//! name a file or rank nobody asked for ("Ngf3").

use chess_core::{File, Move, MoveFlags, PieceKind, Rank, Square};
use thiserror::Error;
use tracing::debug;

use crate::movegen::legal_moves;
use crate::Board;

/// Error type for SAN parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SanError {
    #[error("empty SAN string")]
    Empty,

    #[error("illegal or unparsable move: {0}")]
    IllegalOrUnparsableMove(String),
}

/// Converts a move to SAN notation given the current position.
///
/// The board must be the state BEFORE the move is made, and the move must
/// be legal on it.
pub fn move_to_san(board: &Board, m: &Move) -> String {
    let moves = legal_moves(board);
    let mut san = san_body(m, moves.as_slice());
    san.push_str(check_suffix(board, m));
    san
}

/// The origin hint SAN needs to tell `m` apart from other legal moves of
/// the same piece type to the same square. Empty when there are none.
pub fn disambiguator(board: &Board, m: &Move) -> String {
    disambiguate(m, legal_moves(board).as_slice())
}

fn disambiguate(m: &Move, moves: &[Move]) -> String {
    let mut ambiguities = 0;
    let mut same_rank = 0;
    let mut same_file = 0;

    for other in moves {
        if other.kind == m.kind && other.from != m.from && other.to == m.to {
            ambiguities += 1;
            if other.from.rank() == m.from.rank() {
                same_rank += 1;
            }
            if other.from.file() == m.from.file() {
                same_file += 1;
            }
        }
    }

    if ambiguities == 0 {
        String::new()
    } else if same_rank > 0 && same_file > 0 {
        m.from.to_algebraic()
    } else if same_file > 0 {
        m.from.rank().to_char().to_string()
    } else {
        m.from.file().to_char().to_string()
    }
}

/// SAN without the check suffix. `moves` is the set consulted for
/// disambiguation.
fn san_body(m: &Move, moves: &[Move]) -> String {
    if m.flags.contains(MoveFlags::KSIDE_CASTLE) {
        return "O-O".to_string();
    }
    if m.flags.contains(MoveFlags::QSIDE_CASTLE) {
        return "O-O-O".to_string();
    }

    let mut san = String::with_capacity(8);
    if m.kind != PieceKind::Pawn {
        san.push(m.kind.to_char().to_ascii_uppercase());
        san.push_str(&disambiguate(m, moves));
    }
    if m.flags.is_capture() {
        if m.kind == PieceKind::Pawn {
            san.push(m.from.file().to_char());
        }
        san.push('x');
    }
    san.push_str(&m.to.to_algebraic());
    if let Some(kind) = m.promotion {
        san.push('=');
        san.push(kind.to_char().to_ascii_uppercase());
    }
    san
}

fn check_suffix(board: &Board, m: &Move) -> &'static str {
    let mut scratch = board.scratch();
    scratch.apply_move(m, None);
    if !scratch.is_check() {
        ""
    } else if legal_moves(&scratch).is_empty() {
        "#"
    } else {
        "+"
    }
}

/// Removes the first `=`, trailing `?`/`!` annotations and one check mark.
pub fn stripped_san(san: &str) -> String {
    let without_eq = san.replacen('=', "", 1);
    let trimmed = without_eq.trim_end_matches(['?', '!']);
    trimmed
        .strip_suffix(['+', '#'])
        .unwrap_or(trimmed)
        .to_string()
}

/// Parses a SAN string and returns the matching legal move. Only exact SAN
/// (up to decorations) is accepted.
pub fn san_to_move(board: &Board, san: &str) -> Result<Move, SanError> {
    decode(board, san, false)
}

/// Like [`san_to_move`], falling back to the permissive pass when no legal
/// move renders to the input.
pub fn san_to_move_permissive(board: &Board, san: &str) -> Result<Move, SanError> {
    decode(board, san, true)
}

fn decode(board: &Board, san: &str, permissive: bool) -> Result<Move, SanError> {
    let san = san.trim();
    if san.is_empty() {
        return Err(SanError::Empty);
    }
    let clean = stripped_san(san);

    let moves = legal_moves(board);
    if let Some(m) = strict_match(&clean, moves.as_slice()) {
        return Ok(m);
    }

    if permissive {
        if let Some(m) = permissive_match(&clean, moves.as_slice()) {
            debug!(san, resolved = %m, "accepted non-standard SAN");
            return Ok(m);
        }
    }

    Err(SanError::IllegalOrUnparsableMove(san.to_string()))
}

fn strict_match(clean: &str, moves: &[Move]) -> Option<Move> {
    let hint = infer_piece_type(clean);
    moves
        .iter()
        .filter(|m| hint.admits(m.kind))
        .find(|m| stripped_san(&san_body(m, moves)) == clean)
        .copied()
}

/// Piece type implied by the first character of a SAN string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PieceHint {
    Any,
    Kind(PieceKind),
    Unknown,
}

impl PieceHint {
    fn admits(self, kind: PieceKind) -> bool {
        match self {
            PieceHint::Any => true,
            PieceHint::Kind(k) => k == kind,
            PieceHint::Unknown => false,
        }
    }
}

/// A leading file letter means a pawn, unless two squares follow (long
/// algebraic, any piece). `o`/`O` is castling.
fn infer_piece_type(san: &str) -> PieceHint {
    let Some(first) = san.chars().next() else {
        return PieceHint::Unknown;
    };
    if ('a'..='h').contains(&first) {
        return if has_two_squares(san.as_bytes()) {
            PieceHint::Any
        } else {
            PieceHint::Kind(PieceKind::Pawn)
        };
    }
    match first.to_ascii_lowercase() {
        'o' => PieceHint::Kind(PieceKind::King),
        c => PieceKind::from_char(c).map_or(PieceHint::Unknown, PieceHint::Kind),
    }
}

fn looks_like_square(bytes: &[u8], pos: usize) -> bool {
    matches!(bytes.get(pos), Some(b'a'..=b'h')) && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit)
}

fn has_two_squares(bytes: &[u8]) -> bool {
    (0..bytes.len())
        .find(|&i| looks_like_square(bytes, i))
        .is_some_and(|i| (i + 2..bytes.len()).any(|j| looks_like_square(bytes, j)))
}

/// Fields pulled out of loosely written move text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LooseMove {
    piece: Option<PieceKind>,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to: Square,
    promotion: Option<PieceKind>,
}

impl LooseMove {
    fn accepts(&self, m: &Move, clean: &str, candidates: &[Move]) -> bool {
        let piece_ok = self.piece.map_or(true, |p| p == m.kind);
        let promotion_ok = self.promotion.map_or(true, |p| Some(p) == m.promotion);
        match (self.from_file, self.from_rank) {
            // No origin: possibly just a capture written without `x`.
            (None, None) => stripped_san(&san_body(m, candidates)).replacen('x', "", 1) == clean,
            (Some(file), Some(rank)) => {
                piece_ok && promotion_ok && m.from == Square::new(file, rank) && m.to == self.to
            }
            (file, rank) => {
                piece_ok
                    && promotion_ok
                    && m.to == self.to
                    && (file == Some(m.from.file()) || rank == Some(m.from.rank()))
            }
        }
    }
}

fn permissive_match(clean: &str, moves: &[Move]) -> Option<Move> {
    let loose = loose_parse(clean, false).or_else(|| loose_parse(clean, true))?;
    let hint = loose
        .piece
        .map_or_else(|| infer_piece_type(clean), PieceHint::Kind);
    let candidates: Vec<Move> = moves
        .iter()
        .filter(|m| hint.admits(m.kind))
        .copied()
        .collect();
    candidates
        .iter()
        .find(|m| loose.accepts(m, clean, &candidates))
        .copied()
}

/// Finds the leftmost `[piece] origin [x] [-] square [promotion]` in `text`.
///
/// With `partial_origin` the origin may be a file, a rank, both or nothing;
/// otherwise it must be a full square. Optional parts are tried present
/// first, then absent.
fn loose_parse(text: &str, partial_origin: bool) -> Option<LooseMove> {
    let bytes = text.as_bytes();
    (0..=bytes.len()).find_map(|start| loose_parse_at(bytes, start, partial_origin))
}

fn loose_parse_at(bytes: &[u8], start: usize, partial_origin: bool) -> Option<LooseMove> {
    for (piece, pos) in optional(bytes, start, is_piece_letter) {
        let origins: Vec<(Option<u8>, Option<u8>, usize)> = if partial_origin {
            optional(bytes, pos, is_file_letter)
                .flat_map(|(file, after_file)| {
                    optional(bytes, after_file, is_rank_digit)
                        .map(move |(rank, after_rank)| (file, rank, after_rank))
                })
                .collect()
        } else if square_at(bytes, pos).is_some() {
            vec![(Some(bytes[pos]), Some(bytes[pos + 1]), pos + 2)]
        } else {
            Vec::new()
        };

        for (file, rank, pos) in origins {
            for (_, pos) in optional(bytes, pos, |b| b == b'x') {
                for (_, pos) in optional(bytes, pos, |b| b == b'-') {
                    let Some(to) = square_at(bytes, pos) else {
                        continue;
                    };
                    let promotion = bytes
                        .get(pos + 2)
                        .copied()
                        .filter(|&b| is_promotion_letter(b))
                        .and_then(kind_of);
                    return Some(LooseMove {
                        piece: piece.and_then(kind_of),
                        from_file: file.and_then(|b| File::from_char(b as char)),
                        from_rank: rank.and_then(|b| Rank::from_char(b as char)),
                        to,
                        promotion,
                    });
                }
            }
        }
    }
    None
}

/// The two ways an optional single-byte element can match at `pos`,
/// present first.
fn optional(
    bytes: &[u8],
    pos: usize,
    class: fn(u8) -> bool,
) -> impl Iterator<Item = (Option<u8>, usize)> {
    let present = bytes
        .get(pos)
        .copied()
        .filter(|&b| class(b))
        .map(|b| (Some(b), pos + 1));
    present.into_iter().chain(std::iter::once((None, pos)))
}

fn square_at(bytes: &[u8], pos: usize) -> Option<Square> {
    let file = File::from_char(*bytes.get(pos)? as char)?;
    let rank = Rank::from_char(*bytes.get(pos + 1)? as char)?;
    Some(Square::new(file, rank))
}

fn kind_of(b: u8) -> Option<PieceKind> {
    PieceKind::from_char(b as char)
}

fn is_piece_letter(b: u8) -> bool {
    b"pnbrqkPNBRQK".contains(&b)
}

fn is_promotion_letter(b: u8) -> bool {
    b"qrbnQRBN".contains(&b)
}

fn is_file_letter(b: u8) -> bool {
    (b'a'..=b'h').contains(&b)
}

fn is_rank_digit(b: u8) -> bool {
    (b'1'..=b'8').contains(&b)
}
