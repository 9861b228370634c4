//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator and
//! the apply/undo protocol together.

use super::legal_moves;
use crate::Board;

/// Counts the number of leaf nodes at the given depth.
///
/// The board is walked with apply/undo and is left as it was found.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(board);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in &moves {
        board.apply_move(m, None);
        nodes += perft(board, depth - 1);
        board.undo_move();
    }
    nodes
}

/// Perft with divide - node count below each root move, sorted by UCI text.
/// Useful for locating the move whose subtree count is wrong.
pub fn perft_divide(board: &mut Board, depth: u32) -> Vec<(String, u64)> {
    let moves = legal_moves(board);
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        board.apply_move(m, None);
        let nodes = if depth > 1 {
            perft(board, depth - 1)
        } else {
            1
        };
        board.undo_move();
        results.push((m.to_uci(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
