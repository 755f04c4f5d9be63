//! Perft: exhaustive legal-move-tree node counting.
//!
//! The standard correctness oracle for move generation. Node counts at a
//! given depth are compared against published reference values; any
//! disagreement pins a generator bug to a reachable position.

use crate::board::{move_to_string, Board, Move};
use crate::tables::Tables;

/// Number of leaf nodes of the legal move tree rooted at `board`.
///
/// Depth 0 counts the position itself. At depth 1 the move list length is
/// the answer, so the child positions are never materialized.
pub fn perft(board: &Board, depth: u32, t: &Tables) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = board.generate_moves(t);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|&mv| perft(&board.apply_move(mv), depth - 1, t))
        .sum()
}

/// Per-root-move breakdown of the perft count, for bisecting a disagreement
/// against another engine's `divide` output.
pub fn divide(board: &Board, depth: u32, t: &Tables) -> Vec<(Move, u64)> {
    board
        .generate_moves(t)
        .into_iter()
        .map(|mv| {
            let nodes = if depth <= 1 {
                1
            } else {
                perft(&board.apply_move(mv), depth - 1, t)
            };
            (mv, nodes)
        })
        .collect()
}

/// `divide` rendered one `move: count` line at a time, trailing total
/// included, matching the conventional engine output format.
pub fn print_divide(board: &Board, depth: u32, t: &Tables) {
    let breakdown = divide(board, depth, t);
    let mut total = 0u64;
    for (mv, nodes) in &breakdown {
        println!("{}: {}", move_to_string(*mv), nodes);
        total += nodes;
    }
    println!();
    println!("Nodes searched: {total}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::START_FEN;

    #[test]
    fn depth_zero_is_one() {
        let t = Tables::new();
        let board = Board::from_fen(START_FEN).unwrap();
        assert_eq!(perft(&board, 0, &t), 1);
    }

    #[test]
    fn shallow_start_position_counts() {
        let t = Tables::new();
        let board = Board::from_fen(START_FEN).unwrap();
        assert_eq!(perft(&board, 1, &t), 20);
        assert_eq!(perft(&board, 2, &t), 400);
        assert_eq!(perft(&board, 3, &t), 8_902);
    }

    #[test]
    fn divide_sums_to_perft() {
        let t = Tables::new();
        let board = Board::from_fen(START_FEN).unwrap();
        let total: u64 = divide(&board, 3, &t).iter().map(|(_, n)| n).sum();
        assert_eq!(total, perft(&board, 3, &t));
    }
}
