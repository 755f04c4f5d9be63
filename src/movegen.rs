//! Legal move generation.
//!
//! Legality is derived analytically from the [`Analysis`] masks — there is no
//! generate-pseudo-legal-then-test pass. Every piece type follows the same
//! shape: raw reach, minus own pieces, intersected with the check-resolution
//! mask, and restricted to the line through the king when the piece is pinned.

use crate::analysis::{analyze, Analysis};
use crate::bits::{iter_bits, RANK_2, RANK_7};
use crate::board::{
    new_move, Board, Color, Move, PieceKind, CASTLE_BK, CASTLE_BQ, CASTLE_WK,
    CASTLE_WQ, FLAG_CAPTURE, FLAG_CASTLE_KING, FLAG_CASTLE_QUEEN, FLAG_DOUBLE_PUSH,
    FLAG_EN_PASSANT, FLAG_PROMOTION,
};
use crate::tables::Tables;

/// Terminal state of a position, represented as data rather than a panic.
/// Traversal drivers must stop on anything other than `Ongoing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate,
    Stalemate,
}

const PROMOTIONS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

// Castling path masks: squares that must be empty, and squares the king
// passes through (destination included) that must not be attacked.
const WK_PATH: u64 = 0x0000000000000060; // f1, g1
const WQ_OCC: u64 = 0x000000000000000E; // b1, c1, d1
const WQ_PATH: u64 = 0x000000000000000C; // c1, d1
const BK_PATH: u64 = WK_PATH << 56;
const BQ_OCC: u64 = WQ_OCC << 56;
const BQ_PATH: u64 = WQ_PATH << 56;

impl Board {
    /// All legal moves in this position.
    pub fn generate_moves(&self, t: &Tables) -> Vec<Move> {
        let analysis = analyze(self, t);
        self.moves_from_analysis(&analysis, t)
    }

    /// All legal successor positions (the eager enumeration API). An empty
    /// result means the position is terminal; see [`Board::status`].
    pub fn successors(&self, t: &Tables) -> Vec<Board> {
        self.generate_moves(t)
            .into_iter()
            .map(|mv| self.apply_move(mv))
            .collect()
    }

    /// Whether the side to move is in check.
    pub fn in_check(&self, t: &Tables) -> bool {
        analyze(self, t).in_check()
    }

    /// Checkmate/stalemate detection: terminal iff no legal move exists.
    pub fn status(&self, t: &Tables) -> GameStatus {
        let analysis = analyze(self, t);
        if !self.moves_from_analysis(&analysis, t).is_empty() {
            GameStatus::Ongoing
        } else if analysis.in_check() {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        }
    }

    fn moves_from_analysis(&self, a: &Analysis, t: &Tables) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);
        let us = self.us();
        let own = a.own_occ;
        let enemy = a.enemy_occ;

        // King moves first: they are the only option in double check.
        let king_targets = t.king[a.king_sq] & !own & !(a.enemy_seen | a.king_ban);
        for to in iter_bits(king_targets) {
            let flags = if enemy & (1u64 << to) != 0 { FLAG_CAPTURE } else { 0 };
            moves.push(new_move(a.king_sq, to, PieceKind::King, None, flags));
        }
        if a.check_count >= 2 {
            return moves;
        }

        let pinned = a.pin_hv | a.pin_diag;

        // A pinned knight never has a legal destination: its pattern leaves
        // the pin line immediately.
        for from in iter_bits(us.pieces(PieceKind::Knight) & !pinned) {
            let targets = t.knight[from] & !own & a.check_mask;
            push_each(&mut moves, from, targets, PieceKind::Knight, enemy);
        }

        for from in iter_bits(us.pieces(PieceKind::Bishop)) {
            let targets = t.sliders.bishop_attacks(from, a.occ)
                & !own
                & a.check_mask
                & pin_limit(a, t, from);
            push_each(&mut moves, from, targets, PieceKind::Bishop, enemy);
        }

        for from in iter_bits(us.pieces(PieceKind::Rook)) {
            let targets = t.sliders.rook_attacks(from, a.occ)
                & !own
                & a.check_mask
                & pin_limit(a, t, from);
            push_each(&mut moves, from, targets, PieceKind::Rook, enemy);
        }

        for from in iter_bits(us.pieces(PieceKind::Queen)) {
            let targets = t.sliders.queen_attacks(from, a.occ)
                & !own
                & a.check_mask
                & pin_limit(a, t, from);
            push_each(&mut moves, from, targets, PieceKind::Queen, enemy);
        }

        self.pawn_moves(&mut moves, a, t);
        self.castling_moves(&mut moves, a);

        moves
    }

    fn pawn_moves(&self, moves: &mut Vec<Move>, a: &Analysis, t: &Tables) {
        let us = self.us();
        let white = self.side == Color::White;
        let start_rank = if white { RANK_2 } else { RANK_7 };

        for from in iter_bits(us.pieces(PieceKind::Pawn)) {
            let from_bit = 1u64 << from;
            let limit = pin_limit(a, t, from);

            // Single and double advance.
            let to1 = if white { from + 8 } else { from - 8 };
            if a.occ & (1u64 << to1) == 0 {
                if (1u64 << to1) & a.check_mask & limit != 0 {
                    if to1 / 8 == 0 || to1 / 8 == 7 {
                        for promo in PROMOTIONS {
                            moves.push(new_move(from, to1, PieceKind::Pawn, Some(promo), FLAG_PROMOTION));
                        }
                    } else {
                        moves.push(new_move(from, to1, PieceKind::Pawn, None, 0));
                    }
                }
                if from_bit & start_rank != 0 {
                    let to2 = if white { from + 16 } else { from - 16 };
                    if a.occ & (1u64 << to2) == 0 && (1u64 << to2) & a.check_mask & limit != 0 {
                        moves.push(new_move(from, to2, PieceKind::Pawn, None, FLAG_DOUBLE_PUSH));
                    }
                }
            }

            // Diagonal captures.
            let captures =
                t.pawn_attacks[self.side as usize][from] & a.enemy_occ & a.check_mask & limit;
            for to in iter_bits(captures) {
                if to / 8 == 0 || to / 8 == 7 {
                    for promo in PROMOTIONS {
                        moves.push(new_move(
                            from,
                            to,
                            PieceKind::Pawn,
                            Some(promo),
                            FLAG_PROMOTION | FLAG_CAPTURE,
                        ));
                    }
                } else {
                    moves.push(new_move(from, to, PieceKind::Pawn, None, FLAG_CAPTURE));
                }
            }
        }

        // En passant. The destination is the target square behind the pushed
        // pawn; the captured pawn itself sits on the capturer's rank.
        if let Some(ep) = self.ep {
            let ep_sq = ep as usize;
            let ep_bit = 1u64 << ep_sq;
            let captured_bit = if white { ep_bit >> 8 } else { ep_bit << 8 };

            // The captured pawn can itself be the sole diagonal shield of our
            // king (the analyzer pins single blockers of either color).
            // Removing it exposes the king, and the destination square is one
            // rank off the diagonal, so it never re-blocks: no candidate can
            // make this capture legal.
            let captured_shields_king = captured_bit & a.pin_diag != 0;

            // While in check the capture must block on the target square or
            // take the checking pawn itself.
            if !captured_shields_king && a.check_mask & (ep_bit | captured_bit) != 0 {
                let candidates = t.pawn_attacks[self.side.opponent() as usize][ep_sq]
                    & us.pieces(PieceKind::Pawn)
                    & !a.ep_pin   // the same-rank discovered-check pair
                    & !a.pin_hv;  // an orthogonally pinned pawn leaves its line
                for from in iter_bits(candidates) {
                    // A diagonally pinned pawn may still capture along its
                    // own pin line.
                    if (1u64 << from) & a.pin_diag != 0
                        && ep_bit & t.line_through[a.king_sq][from] == 0
                    {
                        continue;
                    }
                    moves.push(new_move(
                        from,
                        ep_sq,
                        PieceKind::Pawn,
                        None,
                        FLAG_EN_PASSANT | FLAG_CAPTURE,
                    ));
                }
            }
        }
    }

    fn castling_moves(&self, moves: &mut Vec<Move>, a: &Analysis) {
        if a.check_count != 0 {
            return;
        }
        let blocked = |mask: u64| a.occ & mask != 0 || a.enemy_seen & mask != 0;
        match self.side {
            Color::White => {
                if self.castling & CASTLE_WK != 0 && !blocked(WK_PATH) {
                    moves.push(new_move(4, 6, PieceKind::King, None, FLAG_CASTLE_KING));
                }
                if self.castling & CASTLE_WQ != 0
                    && a.occ & WQ_OCC == 0
                    && a.enemy_seen & WQ_PATH == 0
                {
                    moves.push(new_move(4, 2, PieceKind::King, None, FLAG_CASTLE_QUEEN));
                }
            }
            Color::Black => {
                if self.castling & CASTLE_BK != 0 && !blocked(BK_PATH) {
                    moves.push(new_move(60, 62, PieceKind::King, None, FLAG_CASTLE_KING));
                }
                if self.castling & CASTLE_BQ != 0
                    && a.occ & BQ_OCC == 0
                    && a.enemy_seen & BQ_PATH == 0
                {
                    moves.push(new_move(60, 58, PieceKind::King, None, FLAG_CASTLE_QUEEN));
                }
            }
        }
    }
}

// Restriction for a pinned piece: it may only move on the full line through
// itself and its king. The pin masks alone are not a safe filter because two
// rays of the same axis both pass the test.
#[inline]
fn pin_limit(a: &Analysis, t: &Tables, from: usize) -> u64 {
    if (1u64 << from) & (a.pin_hv | a.pin_diag) != 0 {
        t.line_through[a.king_sq][from]
    } else {
        !0
    }
}

fn push_each(moves: &mut Vec<Move>, from: usize, targets: u64, piece: PieceKind, enemy: u64) {
    for to in iter_bits(targets) {
        let flags = if enemy & (1u64 << to) != 0 { FLAG_CAPTURE } else { 0 };
        moves.push(new_move(from, to, piece, None, flags));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::move_to_string;

    fn moves_of(fen: &str) -> Vec<String> {
        let t = Tables::new();
        let board = Board::from_fen(fen).unwrap();
        let mut names: Vec<String> = board
            .generate_moves(&t)
            .into_iter()
            .map(move_to_string)
            .collect();
        names.sort();
        names
    }

    #[test]
    fn start_position_has_twenty_moves() {
        let names = moves_of("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(names.len(), 20);
        assert!(names.contains(&"e2e4".to_string()));
        assert!(names.contains(&"g1f3".to_string()));
    }

    #[test]
    fn double_check_restricts_to_king_moves() {
        // Rook e8 and knight f3 both check e1.
        let t = Tables::new();
        let board = Board::from_fen("4r2k/8/8/8/8/5n2/8/4K3 w - - 0 1").unwrap();
        let moves = board.generate_moves(&t);
        assert!(!moves.is_empty());
        for mv in moves {
            assert_eq!(crate::board::move_piece(mv), PieceKind::King);
        }
    }

    #[test]
    fn king_cannot_retreat_along_the_checking_ray() {
        // Rook h1 checks along the first rank: d1 looks safe to a plain
        // attack map but stays on the ray.
        let names = moves_of("4k3/8/8/8/8/8/8/4K2r w - - 0 1");
        assert!(!names.contains(&"e1d1".to_string()));
        assert!(names.contains(&"e1d2".to_string()));
        assert!(names.contains(&"e1e2".to_string()));
    }

    #[test]
    fn pinned_knight_has_no_moves() {
        let names = moves_of("4r2k/8/8/8/8/4N3/8/4K3 w - - 0 1");
        assert!(names.iter().all(|m| !m.starts_with("e3")));
    }

    #[test]
    fn pinned_rook_moves_only_on_the_pin_line() {
        // Rook e4 pinned by rook e8.
        let names = moves_of("4r2k/8/8/8/4R3/8/8/4K3 w - - 0 1");
        let rook_moves: Vec<&String> = names.iter().filter(|m| m.starts_with("e4")).collect();
        let expected = ["e4e2", "e4e3", "e4e5", "e4e6", "e4e7", "e4e8"];
        assert_eq!(rook_moves.len(), expected.len());
        for mv in expected {
            assert!(names.contains(&mv.to_string()), "missing {mv}");
        }
    }

    #[test]
    fn file_pinned_queen_cannot_slip_to_another_pin_ray() {
        // Queen e4 is pinned on the e-file; d1 is a square of the a1 rook's
        // pin ray through the d1 rook. The union of pin masks would wrongly
        // allow a diagonal slide onto that ray.
        let names = moves_of("4r2k/8/8/8/4Q3/8/8/r2RK3 w - - 0 1");
        assert!(names.contains(&"e4e5".to_string()));
        assert!(!names.contains(&"e4b1".to_string()));
        assert!(!names.contains(&"e4c2".to_string()));
    }

    #[test]
    fn promotion_always_yields_four_moves() {
        let names = moves_of("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let promos: Vec<&String> = names.iter().filter(|m| m.starts_with("a7a8")).collect();
        assert_eq!(promos.len(), 4);
        for suffix in ['q', 'r', 'b', 'n'] {
            assert!(names.contains(&format!("a7a8{suffix}")));
        }
    }

    #[test]
    fn en_passant_discovered_check_is_forbidden() {
        // King e5 and rook h5 with the f5/g5 pawn pair: f5xg6 would remove
        // both pawns from the rank at once.
        let names = moves_of("4k3/8/8/4KPpr/8/8/8/8 w - g6 0 1");
        assert!(!names.contains(&"f5g6".to_string()));
        // The pawn's ordinary advance stays legal.
        assert!(names.contains(&"f5f6".to_string()));
    }

    #[test]
    fn en_passant_can_capture_the_checking_pawn() {
        // Black just played d7d5 with check; exd6 removes the checker.
        let names = moves_of("7k/8/8/3pP3/2K5/8/8/8 w - d6 0 1");
        assert!(names.contains(&"e5d6".to_string()));
    }

    #[test]
    fn castling_requires_rights_empty_path_and_safe_squares() {
        let both = moves_of("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_eq!(both.iter().filter(|m| *m == "e1g1").count(), 1);
        assert_eq!(both.iter().filter(|m| *m == "e1c1").count(), 1);

        // Rights removed.
        let no_right = moves_of("r3k2r/8/8/8/8/8/8/R3K2R w Kkq - 0 1");
        assert!(no_right.contains(&"e1g1".to_string()));
        assert!(!no_right.contains(&"e1c1".to_string()));

        // Intervening piece on b1 blocks only the queenside.
        let occupied = moves_of("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1");
        assert!(occupied.contains(&"e1g1".to_string()));
        assert!(!occupied.contains(&"e1c1".to_string()));

        // A rook eyeing f1 forbids kingside castling only.
        let attacked = moves_of("r3k2r/8/8/8/8/5r2/8/R3K2R w KQkq - 0 1");
        assert!(!attacked.contains(&"e1g1".to_string()));
        assert!(attacked.contains(&"e1c1".to_string()));
    }

    #[test]
    fn no_castling_while_in_check() {
        let names = moves_of("r3k2r/8/8/8/8/4r3/8/R3K2R w KQkq - 0 1");
        assert!(!names.contains(&"e1g1".to_string()));
        assert!(!names.contains(&"e1c1".to_string()));
    }

    #[test]
    fn status_detects_mate_and_stalemate() {
        let t = Tables::new();
        // Back-rank mate: the pawn shield leaves no escape square.
        let mate = Board::from_fen("R5k1/5ppp/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(mate.status(&t), GameStatus::Checkmate);
        // Same rook check with f7 open is only a check.
        let ongoing = Board::from_fen("R5k1/6pp/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(ongoing.status(&t), GameStatus::Ongoing);
        // Cornered king, nothing to move, no check.
        let stale = Board::from_fen("k7/2Q5/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(stale.status(&t), GameStatus::Stalemate);
    }

    #[test]
    fn generated_moves_never_leave_the_mover_in_check() {
        let t = Tables::new();
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        ];
        for fen in fens {
            let board = Board::from_fen(fen).unwrap();
            for mv in board.generate_moves(&t) {
                let next = board.apply_move(mv);
                // The mover is now "them" from the new position's viewpoint:
                // flip back and verify the old side is not in check.
                let flipped = Board { side: next.side.opponent(), ..next };
                assert!(
                    !flipped.in_check(&t),
                    "{} leaves the king hanging in {fen}",
                    move_to_string(mv)
                );
            }
        }
    }
}
