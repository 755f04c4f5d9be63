//! Check and pin analysis.
//!
//! One pass over the opponent's pieces produces everything the move generator
//! needs to emit only legal moves: how many pieces give check, which squares
//! resolve the check (block or capture), which squares the king may not enter,
//! and which own pieces are pinned on which axis. The result is recomputed per
//! generator invocation and never persisted.

use crate::bits::{iter_bits, NOT_FILE_A, NOT_FILE_H};
use crate::board::{Board, Color, PieceKind};
use crate::tables::Tables;

/// Transient analysis of the side to move's legal-move constraints.
pub struct Analysis {
    pub king_sq: usize,
    pub check_count: u32,
    /// Squares a non-king move must land on: all ones when not in check, the
    /// checker's square for a knight/pawn check, the full attacker-to-king ray
    /// for a slider check.
    pub check_mask: u64,
    /// Slider check rays extended through the king: stepping "back" along the
    /// checking ray is banned even though the mask behind the king is not in
    /// `enemy_seen`.
    pub king_ban: u64,
    /// Every square the opponent attacks, king included. Used for king-move
    /// safety and castling-path validation.
    pub enemy_seen: u64,
    /// Rank/file pin rays through the king (pinned piece squares included).
    pub pin_hv: u64,
    /// Diagonal pin rays through the king.
    pub pin_diag: u64,
    /// Own pawns barred from capturing en passant because both pawns leaving
    /// the king's rank at once would expose it to a rook-type slider.
    pub ep_pin: u64,
    pub own_occ: u64,
    pub enemy_occ: u64,
    pub occ: u64,
}

impl Analysis {
    #[inline]
    pub fn in_check(&self) -> bool {
        self.check_count > 0
    }
}

/// Analyze the position from the perspective of the side to move.
pub fn analyze(board: &Board, t: &Tables) -> Analysis {
    let us = board.us();
    let them = board.them();
    let enemy_color = board.side.opponent();

    let own_occ = us.occupied();
    let enemy_occ = them.occupied();
    let occ = own_occ | enemy_occ;

    let king_bb = us.pieces(PieceKind::King);
    debug_assert_eq!(king_bb.count_ones(), 1);
    let king_sq = king_bb.trailing_zeros() as usize;
    let occ_not_king = occ & !king_bb;

    let mut check_count = 0u32;
    let mut check_mask = 0u64;
    let mut king_ban = 0u64;
    let mut enemy_seen = 0u64;
    let mut pin_hv = 0u64;
    let mut pin_diag = 0u64;
    let mut ep_pin = 0u64;

    // Rook-type rays (rooks and queens).
    let rooks = them.pieces(PieceKind::Rook) | them.pieces(PieceKind::Queen);
    for sq in iter_bits(rooks) {
        let seen = t.sliders.rook_attacks(sq, occ);
        enemy_seen |= seen;

        let ray = t.pin_between[king_sq][sq];
        if seen & king_bb != 0 {
            // Direct check: any blocking/capturing square on the ray resolves
            // it, and the king may not retreat along the ray.
            check_count += 1;
            check_mask |= ray;
            king_ban |= t.ban_ray[king_sq][sq];
        } else if t.rook_rays[sq] & king_bb != 0 {
            let between = (ray ^ (1u64 << sq)) & occ_not_king;
            let all_but_one = between & (between - 1);
            if all_but_one == 0 {
                // A single piece shields the king: pinned to this ray.
                pin_hv |= ray;
            } else if all_but_one & (all_but_one - 1) == 0
                && board.ep.is_some()
                && sq / 8 == king_sq / 8
            {
                // Exactly two blockers on the king's rank with en passant
                // available: if both are the en-passant pair, capturing would
                // remove them simultaneously and expose the king. Flag the
                // own pawn of the pair.
                ep_pin |= between & us.pieces(PieceKind::Pawn);
            }
        }
    }

    // Bishop-type rays (bishops and queens). The two-blocker en-passant case
    // cannot arise on a diagonal: the capture leaves one pawn on the ray.
    let bishops = them.pieces(PieceKind::Bishop) | them.pieces(PieceKind::Queen);
    for sq in iter_bits(bishops) {
        let seen = t.sliders.bishop_attacks(sq, occ);
        enemy_seen |= seen;

        let ray = t.pin_between[king_sq][sq];
        if seen & king_bb != 0 {
            check_count += 1;
            check_mask |= ray;
            king_ban |= t.ban_ray[king_sq][sq];
        } else if t.bishop_rays[sq] & king_bb != 0 {
            let between = (ray ^ (1u64 << sq)) & occ_not_king;
            if between & (between - 1) == 0 {
                pin_diag |= ray;
            }
        }
    }

    for sq in iter_bits(them.pieces(PieceKind::Knight)) {
        let atk = t.knight[sq];
        enemy_seen |= atk;
        if atk & king_bb != 0 {
            check_count += 1;
            check_mask |= 1u64 << sq;
        }
    }

    // Pawns: the whole front is computed with shifts; the checking pawns (at
    // most one in legal play) are found by reversing the pattern from the
    // king's square.
    let pawns = them.pieces(PieceKind::Pawn);
    enemy_seen |= match enemy_color {
        Color::White => ((pawns & NOT_FILE_A) << 7) | ((pawns & NOT_FILE_H) << 9),
        Color::Black => ((pawns & NOT_FILE_A) >> 9) | ((pawns & NOT_FILE_H) >> 7),
    };
    let checking_pawns = t.pawn_attacks[board.side as usize][king_sq] & pawns;
    if checking_pawns != 0 {
        check_count += checking_pawns.count_ones();
        check_mask |= checking_pawns;
    }

    enemy_seen |= t.king[them.king_sq()];

    if check_count == 0 {
        check_mask = !0;
    }

    Analysis {
        king_sq,
        check_count,
        check_mask,
        king_ban,
        enemy_seen,
        pin_hv,
        pin_diag,
        ep_pin,
        own_occ,
        enemy_occ,
        occ,
    }
}
