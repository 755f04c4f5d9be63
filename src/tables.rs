//! Precomputed attack and ray tables.
//!
//! Everything the analyzer and move generator look up at query time lives in
//! one owned [`Tables`] value: build it once at process start with
//! [`Tables::new`] and pass it by reference to every call. There is no global
//! state; concurrent reads are safe because nothing is mutated after
//! construction.

use crate::magic::{bishop_attacks_slow, rook_attacks_slow, SliderTables};

/// All precomputed lookup data, read-only after construction.
pub struct Tables {
    /// Knight reach per origin square, occupancy-independent.
    pub knight: [u64; 64],
    /// King reach per origin square.
    pub king: [u64; 64],
    /// Pawn capture patterns, indexed `[color][square]` (0 = white).
    pub pawn_attacks: [[u64; 64]; 2],
    /// Rook reach on an empty board (the unresolved geometric ray).
    pub rook_rays: [u64; 64],
    /// Bishop reach on an empty board.
    pub bishop_rays: [u64; 64],
    /// `pin_between[k][a]`: squares strictly between `k` and `a` plus `a`
    /// itself, when the two share a rank, file or diagonal; 0 otherwise.
    /// Serves as the pin ray and as the check-resolution ray.
    pub pin_between: Box<[[u64; 64]; 64]>,
    /// `ban_ray[k][a]`: the ray from `a` through `k`, extended to the board
    /// edge beyond `k` and excluding `a` itself; 0 when not aligned. Forbids
    /// the king from stepping along the ray that checks it while still
    /// allowing the checker to be captured.
    pub ban_ray: Box<[[u64; 64]; 64]>,
    /// `line_through[a][b]`: the full rank/file/diagonal through both squares,
    /// extended to both edges and including both; 0 when not aligned. A pinned
    /// piece may only move within the line through it and its king — the pin
    /// masks alone are not enough, since two pin rays of the same axis can
    /// intersect a third piece's movement.
    pub line_through: Box<[[u64; 64]; 64]>,
    /// Resolved slider lookups (magic bitboards).
    pub sliders: SliderTables,
}

impl Tables {
    pub fn new() -> Self {
        let mut knight = [0u64; 64];
        let mut king = [0u64; 64];
        let mut pawn_attacks = [[0u64; 64]; 2];
        let mut rook_rays = [0u64; 64];
        let mut bishop_rays = [0u64; 64];

        const KNIGHT_OFFSETS: [(i8, i8); 8] = [
            (-2, -1), (-2, 1), (-1, -2), (-1, 2),
            (1, -2), (1, 2), (2, -1), (2, 1),
        ];
        const KING_OFFSETS: [(i8, i8); 8] = [
            (-1, -1), (-1, 0), (-1, 1), (0, -1),
            (0, 1), (1, -1), (1, 0), (1, 1),
        ];

        for sq in 0..64 {
            knight[sq] = offsets_mask(sq, &KNIGHT_OFFSETS);
            king[sq] = offsets_mask(sq, &KING_OFFSETS);
            pawn_attacks[0][sq] = offsets_mask(sq, &[(1, -1), (1, 1)]);
            pawn_attacks[1][sq] = offsets_mask(sq, &[(-1, -1), (-1, 1)]);
            rook_rays[sq] = rook_attacks_slow(sq, 0);
            bishop_rays[sq] = bishop_attacks_slow(sq, 0);
        }

        let mut pin_between = Box::new([[0u64; 64]; 64]);
        let mut ban_ray = Box::new([[0u64; 64]; 64]);
        let mut line_through = Box::new([[0u64; 64]; 64]);

        for k in 0..64 {
            for a in 0..64 {
                if let Some(dir) = direction(a, k) {
                    // From k toward a, stopping at a inclusive.
                    pin_between[k][a] = walk(k, negate(dir), Some(a));
                    // From a through k to the edge, a itself excluded.
                    ban_ray[k][a] = walk(a, dir, None);
                    line_through[k][a] =
                        walk(k, dir, None) | walk(k, negate(dir), None) | (1u64 << k);
                }
            }
        }

        Tables {
            knight,
            king,
            pawn_attacks,
            rook_rays,
            bishop_rays,
            pin_between,
            ban_ray,
            line_through,
            sliders: SliderTables::new(),
        }
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::new()
    }
}

fn offsets_mask(sq: usize, offsets: &[(i8, i8)]) -> u64 {
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;
    let mut mask = 0u64;
    for &(dr, df) in offsets {
        let (r, f) = (rank + dr, file + df);
        if (0..8).contains(&r) && (0..8).contains(&f) {
            mask |= 1u64 << (r * 8 + f);
        }
    }
    mask
}

// Unit step from `from` to `to` when the squares share a rank, file or
// diagonal; None otherwise (or when equal).
fn direction(from: usize, to: usize) -> Option<(i8, i8)> {
    let dr = (to as i8 / 8) - (from as i8 / 8);
    let df = (to as i8 % 8) - (from as i8 % 8);
    if dr == 0 && df == 0 {
        return None;
    }
    if dr == 0 || df == 0 || dr.abs() == df.abs() {
        Some((dr.signum(), df.signum()))
    } else {
        None
    }
}

fn negate((dr, df): (i8, i8)) -> (i8, i8) {
    (-dr, -df)
}

// Squares along `dir` starting one step after `start`, up to `stop`
// (inclusive) or the board edge.
fn walk(start: usize, dir: (i8, i8), stop: Option<usize>) -> u64 {
    let (dr, df) = dir;
    let mut r = (start / 8) as i8 + dr;
    let mut f = (start % 8) as i8 + df;
    let mut mask = 0u64;
    while (0..8).contains(&r) && (0..8).contains(&f) {
        let sq = (r * 8 + f) as usize;
        mask |= 1u64 << sq;
        if stop == Some(sq) {
            break;
        }
        r += dr;
        f += df;
    }
    mask
}
