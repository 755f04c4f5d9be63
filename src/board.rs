//! Position model and move application.
//!
//! Square mapping: A1 = 0, B1 = 1, ..., H8 = 63. A position is an immutable
//! value; applying a move returns a fresh `Board`, so a recursive traversal can
//! keep many positions live on its call stack without aliasing hazards.

use crate::bits::{RANK_1, RANK_8};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    fn from_index(i: u32) -> PieceKind {
        Self::ALL[i as usize]
    }
}

// Castling rights bits: 3 = white kingside, 2 = white queenside,
// 1 = black kingside, 0 = black queenside.
pub const CASTLE_WK: u8 = 0b1000;
pub const CASTLE_WQ: u8 = 0b0100;
pub const CASTLE_BK: u8 = 0b0010;
pub const CASTLE_BQ: u8 = 0b0001;

pub type Move = u32;

// Move encoding: 32-bit layout
// Bits 0-5: from (0-63)
// Bits 6-11: to (0-63)
// Bits 12-15: moving piece (0-5)
// Bits 16-19: promotion piece (0-5, 0xF = none)
// Bits 24-29: flags
pub const FLAG_EN_PASSANT: u32 = 1 << 24;
pub const FLAG_CASTLE_KING: u32 = 1 << 25;
pub const FLAG_CASTLE_QUEEN: u32 = 1 << 26;
pub const FLAG_PROMOTION: u32 = 1 << 27;
pub const FLAG_CAPTURE: u32 = 1 << 28;
pub const FLAG_DOUBLE_PUSH: u32 = 1 << 29;

pub fn new_move(
    from: usize,
    to: usize,
    piece: PieceKind,
    promotion: Option<PieceKind>,
    flags: u32,
) -> Move {
    let prom = promotion.map(|p| p as u32).unwrap_or(0xF);
    (from as u32 & 0x3F)
        | ((to as u32 & 0x3F) << 6)
        | ((piece as u32 & 0xF) << 12)
        | ((prom & 0xF) << 16)
        | flags
}

#[inline]
pub fn move_from_sq(m: Move) -> usize {
    (m & 0x3F) as usize
}

#[inline]
pub fn move_to_sq(m: Move) -> usize {
    ((m >> 6) & 0x3F) as usize
}

#[inline]
pub fn move_piece(m: Move) -> PieceKind {
    PieceKind::from_index((m >> 12) & 0xF)
}

#[inline]
pub fn move_promotion(m: Move) -> Option<PieceKind> {
    let v = (m >> 16) & 0xF;
    if v == 0xF {
        None
    } else {
        Some(PieceKind::from_index(v))
    }
}

#[inline]
pub fn move_flag(m: Move, flag: u32) -> bool {
    (m & flag) != 0
}

/// Render a move as coordinate notation ("e2e4", "e7e8q").
pub fn move_to_string(m: Move) -> String {
    let mut s = format!("{}{}", square_name(move_from_sq(m)), square_name(move_to_sq(m)));
    if let Some(promo) = move_promotion(m) {
        s.push(match promo {
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            _ => 'q',
        });
    }
    s
}

pub fn square_name(sq: usize) -> String {
    let file = (b'a' + (sq % 8) as u8) as char;
    let rank = (b'1' + (sq / 8) as u8) as char;
    format!("{}{}", file, rank)
}

/// One side's pieces: six pairwise-disjoint square sets indexed by
/// [`PieceKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidePieces {
    pub bb: [u64; 6],
}

impl SidePieces {
    pub const EMPTY: SidePieces = SidePieces { bb: [0; 6] };

    #[inline]
    pub fn pieces(&self, kind: PieceKind) -> u64 {
        self.bb[kind as usize]
    }

    #[inline]
    pub fn occupied(&self) -> u64 {
        self.bb.iter().fold(0, |acc, bb| acc | bb)
    }

    #[inline]
    pub fn king_sq(&self) -> usize {
        self.bb[PieceKind::King as usize].trailing_zeros() as usize
    }

    fn kind_at(&self, sq: usize) -> Option<PieceKind> {
        let bit = 1u64 << sq;
        PieceKind::ALL.iter().copied().find(|&k| self.bb[k as usize] & bit != 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    /// Indexed by `Color`: `sides[0]` white, `sides[1]` black.
    pub sides: [SidePieces; 2],
    pub side: Color,
    pub castling: u8,
    /// En-passant target square (the capture destination), set only
    /// immediately after a double pawn push.
    pub ep: Option<u8>,
}

impl Board {
    /// The standard starting position.
    pub fn new() -> Board {
        Board::from_fen(START_FEN).expect("start FEN is well-formed")
    }

    #[inline]
    pub fn us(&self) -> &SidePieces {
        &self.sides[self.side as usize]
    }

    #[inline]
    pub fn them(&self) -> &SidePieces {
        &self.sides[self.side.opponent() as usize]
    }

    #[inline]
    pub fn occupied(&self) -> u64 {
        self.sides[0].occupied() | self.sides[1].occupied()
    }

    pub fn piece_on(&self, sq: usize) -> Option<(PieceKind, Color)> {
        if let Some(kind) = self.sides[0].kind_at(sq) {
            return Some((kind, Color::White));
        }
        self.sides[1].kind_at(sq).map(|kind| (kind, Color::Black))
    }

    /// Apply a legal move, producing the successor position.
    ///
    /// One pass: mover's from/to bits toggled, destination masked out of all
    /// six enemy sets (idempotent when nothing was captured), castling rights
    /// and the en-passant target updated, side to move flipped. The move must
    /// come from [`Board::generate_moves`]; behavior on arbitrary records is
    /// unspecified.
    pub fn apply_move(&self, mv: Move) -> Board {
        let from = move_from_sq(mv);
        let to = move_to_sq(mv);
        let piece = move_piece(mv);
        let us = self.side as usize;
        let them = us ^ 1;
        let from_bit = 1u64 << from;
        let to_bit = 1u64 << to;

        let mut sides = self.sides;

        if let Some(promo) = move_promotion(mv) {
            sides[us].bb[PieceKind::Pawn as usize] ^= from_bit;
            sides[us].bb[promo as usize] ^= to_bit;
        } else {
            sides[us].bb[piece as usize] ^= from_bit | to_bit;
        }

        // Ordinary capture: clear the destination from every enemy set.
        let keep = !to_bit;
        for bb in sides[them].bb.iter_mut() {
            *bb &= keep;
        }

        if move_flag(mv, FLAG_EN_PASSANT) {
            // The captured pawn sits one rank behind the destination.
            let captured_sq = match self.side {
                Color::White => to - 8,
                Color::Black => to + 8,
            };
            sides[them].bb[PieceKind::Pawn as usize] &= !(1u64 << captured_sq);
        }

        if move_flag(mv, FLAG_CASTLE_KING) {
            let (rook_from, rook_to) = match self.side {
                Color::White => (7u64, 5u64),   // h1 -> f1
                Color::Black => (63u64, 61u64), // h8 -> f8
            };
            sides[us].bb[PieceKind::Rook as usize] ^= (1u64 << rook_from) | (1u64 << rook_to);
        } else if move_flag(mv, FLAG_CASTLE_QUEEN) {
            let (rook_from, rook_to) = match self.side {
                Color::White => (0u64, 3u64),   // a1 -> d1
                Color::Black => (56u64, 59u64), // a8 -> d8
            };
            sides[us].bb[PieceKind::Rook as usize] ^= (1u64 << rook_from) | (1u64 << rook_to);
        }

        let mut castling = self.castling;
        castling &= !rights_lost_by_move(self.side, piece, from);
        castling &= !rights_lost_by_capture(to);

        let ep = if move_flag(mv, FLAG_DOUBLE_PUSH) {
            Some(match self.side {
                Color::White => (from + 8) as u8,
                Color::Black => (from - 8) as u8,
            })
        } else {
            None
        };

        let next = Board {
            sides,
            side: self.side.opponent(),
            castling,
            ep,
        };
        next.debug_assert_invariants();
        next
    }

    /// Data-model invariants (one king per side, disjoint piece sets). A
    /// violation is a bug in move generation/application, never a runtime
    /// condition, so this is debug-only.
    #[inline]
    pub fn debug_assert_invariants(&self) {
        #[cfg(debug_assertions)]
        for side in &self.sides {
            debug_assert_eq!(side.bb[PieceKind::King as usize].count_ones(), 1);
            let mut seen = 0u64;
            for bb in &side.bb {
                debug_assert_eq!(seen & bb, 0, "piece sets overlap");
                seen |= bb;
            }
        }
    }

    /// Build a position from a FEN record. The halfmove/fullmove counters are
    /// accepted and ignored: the core keeps no game history.
    pub fn from_fen(fen: &str) -> Result<Board, &'static str> {
        let mut parts = fen.trim().split_whitespace();
        let piece_part = parts.next().ok_or("missing pieces")?;
        let side_part = parts.next().ok_or("missing side")?;
        let castle_part = parts.next().ok_or("missing castling")?;
        let ep_part = parts.next().ok_or("missing en-passant")?;

        let mut sides = [SidePieces::EMPTY; 2];

        let mut rank = 7usize;
        for rank_part in piece_part.split('/') {
            let mut file = 0usize;
            for ch in rank_part.chars() {
                if let Some(d) = ch.to_digit(10) {
                    file += d as usize;
                    continue;
                }
                if file > 7 {
                    return Err("rank overflow");
                }
                let (kind, color) = match ch {
                    'P' => (PieceKind::Pawn, Color::White),
                    'N' => (PieceKind::Knight, Color::White),
                    'B' => (PieceKind::Bishop, Color::White),
                    'R' => (PieceKind::Rook, Color::White),
                    'Q' => (PieceKind::Queen, Color::White),
                    'K' => (PieceKind::King, Color::White),
                    'p' => (PieceKind::Pawn, Color::Black),
                    'n' => (PieceKind::Knight, Color::Black),
                    'b' => (PieceKind::Bishop, Color::Black),
                    'r' => (PieceKind::Rook, Color::Black),
                    'q' => (PieceKind::Queen, Color::Black),
                    'k' => (PieceKind::King, Color::Black),
                    _ => return Err("invalid piece char"),
                };
                sides[color as usize].bb[kind as usize] |= 1u64 << (rank * 8 + file);
                file += 1;
            }
            if rank == 0 {
                break;
            }
            rank -= 1;
        }

        let side = match side_part {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err("invalid side char"),
        };

        let mut castling = 0u8;
        for ch in castle_part.chars() {
            match ch {
                'K' => castling |= CASTLE_WK,
                'Q' => castling |= CASTLE_WQ,
                'k' => castling |= CASTLE_BK,
                'q' => castling |= CASTLE_BQ,
                '-' => {}
                _ => return Err("invalid castle char"),
            }
        }

        let ep = match ep_part {
            "-" => None,
            s => {
                let b = s.as_bytes();
                if b.len() != 2 {
                    return Err("invalid ep square");
                }
                let f_idx = match b[0] {
                    f @ b'a'..=b'h' => (f - b'a') as usize,
                    _ => return Err("invalid ep file"),
                };
                let r_idx = match b[1] {
                    r @ (b'3' | b'6') => (r - b'1') as usize,
                    _ => return Err("invalid ep rank"),
                };
                Some((r_idx * 8 + f_idx) as u8)
            }
        };

        for s in &sides {
            if s.bb[PieceKind::King as usize].count_ones() != 1 {
                return Err("each side needs exactly one king");
            }
        }
        if (sides[0].bb[PieceKind::Pawn as usize] | sides[1].bb[PieceKind::Pawn as usize])
            & (RANK_1 | RANK_8)
            != 0
        {
            return Err("pawn on a back rank");
        }

        Ok(Board { sides, side, castling, ep })
    }

    /// Render the position back to FEN (counters emitted as "0 1").
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_on(rank * 8 + file) {
                    Some((kind, color)) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece_char(kind, color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.side == Color::White { 'w' } else { 'b' });
        fen.push(' ');
        if self.castling == 0 {
            fen.push('-');
        } else {
            for (bit, ch) in [(CASTLE_WK, 'K'), (CASTLE_WQ, 'Q'), (CASTLE_BK, 'k'), (CASTLE_BQ, 'q')] {
                if self.castling & bit != 0 {
                    fen.push(ch);
                }
            }
        }
        fen.push(' ');
        match self.ep {
            Some(sq) => fen.push_str(&square_name(sq as usize)),
            None => fen.push('-'),
        }
        fen.push_str(" 0 1");
        fen
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

fn piece_char(kind: PieceKind, color: Color) -> char {
    let ch = match kind {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };
    if color == Color::White {
        ch.to_ascii_uppercase()
    } else {
        ch
    }
}

// Rights lost because the king or a rook left its home square.
fn rights_lost_by_move(side: Color, piece: PieceKind, from: usize) -> u8 {
    match (side, piece, from) {
        (Color::White, PieceKind::King, 4) => CASTLE_WK | CASTLE_WQ,
        (Color::Black, PieceKind::King, 60) => CASTLE_BK | CASTLE_BQ,
        (Color::White, PieceKind::Rook, 7) => CASTLE_WK,
        (Color::White, PieceKind::Rook, 0) => CASTLE_WQ,
        (Color::Black, PieceKind::Rook, 63) => CASTLE_BK,
        (Color::Black, PieceKind::Rook, 56) => CASTLE_BQ,
        _ => 0,
    }
}

// Rights lost because a rook was captured on its home square. Idempotent:
// if the home square held something else, the right was already gone.
fn rights_lost_by_capture(to: usize) -> u8 {
    match to {
        7 => CASTLE_WK,
        0 => CASTLE_WQ,
        63 => CASTLE_BK,
        56 => CASTLE_BQ,
        _ => 0,
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                match self.piece_on(rank * 8 + file) {
                    Some((kind, color)) => write!(f, "{} ", piece_char(kind, color))?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")?;
        write!(
            f,
            "{} to move, castling: {}",
            if self.side == Color::White { "white" } else { "black" },
            if self.castling == 0 { "-".to_string() } else {
                [(CASTLE_WK, 'K'), (CASTLE_WQ, 'Q'), (CASTLE_BK, 'k'), (CASTLE_BQ, 'q')]
                    .iter()
                    .filter(|(bit, _)| self.castling & bit != 0)
                    .map(|&(_, ch)| ch)
                    .collect::<String>()
            }
        )?;
        if let Some(sq) = self.ep {
            write!(f, ", ep: {}", square_name(sq as usize))?;
        }
        Ok(())
    }
}
