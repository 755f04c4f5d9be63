//! Slider attack resolver.
//!
//! Answers `reachable(square, occupancy)` for rook and bishop rays in O(1):
//! the piece reaches every empty square up to and including the first occupied
//! square in each direction, regardless of the occupant's color (own-piece
//! filtering happens one layer up, in the move generator).
//!
//! The lookup is a magic-bitboard table: the occupancy bits relevant to one
//! square's rays are hashed by a per-square multiply/shift into a dense index
//! whose table slot holds the already-resolved reachable set. The tables are
//! built once at construction and are read-only afterwards.

/// Rook magic numbers - one per square (Chess Programming Wiki / Stockfish)
const ROOK_MAGICS: [u64; 64] = [
    0x0080001020400080, 0x0040001000200040, 0x0080081000200080, 0x0080040800100080,
    0x0080020400080080, 0x0080010200040080, 0x0080008001000200, 0x0080002040800100,
    0x0000800020400080, 0x0000400020005000, 0x0000801000200080, 0x0000800800100080,
    0x0000800400080080, 0x0000800200040080, 0x0000800100020080, 0x0000800040800100,
    0x0000208000400080, 0x0000404000201000, 0x0000808010002000, 0x0000808008001000,
    0x0000808004000800, 0x0000808002000400, 0x0000010100020004, 0x0000020000408104,
    0x0000208080004000, 0x0000200040005000, 0x0000100080200080, 0x0000080080100080,
    0x0000040080080080, 0x0000020080040080, 0x0000010080800200, 0x0000800080004100,
    0x0000204000800080, 0x0000200040401000, 0x0000100080802000, 0x0000080080801000,
    0x0000040080800800, 0x0000020080800400, 0x0000020001010004, 0x0000800040800100,
    0x0000204000808000, 0x0000200040008080, 0x0000100020008080, 0x0000080010008080,
    0x0000040008008080, 0x0000020004008080, 0x0000010002008080, 0x0000004081020004,
    0x0000204000800080, 0x0000200040008080, 0x0000100020008080, 0x0000080010008080,
    0x0000040008008080, 0x0000020004008080, 0x0000800100020080, 0x0000800041000080,
    0x00FFFCDDFCED714A, 0x007FFCDDFCED714A, 0x003FFFCDFFD88096, 0x0000040810002101,
    0x0001000204080011, 0x0001000204000801, 0x0001000082000401, 0x0001FFFAABFAD1A2,
];

/// Bishop magic numbers - one per square
const BISHOP_MAGICS: [u64; 64] = [
    0x0002020202020200, 0x0002020202020000, 0x0004010202000000, 0x0004040080000000,
    0x0001104000000000, 0x0000821040000000, 0x0000410410400000, 0x0000104104104000,
    0x0000040404040400, 0x0000020202020200, 0x0000040102020000, 0x0000040400800000,
    0x0000011040000000, 0x0000008210400000, 0x0000004104104000, 0x0000002082082000,
    0x0004000808080800, 0x0002000404040400, 0x0001000202020200, 0x0000800802004000,
    0x0000800400A00000, 0x0000200100884000, 0x0000400082082000, 0x0000200041041000,
    0x0002080010101000, 0x0001040008080800, 0x0000208004010400, 0x0000404004010200,
    0x0000840000802000, 0x0000404002011000, 0x0000808001041000, 0x0000404000820800,
    0x0001041000202000, 0x0000820800101000, 0x0000104400080800, 0x0000020080080080,
    0x0000404040040100, 0x0000808100020100, 0x0001010100020800, 0x0000808080010400,
    0x0000820820004000, 0x0000410410002000, 0x0000082088001000, 0x0000002011000800,
    0x0000080100400400, 0x0001010101000200, 0x0002020202000400, 0x0001010101000200,
    0x0000410410400000, 0x0000208208200000, 0x0000002084100000, 0x0000000020880000,
    0x0000001002020000, 0x0000040408020000, 0x0004040404040000, 0x0002020202020000,
    0x0000104104104000, 0x0000002082082000, 0x0000000020841000, 0x0000000000208800,
    0x0000000010020200, 0x0000000404080200, 0x0000040404040400, 0x0002020202020200,
];

/// Rook shift amounts (64 - number of relevant occupancy bits)
const ROOK_SHIFTS: [u8; 64] = [
    52, 53, 53, 53, 53, 53, 53, 52,
    53, 54, 54, 54, 54, 54, 54, 53,
    53, 54, 54, 54, 54, 54, 54, 53,
    53, 54, 54, 54, 54, 54, 54, 53,
    53, 54, 54, 54, 54, 54, 54, 53,
    53, 54, 54, 54, 54, 54, 54, 53,
    53, 54, 54, 54, 54, 54, 54, 53,
    52, 53, 53, 53, 53, 53, 53, 52,
];

/// Bishop shift amounts
const BISHOP_SHIFTS: [u8; 64] = [
    58, 59, 59, 59, 59, 59, 59, 58,
    59, 59, 59, 59, 59, 59, 59, 59,
    59, 59, 57, 57, 57, 57, 59, 59,
    59, 59, 57, 55, 55, 57, 59, 59,
    59, 59, 57, 55, 55, 57, 59, 59,
    59, 59, 57, 57, 57, 57, 59, 59,
    59, 59, 59, 59, 59, 59, 59, 59,
    58, 59, 59, 59, 59, 59, 59, 58,
];

// Sum of 2^(64-shift) over all squares.
const ROOK_TABLE_SIZE: usize = 102400;
const BISHOP_TABLE_SIZE: usize = 5248;

#[derive(Clone, Copy)]
struct MagicEntry {
    mask: u64, // relevant occupancy squares (edges excluded)
    magic: u64,
    shift: u8,
    offset: usize, // slice offset into the attack table
}

/// Resolved-ray lookup tables for both slider ray families.
///
/// Built once by [`SliderTables::new`] (normally via `Tables::new`) and never
/// mutated afterwards, so shared references can be read concurrently without
/// locking.
pub struct SliderTables {
    rook_entries: [MagicEntry; 64],
    bishop_entries: [MagicEntry; 64],
    rook_attacks: Vec<u64>,
    bishop_attacks: Vec<u64>,
}

impl SliderTables {
    pub fn new() -> Self {
        let empty = MagicEntry { mask: 0, magic: 0, shift: 0, offset: 0 };
        let mut tables = SliderTables {
            rook_entries: [empty; 64],
            bishop_entries: [empty; 64],
            rook_attacks: vec![0u64; ROOK_TABLE_SIZE],
            bishop_attacks: vec![0u64; BISHOP_TABLE_SIZE],
        };

        let mut rook_offset = 0usize;
        let mut bishop_offset = 0usize;

        for sq in 0..64 {
            let mask = rook_mask(sq);
            let magic = ROOK_MAGICS[sq];
            let shift = ROOK_SHIFTS[sq];
            tables.rook_entries[sq] = MagicEntry { mask, magic, shift, offset: rook_offset };
            for occ in enumerate_subsets(mask) {
                let index = ((occ.wrapping_mul(magic)) >> shift) as usize;
                tables.rook_attacks[rook_offset + index] = rook_attacks_slow(sq, occ);
            }
            rook_offset += 1 << (64 - shift);

            let mask = bishop_mask(sq);
            let magic = BISHOP_MAGICS[sq];
            let shift = BISHOP_SHIFTS[sq];
            tables.bishop_entries[sq] = MagicEntry { mask, magic, shift, offset: bishop_offset };
            for occ in enumerate_subsets(mask) {
                let index = ((occ.wrapping_mul(magic)) >> shift) as usize;
                tables.bishop_attacks[bishop_offset + index] = bishop_attacks_slow(sq, occ);
            }
            bishop_offset += 1 << (64 - shift);
        }

        tables
    }

    /// Rook-ray reachable squares from `sq` given full-board occupancy.
    #[inline]
    pub fn rook_attacks(&self, sq: usize, occ: u64) -> u64 {
        let entry = &self.rook_entries[sq];
        let index = (((occ & entry.mask).wrapping_mul(entry.magic)) >> entry.shift) as usize;
        self.rook_attacks[entry.offset + index]
    }

    /// Bishop-ray reachable squares from `sq` given full-board occupancy.
    #[inline]
    pub fn bishop_attacks(&self, sq: usize, occ: u64) -> u64 {
        let entry = &self.bishop_entries[sq];
        let index = (((occ & entry.mask).wrapping_mul(entry.magic)) >> entry.shift) as usize;
        self.bishop_attacks[entry.offset + index]
    }

    /// Queen = rook + bishop rays.
    #[inline]
    pub fn queen_attacks(&self, sq: usize, occ: u64) -> u64 {
        self.rook_attacks(sq, occ) | self.bishop_attacks(sq, occ)
    }
}

impl Default for SliderTables {
    fn default() -> Self {
        Self::new()
    }
}

// Relevant-blocker mask for a rook on sq: interior squares of its rays.
// Edge squares never change the reachable set and are excluded to keep the
// dense index small.
fn rook_mask(sq: usize) -> u64 {
    let mut mask = 0u64;
    let rank = sq / 8;
    let file = sq % 8;

    for r in (rank + 1)..7 {
        mask |= 1u64 << (r * 8 + file);
    }
    for r in 1..rank {
        mask |= 1u64 << (r * 8 + file);
    }
    for f in (file + 1)..7 {
        mask |= 1u64 << (rank * 8 + f);
    }
    for f in 1..file {
        mask |= 1u64 << (rank * 8 + f);
    }

    mask
}

fn bishop_mask(sq: usize) -> u64 {
    let mut mask = 0u64;
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;

    for (dr, df) in [(1i8, 1i8), (1, -1), (-1, 1), (-1, -1)] {
        let (mut r, mut f) = (rank + dr, file + df);
        while (1..7).contains(&r) && (1..7).contains(&f) {
            mask |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }

    mask
}

/// Walk the rays square by square; only used while filling the tables.
pub(crate) fn rook_attacks_slow(sq: usize, occ: u64) -> u64 {
    slide(sq, occ, &[(1, 0), (-1, 0), (0, 1), (0, -1)])
}

pub(crate) fn bishop_attacks_slow(sq: usize, occ: u64) -> u64 {
    slide(sq, occ, &[(1, 1), (1, -1), (-1, 1), (-1, -1)])
}

fn slide(sq: usize, occ: u64, directions: &[(i8, i8)]) -> u64 {
    let mut attacks = 0u64;
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;

    for &(dr, df) in directions {
        let (mut r, mut f) = (rank + dr, file + df);
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = 1u64 << (r * 8 + f);
            attacks |= bit;
            if occ & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }

    attacks
}

// Carry-rippler enumeration of all blocker subsets of a mask.
fn enumerate_subsets(mask: u64) -> Vec<u64> {
    let mut subsets = Vec::new();
    let mut subset = 0u64;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}
