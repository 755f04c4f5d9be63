// Bitmask primitives shared by the attack tables, analyzer and move generator.
//
// Square mapping: A1 = 0, B1 = 1, ..., H8 = 63 (bit i = rank i/8, file i%8).

// File masks (A is column 0, H column 7)
pub const FILE_A: u64 = 0x0101010101010101;
pub const FILE_H: u64 = 0x8080808080808080;

pub const NOT_FILE_A: u64 = !FILE_A;
pub const NOT_FILE_H: u64 = !FILE_H;

// Rank masks (A1 is square 0)
pub const RANK_1: u64 = 0x00000000000000FF;
pub const RANK_2: u64 = 0x000000000000FF00;
pub const RANK_3: u64 = 0x0000000000FF0000;
pub const RANK_4: u64 = 0x00000000FF000000;
pub const RANK_5: u64 = 0x000000FF00000000;
pub const RANK_6: u64 = 0x0000FF0000000000;
pub const RANK_7: u64 = 0x00FF000000000000;
pub const RANK_8: u64 = 0xFF00000000000000;

/// Index of the lowest set bit, or `None` for the empty set.
#[inline]
pub fn lsb(bb: u64) -> Option<usize> {
    if bb == 0 {
        None
    } else {
        Some(bb.trailing_zeros() as usize)
    }
}

/// Pop the lowest set bit and return its index.
#[inline]
pub fn pop_lsb(bb: &mut u64) -> Option<usize> {
    if *bb == 0 {
        return None;
    }
    let idx = bb.trailing_zeros() as usize;
    *bb &= *bb - 1;
    Some(idx)
}

/// The lowest set bit on its own (BLSI).
#[inline]
pub fn isolate_lsb(bb: u64) -> u64 {
    bb & bb.wrapping_neg()
}

/// Iterator over the square indices of a bitmask, lowest first.
pub struct BitIter {
    bb: u64,
}

impl Iterator for BitIter {
    type Item = usize;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        pop_lsb(&mut self.bb)
    }
}

#[inline]
pub fn iter_bits(bb: u64) -> BitIter {
    BitIter { bb }
}
