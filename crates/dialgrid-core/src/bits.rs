//! Packed bit table: one bit per cell, rows of whole 64-bit words.
//!
//! The table keeps one slack word after the last row so that any 64-bit
//! window starting inside the table can be read with at most two loads.

/// Bits per storage word.
pub const WORD_BITS: usize = 64;

/// Row-major bit table with rows rounded up to whole words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitTable {
    words: Vec<u64>,
    width: usize,
    height: usize,
    row_words: usize,
}

impl BitTable {
    /// Create an all-zero table of `width` × `height` bits.
    pub fn new(width: usize, height: usize) -> Self {
        let row_words = width.div_ceil(WORD_BITS).max(1);
        Self {
            words: vec![0; row_words * height + 1],
            width,
            height,
            row_words,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bits per row, including the rounding to whole words.
    #[inline]
    pub fn row_bits(&self) -> usize {
        self.row_words * WORD_BITS
    }

    /// Linear bit index of `(x, y)`.
    #[inline]
    pub fn bit_index(&self, x: usize, y: usize) -> usize {
        y * self.row_bits() + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.get_bit(self.bit_index(x, y))
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        let bit = self.bit_index(x, y);
        let mask = 1u64 << (bit % WORD_BITS);
        let word = &mut self.words[bit / WORD_BITS];
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    #[inline]
    pub fn get_bit(&self, bit: usize) -> bool {
        (self.words[bit / WORD_BITS] >> (bit % WORD_BITS)) & 1 == 1
    }

    /// 64 bits starting at `bit`: result bit `i` is table bit `bit + i`.
    /// Bits past the end of the table read as 0.
    #[inline]
    pub fn window(&self, bit: usize) -> u64 {
        let w = bit / WORD_BITS;
        let s = bit % WORD_BITS;
        let lo = self.words.get(w).copied().unwrap_or(0);
        if s == 0 {
            return lo;
        }
        let hi = self.words.get(w + 1).copied().unwrap_or(0);
        (lo >> s) | (hi << (WORD_BITS - s))
    }

    /// 64 bits ending at `bit`, reversed: result bit `i` is table bit
    /// `bit - i`. Bits before the start of the table read as 0.
    #[inline]
    pub fn window_rev(&self, bit: usize) -> u64 {
        if bit >= WORD_BITS - 1 {
            self.window(bit + 1 - WORD_BITS).reverse_bits()
        } else {
            let shift = WORD_BITS - 1 - bit;
            (self.words[0] << shift).reverse_bits()
        }
    }

    /// The 3×3 block whose top-left bit is `top_left`, packed as bit
    /// `row * 3 + col`.
    #[inline]
    pub fn region3x3(&self, top_left: usize) -> u16 {
        let stride = self.row_bits();
        let mut region = 0u16;
        for row in 0..3 {
            let bits = (self.window(top_left + row * stride) & 0b111) as u16;
            region |= bits << (row * 3);
        }
        region
    }

    /// Copy with rows and columns swapped.
    pub fn transposed(&self) -> Self {
        let mut t = Self::new(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    t.set(y, x, true);
                }
            }
        }
        t
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_round_up_to_words() {
        let t = BitTable::new(70, 3);
        assert_eq!(t.row_bits(), 128);
        assert_eq!(t.bit_index(5, 2), 261);
        assert_eq!(BitTable::new(1, 1).row_bits(), 64);
    }

    #[test]
    fn set_and_get() {
        let mut t = BitTable::new(130, 4);
        t.set(129, 3, true);
        t.set(0, 0, true);
        assert!(t.get(129, 3));
        assert!(t.get(0, 0));
        assert!(!t.get(128, 3));
        t.set(0, 0, false);
        assert!(!t.get(0, 0));
        assert_eq!(t.count_ones(), 1);
    }

    #[test]
    fn window_crosses_word_boundary() {
        let mut t = BitTable::new(128, 1);
        t.set(62, 0, true);
        t.set(65, 0, true);
        let w = t.window(60);
        assert_eq!(w & 0b111111, 0b100100);
        assert_eq!(t.window(64), 0b10);
    }

    #[test]
    fn window_rev_reads_leftwards() {
        let mut t = BitTable::new(128, 1);
        t.set(10, 0, true);
        t.set(100, 0, true);
        assert_eq!(t.window_rev(10) & 1, 1);
        assert_eq!(t.window_rev(12) & 0b111, 0b100);
        assert_eq!(t.window_rev(100).trailing_zeros(), 0);
        assert_eq!(t.window_rev(70).trailing_zeros(), 60);
        assert_eq!(t.window_rev(99), 0);
    }

    #[test]
    fn region_packs_rows() {
        let mut t = BitTable::new(8, 4);
        t.set(1, 1, true);
        t.set(3, 1, true);
        t.set(2, 3, true);
        // Top-left at (1, 1): row 0 = 1,0,1 / row 1 = 0,0,0 / row 2 = 0,1,0.
        let r = t.region3x3(t.bit_index(1, 1));
        assert_eq!(r, 0b010_000_101);
    }

    #[test]
    fn transpose_swaps_axes() {
        let mut t = BitTable::new(5, 3);
        t.set(4, 1, true);
        let tt = t.transposed();
        assert_eq!(tt.width(), 3);
        assert_eq!(tt.height(), 5);
        assert!(tt.get(1, 4));
        assert_eq!(tt.count_ones(), 1);
    }
}
