//! Packed boolean vector over 32-bit words.

use crate::buffer::DynamicArray;

const WORD_BITS: u32 = 32;

fn word_of(index: u32) -> usize {
    (index / WORD_BITS) as usize
}

fn bit_of(index: u32) -> u32 {
    index % WORD_BITS
}

fn words_for(n: u32) -> u32 {
    ((u64::from(n) + u64::from(WORD_BITS) - 1) / u64::from(WORD_BITS)) as u32
}

/// Mask selecting the valid bits of the final word of a length-`n` array.
///
/// Only meaningful for `n > 0`.
fn final_word_mask(n: u32) -> u32 {
    let rem = n % WORD_BITS;
    if rem == 0 {
        !0u32
    } else {
        (1u32 << rem) - 1
    }
}

/// Packed bitset with range boolean algebra.
///
/// Length is tracked in bits; storage is a [`DynamicArray`] of 32-bit
/// words. Padding bits beyond the logical length carry no meaning and may
/// hold garbage; every whole-array read masks them.
#[derive(Debug, Clone, Default)]
pub struct BitArray {
    data: DynamicArray<u32>,
    size: u32,
}

impl BitArray {
    /// Creates an empty bit array.
    pub fn new() -> Self {
        Self {
            data: DynamicArray::new(),
            size: 0,
        }
    }

    /// Creates a length-`n` array with every bit false.
    pub fn with_len(n: u32) -> Self {
        Self {
            data: DynamicArray::with_len(words_for(n)),
            size: n,
        }
    }

    /// Creates a length-`n` array uniformly filled with `value`.
    pub fn filled(n: u32, value: bool) -> Self {
        let mut arr = Self::with_len(n);
        arr.fill(value);
        arr
    }

    /// Logical length in bits.
    pub fn len(&self) -> u32 {
        self.size
    }

    /// `true` when the logical length is zero.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn live_words(&self) -> usize {
        words_for(self.size) as usize
    }

    /// Appends one bit, allocating a new word only on a 32-bit boundary.
    pub fn push(&mut self, value: bool) {
        if bit_of(self.size) == 0 {
            self.data.push(0);
        }
        let index = self.size;
        self.size += 1;
        self.unchecked_place(value, index);
    }

    /// Writes `value` at `index`.
    ///
    /// Panics when `index` is at or beyond the logical length.
    pub fn place(&mut self, value: bool, index: u32) {
        assert!(
            index < self.size,
            "bit index {} exceeds length {}",
            index,
            self.size
        );
        self.unchecked_place(value, index);
    }

    /// `place` without the length check.
    pub fn unchecked_place(&mut self, value: bool, index: u32) {
        let word = word_of(index);
        let bit = bit_of(index);
        let words = self.data.as_mut_slice();
        if value {
            words[word] |= 1u32 << bit;
        } else {
            words[word] &= !(1u32 << bit);
        }
    }

    /// Reads the bit at `index`.
    pub fn at(&self, index: u32) -> bool {
        (self.data.at(word_of(index) as u32) >> bit_of(index)) & 1 == 1
    }

    /// Sets every backing word uniformly.
    ///
    /// Padding bits of the final word are filled too; readers mask them.
    pub fn fill(&mut self, value: bool) {
        let word = if value { !0u32 } else { 0u32 };
        let live = self.live_words();
        for w in &mut self.data.as_mut_slice()[..live] {
            *w = word;
        }
    }

    /// Inverts every live word.
    pub fn flip(&mut self) {
        let live = self.live_words();
        for w in &mut self.data.as_mut_slice()[..live] {
            *w = !*w;
        }
    }

    /// Drops all storage, leaving a zero-length array.
    pub fn empty(&mut self) {
        self.data.clear();
        self.size = 0;
    }

    /// Grows or shrinks to `to` bits; new bits are false.
    ///
    /// Growing first masks off stale padding bits of the old final word so
    /// they cannot surface as live bits afterwards.
    pub fn resize(&mut self, to: u32) {
        if to > self.size && self.size > 0 {
            let last = self.live_words() - 1;
            self.data.as_mut_slice()[last] &= final_word_mask(self.size);
        }
        self.data.resize(words_for(to));
        self.data.seek_tail_to_end();
        self.size = to;
    }

    /// Logically concatenates `other` after `self`.
    ///
    /// Word-aligned lengths take a direct word copy. Otherwise each source
    /// word is split: its low bits are merged into the current partial
    /// destination word (shifted up by the existing bit offset) and its
    /// high remainder into the next word (shifted down by the complement),
    /// after masking stale bits out of the old partial word.
    pub fn append(&mut self, other: &BitArray) {
        if other.size == 0 {
            return;
        }
        if self.size == 0 {
            *self = other.clone();
            return;
        }

        let orig_size = self.size;
        let orig_words = self.live_words();
        let other_words = other.live_words();
        let new_size = orig_size
            .checked_add(other.size)
            .expect("bit array length overflows the 32-bit domain");
        let new_words = words_for(new_size) as usize;

        self.data.resize(new_words as u32);
        self.data.seek_tail_to_end();
        self.size = new_size;

        let src = other.data.as_slice();
        let dst = self.data.as_mut_slice();
        let last_bit = bit_of(orig_size);

        if last_bit == 0 {
            dst[orig_words..orig_words + other_words].copy_from_slice(&src[..other_words]);
            return;
        }

        dst[orig_words - 1] &= final_word_mask(orig_size);

        let shift_down = WORD_BITS - last_bit;
        for (i, &word) in src[..other_words].iter().enumerate() {
            dst[orig_words - 1 + i] |= word << last_bit;
            if orig_words + i < new_words {
                dst[orig_words + i] |= word >> shift_down;
            }
        }
    }

    /// Compacts to the bits at `indices`, in index order.
    ///
    /// Panics when any index is out of range.
    pub fn keep(&mut self, indices: &DynamicArray<u32>) {
        for &idx in indices.tail_slice() {
            assert!(
                idx < self.size,
                "keep index {} exceeds length {}",
                idx,
                self.size
            );
        }
        self.unchecked_keep(indices, 0);
    }

    /// `keep` without validation; `offset` is subtracted from each index.
    pub fn unchecked_keep(&mut self, indices: &DynamicArray<u32>, offset: u32) {
        let new_size = indices.tail();
        if new_size == 0 {
            self.empty();
            return;
        }

        let mut gathered = DynamicArray::<u32>::with_len(words_for(new_size));
        {
            let src = self.data.as_slice();
            let dst = gathered.as_mut_slice();
            for (i, &idx) in indices.tail_slice().iter().enumerate() {
                let idx = idx - offset;
                if (src[word_of(idx)] >> bit_of(idx)) & 1 == 1 {
                    dst[i / WORD_BITS as usize] |= 1u32 << (i as u32 % WORD_BITS);
                }
            }
        }

        self.data = gathered;
        self.size = new_size;
    }

    /// Sets the given positions true; `offset` is subtracted from each.
    ///
    /// Returns `false` as soon as an adjusted index falls outside the
    /// array; positions visited before the failure stay set.
    pub fn assign_true(&mut self, indices: &DynamicArray<u32>, offset: u32) -> bool {
        for i in 0..indices.tail() {
            let idx = match indices.at(i).checked_sub(offset) {
                Some(idx) if idx < self.size => idx,
                _ => return false,
            };
            self.unchecked_place(true, idx);
        }
        true
    }

    /// `assign_true` without the range checks.
    pub fn unchecked_assign_true(&mut self, indices: &DynamicArray<u32>, offset: u32) {
        for &idx in indices.tail_slice() {
            self.unchecked_place(true, idx - offset);
        }
    }

    /// Population count, excluding padding bits of the final word.
    pub fn sum(&self) -> u32 {
        if self.size == 0 {
            return 0;
        }
        let words = self.data.as_slice();
        let live = self.live_words();
        let mut total = 0u32;
        for &w in &words[..live - 1] {
            total += w.count_ones();
        }
        total + (words[live - 1] & final_word_mask(self.size)).count_ones()
    }

    /// `true` when any live bit is set.
    pub fn any(&self) -> bool {
        if self.size == 0 {
            return false;
        }
        let words = self.data.as_slice();
        let live = self.live_words();
        if words[..live - 1].iter().any(|&w| w != 0) {
            return true;
        }
        words[live - 1] & final_word_mask(self.size) != 0
    }

    /// `true` when every live bit is set; an empty array is not "all".
    pub fn all(&self) -> bool {
        if self.size == 0 {
            return false;
        }
        let words = self.data.as_slice();
        let live = self.live_words();
        if words[..live - 1].iter().any(|&w| w != !0u32) {
            return false;
        }
        let mask = final_word_mask(self.size);
        words[live - 1] & mask == mask
    }

    /// Elementwise OR of `a` and `b` into `out`.
    ///
    /// Panics when the three lengths differ.
    pub fn dot_or(out: &mut BitArray, a: &BitArray, b: &BitArray) {
        Self::binary_check_dimensions(out, a, b);
        Self::unchecked_dot_or(out, a, b, 0, a.size);
    }

    /// Elementwise AND of `a` and `b` into `out`.
    ///
    /// Panics when the three lengths differ.
    pub fn dot_and(out: &mut BitArray, a: &BitArray, b: &BitArray) {
        Self::binary_check_dimensions(out, a, b);
        Self::unchecked_dot_and(out, a, b, 0, a.size);
    }

    /// Elementwise AND-NOT (`a & !b`) into `out`.
    ///
    /// Panics when the three lengths differ.
    pub fn dot_and_not(out: &mut BitArray, a: &BitArray, b: &BitArray) {
        Self::binary_check_dimensions(out, a, b);
        Self::unchecked_dot_and_not(out, a, b, 0, a.size);
    }

    /// Elementwise XNOR into `out`: bit set where `a` and `b` agree.
    ///
    /// Panics when the three lengths differ.
    pub fn dot_eq(out: &mut BitArray, a: &BitArray, b: &BitArray) {
        Self::binary_check_dimensions(out, a, b);
        Self::unchecked_dot_eq(out, a, b, 0, a.size);
    }

    /// OR over the words covering bit range `[start, stop)`.
    pub fn unchecked_dot_or(out: &mut BitArray, a: &BitArray, b: &BitArray, start: u32, stop: u32) {
        let (first, last) = match word_span(start, stop) {
            Some(span) => span,
            None => return,
        };
        let a_words = a.data.as_slice();
        let b_words = b.data.as_slice();
        let out_words = out.data.as_mut_slice();
        for i in first..=last {
            out_words[i] = a_words[i] | b_words[i];
        }
    }

    /// AND over the words covering bit range `[start, stop)`.
    pub fn unchecked_dot_and(
        out: &mut BitArray,
        a: &BitArray,
        b: &BitArray,
        start: u32,
        stop: u32,
    ) {
        let (first, last) = match word_span(start, stop) {
            Some(span) => span,
            None => return,
        };
        let a_words = a.data.as_slice();
        let b_words = b.data.as_slice();
        let out_words = out.data.as_mut_slice();
        for i in first..=last {
            out_words[i] = a_words[i] & b_words[i];
        }
    }

    /// AND-NOT over the words covering bit range `[start, stop)`.
    pub fn unchecked_dot_and_not(
        out: &mut BitArray,
        a: &BitArray,
        b: &BitArray,
        start: u32,
        stop: u32,
    ) {
        let (first, last) = match word_span(start, stop) {
            Some(span) => span,
            None => return,
        };
        let a_words = a.data.as_slice();
        let b_words = b.data.as_slice();
        let out_words = out.data.as_mut_slice();
        for i in first..=last {
            out_words[i] = a_words[i] & !b_words[i];
        }
    }

    /// XNOR over the words covering bit range `[start, stop)`.
    pub fn unchecked_dot_eq(out: &mut BitArray, a: &BitArray, b: &BitArray, start: u32, stop: u32) {
        let (first, last) = match word_span(start, stop) {
            Some(span) => span,
            None => return,
        };
        let a_words = a.data.as_slice();
        let b_words = b.data.as_slice();
        let out_words = out.data.as_mut_slice();
        for i in first..=last {
            out_words[i] = !(a_words[i] ^ b_words[i]);
        }
    }

    /// In-place OR with `other` over bit range `[start, stop)`.
    pub fn union_range(&mut self, other: &BitArray, start: u32, stop: u32) {
        let (first, last) = match word_span(start, stop) {
            Some(span) => span,
            None => return,
        };
        let src = other.data.as_slice();
        let dst = self.data.as_mut_slice();
        for i in first..=last {
            dst[i] |= src[i];
        }
    }

    /// In-place AND with `other` over bit range `[start, stop)`.
    pub fn intersect_range(&mut self, other: &BitArray, start: u32, stop: u32) {
        let (first, last) = match word_span(start, stop) {
            Some(span) => span,
            None => return,
        };
        let src = other.data.as_slice();
        let dst = self.data.as_mut_slice();
        for i in first..=last {
            dst[i] &= src[i];
        }
    }

    /// In-place AND-NOT with `other` over bit range `[start, stop)`.
    pub fn subtract_range(&mut self, other: &BitArray, start: u32, stop: u32) {
        let (first, last) = match word_span(start, stop) {
            Some(span) => span,
            None => return,
        };
        let src = other.data.as_slice();
        let dst = self.data.as_mut_slice();
        for i in first..=last {
            dst[i] &= !src[i];
        }
    }

    /// Ascending positions of set bits, each plus `offset`.
    ///
    /// All-zero words are skipped; individual bits are tested only inside
    /// non-zero words, and only the valid bits of the final word.
    pub fn find(a: &BitArray, offset: u32) -> DynamicArray<u32> {
        let n_true = a.sum();
        let mut result = DynamicArray::with_len(n_true);
        result.seek_tail_to_start();

        if n_true == 0 {
            return result;
        }

        let words = a.data.as_slice();
        let live = a.live_words();
        let last_bit = bit_of(a.size);

        for (i, &word) in words[..live].iter().enumerate() {
            if word == 0 {
                continue;
            }
            let stop_bit = if i + 1 < live || last_bit == 0 {
                WORD_BITS
            } else {
                last_bit
            };
            for j in 0..stop_bit {
                if (word >> j) & 1 == 1 {
                    result.push(i as u32 * WORD_BITS + j + offset);
                }
            }
        }

        result
    }

    fn binary_check_dimensions(out: &BitArray, a: &BitArray, b: &BitArray) {
        assert!(
            a.size == b.size && a.size == out.size,
            "bit array dimension mismatch: {} vs {} vs {}",
            out.size,
            a.size,
            b.size
        );
    }
}

/// Inclusive word range covering bit range `[start, stop)`, or `None` when
/// the range is empty.
fn word_span(start: u32, stop: u32) -> Option<(usize, usize)> {
    if stop <= start {
        return None;
    }
    Some((word_of(start), word_of(stop - 1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices_of(values: &[u32]) -> DynamicArray<u32> {
        let mut arr = DynamicArray::new();
        for &v in values {
            arr.push(v);
        }
        arr
    }

    #[test]
    fn test_push_crosses_word_boundary() {
        let mut a = BitArray::new();
        for i in 0..40 {
            a.push(i % 3 == 0);
        }

        assert_eq!(a.len(), 40);
        for i in 0..40 {
            assert_eq!(a.at(i), i % 3 == 0, "bit {}", i);
        }
    }

    #[test]
    fn test_sum_masks_final_word() {
        let a = BitArray::filled(10, true);
        // fill(true) sets padding bits of the backing word too
        assert_eq!(a.sum(), 10);
        assert!(a.all());
        assert!(a.any());
    }

    #[test]
    fn test_all_on_empty_is_false() {
        let a = BitArray::new();
        assert!(!a.all());
        assert!(!a.any());
        assert_eq!(a.sum(), 0);
    }

    #[test]
    fn test_append_word_aligned() {
        let mut a = BitArray::filled(32, false);
        let b = BitArray::filled(32, true);

        a.append(&b);

        assert_eq!(a.len(), 64);
        assert!(!a.at(31));
        assert!(a.at(32));
        assert!(a.at(63));
        assert_eq!(a.sum(), 32);
    }

    #[test]
    fn test_append_unaligned() {
        // Scenario: 10 false bits ++ 5 true bits
        let mut a = BitArray::filled(10, false);
        let b = BitArray::filled(5, true);

        a.append(&b);

        assert_eq!(a.len(), 15);
        assert!(!a.at(9));
        for i in 10..15 {
            assert!(a.at(i), "bit {}", i);
        }
        assert_eq!(a.sum(), 5);
    }

    #[test]
    fn test_append_masks_stale_destination_bits() {
        // fill(true) sets the padding bits of the final word; an unaligned
        // append must not resurrect them as live bits.
        let mut a = BitArray::filled(10, true);
        let b = BitArray::filled(6, false);
        a.append(&b);

        assert_eq!(a.len(), 16);
        assert_eq!(a.sum(), 10);
        for i in 10..16 {
            assert!(!a.at(i), "stale bit {} survived append", i);
        }
    }

    #[test]
    fn test_append_spanning_many_words() {
        let mut a = BitArray::filled(33, false);
        a.place(true, 32);
        let mut b = BitArray::filled(70, false);
        b.place(true, 0);
        b.place(true, 69);

        a.append(&b);

        assert_eq!(a.len(), 103);
        assert_eq!(BitArray::find(&a, 0).tail_slice(), &[32, 33, 102]);
    }

    #[test]
    fn test_append_into_empty_copies() {
        let mut a = BitArray::new();
        let b = BitArray::filled(5, true);
        a.append(&b);
        assert_eq!(a.len(), 5);
        assert_eq!(a.sum(), 5);
    }

    #[test]
    fn test_resize_grow_pads_false() {
        let mut a = BitArray::filled(10, true);
        a.resize(40);

        assert_eq!(a.len(), 40);
        assert_eq!(a.sum(), 10);
        for i in 10..40 {
            assert!(!a.at(i), "bit {}", i);
        }
    }

    #[test]
    fn test_resize_shrink_then_grow() {
        let mut a = BitArray::filled(20, true);
        a.resize(4);
        assert_eq!(a.sum(), 4);

        a.resize(20);
        assert_eq!(a.sum(), 4);
        assert!(!a.at(4));
    }

    #[test]
    fn test_keep_gathers_in_index_order() {
        let mut a = BitArray::filled(8, false);
        a.place(true, 1);
        a.place(true, 6);

        a.keep(&indices_of(&[6, 0, 1]));

        assert_eq!(a.len(), 3);
        assert!(a.at(0));
        assert!(!a.at(1));
        assert!(a.at(2));
    }

    #[test]
    fn test_keep_empty_indices_empties() {
        let mut a = BitArray::filled(8, true);
        a.keep(&indices_of(&[]));
        assert_eq!(a.len(), 0);
    }

    #[test]
    #[should_panic(expected = "exceeds length")]
    fn test_keep_out_of_range_panics() {
        let mut a = BitArray::filled(4, true);
        a.keep(&indices_of(&[4]));
    }

    #[test]
    fn test_assign_true_then_find_roundtrip() {
        let mut a = BitArray::with_len(50);
        assert!(a.assign_true(&indices_of(&[40, 3, 17]), 0));

        assert_eq!(BitArray::find(&a, 0).tail_slice(), &[3, 17, 40]);
    }

    #[test]
    fn test_assign_true_out_of_range_fails() {
        let mut a = BitArray::with_len(10);
        assert!(!a.assign_true(&indices_of(&[2, 10]), 0));
        // position visited before the failure stays set
        assert!(a.at(2));
    }

    #[test]
    fn test_assign_true_offset_subtracts() {
        let mut a = BitArray::with_len(10);
        assert!(a.assign_true(&indices_of(&[1, 5]), 1));
        assert!(a.at(0));
        assert!(a.at(4));

        // offset larger than the index is out of range, not a wraparound
        assert!(!a.assign_true(&indices_of(&[0]), 1));
    }

    #[test]
    fn test_find_offset_added() {
        let mut a = BitArray::with_len(8);
        a.place(true, 0);
        a.place(true, 7);

        assert_eq!(BitArray::find(&a, 100).tail_slice(), &[100, 107]);
    }

    #[test]
    fn test_find_skips_zero_words() {
        let mut a = BitArray::with_len(200);
        a.place(true, 199);
        assert_eq!(BitArray::find(&a, 0).tail_slice(), &[199]);
    }

    #[test]
    fn test_dot_ops() {
        let mut a = BitArray::with_len(40);
        let mut b = BitArray::with_len(40);
        a.place(true, 1);
        a.place(true, 35);
        b.place(true, 1);
        b.place(true, 2);

        let mut out = BitArray::with_len(40);
        BitArray::dot_or(&mut out, &a, &b);
        assert_eq!(BitArray::find(&out, 0).tail_slice(), &[1, 2, 35]);

        BitArray::dot_and(&mut out, &a, &b);
        assert_eq!(BitArray::find(&out, 0).tail_slice(), &[1]);

        BitArray::dot_and_not(&mut out, &a, &b);
        assert_eq!(BitArray::find(&out, 0).tail_slice(), &[35]);

        BitArray::dot_eq(&mut out, &a, &a);
        assert!(out.all());
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn test_dot_dimension_mismatch_panics() {
        let a = BitArray::with_len(8);
        let b = BitArray::with_len(9);
        let mut out = BitArray::with_len(8);
        BitArray::dot_or(&mut out, &a, &b);
    }

    #[test]
    fn test_in_place_ranges() {
        let mut a = BitArray::with_len(16);
        let mut b = BitArray::with_len(16);
        a.place(true, 0);
        a.place(true, 5);
        b.place(true, 5);
        b.place(true, 9);

        a.union_range(&b, 0, 16);
        assert_eq!(BitArray::find(&a, 0).tail_slice(), &[0, 5, 9]);

        a.subtract_range(&b, 0, 16);
        assert_eq!(BitArray::find(&a, 0).tail_slice(), &[0]);

        a.intersect_range(&b, 0, 16);
        assert_eq!(a.sum(), 0);
    }

    #[test]
    fn test_flip() {
        let mut a = BitArray::filled(5, false);
        a.flip();
        assert_eq!(a.sum(), 5);
        assert!(a.all());
    }

    #[test]
    #[should_panic(expected = "exceeds length")]
    fn test_place_out_of_range_panics() {
        let mut a = BitArray::with_len(4);
        a.place(true, 4);
    }

    #[test]
    fn test_deep_copy_independent() {
        let a = BitArray::filled(8, true);
        let mut b = a.clone();
        b.place(false, 0);

        assert!(a.at(0));
        assert!(!b.at(0));
    }
}
