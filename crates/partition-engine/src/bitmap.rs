// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fixed-size bitmap backed by `u64` words.

const WORD_BITS: usize = u64::BITS as usize;

/// A fixed-length set of bits with a cached population count.
///
/// Indexing past `len()` panics, like slice indexing.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Bitmap {
    words: Vec<u64>,
    len: usize,
    ones: usize,
}

impl Bitmap {
    /// Creates a bitmap of `len` cleared bits.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
            ones: 0,
        }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the bitmap has zero bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.ones
    }

    /// Returns bit `i`.
    #[inline]
    pub fn get(&self, i: usize) -> bool {
        self.check(i);
        self.words[i / WORD_BITS] & (1u64 << (i % WORD_BITS)) != 0
    }

    /// Sets bit `i`, returning `true` if it was previously clear.
    #[inline]
    pub fn set(&mut self, i: usize) -> bool {
        self.check(i);
        let word = &mut self.words[i / WORD_BITS];
        let mask = 1u64 << (i % WORD_BITS);
        let newly_set = *word & mask == 0;
        *word |= mask;
        self.ones += usize::from(newly_set);
        newly_set
    }

    /// Clears bit `i`, returning `true` if it was previously set.
    #[inline]
    pub fn clear(&mut self, i: usize) -> bool {
        self.check(i);
        let word = &mut self.words[i / WORD_BITS];
        let mask = 1u64 << (i % WORD_BITS);
        let was_set = *word & mask != 0;
        *word &= !mask;
        self.ones -= usize::from(was_set);
        was_set
    }

    /// Clears every bit and changes the length to `len`.
    pub fn reset(&mut self, len: usize) {
        self.words.clear();
        self.words.resize(len.div_ceil(WORD_BITS), 0);
        self.len = len;
        self.ones = 0;
    }

    /// Sets every bit that is set in `other`.
    ///
    /// # Panics
    /// Panics if the lengths differ.
    pub fn union_with(&mut self, other: &Bitmap) {
        assert_eq!(self.len, other.len, "bitmap length mismatch");
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= b;
        }
        self.ones = self.words.iter().map(|w| w.count_ones() as usize).sum();
    }

    /// Iterates the indices of set bits in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(w, &word)| {
            let mut bits = word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let tz = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some(w * WORD_BITS + tz)
            })
        })
    }

    #[inline]
    fn check(&self, i: usize) {
        assert!(i < self.len, "bit index {i} out of range (len {})", self.len);
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("len", &self.len)
            .field("ones", &self.ones)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut b = Bitmap::new(130);
        assert!(!b.get(0));
        assert!(b.set(0));
        assert!(b.set(64));
        assert!(b.set(129));
        assert!(!b.set(64));
        assert!(b.get(64));
        assert!(!b.get(65));
        assert_eq!(b.count_ones(), 3);
    }

    #[test]
    fn test_clear() {
        let mut b = Bitmap::new(70);
        b.set(66);
        assert!(b.clear(66));
        assert!(!b.clear(66));
        assert!(!b.get(66));
        assert_eq!(b.count_ones(), 0);
    }

    #[test]
    fn test_iter_ones() {
        let mut b = Bitmap::new(200);
        for i in [3, 63, 64, 150, 199] {
            b.set(i);
        }
        assert_eq!(b.iter_ones().collect::<Vec<_>>(), vec![3, 63, 64, 150, 199]);
    }

    #[test]
    fn test_reset() {
        let mut b = Bitmap::new(10);
        b.set(3);
        b.reset(100);
        assert_eq!(b.len(), 100);
        assert_eq!(b.count_ones(), 0);
        assert!(!b.get(3));
    }

    #[test]
    fn test_union() {
        let mut a = Bitmap::new(70);
        let mut b = Bitmap::new(70);
        a.set(1);
        b.set(1);
        b.set(69);
        a.union_with(&b);
        assert_eq!(a.count_ones(), 2);
        assert!(a.get(69));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_panics() {
        let b = Bitmap::new(8);
        b.get(8);
    }

    #[test]
    fn test_empty() {
        let b = Bitmap::new(0);
        assert!(b.is_empty());
        assert_eq!(b.iter_ones().count(), 0);
    }
}
