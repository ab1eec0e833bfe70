// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-partition neighbour coverage.
//!
//! A [`NeighborSet`] records which V vertices a partition already holds.
//! It lives for the whole run and only grows: once a V vertex is covered by
//! partition `k`, assigning further U neighbours of it to `k` costs nothing.

use crate::bitmap::Bitmap;

/// Set of V vertices covered by one partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborSet {
    bits: Bitmap,
}

impl NeighborSet {
    /// Creates an empty set over the universe `[0, universe)`.
    pub fn new(universe: usize) -> Self {
        Self {
            bits: Bitmap::new(universe),
        }
    }

    /// Adds `v`, returning `true` if it was not covered before.
    #[inline]
    pub fn insert(&mut self, v: u32) -> bool {
        self.bits.set(v as usize)
    }

    #[inline]
    pub fn contains(&self, v: u32) -> bool {
        self.bits.get(v as usize)
    }

    /// Number of covered V vertices.
    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Covered V vertices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.bits.iter_ones().map(|v| v as u32)
    }

    pub fn as_bitmap(&self) -> &Bitmap {
        &self.bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_monotonic() {
        let mut set = NeighborSet::new(10);
        assert!(set.insert(4));
        assert!(!set.insert(4));
        assert!(set.insert(9));
        assert!(set.contains(4));
        assert!(!set.contains(5));
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![4, 9]);
    }

    #[test]
    fn test_new_set_is_empty() {
        let set = NeighborSet::new(3);
        assert!(set.is_empty());
        assert_eq!(set.as_bitmap().len(), 3);
    }
}
