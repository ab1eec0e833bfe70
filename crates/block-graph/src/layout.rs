// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Compressed adjacency storage with a compile-time layout marker.
//!
//! # Type-State Layouts
//!
//! ```text
//! Adjacency<RowMajor>   : major axis = U (local), minor axis = V
//!       │  .transpose()
//!       ▼
//! Adjacency<ColMajor>   : major axis = V, minor axis = U (local)
//! ```
//!
//! The marker is a zero-sized `PhantomData`, so a function that needs the
//! V→U view cannot accidentally be handed the U→V one. Both layouts share
//! one representation: an offset table of length `major + 1` and a flat
//! index array. The offsets are validated once at construction; afterwards
//! [`Adjacency::neighbors`] is a plain slice of the index array.

use crate::BlockError;
use std::fmt;
use std::marker::PhantomData;

// ── Layout markers ─────────────────────────────────────────────────

/// Marker: rows are U vertices, entries are V ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMajor;

/// Marker: rows are V vertices, entries are local U indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColMajor;

/// Sealed trait for adjacency layouts.
pub trait Layout: fmt::Debug + Clone + Copy + Send + Sync + 'static {
    /// The layout produced by [`Adjacency::transpose`].
    type Transposed: Layout;
    /// Short name used in summaries.
    const NAME: &'static str;
}

impl Layout for RowMajor {
    type Transposed = ColMajor;
    const NAME: &'static str = "row-major";
}

impl Layout for ColMajor {
    type Transposed = RowMajor;
    const NAME: &'static str = "col-major";
}

// ── Adjacency ──────────────────────────────────────────────────────

/// A compressed sparse adjacency structure (CSR for `RowMajor`, CSC for
/// `ColMajor`).
#[derive(Clone, PartialEq, Eq)]
pub struct Adjacency<L: Layout> {
    offsets: Vec<usize>,
    indices: Vec<u32>,
    minor_dim: usize,
    _layout: PhantomData<L>,
}

impl<L: Layout> Adjacency<L> {
    /// Builds an adjacency from raw parts, validating every invariant the
    /// partitioner relies on.
    ///
    /// # Checks
    /// - `offsets` is non-empty, starts at 0 and ends at `indices.len()`.
    /// - `offsets` is non-decreasing.
    /// - Every index is `< minor_dim`.
    pub fn from_parts(
        offsets: Vec<usize>,
        indices: Vec<u32>,
        minor_dim: usize,
    ) -> Result<Self, BlockError> {
        match (offsets.first(), offsets.last()) {
            (Some(&0), Some(&last)) if last == indices.len() => {}
            (Some(&0), Some(&last)) => {
                return Err(BlockError::OffsetMismatch {
                    expected: indices.len(),
                    actual: last,
                })
            }
            (Some(&first), _) => {
                return Err(BlockError::OffsetMismatch {
                    expected: 0,
                    actual: first,
                })
            }
            (None, _) => {
                return Err(BlockError::OffsetMismatch {
                    expected: indices.len(),
                    actual: 0,
                })
            }
        }

        if let Some(position) = offsets.windows(2).position(|w| w[0] > w[1]) {
            return Err(BlockError::OffsetsNotMonotonic {
                position: position + 1,
            });
        }

        if let Some(&bad) = indices.iter().find(|&&idx| idx as usize >= minor_dim) {
            return Err(BlockError::IndexOutOfRange {
                index: bad as u64,
                bound: minor_dim,
            });
        }

        Ok(Self::from_parts_unchecked(offsets, indices, minor_dim))
    }

    /// Assembles an adjacency whose invariants the caller has established.
    pub(crate) fn from_parts_unchecked(
        offsets: Vec<usize>,
        indices: Vec<u32>,
        minor_dim: usize,
    ) -> Self {
        debug_assert_eq!(offsets.last().copied(), Some(indices.len()));
        Self {
            offsets,
            indices,
            minor_dim,
            _layout: PhantomData,
        }
    }

    /// Number of major-axis entries (rows of this layout).
    pub fn major_dim(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Size of the minor-axis universe.
    pub fn minor_dim(&self) -> usize {
        self.minor_dim
    }

    /// Number of stored edges.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Neighbours of major entry `i`, in ascending order.
    ///
    /// # Panics
    /// Panics if `i >= major_dim()`.
    pub fn neighbors(&self, i: usize) -> &[u32] {
        &self.indices[self.offsets[i]..self.offsets[i + 1]]
    }

    /// Largest degree over all major entries.
    pub fn max_degree(&self) -> usize {
        self.offsets
            .windows(2)
            .map(|w| w[1] - w[0])
            .max()
            .unwrap_or(0)
    }

    /// Iterates `(major, neighbours)` pairs in major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[u32])> + '_ {
        (0..self.major_dim()).map(move |i| (i, self.neighbors(i)))
    }

    /// Heap bytes held by this structure.
    pub fn mem_size(&self) -> usize {
        self.offsets.len() * std::mem::size_of::<usize>()
            + self.indices.len() * std::mem::size_of::<u32>()
    }

    /// Converts to the opposite layout, preserving the edge set.
    ///
    /// Counting-sort transpose in `O(major + minor + nnz)`. Because major
    /// entries are visited in ascending order, every transposed row comes
    /// out sorted as well.
    pub fn transpose(&self) -> Adjacency<L::Transposed> {
        let mut offsets = vec![0usize; self.minor_dim + 1];
        for &idx in &self.indices {
            offsets[idx as usize + 1] += 1;
        }
        for i in 0..self.minor_dim {
            offsets[i + 1] += offsets[i];
        }

        let mut cursor = offsets.clone();
        let mut indices = vec![0u32; self.indices.len()];
        for (major, row) in self.iter() {
            for &minor in row {
                let slot = &mut cursor[minor as usize];
                indices[*slot] = major as u32;
                *slot += 1;
            }
        }

        Adjacency::from_parts_unchecked(offsets, indices, self.major_dim())
    }
}

impl<L: Layout> fmt::Debug for Adjacency<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adjacency")
            .field("layout", &L::NAME)
            .field("major_dim", &self.major_dim())
            .field("minor_dim", &self.minor_dim)
            .field("nnz", &self.nnz())
            .finish()
    }
}
