// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`GraphSource`] trait and the in-memory source.
//!
//! A source hands out the graph one chunk of rows at a time. It does not
//! reduce ids or build adjacency views; that is
//! [`BlockReader`](crate::BlockReader)'s job. The only
//! contract is: each call returns at most `max_rows` rows, and
//! `more_available` is `false` exactly when the source is exhausted.

use crate::BlockError;

/// A chunk of raw rows read from a [`GraphSource`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceChunk {
    /// One entry per U vertex: its raw (unreduced) V identifiers.
    pub rows: Vec<Vec<u64>>,
    /// Whether a further call may return more rows.
    pub more_available: bool,
}

impl SourceChunk {
    /// Number of rows in this chunk.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the chunk has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Incremental reader of a bipartite graph, one U vertex per row.
///
/// Implementations must be `Send` to be driven from the loader thread.
pub trait GraphSource {
    /// Reads up to `max_rows` rows.
    fn read_next_block(&mut self, max_rows: usize) -> Result<SourceChunk, BlockError>;
}

impl<S: GraphSource + ?Sized> GraphSource for Box<S> {
    fn read_next_block(&mut self, max_rows: usize) -> Result<SourceChunk, BlockError> {
        (**self).read_next_block(max_rows)
    }
}

impl<S: GraphSource + ?Sized> GraphSource for &mut S {
    fn read_next_block(&mut self, max_rows: usize) -> Result<SourceChunk, BlockError> {
        (**self).read_next_block(max_rows)
    }
}

/// A source over rows held in memory.
///
/// # Example
/// ```
/// use block_graph::{GraphSource, MemorySource};
///
/// let mut src = MemorySource::new(vec![vec![1, 2], vec![3], vec![4]]);
/// let first = src.read_next_block(2).unwrap();
/// assert_eq!(first.num_rows(), 2);
/// assert!(first.more_available);
/// let second = src.read_next_block(2).unwrap();
/// assert_eq!(second.num_rows(), 1);
/// assert!(!second.more_available);
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    rows: Vec<Vec<u64>>,
    cursor: usize,
}

impl MemorySource {
    /// Creates a source over `rows`.
    pub fn new(rows: Vec<Vec<u64>>) -> Self {
        Self { rows, cursor: 0 }
    }

    /// Total number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the source holds no rows at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rewinds to the first row.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl GraphSource for MemorySource {
    fn read_next_block(&mut self, max_rows: usize) -> Result<SourceChunk, BlockError> {
        let end = (self.cursor + max_rows).min(self.rows.len());
        let rows = self.rows[self.cursor..end].to_vec();
        self.cursor = end;
        Ok(SourceChunk {
            rows,
            more_available: self.cursor < self.rows.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_until_exhausted() {
        let mut src = MemorySource::new((0..5).map(|i| vec![i]).collect());
        let sizes: Vec<(usize, bool)> = std::iter::repeat_with(|| src.read_next_block(2).unwrap())
            .take(3)
            .map(|c| (c.num_rows(), c.more_available))
            .collect();
        assert_eq!(sizes, vec![(2, true), (2, true), (1, false)]);
    }

    #[test]
    fn test_exact_multiple_ends_cleanly() {
        let mut src = MemorySource::new(vec![vec![1], vec![2]]);
        let c = src.read_next_block(2).unwrap();
        assert_eq!(c.num_rows(), 2);
        assert!(!c.more_available);
    }

    #[test]
    fn test_empty_source() {
        let mut src = MemorySource::new(Vec::new());
        let c = src.read_next_block(10).unwrap();
        assert!(c.is_empty());
        assert!(!c.more_available);
    }

    #[test]
    fn test_rewind() {
        let mut src = MemorySource::new(vec![vec![1], vec![2]]);
        let a = src.read_next_block(5).unwrap();
        src.rewind();
        let b = src.read_next_block(5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_borrowed_source() {
        fn first_row<S: GraphSource>(mut source: S) -> Vec<u64> {
            source.read_next_block(1).unwrap().rows.remove(0)
        }

        let mut src = MemorySource::new(vec![vec![1], vec![2]]);
        assert_eq!(first_row(&mut src), vec![1]);
        assert_eq!(src.read_next_block(1).unwrap().rows, vec![vec![2]]);
    }

    #[test]
    fn test_boxed_source() {
        let mut boxed: Box<dyn GraphSource + Send> = Box::new(MemorySource::new(vec![vec![9]]));
        assert_eq!(boxed.read_next_block(1).unwrap().rows, vec![vec![9]]);
    }
}
