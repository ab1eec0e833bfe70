// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Turns a [`GraphSource`] into a sequence of contiguous [`GraphBlock`]s.
//!
//! Stream rules:
//! - Block `b` starts at the global U id right after block `b - 1`.
//! - A chunk with no rows and `more_available == false` ends the stream.
//! - A chunk with no rows and `more_available == true` is a malformed
//!   source and fails with [`BlockError::EmptyBlock`].
//! - After a chunk reports `more_available == false` the source is not read
//!   again.

use crate::{BlockError, GraphBlock, GraphSource};

/// Reads blocks of at most `block_size` rows from a source.
///
/// # Example
/// ```
/// use block_graph::{BlockReader, MemorySource};
///
/// let source = MemorySource::new(vec![vec![1], vec![2], vec![3]]);
/// let mut reader = BlockReader::new(source, 4, 2);
/// assert_eq!(reader.read_block().unwrap().unwrap().first_u(), 0);
/// assert_eq!(reader.read_block().unwrap().unwrap().first_u(), 2);
/// assert!(reader.read_block().unwrap().is_none());
/// ```
pub struct BlockReader<S> {
    source: S,
    v_size: usize,
    block_size: usize,
    next_u: u64,
    exhausted: bool,
}

impl<S: GraphSource> BlockReader<S> {
    pub fn new(source: S, v_size: usize, block_size: usize) -> Self {
        Self {
            source,
            v_size,
            block_size,
            next_u: 0,
            exhausted: false,
        }
    }

    /// Reads the next block, or `None` once the stream has ended.
    pub fn read_block(&mut self) -> Result<Option<GraphBlock>, BlockError> {
        if self.exhausted {
            return Ok(None);
        }

        let chunk = self.source.read_next_block(self.block_size)?;
        if chunk.is_empty() {
            if chunk.more_available {
                return Err(BlockError::EmptyBlock {
                    first_u: self.next_u,
                });
            }
            self.exhausted = true;
            return Ok(None);
        }

        let block = GraphBlock::from_rows(self.next_u, &chunk.rows, self.v_size)?;
        self.next_u += block.num_u() as u64;
        self.exhausted = !chunk.more_available;
        Ok(Some(block))
    }

    /// Global id the next block will start at.
    pub fn next_u(&self) -> u64 {
        self.next_u
    }
}

impl<S> std::fmt::Debug for BlockReader<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockReader")
            .field("v_size", &self.v_size)
            .field("block_size", &self.block_size)
            .field("next_u", &self.next_u)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}
