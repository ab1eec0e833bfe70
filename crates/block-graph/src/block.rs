// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Graph blocks: one contiguous range of U vertices in both layouts.
//!
//! A [`GraphBlock`] is built once by the loader from raw source rows and is
//! immutable afterwards. It owns a row-major view (U → V) and the matching
//! column-major view (V → U); both encode the same edge set.
//!
//! # Id Reduction
//! Raw V identifiers come from an unbounded `u64` space and are folded into
//! the universe `[0, v_size)` with [`reduce_id`]. The map is many-to-one;
//! two raw ids of the same row that land on the same V collapse into one
//! edge, so every row is a sorted set.

use crate::layout::{Adjacency, ColMajor, RowMajor};
use crate::BlockError;
use std::fmt;

/// Folds a raw V identifier into `[0, v_size)`.
///
/// `v_size` must be non-zero and fit in `u32`; [`GraphBlock::from_rows`]
/// checks this before reducing.
#[inline]
pub fn reduce_id(id: u64, v_size: usize) -> u32 {
    (id % v_size as u64) as u32
}

/// Checks that `v_size` is a usable V universe.
pub fn check_universe(v_size: usize) -> Result<(), BlockError> {
    if v_size == 0 || v_size > u32::MAX as usize {
        return Err(BlockError::InvalidUniverse(v_size));
    }
    Ok(())
}

/// A block of the bipartite graph in matched row- and column-major form.
#[derive(Clone)]
pub struct GraphBlock {
    first_u: u64,
    row_major: Adjacency<RowMajor>,
    col_major: Adjacency<ColMajor>,
    collisions: usize,
}

impl GraphBlock {
    /// Builds a block from raw rows of V identifiers.
    ///
    /// `first_u` is the global id of the first row. Each id is reduced with
    /// [`reduce_id`]; rows are sorted and de-duplicated.
    pub fn from_rows<R>(first_u: u64, rows: &[R], v_size: usize) -> Result<Self, BlockError>
    where
        R: AsRef<[u64]>,
    {
        check_universe(v_size)?;

        let total: usize = rows.iter().map(|r| r.as_ref().len()).sum();
        let mut offsets = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::with_capacity(total);
        offsets.push(0);

        let mut row_buf: Vec<u32> = Vec::new();
        for row in rows {
            row_buf.clear();
            row_buf.extend(row.as_ref().iter().map(|&id| reduce_id(id, v_size)));
            row_buf.sort_unstable();
            row_buf.dedup();
            indices.extend_from_slice(&row_buf);
            offsets.push(indices.len());
        }

        let collisions = total - indices.len();
        if collisions > 0 {
            tracing::trace!(
                "block at U {first_u}: {collisions} duplicate edges folded by id reduction"
            );
        }

        let row_major = Adjacency::from_parts_unchecked(offsets, indices, v_size);
        let mut block = Self::from_row_major(first_u, row_major);
        block.collisions = collisions;
        Ok(block)
    }

    /// Wraps an already-validated row-major view, deriving the column-major one.
    pub fn from_row_major(first_u: u64, row_major: Adjacency<RowMajor>) -> Self {
        let col_major = row_major.transpose();
        Self {
            first_u,
            row_major,
            col_major,
            collisions: 0,
        }
    }

    /// Global id of the first U vertex in this block.
    pub fn first_u(&self) -> u64 {
        self.first_u
    }

    /// Number of U vertices (rows) in the block.
    pub fn num_u(&self) -> usize {
        self.row_major.major_dim()
    }

    /// Returns `true` if the block has no rows.
    pub fn is_empty(&self) -> bool {
        self.num_u() == 0
    }

    /// Size of the V universe.
    pub fn v_size(&self) -> usize {
        self.row_major.minor_dim()
    }

    /// Number of edges.
    pub fn nnz(&self) -> usize {
        self.row_major.nnz()
    }

    /// U → V view.
    pub fn row_major(&self) -> &Adjacency<RowMajor> {
        &self.row_major
    }

    /// V → U view.
    pub fn col_major(&self) -> &Adjacency<ColMajor> {
        &self.col_major
    }

    /// Raw edges dropped because two ids of one row reduced to the same V.
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    /// Number of distinct V vertices touched by this block.
    pub fn distinct_v(&self) -> usize {
        self.col_major.iter().filter(|(_, us)| !us.is_empty()).count()
    }

    /// Combined heap footprint of both views, used as the queue weight.
    pub fn mem_size(&self) -> usize {
        self.row_major.mem_size() + self.col_major.mem_size()
    }

    /// One-line description for logs.
    pub fn summary(&self) -> String {
        format!(
            "block U[{}..{}): {} rows, {} edges, {} distinct V, max degree {}, {:.1} KB",
            self.first_u,
            self.first_u + self.num_u() as u64,
            self.num_u(),
            self.nnz(),
            self.distinct_v(),
            self.row_major.max_degree(),
            self.mem_size() as f64 / 1024.0,
        )
    }
}

impl fmt::Debug for GraphBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphBlock")
            .field("first_u", &self.first_u)
            .field("num_u", &self.num_u())
            .field("v_size", &self.v_size())
            .field("nnz", &self.nnz())
            .finish()
    }
}
