// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Partition assignments: per block, and accumulated over a run.
//!
//! ```text
//! block 0: first_u = 0   parts = [1, 0, 1]
//! block 1: first_u = 3   parts = [0, 1]
//!                 │
//!                 ▼  PartitionMap::extend
//! map:   u  0 1 2 3 4
//!        k  1 0 1 0 1
//! ```

use crate::PartitionError;
use serde::Serialize;
use std::io::{self, Write};

/// Assignment of one block's U vertices, indexed by local position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockAssignment {
    first_u: u64,
    parts: Vec<u32>,
}

impl BlockAssignment {
    pub fn new(first_u: u64, parts: Vec<u32>) -> Self {
        Self { first_u, parts }
    }

    /// Global id of the block's first U vertex.
    pub fn first_u(&self) -> u64 {
        self.first_u
    }

    /// Partition of each local U vertex.
    pub fn parts(&self) -> &[u32] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// `(global U id, partition)` pairs in U order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u32)> + '_ {
        let first = self.first_u;
        self.parts
            .iter()
            .enumerate()
            .map(move |(i, &k)| (first + i as u64, k))
    }
}

/// Dense global mapping from U id to partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionMap {
    num_partitions: usize,
    parts: Vec<u32>,
}

impl PartitionMap {
    pub fn new(num_partitions: usize) -> Self {
        Self {
            num_partitions,
            parts: Vec::new(),
        }
    }

    /// Appends a block. Blocks must arrive in stream order.
    pub fn extend(&mut self, block: &BlockAssignment) -> Result<(), PartitionError> {
        let expected = self.parts.len() as u64;
        if block.first_u != expected {
            return Err(PartitionError::NonContiguousBlock {
                expected,
                actual: block.first_u,
            });
        }
        self.parts.extend_from_slice(&block.parts);
        Ok(())
    }

    /// Partition of global U vertex `u`.
    pub fn get(&self, u: u64) -> Option<u32> {
        usize::try_from(u)
            .ok()
            .and_then(|i| self.parts.get(i))
            .copied()
    }

    pub fn num_partitions(&self) -> usize {
        self.num_partitions
    }

    /// Number of U vertices assigned.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.parts
    }

    /// `(U id, partition)` pairs in U order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u32)> + '_ {
        self.parts.iter().enumerate().map(|(u, &k)| (u as u64, k))
    }

    /// Number of U vertices in each partition.
    pub fn partition_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.num_partitions];
        for &k in &self.parts {
            sizes[k as usize] += 1;
        }
        sizes
    }

    /// Returns `true` if every partition holds `floor(n/K)` or `ceil(n/K)`
    /// vertices.
    pub fn is_balanced(&self) -> bool {
        let sizes = self.partition_sizes();
        match (sizes.iter().min(), sizes.iter().max()) {
            (Some(lo), Some(hi)) => hi - lo <= 1,
            _ => true,
        }
    }

    /// Writes one `u<TAB>partition` line per vertex.
    pub fn write_tsv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for (u, k) in self.iter() {
            writeln!(writer, "{u}\t{k}")?;
        }
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_iter_uses_global_ids() {
        let block = BlockAssignment::new(10, vec![2, 0]);
        assert_eq!(block.iter().collect::<Vec<_>>(), vec![(10, 2), (11, 0)]);
    }

    #[test]
    fn test_extend_in_order() {
        let mut map = PartitionMap::new(2);
        map.extend(&BlockAssignment::new(0, vec![1, 0, 1])).unwrap();
        map.extend(&BlockAssignment::new(3, vec![0, 1])).unwrap();
        assert_eq!(map.as_slice(), &[1, 0, 1, 0, 1]);
        assert_eq!(map.get(4), Some(1));
        assert_eq!(map.get(5), None);
        assert_eq!(map.partition_sizes(), vec![2, 3]);
        assert!(map.is_balanced());
    }

    #[test]
    fn test_extend_rejects_gap() {
        let mut map = PartitionMap::new(2);
        map.extend(&BlockAssignment::new(0, vec![0])).unwrap();
        let err = map.extend(&BlockAssignment::new(5, vec![1])).unwrap_err();
        assert_eq!(
            err,
            PartitionError::NonContiguousBlock {
                expected: 1,
                actual: 5
            }
        );
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_unbalanced_detected() {
        let mut map = PartitionMap::new(3);
        map.extend(&BlockAssignment::new(0, vec![0, 0, 1])).unwrap();
        assert!(!map.is_balanced());
    }

    #[test]
    fn test_write_tsv() {
        let mut map = PartitionMap::new(2);
        map.extend(&BlockAssignment::new(0, vec![1, 0])).unwrap();
        let mut out = Vec::new();
        map.write_tsv(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0\t1\n1\t0\n");
    }

    #[test]
    fn test_serialize() {
        let block = BlockAssignment::new(4, vec![0, 1]);
        let json = serde_json::to_string(&block).unwrap();
        assert_eq!(json, r#"{"first_u":4,"parts":[0,1]}"#);
    }
}
