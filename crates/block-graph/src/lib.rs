// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # block-graph
//!
//! The data model of the streaming partitioner: bipartite graph blocks and
//! the sources they are read from.
//!
//! # Key Components
//!
//! - [`Adjacency`]: compressed adjacency with a compile-time layout marker
//!   ([`RowMajor`] for U → V, [`ColMajor`] for V → U).
//! - [`GraphBlock`]: a contiguous range of U vertices holding both layouts
//!   of the same edge set, with V ids reduced into `[0, v_size)`.
//! - [`GraphSource`]: the incremental reader contract, with
//!   [`MemorySource`] and the libsvm-style [`TextSource`].
//! - [`BlockReader`]: turns a source into contiguous blocks and applies the
//!   end-of-stream rules.
//!
//! # Example
//! ```
//! use block_graph::{GraphBlock, GraphSource, MemorySource};
//!
//! let mut source = MemorySource::new(vec![vec![10, 11], vec![11], vec![10, 12]]);
//! let chunk = source.read_next_block(8).unwrap();
//! let block = GraphBlock::from_rows(0, &chunk.rows, 3).unwrap();
//!
//! // 10 % 3 = 1, 11 % 3 = 2, 12 % 3 = 0
//! assert_eq!(block.row_major().neighbors(2), &[0, 1]);
//! assert_eq!(block.col_major().neighbors(2), &[0, 1]);
//! ```

pub mod block;
mod error;
pub mod layout;
pub mod reader;
pub mod source;
pub mod text;

pub use block::{check_universe, reduce_id, GraphBlock};
pub use error::BlockError;
pub use layout::{Adjacency, ColMajor, Layout, RowMajor};
pub use reader::BlockReader;
pub use source::{GraphSource, MemorySource, SourceChunk};
pub use text::TextSource;
