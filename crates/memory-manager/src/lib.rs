// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # memory-manager
//!
//! Memory budgeting for the streaming partitioner: the loader may only keep
//! a bounded number of bytes of graph blocks in flight ahead of the engine.
//!
//! # Key Components
//!
//! - [`MemoryBudget`]: a byte ceiling with human-readable parsing
//!   (`"64M"`, `"1G"`, etc.).
//! - [`BlockQueue`]: the budget-bounded blocking FIFO that hands blocks
//!   from the loader thread to the engine. Items move through it by value.
//! - [`QueueStats`]: push/pop counters and peak occupancy.
//!
//! # Ownership Model
//!
//! ```text
//! loader thread                       engine thread
//!   push(block, bytes) ──► VecDeque ──► pop() -> Some(block)
//!        ▲   blocks while                 │  blocks while empty
//!        │   budget is full               ▼
//!        └───── not_full ◄────────── block dropped after use
//! ```
//!
//! # Example
//! ```
//! use memory_manager::{BlockQueue, MemoryBudget};
//!
//! let queue = BlockQueue::new(MemoryBudget::parse("1K").unwrap());
//! queue.push("block-0", 600).unwrap();
//! queue.finish();
//! assert_eq!(queue.pop(), Some("block-0"));
//! assert_eq!(queue.pop(), None);
//! ```

mod budget;
mod error;
pub mod queue;
mod stats;

pub use budget::MemoryBudget;
pub use error::MemoryError;
pub use queue::BlockQueue;
pub use stats::QueueStats;
