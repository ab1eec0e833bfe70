// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Memory budget configuration and parsing.
//!
//! A [`MemoryBudget`] caps the number of bytes the loader may hold in
//! flight (queued but not yet partitioned). It parses human-readable
//! sizes so configs and CLI flags can say `"256M"` instead of a byte count.

use crate::MemoryError;
use std::fmt;

const KB: usize = 1024;
const MB: usize = 1024 * KB;
const GB: usize = 1024 * MB;

/// Suffixes accepted by [`MemoryBudget::parse`], longest first so that
/// `"MB"` is tried before `"B"`.
const SUFFIXES: &[(&str, usize)] = &[
    ("GB", GB),
    ("MB", MB),
    ("KB", KB),
    ("G", GB),
    ("M", MB),
    ("K", KB),
    ("B", 1),
];

/// An upper bound on queued block memory.
///
/// # Examples
/// ```
/// use memory_manager::MemoryBudget;
///
/// let b = MemoryBudget::parse("64M").unwrap();
/// assert_eq!(b.as_bytes(), 64 * 1024 * 1024);
/// assert_eq!(b.to_string(), "64 MB");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MemoryBudget {
    bytes: usize,
}

impl MemoryBudget {
    /// Creates a budget from a byte count.
    pub fn from_bytes(bytes: usize) -> Self {
        Self { bytes }
    }

    /// Creates a budget from megabytes.
    pub fn from_mb(mb: usize) -> Self {
        Self { bytes: mb * MB }
    }

    /// Creates a budget from gigabytes.
    pub fn from_gb(gb: usize) -> Self {
        Self { bytes: gb * GB }
    }

    /// Returns the budget in bytes.
    pub fn as_bytes(&self) -> usize {
        self.bytes
    }

    /// Returns the budget in megabytes (truncated).
    pub fn as_mb(&self) -> usize {
        self.bytes / MB
    }

    /// Parses a human-readable budget string.
    ///
    /// Accepts a plain byte count or a number followed by one of
    /// `K`, `KB`, `M`, `MB`, `G`, `GB`, `B` (case-insensitive).
    pub fn parse(s: &str) -> Result<Self, MemoryError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MemoryError::InvalidBudget(s.to_string()));
        }

        let upper = trimmed.to_ascii_uppercase();
        let (digits, multiplier) = SUFFIXES
            .iter()
            .find(|(suffix, _)| upper.ends_with(suffix))
            .map(|&(suffix, mult)| (&trimmed[..trimmed.len() - suffix.len()], mult))
            .unwrap_or((trimmed, 1));

        let value: usize = digits
            .trim()
            .parse()
            .map_err(|_| MemoryError::InvalidBudget(s.to_string()))?;
        let bytes = value
            .checked_mul(multiplier)
            .ok_or_else(|| MemoryError::InvalidBudget(s.to_string()))?;

        if bytes == 0 {
            return Err(MemoryError::ZeroBudget);
        }
        Ok(Self { bytes })
    }
}

impl fmt::Display for MemoryBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bytes {
            b if b >= GB && b % GB == 0 => write!(f, "{} GB", b / GB),
            b if b >= MB && b % MB == 0 => write!(f, "{} MB", b / MB),
            b if b >= KB && b % KB == 0 => write!(f, "{} KB", b / KB),
            b => write!(f, "{b} B"),
        }
    }
}
