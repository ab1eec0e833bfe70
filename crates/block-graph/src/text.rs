// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Line-oriented text source (libsvm-style sparse rows).
//!
//! # Format
//! ```text
//! # comment
//! 1 17:0.5 42:1 99        <- with_label(true): "1" is skipped
//! 17 42 1000000007        <- plain id list
//! ```
//! - One U vertex per non-blank, non-comment line.
//! - Tokens are whitespace-separated; `id:value` keeps only `id`.
//! - With [`TextSource::with_label`] the first token of each line is a
//!   label and is ignored, so a line holding only a label is a U vertex
//!   without neighbours.

use crate::{BlockError, GraphSource, SourceChunk};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A [`GraphSource`] reading sparse rows from any buffered reader.
pub struct TextSource<R: BufRead> {
    reader: R,
    has_label: bool,
    line_no: usize,
    line: String,
    pending: Option<Vec<u64>>,
    exhausted: bool,
}

impl TextSource<BufReader<File>> {
    /// Opens `path` for reading.
    pub fn open(path: &Path) -> Result<Self, BlockError> {
        let file = File::open(path)?;
        tracing::debug!("text source: opened {}", path.display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> TextSource<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            has_label: false,
            line_no: 0,
            line: String::new(),
            pending: None,
            exhausted: false,
        }
    }

    /// Treats the first token of every line as a label to skip.
    pub fn with_label(mut self, has_label: bool) -> Self {
        self.has_label = has_label;
        self
    }

    /// Number of lines consumed so far (including blanks and comments).
    pub fn lines_read(&self) -> usize {
        self.line_no
    }

    /// Reads the next row, skipping blank and comment lines.
    fn read_row(&mut self) -> Result<Option<Vec<u64>>, BlockError> {
        if let Some(row) = self.pending.take() {
            return Ok(Some(row));
        }
        while !self.exhausted {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                self.exhausted = true;
                break;
            }
            self.line_no += 1;

            let content = self.line.trim();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }
            return parse_row(content, self.has_label, self.line_no).map(Some);
        }
        Ok(None)
    }

    /// Returns `true` if at least one more row exists.
    fn has_more(&mut self) -> Result<bool, BlockError> {
        if self.pending.is_none() {
            self.pending = self.read_row()?;
        }
        Ok(self.pending.is_some())
    }
}

impl<R: BufRead> GraphSource for TextSource<R> {
    fn read_next_block(&mut self, max_rows: usize) -> Result<SourceChunk, BlockError> {
        let mut rows = Vec::with_capacity(max_rows.min(4096));
        while rows.len() < max_rows {
            match self.read_row()? {
                Some(row) => rows.push(row),
                None => break,
            }
        }
        let more_available = self.has_more()?;
        Ok(SourceChunk {
            rows,
            more_available,
        })
    }
}

impl<R: BufRead> std::fmt::Debug for TextSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextSource")
            .field("has_label", &self.has_label)
            .field("line_no", &self.line_no)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

fn parse_row(content: &str, has_label: bool, line: usize) -> Result<Vec<u64>, BlockError> {
    let skip = usize::from(has_label);
    content
        .split_whitespace()
        .skip(skip)
        .map(|token| {
            let id = token.split_once(':').map_or(token, |(id, _)| id);
            id.parse::<u64>().map_err(|e| BlockError::Parse {
                line,
                detail: format!("bad vertex id '{token}': {e}"),
            })
        })
        .collect()
}
