// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Run configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! v_size = 1048576
//! block_size = 100000
//! num_partitions = 8
//! memory_budget = "256M"
//! has_label = true
//! ```

use crate::RuntimeError;
use memory_manager::MemoryBudget;
use std::path::Path;

/// Configuration of one partition run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PartitionConfig {
    /// Size of the reduced V universe; raw ids are folded modulo this.
    pub v_size: usize,
    /// Maximum U rows per block.
    pub block_size: usize,
    /// Number of partitions `K`.
    pub num_partitions: usize,
    /// Bytes of blocks allowed in flight (human-readable, e.g. `"256M"`).
    #[serde(default = "default_budget")]
    pub memory_budget: String,
    /// Whether text input lines start with a label token.
    #[serde(default)]
    pub has_label: bool,
}

fn default_budget() -> String {
    "256M".to_string()
}

impl PartitionConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, RuntimeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RuntimeError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, RuntimeError> {
        toml::from_str(toml_str)
            .map_err(|e| RuntimeError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, RuntimeError> {
        toml::to_string_pretty(self)
            .map_err(|e| RuntimeError::Config(format!("TOML serialise error: {e}")))
    }

    /// Parses the memory budget string into a [`MemoryBudget`].
    pub fn parse_budget(&self) -> Result<MemoryBudget, RuntimeError> {
        MemoryBudget::parse(&self.memory_budget)
            .map_err(|e| RuntimeError::Config(format!("invalid memory budget: {e}")))
    }

    /// Rejects unusable values before any block is read.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.v_size == 0 || self.v_size > u32::MAX as usize {
            return Err(RuntimeError::Config(format!(
                "v_size must be in 1..={}, got {}",
                u32::MAX,
                self.v_size
            )));
        }
        if self.block_size == 0 {
            return Err(RuntimeError::Config("block_size must be positive".into()));
        }
        if self.num_partitions == 0 || self.num_partitions > u32::MAX as usize {
            return Err(RuntimeError::Config(format!(
                "num_partitions must be in 1..={}, got {}",
                u32::MAX,
                self.num_partitions
            )));
        }
        self.parse_budget()?;
        Ok(())
    }
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            v_size: 1 << 20,
            block_size: 100_000,
            num_partitions: 8,
            memory_budget: default_budget(),
            has_label: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let c = PartitionConfig::default();
        c.validate().unwrap();
        assert_eq!(c.parse_budget().unwrap().as_mb(), 256);
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
v_size = 1000
block_size = 64
num_partitions = 4
memory_budget = "1G"
has_label = true
"#;
        let c = PartitionConfig::from_toml(toml).unwrap();
        assert_eq!(c.v_size, 1000);
        assert_eq!(c.block_size, 64);
        assert_eq!(c.num_partitions, 4);
        assert_eq!(c.memory_budget, "1G");
        assert!(c.has_label);
    }

    #[test]
    fn test_from_toml_defaults() {
        let c = PartitionConfig::from_toml("v_size = 10\nblock_size = 2\nnum_partitions = 3\n")
            .unwrap();
        assert_eq!(c.memory_budget, "256M");
        assert!(!c.has_label);
    }

    #[test]
    fn test_from_toml_missing_field() {
        let err = PartitionConfig::from_toml("v_size = 10\n").unwrap_err();
        assert!(matches!(err, RuntimeError::Config(_)));
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let c = PartitionConfig {
            has_label: true,
            ..Default::default()
        };
        let back = PartitionConfig::from_toml(&c.to_toml().unwrap()).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parsa.toml");
        std::fs::write(&path, "v_size = 7\nblock_size = 1\nnum_partitions = 2\n").unwrap();
        assert_eq!(PartitionConfig::from_file(&path).unwrap().v_size, 7);
        assert!(PartitionConfig::from_file(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_validate_rejects_zeroes() {
        for c in [
            PartitionConfig { v_size: 0, ..Default::default() },
            PartitionConfig { block_size: 0, ..Default::default() },
            PartitionConfig { num_partitions: 0, ..Default::default() },
            PartitionConfig { memory_budget: "0".into(), ..Default::default() },
            PartitionConfig { memory_budget: "lots".into(), ..Default::default() },
        ] {
            assert!(matches!(c.validate(), Err(RuntimeError::Config(_))), "{c:?}");
        }
    }
}
