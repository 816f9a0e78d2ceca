// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Merge configuration

use crate::exec::error::{ExecResult, ExecutionError};
use serde::{Deserialize, Serialize};

/// Configuration for sorted merges and the sources feeding them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Reject construction when a lane's schema differs from lane 0's
    pub check_schema: bool,

    /// Upper bound on the partition fan-out of a single merge
    pub max_lanes: usize,

    /// Rows requested per round trip by remote sources
    pub fetch_size: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            check_schema: true,
            max_lanes: 1024,
            fetch_size: 100,
        }
    }
}

impl MergeConfig {
    /// Configuration that trusts the planner's schema guarantee
    pub fn unchecked() -> Self {
        Self {
            check_schema: false,
            ..Self::default()
        }
    }

    /// Parse a JSON document; absent fields keep their defaults
    pub fn from_json(json: &str) -> ExecResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate().map_err(ExecutionError::ConfigError)?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_lanes == 0 {
            return Err("max_lanes must be > 0".to_string());
        }
        if self.fetch_size == 0 {
            return Err("fetch_size must be > 0".to_string());
        }
        Ok(())
    }
}
