// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Execution error types

use thiserror::Error;

/// Execution errors
///
/// The merge engine adds only construction and close failures of its own;
/// everything a row source raises is returned to the caller unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("Source error: {0}")]
    SourceError(String),

    #[error("Invalid merge: {0}")]
    InvalidMerge(String),

    #[error("Schema mismatch on lane {lane}: expected {expected}, found {actual}")]
    SchemaMismatch {
        lane: usize,
        expected: String,
        actual: String,
    },

    #[error("Failed to close lane {lane}: {message}")]
    CloseFailed { lane: usize, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result alias used throughout the execution layer
pub type ExecResult<T> = Result<T, ExecutionError>;

impl From<serde_json::Error> for ExecutionError {
    fn from(error: serde_json::Error) -> Self {
        ExecutionError::ConfigError(error.to_string())
    }
}
