// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Sorted merge of partitioned query results
//!
//! When an ORDER BY query runs against horizontally partitioned storage,
//! every partition (region server) sorts its own slice. This crate merges
//! those independently sorted row streams into a single globally ordered
//! stream, lazily and with at most one row of lookahead per partition.
//!
//! # Usage
//!
//! ```ignore
//! use sorted_merge::{collect_rows, SortOrder, SortedMerge, SortedRowSource};
//!
//! let mut merge = SortedMerge::new(SortOrder::ascending(0), partition_sources)?;
//! while merge.advance()? {
//!     emit(merge.current_row());
//! }
//! merge.close()?;
//! ```
//!
//! A [`SortedMerge`] is itself a [`SortedRowSource`], so merges nest.

pub mod exec;
pub mod storage;

pub use exec::{
    collect_rows, compare_values, Column, ErrorRowSource, ExecResult, ExecutionError,
    FetchRowSource, Lane, LaneState, MergeConfig, MergedRows, Row, RowComparator,
    RowCountCache, RowFetcher, Schema, SortItem, SortOrder, SortedMerge, SortedRowSource,
    VecRowSource,
};
pub use storage::{Value, ValueType};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
