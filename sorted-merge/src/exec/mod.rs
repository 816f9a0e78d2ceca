// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query execution layer for partitioned ORDER BY
//!
//! Partition scans produce locally sorted row sources; this module merges
//! them into one globally sorted stream.

pub mod error;
pub mod lane;
pub mod merge_config;
pub mod result;
pub mod row_source;
pub mod sort_order;
pub mod sorted_merge;

// Re-export the main types for convenience
pub use error::{ExecResult, ExecutionError};
pub use lane::{Lane, LaneState};
pub use merge_config::MergeConfig;
pub use result::{Column, Row, Schema};
pub use row_source::{
    collect_rows, ErrorRowSource, FetchRowSource, MergedRows, RowFetcher, SortedRowSource,
    VecRowSource,
};
pub use sort_order::{compare_values, RowComparator, SortItem, SortOrder};
pub use sorted_merge::{RowCountCache, SortedMerge};
