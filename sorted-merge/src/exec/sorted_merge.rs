// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Sorted Merge - streaming K-way merge of partition results
//!
//! Each partition sorts its own slice of an ORDER BY query. `SortedMerge`
//! turns N such streams into one globally ordered stream without
//! materializing any of them.
//!
//! # Algorithm
//!
//! Every lane holds at most one row of lookahead. On each `advance`:
//! - every `Pending` lane pulls one row (in lane order)
//! - buffered rows are scanned in lane order and the minimum wins; a
//!   candidate only replaces the winner when it sorts strictly before it,
//!   so ties go to the lowest lane index
//! - the winner's row becomes the current row and its lane is `Pending` again
//!
//! Selection is a linear scan, O(N) per row, which suits the fan-out of a
//! partition merge and keeps the tie-break deterministic.

use crate::exec::error::{ExecResult, ExecutionError};
use crate::exec::lane::Lane;
use crate::exec::merge_config::MergeConfig;
use crate::exec::result::{Row, Schema};
use crate::exec::row_source::SortedRowSource;
use crate::exec::sort_order::RowComparator;
use std::cell::Cell;
use std::cmp::Ordering;

/// Memoized aggregate row count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCountCache {
    Uncomputed,
    Known(usize),
    /// At least one lane cannot report its count
    Unknown,
}

/// Merge engine over N independently sorted lanes
///
/// Exposes the same [`SortedRowSource`] contract it consumes, so a merge can
/// be a lane of another merge.
pub struct SortedMerge {
    lanes: Vec<Lane>,
    comparator: Box<dyn RowComparator>,
    current: Option<Row>,
    current_lane: Option<usize>,
    row_count: Cell<RowCountCache>,
}

impl std::fmt::Debug for SortedMerge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortedMerge")
            .field("lanes", &self.lanes.len())
            .field("current_lane", &self.current_lane)
            .field("row_count", &self.row_count.get())
            .finish()
    }
}

impl SortedMerge {
    /// Create a merge with the default configuration
    ///
    /// # Errors
    /// `InvalidMerge` for an empty source list, `SchemaMismatch` when a
    /// lane's schema differs from the first lane's.
    pub fn new<C>(comparator: C, sources: Vec<Box<dyn SortedRowSource>>) -> ExecResult<Self>
    where
        C: RowComparator + 'static,
    {
        Self::with_config(comparator, sources, &MergeConfig::default())
    }

    /// Create a merge over already-open sources
    ///
    /// Lane indexes follow the order of `sources` and decide ties.
    pub fn with_config<C>(
        comparator: C,
        sources: Vec<Box<dyn SortedRowSource>>,
        config: &MergeConfig,
    ) -> ExecResult<Self>
    where
        C: RowComparator + 'static,
    {
        config.validate().map_err(ExecutionError::ConfigError)?;

        if sources.is_empty() {
            return Err(ExecutionError::InvalidMerge(
                "a sorted merge needs at least one source".to_string(),
            ));
        }
        if sources.len() > config.max_lanes {
            return Err(ExecutionError::InvalidMerge(format!(
                "{} sources exceed the limit of {} lanes",
                sources.len(),
                config.max_lanes
            )));
        }

        if config.check_schema {
            let expected = sources[0].schema();
            for (lane, source) in sources.iter().enumerate().skip(1) {
                if source.schema() != expected {
                    return Err(ExecutionError::SchemaMismatch {
                        lane,
                        expected: expected.to_string(),
                        actual: source.schema().to_string(),
                    });
                }
            }
        }

        log::debug!("Creating sorted merge over {} lanes", sources.len());

        let lanes = sources
            .into_iter()
            .enumerate()
            .map(|(index, source)| Lane::new(index, source))
            .collect();

        Ok(Self {
            lanes,
            comparator: Box::new(comparator),
            current: None,
            current_lane: None,
            row_count: Cell::new(RowCountCache::Uncomputed),
        })
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    /// Lane that supplied the current row
    pub fn current_lane(&self) -> Option<usize> {
        self.current_lane
    }

    /// State of the row-count memo
    pub fn row_count_cache(&self) -> RowCountCache {
        self.row_count.get()
    }

    /// Index of the lane holding the smallest buffered row
    fn select_winner(&self) -> Option<usize> {
        let mut winner: Option<(usize, &Row)> = None;
        for lane in &self.lanes {
            let Some(row) = lane.current_row() else {
                continue;
            };
            winner = match winner {
                None => Some((lane.index(), row)),
                Some((_, best)) if self.comparator.compare(row, best) == Ordering::Less => {
                    Some((lane.index(), row))
                }
                keep => keep,
            };
        }
        winner.map(|(index, _)| index)
    }
}

impl SortedRowSource for SortedMerge {
    fn advance(&mut self) -> ExecResult<bool> {
        for lane in self.lanes.iter_mut().filter(|lane| lane.is_pending()) {
            lane.advance()?;
        }

        match self.select_winner() {
            Some(index) => {
                log::trace!("lane {} wins this round", index);
                self.current = self.lanes[index].take_row();
                self.current_lane = Some(index);
                Ok(true)
            }
            None => {
                if self.current_lane.is_some() {
                    log::debug!("sorted merge exhausted");
                }
                self.current = None;
                self.current_lane = None;
                Ok(false)
            }
        }
    }

    fn current_row(&self) -> Option<&Row> {
        self.current.as_ref()
    }

    /// Sum of the lanes' declared counts, computed once per merge
    ///
    /// A sum that does not fit in `usize` is reported as unknown.
    ///
    /// The memo survives `reset`: counts describe the sorted input, not
    /// how far it has been consumed.
    fn row_count(&self) -> Option<usize> {
        match self.row_count.get() {
            RowCountCache::Known(count) => return Some(count),
            RowCountCache::Unknown => return None,
            RowCountCache::Uncomputed => {}
        }

        let mut total = 0usize;
        for lane in &self.lanes {
            match lane
                .declared_row_count()
                .and_then(|count| total.checked_add(count))
            {
                Some(sum) => total = sum,
                None => {
                    self.row_count.set(RowCountCache::Unknown);
                    return None;
                }
            }
        }
        self.row_count.set(RowCountCache::Known(total));
        Some(total)
    }

    fn reset(&mut self) -> ExecResult<()> {
        log::debug!("Resetting sorted merge over {} lanes", self.lanes.len());
        for lane in &mut self.lanes {
            lane.reset()?;
        }
        self.current = None;
        self.current_lane = None;
        Ok(())
    }

    fn close(&mut self) -> ExecResult<()> {
        let mut first_error = None;
        for lane in &mut self.lanes {
            if let Err(error) = lane.close() {
                log::warn!("Failed to close lane {}: {}", lane.index(), error);
                if first_error.is_none() {
                    first_error = Some(error);
                }
            }
        }
        self.current = None;
        self.current_lane = None;

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn needs_close(&self) -> bool {
        self.lanes.iter().all(Lane::needs_close)
    }

    fn schema(&self) -> &Schema {
        self.lanes[0].schema()
    }
}
