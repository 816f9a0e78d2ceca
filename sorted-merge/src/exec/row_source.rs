// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Sorted row sources - the pull contract every merge lane is built on
//!
//! Partition scans hand their locally sorted output to the merge layer
//! through [`SortedRowSource`]. Rows are pulled one at a time, so a merge
//! never materializes a partition's result set.

use crate::exec::error::{ExecResult, ExecutionError};
use crate::exec::merge_config::MergeConfig;
use crate::exec::result::{Row, Schema};
use std::collections::VecDeque;

/// Pull-based cursor over rows that are already sorted
///
/// This is the capability both a partition scan and a merge engine expose,
/// which lets merges nest inside other merges.
///
/// ```ignore
/// let mut source: Box<dyn SortedRowSource> = open_partition_scan()?;
/// while source.advance()? {
///     process(source.current_row());
/// }
/// source.close()?;
/// ```
pub trait SortedRowSource {
    /// Move to the next row. Returns `Ok(false)` once the source is exhausted.
    fn advance(&mut self) -> ExecResult<bool>;

    /// Row under the cursor
    ///
    /// Returns `None` before the first successful [`advance`](Self::advance)
    /// and after the source reported exhaustion.
    fn current_row(&self) -> Option<&Row>;

    /// Total number of rows this source produces, if known without scanning
    fn row_count(&self) -> Option<usize>;

    /// Rewind to the source-defined start position
    fn reset(&mut self) -> ExecResult<()>;

    /// Release the underlying resources
    fn close(&mut self) -> ExecResult<()>;

    /// Whether the source still holds a resource that must be closed
    fn needs_close(&self) -> bool;

    /// Column layout of the rows produced
    fn schema(&self) -> &Schema;
}

impl<S: SortedRowSource + ?Sized> SortedRowSource for Box<S> {
    fn advance(&mut self) -> ExecResult<bool> {
        (**self).advance()
    }

    fn current_row(&self) -> Option<&Row> {
        (**self).current_row()
    }

    fn row_count(&self) -> Option<usize> {
        (**self).row_count()
    }

    fn reset(&mut self) -> ExecResult<()> {
        (**self).reset()
    }

    fn close(&mut self) -> ExecResult<()> {
        (**self).close()
    }

    fn needs_close(&self) -> bool {
        (**self).needs_close()
    }

    fn schema(&self) -> &Schema {
        (**self).schema()
    }
}

/// Local partition scan over materialized rows
///
/// Reports an exact row count. Used for partitions scanned in-process and
/// for result sets that have already been fetched in full.
#[derive(Debug, Clone)]
pub struct VecRowSource {
    schema: Schema,
    rows: Vec<Row>,
    position: Option<usize>,
    closed: bool,
}

impl VecRowSource {
    pub fn new(schema: Schema, rows: Vec<Row>) -> Self {
        Self {
            schema,
            rows,
            position: None,
            closed: false,
        }
    }

    /// Source that produces no rows
    pub fn empty(schema: Schema) -> Self {
        Self::new(schema, Vec::new())
    }
}

impl SortedRowSource for VecRowSource {
    fn advance(&mut self) -> ExecResult<bool> {
        if self.closed {
            return Err(ExecutionError::SourceError(
                "advance called on a closed scan".to_string(),
            ));
        }

        let next = self.position.map_or(0, |p| p + 1);
        if next < self.rows.len() {
            self.position = Some(next);
            Ok(true)
        } else {
            self.position = Some(self.rows.len());
            Ok(false)
        }
    }

    fn current_row(&self) -> Option<&Row> {
        self.position.and_then(|p| self.rows.get(p))
    }

    fn row_count(&self) -> Option<usize> {
        Some(self.rows.len())
    }

    fn reset(&mut self) -> ExecResult<()> {
        if self.closed {
            return Err(ExecutionError::SourceError(
                "reset called on a closed scan".to_string(),
            ));
        }
        self.position = None;
        Ok(())
    }

    fn close(&mut self) -> ExecResult<()> {
        self.closed = true;
        self.position = None;
        Ok(())
    }

    fn needs_close(&self) -> bool {
        !self.closed
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// Paged access to a remote partition scanner
///
/// Region servers return rows in pages; `offset` counts rows already
/// delivered by this scan.
pub trait RowFetcher {
    /// Fetch up to `limit` rows starting at `offset`. A short page means
    /// the scan is finished.
    fn fetch(&mut self, offset: usize, limit: usize) -> ExecResult<Vec<Row>>;

    /// Row count reported by the remote side, if it has one
    fn row_count(&self) -> Option<usize> {
        None
    }

    /// Release the remote scanner
    fn close(&mut self) -> ExecResult<()> {
        Ok(())
    }
}

/// Row source pulling pages from a [`RowFetcher`]
///
/// Holds at most one page in memory. A fetch only happens when the
/// buffered page is used up, so pulls stay lazy.
pub struct FetchRowSource<F: RowFetcher> {
    schema: Schema,
    fetcher: F,
    fetch_size: usize,
    fetched: usize,
    page: VecDeque<Row>,
    current: Option<Row>,
    drained: bool,
    closed: bool,
}

impl<F: RowFetcher> FetchRowSource<F> {
    pub fn new(schema: Schema, fetcher: F, fetch_size: usize) -> Self {
        Self {
            schema,
            fetcher,
            fetch_size: fetch_size.max(1),
            fetched: 0,
            page: VecDeque::new(),
            current: None,
            drained: false,
            closed: false,
        }
    }

    /// Create a source using the configured page size
    pub fn with_config(schema: Schema, fetcher: F, config: &MergeConfig) -> Self {
        Self::new(schema, fetcher, config.fetch_size)
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn fetch_page(&mut self) -> ExecResult<()> {
        let rows = self.fetcher.fetch(self.fetched, self.fetch_size)?;
        log::trace!(
            "fetched {} rows at offset {} (page size {})",
            rows.len(),
            self.fetched,
            self.fetch_size
        );
        if rows.len() < self.fetch_size {
            self.drained = true;
        }
        self.fetched += rows.len();
        self.page.extend(rows);
        Ok(())
    }
}

impl<F: RowFetcher> SortedRowSource for FetchRowSource<F> {
    fn advance(&mut self) -> ExecResult<bool> {
        if self.closed {
            return Err(ExecutionError::SourceError(
                "advance called on a closed remote scan".to_string(),
            ));
        }

        if self.page.is_empty() && !self.drained {
            self.fetch_page()?;
        }
        self.current = self.page.pop_front();
        Ok(self.current.is_some())
    }

    fn current_row(&self) -> Option<&Row> {
        self.current.as_ref()
    }

    fn row_count(&self) -> Option<usize> {
        self.fetcher.row_count()
    }

    fn reset(&mut self) -> ExecResult<()> {
        if self.closed {
            return Err(ExecutionError::SourceError(
                "reset called on a closed remote scan".to_string(),
            ));
        }
        self.fetched = 0;
        self.page.clear();
        self.current = None;
        self.drained = false;
        Ok(())
    }

    fn close(&mut self) -> ExecResult<()> {
        if self.closed {
            return Ok(());
        }
        self.page.clear();
        self.current = None;
        self.fetcher.close()?;
        self.closed = true;
        Ok(())
    }

    fn needs_close(&self) -> bool {
        !self.closed
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// Source that fails instead of producing rows
///
/// Stands in for a partition whose scan or scanner release breaks, so the
/// error propagation of the layers above can be exercised.
#[derive(Debug)]
pub struct ErrorRowSource {
    schema: Schema,
    advance_error: Option<ExecutionError>,
    close_error: Option<ExecutionError>,
    closed: bool,
}

impl ErrorRowSource {
    /// Fails on the first `advance`
    pub fn new(schema: Schema, error: ExecutionError) -> Self {
        Self {
            schema,
            advance_error: Some(error),
            close_error: None,
            closed: false,
        }
    }

    /// Produces no rows but fails every `close`
    pub fn failing_close(schema: Schema, error: ExecutionError) -> Self {
        Self {
            schema,
            advance_error: None,
            close_error: Some(error),
            closed: false,
        }
    }
}

impl SortedRowSource for ErrorRowSource {
    fn advance(&mut self) -> ExecResult<bool> {
        match self.advance_error.take() {
            Some(error) => Err(error),
            None => Ok(false),
        }
    }

    fn current_row(&self) -> Option<&Row> {
        None
    }

    fn row_count(&self) -> Option<usize> {
        None
    }

    fn reset(&mut self) -> ExecResult<()> {
        Ok(())
    }

    fn close(&mut self) -> ExecResult<()> {
        match &self.close_error {
            Some(error) => Err(error.clone()),
            None => {
                self.closed = true;
                Ok(())
            }
        }
    }

    fn needs_close(&self) -> bool {
        !self.closed
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// Iterator view over a sorted source
///
/// Yields owned copies of each row. Iteration stops after exhaustion or
/// after the first error.
pub struct MergedRows<'a, S: SortedRowSource + ?Sized> {
    source: &'a mut S,
    done: bool,
}

impl<'a, S: SortedRowSource + ?Sized> MergedRows<'a, S> {
    pub fn new(source: &'a mut S) -> Self {
        Self {
            source,
            done: false,
        }
    }
}

impl<S: SortedRowSource + ?Sized> Iterator for MergedRows<'_, S> {
    type Item = ExecResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.source.advance() {
            Ok(true) => self.source.current_row().cloned().map(Ok),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(error) => {
                self.done = true;
                Some(Err(error))
            }
        }
    }
}

/// Drain a source into a vector
pub fn collect_rows<S>(source: &mut S) -> ExecResult<Vec<Row>>
where
    S: SortedRowSource + ?Sized,
{
    MergedRows::new(source).collect()
}
