// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Merge lanes - single-row lookahead over one sorted source

use crate::exec::error::{ExecResult, ExecutionError};
use crate::exec::result::{Row, Schema};
use crate::exec::row_source::SortedRowSource;

/// Lookahead state of a lane
#[derive(Debug, Clone, PartialEq)]
pub enum LaneState {
    /// Nothing pulled since the last row was consumed
    Pending,
    /// A pulled row waiting to be chosen as merge output
    Buffered(Row),
    /// The source reported no more rows; terminal until reset
    Exhausted,
}

/// One sorted input of a merge
///
/// Pure I/O plus a one-row buffer; lanes never compare rows themselves.
pub struct Lane {
    index: usize,
    source: Box<dyn SortedRowSource>,
    state: LaneState,
}

impl Lane {
    pub fn new(index: usize, source: Box<dyn SortedRowSource>) -> Self {
        Self {
            index,
            source,
            state: LaneState::Pending,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> &LaneState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, LaneState::Pending)
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, LaneState::Exhausted)
    }

    /// Pull the next row from the source into the buffer
    ///
    /// Source errors are returned as-is and leave the lane state untouched.
    pub fn advance(&mut self) -> ExecResult<bool> {
        if !self.source.advance()? {
            log::debug!("lane {} exhausted", self.index);
            self.state = LaneState::Exhausted;
            return Ok(false);
        }

        match self.source.current_row() {
            Some(row) => {
                self.state = LaneState::Buffered(row.clone());
                Ok(true)
            }
            None => Err(ExecutionError::SourceError(format!(
                "lane {} advanced but exposes no current row",
                self.index
            ))),
        }
    }

    /// Buffered row, if any
    pub fn current_row(&self) -> Option<&Row> {
        match &self.state {
            LaneState::Buffered(row) => Some(row),
            _ => None,
        }
    }

    /// Hand the buffered row out and go back to `Pending`
    pub fn take_row(&mut self) -> Option<Row> {
        match std::mem::replace(&mut self.state, LaneState::Pending) {
            LaneState::Buffered(row) => Some(row),
            other => {
                self.state = other;
                None
            }
        }
    }

    pub fn declared_row_count(&self) -> Option<usize> {
        self.source.row_count()
    }

    /// Rewind the source and drop any lookahead
    pub fn reset(&mut self) -> ExecResult<()> {
        self.source.reset()?;
        self.state = LaneState::Pending;
        Ok(())
    }

    pub fn close(&mut self) -> ExecResult<()> {
        self.source.close()
    }

    pub fn needs_close(&self) -> bool {
        self.source.needs_close()
    }

    pub fn schema(&self) -> &Schema {
        self.source.schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::result::Column;
    use crate::exec::row_source::{ErrorRowSource, VecRowSource};
    use crate::storage::{Value, ValueType};

    fn schema() -> Schema {
        Schema::new(vec![Column::new("v", ValueType::Integer)])
    }

    fn row(v: i64) -> Row {
        Row::from_values(vec![Value::Integer(v)])
    }

    fn lane(values: &[i64]) -> Lane {
        let rows = values.iter().map(|v| row(*v)).collect();
        Lane::new(0, Box::new(VecRowSource::new(schema(), rows)))
    }

    #[test]
    fn test_lane_lifecycle() {
        let mut lane = lane(&[4, 8]);
        assert!(lane.is_pending());
        assert!(lane.current_row().is_none());

        assert!(lane.advance().unwrap());
        assert_eq!(lane.state(), &LaneState::Buffered(row(4)));

        assert_eq!(lane.take_row(), Some(row(4)));
        assert!(lane.is_pending());
        assert!(lane.current_row().is_none());

        assert!(lane.advance().unwrap());
        assert_eq!(lane.take_row(), Some(row(8)));

        assert!(!lane.advance().unwrap());
        assert!(lane.is_exhausted());
        assert_eq!(lane.take_row(), None);
        assert!(lane.is_exhausted());
    }

    #[test]
    fn test_lane_reset_returns_to_pending() {
        let mut lane = lane(&[1]);
        lane.advance().unwrap();
        lane.take_row();
        lane.advance().unwrap();
        assert!(lane.is_exhausted());

        lane.reset().unwrap();
        assert!(lane.is_pending());
        assert!(lane.advance().unwrap());
        assert_eq!(lane.current_row(), Some(&row(1)));
    }

    #[test]
    fn test_lane_propagates_source_error() {
        let error = ExecutionError::SourceError("scanner expired".to_string());
        let mut lane = Lane::new(3, Box::new(ErrorRowSource::new(schema(), error.clone())));

        assert_eq!(lane.advance(), Err(error));
        assert!(lane.is_pending());
        assert_eq!(lane.index(), 3);
        assert_eq!(lane.declared_row_count(), None);
    }

    /// Claims a row on every advance but never exposes one
    struct RowlessSource {
        schema: Schema,
    }

    impl SortedRowSource for RowlessSource {
        fn advance(&mut self) -> ExecResult<bool> {
            Ok(true)
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
            Ok(())
        }
        fn needs_close(&self) -> bool {
            false
        }
        fn schema(&self) -> &Schema {
            &self.schema
        }
    }

    #[test]
    fn test_lane_rejects_source_without_current_row() {
        let mut lane = Lane::new(2, Box::new(RowlessSource { schema: schema() }));

        let err = lane.advance().unwrap_err();
        assert!(matches!(err, ExecutionError::SourceError(_)));
        assert!(!lane.is_exhausted());
        assert!(lane.is_pending());
    }

    #[test]
    fn test_lane_close_delegates() {
        let mut lane = lane(&[1, 2]);
        assert_eq!(lane.declared_row_count(), Some(2));
        assert!(lane.needs_close());
        lane.close().unwrap();
        assert!(!lane.needs_close());
    }
}
