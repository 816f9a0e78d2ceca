//! Partition fixture for merge integration tests
//!
//! Simulates the partitions of one ORDER BY query. Every row is
//! `(key, partition, seq)` so tests can tell which partition produced it.

#![allow(dead_code)]

use sorted_merge::{
    Column, ExecResult, FetchRowSource, Row, RowFetcher, Schema, SortOrder, SortedRowSource,
    Value, ValueType, VecRowSource,
};
use std::cmp::Ordering;

/// Install the test logger once per binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Schema shared by all fixture partitions
pub fn partition_schema() -> Schema {
    Schema::new(vec![
        Column::new("key", ValueType::Integer),
        Column::new("partition", ValueType::Integer),
        Column::new("seq", ValueType::Integer),
    ])
}

pub fn make_row(key: i64, partition: usize, seq: usize) -> Row {
    Row::from_values(vec![
        Value::Integer(key),
        Value::Integer(partition as i64),
        Value::Integer(seq as i64),
    ])
}

pub fn key_of(row: &Row) -> i64 {
    row.values[0].as_integer().expect("integer key")
}

pub fn partition_of(row: &Row) -> usize {
    row.values[1].as_integer().expect("integer partition") as usize
}

pub fn keys(rows: &[Row]) -> Vec<i64> {
    rows.iter().map(key_of).collect()
}

/// In-memory stand-in for a region server scanner
///
/// Reports no row count, like a remote scan that has not finished.
pub struct RemoteScanner {
    rows: Vec<Row>,
    pub round_trips: usize,
}

impl RemoteScanner {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            round_trips: 0,
        }
    }
}

impl RowFetcher for RemoteScanner {
    fn fetch(&mut self, offset: usize, limit: usize) -> ExecResult<Vec<Row>> {
        self.round_trips += 1;
        Ok(self.rows.iter().skip(offset).take(limit).cloned().collect())
    }
}

/// A set of locally sorted partitions
pub struct PartitionFixture {
    pub partitions: Vec<Vec<Row>>,
}

impl PartitionFixture {
    /// Partitions from explicit key lists (each list must already be sorted)
    pub fn from_keys(partitions: &[&[i64]]) -> Self {
        let partitions = partitions
            .iter()
            .enumerate()
            .map(|(p, keys)| {
                keys.iter()
                    .enumerate()
                    .map(|(seq, key)| make_row(*key, p, seq))
                    .collect()
            })
            .collect();
        Self { partitions }
    }

    /// Random partitions with ascending keys drawn from a small range so
    /// that ties across partitions are common
    pub fn random(seed: u64, partition_count: usize, max_rows: usize) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let partitions = (0..partition_count)
            .map(|p| {
                let len = rng.usize(0..=max_rows);
                let mut keys: Vec<i64> = (0..len).map(|_| rng.i64(0..50)).collect();
                keys.sort_unstable();
                keys.into_iter()
                    .enumerate()
                    .map(|(seq, key)| make_row(key, p, seq))
                    .collect()
            })
            .collect();
        Self { partitions }
    }

    pub fn total_rows(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    /// Every partition as a local scan
    pub fn local_sources(&self) -> Vec<Box<dyn SortedRowSource>> {
        self.partitions
            .iter()
            .map(|rows| {
                Box::new(VecRowSource::new(partition_schema(), rows.clone()))
                    as Box<dyn SortedRowSource>
            })
            .collect()
    }

    /// Every partition as a paged remote scan
    pub fn remote_sources(&self, fetch_size: usize) -> Vec<Box<dyn SortedRowSource>> {
        self.partitions
            .iter()
            .map(|rows| {
                Box::new(FetchRowSource::new(
                    partition_schema(),
                    RemoteScanner::new(rows.clone()),
                    fetch_size,
                )) as Box<dyn SortedRowSource>
            })
            .collect()
    }

    /// Reference result: concatenate and stable-sort by key, which orders
    /// ties by partition index and then by position inside the partition
    pub fn expected(&self) -> Vec<Row> {
        let mut all: Vec<Row> = self.partitions.iter().flatten().cloned().collect();
        all.sort_by(|a, b| key_of(a).cmp(&key_of(b)));
        all
    }

    pub fn order() -> SortOrder {
        SortOrder::ascending(0)
    }
}

/// Sort rows by their full identity, for multiset comparison
pub fn canonical(mut rows: Vec<Row>) -> Vec<Row> {
    rows.sort_by(|a, b| {
        for (x, y) in a.values.iter().zip(b.values.iter()) {
            match sorted_merge::compare_values(x, y) {
                Ordering::Equal => continue,
                ordering => return ordering,
            }
        }
        Ordering::Equal
    });
    rows
}
