//! Test utilities for sorted-merge integration tests
//!
//! - PartitionFixture: builds sorted partitions and wraps them as local or
//!   remote sources

pub mod partition_fixture;
