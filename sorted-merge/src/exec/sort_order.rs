// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Row ordering for ORDER BY merges
//!
//! A [`RowComparator`] imposes a total order over rows. Every lane of one
//! merge must already be sorted by the same comparator.

use crate::exec::result::Row;
use crate::storage::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Total-order comparison over two rows
pub trait RowComparator {
    fn compare(&self, a: &Row, b: &Row) -> Ordering;
}

impl<F> RowComparator for F
where
    F: Fn(&Row, &Row) -> Ordering,
{
    fn compare(&self, a: &Row, b: &Row) -> Ordering {
        self(a, b)
    }
}

/// One ORDER BY key: a column position plus direction and NULL placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortItem {
    pub column: usize,
    pub ascending: bool,
    /// NULL placement is independent of direction
    pub nulls_first: bool,
}

impl SortItem {
    /// Ascending key; NULL sorts low, so it comes first
    pub fn asc(column: usize) -> Self {
        Self {
            column,
            ascending: true,
            nulls_first: true,
        }
    }

    /// Descending key; NULL sorts low, so it comes last
    pub fn desc(column: usize) -> Self {
        Self {
            column,
            ascending: false,
            nulls_first: false,
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls_first = true;
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls_first = false;
        self
    }

    fn compare(&self, a: &Row, b: &Row) -> Ordering {
        let left = a.get_value_at_position(self.column).unwrap_or(&Value::Null);
        let right = b.get_value_at_position(self.column).unwrap_or(&Value::Null);

        match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => {
                if self.nulls_first {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (false, true) => {
                if self.nulls_first {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (false, false) => {
                let ordering = compare_values(left, right);
                if self.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            }
        }
    }
}

/// Multi-column ORDER BY comparator
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortOrder {
    pub items: Vec<SortItem>,
}

impl SortOrder {
    pub fn new(items: Vec<SortItem>) -> Self {
        Self { items }
    }

    /// Ascending order on a single column
    pub fn ascending(column: usize) -> Self {
        Self::new(vec![SortItem::asc(column)])
    }

    /// Descending order on a single column
    pub fn descending(column: usize) -> Self {
        Self::new(vec![SortItem::desc(column)])
    }

    pub fn then(mut self, item: SortItem) -> Self {
        self.items.push(item);
        self
    }
}

impl RowComparator for SortOrder {
    fn compare(&self, a: &Row, b: &Row) -> Ordering {
        for item in &self.items {
            match item.compare(a, b) {
                Ordering::Equal => continue, // Try next sort key
                ordering => return ordering,
            }
        }
        Ordering::Equal
    }
}

/// Compare two values in ascending order
///
/// NULL sorts lowest. Values of unrelated types fall back to a fixed type
/// rank so that the ordering stays total.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => compare_floats(*a, *b),
        (Value::Integer(a), Value::Number(b)) => compare_integer_float(*a, *b),
        (Value::Number(a), Value::Integer(b)) => compare_integer_float(*b, *a).reverse(),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
        (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
        (Value::Array(a), Value::Array(b)) => {
            for (x, y) in a.iter().zip(b.iter()) {
                match compare_values(x, y) {
                    Ordering::Equal => continue,
                    ordering => return ordering,
                }
            }
            a.len().cmp(&b.len())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Numeric order with `-0.0 == 0.0`; NaN sorts past the infinities by sign
fn compare_floats(a: f64, b: f64) -> Ordering {
    if a == b {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

/// Exact comparison of an integer against a float
///
/// Casting the integer to f64 rounds above 2^53, which breaks transitivity.
fn compare_integer_float(i: i64, f: f64) -> Ordering {
    // 2^63, the first f64 past i64::MAX
    const I64_END: f64 = 9_223_372_036_854_775_808.0;

    if f.is_nan() {
        return if f.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if f >= I64_END {
        return Ordering::Less;
    }
    if f < -I64_END {
        return Ordering::Greater;
    }

    let floor = f.floor();
    match i.cmp(&(floor as i64)) {
        Ordering::Equal if f > floor => Ordering::Less,
        ordering => ordering,
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Boolean(_) => 1,
        Value::Integer(_) | Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::DateTime(_) => 4,
        Value::Array(_) => 5,
    }
}
