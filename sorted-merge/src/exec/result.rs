// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Rows and result-set metadata produced by partition scans

use crate::storage::{Value, ValueType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed-arity, positional row of typed values
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    /// Create a row from positional values
    pub fn from_values(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Get a value by column position
    pub fn get_value_at_position(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }

    /// Number of values in this row
    pub fn arity(&self) -> usize {
        self.values.len()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::from_values(values)
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: ValueType,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: ValueType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Column layout shared by every row of a result
///
/// All partitions of one ORDER BY query are planned with an identical
/// schema, so a merge adopts the schema of its first lane.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(|c| c.name.as_str())
    }

    pub fn column_type(&self, index: usize) -> Option<ValueType> {
        self.columns.get(index).map(|c| c.data_type)
    }

    /// Position of a column by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", column.name, column.data_type)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lookup() {
        let schema = Schema::new(vec![
            Column::new("id", ValueType::Integer),
            Column::new("name", ValueType::String),
        ]);

        assert_eq!(schema.column_count(), 2);
        assert_eq!(schema.index_of("name"), Some(1));
        assert_eq!(schema.column_type(0), Some(ValueType::Integer));
        assert_eq!(schema.column_name(5), None);
        assert_eq!(schema.to_string(), "[id: Integer, name: String]");
    }

    #[test]
    fn test_row_display() {
        let row = Row::from_values(vec![Value::Integer(1), Value::from("x"), Value::Null]);
        assert_eq!(row.arity(), 3);
        assert_eq!(row.to_string(), "(1, \"x\", NULL)");
    }
}
