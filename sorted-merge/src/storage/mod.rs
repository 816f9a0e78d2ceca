// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cell value type system shared by partition rows

pub mod value;

pub use value::{Value, ValueType};
