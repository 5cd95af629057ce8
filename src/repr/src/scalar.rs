// Copyright Rivulet, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The type of a value that can appear in a source column.
///
/// This is the closed set of types the DDL surface accepts today. Adding a
/// type here requires a corresponding SQL spelling in the sql crate's
/// `DataType`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Hash)]
pub enum ScalarType {
    /// A boolean value.
    Bool,
    /// A 32-bit signed integer.
    Int32,
    /// A 64-bit signed integer.
    Int64,
    /// A 64-bit floating point number.
    Float64,
    /// A variable-length string.
    String,
    /// A millisecond-precision timestamp.
    Timestamp,
}

impl ScalarType {
    /// Derives a [`ColumnType`] from this scalar type with the specified
    /// nullability.
    pub fn nullable(self, nullable: bool) -> ColumnType {
        ColumnType {
            scalar_type: self,
            nullable,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ScalarType::Bool => "boolean",
            ScalarType::Int32 => "integer",
            ScalarType::Int64 => "bigint",
            ScalarType::Float64 => "double",
            ScalarType::String => "varchar",
            ScalarType::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// The type of a column: a scalar type paired with its nullability.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Hash)]
pub struct ColumnType {
    /// The underlying scalar type.
    pub scalar_type: ScalarType,
    /// Whether the column may be null.
    pub nullable: bool,
}

impl From<ScalarType> for ColumnType {
    fn from(scalar_type: ScalarType) -> ColumnType {
        scalar_type.nullable(true)
    }
}
