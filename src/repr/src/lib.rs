// Copyright Rivulet, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The core logical data representation for rivulet.
//!
//! Sources and queries describe the shape of their data with a
//! [`RelationDesc`], an ordered association of column names with column
//! types. The scalar type system lives in [`ScalarType`].

mod relation;
mod scalar;

pub use crate::relation::{
    is_reserved_column_name, ColumnName, RelationDesc, RelationType, ROWKEY_COLUMN_NAME,
    ROWTIME_COLUMN_NAME,
};
pub use crate::scalar::{ColumnType, ScalarType};
