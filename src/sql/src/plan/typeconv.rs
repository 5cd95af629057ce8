// Copyright Rivulet, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Conversion from SQL type declarations to the engine's logical types.

use rivulet_repr::ScalarType;

use crate::ast::DataType;

/// Converts a SQL type declaration to its logical scalar type.
///
/// Total over the closed [`DataType`] set: every declaration the parser
/// accepts has a logical counterpart.
pub fn scalar_type_from_sql(data_type: &DataType) -> ScalarType {
    match data_type {
        DataType::Boolean => ScalarType::Bool,
        DataType::Int => ScalarType::Int32,
        DataType::Bigint => ScalarType::Int64,
        DataType::Double => ScalarType::Float64,
        DataType::Varchar => ScalarType::String,
        DataType::Timestamp => ScalarType::Timestamp,
    }
}
