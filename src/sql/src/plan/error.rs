// Copyright Rivulet, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::error::Error;
use std::fmt;

use rivulet_repr::{ColumnName, ROWKEY_COLUMN_NAME, ROWTIME_COLUMN_NAME};
use rivulet_storage_types::sources::timestamp::TimestampPolicyError;
use rivulet_storage_types::sources::Format;

/// An error while planning a statement.
///
/// Every variant is a terminal validation failure: planning aborts at the
/// first error and never returns a partial plan.
#[derive(Clone, Debug, PartialEq)]
pub enum PlanError {
    /// The statement declares no columns.
    EmptyColumnList,
    /// A declared column collides with an implicit system column.
    ReservedColumnName(ColumnName),
    /// The declared key column is not present in the schema.
    UnknownKeyColumn(String),
    /// The physical log topic for a fresh registration does not exist.
    TopicNotFound(String),
    /// The wrap-single-value property was used on a multi-column schema.
    InvalidWrapSingleValue {
        /// The schema's column count.
        arity: usize,
    },
    /// The wrap-single-value property was used with a format that cannot
    /// represent unwrapped values.
    FormatDoesNotSupportUnwrapping(Format),
    /// A source with this name is already registered in the catalog.
    SourceAlreadyExists(String),
    /// The named logical topic is not registered in the catalog.
    TopicNotRegistered(String),
    /// A required WITH property is absent.
    MissingRequiredProperty(&'static str),
    /// Timestamp policy resolution failed.
    Timestamp(TimestampPolicyError),
    /// A validation failure without a dedicated variant.
    Unstructured(String),
}

impl PlanError {
    /// Returns a hint for resolving the error, if one applies.
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::TopicNotFound(topic) => Some(format!(
                "Create the topic '{}' in the log system before creating the source.",
                topic
            )),
            Self::MissingRequiredProperty(name) => {
                Some(format!("Add {} to the WITH clause.", name))
            }
            _ => None,
        }
    }
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::EmptyColumnList => f.write_str("the statement does not define any columns"),
            Self::ReservedColumnName(name) => write!(
                f,
                "{}/{} are reserved tokens for implicit columns and cannot be used \
                 as a column name: '{}'",
                ROWTIME_COLUMN_NAME, ROWKEY_COLUMN_NAME, name
            ),
            Self::UnknownKeyColumn(name) => write!(
                f,
                "the KEY column set in the WITH clause does not exist in the schema: '{}'",
                name
            ),
            Self::TopicNotFound(topic) => write!(f, "Kafka topic does not exist: {}", topic),
            Self::InvalidWrapSingleValue { arity } => write!(
                f,
                "'WRAP_SINGLE_VALUE' is only valid for single-field value schemas, \
                 but the schema has {} columns",
                arity
            ),
            Self::FormatDoesNotSupportUnwrapping(format) => write!(
                f,
                "'WRAP_SINGLE_VALUE' cannot be used with format '{}' as it does not \
                 support wrapping",
                format
            ),
            Self::SourceAlreadyExists(name) => write!(f, "source already exists: {}", name),
            Self::TopicNotRegistered(name) => {
                write!(f, "the corresponding topic does not exist: {}", name)
            }
            Self::MissingRequiredProperty(name) => {
                write!(f, "missing required WITH property: {}", name)
            }
            Self::Timestamp(e) => e.fmt(f),
            Self::Unstructured(e) => write!(f, "{}", e),
        }
    }
}

impl Error for PlanError {}

impl From<TimestampPolicyError> for PlanError {
    fn from(e: TimestampPolicyError) -> PlanError {
        PlanError::Timestamp(e)
    }
}

impl From<anyhow::Error> for PlanError {
    fn from(e: anyhow::Error) -> PlanError {
        sql_err!("{:#}", e)
    }
}
