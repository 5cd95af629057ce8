// Copyright Rivulet, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Policies for deriving each record's event time.

use std::error::Error;
use std::fmt;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use rivulet_repr::{ColumnName, RelationDesc};

/// The strategy for deriving a record's event time.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Hash)]
pub enum TimestampExtractionPolicy {
    /// Use the time at which the record was appended to the log.
    IngestionTime,
    /// Read the event time from the named column, optionally parsing it
    /// with a strftime format string.
    Column {
        /// The schema column holding the event time.
        column: ColumnName,
        /// The strftime format to parse string-typed columns with.
        format: Option<String>,
    },
}

impl TimestampExtractionPolicy {
    /// Resolves the timestamp policy for a source with the given schema.
    ///
    /// With no declared column the policy is [`IngestionTime`]. A declared
    /// column must exist in `desc` (matched case insensitively), and a
    /// declared format must be a parseable strftime format. A format
    /// without a column has nothing to apply to and is rejected.
    ///
    /// [`IngestionTime`]: TimestampExtractionPolicy::IngestionTime
    pub fn create(
        desc: &RelationDesc,
        column: Option<&str>,
        format: Option<&str>,
    ) -> Result<TimestampExtractionPolicy, TimestampPolicyError> {
        let column = match column {
            Some(column) => column,
            None => {
                if format.is_some() {
                    return Err(TimestampPolicyError::FormatWithoutColumn);
                }
                return Ok(TimestampExtractionPolicy::IngestionTime);
            }
        };

        let (name, _typ) = desc
            .get_by_name_ignore_case(column)
            .ok_or_else(|| TimestampPolicyError::UnknownColumn(column.into()))?;

        if let Some(format) = format {
            if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                return Err(TimestampPolicyError::InvalidFormat(format.into()));
            }
        }

        Ok(TimestampExtractionPolicy::Column {
            column: name.clone(),
            format: format.map(|f| f.into()),
        })
    }
}

/// An error while resolving a timestamp extraction policy.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TimestampPolicyError {
    /// The declared timestamp column is not present in the schema.
    UnknownColumn(String),
    /// The declared format string is not a valid strftime format.
    InvalidFormat(String),
    /// A format string was declared without a timestamp column.
    FormatWithoutColumn,
}

impl fmt::Display for TimestampPolicyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TimestampPolicyError::UnknownColumn(name) => {
                write!(f, "the TIMESTAMP column does not exist in the schema: '{}'", name)
            }
            TimestampPolicyError::InvalidFormat(format) => {
                write!(f, "invalid TIMESTAMP_FORMAT: '{}'", format)
            }
            TimestampPolicyError::FormatWithoutColumn => {
                f.write_str("TIMESTAMP_FORMAT requires a TIMESTAMP column")
            }
        }
    }
}

impl Error for TimestampPolicyError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rivulet_repr::ScalarType;

    fn desc() -> RelationDesc {
        RelationDesc::empty()
            .with_column("ID", ScalarType::Int64.nullable(false))
            .with_column("TS", ScalarType::String.nullable(true))
    }

    #[test]
    fn test_defaults_to_ingestion_time() {
        let policy = TimestampExtractionPolicy::create(&desc(), None, None).unwrap();
        assert_eq!(policy, TimestampExtractionPolicy::IngestionTime);
    }

    #[test]
    fn test_resolves_column_case_insensitively() {
        let policy = TimestampExtractionPolicy::create(&desc(), Some("ts"), None).unwrap();
        assert_eq!(
            policy,
            TimestampExtractionPolicy::Column {
                column: ColumnName::from("TS"),
                format: None,
            }
        );
    }

    #[test]
    fn test_unknown_column() {
        let err = TimestampExtractionPolicy::create(&desc(), Some("NOPE"), None).unwrap_err();
        assert_eq!(err, TimestampPolicyError::UnknownColumn("NOPE".into()));
    }

    #[test]
    fn test_format_validation() {
        let policy =
            TimestampExtractionPolicy::create(&desc(), Some("TS"), Some("%Y-%m-%d %H:%M:%S"))
                .unwrap();
        assert_eq!(
            policy,
            TimestampExtractionPolicy::Column {
                column: ColumnName::from("TS"),
                format: Some("%Y-%m-%d %H:%M:%S".into()),
            }
        );

        let err = TimestampExtractionPolicy::create(&desc(), Some("TS"), Some("%Q")).unwrap_err();
        assert_eq!(err, TimestampPolicyError::InvalidFormat("%Q".into()));
    }

    #[test]
    fn test_format_without_column() {
        let err = TimestampExtractionPolicy::create(&desc(), None, Some("%s")).unwrap_err();
        assert_eq!(err, TimestampPolicyError::FormatWithoutColumn);
    }
}
