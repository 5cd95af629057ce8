// Copyright Rivulet, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Plans: the immutable output of statement planning.
//!
//! A plan captures everything the apply stage needs to execute a statement.
//! Plans are constructed once, validated eagerly, and never mutated; a plan
//! that fails any of its invariants is never returned.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use rivulet_repr::{ColumnName, ColumnType, RelationDesc};
use rivulet_storage_types::sources::timestamp::TimestampExtractionPolicy;
use rivulet_storage_types::sources::{Format, KeySerde, SerdeOption};

use crate::ast::SourceKind;

pub mod error;
pub mod statement;
pub mod typeconv;

pub use error::PlanError;
pub use statement::{plan, StatementContext};

/// The result of planning a SQL statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plan {
    /// A plan for a CREATE STREAM/TABLE statement.
    CreateSource(CreateSourcePlan),
}

/// The partitioning key of a source.
///
/// The three states are deliberately distinct: [`Unset`] means key
/// resolution has not happened, [`None`] means the statement declared no
/// key, and [`Column`] binds the declared key to a schema column. Planning
/// never produces [`Unset`].
///
/// [`Unset`]: KeyField::Unset
/// [`None`]: KeyField::None
/// [`Column`]: KeyField::Column
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum KeyField {
    /// No key resolution has been performed.
    #[default]
    Unset,
    /// The statement declares no key column.
    None,
    /// The key is the named schema column.
    Column {
        /// The resolved column name, as it appears in the schema.
        name: ColumnName,
        /// The column's declared type.
        typ: ColumnType,
    },
}

/// A companion command registering a new logical topic, produced when a
/// CREATE STREAM/TABLE statement does not reference an already-registered
/// topic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterTopicPlan {
    /// The logical topic name to register.
    pub topic_name: String,
    /// The physical log topic backing the registration. Planning has
    /// already verified that this topic exists.
    pub kafka_topic: String,
    /// Whether the registration replaces an existing entry. Always `false`
    /// when synthesized during source planning.
    pub replace_existing: bool,
    /// The format of the topic's values.
    pub value_format: Format,
    /// The partition count declared in the statement, if any.
    pub partitions: Option<i32>,
    /// The replication factor declared in the statement, if any.
    pub replication_factor: Option<i16>,
}

/// A plan for a CREATE STREAM/TABLE statement.
///
/// Invariants, enforced during planning:
///
/// * `desc` is non-empty and contains no reserved column names.
/// * `key_field` is never [`KeyField::Unset`], and when it is a column, that
///   column is present in `desc` with its declared type.
/// * `serde_options` contains [`SerdeOption::UnwrapSingleValues`] only when
///   `desc` has exactly one column and the value format supports
///   unwrapping.
/// * When `register_topic` is present, the physical topic it names existed
///   in the log system at planning time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSourcePlan {
    /// The original statement text, retained for audit and replay.
    pub create_sql: String,
    /// Whether the source is a stream or a table.
    pub kind: SourceKind,
    /// The source's name.
    pub name: String,
    /// The logical topic backing the source.
    pub topic_name: String,
    /// The source's schema, in declaration order.
    pub desc: RelationDesc,
    /// The source's partitioning key.
    pub key_field: KeyField,
    /// The companion topic registration, when the topic is not already
    /// registered.
    pub register_topic: Option<RegisterTopicPlan>,
    /// The key serialization strategy.
    pub key_serde: KeySerde,
    /// How each record's event time is derived.
    pub timestamp_policy: TimestampExtractionPolicy,
    /// Behavior flags for value serialization.
    pub serde_options: BTreeSet<SerdeOption>,
}

mod serialize_source_kind {
    // SourceKind lives in the ast module, which stays serde-free; plans are
    // the durable layer, so the impls live here.
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::ast::SourceKind;

    impl Serialize for SourceKind {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match self {
                SourceKind::Stream => "stream".serialize(serializer),
                SourceKind::Table => "table".serialize(serializer),
            }
        }
    }

    impl<'de> Deserialize<'de> for SourceKind {
        fn deserialize<D>(deserializer: D) -> Result<SourceKind, D::Error>
        where
            D: Deserializer<'de>,
        {
            match String::deserialize(deserializer)?.as_str() {
                "stream" => Ok(SourceKind::Stream),
                "table" => Ok(SourceKind::Table),
                other => Err(D::Error::unknown_variant(other, &["stream", "table"])),
            }
        }
    }
}
