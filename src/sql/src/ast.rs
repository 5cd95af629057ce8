// Copyright Rivulet, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Abstract syntax tree nodes for the DDL statements the planner consumes.
//!
//! The parser producing these nodes lives outside this crate; planning
//! treats them as already-validated syntax.

use std::fmt;

use rivulet_storage_types::sources::{Format, WindowKind};

/// An identifier as it appeared in the statement, before normalization.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Ident(String);

impl Ident {
    /// Constructs an identifier from the given string.
    pub fn new<S>(s: S) -> Ident
    where
        S: Into<String>,
    {
        Ident(s.into())
    }

    /// Returns the identifier as a `str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A SQL type declaration.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DataType {
    /// `BOOLEAN`.
    Boolean,
    /// `INT` / `INTEGER`.
    Int,
    /// `BIGINT`.
    Bigint,
    /// `DOUBLE`.
    Double,
    /// `VARCHAR` / `STRING`.
    Varchar,
    /// `TIMESTAMP`.
    Timestamp,
}

/// A column declaration in a CREATE STREAM/TABLE statement.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ColumnDef {
    /// The declared column name.
    pub name: Ident,
    /// The declared SQL type.
    pub data_type: DataType,
}

/// Whether a source is a stream or a table.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum SourceKind {
    /// An append-only stream of records.
    Stream,
    /// A changelog-compacted table keyed by the source's key field.
    Table,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceKind::Stream => f.write_str("STREAM"),
            SourceKind::Table => f.write_str("TABLE"),
        }
    }
}

/// The WITH-clause properties of a CREATE STREAM/TABLE statement.
///
/// Every field is optional at the syntax level except `value_format`, which
/// the parser requires. Cross-field requirements (e.g. `kafka_topic` being
/// mandatory when `registered_topic` is absent) are enforced during
/// planning.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CreateSourceProperties {
    /// A reference to an already-registered logical topic.
    pub registered_topic: Option<String>,
    /// The name of the physical log topic backing the source.
    pub kafka_topic: Option<String>,
    /// The format of the values in the backing topic.
    pub value_format: Format,
    /// The column designated as the partitioning key. May be quoted.
    pub key_column: Option<String>,
    /// The column to derive each record's event time from.
    pub timestamp_column: Option<String>,
    /// The strftime format to parse the timestamp column with.
    pub timestamp_format: Option<String>,
    /// The window kind of the source's key, for windowed sources.
    pub window_kind: Option<WindowKind>,
    /// Whether single-field values are wrapped in an outer record.
    pub wrap_single_values: Option<bool>,
    /// The partition count to create the physical topic with.
    pub partitions: Option<i32>,
    /// The replication factor to create the physical topic with.
    pub replication_factor: Option<i16>,
}

impl CreateSourceProperties {
    /// Constructs properties with the given value format and everything
    /// else unset.
    pub fn new(value_format: Format) -> CreateSourceProperties {
        CreateSourceProperties {
            registered_topic: None,
            kafka_topic: None,
            value_format,
            key_column: None,
            timestamp_column: None,
            timestamp_format: None,
            window_kind: None,
            wrap_single_values: None,
            partitions: None,
            replication_factor: None,
        }
    }
}

/// A CREATE STREAM or CREATE TABLE statement.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CreateSourceStatement {
    /// Whether the source is a stream or a table.
    pub kind: SourceKind,
    /// The unqualified name of the source.
    pub name: Ident,
    /// The declared columns, in declaration order.
    pub columns: Vec<ColumnDef>,
    /// The WITH-clause properties.
    pub properties: CreateSourceProperties,
}

/// A parsed SQL statement.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Statement {
    /// `CREATE STREAM ...` or `CREATE TABLE ...`.
    CreateSource(CreateSourceStatement),
}
