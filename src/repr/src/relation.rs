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

use crate::scalar::ColumnType;

/// The name of the implicit column carrying each record's event time.
pub const ROWTIME_COLUMN_NAME: &str = "ROWTIME";

/// The name of the implicit column carrying each record's log key.
pub const ROWKEY_COLUMN_NAME: &str = "ROWKEY";

/// Reports whether `name` collides, case insensitively, with one of the
/// implicit system columns that every source exposes.
pub fn is_reserved_column_name(name: &ColumnName) -> bool {
    name.as_str().eq_ignore_ascii_case(ROWTIME_COLUMN_NAME)
        || name.as_str().eq_ignore_ascii_case(ROWKEY_COLUMN_NAME)
}

/// The name of a column in a [`RelationDesc`].
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Hash)]
pub struct ColumnName(String);

impl ColumnName {
    /// Returns this column name as a `str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ColumnName {
    fn from(s: String) -> ColumnName {
        ColumnName(s)
    }
}

impl From<&str> for ColumnName {
    fn from(s: &str) -> ColumnName {
        ColumnName(s.into())
    }
}

impl From<&ColumnName> for ColumnName {
    fn from(n: &ColumnName) -> ColumnName {
        n.clone()
    }
}

/// The type of a relation: the types of its columns, in order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Hash, Default)]
pub struct RelationType {
    /// The types for each column, in order.
    pub column_types: Vec<ColumnType>,
}

impl RelationType {
    /// Constructs a `RelationType` representing the relation with no columns.
    pub fn empty() -> Self {
        RelationType::new(vec![])
    }

    /// Constructs a new `RelationType` from specified column types.
    pub fn new(column_types: Vec<ColumnType>) -> Self {
        RelationType { column_types }
    }

    /// Computes the number of columns in the relation.
    pub fn arity(&self) -> usize {
        self.column_types.len()
    }
}

/// A description of the shape of a relation.
///
/// It bundles a [`RelationType`] with the name of each column in the
/// relation. Column order is semantically meaningful: it is the order in
/// which values are serialized.
///
/// # Examples
///
/// A `RelationDesc` is typically constructed via its builder API:
///
/// ```
/// use rivulet_repr::{RelationDesc, ScalarType};
///
/// let desc = RelationDesc::empty()
///     .with_column("id", ScalarType::Int64.nullable(false))
///     .with_column("price", ScalarType::Float64.nullable(true));
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Hash)]
pub struct RelationDesc {
    typ: RelationType,
    names: Vec<ColumnName>,
}

impl RelationDesc {
    /// Constructs a new `RelationDesc` that represents the empty relation
    /// with no columns.
    pub fn empty() -> Self {
        RelationDesc {
            typ: RelationType::empty(),
            names: vec![],
        }
    }

    /// Constructs a new `RelationDesc` from a `RelationType` and an iterator
    /// over column names.
    ///
    /// # Panics
    ///
    /// Panics if the arity of the `RelationType` is not equal to the number
    /// of items in `names`.
    pub fn new<I, N>(typ: RelationType, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<ColumnName>,
    {
        let names: Vec<_> = names.into_iter().map(|name| name.into()).collect();
        assert_eq!(typ.column_types.len(), names.len());
        RelationDesc { typ, names }
    }

    /// Constructs a new `RelationDesc` from an iterator of (name, type)
    /// pairs.
    pub fn from_names_and_types<I, T, N>(iter: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        T: Into<ColumnType>,
        N: Into<ColumnName>,
    {
        let (names, types): (Vec<_>, Vec<_>) = iter.into_iter().unzip();
        let types = types.into_iter().map(Into::into).collect();
        let typ = RelationType::new(types);
        Self::new(typ, names)
    }

    /// Appends a column with the specified name and type.
    pub fn with_column<N>(mut self, name: N, column_type: ColumnType) -> Self
    where
        N: Into<ColumnName>,
    {
        self.typ.column_types.push(column_type);
        self.names.push(name.into());
        self
    }

    /// Computes the number of columns in the relation.
    pub fn arity(&self) -> usize {
        self.typ.arity()
    }

    /// Returns the relation type underlying this relation description.
    pub fn typ(&self) -> &RelationType {
        &self.typ
    }

    /// Returns an iterator over the columns in this relation.
    pub fn iter(&self) -> impl Iterator<Item = (&ColumnName, &ColumnType)> {
        self.iter_names().zip(self.iter_types())
    }

    /// Returns an iterator over the types of the columns in this relation.
    pub fn iter_types(&self) -> impl Iterator<Item = &ColumnType> {
        self.typ.column_types.iter()
    }

    /// Returns an iterator over the names of the columns in this relation.
    pub fn iter_names(&self) -> impl Iterator<Item = &ColumnName> {
        self.names.iter()
    }

    /// Finds a column by name.
    ///
    /// Returns the index and type of the column named `name`. If no column
    /// with the specified name exists, returns `None`. If multiple columns
    /// have the specified name, the leftmost column is returned.
    pub fn get_by_name(&self, name: &ColumnName) -> Option<(usize, &ColumnType)> {
        self.iter_names()
            .position(|n| n == name)
            .map(|i| (i, &self.typ.column_types[i]))
    }

    /// Finds a column by name, ignoring ASCII case.
    ///
    /// Identifier resolution in the SQL layer is case insensitive, so
    /// lookups driven by user-supplied names go through this method.
    pub fn get_by_name_ignore_case(&self, name: &str) -> Option<(&ColumnName, &ColumnType)> {
        self.iter()
            .find(|(n, _)| n.as_str().eq_ignore_ascii_case(name))
    }

    /// Gets the name of the `i`th column.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not a valid column index.
    pub fn get_name(&self, i: usize) -> &ColumnName {
        &self.names[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::ScalarType;

    #[test]
    fn test_builder_preserves_order() {
        let desc = RelationDesc::empty()
            .with_column("a", ScalarType::Int64.nullable(false))
            .with_column("b", ScalarType::String.nullable(true))
            .with_column("c", ScalarType::Bool.nullable(true));
        assert_eq!(desc.arity(), 3);
        let names: Vec<_> = desc.iter_names().map(|n| n.as_str()).collect();
        assert_eq!(names, &["a", "b", "c"]);
    }

    #[test]
    fn test_get_by_name() {
        let desc = RelationDesc::empty()
            .with_column("ID", ScalarType::Int64.nullable(false))
            .with_column("NAME", ScalarType::String.nullable(true));

        let (idx, typ) = desc.get_by_name(&ColumnName::from("NAME")).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(typ.scalar_type, ScalarType::String);
        assert_eq!(desc.get_by_name(&ColumnName::from("name")), None);

        let (name, typ) = desc.get_by_name_ignore_case("name").unwrap();
        assert_eq!(name.as_str(), "NAME");
        assert_eq!(typ.scalar_type, ScalarType::String);
    }

    #[test]
    fn test_reserved_column_names() {
        for name in ["ROWTIME", "rowtime", "RowKey", "ROWKEY"] {
            assert!(is_reserved_column_name(&ColumnName::from(name)));
        }
        for name in ["ROWTIMES", "ts", "key"] {
            assert!(!is_reserved_column_name(&ColumnName::from(name)));
        }
    }
}
