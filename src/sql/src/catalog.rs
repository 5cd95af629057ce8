// Copyright Rivulet, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Interfaces to the catalog of registered sources and logical topics.
//!
//! The catalog's storage engine lives outside this crate; planning consumes
//! it through [`SessionCatalog`].

use rivulet_storage_types::sources::Format;

use crate::ast::SourceKind;

/// A source registered in the catalog.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceEntry {
    /// The source's name.
    pub name: String,
    /// Whether the source is a stream or a table.
    pub kind: SourceKind,
}

/// A logical topic registered in the catalog: a physical topic paired with
/// its format metadata.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TopicMetadata {
    /// The logical topic name.
    pub name: String,
    /// The physical log topic it is backed by.
    pub kafka_topic: String,
    /// The format of the topic's values.
    pub value_format: Format,
}

/// A catalog keeping track of all sources and logical topics visible to the
/// session.
pub trait SessionCatalog {
    /// Looks up a source by name.
    fn get_source(&self, name: &str) -> Option<&SourceEntry>;

    /// Looks up a logical topic by name.
    fn get_topic(&self, name: &str) -> Option<&TopicMetadata>;
}
