// Copyright Rivulet, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Descriptions of how source data is formatted and keyed.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod timestamp;

/// The format of the values in a source's backing topic.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Hash)]
pub enum Format {
    /// JSON-encoded values.
    Json,
    /// Avro-encoded values.
    Avro,
    /// Character-delimited values.
    Delimited,
}

impl Format {
    /// Reports whether the format can represent a bare, unwrapped value.
    ///
    /// Delimited data has no outer structure to strip, so only the
    /// structured formats support unwrapping single-field values.
    pub fn supports_unwrapping(&self) -> bool {
        match self {
            Format::Json | Format::Avro => true,
            Format::Delimited => false,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Format::Json => "JSON",
            Format::Avro => "AVRO",
            Format::Delimited => "DELIMITED",
        };
        f.write_str(name)
    }
}

/// An independent flag controlling value (de)serialization behavior.
///
/// Options are accumulated into a `BTreeSet` during planning; each option is
/// orthogonal to the others.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Hash)]
pub enum SerdeOption {
    /// Serialize a single-field value schema as the bare field value rather
    /// than wrapped in an outer record.
    UnwrapSingleValues,
}

/// The kind of time window a windowed key is parameterized by.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Hash)]
pub enum WindowKind {
    /// Fixed-size, non-overlapping windows.
    Tumbling,
    /// Fixed-size, overlapping windows.
    Hopping,
    /// Windows bounded by gaps in activity.
    Session,
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            WindowKind::Tumbling => "TUMBLING",
            WindowKind::Hopping => "HOPPING",
            WindowKind::Session => "SESSION",
        };
        f.write_str(name)
    }
}

/// The strategy for serializing a source's key.
///
/// This is a closed choice: keys are either plain strings or strings
/// parameterized by a window boundary. Sources produced by windowed
/// aggregations carry the windowed variant.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Hash)]
pub enum KeySerde {
    /// Plain string keys.
    PlainString,
    /// String keys bounded by a time window of the given kind.
    Windowed(WindowKind),
}
