// Copyright Rivulet, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Client interfaces onto the backing log system.

/// A client onto the log system backing every source.
///
/// Planning only needs to ask whether a physical topic exists; topic
/// creation and data-plane access are storage-layer concerns. The trait
/// boundary keeps planning deterministic and collaborator-free in tests.
pub trait TopicClient {
    /// Reports whether a physical topic with the given name exists in the
    /// log system.
    fn topic_exists(&self, name: &str) -> bool;
}
